use std::sync::Arc;

use moneta_core::db::{self, DbPool, WriteHandle};
use tempfile::TempDir;

/// A fresh on-disk SQLite database with migrations applied. The temp dir
/// lives as long as the handle.
pub struct TestDb {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
    _dir: TempDir,
}

pub fn setup() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = db::init(dir.path().to_str().expect("temp dir path is valid UTF-8"))
        .expect("Failed to initialize database");

    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");

    let writer = WriteHandle::spawn(&db_path).expect("Failed to spawn writer");

    TestDb {
        pool,
        writer,
        _dir: dir,
    }
}
