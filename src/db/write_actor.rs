use std::thread;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::info;
use tokio::sync::{mpsc, oneshot};

use crate::errors::{DatabaseError, Error, Result};

type WriteJob = Box<dyn FnOnce(&mut SqliteConnection) + Send + 'static>;

/// Handle to the single writer thread.
///
/// SQLite allows one writer at a time; funneling every mutation through this
/// actor keeps write transactions serialized without holding pool connections
/// across `.await` points.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::UnboundedSender<WriteJob>,
}

impl WriteHandle {
    /// Spawns the writer thread with its own connection to `db_path`.
    pub fn spawn(db_path: &str) -> Result<Self> {
        let mut conn = super::establish_write_connection(db_path)?;
        let (tx, mut rx) = mpsc::unbounded_channel::<WriteJob>();

        thread::Builder::new()
            .name("db-writer".to_string())
            .spawn(move || {
                info!("Database writer thread started");
                while let Some(job) = rx.blocking_recv() {
                    job(&mut conn);
                }
                info!("Database writer thread stopped");
            })
            .map_err(|e| Error::Database(DatabaseError::WriterUnavailable(e.to_string())))?;

        Ok(WriteHandle { tx })
    }

    /// Runs `f` on the writer connection inside a transaction and awaits the
    /// outcome. A rolled-back transaction surfaces as the closure's error.
    pub async fn exec<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel::<Result<T>>();

        let job: WriteJob = Box::new(move |conn| {
            let outcome = conn.transaction::<T, Error, _>(f);
            let _ = reply_tx.send(outcome);
        });

        self.tx.send(job).map_err(|_| {
            Error::Database(DatabaseError::WriterUnavailable(
                "writer thread is gone".to_string(),
            ))
        })?;

        reply_rx.await.map_err(|_| {
            Error::Database(DatabaseError::WriterUnavailable(
                "writer dropped the reply channel".to_string(),
            ))
        })?
    }
}
