pub mod banks_model;
pub mod banks_repository;
pub mod banks_service;
pub mod banks_traits;

pub use banks_model::{Bank, NewBank};
pub use banks_repository::BankRepository;
pub use banks_service::BankService;
pub use banks_traits::{BankRepositoryTrait, BankServiceTrait};
