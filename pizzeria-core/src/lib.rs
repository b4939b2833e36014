pub mod address;
pub mod repository;

pub use address::{AddressValidator, AddressVerdict, LocalAddressValidator};
pub use repository::InventoryRepository;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("External service error: {0}")]
    ExternalService(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
