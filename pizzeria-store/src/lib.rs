pub mod app_config;
pub mod database;
pub mod geocoding;
pub mod inventory_repo;

pub use app_config::Config;
pub use database::DbClient;
pub use geocoding::NominatimValidator;
pub use inventory_repo::PgInventoryRepository;
