pub mod app_config;
pub mod booking_repo;
pub mod catalog_repo;
pub mod database;

pub use booking_repo::PgBookingRepository;
pub use catalog_repo::PgCatalog;
pub use database::DbClient;
