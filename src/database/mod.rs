pub mod manager;
pub mod schema;
pub mod handlers;
pub mod store;

pub use manager::DatabaseManager;
pub use schema::DatabaseSchema;
pub use handlers::{run_database_handler, spawn_database_handler};
pub use store::{SampleStore, StoreClient};
