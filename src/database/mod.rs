pub mod manager;
pub mod models;
pub mod repository;
pub mod slug;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager, UNIQUE_INDEXES};
pub use repository::{Entity, Repository};
pub use store::{DocumentStore, MongoStore, UpdateOutcome};
