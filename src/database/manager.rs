use mongodb::bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Database, IndexModel};
use thiserror::Error;
use tracing::info;

use crate::auth::password::HashError;
use crate::config::DatabaseConfig;

/// Unique indexes the collections rely on, as (collection, field) pairs.
/// These are the only guard against concurrent duplicate writes.
pub const UNIQUE_INDEXES: &[(&str, &str)] = &[
    ("movies", "slug"),
    ("formats", "slug"),
    ("users", "email"),
];

/// Errors from the document store and the repositories on top of it
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Duplicate key: {0}")]
    Duplicate(String),

    #[error("Database operation timed out: {0}")]
    Timeout(String),

    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Password hashing failed: {0}")]
    Hashing(#[from] HashError),

    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}

impl From<mongodb::bson::de::Error> for DatabaseError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        DatabaseError::Serialization(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for DatabaseError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        DatabaseError::Serialization(err.to_string())
    }
}

/// Owns startup of the single process-wide client
pub struct DatabaseManager;

impl DatabaseManager {
    /// Build the pooled client. The driver connects lazily, so this only
    /// fails on a malformed connection string.
    pub async fn connect(config: &DatabaseConfig) -> Result<Database, DatabaseError> {
        let mut options = ClientOptions::parse(config.connection_uri())
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.max_pool_size = Some(config.max_pool_size);
        options.connect_timeout = Some(config.connect_timeout());
        options.server_selection_timeout = Some(config.connect_timeout());

        let client = Client::with_options(options)?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(&config.name));

        info!("Created database client for: {}", database.name());
        Ok(database)
    }

    /// Create the unique indexes if missing. Idempotent.
    pub async fn ensure_indexes(database: &Database) -> Result<(), DatabaseError> {
        for (collection, field) in UNIQUE_INDEXES {
            let index = IndexModel::builder()
                .keys(doc! { *field: 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build();

            database
                .collection::<mongodb::bson::Document>(collection)
                .create_index(index, None)
                .await?;

            info!("Ensured unique index {}.{}", collection, field);
        }
        Ok(())
    }
}
