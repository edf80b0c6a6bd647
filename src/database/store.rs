use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{FindOneOptions, FindOptions};
use mongodb::Database;

use super::manager::DatabaseError;

const DUPLICATE_KEY_CODE: i32 = 11000;

/// Counts reported by an update-by-id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// The collection operations the repositories are built from.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(
        &self,
        collection: &str,
        filter: Document,
        projection: Option<Document>,
    ) -> Result<Vec<Document>, DatabaseError>;

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
        projection: Option<Document>,
    ) -> Result<Option<Document>, DatabaseError>;

    async fn insert_one(&self, collection: &str, document: Document) -> Result<ObjectId, DatabaseError>;

    /// `$set` the given fields on the document with `id`.
    async fn update_one(&self, collection: &str, id: ObjectId, set: Document) -> Result<UpdateOutcome, DatabaseError>;

    /// Returns the number of removed documents.
    async fn delete_one(&self, collection: &str, id: ObjectId) -> Result<u64, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}

/// MongoDB-backed store sharing one pooled client
#[derive(Clone)]
pub struct MongoStore {
    database: Database,
    timeout: Duration,
}

impl MongoStore {
    pub fn new(database: Database, timeout: Duration) -> Self {
        Self { database, timeout }
    }

    fn collection(&self, name: &str) -> mongodb::Collection<Document> {
        self.database.collection::<Document>(name)
    }

    async fn bounded<T, F>(&self, operation: &str, fut: F) -> Result<T, DatabaseError>
    where
        F: Future<Output = Result<T, mongodb::error::Error>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(classify),
            Err(_) => Err(DatabaseError::Timeout(operation.to_string())),
        }
    }
}

/// Surface unique index violations as their own kind.
fn classify(err: mongodb::error::Error) -> DatabaseError {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY_CODE => {
            DatabaseError::Duplicate(write_error.message.clone())
        }
        _ => DatabaseError::Mongo(err),
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find(
        &self,
        collection: &str,
        filter: Document,
        projection: Option<Document>,
    ) -> Result<Vec<Document>, DatabaseError> {
        let options = FindOptions::builder().projection(projection).build();
        let op = format!("find {}", collection);
        self.bounded(&op, async {
            let cursor = self.collection(collection).find(filter, options).await?;
            cursor.try_collect::<Vec<Document>>().await
        })
        .await
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
        projection: Option<Document>,
    ) -> Result<Option<Document>, DatabaseError> {
        let options = FindOneOptions::builder().projection(projection).build();
        let op = format!("find_one {}", collection);
        self.bounded(&op, self.collection(collection).find_one(filter, options))
            .await
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<ObjectId, DatabaseError> {
        let op = format!("insert_one {}", collection);
        let result = self
            .bounded(&op, self.collection(collection).insert_one(document, None))
            .await?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| DatabaseError::Serialization("inserted _id is not an ObjectId".to_string()))
    }

    async fn update_one(&self, collection: &str, id: ObjectId, set: Document) -> Result<UpdateOutcome, DatabaseError> {
        let op = format!("update_one {}", collection);
        let result = self
            .bounded(
                &op,
                self.collection(collection)
                    .update_one(doc! { "_id": id }, doc! { "$set": set }, None),
            )
            .await?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_one(&self, collection: &str, id: ObjectId) -> Result<u64, DatabaseError> {
        let op = format!("delete_one {}", collection);
        let result = self
            .bounded(&op, self.collection(collection).delete_one(doc! { "_id": id }, None))
            .await?;
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.bounded("ping", self.database.run_command(doc! { "ping": 1 }, None))
            .await
            .map(|_| ())
    }
}
