use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{doc, from_document, oid::ObjectId, Bson, Document};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::manager::DatabaseError;
use super::models::User;
use super::store::DocumentStore;
use crate::auth::password;

/// A record type stored in its own collection.
#[async_trait]
pub trait Entity: DeserializeOwned + Default + Send + Sync + 'static {
    const COLLECTION: &'static str;

    /// Caller-supplied business fields for create and update.
    type Input: Send + 'static;

    /// Stored fields never returned by reads.
    fn hidden_fields() -> &'static [&'static str] {
        &[]
    }

    /// Build the stored fields for `input`, including derived ones.
    async fn into_document(input: Self::Input) -> Result<Document, DatabaseError>;

    /// Result carrying only the identifier, used by update and delete.
    fn with_id(id: ObjectId) -> Self;
}

/// Data access for one entity collection
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _phantom: PhantomData<T>,
}

impl<T: Entity> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    fn projection() -> Option<Document> {
        let hidden = T::hidden_fields();
        if hidden.is_empty() {
            return None;
        }
        Some(
            hidden
                .iter()
                .map(|field| (field.to_string(), Bson::Int32(0)))
                .collect(),
        )
    }

    fn parse_id(id: &str) -> Result<ObjectId, DatabaseError> {
        ObjectId::parse_str(id).map_err(|_| DatabaseError::InvalidId(id.to_string()))
    }

    fn decode(mut document: Document) -> Result<T, DatabaseError> {
        for field in T::hidden_fields() {
            document.remove(*field);
        }
        Ok(from_document(document)?)
    }

    pub async fn list(&self) -> Result<Vec<T>, DatabaseError> {
        self.store
            .find(T::COLLECTION, doc! {}, Self::projection())
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    pub async fn get(&self, id: &str) -> Result<Option<T>, DatabaseError> {
        let id = Self::parse_id(id)?;
        self.store
            .find_one(T::COLLECTION, doc! { "_id": id }, Self::projection())
            .await?
            .map(Self::decode)
            .transpose()
    }

    pub async fn create(&self, input: T::Input) -> Result<T, DatabaseError> {
        let mut document = T::into_document(input).await?;
        let id = self.store.insert_one(T::COLLECTION, document.clone()).await?;
        document.insert("_id", id);
        Self::decode(document)
    }

    /// Identifier only when exactly one document changed. A missing document
    /// and an update that changed nothing both give an empty result.
    pub async fn update(&self, id: &str, input: T::Input) -> Result<T, DatabaseError> {
        let id = Self::parse_id(id)?;
        let set = T::into_document(input).await?;
        let outcome = self.store.update_one(T::COLLECTION, id, set).await?;

        if outcome.modified == 1 {
            return Ok(T::with_id(id));
        }

        debug!(
            "update {} {}: matched {}, modified {}",
            T::COLLECTION,
            id,
            outcome.matched,
            outcome.modified
        );
        Ok(T::default())
    }

    pub async fn delete(&self, id: &str) -> Result<T, DatabaseError> {
        let id = Self::parse_id(id)?;
        let deleted = self.store.delete_one(T::COLLECTION, id).await?;

        Ok(if deleted == 1 { T::with_id(id) } else { T::default() })
    }
}

impl Repository<User> {
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        self.store
            .find_one(User::COLLECTION, doc! { "email": email }, Self::projection())
            .await?
            .map(Self::decode)
            .transpose()
    }

    /// True only when the account exists and the stored hash matches.
    pub async fn verify_password(&self, email: &str, plaintext: &str) -> Result<bool, DatabaseError> {
        let found = self
            .store
            .find_one(User::COLLECTION, doc! { "email": email }, None)
            .await?;

        let hash = match found.as_ref().and_then(|user| user.get_str("password").ok()) {
            Some(hash) => hash.to_string(),
            None => return Ok(false),
        };

        Ok(password::verify_password(plaintext.to_string(), hash).await)
    }
}
