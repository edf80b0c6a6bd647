use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use tokio::sync::RwLock;

use crate::auth::generate_jwt;
use crate::config;
use crate::database::models::UserInput;
use crate::database::{DatabaseError, DocumentStore, UpdateOutcome, UNIQUE_INDEXES};
use crate::state::AppState;

/// In-process document store enforcing the same unique indexes as the real
/// collections. Filters are top-level equality only.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every following operation fail as if the server were gone.
    pub fn go_offline(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), DatabaseError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DatabaseError::Connection("memory store offline".to_string()));
        }
        Ok(())
    }

    fn matches(document: &Document, filter: &Document) -> bool {
        filter.iter().all(|(key, value)| document.get(key) == Some(value))
    }

    fn project(mut document: Document, projection: &Option<Document>) -> Document {
        if let Some(projection) = projection {
            for (key, value) in projection {
                if matches!(value, Bson::Int32(0) | Bson::Int64(0) | Bson::Boolean(false)) {
                    document.remove(key);
                }
            }
        }
        document
    }

    fn check_unique(
        collection: &str,
        existing: &[Document],
        candidate: &Document,
        skip: Option<ObjectId>,
    ) -> Result<(), DatabaseError> {
        for (_, field) in UNIQUE_INDEXES.iter().filter(|(c, _)| *c == collection) {
            let Some(value) = candidate.get(*field) else {
                continue;
            };
            let clash = existing.iter().any(|other| {
                other.get_object_id("_id").ok() != skip && other.get(*field) == Some(value)
            });
            if clash {
                return Err(DatabaseError::Duplicate(format!(
                    "{} index: {}_1 dup key: {}",
                    collection, field, value
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: &str,
        filter: Document,
        projection: Option<Document>,
    ) -> Result<Vec<Document>, DatabaseError> {
        self.check_online()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| Self::matches(document, &filter))
                    .map(|document| Self::project(document.clone(), &projection))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
        projection: Option<Document>,
    ) -> Result<Option<Document>, DatabaseError> {
        Ok(self.find(collection, filter, projection).await?.into_iter().next())
    }

    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<ObjectId, DatabaseError> {
        self.check_online()?;
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        let id = match document.get_object_id("_id") {
            Ok(id) => id,
            Err(_) => ObjectId::new(),
        };
        document.insert("_id", id);

        Self::check_unique(collection, documents, &document, None)?;
        documents.push(document);
        Ok(id)
    }

    async fn update_one(&self, collection: &str, id: ObjectId, set: Document) -> Result<UpdateOutcome, DatabaseError> {
        self.check_online()?;
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        let Some(index) = documents
            .iter()
            .position(|document| Self::matches(document, &doc! { "_id": id }))
        else {
            return Ok(UpdateOutcome::default());
        };

        let mut updated = documents[index].clone();
        for (key, value) in set {
            updated.insert(key, value);
        }
        Self::check_unique(collection, documents, &updated, Some(id))?;

        let modified = updated != documents[index];
        documents[index] = updated;

        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(modified),
        })
    }

    async fn delete_one(&self, collection: &str, id: ObjectId) -> Result<u64, DatabaseError> {
        self.check_online()?;
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(0);
        };

        match documents
            .iter()
            .position(|document| Self::matches(document, &doc! { "_id": id }))
        {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.check_online()
    }
}

/// Fresh state over an empty in-memory store.
pub fn test_state() -> (AppState, Arc<MemoryStore>) {
    let store = MemoryStore::shared();
    (AppState::new(store.clone()), store)
}

/// Create an account and return a bearer token for it.
pub async fn seed_user(state: &AppState, email: &str, password: &str) -> String {
    state
        .users
        .create(UserInput {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
        .expect("seed user");

    generate_jwt(email, &config::config().security).expect("token")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn update_reports_matched_and_modified_separately() {
        let store = MemoryStore::default();
        let id = store
            .insert_one("formats", doc! { "title": "DVD", "slug": "dvd" })
            .await
            .unwrap();

        let same = store
            .update_one("formats", id, doc! { "title": "DVD", "slug": "dvd" })
            .await
            .unwrap();
        assert_eq!(same, UpdateOutcome { matched: 1, modified: 0 });

        let changed = store
            .update_one("formats", id, doc! { "title": "Bluray", "slug": "bluray" })
            .await
            .unwrap();
        assert_eq!(changed, UpdateOutcome { matched: 1, modified: 1 });

        let missing = store
            .update_one("formats", ObjectId::new(), doc! { "title": "VHS" })
            .await
            .unwrap();
        assert_eq!(missing, UpdateOutcome::default());
    }

    #[tokio::test]
    async fn update_into_existing_slug_is_a_duplicate() {
        let store = MemoryStore::default();
        store
            .insert_one("formats", doc! { "title": "DVD", "slug": "dvd" })
            .await
            .unwrap();
        let id = store
            .insert_one("formats", doc! { "title": "VHS", "slug": "vhs" })
            .await
            .unwrap();

        let err = store
            .update_one("formats", id, doc! { "title": "DVD", "slug": "dvd" })
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Duplicate(_)));
    }

    #[tokio::test]
    async fn projection_excludes_fields() {
        let store = MemoryStore::default();
        store
            .insert_one("users", doc! { "email": "a@b.com", "password": "hash" })
            .await
            .unwrap();

        let found = store
            .find_one("users", doc! { "email": "a@b.com" }, Some(doc! { "password": 0 }))
            .await
            .unwrap()
            .unwrap();
        assert!(found.get("password").is_none());
        assert!(found.get("_id").is_some());
    }
}
