use async_graphql::{ComplexObject, InputObject, SimpleObject};
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, to_document, Document};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::database::manager::DatabaseError;
use crate::database::repository::Entity;
use crate::database::slug::slugify;

/// A movie in the collection. Every field is nullable so update and delete
/// results can carry only `_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, SimpleObject)]
#[graphql(complex, rename_fields = "snake_case")]
pub struct Movie {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    #[graphql(skip)]
    pub id: Option<ObjectId>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub year: Option<String>,
    /// Title of a format; not checked against the formats collection.
    pub format: Option<String>,
    pub tmdb_id: Option<String>,
    pub tmdb_image_url: Option<String>,
    pub upc: Option<String>,
}

#[ComplexObject]
impl Movie {
    #[graphql(name = "_id")]
    async fn object_id(&self) -> Option<String> {
        self.id.map(|id| id.to_hex())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, InputObject, Validate)]
#[graphql(rename_fields = "snake_case")]
pub struct MovieInput {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub year: String,
    #[validate(length(min = 1))]
    pub format: String,
    #[validate(length(min = 1))]
    pub tmdb_id: String,
    #[validate(length(min = 1))]
    pub tmdb_image_url: String,
    #[validate(length(min = 1))]
    pub upc: String,
}

#[async_trait]
impl Entity for Movie {
    const COLLECTION: &'static str = "movies";

    type Input = MovieInput;

    async fn into_document(input: MovieInput) -> Result<Document, DatabaseError> {
        let slug = slugify(&[&input.year, &input.title]);
        let mut document = to_document(&input)?;
        document.insert("slug", slug);
        Ok(document)
    }

    fn with_id(id: ObjectId) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }
}
