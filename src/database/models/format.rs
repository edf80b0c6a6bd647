use async_graphql::{ComplexObject, InputObject, SimpleObject};
use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::database::manager::DatabaseError;
use crate::database::repository::Entity;
use crate::database::slug::slugify;

/// A physical or digital release format (Bluray, DVD, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize, SimpleObject)]
#[graphql(name = "MovieFormat", complex)]
pub struct Format {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    #[graphql(skip)]
    pub id: Option<ObjectId>,
    pub title: Option<String>,
    pub slug: Option<String>,
}

#[ComplexObject]
impl Format {
    #[graphql(name = "_id")]
    async fn object_id(&self) -> Option<String> {
        self.id.map(|id| id.to_hex())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, InputObject, Validate)]
pub struct FormatInput {
    #[validate(length(min = 1))]
    pub title: String,
}

#[async_trait]
impl Entity for Format {
    const COLLECTION: &'static str = "formats";

    type Input = FormatInput;

    async fn into_document(input: FormatInput) -> Result<Document, DatabaseError> {
        let slug = slugify(&[&input.title]);
        Ok(doc! { "title": input.title, "slug": slug })
    }

    fn with_id(id: ObjectId) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }
}
