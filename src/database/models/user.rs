use async_graphql::{ComplexObject, InputObject, SimpleObject};
use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::auth::password;
use crate::config;
use crate::database::manager::DatabaseError;
use crate::database::repository::Entity;

/// An account allowed to manage the collection. The stored password hash is
/// not part of this type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, SimpleObject)]
#[graphql(complex)]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    #[graphql(skip)]
    pub id: Option<ObjectId>,
    pub email: Option<String>,
}

#[ComplexObject]
impl User {
    #[graphql(name = "_id")]
    async fn object_id(&self) -> Option<String> {
        self.id.map(|id| id.to_hex())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, InputObject, Validate)]
pub struct UserInput {
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    password::check_policy(password).map_err(|e| {
        let mut error = ValidationError::new("password_policy");
        error.message = Some(e.to_string().into());
        error
    })
}

#[async_trait]
impl Entity for User {
    const COLLECTION: &'static str = "users";

    type Input = UserInput;

    fn hidden_fields() -> &'static [&'static str] {
        &["password"]
    }

    async fn into_document(input: UserInput) -> Result<Document, DatabaseError> {
        password::check_policy(&input.password).map_err(|e| DatabaseError::Validation(e.to_string()))?;

        let hash = password::hash_password(input.password, config::config().security.bcrypt_cost).await?;

        Ok(doc! { "email": input.email, "password": hash })
    }

    fn with_id(id: ObjectId) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }
}
