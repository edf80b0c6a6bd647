use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use mongodb::bson::oid::ObjectId;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// JSON body that must deserialize and pass its `Validate` rules; anything
/// else is a 400 before a handler runs.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| ApiError::validation_error(rejection.body_text(), "payload", Vec::new()))?;

        value.validate()?;
        Ok(ValidJson(value))
    }
}

/// `{id}` path segment that must be a 24 character hex ObjectId.
#[derive(Debug, Clone)]
pub struct RecordId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        if ObjectId::parse_str(&id).is_err() {
            return Err(ApiError::validation_error(
                "\"id\" must be a valid ObjectId",
                "params",
                vec!["id".to_string()],
            ));
        }

        Ok(RecordId(id))
    }
}
