use async_graphql::{EmptySubscription, ObjectType, Request, Schema, Variables};
use axum::{http::StatusCode, Json};
use serde::Deserialize;
use serde_json::Value;

/// `?query=` override accepted by the list and detail GET routes.
#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
    pub query: Option<String>,
}

impl QueryParams {
    /// Caller-supplied query text, or `default` when absent or blank.
    pub fn or_default(self, default: &str) -> String {
        match self.query {
            Some(query) if !query.trim().is_empty() => query,
            _ => default.to_string(),
        }
    }
}

/// Run `text` with `variables` and reply with the GraphQL envelope: 200 for a
/// clean result, 500 when the response carries any errors.
pub async fn execute<Q, M>(
    schema: &Schema<Q, M, EmptySubscription>,
    text: impl Into<String>,
    variables: Value,
) -> (StatusCode, Json<async_graphql::Response>)
where
    Q: ObjectType + 'static,
    M: ObjectType + 'static,
{
    let request = Request::new(text).variables(Variables::from_json(variables));
    let response = schema.execute(request).await;

    if response.errors.is_empty() {
        return (StatusCode::OK, Json(response));
    }

    for error in &response.errors {
        tracing::error!("GraphQL error: {}", error.message);
    }
    (StatusCode::INTERNAL_SERVER_ERROR, Json(response))
}
