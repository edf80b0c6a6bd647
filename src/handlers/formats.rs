// handlers/formats.rs - /formats routes

use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde_json::json;

use super::graphql::{execute, QueryParams};
use crate::database::models::FormatInput;
use crate::middleware::{AuthUser, RecordId, ValidJson};
use crate::state::AppState;

const FORMATS_QUERY: &str = "{ formats { _id title slug } }";

const FORMAT_QUERY: &str = "query Format($id: String) { format(_id: $id) { _id title slug } }";

const ADD_FORMAT: &str = r#"
    mutation AddFormat($format: FormatInput!) {
        addFormat(format: $format) {
            _id
            title
            slug
        }
    }
"#;

const UPDATE_FORMAT: &str = r#"
    mutation UpdateFormat($id: String!, $format: FormatInput!) {
        updateFormat(_id: $id, format: $format) {
            _id
        }
    }
"#;

const DELETE_FORMAT: &str = "mutation DeleteFormat($id: String!) { deleteFormat(_id: $id) { _id } }";

/// GET /formats
pub async fn list(State(state): State<AppState>, Query(params): Query<QueryParams>) -> impl IntoResponse {
    execute(&state.formats.read_only, params.or_default(FORMATS_QUERY), json!({})).await
}

/// GET /formats/:id
pub async fn show(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    Query(params): Query<QueryParams>,
) -> impl IntoResponse {
    execute(&state.formats.read_only, params.or_default(FORMAT_QUERY), json!({ "id": id })).await
}

/// POST /formats
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(format): ValidJson<FormatInput>,
) -> impl IntoResponse {
    tracing::info!("{}: adding format", user.email);
    execute(&state.formats.full, ADD_FORMAT, json!({ "format": format })).await
}

/// PUT /formats/:id
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    RecordId(id): RecordId,
    ValidJson(format): ValidJson<FormatInput>,
) -> impl IntoResponse {
    tracing::info!("{}: updating format {}", user.email, id);
    execute(&state.formats.full, UPDATE_FORMAT, json!({ "id": id, "format": format })).await
}

/// DELETE /formats/:id
pub async fn remove(State(state): State<AppState>, user: AuthUser, RecordId(id): RecordId) -> impl IntoResponse {
    tracing::info!("{}: deleting format {}", user.email, id);
    execute(&state.formats.full, DELETE_FORMAT, json!({ "id": id })).await
}
