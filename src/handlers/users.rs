// handlers/users.rs - /users routes, all behind the bearer token gate.
// No query selects a password; the User type has no such field.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde_json::json;

use super::graphql::{execute, QueryParams};
use crate::database::models::UserInput;
use crate::middleware::{AuthUser, RecordId, ValidJson};
use crate::state::AppState;

const USERS_QUERY: &str = "{ users { _id email } }";

const USER_QUERY: &str = "query User($id: String) { user(_id: $id) { _id email } }";

const ADD_USER: &str = "mutation AddUser($user: UserInput!) { addUser(user: $user) { _id } }";

const UPDATE_USER: &str = r#"
    mutation UpdateUser($id: String!, $user: UserInput!) {
        updateUser(_id: $id, user: $user) {
            _id
        }
    }
"#;

const DELETE_USER: &str = "mutation DeleteUser($id: String!) { deleteUser(_id: $id) { _id } }";

/// GET /users
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<QueryParams>,
) -> impl IntoResponse {
    execute(&state.user_schema.read_only, params.or_default(USERS_QUERY), json!({})).await
}

/// GET /users/:id
pub async fn show(
    State(state): State<AppState>,
    _user: AuthUser,
    RecordId(id): RecordId,
    Query(params): Query<QueryParams>,
) -> impl IntoResponse {
    execute(&state.user_schema.read_only, params.or_default(USER_QUERY), json!({ "id": id })).await
}

/// POST /users
pub async fn create(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(user): ValidJson<UserInput>,
) -> impl IntoResponse {
    tracing::info!("{}: adding user", caller.email);
    execute(&state.user_schema.full, ADD_USER, json!({ "user": user })).await
}

/// PUT /users/:id
pub async fn update(
    State(state): State<AppState>,
    caller: AuthUser,
    RecordId(id): RecordId,
    ValidJson(user): ValidJson<UserInput>,
) -> impl IntoResponse {
    tracing::info!("{}: updating user {}", caller.email, id);
    execute(&state.user_schema.full, UPDATE_USER, json!({ "id": id, "user": user })).await
}

/// DELETE /users/:id
pub async fn remove(State(state): State<AppState>, caller: AuthUser, RecordId(id): RecordId) -> impl IntoResponse {
    tracing::info!("{}: deleting user {}", caller.email, id);
    execute(&state.user_schema.full, DELETE_USER, json!({ "id": id })).await
}
