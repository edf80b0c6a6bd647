// handlers/movies.rs - /movies routes
//
// Reads are public and accept a `?query=` override run against the
// read-only schema. Writes require a bearer token.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde_json::json;

use super::graphql::{execute, QueryParams};
use crate::database::models::MovieInput;
use crate::middleware::{AuthUser, RecordId, ValidJson};
use crate::state::AppState;

const MOVIES_QUERY: &str = r#"
    {
        movies {
            _id
            title
            slug
            year
            format
            tmdb_id
            tmdb_image_url
            upc
        }
    }
"#;

const MOVIE_QUERY: &str = r#"
    query Movie($id: String) {
        movie(_id: $id) {
            _id
            title
            slug
            year
            format
            tmdb_id
            tmdb_image_url
            upc
        }
    }
"#;

const ADD_MOVIE: &str = r#"
    mutation AddMovie($movie: MovieInput!) {
        addMovie(movie: $movie) {
            _id
            title
            slug
            year
            format
            tmdb_id
            tmdb_image_url
            upc
        }
    }
"#;

const UPDATE_MOVIE: &str = r#"
    mutation UpdateMovie($id: String!, $movie: MovieInput!) {
        updateMovie(_id: $id, movie: $movie) {
            _id
        }
    }
"#;

const DELETE_MOVIE: &str = r#"
    mutation DeleteMovie($id: String!) {
        deleteMovie(_id: $id) {
            _id
        }
    }
"#;

/// GET /movies
pub async fn list(State(state): State<AppState>, Query(params): Query<QueryParams>) -> impl IntoResponse {
    execute(&state.movies.read_only, params.or_default(MOVIES_QUERY), json!({})).await
}

/// GET /movies/:id
pub async fn show(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    Query(params): Query<QueryParams>,
) -> impl IntoResponse {
    execute(&state.movies.read_only, params.or_default(MOVIE_QUERY), json!({ "id": id })).await
}

/// POST /movies
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(movie): ValidJson<MovieInput>,
) -> impl IntoResponse {
    tracing::info!("{}: adding movie", user.email);
    execute(&state.movies.full, ADD_MOVIE, json!({ "movie": movie })).await
}

/// PUT /movies/:id
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    RecordId(id): RecordId,
    ValidJson(movie): ValidJson<MovieInput>,
) -> impl IntoResponse {
    tracing::info!("{}: updating movie {}", user.email, id);
    execute(&state.movies.full, UPDATE_MOVIE, json!({ "id": id, "movie": movie })).await
}

/// DELETE /movies/:id
pub async fn remove(State(state): State<AppState>, user: AuthUser, RecordId(id): RecordId) -> impl IntoResponse {
    tracing::info!("{}: deleting movie {}", user.email, id);
    execute(&state.movies.full, DELETE_MOVIE, json!({ "id": id })).await
}
