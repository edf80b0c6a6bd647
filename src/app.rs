use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config;
use crate::handlers;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth", post(handlers::auth::login))
        // Entity routes; the gate is applied per handler
        .merge(movie_routes())
        .merge(format_routes())
        .merge(user_routes())
        .layer(TraceLayer::new_for_http());

    let router = if config::config().security.enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}

fn movie_routes() -> Router<AppState> {
    use handlers::movies;

    Router::new()
        .route("/movies", get(movies::list).post(movies::create))
        .route(
            "/movies/:id",
            get(movies::show).put(movies::update).delete(movies::remove),
        )
}

fn format_routes() -> Router<AppState> {
    use handlers::formats;

    Router::new()
        .route("/formats", get(formats::list).post(formats::create))
        .route(
            "/formats/:id",
            get(formats::show).put(formats::update).delete(formats::remove),
        )
}

fn user_routes() -> Router<AppState> {
    use handlers::users;

    Router::new()
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/:id",
            get(users::show).put(users::update).delete(users::remove),
        )
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Movie Collection API",
        "version": version,
        "endpoints": {
            "auth": "POST /auth (public - token acquisition)",
            "movies": "/movies[/:id] (reads public, writes bearer)",
            "formats": "/formats[/:id] (reads public, writes bearer)",
            "users": "/users[/:id] (bearer)",
            "health": "/health (public)",
        },
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request},
    };
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::testing::{seed_user, test_state};

    const ADMIN_EMAIL: &str = "admin@collection.test";
    const ADMIN_PASSWORD: &str = "Admin1234";

    struct Reply {
        status: StatusCode,
        body: Value,
    }

    async fn send(router: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Reply {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        Reply { status, body }
    }

    async fn setup() -> (Router, String) {
        let (state, _store) = test_state();
        let token = seed_user(&state, ADMIN_EMAIL, ADMIN_PASSWORD).await;
        (app(state), token)
    }

    fn dune() -> Value {
        json!({
            "title": "Dune",
            "year": "2021",
            "format": "Bluray",
            "tmdb_id": "1",
            "tmdb_image_url": "u",
            "upc": "123"
        })
    }

    #[tokio::test]
    async fn add_movie_returns_slug_and_generated_id() {
        let (router, token) = setup().await;

        let reply = send(&router, Method::POST, "/movies", Some(&token), Some(dune())).await;
        assert_eq!(reply.status, StatusCode::OK);

        let movie = &reply.body["data"]["addMovie"];
        assert_eq!(movie["slug"], "2021-dune");
        assert_eq!(movie["title"], "Dune");
        assert_eq!(movie["_id"].as_str().unwrap().len(), 24);
    }

    #[tokio::test]
    async fn movie_reads_are_public() {
        let (router, token) = setup().await;
        let created = send(&router, Method::POST, "/movies", Some(&token), Some(dune())).await;
        let id = created.body["data"]["addMovie"]["_id"].as_str().unwrap().to_string();

        let list = send(&router, Method::GET, "/movies", None, None).await;
        assert_eq!(list.status, StatusCode::OK);
        assert_eq!(list.body["data"]["movies"][0]["tmdb_image_url"], "u");

        let detail = send(&router, Method::GET, &format!("/movies/{}", id), None, None).await;
        assert_eq!(detail.status, StatusCode::OK);
        assert_eq!(detail.body["data"]["movie"]["_id"], id);
        assert_eq!(detail.body["data"]["movie"]["upc"], "123");
    }

    #[tokio::test]
    async fn movie_writes_require_token() {
        let (router, _token) = setup().await;

        let reply = send(&router, Method::POST, "/movies", None, Some(dune())).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        assert_eq!(reply.body["error"], "Unauthorized");

        let reply = send(&router, Method::POST, "/movies", Some("not.a.token"), Some(dune())).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn duplicate_movie_surfaces_as_graphql_error() {
        let (router, token) = setup().await;
        send(&router, Method::POST, "/movies", Some(&token), Some(dune())).await;

        let reply = send(&router, Method::POST, "/movies", Some(&token), Some(dune())).await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(reply.body["errors"].as_array().is_some_and(|errors| !errors.is_empty()));
    }

    #[tokio::test]
    async fn missing_field_is_a_bad_request() {
        let (router, token) = setup().await;
        let mut movie = dune();
        movie.as_object_mut().unwrap().remove("upc");

        let reply = send(&router, Method::POST, "/movies", Some(&token), Some(movie)).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.body["statusCode"], 400);
        assert_eq!(reply.body["error"], "Bad Request");

        let mut empty_title = dune();
        empty_title["title"] = json!("");
        let reply = send(&router, Method::POST, "/movies", Some(&token), Some(empty_title)).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.body["validation"]["keys"][0], "title");
    }

    #[tokio::test]
    async fn malformed_id_is_a_bad_request() {
        let (router, token) = setup().await;

        let reply = send(&router, Method::GET, "/movies/not-an-id", None, None).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.body["validation"]["source"], "params");

        let reply = send(&router, Method::DELETE, "/formats/1234", Some(&token), None).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_of_unknown_format_returns_null_id() {
        let (router, token) = setup().await;
        let unknown = mongodb::bson::oid::ObjectId::new().to_hex();

        let reply = send(
            &router,
            Method::PUT,
            &format!("/formats/{}", unknown),
            Some(&token),
            Some(json!({ "title": "Bluray" })),
        )
        .await;

        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, json!({ "data": { "updateFormat": { "_id": null } } }));
    }

    #[tokio::test]
    async fn format_update_and_delete_echo_id() {
        let (router, token) = setup().await;
        let created = send(&router, Method::POST, "/formats", Some(&token), Some(json!({ "title": "DVD" }))).await;
        assert_eq!(created.body["data"]["addFormat"]["slug"], "dvd");
        let id = created.body["data"]["addFormat"]["_id"].as_str().unwrap().to_string();

        let updated = send(
            &router,
            Method::PUT,
            &format!("/formats/{}", id),
            Some(&token),
            Some(json!({ "title": "4K Ultra HD" })),
        )
        .await;
        assert_eq!(updated.body, json!({ "data": { "updateFormat": { "_id": id } } }));

        let detail = send(&router, Method::GET, &format!("/formats/{}", id), None, None).await;
        assert_eq!(detail.body["data"]["format"]["slug"], "4k-ultra-hd");

        let deleted = send(&router, Method::DELETE, &format!("/formats/{}", id), Some(&token), None).await;
        assert_eq!(deleted.body, json!({ "data": { "deleteFormat": { "_id": id } } }));

        let again = send(&router, Method::DELETE, &format!("/formats/{}", id), Some(&token), None).await;
        assert_eq!(again.body, json!({ "data": { "deleteFormat": { "_id": null } } }));
    }

    #[tokio::test]
    async fn query_parameter_overrides_default_selection() {
        let (router, token) = setup().await;
        send(&router, Method::POST, "/formats", Some(&token), Some(json!({ "title": "DVD" }))).await;

        let reply = send(&router, Method::GET, "/formats?query=%7Bformats%7Btitle%7D%7D", None, None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, json!({ "data": { "formats": [{ "title": "DVD" }] } }));
    }

    #[tokio::test]
    async fn query_parameter_cannot_mutate() {
        let (router, _token) = setup().await;
        let mutation = "mutation%7BaddFormat(format:%7Btitle:%22VHS%22%7D)%7B_id%7D%7D";

        let reply = send(&router, Method::GET, &format!("/formats?query={}", mutation), None, None).await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);

        let list = send(&router, Method::GET, "/formats", None, None).await;
        assert_eq!(list.body["data"]["formats"], json!([]));
    }

    #[tokio::test]
    async fn user_lifecycle_never_echoes_password() {
        let (router, token) = setup().await;

        let created = send(
            &router,
            Method::POST,
            "/users",
            Some(&token),
            Some(json!({ "email": "a@b.com", "password": "Abcdef12" })),
        )
        .await;
        assert_eq!(created.status, StatusCode::OK);
        let user = created.body["data"]["addUser"].as_object().unwrap();
        assert_eq!(user.len(), 1);
        let id = user["_id"].as_str().unwrap().to_string();

        let detail = send(&router, Method::GET, &format!("/users/{}", id), Some(&token), None).await;
        assert_eq!(
            detail.body,
            json!({ "data": { "user": { "_id": id, "email": "a@b.com" } } })
        );

        let listed = send(&router, Method::GET, "/users", Some(&token), None).await;
        assert!(!listed.body.to_string().contains("password"));
    }

    #[tokio::test]
    async fn user_routes_require_token() {
        let (router, _token) = setup().await;
        let reply = send(&router, Method::GET, "/users", None, None).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn duplicate_user_email_is_rejected() {
        let (router, token) = setup().await;
        let body = json!({ "email": ADMIN_EMAIL, "password": "Another99" });

        let reply = send(&router, Method::POST, "/users", Some(&token), Some(body)).await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);

        let listed = send(&router, Method::GET, "/users", Some(&token), None).await;
        assert_eq!(listed.body["data"]["users"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn weak_password_is_a_bad_request() {
        let (router, token) = setup().await;
        let body = json!({ "email": "a@b.com", "password": "abcdefgh" });

        let reply = send(&router, Method::POST, "/users", Some(&token), Some(body)).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.body["validation"]["keys"][0], "password");
    }

    #[tokio::test]
    async fn login_issues_token_for_valid_credentials() {
        let (router, _token) = setup().await;

        let reply = send(
            &router,
            Method::POST,
            "/auth",
            None,
            Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
        )
        .await;
        assert_eq!(reply.status, StatusCode::OK);

        let token = reply.body["token"].as_str().unwrap();
        let claims = crate::auth::validate_jwt(token, &config::config().security).unwrap();
        assert_eq!(claims.email, ADMIN_EMAIL);

        let listed = send(&router, Method::GET, "/users", Some(token), None).await;
        assert_eq!(listed.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn login_with_wrong_password_or_unknown_email_is_unauthorized() {
        let (router, _token) = setup().await;

        for (email, password) in [(ADMIN_EMAIL, "wrong"), ("nobody@collection.test", ADMIN_PASSWORD)] {
            let reply = send(
                &router,
                Method::POST,
                "/auth",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
            assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
            assert_eq!(reply.body["error"], "Unauthorized");
            assert_eq!(reply.body["message"], "Invalid email or password");
            assert!(reply.body.get("token").is_none());
        }
    }

    #[tokio::test]
    async fn token_for_deleted_account_is_rejected() {
        let (state, _store) = test_state();
        let admin = seed_user(&state, ADMIN_EMAIL, ADMIN_PASSWORD).await;
        let doomed = seed_user(&state, "gone@collection.test", "Gone12345").await;
        let gone = state.users.find_by_email("gone@collection.test").await.unwrap().unwrap();
        let router = app(state);

        let path = format!("/users/{}", gone.id.unwrap().to_hex());
        let deleted = send(&router, Method::DELETE, &path, Some(&admin), None).await;
        assert_eq!(deleted.status, StatusCode::OK);

        let reply = send(&router, Method::GET, "/users", Some(&doomed), None).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        assert_eq!(reply.body["message"], "Invalid token");
    }

    #[tokio::test]
    async fn store_outage_rejects_auth_and_fails_reads() {
        let (state, store) = test_state();
        let token = seed_user(&state, ADMIN_EMAIL, ADMIN_PASSWORD).await;
        let router = app(state);
        store.go_offline();

        let reply = send(&router, Method::GET, "/users", Some(&token), None).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

        let reply = send(&router, Method::GET, "/movies", None, None).await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);

        let reply = send(&router, Method::GET, "/health", None, None).await;
        assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn health_reports_ok_when_store_answers() {
        let (router, _token) = setup().await;
        let reply = send(&router, Method::GET, "/health", None, None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["database"], "ok");
    }
}
