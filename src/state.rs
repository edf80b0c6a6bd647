use std::sync::Arc;

use crate::database::models::{Format, Movie, User};
use crate::database::{DocumentStore, Repository};
use crate::graphql::{FormatSchema, MovieSchema, UserSchema};

/// Shared, read-only request state built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub movies: Arc<MovieSchema>,
    pub formats: Arc<FormatSchema>,
    pub user_schema: Arc<UserSchema>,
    /// Used directly by login and the auth gate.
    pub users: Arc<Repository<User>>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let introspection = !crate::is_production!();

        let movies = Arc::new(Repository::<Movie>::new(store.clone()));
        let formats = Arc::new(Repository::<Format>::new(store.clone()));
        let users = Arc::new(Repository::<User>::new(store.clone()));

        Self {
            movies: Arc::new(MovieSchema::new(movies, introspection)),
            formats: Arc::new(FormatSchema::new(formats, introspection)),
            user_schema: Arc::new(UserSchema::new(users.clone(), introspection)),
            users,
            store,
        }
    }
}
