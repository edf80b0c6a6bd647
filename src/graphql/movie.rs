use std::sync::Arc;

use async_graphql::{Context, Object, Result};

use crate::database::models::{Movie, MovieInput};
use crate::database::Repository;

#[derive(Default)]
pub struct MovieQuery;

#[Object]
impl MovieQuery {
    /// Look up a single movie by `_id`.
    async fn movie(&self, ctx: &Context<'_>, #[graphql(name = "_id")] id: Option<String>) -> Result<Option<Movie>> {
        let Some(id) = id else {
            return Ok(None);
        };
        let movies = ctx.data::<Arc<Repository<Movie>>>()?;
        Ok(movies.get(&id).await?)
    }

    /// Every movie in the collection.
    async fn movies(&self, ctx: &Context<'_>) -> Result<Vec<Movie>> {
        let movies = ctx.data::<Arc<Repository<Movie>>>()?;
        Ok(movies.list().await?)
    }
}

#[derive(Default)]
pub struct MovieMutation;

/// Manage the movie collection
#[Object]
impl MovieMutation {
    /// Add a movie to the collection.
    async fn add_movie(&self, ctx: &Context<'_>, movie: MovieInput) -> Result<Movie> {
        let movies = ctx.data::<Arc<Repository<Movie>>>()?;
        Ok(movies.create(movie).await?)
    }

    /// Update a movie in the collection.
    async fn update_movie(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "_id")] id: String,
        movie: MovieInput,
    ) -> Result<Movie> {
        let movies = ctx.data::<Arc<Repository<Movie>>>()?;
        Ok(movies.update(&id, movie).await?)
    }

    /// Delete a movie with _id from the collection.
    async fn delete_movie(&self, ctx: &Context<'_>, #[graphql(name = "_id")] id: String) -> Result<Movie> {
        let movies = ctx.data::<Arc<Repository<Movie>>>()?;
        Ok(movies.delete(&id).await?)
    }
}
