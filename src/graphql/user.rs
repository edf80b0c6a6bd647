use std::sync::Arc;

use async_graphql::{Context, Object, Result};

use crate::database::models::{User, UserInput};
use crate::database::Repository;

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    async fn user(&self, ctx: &Context<'_>, #[graphql(name = "_id")] id: Option<String>) -> Result<Option<User>> {
        let Some(id) = id else {
            return Ok(None);
        };
        let users = ctx.data::<Arc<Repository<User>>>()?;
        Ok(users.get(&id).await?)
    }

    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let users = ctx.data::<Arc<Repository<User>>>()?;
        Ok(users.list().await?)
    }
}

#[derive(Default)]
pub struct UserMutation;

/// Manage the users that manage the collection
#[Object]
impl UserMutation {
    /// Add a user. The password is stored hashed.
    async fn add_user(&self, ctx: &Context<'_>, user: UserInput) -> Result<User> {
        let users = ctx.data::<Arc<Repository<User>>>()?;
        Ok(users.create(user).await?)
    }

    /// Update a user, re-hashing the password.
    async fn update_user(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "_id")] id: String,
        user: UserInput,
    ) -> Result<User> {
        let users = ctx.data::<Arc<Repository<User>>>()?;
        Ok(users.update(&id, user).await?)
    }

    async fn delete_user(&self, ctx: &Context<'_>, #[graphql(name = "_id")] id: String) -> Result<User> {
        let users = ctx.data::<Arc<Repository<User>>>()?;
        Ok(users.delete(&id).await?)
    }
}
