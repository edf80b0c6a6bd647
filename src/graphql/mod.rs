//! GraphQL schemas, one per entity collection.
//!
//! Each entity is compiled twice at startup: a full schema with mutations for
//! the write routes, and a read-only schema backing the `?query=` passthrough
//! on public GET routes.

mod format;
mod movie;
mod user;

pub use format::{FormatMutation, FormatQuery};
pub use movie::{MovieMutation, MovieQuery};
pub use user::{UserMutation, UserQuery};

use std::any::Any;

use async_graphql::{EmptyMutation, EmptySubscription, ObjectType, Schema, SchemaBuilder};

pub struct EntitySchema<Q, M> {
    pub full: Schema<Q, M, EmptySubscription>,
    pub read_only: Schema<Q, EmptyMutation, EmptySubscription>,
}

impl<Q, M> EntitySchema<Q, M>
where
    Q: ObjectType + Default + 'static,
    M: ObjectType + Default + 'static,
{
    /// Build both schemas with `repository` available to resolvers.
    pub fn new<D>(repository: D, introspection: bool) -> Self
    where
        D: Any + Clone + Send + Sync,
    {
        let full = finish(
            Schema::build(Q::default(), M::default(), EmptySubscription).data(repository.clone()),
            introspection,
        );
        let read_only = finish(
            Schema::build(Q::default(), EmptyMutation, EmptySubscription).data(repository),
            introspection,
        );

        Self { full, read_only }
    }
}

fn finish<Q, M>(builder: SchemaBuilder<Q, M, EmptySubscription>, introspection: bool) -> Schema<Q, M, EmptySubscription>
where
    Q: ObjectType + 'static,
    M: ObjectType + 'static,
{
    if introspection {
        builder.finish()
    } else {
        builder.disable_introspection().finish()
    }
}

pub type MovieSchema = EntitySchema<MovieQuery, MovieMutation>;
pub type FormatSchema = EntitySchema<FormatQuery, FormatMutation>;
pub type UserSchema = EntitySchema<UserQuery, UserMutation>;
