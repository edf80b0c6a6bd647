use std::sync::Arc;

use async_graphql::{Context, Object, Result};

use crate::database::models::{Format, FormatInput};
use crate::database::Repository;

#[derive(Default)]
pub struct FormatQuery;

#[Object]
impl FormatQuery {
    async fn format(&self, ctx: &Context<'_>, #[graphql(name = "_id")] id: Option<String>) -> Result<Option<Format>> {
        let Some(id) = id else {
            return Ok(None);
        };
        let formats = ctx.data::<Arc<Repository<Format>>>()?;
        Ok(formats.get(&id).await?)
    }

    async fn formats(&self, ctx: &Context<'_>) -> Result<Vec<Format>> {
        let formats = ctx.data::<Arc<Repository<Format>>>()?;
        Ok(formats.list().await?)
    }
}

#[derive(Default)]
pub struct FormatMutation;

/// Manage the formats movies can be filed under
#[Object]
impl FormatMutation {
    async fn add_format(&self, ctx: &Context<'_>, format: FormatInput) -> Result<Format> {
        let formats = ctx.data::<Arc<Repository<Format>>>()?;
        Ok(formats.create(format).await?)
    }

    async fn update_format(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "_id")] id: String,
        format: FormatInput,
    ) -> Result<Format> {
        let formats = ctx.data::<Arc<Repository<Format>>>()?;
        Ok(formats.update(&id, format).await?)
    }

    async fn delete_format(&self, ctx: &Context<'_>, #[graphql(name = "_id")] id: String) -> Result<Format> {
        let formats = ctx.data::<Arc<Repository<Format>>>()?;
        Ok(formats.delete(&id).await?)
    }
}
