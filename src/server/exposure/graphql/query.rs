//! Query root

use super::types::store;
use crate::core::{MemberType, MemberTypeId, Post, Profile, User};
use async_graphql::{Context, ErrorExtensions, Object, Result};
use uuid::Uuid;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn member_types(&self, ctx: &Context<'_>) -> Result<Vec<MemberType>> {
        store(ctx)?.member_types().await.map_err(|e| e.extend())
    }

    async fn member_type(&self, ctx: &Context<'_>, id: MemberTypeId) -> Result<Option<MemberType>> {
        store(ctx)?.member_type(id).await.map_err(|e| e.extend())
    }

    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<Post>> {
        store(ctx)?.posts().await.map_err(|e| e.extend())
    }

    async fn post(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Post>> {
        store(ctx)?.post(id).await.map_err(|e| e.extend())
    }

    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        store(ctx)?.users().await.map_err(|e| e.extend())
    }

    async fn user(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<User>> {
        store(ctx)?.user(id).await.map_err(|e| e.extend())
    }

    async fn profiles(&self, ctx: &Context<'_>) -> Result<Vec<Profile>> {
        store(ctx)?.profiles().await.map_err(|e| e.extend())
    }

    async fn profile(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Profile>> {
        store(ctx)?.profile(id).await.map_err(|e| e.extend())
    }
}
