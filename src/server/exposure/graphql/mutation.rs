//! Mutation root

use super::types::store;
use crate::core::{
    ChangePostDto, ChangeProfileDto, ChangeUserDto, CreatePostDto, CreateProfileDto,
    CreateUserDto, Post, Profile, User,
};
use async_graphql::{Context, ErrorExtensions, Object, Result};
use uuid::Uuid;

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_user(&self, ctx: &Context<'_>, dto: CreateUserDto) -> Result<User> {
        store(ctx)?.create_user(dto).await.map_err(|e| e.extend())
    }

    async fn create_post(&self, ctx: &Context<'_>, dto: CreatePostDto) -> Result<Post> {
        store(ctx)?.create_post(dto).await.map_err(|e| e.extend())
    }

    async fn create_profile(&self, ctx: &Context<'_>, dto: CreateProfileDto) -> Result<Profile> {
        store(ctx)?.create_profile(dto).await.map_err(|e| e.extend())
    }

    async fn change_user(&self, ctx: &Context<'_>, id: Uuid, dto: ChangeUserDto) -> Result<User> {
        store(ctx)?.change_user(id, dto).await.map_err(|e| e.extend())
    }

    async fn change_post(&self, ctx: &Context<'_>, id: Uuid, dto: ChangePostDto) -> Result<Post> {
        store(ctx)?.change_post(id, dto).await.map_err(|e| e.extend())
    }

    async fn change_profile(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        dto: ChangeProfileDto,
    ) -> Result<Profile> {
        store(ctx)?
            .change_profile(id, dto)
            .await
            .map_err(|e| e.extend())
    }

    /// Delete a user with their profile, posts and subscriptions
    async fn delete_user(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        store(ctx)?.delete_user(id).await.map_err(|e| e.extend())
    }

    async fn delete_post(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        store(ctx)?.delete_post(id).await.map_err(|e| e.extend())
    }

    async fn delete_profile(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        store(ctx)?.delete_profile(id).await.map_err(|e| e.extend())
    }

    /// Subscribe `user_id` to `author_id`; returns the subscriber
    async fn subscribe_to(&self, ctx: &Context<'_>, user_id: Uuid, author_id: Uuid) -> Result<User> {
        store(ctx)?
            .subscribe_to(user_id, author_id)
            .await
            .map_err(|e| e.extend())
    }

    async fn unsubscribe_from(
        &self,
        ctx: &Context<'_>,
        user_id: Uuid,
        author_id: Uuid,
    ) -> Result<bool> {
        store(ctx)?
            .unsubscribe_from(user_id, author_id)
            .await
            .map_err(|e| e.extend())
    }
}
