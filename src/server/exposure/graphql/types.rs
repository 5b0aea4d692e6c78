//! GraphQL object types and their relation resolvers
//!
//! Scalar fields map straight onto the stored record. Relation fields load
//! through the [`Store`] found in the request context, so the object graph
//! (User ↔ Post ↔ Profile ↔ MemberType, User ↔ User) is resolved lazily and
//! only as deep as the query asks.

use crate::core::{MemberType, MemberTypeId, Post, Profile, Store, User};
use async_graphql::{Context, ErrorExtensions, Object, Result};
use uuid::Uuid;

/// Fetch the store from the request context
pub(super) fn store<'a>(ctx: &Context<'a>) -> Result<&'a Store> {
    ctx.data::<Store>()
}

#[Object]
impl MemberType {
    async fn id(&self) -> MemberTypeId {
        self.id
    }

    async fn discount(&self) -> f64 {
        self.discount
    }

    async fn posts_limit_per_month(&self) -> i32 {
        self.posts_limit_per_month
    }
}

#[Object]
impl Post {
    async fn id(&self) -> Uuid {
        self.id
    }

    async fn title(&self) -> &str {
        &self.title
    }

    async fn content(&self) -> &str {
        &self.content
    }

    async fn author_id(&self) -> Uuid {
        self.author_id
    }
}

#[Object]
impl Profile {
    async fn id(&self) -> Uuid {
        self.id
    }

    async fn is_male(&self) -> bool {
        self.is_male
    }

    async fn year_of_birth(&self) -> i32 {
        self.year_of_birth
    }

    async fn user_id(&self) -> Uuid {
        self.user_id
    }

    async fn member_type_id(&self) -> MemberTypeId {
        self.member_type_id
    }

    /// Member type this profile belongs to
    async fn member_type(&self, ctx: &Context<'_>) -> Result<Option<MemberType>> {
        store(ctx)?
            .member_type(self.member_type_id)
            .await
            .map_err(|e| e.extend())
    }
}

#[Object]
impl User {
    async fn id(&self) -> Uuid {
        self.id
    }

    async fn name(&self) -> &str {
        &self.name
    }

    async fn balance(&self) -> f64 {
        self.balance
    }

    async fn profile(&self, ctx: &Context<'_>) -> Result<Option<Profile>> {
        store(ctx)?
            .profile_by_user(self.id)
            .await
            .map_err(|e| e.extend())
    }

    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<Post>> {
        store(ctx)?
            .posts_by_author(self.id)
            .await
            .map_err(|e| e.extend())
    }

    /// Users subscribed to this user
    async fn subscribed_to_user(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        store(ctx)?
            .subscribers_of(self.id)
            .await
            .map_err(|e| e.extend())
    }

    /// Users this user is subscribed to
    async fn user_subscribed_to(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        store(ctx)?
            .subscriptions_of(self.id)
            .await
            .map_err(|e| e.extend())
    }
}
