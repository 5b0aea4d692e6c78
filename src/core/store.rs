//! The data-access client handed to every resolver
//!
//! `Store` bundles one [`DataService`] per record type plus the
//! [`SubscriptionService`], and enforces the relational rules a database
//! schema would: foreign keys on create/change, the one-profile-per-user
//! constraint, and cascading deletes for users.

use crate::core::entity::{
    ChangePostDto, ChangeProfileDto, ChangeUserDto, CreatePostDto, CreateProfileDto,
    CreateUserDto, MemberType, MemberTypeId, Post, Profile, Record, User,
};
use crate::core::error::StoreError;
use crate::core::service::{DataService, StoreResult, SubscriptionService};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn DataService<User>>,
    pub posts: Arc<dyn DataService<Post>>,
    pub profiles: Arc<dyn DataService<Profile>>,
    pub member_types: Arc<dyn DataService<MemberType>>,
    pub subscriptions: Arc<dyn SubscriptionService>,
}

impl Store {
    pub fn new(
        users: Arc<dyn DataService<User>>,
        posts: Arc<dyn DataService<Post>>,
        profiles: Arc<dyn DataService<Profile>>,
        member_types: Arc<dyn DataService<MemberType>>,
        subscriptions: Arc<dyn SubscriptionService>,
    ) -> Self {
        Self {
            users,
            posts,
            profiles,
            member_types,
            subscriptions,
        }
    }

    /// Insert the default member types that are not stored yet
    pub async fn seed_member_types(&self) -> StoreResult<()> {
        for member_type in MemberType::defaults() {
            if self.member_types.get(&member_type.id).await?.is_none() {
                tracing::debug!(id = %member_type.id, "Seeding member type");
                self.member_types.create(member_type).await?;
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    pub async fn member_types(&self) -> StoreResult<Vec<MemberType>> {
        self.member_types.list().await
    }

    pub async fn member_type(&self, id: MemberTypeId) -> StoreResult<Option<MemberType>> {
        self.member_types.get(&id).await
    }

    pub async fn users(&self) -> StoreResult<Vec<User>> {
        self.users.list().await
    }

    pub async fn user(&self, id: Uuid) -> StoreResult<Option<User>> {
        self.users.get(&id).await
    }

    pub async fn posts(&self) -> StoreResult<Vec<Post>> {
        self.posts.list().await
    }

    pub async fn post(&self, id: Uuid) -> StoreResult<Option<Post>> {
        self.posts.get(&id).await
    }

    pub async fn posts_by_author(&self, author_id: Uuid) -> StoreResult<Vec<Post>> {
        self.posts
            .find_by("authorId", &author_id.to_string())
            .await
    }

    pub async fn profiles(&self) -> StoreResult<Vec<Profile>> {
        self.profiles.list().await
    }

    pub async fn profile(&self, id: Uuid) -> StoreResult<Option<Profile>> {
        self.profiles.get(&id).await
    }

    pub async fn profile_by_user(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        let found = self
            .profiles
            .find_by("userId", &user_id.to_string())
            .await?;
        Ok(found.into_iter().next())
    }

    /// Users subscribed to `author_id`
    pub async fn subscribers_of(&self, author_id: Uuid) -> StoreResult<Vec<User>> {
        let ids = self.subscriptions.subscribers_of(&author_id).await?;
        self.users_by_ids(ids).await
    }

    /// Users `subscriber_id` is subscribed to
    pub async fn subscriptions_of(&self, subscriber_id: Uuid) -> StoreResult<Vec<User>> {
        let ids = self.subscriptions.subscriptions_of(&subscriber_id).await?;
        self.users_by_ids(ids).await
    }

    async fn users_by_ids(&self, ids: Vec<Uuid>) -> StoreResult<Vec<User>> {
        let mut users = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(user) = self.users.get(&id).await? {
                users.push(user);
            }
        }
        Ok(users)
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    pub async fn create_user(&self, dto: CreateUserDto) -> StoreResult<User> {
        let user = self.users.create(dto.into_record()).await?;
        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    pub async fn create_post(&self, dto: CreatePostDto) -> StoreResult<Post> {
        self.require_user::<Post>(dto.author_id, "authorId").await?;
        let post = self.posts.create(dto.into_record()).await?;
        tracing::info!(post_id = %post.id, author_id = %post.author_id, "Post created");
        Ok(post)
    }

    pub async fn create_profile(&self, dto: CreateProfileDto) -> StoreResult<Profile> {
        self.require_user::<Profile>(dto.user_id, "userId").await?;
        self.require_member_type(dto.member_type_id).await?;
        if self.profile_by_user(dto.user_id).await?.is_some() {
            return Err(StoreError::AlreadyExists {
                resource: Profile::resource_name(),
                field: "userId",
                value: dto.user_id.to_string(),
            });
        }
        let profile = self.profiles.create(dto.into_record()).await?;
        tracing::info!(profile_id = %profile.id, user_id = %profile.user_id, "Profile created");
        Ok(profile)
    }

    pub async fn change_user(&self, id: Uuid, dto: ChangeUserDto) -> StoreResult<User> {
        let current = self
            .users
            .get(&id)
            .await?
            .ok_or_else(|| StoreError::not_found(User::resource_name(), id))?;
        self.users.update(&id, dto.apply(current)).await
    }

    pub async fn change_post(&self, id: Uuid, dto: ChangePostDto) -> StoreResult<Post> {
        let current = self
            .posts
            .get(&id)
            .await?
            .ok_or_else(|| StoreError::not_found(Post::resource_name(), id))?;
        self.posts.update(&id, dto.apply(current)).await
    }

    pub async fn change_profile(&self, id: Uuid, dto: ChangeProfileDto) -> StoreResult<Profile> {
        let current = self
            .profiles
            .get(&id)
            .await?
            .ok_or_else(|| StoreError::not_found(Profile::resource_name(), id))?;
        if let Some(member_type_id) = dto.member_type_id {
            self.require_member_type(member_type_id).await?;
        }
        self.profiles.update(&id, dto.apply(current)).await
    }

    /// Delete a user together with their profile, posts and subscriptions
    pub async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        if self.users.get(&id).await?.is_none() {
            return Ok(false);
        }

        if let Some(profile) = self.profile_by_user(id).await? {
            self.profiles.delete(&profile.id).await?;
        }
        for post in self.posts_by_author(id).await? {
            self.posts.delete(&post.id).await?;
        }
        self.subscriptions.delete_by_user(&id).await?;

        let deleted = self.users.delete(&id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(deleted)
    }

    pub async fn delete_post(&self, id: Uuid) -> StoreResult<bool> {
        self.posts.delete(&id).await
    }

    pub async fn delete_profile(&self, id: Uuid) -> StoreResult<bool> {
        self.profiles.delete(&id).await
    }

    /// Make `user_id` a subscriber of `author_id` and return the subscriber
    pub async fn subscribe_to(&self, user_id: Uuid, author_id: Uuid) -> StoreResult<User> {
        if user_id == author_id {
            return Err(StoreError::Invalid {
                resource: "subscription",
                message: "a user cannot subscribe to themself".to_string(),
            });
        }
        let subscriber = self.require_user::<User>(user_id, "subscriberId").await?;
        self.require_user::<User>(author_id, "authorId").await?;

        self.subscriptions.subscribe(&user_id, &author_id).await?;
        tracing::info!(subscriber_id = %user_id, author_id = %author_id, "Subscribed");
        Ok(subscriber)
    }

    pub async fn unsubscribe_from(&self, user_id: Uuid, author_id: Uuid) -> StoreResult<bool> {
        self.subscriptions.unsubscribe(&user_id, &author_id).await
    }

    async fn require_user<R: Record>(&self, id: Uuid, field: &'static str) -> StoreResult<User> {
        self.users
            .get(&id)
            .await?
            .ok_or_else(|| StoreError::ForeignKey {
                resource: R::resource_name(),
                field,
                value: id.to_string(),
            })
    }

    async fn require_member_type(&self, id: MemberTypeId) -> StoreResult<MemberType> {
        self.member_types
            .get(&id)
            .await?
            .ok_or_else(|| StoreError::ForeignKey {
                resource: Profile::resource_name(),
                field: "memberTypeId",
                value: id.to_string(),
            })
    }
}
