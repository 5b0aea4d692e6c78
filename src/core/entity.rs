//! Record types stored by the data-access layer
//!
//! Each record mirrors one table of the relational schema. Field names are
//! serialized in camelCase, and those names are also the keys accepted by
//! [`Record::field_value`] and [`DataService::find_by`](crate::core::DataService::find_by).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use uuid::Uuid;

/// Base trait for every stored record
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Primary key type
    type Id: Clone + Eq + Hash + fmt::Display + FromStr + Send + Sync + 'static;

    /// Resource name used in errors and as the storage discriminator
    fn resource_name() -> &'static str;

    /// Primary key of this record
    fn id(&self) -> Self::Id;

    /// String form of a field, used for equality lookups
    fn field_value(&self, field: &str) -> Option<String>;

    /// Fields that must be unique across all records of this type
    fn unique_fields() -> &'static [&'static str] {
        &[]
    }
}

/// Identifier of a member type
#[derive(
    async_graphql::Enum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[graphql(rename_items = "lowercase")]
pub enum MemberTypeId {
    Basic,
    Business,
}

impl MemberTypeId {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberTypeId::Basic => "basic",
            MemberTypeId::Business => "business",
        }
    }
}

impl fmt::Display for MemberTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberTypeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(MemberTypeId::Basic),
            "business" => Ok(MemberTypeId::Business),
            other => Err(format!("unknown member type id: {}", other)),
        }
    }
}

/// Membership tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberType {
    pub id: MemberTypeId,
    pub discount: f64,
    pub posts_limit_per_month: i32,
}

impl MemberType {
    /// The two tiers every database starts with
    pub fn defaults() -> Vec<MemberType> {
        vec![
            MemberType {
                id: MemberTypeId::Basic,
                discount: 2.3,
                posts_limit_per_month: 20,
            },
            MemberType {
                id: MemberTypeId::Business,
                discount: 7.7,
                posts_limit_per_month: 100,
            },
        ]
    }
}

impl Record for MemberType {
    type Id = MemberTypeId;

    fn resource_name() -> &'static str {
        "memberType"
    }

    fn id(&self) -> MemberTypeId {
        self.id
    }

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "discount" => Some(self.discount.to_string()),
            "postsLimitPerMonth" => Some(self.posts_limit_per_month.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub balance: f64,
}

impl User {
    pub fn new(name: impl Into<String>, balance: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            balance,
        }
    }
}

impl Record for User {
    type Id = Uuid;

    fn resource_name() -> &'static str {
        "user"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "name" => Some(self.name.clone()),
            "balance" => Some(self.balance.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub is_male: bool,
    pub year_of_birth: i32,
    pub user_id: Uuid,
    pub member_type_id: MemberTypeId,
}

impl Record for Profile {
    type Id = Uuid;

    fn resource_name() -> &'static str {
        "profile"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "isMale" => Some(self.is_male.to_string()),
            "yearOfBirth" => Some(self.year_of_birth.to_string()),
            "userId" => Some(self.user_id.to_string()),
            "memberTypeId" => Some(self.member_type_id.to_string()),
            _ => None,
        }
    }

    fn unique_fields() -> &'static [&'static str] {
        &["userId"]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
}

impl Record for Post {
    type Id = Uuid;

    fn resource_name() -> &'static str {
        "post"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "title" => Some(self.title.clone()),
            "content" => Some(self.content.clone()),
            "authorId" => Some(self.author_id.to_string()),
            _ => None,
        }
    }
}

/// Row of the subscriber/author join table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberOnAuthor {
    pub subscriber_id: Uuid,
    pub author_id: Uuid,
}

// =============================================================================
// Input DTOs
//
// Exposed to GraphQL as input objects; field names are camelCased there.
// =============================================================================

#[derive(async_graphql::InputObject, Debug, Clone)]
#[graphql(name = "CreateUserInput")]
pub struct CreateUserDto {
    pub name: String,
    pub balance: f64,
}

impl CreateUserDto {
    pub fn into_record(self) -> User {
        User::new(self.name, self.balance)
    }
}

#[derive(async_graphql::InputObject, Debug, Clone)]
#[graphql(name = "CreatePostInput")]
pub struct CreatePostDto {
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
}

impl CreatePostDto {
    pub fn into_record(self) -> Post {
        Post {
            id: Uuid::new_v4(),
            title: self.title,
            content: self.content,
            author_id: self.author_id,
        }
    }
}

#[derive(async_graphql::InputObject, Debug, Clone)]
#[graphql(name = "CreateProfileInput")]
pub struct CreateProfileDto {
    pub is_male: bool,
    pub year_of_birth: i32,
    pub member_type_id: MemberTypeId,
    pub user_id: Uuid,
}

impl CreateProfileDto {
    pub fn into_record(self) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            is_male: self.is_male,
            year_of_birth: self.year_of_birth,
            user_id: self.user_id,
            member_type_id: self.member_type_id,
        }
    }
}

/// Partial update of a user; absent fields are left untouched
#[derive(async_graphql::InputObject, Debug, Clone, Default)]
#[graphql(name = "ChangeUserInput")]
pub struct ChangeUserDto {
    pub name: Option<String>,
    pub balance: Option<f64>,
}

impl ChangeUserDto {
    pub fn apply(self, mut user: User) -> User {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(balance) = self.balance {
            user.balance = balance;
        }
        user
    }
}

#[derive(async_graphql::InputObject, Debug, Clone, Default)]
#[graphql(name = "ChangePostInput")]
pub struct ChangePostDto {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl ChangePostDto {
    pub fn apply(self, mut post: Post) -> Post {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        post
    }
}

#[derive(async_graphql::InputObject, Debug, Clone, Default)]
#[graphql(name = "ChangeProfileInput")]
pub struct ChangeProfileDto {
    pub is_male: Option<bool>,
    pub year_of_birth: Option<i32>,
    pub member_type_id: Option<MemberTypeId>,
}

impl ChangeProfileDto {
    pub fn apply(self, mut profile: Profile) -> Profile {
        if let Some(is_male) = self.is_male {
            profile.is_male = is_male;
        }
        if let Some(year) = self.year_of_birth {
            profile.year_of_birth = year;
        }
        if let Some(member_type_id) = self.member_type_id {
            profile.member_type_id = member_type_id;
        }
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_type_id_round_trips_lowercase() {
        let json = serde_json::to_value(MemberTypeId::Business).unwrap();
        assert_eq!(json, serde_json::json!("business"));
        assert_eq!("basic".parse::<MemberTypeId>().unwrap(), MemberTypeId::Basic);
        assert!("BASIC".parse::<MemberTypeId>().is_err());
    }

    #[test]
    fn test_records_serialize_camel_case() {
        let post = Post {
            id: Uuid::new_v4(),
            title: "t".into(),
            content: "c".into(),
            author_id: Uuid::nil(),
        };
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["authorId"], serde_json::json!(Uuid::nil().to_string()));
        assert_eq!(post.field_value("authorId"), Some(Uuid::nil().to_string()));
    }

    #[test]
    fn test_change_dto_only_touches_present_fields() {
        let user = User::new("Alice", 10.0);
        let changed = ChangeUserDto {
            name: None,
            balance: Some(42.5),
        }
        .apply(user.clone());

        assert_eq!(changed.id, user.id);
        assert_eq!(changed.name, "Alice");
        assert_eq!(changed.balance, 42.5);
    }

    #[test]
    fn test_default_member_types() {
        let defaults = MemberType::defaults();
        assert_eq!(defaults.len(), 2);
        assert_eq!(defaults[0].posts_limit_per_month, 20);
        assert_eq!(defaults[1].id, MemberTypeId::Business);
    }

    #[test]
    fn test_profile_user_id_is_unique_field() {
        assert_eq!(Profile::unique_fields(), &["userId"]);
        assert!(User::unique_fields().is_empty());
    }
}
