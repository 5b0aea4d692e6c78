//! Core module containing records, the data-access traits and the store

pub mod entity;
pub mod error;
pub mod service;
pub mod store;

pub use entity::{
    ChangePostDto, ChangeProfileDto, ChangeUserDto, CreatePostDto, CreateProfileDto,
    CreateUserDto, MemberType, MemberTypeId, Post, Profile, Record, SubscriberOnAuthor, User,
};
pub use error::{ConfigError, StoreError};
pub use service::{DataService, StoreResult, SubscriptionService};
pub use store::Store;
