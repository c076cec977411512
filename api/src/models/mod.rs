//! Database models and the response shapes built from them.
//!
//! Each entity module defines the raw table row (a [`sqlx::FromRow`]
//! struct), the create/update payloads accepted over HTTP, and a `*Detail`
//! struct pairing the row with its eagerly loaded relations. Rows serialize
//! with camelCase keys, matching what the admin panel expects.

pub mod adventure;
pub mod profile;
pub mod settings;
pub mod user;
pub mod user_adventure;

pub use adventure::{Adventure, AdventureDetail, CreateAdventure, UpdateAdventure};
pub use profile::{CreateUserProfile, UpdateUserProfile, UserProfile, UserProfileDetail};
pub use settings::{
    CreateUserSettings, SettingValue, SettingsDoc, UserSettings, UserSettingsDetail,
};
pub use user::{CreateUser, UpdateUser, User, UserDetail, UserSummary};
pub use user_adventure::{
    CreateUserAdventure, UpdateUserAdventure, UserAdventure, UserAdventureDetail,
};
