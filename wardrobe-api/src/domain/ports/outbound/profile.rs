use async_trait::async_trait;

use crate::domain::{
    models::{Profile, ProfileChanges, StorageKey, UserId},
    RepositoryError,
};

#[async_trait]
pub trait ProfileRepository: Send + Sync + 'static {
    /// Fetch the user's profile, creating an empty one if absent.
    async fn get_or_create(&self, user_id: &UserId) -> Result<Profile, RepositoryError>;

    /// Atomically set the avatar key and return the key it replaced.
    ///
    /// Concurrent callers each receive a distinct previous key, so every
    /// replaced object is handed to exactly one caller for cleanup.
    async fn replace_avatar_key(
        &self,
        user_id: &UserId,
        key: Option<&StorageKey>,
    ) -> Result<Option<StorageKey>, RepositoryError>;

    /// Apply `changes` to an existing profile and its account names.
    async fn update_details(
        &self,
        user_id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Profile, RepositoryError>;
}
