use async_trait::async_trait;

use crate::domain::{
    models::{AvatarReference, AvatarUpload, ProfileChanges, ProfileView, UserId},
    AvatarError,
};

#[async_trait]
pub trait AvatarService: Send + Sync + 'static {
    /// Validate, normalize and store `upload` as the user's only avatar.
    ///
    /// Either the user ends up with the new avatar, or nothing changes.
    async fn ingest(
        &self,
        user_id: &UserId,
        upload: Option<AvatarUpload>,
    ) -> Result<AvatarReference, AvatarError>;

    /// Same as [`AvatarService::ingest`], rendering the updated profile
    /// without reading it back after the commit.
    async fn upload_avatar(
        &self,
        user_id: &UserId,
        upload: Option<AvatarUpload>,
    ) -> Result<ProfileView, AvatarError>;

    async fn remove_avatar(&self, user_id: &UserId) -> Result<ProfileView, AvatarError>;

    async fn get_profile(&self, user_id: &UserId) -> Result<ProfileView, AvatarError>;

    async fn update_profile(
        &self,
        user_id: &UserId,
        changes: ProfileChanges,
    ) -> Result<ProfileView, AvatarError>;
}
