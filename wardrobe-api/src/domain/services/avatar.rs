use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::domain::{
    models::{
        AvatarReference, AvatarUpload, Profile, ProfileChanges, ProfileView, StorageKey, UserId,
    },
    ports::{
        inbound::AvatarService,
        outbound::{AvatarProcessor, ObjectStorage, ProfileRepository},
    },
    AvatarError,
};

const MAX_AVATAR_SIZE: usize = 5 * 1024 * 1024;

pub struct AvatarServiceImpl<R, S, P> {
    repository: Arc<R>,
    storage: Arc<S>,
    processor: Arc<P>,
}

impl<R, S, P> AvatarServiceImpl<R, S, P>
where
    R: ProfileRepository,
    S: ObjectStorage,
    P: AvatarProcessor,
{
    pub fn new(repository: Arc<R>, storage: Arc<S>, processor: Arc<P>) -> Self {
        Self {
            repository,
            storage,
            processor,
        }
    }

    fn validate(&self, upload: Option<AvatarUpload>) -> Result<AvatarUpload, AvatarError> {
        let upload = upload.ok_or(AvatarError::MissingFile)?;

        if !upload.declares_image() {
            return Err(AvatarError::InvalidFileType);
        }

        if upload.len() > MAX_AVATAR_SIZE {
            return Err(AvatarError::FileTooLarge);
        }

        if !self.storage.is_configured() {
            return Err(AvatarError::StorageUnavailable);
        }

        Ok(upload)
    }

    /// Runs the whole pipeline and returns the profile as loaded before the
    /// commit, already pointing at the new key.
    async fn store(
        &self,
        user_id: &UserId,
        upload: Option<AvatarUpload>,
    ) -> Result<(Profile, AvatarReference), AvatarError> {
        let upload = self.validate(upload)?;

        let processor = Arc::clone(&self.processor);
        let processed = tokio::task::spawn_blocking(move || processor.process(&upload))
            .await
            .map_err(|err| AvatarError::Processing(format!("avatar processing task failed: {err}")))??;

        let mut profile = self.repository.get_or_create(user_id).await?;

        // New object first, then the reference swap, then cleanup of the old
        // object. The user always has a servable avatar at every step.
        let key = StorageKey::for_avatar(user_id);
        let size = processed.bytes.len();
        self.storage
            .put(&key, processed.bytes, &processed.mime_type)
            .await
            .map_err(|err| AvatarError::StorageWriteFailed(err.to_string()))?;

        let previous = match self.repository.replace_avatar_key(user_id, Some(&key)).await {
            Ok(previous) => previous,
            Err(err) => {
                tracing::error!(key = %key, "failed to point profile at new avatar: {}", err);
                self.discard(&key).await;
                return Err(err.into());
            }
        };

        if let Some(previous) = previous.filter(|previous| previous != &key) {
            self.discard(&previous).await;
        }

        tracing::info!(
            key = %key,
            size,
            width = processed.width,
            height = processed.height,
            file_name = %processed.file_name,
            "avatar updated"
        );

        let url = self.resolve_url(&key);
        profile.avatar_key = Some(key.clone());
        Ok((profile, AvatarReference { key, url }))
    }

    /// Best-effort removal of an object that is no longer referenced.
    async fn discard(&self, key: &StorageKey) {
        if let Err(err) = self.storage.delete(key).await {
            let err = AvatarError::StorageDeleteFailed(err.to_string());
            tracing::warn!(key = %key, "orphaned avatar object left behind: {}", err);
        }
    }

    fn resolve_url(&self, key: &StorageKey) -> Option<String> {
        match self.storage.url_for(key) {
            Ok(url) => Some(url),
            Err(err) => {
                tracing::error!(key = %key, "failed to derive avatar url: {}", err);
                None
            }
        }
    }

    fn render(&self, profile: Profile) -> ProfileView {
        let avatar = profile
            .avatar_key
            .as_ref()
            .and_then(|key| self.resolve_url(key));

        ProfileView::new(profile, avatar)
    }
}

#[async_trait]
impl<R, S, P> AvatarService for AvatarServiceImpl<R, S, P>
where
    R: ProfileRepository,
    S: ObjectStorage,
    P: AvatarProcessor,
{
    #[instrument(skip(self, upload), fields(user_id = %user_id))]
    async fn ingest(
        &self,
        user_id: &UserId,
        upload: Option<AvatarUpload>,
    ) -> Result<AvatarReference, AvatarError> {
        let (_, reference) = self.store(user_id, upload).await?;
        Ok(reference)
    }

    #[instrument(skip(self, upload), fields(user_id = %user_id))]
    async fn upload_avatar(
        &self,
        user_id: &UserId,
        upload: Option<AvatarUpload>,
    ) -> Result<ProfileView, AvatarError> {
        let (profile, reference) = self.store(user_id, upload).await?;
        Ok(ProfileView::new(profile, reference.url))
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn remove_avatar(&self, user_id: &UserId) -> Result<ProfileView, AvatarError> {
        let mut profile = self.repository.get_or_create(user_id).await?;

        if let Some(previous) = self.repository.replace_avatar_key(user_id, None).await? {
            self.discard(&previous).await;
            tracing::info!(key = %previous, "avatar removed");
        }

        profile.avatar_key = None;
        Ok(ProfileView::new(profile, None))
    }

    async fn get_profile(&self, user_id: &UserId) -> Result<ProfileView, AvatarError> {
        let profile = self.repository.get_or_create(user_id).await?;
        Ok(self.render(profile))
    }

    #[instrument(skip(self, changes), fields(user_id = %user_id))]
    async fn update_profile(
        &self,
        user_id: &UserId,
        changes: ProfileChanges,
    ) -> Result<ProfileView, AvatarError> {
        if let Some(field) = changes.oversized_field() {
            return Err(AvatarError::FieldTooLong(field));
        }

        let profile = self.repository.get_or_create(user_id).await?;
        if changes.is_empty() {
            return Ok(self.render(profile));
        }

        let profile = self.repository.update_details(user_id, &changes).await?;
        tracing::info!("profile details updated");

        Ok(self.render(profile))
    }
}
