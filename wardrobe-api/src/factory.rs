//! Composition root — concrete factories for creating service instances.
//!
//! This is the ONLY place that imports concrete outbound adapters.

use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    adapters::outbound::{
        media::JpegAvatarProcessor, postgres::PostgresProfileRepository, s3::S3ObjectStorage,
    },
    app_state::AppState,
    auth::PostgresTokenAuthenticator,
    config::StorageSettings,
    domain::{services::AvatarServiceImpl, StorageError},
};

/// Wire the Postgres- and S3-backed services into an [`AppState`].
pub fn create_app_state(
    pool: PgPool,
    storage: &StorageSettings,
) -> Result<AppState, StorageError> {
    let avatar_service = AvatarServiceImpl::new(
        Arc::new(PostgresProfileRepository::new(pool.clone())),
        Arc::new(S3ObjectStorage::new(storage)?),
        Arc::new(JpegAvatarProcessor),
    );
    let authenticator = PostgresTokenAuthenticator::new(pool);

    Ok(AppState::new(
        Arc::new(avatar_service),
        Arc::new(authenticator),
    ))
}
