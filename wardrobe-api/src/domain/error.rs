use thiserror::Error;

use super::models::UserId;

/// Errors that can occur while ingesting or removing an avatar.
#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("no image file provided")]
    MissingFile,
    #[error("file must be an image")]
    InvalidFileType,
    #[error("image size must be at most 5 MiB")]
    FileTooLarge,
    #[error("avatar storage is not configured")]
    StorageUnavailable,
    #[error("file could not be decoded as an image")]
    DecodeError,
    #[error("user not found")]
    UserNotFound,
    #[error("{0} is too long")]
    FieldTooLong(&'static str),
    #[error("failed to write avatar to storage: {0}")]
    StorageWriteFailed(String),
    /// Never returned from ingestion; old objects are cleaned up best-effort.
    #[error("failed to delete avatar from storage: {0}")]
    StorageDeleteFailed(String),
    #[error("failed to update profile: {0}")]
    ProfileUpdateFailed(String),
    #[error("avatar processing failed: {0}")]
    Processing(String),
}

impl AvatarError {
    /// Whether the error was caused by the request rather than the environment.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingFile
                | Self::InvalidFileType
                | Self::FileTooLarge
                | Self::DecodeError
                | Self::UserNotFound
                | Self::FieldTooLong(_)
        )
    }
}

/// Errors reported by an object storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend is not configured")]
    NotConfigured,
    #[error("storage request failed: {0}")]
    Request(String),
    #[error("invalid object url: {0}")]
    InvalidUrl(String),
}

/// Errors reported by the profile persistence layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("user {0} not found")]
    UserNotFound(UserId),
    #[error("database error: {0}")]
    Database(String),
}

impl From<RepositoryError> for AvatarError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UserNotFound(_) => Self::UserNotFound,
            RepositoryError::Database(message) => Self::ProfileUpdateFailed(message),
        }
    }
}
