use crate::domain::{
    models::{AvatarUpload, ProcessedAvatar},
    AvatarError,
};

/// CPU-bound decode/normalize/encode step. Called from a blocking thread.
pub trait AvatarProcessor: Send + Sync + 'static {
    fn process(&self, upload: &AvatarUpload) -> Result<ProcessedAvatar, AvatarError>;
}
