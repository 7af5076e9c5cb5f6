use serde::Serialize;

use super::StorageKey;

/// Content type of every stored avatar.
pub const AVATAR_MIME_TYPE: &str = "image/jpeg";

/// A raw avatar upload as received from the client. Lives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    pub bytes: Vec<u8>,
    /// MIME type declared by the client, not verified against the bytes.
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

impl AvatarUpload {
    pub fn new(bytes: Vec<u8>, content_type: Option<String>) -> Self {
        Self {
            bytes,
            content_type,
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the declared content type is an `image/*` type.
    pub fn declares_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|content_type| content_type.to_ascii_lowercase().starts_with("image/"))
    }
}

/// A normalized avatar ready to be written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedAvatar {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

/// Where a freshly ingested avatar lives.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AvatarReference {
    pub key: StorageKey,
    /// `None` when the storage backend could not derive a public URL.
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_content_types_are_recognized() {
        let upload = AvatarUpload::new(vec![1], Some("image/png".to_string()));
        assert!(upload.declares_image());

        let upload = AvatarUpload::new(vec![1], Some("Image/JPEG".to_string()));
        assert!(upload.declares_image());
    }

    #[test]
    fn non_image_content_types_are_rejected() {
        let upload = AvatarUpload::new(vec![1], Some("text/plain".to_string()));
        assert!(!upload.declares_image());

        let upload = AvatarUpload::new(vec![1], None);
        assert!(!upload.declares_image());
    }
}
