use serde::{Deserialize, Serialize};
use std::fmt;

use uuid::Uuid;

/// A validated user identifier.
///
/// Wraps i32 to match the database SERIAL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for UserId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<UserId> for i32 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// Location of an object in the object storage backend.
///
/// Avatar keys are namespaced by owner, e.g. `avatars/42/<uuid>.jpg`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Derive a fresh avatar key for `user_id`. Never returns the same key twice.
    pub fn for_avatar(user_id: &UserId) -> Self {
        Self(format!("avatars/{}/{}.jpg", user_id, Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for StorageKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}
