use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{StorageKey, UserId};

pub const MAX_BIO_LENGTH: usize = 500;
pub const MAX_NAME_LENGTH: usize = 150;

/// A user's profile record, 1:1 with the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub avatar_key: Option<StorageKey>,
    pub followers_count: i32,
    pub following_count: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Partial update of the editable profile fields. Absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ProfileChanges {
    pub bio: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.bio.is_none() && self.first_name.is_none() && self.last_name.is_none()
    }

    /// Name of the first field over its length limit, counted in characters.
    pub fn oversized_field(&self) -> Option<&'static str> {
        let too_long =
            |value: &Option<String>, max: usize| value.as_ref().is_some_and(|v| v.chars().count() > max);

        if too_long(&self.bio, MAX_BIO_LENGTH) {
            Some("bio")
        } else if too_long(&self.first_name, MAX_NAME_LENGTH) {
            Some("first_name")
        } else if too_long(&self.last_name, MAX_NAME_LENGTH) {
            Some("last_name")
        } else {
            None
        }
    }
}

/// Public representation of a profile with the avatar resolved to a URL.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProfileView {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub avatar: Option<String>,
    pub followers_count: i32,
    pub following_count: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl ProfileView {
    pub fn new(profile: Profile, avatar: Option<String>) -> Self {
        Self {
            username: profile.username,
            email: profile.email,
            first_name: profile.first_name,
            last_name: profile.last_name,
            bio: profile.bio,
            avatar,
            followers_count: profile.followers_count,
            following_count: profile.following_count,
            created_at: profile.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_limits_count_characters() {
        let changes = ProfileChanges {
            bio: Some("é".repeat(MAX_BIO_LENGTH)),
            ..ProfileChanges::default()
        };
        assert_eq!(changes.oversized_field(), None);

        let changes = ProfileChanges {
            last_name: Some("x".repeat(MAX_NAME_LENGTH + 1)),
            ..ProfileChanges::default()
        };
        assert_eq!(changes.oversized_field(), Some("last_name"));
    }

    #[test]
    fn empty_changes_are_detected() {
        assert!(ProfileChanges::default().is_empty());
        assert!(!ProfileChanges {
            bio: Some(String::new()),
            ..ProfileChanges::default()
        }
        .is_empty());
    }
}
