use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use time::OffsetDateTime;

use crate::domain::{
    models::{Profile, ProfileChanges, StorageKey, UserId},
    ports::outbound::ProfileRepository,
    RepositoryError,
};

#[derive(Clone)]
struct Account {
    username: String,
    email: String,
    first_name: String,
    last_name: String,
}

/// Profile store backed by HashMaps. Only registered accounts get profiles.
#[derive(Clone)]
pub struct InMemoryProfileRepository {
    accounts: Arc<RwLock<HashMap<UserId, Account>>>,
    profiles: Arc<RwLock<HashMap<UserId, Profile>>>,
    fail_updates: Arc<AtomicBool>,
    reads_left: Arc<AtomicUsize>,
}

impl Default for InMemoryProfileRepository {
    fn default() -> Self {
        Self {
            accounts: Arc::default(),
            profiles: Arc::default(),
            fail_updates: Arc::default(),
            reads_left: Arc::new(AtomicUsize::new(usize::MAX)),
        }
    }
}

#[allow(dead_code)]
impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account that profiles can be created for.
    pub fn with_user(self, user_id: UserId, username: &str) -> Self {
        self.accounts.write().unwrap().insert(
            user_id,
            Account {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                first_name: String::new(),
                last_name: String::new(),
            },
        );
        self
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Let the next `reads` profile reads succeed, then fail every one after.
    pub fn fail_reads_after(&self, reads: usize) {
        self.reads_left.store(reads, Ordering::SeqCst);
    }

    pub fn avatar_key(&self, user_id: &UserId) -> Option<StorageKey> {
        self.profiles
            .read()
            .unwrap()
            .get(user_id)
            .and_then(|profile| profile.avatar_key.clone())
    }

    pub fn has_profile(&self, user_id: &UserId) -> bool {
        self.profiles.read().unwrap().contains_key(user_id)
    }

    fn check_update(&self) -> Result<(), RepositoryError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(
                "simulated update failure".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn get_or_create(&self, user_id: &UserId) -> Result<Profile, RepositoryError> {
        let allowed = self
            .reads_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1));
        if allowed.is_err() {
            return Err(RepositoryError::Database("simulated read failure".to_string()));
        }

        let account = self
            .accounts
            .read()
            .unwrap()
            .get(user_id)
            .cloned()
            .ok_or(RepositoryError::UserNotFound(*user_id))?;

        let mut profiles = self.profiles.write().unwrap();
        let profile = profiles.entry(*user_id).or_insert_with(|| {
            let now = OffsetDateTime::now_utc();
            Profile {
                user_id: *user_id,
                username: account.username,
                email: account.email,
                first_name: account.first_name,
                last_name: account.last_name,
                bio: String::new(),
                avatar_key: None,
                followers_count: 0,
                following_count: 0,
                created_at: now,
                updated_at: now,
            }
        });

        Ok(profile.clone())
    }

    async fn replace_avatar_key(
        &self,
        user_id: &UserId,
        key: Option<&StorageKey>,
    ) -> Result<Option<StorageKey>, RepositoryError> {
        self.check_update()?;

        let mut profiles = self.profiles.write().unwrap();
        let profile = profiles
            .get_mut(user_id)
            .ok_or(RepositoryError::UserNotFound(*user_id))?;

        profile.updated_at = OffsetDateTime::now_utc();
        Ok(std::mem::replace(&mut profile.avatar_key, key.cloned()))
    }

    async fn update_details(
        &self,
        user_id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Profile, RepositoryError> {
        self.check_update()?;

        let mut profiles = self.profiles.write().unwrap();
        let profile = profiles
            .get_mut(user_id)
            .ok_or(RepositoryError::UserNotFound(*user_id))?;

        if let Some(bio) = &changes.bio {
            profile.bio.clone_from(bio);
        }
        if let Some(first_name) = &changes.first_name {
            profile.first_name.clone_from(first_name);
        }
        if let Some(last_name) = &changes.last_name {
            profile.last_name.clone_from(last_name);
        }
        profile.updated_at = OffsetDateTime::now_utc();

        Ok(profile.clone())
    }
}
