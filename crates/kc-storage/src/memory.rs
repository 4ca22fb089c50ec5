//! In-memory user storage.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use kc_model::User;

use crate::error::{StorageError, StorageResult};
use crate::user::UserProvider;

/// In-memory user provider backed by a concurrent map.
///
/// Suitable for tests and single-node setups without a database. Writes to
/// a single user are atomic; nothing spans more than one call.
///
/// Usernames are claimed in a separate index before the user is inserted,
/// so concurrent creates with the same username cannot both succeed.
#[derive(Debug, Default)]
pub struct InMemoryUserProvider {
    /// Users keyed by `(realm_id, user_id)`.
    users: DashMap<(String, String), User>,

    /// User IDs keyed by `(realm_id, username)`.
    usernames: DashMap<(String, String), String>,
}

impl InMemoryUserProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider pre-populated with users.
    ///
    /// Later users replace earlier ones with the same realm and ID.
    pub fn with_users<I>(users: I) -> Self
    where
        I: IntoIterator<Item = User>,
    {
        let provider = Self::new();
        for user in users {
            let username_key = Self::key(&user.realm_id, &user.username);
            let id = user.id.clone();
            if let Some(replaced) = provider
                .users
                .insert(Self::key(&user.realm_id, &user.id), user)
            {
                provider
                    .usernames
                    .remove(&Self::key(&replaced.realm_id, &replaced.username));
            }
            provider.usernames.insert(username_key, id);
        }
        provider
    }

    /// Returns the number of stored users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns whether no users are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn key(realm_id: &str, value: &str) -> (String, String) {
        (realm_id.to_string(), value.to_string())
    }

    /// Reserves `username` for `user_id`.
    ///
    /// Returns `false` if the user already held the name.
    fn claim_username(
        &self,
        realm_id: &str,
        username: &str,
        user_id: &str,
    ) -> StorageResult<bool> {
        match self.usernames.entry(Self::key(realm_id, username)) {
            Entry::Occupied(holder) if holder.get() != user_id => {
                Err(StorageError::duplicate("User", "username", username))
            }
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(user_id.to_string());
                Ok(true)
            }
        }
    }

    fn release_username(&self, realm_id: &str, username: &str, user_id: &str) {
        self.usernames
            .remove_if(&Self::key(realm_id, username), |_, holder| holder == user_id);
    }
}

#[async_trait]
impl UserProvider for InMemoryUserProvider {
    async fn create(&self, user: &User) -> StorageResult<()> {
        let key = Self::key(&user.realm_id, &user.id);
        if self.users.contains_key(&key) {
            return Err(StorageError::duplicate("User", "id", &user.id));
        }

        let claimed = self.claim_username(&user.realm_id, &user.username, &user.id)?;

        match self.users.entry(key) {
            Entry::Occupied(_) => {
                if claimed {
                    self.release_username(&user.realm_id, &user.username, &user.id);
                }
                Err(StorageError::duplicate("User", "id", &user.id))
            }
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(())
            }
        }
    }

    async fn update(&self, user: &User) -> StorageResult<()> {
        let mut stored = self
            .users
            .get_mut(&Self::key(&user.realm_id, &user.id))
            .ok_or_else(|| StorageError::not_found("User", &user.id))?;

        if stored.username != user.username {
            self.claim_username(&user.realm_id, &user.username, &user.id)?;
            self.release_username(&stored.realm_id, &stored.username, &stored.id);
        }

        *stored = user.clone();
        stored.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, realm_id: &str, id: &str) -> StorageResult<()> {
        let (_, user) = self
            .users
            .remove(&Self::key(realm_id, id))
            .ok_or_else(|| StorageError::not_found("User", id))?;
        self.release_username(realm_id, &user.username, id);
        Ok(())
    }

    async fn get_by_id(&self, realm_id: &str, id: &str) -> StorageResult<Option<User>> {
        Ok(self
            .users
            .get(&Self::key(realm_id, id))
            .map(|u| u.value().clone()))
    }

    async fn get_by_username(
        &self,
        realm_id: &str,
        username: &str,
    ) -> StorageResult<Option<User>> {
        let Some(id) = self
            .usernames
            .get(&Self::key(realm_id, username))
            .map(|id| id.value().clone())
        else {
            return Ok(None);
        };
        self.get_by_id(realm_id, &id).await
    }

    async fn set_attribute(
        &self,
        realm_id: &str,
        user_id: &str,
        name: &str,
        values: Vec<String>,
    ) -> StorageResult<()> {
        let mut user = self
            .users
            .get_mut(&Self::key(realm_id, user_id))
            .ok_or_else(|| StorageError::not_found("User", user_id))?;
        user.set_attribute(name, values);
        Ok(())
    }

    async fn remove_attribute(
        &self,
        realm_id: &str,
        user_id: &str,
        name: &str,
    ) -> StorageResult<()> {
        let mut user = self
            .users
            .get_mut(&Self::key(realm_id, user_id))
            .ok_or_else(|| StorageError::not_found("User", user_id))?;
        user.remove_attribute(name);
        Ok(())
    }
}
