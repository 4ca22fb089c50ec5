//! User storage provider trait.

use async_trait::async_trait;
use kc_model::User;

use crate::error::StorageResult;

/// Provider for user storage operations.
///
/// Implementations must be thread-safe and support concurrent access.
/// Each call is independent: there is no transaction spanning calls.
#[async_trait]
pub trait UserProvider: Send + Sync {
    /// Creates a new user.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if a user with the same ID or
    /// username exists in the realm.
    async fn create(&self, user: &User) -> StorageResult<()>;

    /// Updates an existing user.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the user doesn't exist.
    async fn update(&self, user: &User) -> StorageResult<()>;

    /// Deletes a user by ID.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the user doesn't exist.
    async fn delete(&self, realm_id: &str, id: &str) -> StorageResult<()>;

    /// Gets a user by ID.
    async fn get_by_id(&self, realm_id: &str, id: &str) -> StorageResult<Option<User>>;

    /// Gets a user by username.
    async fn get_by_username(&self, realm_id: &str, username: &str)
        -> StorageResult<Option<User>>;

    /// Sets an attribute on a user, replacing any previous values.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the user doesn't exist.
    async fn set_attribute(
        &self,
        realm_id: &str,
        user_id: &str,
        name: &str,
        values: Vec<String>,
    ) -> StorageResult<()>;

    /// Removes an attribute from a user.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the user doesn't exist.
    async fn remove_attribute(&self, realm_id: &str, user_id: &str, name: &str)
        -> StorageResult<()>;
}
