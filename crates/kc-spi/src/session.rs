//! Session management.

use std::fmt;
use std::sync::Arc;

use kc_storage::UserProvider;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::registry::SpiRegistry;

/// A session represents a unit of work.
///
/// Each request gets its own session. Instead of resolving collaborators
/// through ambient state, the session carries them explicitly: the provider
/// registry, the user store, and the realm the request is running in.
pub struct KeycloakSession {
    /// Unique session identifier.
    id: Uuid,

    /// Reference to the SPI registry.
    registry: Arc<SpiRegistry>,

    /// User storage for this session.
    users: Arc<dyn UserProvider>,

    /// Realm the session is bound to, once known.
    realm: RwLock<Option<String>>,

    /// Whether this session has been closed.
    closed: RwLock<bool>,
}

impl KeycloakSession {
    /// Creates a new session.
    #[must_use]
    pub fn new(registry: Arc<SpiRegistry>, users: Arc<dyn UserProvider>) -> Self {
        Self {
            id: Uuid::now_v7(),
            registry,
            users,
            realm: RwLock::new(None),
            closed: RwLock::new(false),
        }
    }

    /// Binds the session to a realm while building.
    #[must_use]
    pub fn with_realm(self, realm_id: impl Into<String>) -> Self {
        self.set_realm(realm_id);
        self
    }

    /// Returns the session ID.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the SPI registry.
    #[must_use]
    pub const fn registry(&self) -> &Arc<SpiRegistry> {
        &self.registry
    }

    /// Returns the user store.
    #[must_use]
    pub const fn users(&self) -> &Arc<dyn UserProvider> {
        &self.users
    }

    /// Returns the realm the session is bound to.
    #[must_use]
    pub fn realm(&self) -> Option<String> {
        self.realm.read().clone()
    }

    /// Binds the session to a realm.
    pub fn set_realm(&self, realm_id: impl Into<String>) {
        *self.realm.write() = Some(realm_id.into());
    }

    /// Returns whether the session has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        *self.closed.read()
    }

    /// Closes the session.
    ///
    /// After closing, the session should not be used.
    pub fn close(&self) {
        *self.closed.write() = true;
    }
}

impl fmt::Debug for KeycloakSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeycloakSession")
            .field("id", &self.id)
            .field("realm", &*self.realm.read())
            .field("closed", &*self.closed.read())
            .finish_non_exhaustive()
    }
}
