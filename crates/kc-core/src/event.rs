//! Authentication and administrative events.
//!
//! Events are produced by the identity provider and handed to every enabled
//! event listener. They are immutable once built: listeners only read them.
//!
//! Two categories exist:
//! - [`Event`] - user-facing authentication events (login, register, ...)
//! - [`AdminEvent`] - administrative operations on realm resources

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authentication event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    // Login events
    /// User logged in.
    Login,
    /// User login failed.
    LoginError,
    /// User logged out.
    Logout,
    /// User logout failed.
    LogoutError,

    // Registration events
    /// User registered.
    Register,
    /// User registration failed.
    RegisterError,

    // Account events
    /// User updated their profile.
    UpdateProfile,
    /// User updated their password.
    UpdatePassword,
    /// User requested a password reset.
    ResetPassword,
    /// User verified their email.
    VerifyEmail,

    // Token events
    /// Authorization code exchanged for tokens.
    CodeToToken,
    /// Authorization code exchange failed.
    CodeToTokenError,
    /// Token refreshed.
    RefreshToken,
    /// Token refresh failed.
    RefreshTokenError,
    /// Token introspected.
    IntrospectToken,
    /// Grant revoked.
    RevokeGrant,

    // Identity provider events
    /// External identity linked to a local user.
    IdentityProviderLinkAccount,
    /// First login through an external identity provider.
    IdentityProviderFirstLogin,
}

impl EventType {
    /// Returns the wire name of the event type (e.g. `LOGIN`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::LoginError => "LOGIN_ERROR",
            Self::Logout => "LOGOUT",
            Self::LogoutError => "LOGOUT_ERROR",
            Self::Register => "REGISTER",
            Self::RegisterError => "REGISTER_ERROR",
            Self::UpdateProfile => "UPDATE_PROFILE",
            Self::UpdatePassword => "UPDATE_PASSWORD",
            Self::ResetPassword => "RESET_PASSWORD",
            Self::VerifyEmail => "VERIFY_EMAIL",
            Self::CodeToToken => "CODE_TO_TOKEN",
            Self::CodeToTokenError => "CODE_TO_TOKEN_ERROR",
            Self::RefreshToken => "REFRESH_TOKEN",
            Self::RefreshTokenError => "REFRESH_TOKEN_ERROR",
            Self::IntrospectToken => "INTROSPECT_TOKEN",
            Self::RevokeGrant => "REVOKE_GRANT",
            Self::IdentityProviderLinkAccount => "IDENTITY_PROVIDER_LINK_ACCOUNT",
            Self::IdentityProviderFirstLogin => "IDENTITY_PROVIDER_FIRST_LOGIN",
        }
    }

    /// Returns whether this is an error event.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(
            self,
            Self::LoginError
                | Self::LogoutError
                | Self::RegisterError
                | Self::CodeToTokenError
                | Self::RefreshTokenError
        )
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authentication event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub id: Uuid,

    /// When the event occurred.
    pub time: DateTime<Utc>,

    /// Type of event.
    pub event_type: EventType,

    /// Realm the event occurred in.
    pub realm_id: String,

    /// User the event refers to, if known.
    pub user_id: Option<String>,

    /// Client that initiated the flow.
    pub client_id: Option<String>,

    /// User session ID.
    pub session_id: Option<String>,

    /// Source IP address.
    pub ip_address: Option<String>,

    /// Error code (for error events).
    pub error: Option<String>,

    /// Additional details as key-value pairs.
    pub details: Vec<(String, String)>,
}

impl Event {
    /// Creates a new event builder.
    #[must_use]
    pub fn builder(event_type: EventType, realm_id: impl Into<String>) -> EventBuilder {
        EventBuilder::new(event_type, realm_id)
    }

    /// Gets a detail value by key.
    #[must_use]
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Builder for creating events.
#[derive(Debug)]
pub struct EventBuilder {
    event_type: EventType,
    realm_id: String,
    user_id: Option<String>,
    client_id: Option<String>,
    session_id: Option<String>,
    ip_address: Option<String>,
    error: Option<String>,
    details: Vec<(String, String)>,
}

impl EventBuilder {
    /// Creates a new event builder.
    #[must_use]
    pub fn new(event_type: EventType, realm_id: impl Into<String>) -> Self {
        Self {
            event_type,
            realm_id: realm_id.into(),
            user_id: None,
            client_id: None,
            session_id: None,
            ip_address: None,
            error: None,
            details: Vec::new(),
        }
    }

    /// Sets the user ID.
    #[must_use]
    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Sets the client ID.
    #[must_use]
    pub fn client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the session ID.
    #[must_use]
    pub fn session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Sets the IP address.
    #[must_use]
    pub fn ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    /// Sets the error code.
    #[must_use]
    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Adds a detail key-value pair.
    #[must_use]
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push((key.into(), value.into()));
        self
    }

    /// Builds the event.
    #[must_use]
    pub fn build(self) -> Event {
        Event {
            id: Uuid::now_v7(),
            time: Utc::now(),
            event_type: self.event_type,
            realm_id: self.realm_id,
            user_id: self.user_id,
            client_id: self.client_id,
            session_id: self.session_id,
            ip_address: self.ip_address,
            error: self.error,
            details: self.details,
        }
    }
}

/// Operation performed by an administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    /// Resource created.
    Create,
    /// Resource updated.
    Update,
    /// Resource deleted.
    Delete,
    /// Non-CRUD action (e.g. sending a verification email).
    Action,
}

/// Kind of resource an administrative operation targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    /// Realm.
    Realm,
    /// User.
    User,
    /// Group.
    Group,
    /// Realm or client role.
    RealmRole,
    /// Client.
    Client,
    /// User federation component.
    Component,
}

/// An administrative event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminEvent {
    /// Unique event identifier.
    pub id: Uuid,

    /// When the event occurred.
    pub time: DateTime<Utc>,

    /// Realm the operation targeted.
    pub realm_id: String,

    /// Operation performed.
    pub operation_type: OperationType,

    /// Kind of resource affected.
    pub resource_type: ResourceType,

    /// Path of the affected resource (e.g. `users/<id>`).
    pub resource_path: String,

    /// JSON representation of the resource, when captured.
    pub representation: Option<String>,
}

impl AdminEvent {
    /// Creates a new admin event.
    #[must_use]
    pub fn new(
        realm_id: impl Into<String>,
        operation_type: OperationType,
        resource_type: ResourceType,
        resource_path: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            time: Utc::now(),
            realm_id: realm_id.into(),
            operation_type,
            resource_type,
            resource_path: resource_path.into(),
            representation: None,
        }
    }

    /// Attaches a resource representation.
    #[must_use]
    pub fn with_representation(mut self, representation: impl Into<String>) -> Self {
        self.representation = Some(representation.into());
        self
    }
}
