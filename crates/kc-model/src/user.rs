//! User domain model.
//!
//! Users belong to a realm and carry a multi-valued attribute store. A user
//! imported from an external directory (LDAP, Kerberos, ...) keeps a link to
//! the federation component it came from.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    // === Identity ===
    /// Unique identifier.
    ///
    /// Locally created users get a UUID; federated users may carry an
    /// identifier derived from their external store.
    pub id: String,
    /// Realm this user belongs to.
    pub realm_id: String,
    /// Unique username within the realm.
    pub username: String,
    /// Whether the user account is enabled.
    pub enabled: bool,
    /// User's email address.
    pub email: Option<String>,

    // === Timestamps ===
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,

    // === Federation ===
    /// Link to the user federation provider this user was imported from.
    pub federation_link: Option<String>,

    // === Custom Attributes ===
    /// Custom user attributes. Single values are stored as one-element lists.
    pub attributes: HashMap<String, Vec<String>>,
}

impl User {
    /// Creates a new local user with a generated ID.
    #[must_use]
    pub fn new(realm_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self::with_id(Uuid::now_v7().to_string(), realm_id, username)
    }

    /// Creates a new user with an explicit ID.
    #[must_use]
    pub fn with_id(
        id: impl Into<String>,
        realm_id: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            realm_id: realm_id.into(),
            username: username.into(),
            enabled: true,
            email: None,
            created_at: now,
            updated_at: now,
            federation_link: None,
            attributes: HashMap::new(),
        }
    }

    /// Sets the user's email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Links the user to a federation provider.
    #[must_use]
    pub fn with_federation_link(mut self, link: impl Into<String>) -> Self {
        self.federation_link = Some(link.into());
        self
    }

    /// Sets an attribute while building.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.attributes.insert(name.into(), values);
        self
    }

    /// Checks if this is a federated user.
    #[must_use]
    pub const fn is_federated(&self) -> bool {
        self.federation_link.is_some()
    }

    /// Gets an attribute's values.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&Vec<String>> {
        self.attributes.get(name)
    }

    /// Gets the first value of an attribute.
    #[must_use]
    pub fn get_first_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// Returns whether an attribute is present with at least one value.
    #[must_use]
    pub fn has_attribute_values(&self, name: &str) -> bool {
        self.attributes.get(name).is_some_and(|v| !v.is_empty())
    }

    /// Sets an attribute, replacing any previous values.
    pub fn set_attribute(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.attributes.insert(name.into(), values);
        self.updated_at = Utc::now();
    }

    /// Removes an attribute, returning its previous values.
    pub fn remove_attribute(&mut self, name: &str) -> Option<Vec<String>> {
        let removed = self.attributes.remove(name);
        if removed.is_some() {
            self.updated_at = Utc::now();
        }
        removed
    }
}
