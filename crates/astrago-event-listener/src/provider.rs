//! Attribute backfill for federated users.
//!
//! On `LOGIN` and `REGISTER` events the listener looks up the user the event
//! refers to. If that user was imported from a federation provider (it has a
//! federation link), each Astrago attribute that is absent or empty gets its
//! default value. Existing values are never overwritten, so handling the
//! same event twice changes nothing.
//!
//! The listener observes the authentication flow and must never break it:
//! every disqualifying condition is a silent skip, and storage failures are
//! logged and swallowed.
//!
//! Reads and writes are separate storage calls with no lock in between. Two
//! concurrent events for the same user can both see an attribute as missing
//! and both write it; the writes carry the same value.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use kc_core::event::{AdminEvent, Event, EventType};
use kc_model::User;
use kc_spi::{EventListenerProvider, Provider};
use kc_storage::UserProvider;

use crate::config::BackfillConfig;

/// Why an event did not lead to a backfill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Event is neither `LOGIN` nor `REGISTER`.
    UnsupportedEventType,
    /// Event carries no user ID.
    MissingUserId,
    /// No user with the event's ID exists in the realm.
    UserNotFound,
    /// The user lookup failed.
    LookupFailed,
    /// The user is not linked to a federation provider.
    NotFederated,
}

/// Result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackfillOutcome {
    /// Nothing was examined.
    Skipped(SkipReason),
    /// The user's attributes were examined.
    Applied {
        /// Attributes that received their default.
        added: Vec<&'static str>,
        /// Attributes that already had values.
        kept: Vec<&'static str>,
        /// Attributes whose write failed.
        failed: Vec<&'static str>,
    },
}

/// Event listener backfilling Astrago attributes on federated users.
pub struct AstragoEventListenerProvider {
    users: Arc<dyn UserProvider>,
    realm: Option<String>,
    config: Arc<BackfillConfig>,
}

impl AstragoEventListenerProvider {
    /// Creates a listener.
    ///
    /// `realm` is the realm of the session the listener was created for.
    /// When absent, the event's realm is used for the user lookup.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserProvider>,
        realm: Option<String>,
        config: Arc<BackfillConfig>,
    ) -> Self {
        Self {
            users,
            realm,
            config,
        }
    }

    /// Returns whether events of this type trigger a backfill.
    #[must_use]
    pub const fn handles(event_type: EventType) -> bool {
        matches!(event_type, EventType::Login | EventType::Register)
    }

    /// Runs the backfill for one event.
    pub async fn backfill(&self, event: &Event) -> BackfillOutcome {
        if !Self::handles(event.event_type) {
            return BackfillOutcome::Skipped(SkipReason::UnsupportedEventType);
        }

        let Some(user_id) = event.user_id.as_deref() else {
            return BackfillOutcome::Skipped(SkipReason::MissingUserId);
        };

        let realm_id = self.realm.as_deref().unwrap_or(&event.realm_id);
        let user = match self.users.get_by_id(realm_id, user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return BackfillOutcome::Skipped(SkipReason::UserNotFound),
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    realm_id = %realm_id,
                    error = %e,
                    "User lookup failed, skipping attribute backfill"
                );
                return BackfillOutcome::Skipped(SkipReason::LookupFailed);
            }
        };

        if !user.is_federated() {
            return BackfillOutcome::Skipped(SkipReason::NotFederated);
        }

        self.apply_defaults(realm_id, &user).await
    }

    async fn apply_defaults(&self, realm_id: &str, user: &User) -> BackfillOutcome {
        let mut added = Vec::new();
        let mut kept = Vec::new();
        let mut failed = Vec::new();

        for (name, value) in self.config.attributes() {
            if user.has_attribute_values(name) {
                tracing::debug!(
                    user_id = %user.id,
                    attribute = name,
                    values = ?user.get_attribute(name),
                    "Attribute already set"
                );
                kept.push(name);
                continue;
            }

            match self
                .users
                .set_attribute(realm_id, &user.id, name, vec![value.to_string()])
                .await
            {
                Ok(()) => {
                    tracing::info!(
                        user_id = %user.id,
                        attribute = name,
                        value = value,
                        "Added default attribute"
                    );
                    added.push(name);
                }
                Err(e) => {
                    tracing::warn!(
                        user_id = %user.id,
                        attribute = name,
                        error = %e,
                        "Failed to set default attribute"
                    );
                    failed.push(name);
                }
            }
        }

        BackfillOutcome::Applied {
            added,
            kept,
            failed,
        }
    }
}

impl fmt::Debug for AstragoEventListenerProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AstragoEventListenerProvider")
            .field("realm", &self.realm)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Provider for AstragoEventListenerProvider {}

#[async_trait]
impl EventListenerProvider for AstragoEventListenerProvider {
    async fn on_event(&self, event: &Event) {
        tracing::debug!(
            event_type = %event.event_type,
            user_id = ?event.user_id,
            realm_id = %event.realm_id,
            "Event received"
        );

        let outcome = self.backfill(event).await;
        tracing::debug!(event_id = %event.id, outcome = ?outcome, "Event processed");
    }

    async fn on_admin_event(&self, _event: &AdminEvent, _include_representation: bool) {}
}
