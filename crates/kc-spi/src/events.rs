//! Event listener SPI and event dispatch.
//!
//! Event listeners observe authentication and admin events. Delivery is
//! fire-and-forget from the caller's point of view: a listener that cannot
//! be created, or that fails internally, never fails the flow that produced
//! the event.

use std::sync::Arc;

use async_trait::async_trait;
use kc_core::event::{AdminEvent, Event};
use kc_core::EventsConfig;

use crate::provider::{Provider, Spi, SpiError};
use crate::registry::SpiRegistry;
use crate::session::KeycloakSession;

/// Name of the event listener SPI.
pub const EVENT_LISTENER_SPI: &str = "eventsListener";

/// A per-session event listener.
#[async_trait]
pub trait EventListenerProvider: Provider {
    /// Handles an authentication event.
    async fn on_event(&self, event: &Event);

    /// Handles an admin event.
    async fn on_admin_event(&self, event: &AdminEvent, include_representation: bool);
}

/// Boxed listener, the provider type produced by event listener factories.
pub type BoxedEventListener = Box<dyn EventListenerProvider>;

/// The event listener extension point.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventListenerSpi;

impl Spi for EventListenerSpi {
    fn name(&self) -> &'static str {
        EVENT_LISTENER_SPI
    }
}

/// Delivers events to every enabled listener.
#[derive(Debug, Clone)]
pub struct EventListenerManager {
    registry: Arc<SpiRegistry>,
    config: EventsConfig,
}

impl EventListenerManager {
    /// Creates a manager delivering to the listeners enabled in `config`.
    #[must_use]
    pub const fn new(registry: Arc<SpiRegistry>, config: EventsConfig) -> Self {
        Self { registry, config }
    }

    /// Returns the enabled listener IDs in delivery order.
    #[must_use]
    pub fn enabled_listeners(&self) -> &[String] {
        &self.config.listeners
    }

    /// Checks that every enabled listener has a registered factory.
    ///
    /// ## Errors
    ///
    /// Returns `SpiError::ProviderNotFound` for the first missing listener.
    pub fn validate(&self) -> Result<(), SpiError> {
        let requirements: Vec<(&str, &str)> = self
            .config
            .listeners
            .iter()
            .map(|id| (EVENT_LISTENER_SPI, id.as_str()))
            .collect();
        self.registry.validate_required(&requirements)
    }

    /// Sends an authentication event to all enabled listeners.
    ///
    /// Returns the number of listeners the event was delivered to.
    pub async fn send(&self, session: &KeycloakSession, event: &Event) -> usize {
        let mut delivered = 0;
        for id in &self.config.listeners {
            if let Some(listener) = self.create_listener(session, id).await {
                listener.on_event(event).await;
                listener.close();
                delivered += 1;
            }
        }
        delivered
    }

    /// Sends an admin event to all enabled listeners.
    ///
    /// Returns the number of listeners the event was delivered to.
    pub async fn send_admin(
        &self,
        session: &KeycloakSession,
        event: &AdminEvent,
        include_representation: bool,
    ) -> usize {
        let mut delivered = 0;
        for id in &self.config.listeners {
            if let Some(listener) = self.create_listener(session, id).await {
                listener.on_admin_event(event, include_representation).await;
                listener.close();
                delivered += 1;
            }
        }
        delivered
    }

    async fn create_listener(
        &self,
        session: &KeycloakSession,
        id: &str,
    ) -> Option<BoxedEventListener> {
        let factory = match self
            .registry
            .factory::<BoxedEventListener>(EVENT_LISTENER_SPI, id)
        {
            Ok(factory) => factory,
            Err(e) => {
                tracing::warn!(listener = %id, error = %e, "Event listener not registered");
                return None;
            }
        };

        match factory.create(session).await {
            Ok(listener) => Some(listener),
            Err(e) => {
                tracing::warn!(listener = %id, error = %e, "Failed to create event listener");
                None
            }
        }
    }
}
