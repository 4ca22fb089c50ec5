//! # astrago-event-listener
//!
//! Event listener that prepares federated users for Astrago.
//!
//! Users imported from an external directory (LDAP) do not carry the
//! attributes Astrago relies on. On every login and registration this
//! listener fills in the missing ones with defaults:
//!
//! | attribute              | default   |
//! |------------------------|-----------|
//! | `workspaceCreateLimit` | `2`       |
//! | `signUpPath`           | `ASTRAGO` |
//! | `approvalYN`           | `true`    |
//!
//! Values already present are left untouched, and local (non-federated)
//! users are ignored. Admin events are accepted and discarded.
//!
//! ## Usage
//!
//! ```no_run
//! # async fn setup() -> Result<(), kc_spi::SpiError> {
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use kc_core::EventsConfig;
//! use kc_spi::{EventListenerManager, SpiRegistry};
//!
//! let registry = Arc::new(SpiRegistry::new());
//! astrago_event_listener::register(&registry, &HashMap::<String, String>::new()).await?;
//!
//! let manager = EventListenerManager::new(
//!     registry,
//!     EventsConfig::with_listeners([astrago_event_listener::PROVIDER_ID]),
//! );
//! manager.validate()?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;
pub mod factory;
pub mod provider;

pub use config::{BackfillConfig, DEFAULT_ATTRIBUTES};
pub use factory::{register, AstragoEventListenerProviderFactory, PROVIDER_ID};
pub use provider::{AstragoEventListenerProvider, BackfillOutcome, SkipReason};
