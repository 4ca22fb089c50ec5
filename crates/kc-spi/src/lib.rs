//! # kc-spi
//!
//! Service Provider Interface (SPI) traits for extensibility.
//!
//! This crate defines the core abstractions for the plugin system, allowing
//! custom implementations such as event listeners to be registered and
//! created per session.
//!
//! ## Design
//!
//! The SPI pattern uses Rust traits with explicit registration:
//! - [`Provider`] - Base trait for all provider implementations
//! - [`ProviderFactory`] - Factory trait for creating provider instances
//! - [`Spi`] - Definition of an SPI extension point
//! - [`EventListenerProvider`] - Listener for authentication and admin events

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod events;
pub mod provider;
pub mod registry;
pub mod session;

pub use events::{
    BoxedEventListener, EventListenerManager, EventListenerProvider, EventListenerSpi,
    EVENT_LISTENER_SPI,
};
pub use provider::{FactoryConfig, Provider, ProviderFactory, ProviderMetadata, Spi, SpiError};
pub use registry::SpiRegistry;
pub use session::KeycloakSession;
