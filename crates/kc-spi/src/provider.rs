//! Provider traits for the SPI system.

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

use crate::session::KeycloakSession;

/// Error type for SPI operations.
#[derive(Debug, Error)]
pub enum SpiError {
    /// Provider not found.
    #[error("provider not found: {0}")]
    ProviderNotFound(String),

    /// Provider initialization failed.
    #[error("provider initialization failed: {0}")]
    InitializationFailed(String),

    /// Provider creation failed.
    #[error("provider creation failed: {0}")]
    CreationFailed(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Base trait for all providers.
///
/// A provider is a per-session instance of a capability (an event listener,
/// a user store, ...) created by its [`ProviderFactory`].
pub trait Provider: Send + Sync + Debug {
    /// Called when the provider is being closed.
    ///
    /// Use this to clean up any resources held by the provider.
    fn close(&self) {}
}

impl<T: Provider + ?Sized> Provider for Box<T> {
    fn close(&self) {
        (**self).close();
    }
}

/// Metadata about a provider.
#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    /// Unique identifier for this provider.
    pub id: &'static str,

    /// Human-readable name.
    pub name: &'static str,

    /// Description of what this provider does.
    pub description: &'static str,

    /// Priority for ordering (higher = preferred).
    pub priority: i32,
}

/// Factory for creating provider instances.
///
/// Factories are singletons that create provider instances for each session.
/// They handle initialization and configuration of providers.
///
/// ## Lifecycle
///
/// 1. `init()` - Called once at startup with configuration
/// 2. `post_init()` - Called after all factories are initialized
/// 3. `create()` - Called for each session to create a provider instance
/// 4. `close()` - Called at shutdown
#[async_trait]
pub trait ProviderFactory<P: Provider>: Send + Sync + Debug {
    /// Returns the unique identifier for this factory.
    ///
    /// The identifier is persisted in host configuration, so it must stay
    /// stable across versions.
    fn id(&self) -> &'static str;

    /// Returns metadata about providers created by this factory.
    fn metadata(&self) -> ProviderMetadata;

    /// Returns the priority for ordering (higher = preferred).
    fn order(&self) -> i32 {
        0
    }

    /// Initializes the factory with configuration.
    ///
    /// Called once at startup.
    ///
    /// ## Errors
    ///
    /// Returns an error if initialization fails.
    async fn init(&mut self, config: &dyn FactoryConfig) -> Result<(), SpiError>;

    /// Called after all factories have been initialized.
    ///
    /// ## Errors
    ///
    /// Returns an error if post-initialization fails.
    async fn post_init(&mut self) -> Result<(), SpiError> {
        Ok(())
    }

    /// Creates a new provider instance for the given session.
    ///
    /// ## Errors
    ///
    /// Returns an error if provider creation fails.
    async fn create(&self, session: &KeycloakSession) -> Result<P, SpiError>;

    /// Called when the factory is being shut down.
    fn close(&self) {}
}

/// Configuration interface for factory initialization.
pub trait FactoryConfig: Send + Sync {
    /// Gets a string configuration value.
    fn get(&self, key: &str) -> Option<&str>;

    /// Gets an integer configuration value.
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Gets a boolean configuration value.
    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}

impl FactoryConfig for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).map(String::as_str)
    }
}

/// Definition of an SPI extension point.
///
/// An SPI defines a category of providers (e.g., "eventsListener").
pub trait Spi: Send + Sync {
    /// Returns the unique name of this SPI.
    fn name(&self) -> &'static str;

    /// Returns whether this SPI is internal (not meant for external extension).
    fn is_internal(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn map_config_reads_values() {
        let config = config(&[("limit", "5"), ("enabled", "false"), ("name", "x")]);

        assert_eq!(FactoryConfig::get(&config, "name"), Some("x"));
        assert_eq!(config.get_int("limit", 2), 5);
        assert!(!config.get_bool("enabled", true));
    }

    #[test]
    fn map_config_falls_back_to_defaults() {
        let config = config(&[("limit", "five")]);

        assert_eq!(config.get_int("limit", 2), 2);
        assert_eq!(config.get_int("missing", 7), 7);
        assert!(config.get_bool("missing", true));
    }

    #[derive(Debug)]
    struct Closing;

    impl Provider for Closing {}

    #[test]
    fn boxed_provider_is_provider() {
        let boxed: Box<dyn Provider> = Box::new(Closing);
        boxed.close();
    }
}
