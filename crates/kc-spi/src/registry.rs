//! SPI Registry for managing provider factories.

use std::any::Any;
use std::sync::Arc;

use dashmap::DashMap;

use crate::provider::{Provider, ProviderFactory, Spi, SpiError};

/// Registry for SPI provider factories.
///
/// The registry maps SPI names to their provider factories. It replaces
/// runtime plugin discovery: factories are registered explicitly at startup
/// and looked up by their provider ID afterwards.
#[derive(Debug, Default)]
pub struct SpiRegistry {
    /// Map of SPI name to registered factories.
    factories: DashMap<&'static str, Vec<FactoryEntry>>,
}

#[derive(Debug)]
struct FactoryEntry {
    id: &'static str,
    /// Holds an `Arc<dyn ProviderFactory<P>>` for the provider type `P`.
    factory: Arc<dyn Any + Send + Sync>,
}

impl SpiRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an initialized provider factory.
    ///
    /// Registering a second factory with the same ID under the same SPI
    /// replaces the first one.
    ///
    /// ## Arguments
    ///
    /// * `spi` - The SPI this factory provides
    /// * `factory` - The factory to register
    pub fn register<P, F>(&self, spi: &dyn Spi, factory: F)
    where
        P: Provider + 'static,
        F: ProviderFactory<P> + 'static,
    {
        let id = factory.id();
        let factory: Arc<dyn ProviderFactory<P>> = Arc::new(factory);
        let entry = FactoryEntry {
            id,
            factory: Arc::new(factory),
        };

        let mut entries = self.factories.entry(spi.name()).or_default();
        entries.retain(|e| e.id != id);
        entries.push(entry);
    }

    /// Looks up a registered factory producing providers of type `P`.
    ///
    /// ## Errors
    ///
    /// Returns `SpiError::ProviderNotFound` if no factory with this ID is
    /// registered for the SPI, or if it produces a different provider type.
    pub fn factory<P>(
        &self,
        spi_name: &str,
        provider_id: &str,
    ) -> Result<Arc<dyn ProviderFactory<P>>, SpiError>
    where
        P: Provider + 'static,
    {
        let not_found = || SpiError::ProviderNotFound(format!("{spi_name}:{provider_id}"));

        let entries = self.factories.get(spi_name).ok_or_else(not_found)?;
        let factory = entries
            .iter()
            .find(|e| e.id == provider_id)
            .and_then(|e| e.factory.downcast_ref::<Arc<dyn ProviderFactory<P>>>())
            .cloned();
        factory.ok_or_else(not_found)
    }

    /// Checks if a provider is registered.
    #[must_use]
    pub fn has_provider(&self, spi_name: &str, provider_id: &str) -> bool {
        self.factories
            .get(spi_name)
            .is_some_and(|entries| entries.iter().any(|e| e.id == provider_id))
    }

    /// Validates that required providers are registered.
    ///
    /// ## Errors
    ///
    /// Returns an error if a required provider is missing.
    pub fn validate_required(&self, requirements: &[(&str, &str)]) -> Result<(), SpiError> {
        for (spi_name, provider_id) in requirements {
            if !self.has_provider(spi_name, provider_id) {
                return Err(SpiError::ProviderNotFound(format!(
                    "{spi_name}:{provider_id}"
                )));
            }
        }
        Ok(())
    }
}
