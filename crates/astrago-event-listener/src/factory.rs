//! Factory and registration for the Astrago event listener.

use std::sync::Arc;

use async_trait::async_trait;
use kc_spi::{
    BoxedEventListener, EventListenerSpi, FactoryConfig, KeycloakSession, ProviderFactory,
    ProviderMetadata, SpiError, SpiRegistry,
};

use crate::config::BackfillConfig;
use crate::provider::AstragoEventListenerProvider;

/// Provider ID the listener is registered under.
///
/// Realms enable listeners by this ID, so it must never change.
pub const PROVIDER_ID: &str = "astrago-event-listener";

/// Creates an [`AstragoEventListenerProvider`] per session.
#[derive(Debug, Clone, Default)]
pub struct AstragoEventListenerProviderFactory {
    config: Arc<BackfillConfig>,
}

impl AstragoEventListenerProviderFactory {
    /// Creates a factory with the built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the values this factory backfills.
    #[must_use]
    pub fn config(&self) -> &BackfillConfig {
        &self.config
    }
}

#[async_trait]
impl ProviderFactory<BoxedEventListener> for AstragoEventListenerProviderFactory {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            id: PROVIDER_ID,
            name: "Astrago Event Listener",
            description: "Backfills default Astrago attributes on federated users at login and registration",
            priority: 0,
        }
    }

    async fn init(&mut self, config: &dyn FactoryConfig) -> Result<(), SpiError> {
        let config = BackfillConfig::from_factory_config(config)?;
        tracing::info!(
            provider_id = PROVIDER_ID,
            workspace_create_limit = %config.workspace_create_limit,
            sign_up_path = %config.sign_up_path,
            approval_yn = %config.approval_yn,
            "Event listener initialized"
        );
        self.config = Arc::new(config);
        Ok(())
    }

    async fn create(&self, session: &KeycloakSession) -> Result<BoxedEventListener, SpiError> {
        Ok(Box::new(AstragoEventListenerProvider::new(
            Arc::clone(session.users()),
            session.realm(),
            Arc::clone(&self.config),
        )))
    }
}

/// Initializes the factory and registers it under the event listener SPI.
///
/// ## Errors
///
/// Returns an error if the configuration is invalid.
pub async fn register(registry: &SpiRegistry, config: &dyn FactoryConfig) -> Result<(), SpiError> {
    let mut factory = AstragoEventListenerProviderFactory::new();
    factory.init(config).await?;
    factory.post_init().await?;
    registry.register::<BoxedEventListener, _>(&EventListenerSpi, factory);
    Ok(())
}
