//! Configuration management.
//!
//! Configuration is loaded from environment variables (and a `.env` file when
//! present) with defaults for everything.

use std::env::VarError;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable listing the enabled event listener IDs.
pub const EVENTS_LISTENERS_ENV: &str = "KC_EVENTS_LISTENERS";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Event configuration.
    #[serde(default)]
    pub events: EventsConfig,
}

/// Event dispatch configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Provider IDs of the event listeners enabled for delivery, in order.
    #[serde(default)]
    pub listeners: Vec<String>,
}

impl EventsConfig {
    /// Creates a configuration enabling the given listeners.
    #[must_use]
    pub fn with_listeners<I, S>(listeners: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Self::default();
        for id in listeners {
            config.enable(id);
        }
        config
    }

    /// Enables a listener. Enabling the same ID twice is a no-op.
    pub fn enable(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.is_enabled(&id) {
            self.listeners.push(id);
        }
    }

    /// Returns whether a listener is enabled.
    #[must_use]
    pub fn is_enabled(&self, id: &str) -> bool {
        self.listeners.iter().any(|l| l == id)
    }

    /// Parses a comma-separated listener list, ignoring blanks and duplicates.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        Self::with_listeners(
            value
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty()),
        )
    }

    /// Loads the event configuration from the environment.
    ///
    /// ## Errors
    ///
    /// Returns `Error::Config` if the variable is set but not valid unicode.
    pub fn from_env() -> Result<Self> {
        match std::env::var(EVENTS_LISTENERS_ENV) {
            Ok(value) => Ok(Self::parse(&value)),
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(VarError::NotUnicode(_)) => Err(Error::Config(format!(
                "{EVENTS_LISTENERS_ENV} is not valid unicode"
            ))),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// ## Errors
    ///
    /// Returns `Error::Config` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        Ok(Self {
            events: EventsConfig::from_env()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Serializes tests that touch the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn default_config_enables_nothing() {
        let config = Config::default();
        assert!(config.events.listeners.is_empty());
    }

    #[test]
    fn parse_trims_and_dedupes() {
        let config = EventsConfig::parse(" astrago-event-listener, ,jboss-logging,astrago-event-listener");
        assert_eq!(
            config.listeners,
            vec!["astrago-event-listener".to_string(), "jboss-logging".to_string()]
        );
        assert!(config.is_enabled("jboss-logging"));
        assert!(!config.is_enabled("email"));
    }

    #[test]
    fn parse_empty_string_is_empty() {
        assert_eq!(EventsConfig::parse(""), EventsConfig::default());
    }

    #[test]
    fn config_deserializes_without_events_section() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(config.events.listeners.is_empty());

        let config: Config =
            serde_json::from_str(r#"{"events":{"listeners":["astrago-event-listener"]}}"#)
                .unwrap();
        assert!(config.events.is_enabled("astrago-event-listener"));
    }

    #[test]
    fn from_env_reads_listener_list() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var(
            EVENTS_LISTENERS_ENV,
            "astrago-event-listener, ,jboss-logging, astrago-event-listener",
        );

        let config = Config::from_env();
        std::env::remove_var(EVENTS_LISTENERS_ENV);

        assert_eq!(
            config.unwrap().events.listeners,
            vec!["astrago-event-listener".to_string(), "jboss-logging".to_string()]
        );
    }

    #[test]
    fn from_env_without_variable_enables_nothing() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var(EVENTS_LISTENERS_ENV);

        assert_eq!(EventsConfig::from_env().unwrap(), EventsConfig::default());
    }

    #[cfg(unix)]
    #[test]
    fn from_env_rejects_non_unicode_value() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var(EVENTS_LISTENERS_ENV, OsString::from_vec(vec![0x61, 0xff, 0x62]));

        let result = Config::from_env();
        std::env::remove_var(EVENTS_LISTENERS_ENV);

        let err = result.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains(EVENTS_LISTENERS_ENV));
    }
}
