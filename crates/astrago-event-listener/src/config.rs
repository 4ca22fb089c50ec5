//! Default attribute values and their configuration.

use kc_spi::{FactoryConfig, SpiError};
use serde::{Deserialize, Serialize};

/// Attribute limiting how many workspaces a user may create.
pub const WORKSPACE_CREATE_LIMIT: &str = "workspaceCreateLimit";

/// Attribute recording how the user signed up.
pub const SIGN_UP_PATH: &str = "signUpPath";

/// Attribute recording whether the account is approved.
pub const APPROVAL_YN: &str = "approvalYN";

/// Built-in defaults, in the order they are applied.
pub const DEFAULT_ATTRIBUTES: [(&str, &str); 3] = [
    (WORKSPACE_CREATE_LIMIT, "2"),
    (SIGN_UP_PATH, "ASTRAGO"),
    (APPROVAL_YN, "true"),
];

/// Values backfilled onto federated users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackfillConfig {
    /// Default for `workspaceCreateLimit`.
    pub workspace_create_limit: String,
    /// Default for `signUpPath`.
    pub sign_up_path: String,
    /// Default for `approvalYN`.
    #[serde(rename = "approvalYN")]
    pub approval_yn: String,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            workspace_create_limit: DEFAULT_ATTRIBUTES[0].1.to_string(),
            sign_up_path: DEFAULT_ATTRIBUTES[1].1.to_string(),
            approval_yn: DEFAULT_ATTRIBUTES[2].1.to_string(),
        }
    }
}

impl BackfillConfig {
    /// Reads overrides from factory configuration.
    ///
    /// Keys are the attribute names; missing keys keep the built-in default.
    ///
    /// ## Errors
    ///
    /// Returns `SpiError::Configuration` if a configured value is blank.
    pub fn from_factory_config(config: &dyn FactoryConfig) -> Result<Self, SpiError> {
        let defaults = Self::default();
        let read = |key: &str, default: String| -> Result<String, SpiError> {
            match config.get(key) {
                None => Ok(default),
                Some(value) if value.trim().is_empty() => Err(SpiError::Configuration(
                    format!("{key} must not be blank"),
                )),
                Some(value) => Ok(value.trim().to_string()),
            }
        };

        Ok(Self {
            workspace_create_limit: read(WORKSPACE_CREATE_LIMIT, defaults.workspace_create_limit)?,
            sign_up_path: read(SIGN_UP_PATH, defaults.sign_up_path)?,
            approval_yn: read(APPROVAL_YN, defaults.approval_yn)?,
        })
    }

    /// Returns `(attribute, value)` pairs in application order.
    #[must_use]
    pub fn attributes(&self) -> [(&'static str, &str); 3] {
        [
            (WORKSPACE_CREATE_LIMIT, self.workspace_create_limit.as_str()),
            (SIGN_UP_PATH, self.sign_up_path.as_str()),
            (APPROVAL_YN, self.approval_yn.as_str()),
        ]
    }
}
