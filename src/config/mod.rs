use crate::di::ContextMatching;
use crate::error::{InjectError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

pub const ENV_CONTEXT_MATCHING: &str = "INJECTRA_CONTEXT_MATCHING";
pub const ENV_AUTO_RESOLVE: &str = "INJECTRA_AUTO_RESOLVE";

/// Container settings.
///
/// Can be embedded in a larger application config (it is `Deserialize`), read
/// from JSON, or loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// How context values are matched to constructor parameters.
    pub context_matching: ContextMatching,
    /// Build unregistered types on demand as transient plain objects.
    pub auto_resolve: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            context_matching: ContextMatching::default(),
            auto_resolve: true,
        }
    }
}

impl ContainerConfig {
    /// Defaults overridden by `INJECTRA_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(value) = env::var(ENV_CONTEXT_MATCHING) {
            config.context_matching = ContextMatching::from_str(value.trim()).map_err(|_| {
                InjectError::InvalidConfig(format!("{ENV_CONTEXT_MATCHING}: unknown value '{value}'"))
            })?;
        }

        if let Ok(value) = env::var(ENV_AUTO_RESOLVE) {
            config.auto_resolve = parse_flag(&value).ok_or_else(|| {
                InjectError::InvalidConfig(format!("{ENV_AUTO_RESOLVE}: expected a boolean, got '{value}'"))
            })?;
        }

        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| InjectError::InvalidConfig(e.to_string()))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
