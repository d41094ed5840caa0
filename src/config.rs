//! # Configuration
//!
//! Hierarchical configuration loading, layered in order:
//! - `config.toml` (base)
//! - `config.local.toml` (git-ignored local overrides)
//! - Environment variables (`RULE_ENGINE_*`, double-underscore nested)
//!
//! ## Example
//!
//! ```toml
//! [validator]
//! strict = true
//!
//! [logging]
//! level = "debug"
//! json = true
//! ```
//!
//! ```bash
//! RULE_ENGINE_LOGGING__LEVEL=warn
//! ```
//!
//! `RuleSystem` itself takes already-resolved dependencies; this
//! config only governs the host-level validator strictness toggle and
//! logging setup.

use std::path::Path;

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleEngineConfig {
    #[serde(default)]
    pub validator: ValidatorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// When true, hosts may wire a stricter `Validator` than
    /// `DefaultValidator`. The engine itself does not interpret this
    /// flag; it is read by the embedding application at startup.
    #[serde(default)]
    pub strict: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig { strict: false }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig { level: default_log_level(), json: false }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl RuleEngineConfig {
    /// Load configuration rooted at `dir`, merging `config.toml`,
    /// then `config.local.toml`, then `RULE_ENGINE_*` environment
    /// variables. Missing files are not an error; every field has a
    /// default.
    pub fn load(dir: &Path) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(dir.join("config.toml")))
            .merge(Toml::file(dir.join("config.local.toml")))
            .merge(Env::prefixed("RULE_ENGINE_").split("__"))
            .extract()
    }
}

impl Default for RuleEngineConfig {
    fn default() -> Self {
        RuleEngineConfig { validator: ValidatorConfig::default(), logging: LoggingConfig::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_info_level_and_lenient_validator() {
        let config = RuleEngineConfig::default();
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
        assert!(!config.validator.strict);
    }
}
