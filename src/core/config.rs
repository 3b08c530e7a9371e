//! Navigator configuration with documented defaults
//!
//! Every field is optional in the TOML file; anything left out falls back
//! to the value documented on the `Default` impl.

use crate::core::error::{NavError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration for the navigator binary and library
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    pub navigation: NavigationConfig,
    pub llm: LlmConfig,
}

/// Where a node's parent link comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParentResolution {
    /// Walk the live containment hierarchy on every flatten.
    ///
    /// Late-registering ancestors are always found and removed ancestors
    /// can never leave a dangling link.
    #[default]
    Live,
    /// Compute the link once when the element registers and cache it.
    ///
    /// An ancestor that registers after its descendant is not discovered
    /// until the descendant registers again.
    Registration,
}

/// Timing and graph behaviour of the orchestrator
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Pause after each button activation during path replay (ms)
    ///
    /// Gives the UI time to open the panel the click revealed before the
    /// next control on the path is pressed.
    pub step_delay_ms: u64,

    /// How long the recording indicator stays lit after an activity pulse (ms)
    pub pulse_decay_ms: u64,

    /// Parent link strategy for the element graph
    pub parent_resolution: ParentResolution,

    /// Where the flattened node list is dumped before each request.
    ///
    /// An empty path disables the dump.
    pub diagnostics_path: PathBuf,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: 2000,
            pulse_decay_ms: 2000,
            parent_resolution: ParentResolution::Live,
            diagnostics_path: PathBuf::from("Logs/ActiveMap.json"),
        }
    }
}

impl NavigationConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn pulse_decay(&self) -> Duration {
        Duration::from_millis(self.pulse_decay_ms)
    }

    pub fn diagnostics_path(&self) -> Option<&Path> {
        if self.diagnostics_path.as_os_str().is_empty() {
            None
        } else {
            Some(&self.diagnostics_path)
        }
    }
}

/// Settings for the intent resolution service
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Chat completion endpoint
    pub api_url: String,
    pub model: String,
    /// Low temperature keeps the router deterministic
    pub temperature: f32,
    /// Name of the environment variable holding the API key.
    ///
    /// The key itself is never read from the config file.
    pub api_key_env: String,
    /// Ask the service for a JSON object response
    pub json_mode: bool,
    pub timeout_secs: u64,
    /// Reject replies that carry anything besides the JSON object
    pub strict_json: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".into(),
            model: "gpt-4o".into(),
            temperature: 0.2,
            api_key_env: "LLM_API_KEY".into(),
            json_mode: true,
            timeout_secs: 30,
            strict_json: true,
        }
    }
}

impl NavigatorConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| NavError::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load a configuration file, then apply environment overrides
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            NavError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Optional: LLM_API_URL, LLM_MODEL
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("LLM_API_URL") {
            self.llm.api_url = url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            self.llm.model = model;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NavigatorConfig::default();
        assert_eq!(config.navigation.step_delay(), Duration::from_secs(2));
        assert_eq!(config.navigation.pulse_decay(), Duration::from_secs(2));
        assert_eq!(config.navigation.parent_resolution, ParentResolution::Live);
        assert_eq!(
            config.navigation.diagnostics_path(),
            Some(Path::new("Logs/ActiveMap.json"))
        );
        assert_eq!(config.llm.model, "gpt-4o");
        assert!(config.llm.strict_json);
    }

    #[test]
    fn test_partial_toml() {
        let config = NavigatorConfig::from_toml_str(
            r#"
            [navigation]
            step_delay_ms = 500
            parent_resolution = "registration"

            [llm]
            model = "gpt-4o-mini"
            "#,
        )
        .unwrap();

        assert_eq!(config.navigation.step_delay_ms, 500);
        assert_eq!(config.navigation.pulse_decay_ms, 2000);
        assert_eq!(
            config.navigation.parent_resolution,
            ParentResolution::Registration
        );
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.temperature, 0.2);
    }

    #[test]
    fn test_empty_diagnostics_path_disables_dump() {
        let config = NavigatorConfig::from_toml_str(
            r#"
            [navigation]
            diagnostics_path = ""
            "#,
        )
        .unwrap();
        assert!(config.navigation.diagnostics_path().is_none());
    }

    #[test]
    fn test_invalid_toml() {
        let result = NavigatorConfig::from_toml_str("[navigation\nstep_delay_ms = ");
        assert!(matches!(result, Err(NavError::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = NavigatorConfig::load(Path::new("/definitely/not/here.toml"));
        assert!(result.is_err());
    }
}
