//! Startup configuration: the API credential plus optional model and display
//! settings, read once from a TOML secrets file and the environment.
//!
//! The secrets file keeps the hosted-app layout: a top-level `API_KEY` and an
//! optional `[relay]` table.
//!
//! ```toml
//! API_KEY = "..."
//!
//! [relay]
//! model = "gemini-1.5-flash"
//! show_subtitle = true
//! success_style = true
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use relay_types::{Credential, DisplayOptions, RelayError, Result};

pub const DEFAULT_SECRETS_PATH: &str = ".streamlit/secrets.toml";
pub const SECRETS_PATH_ENV: &str = "RELAY_SECRETS";

/// Environment variables checked for the API key, in priority order.
pub const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

// ---------------------------------------------------------------------------
// File layout
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct SecretsFile {
    #[serde(rename = "API_KEY")]
    api_key: Option<String>,
    #[serde(default)]
    relay: RelaySection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RelaySection {
    model: Option<String>,
    base_url: Option<String>,
    system_instruction: Option<String>,
    temperature: Option<f32>,
    #[serde(flatten)]
    display: DisplayOptions,
}

// ---------------------------------------------------------------------------
// RelayConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub credential: Credential,
    pub model: String,
    pub base_url: Option<String>,
    pub system_instruction: Option<String>,
    pub temperature: Option<f32>,
    pub display: DisplayOptions,
}

impl RelayConfig {
    /// Config with the given key and every other setting at its default.
    pub fn new(credential: Credential) -> Self {
        Self {
            credential,
            model: relay_llm::DEFAULT_MODEL.to_string(),
            base_url: None,
            system_instruction: None,
            temperature: None,
            display: DisplayOptions::default(),
        }
    }

    /// Load from the secrets file and the process environment.
    ///
    /// `path` wins over `RELAY_SECRETS`, which wins over the default location.
    /// Only the default location may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |name| std::env::var(name).ok())
    }

    pub fn load_with(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match env(SECRETS_PATH_ENV) {
                Some(p) => (PathBuf::from(p), true),
                None => (PathBuf::from(DEFAULT_SECRETS_PATH), false),
            },
        };

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::debug!(path = %path.display(), "read secrets file");
                Some(contents)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                tracing::debug!(path = %path.display(), "no secrets file, using environment only");
                None
            }
            Err(e) => {
                return Err(RelayError::Config(format!(
                    "cannot read secrets file {}: {e}",
                    path.display()
                )))
            }
        };

        Self::from_sources(contents.as_deref(), env)
    }

    /// Build from secrets-file text (if any) and an environment lookup.
    /// Environment variables override the file's `API_KEY`.
    pub fn from_sources(
        secrets: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let file: SecretsFile = match secrets {
            Some(text) => toml::from_str(text)
                .map_err(|e| RelayError::Config(format!("invalid secrets file: {e}")))?,
            None => SecretsFile::default(),
        };

        let api_key = API_KEY_VARS
            .iter()
            .filter_map(|name| env(name))
            .chain(file.api_key)
            .find(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                RelayError::Config(format!(
                    "no API key: set API_KEY in the secrets file or one of {}",
                    API_KEY_VARS.join(", ")
                ))
            })?;

        let relay = file.relay;
        if let Some(t) = relay.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(RelayError::Config(format!(
                    "temperature must be between 0 and 2, got {t}"
                )));
            }
        }

        let mut config = Self::new(Credential::new(api_key));
        if let Some(model) = relay.model.filter(|m| !m.is_empty()) {
            config.model = model;
        }
        config.base_url = relay.base_url;
        config.system_instruction = relay.system_instruction;
        config.temperature = relay.temperature;
        config.display = relay.display;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn key_from_secrets_file() {
        let config = RelayConfig::from_sources(Some(r#"API_KEY = "file-key""#), env_of(&[]))
            .unwrap();
        assert_eq!(config.credential.expose(), "file-key");
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.display, DisplayOptions::default());
        assert!(config.base_url.is_none());
    }

    #[test]
    fn environment_overrides_file() {
        let config = RelayConfig::from_sources(
            Some(r#"API_KEY = "file-key""#),
            env_of(&[("GEMINI_API_KEY", "env-key")]),
        )
        .unwrap();
        assert_eq!(config.credential.expose(), "env-key");

        let config = RelayConfig::from_sources(
            None,
            env_of(&[("GEMINI_API_KEY", "gemini"), ("API_KEY", "api")]),
        )
        .unwrap();
        assert_eq!(config.credential.expose(), "api");
    }

    #[test]
    fn blank_env_value_falls_through() {
        let config = RelayConfig::from_sources(
            Some(r#"API_KEY = "file-key""#),
            env_of(&[("API_KEY", "  ")]),
        )
        .unwrap();
        assert_eq!(config.credential.expose(), "file-key");
    }

    #[test]
    fn missing_key_is_config_error() {
        let err = RelayConfig::from_sources(Some("[relay]\nmodel = \"x\""), env_of(&[]))
            .unwrap_err();
        assert!(matches!(err, RelayError::Config(_)));
        assert!(err.to_string().contains("no API key"));
    }

    #[test]
    fn relay_section_overrides_defaults() {
        let secrets = r#"
            API_KEY = "k"

            [relay]
            model = "gemini-2.5-flash"
            base_url = "http://localhost:9000"
            system_instruction = "Be brief."
            temperature = 0.7
            show_subtitle = true
            success_style = true
            heading = "Ask Gemini"
        "#;
        let config = RelayConfig::from_sources(Some(secrets), env_of(&[])).unwrap();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.system_instruction.as_deref(), Some("Be brief."));
        assert_eq!(config.temperature, Some(0.7));
        assert!(config.display.show_subtitle);
        assert!(config.display.success_style);
        assert_eq!(config.display.heading, "Ask Gemini");
        assert_eq!(config.display.title, relay_types::DEFAULT_TITLE);
    }

    #[test]
    fn out_of_range_temperature_rejected() {
        let secrets = "API_KEY = \"k\"\n[relay]\ntemperature = 3.5\n";
        let err = RelayConfig::from_sources(Some(secrets), env_of(&[])).unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = RelayConfig::from_sources(Some("API_KEY = "), env_of(&[])).unwrap_err();
        assert!(err.to_string().contains("invalid secrets file"));
    }

    #[test]
    fn credential_is_redacted() {
        let config = RelayConfig::new(Credential::new("sk-very-secret"));
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("REDACTED"));
        assert_eq!(config.credential.to_string(), "[REDACTED]");
    }

    #[test]
    fn load_reads_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        std::fs::write(&path, "API_KEY = \"from-disk\"\n").unwrap();

        let config = RelayConfig::load_with(Some(&path), env_of(&[])).unwrap();
        assert_eq!(config.credential.expose(), "from-disk");
    }

    #[test]
    fn load_uses_secrets_path_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "API_KEY = \"custom\"\n").unwrap();

        let config = RelayConfig::load_with(
            None,
            env_of(&[(SECRETS_PATH_ENV, path.to_str().unwrap())]),
        )
        .unwrap();
        assert_eq!(config.credential.expose(), "custom");
    }

    #[test]
    fn load_explicit_missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let err = RelayConfig::load_with(Some(&path), env_of(&[("API_KEY", "k")])).unwrap_err();
        assert!(err.to_string().contains("cannot read secrets file"));
    }
}
