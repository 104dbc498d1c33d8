//! Generator configuration
//!
//! Load order: built-in defaults, then `~/.sitesmith/config.toml` if present,
//! then environment variables.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;
use crate::paths;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub model: String,
    pub max_tokens: usize,
    /// Upper bound on model round-trips per generation
    pub max_turns: usize,
    pub base_url: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// File replacing the built-in system prompt
    pub system_prompt_path: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: constants::ai::DEFAULT_MODEL.to_string(),
            max_tokens: constants::ai::MAX_OUTPUT_TOKENS,
            max_turns: constants::ai::MAX_TURNS,
            base_url: None,
            api_key: None,
            system_prompt_path: None,
        }
    }
}

impl GeneratorConfig {
    /// Defaults, overlaid by the user config file and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = paths::config_file();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML file. Missing keys keep their defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply overrides from `lookup` (the environment in production).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(model) = get("SITESMITH_MODEL") {
            self.model = model;
        }
        if let Some(value) = get("SITESMITH_MAX_TOKENS") {
            self.max_tokens = parse_number("SITESMITH_MAX_TOKENS", &value)?;
        }
        if let Some(value) = get("SITESMITH_MAX_TURNS") {
            self.max_turns = parse_number("SITESMITH_MAX_TURNS", &value)?;
        }
        if let Some(url) = get("SITESMITH_BASE_URL") {
            self.base_url = Some(url);
        }
        if let Some(key) = get("SITESMITH_API_KEY").or_else(|| get("ANTHROPIC_API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(path) = get("SITESMITH_SYSTEM_PROMPT") {
            self.system_prompt_path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Contents of `system_prompt_path`, if one is configured.
    pub fn resolve_system_prompt(&self) -> Result<Option<String>, ConfigError> {
        match &self.system_prompt_path {
            Some(path) => std::fs::read_to_string(path)
                .map(Some)
                .map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                }),
            None => Ok(None),
        }
    }
}

fn parse_number<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.model, "claude-sonnet-4-5");
        assert_eq!(config.max_tokens, 16_000);
        assert_eq!(config.max_turns, 40);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model = \"claude-opus\"\nmax_turns = 12").unwrap();

        let config = GeneratorConfig::load_from(file.path()).unwrap();
        assert_eq!(config.model, "claude-opus");
        assert_eq!(config.max_turns, 12);
        assert_eq!(config.max_tokens, 16_000);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model = \"from-file\"\napi_key = \"file-key\"").unwrap();

        let mut config = GeneratorConfig::load_from(file.path()).unwrap();
        config
            .apply_env(env(&[
                ("SITESMITH_MODEL", "from-env"),
                ("SITESMITH_MAX_TOKENS", "8000"),
                ("ANTHROPIC_API_KEY", "env-key"),
            ]))
            .unwrap();

        assert_eq!(config.model, "from-env");
        assert_eq!(config.max_tokens, 8000);
        assert_eq!(config.api_key.as_deref(), Some("env-key"));
    }

    #[test]
    fn test_sitesmith_key_wins_over_anthropic_key() {
        let mut config = GeneratorConfig::default();
        config
            .apply_env(env(&[
                ("SITESMITH_API_KEY", "primary"),
                ("ANTHROPIC_API_KEY", "secondary"),
            ]))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn test_invalid_number_is_error() {
        let mut config = GeneratorConfig::default();
        let err = config
            .apply_env(env(&[("SITESMITH_MAX_TURNS", "lots")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "SITESMITH_MAX_TURNS",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_tokens = \"many\"").unwrap();
        assert!(matches!(
            GeneratorConfig::load_from(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_system_prompt_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.md");
        std::fs::write(&path, "Build sites.").unwrap();

        let config = GeneratorConfig {
            system_prompt_path: Some(path),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_system_prompt().unwrap().as_deref(),
            Some("Build sites.")
        );
        assert_eq!(GeneratorConfig::default().resolve_system_prompt().unwrap(), None);
    }
}
