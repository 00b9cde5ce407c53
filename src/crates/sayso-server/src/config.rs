//! Server configuration.
//!
//! Loaded from a TOML file (`sayso.toml` by default, overridable via
//! `SAYSO_CONFIG`). Every section has working defaults, so a missing file
//! is a warning, not a failure. The OpenAI key itself never lives in the
//! file; the config names the environment variable that holds it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use transcribe::ModelSize;

pub const DEFAULT_CONFIG_PATH: &str = "sayso.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: llm::config::DEFAULT_BASE_URL.to_string(),
            model: llm::config::DEFAULT_MODEL.to_string(),
            timeout_secs: 60,
        }
    }
}

impl LlmSection {
    /// Resolve this section into a provider config, reading the key from
    /// the named environment variable.
    pub fn to_llm_config(&self) -> Result<llm::LlmConfig, sayso_core::LlmError> {
        Ok(llm::LlmConfig::from_env(&self.api_key_env)?
            .with_base_url(&self.base_url)
            .with_model(&self.model)
            .with_timeout(Duration::from_secs(self.timeout_secs)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WhisperSection {
    pub dir: PathBuf,
    pub model: ModelSize,
}

impl Default for WhisperSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("whisper"),
            model: ModelSize::Tiny,
        }
    }
}

impl WhisperSection {
    pub fn to_whisper_config(&self) -> transcribe::WhisperConfig {
        transcribe::WhisperConfig::new(&self.dir).with_model(self.model)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: HttpConfig,
    pub llm: LlmSection,
    pub whisper: WhisperSection,
}

impl ServerConfig {
    /// Load from `SAYSO_CONFIG` or the default path.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("SAYSO_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_sensible() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.whisper.model, ModelSize::Tiny);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[server]\nport = 8080\n\n[llm]\nmodel = \"gpt-4\"\n"
        )
        .unwrap();

        let config = ServerConfig::load_from(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.llm.model, "gpt-4");
        assert_eq!(config.llm.base_url, llm::config::DEFAULT_BASE_URL);
    }

    #[test]
    fn whisper_section_parses_model() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[whisper]\ndir = \"/opt/whisper\"\nmodel = \"base\"\n"
        )
        .unwrap();

        let config = ServerConfig::load_from(file.path()).unwrap();
        assert_eq!(config.whisper.dir, PathBuf::from("/opt/whisper"));
        assert_eq!(config.whisper.model, ModelSize::Base);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = ServerConfig::load_from(Path::new("/nonexistent/sayso.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not valid toml [[[").unwrap();
        let err = ServerConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
