use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::summary::PipelineConfig;

/// Environment variables override file values, e.g.
/// `SESSION_NOTES__SUMMARY__MAX_CHUNK_SIZE=8000`.
pub const ENV_PREFIX: &str = "SESSION_NOTES";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub summary: SummaryConfig,
    pub generator: GeneratorConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "session-notes".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Soft upper bound on chunk length, in characters
    pub max_chunk_size: usize,

    /// Pause between consecutive per-chunk generation calls
    pub inter_chunk_delay_ms: u64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        let pipeline = PipelineConfig::default();
        Self {
            max_chunk_size: pipeline.max_chunk_size,
            inter_chunk_delay_ms: pipeline.inter_chunk_delay.as_millis() as u64,
        }
    }
}

impl SummaryConfig {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            max_chunk_size: self.max_chunk_size,
            inter_chunk_delay: Duration::from_millis(self.inter_chunk_delay_ms),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Base URL of an OpenAI-compatible API
    pub api_base: String,
    pub model: String,

    /// Falls back to `OPENAI_API_KEY` when unset
    pub api_key: Option<String>,

    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            api_key: None,
            timeout_secs: 120,
        }
    }
}

impl GeneratorConfig {
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database holding summaries, transcriptions and voice notes
    pub database_path: PathBuf,

    /// Root directory of the audio object store
    pub objects_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("data/session-notes.sqlite"),
            objects_path: PathBuf::from("data/objects"),
        }
    }
}

/// Static bearer tokens accepted by the HTTP API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub tokens: Vec<ApiToken>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiToken {
    pub token: String,
    pub user_id: String,
}

impl AuthConfig {
    pub fn user_for_token(&self, token: &str) -> Option<&str> {
        self.tokens
            .iter()
            .find(|t| t.token == token)
            .map(|t| t.user_id.as_str())
    }
}

impl Config {
    /// Load `path` (extension optional, file may be absent) layered with
    /// environment overrides on top of built-in defaults.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
