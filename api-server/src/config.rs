//! Configuration module

use std::env;

use intel_response_core::EngineConfig;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Static API key; `None` leaves the API open
    pub api_key: Option<String>,

    /// JSON file with engine thresholds
    pub engine_config_path: Option<String>,

    /// `high` or `low` sensitivity preset, ignored when a config file is set
    pub sensitivity: Option<String>,

    /// JSONL validation audit log; in-memory when unset
    pub audit_log_path: Option<String>,

    /// Emit JSON log lines
    pub log_json: bool,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            api_key: None,
            engine_config_path: None,
            sensitivity: None,
            audit_log_path: None,
            log_json: false,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            api_key: non_empty("INTEL_API_KEY"),

            engine_config_path: non_empty("INTEL_ENGINE_CONFIG"),

            sensitivity: non_empty("INTEL_SENSITIVITY"),

            audit_log_path: non_empty("INTEL_AUDIT_LOG"),

            log_json: env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false),

            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Engine thresholds: config file, else preset, else env defaults
    pub fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        if let Some(path) = &self.engine_config_path {
            return Ok(EngineConfig::from_json_file(path)?);
        }

        let mut config = match self.sensitivity.as_deref() {
            Some("high") => EngineConfig::high_sensitivity(),
            Some("low") => EngineConfig::low_sensitivity(),
            Some(other) => anyhow::bail!("unknown sensitivity preset '{}'", other),
            None => EngineConfig::default(),
        };
        let from_env = EngineConfig::from_env();
        config.execution = from_env.execution;
        Ok(config)
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
