// src/core/config_manager.rs
//! Configuration: optional config.yaml, then environment overrides

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_PORT: u16 = 4000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigManager {
    pub environment: String,
    pub service: ServiceConfig,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub service_url: String,
    pub timeout_seconds: u64,
}

/// One environment section of config.yaml. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
struct EnvironmentSection {
    service_url: Option<String>,
    timeout_seconds: Option<u64>,
    port: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: EnvironmentSection,
    #[serde(default)]
    production: EnvironmentSection,
}

impl ConfigManager {
    /// Load config.yaml from the working directory if present, then apply
    /// ATS_SERVICE_URL, ATS_SERVICE_TIMEOUT_SECS and ROCKET_PORT.
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let mut config = Self::load_file(Path::new("config.yaml"), &environment)?;
        config.apply_env_overrides()?;

        info!(
            "ATS service: {} (timeout {}s), port {}",
            config.service.service_url, config.service.timeout_seconds, config.port
        );
        Ok(config)
    }

    fn get_environment() -> String {
        std::env::var("ATS_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_file(path: &Path, environment: &str) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::defaults(environment));
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml_str(&content, environment)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Build a configuration from YAML text with `local` and `production` sections.
    pub fn from_yaml_str(content: &str, environment: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content).context("Invalid config YAML")?;

        let section = match environment {
            "production" => file.production,
            _ => file.local,
        };

        Ok(Self {
            environment: environment.to_string(),
            service: ServiceConfig {
                service_url: section
                    .service_url
                    .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string()),
                timeout_seconds: section.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS),
            },
            port: section.port.unwrap_or(DEFAULT_PORT),
        })
    }

    pub fn defaults(environment: &str) -> Self {
        Self {
            environment: environment.to_string(),
            service: ServiceConfig {
                service_url: DEFAULT_SERVICE_URL.to_string(),
                timeout_seconds: DEFAULT_TIMEOUT_SECS,
            },
            port: DEFAULT_PORT,
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("ATS_SERVICE_URL") {
            self.service.service_url = url;
        }

        if let Ok(timeout) = std::env::var("ATS_SERVICE_TIMEOUT_SECS") {
            self.service.timeout_seconds = timeout
                .parse()
                .context("ATS_SERVICE_TIMEOUT_SECS must be a number of seconds")?;
        }

        if let Ok(port) = std::env::var("ROCKET_PORT") {
            self.port = port
                .parse()
                .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?;
        }

        Ok(())
    }

    /// Optional JSON log file path (ATS_LOG_FILE)
    pub fn log_file() -> Option<PathBuf> {
        std::env::var("ATS_LOG_FILE").ok().map(PathBuf::from)
    }
}
