pub mod toml_config;

use crate::core::ModelSettings;
use crate::utils::error::Result;
use crate::utils::validation::*;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use toml_config::FileConfig;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_WORKERS: usize = 1;
pub const DEFAULT_THREADS: usize = 8;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 0;
pub const DEFAULT_MAX_UPLOAD_MB: usize = 64;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Runtime settings. Every field can come from a flag, an environment
/// variable, or the optional TOML file, in that order of precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "bugfixer")]
#[command(about = "Fixes uploaded projects with an LLM and returns them as a zip")]
pub struct ServerConfig {
    #[arg(long, env = "HOST", help = "Address to bind [default: 0.0.0.0]")]
    pub host: Option<String>,

    #[arg(long, env = "PORT", help = "Port to bind [default: 8080]")]
    pub port: Option<u16>,

    #[arg(long, env = "WORKERS", help = "Isolated worker runtimes [default: 1]")]
    pub workers: Option<usize>,

    #[arg(long, env = "THREADS", help = "Executor threads per worker [default: 8]")]
    pub threads: Option<usize>,

    #[arg(long, env = "TIMEOUT", help = "Request timeout in seconds, 0 disables it [default: 0]")]
    pub timeout: Option<u64>,

    #[arg(long, env = "MAX_UPLOAD_MB", help = "Largest accepted upload [default: 64]")]
    pub max_upload_mb: Option<usize>,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "GEMINI_MODEL", help = "Model name [default: gemini-1.5-flash]")]
    pub gemini_model: Option<String>,

    #[arg(long, env = "GEMINI_ENDPOINT", help = "Model API base URL")]
    pub gemini_endpoint: Option<String>,

    #[arg(long, short = 'c', help = "Optional TOML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ServerConfig {
    /// Fills every setting still unset from the file's values.
    pub fn apply_file(&mut self, file: &FileConfig) {
        let server = &file.server;
        self.host = self.host.take().or_else(|| server.host.clone());
        self.port = self.port.or(server.port);
        self.workers = self.workers.or(server.workers);
        self.threads = self.threads.or(server.threads);
        self.timeout = self.timeout.or(server.timeout);
        self.max_upload_mb = self.max_upload_mb.or(server.max_upload_mb);

        let model = &file.model;
        self.gemini_api_key = self.gemini_api_key.take().or_else(|| model.api_key.clone());
        self.gemini_model = self.gemini_model.take().or_else(|| model.name.clone());
        self.gemini_endpoint = self.gemini_endpoint.take().or_else(|| model.endpoint.clone());
    }

    /// Loads the `--config` file, if any, and folds it in.
    pub fn load_file(&mut self) -> Result<()> {
        if let Some(path) = self.config.clone() {
            let file = FileConfig::from_file(&path)?;
            tracing::debug!("Loaded config file {}", path);
            self.apply_file(&file);
        }
        Ok(())
    }

    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn workers(&self) -> usize {
        self.workers.unwrap_or(DEFAULT_WORKERS)
    }

    pub fn threads(&self) -> usize {
        self.threads.unwrap_or(DEFAULT_THREADS)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        match self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECONDS) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb
            .unwrap_or(DEFAULT_MAX_UPLOAD_MB)
            .saturating_mul(1024 * 1024)
    }
}

impl ModelSettings for ServerConfig {
    fn api_key(&self) -> Option<&str> {
        self.gemini_api_key.as_deref().filter(|k| !k.is_empty())
    }

    fn model(&self) -> &str {
        self.gemini_model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL)
    }

    fn endpoint(&self) -> &str {
        self.gemini_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_GEMINI_ENDPOINT)
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_number("port", usize::from(self.port()), 1)?;
        validate_non_empty_string("host", self.host())?;
        validate_range("workers", self.workers(), 1, 64)?;
        validate_range("threads", self.threads(), 1, 1024)?;
        validate_positive_number(
            "max_upload_mb",
            self.max_upload_mb.unwrap_or(DEFAULT_MAX_UPLOAD_MB),
            1,
        )?;
        validate_non_empty_string("gemini_model", self.model())?;
        validate_url("gemini_endpoint", self.endpoint())?;
        Ok(())
    }
}
