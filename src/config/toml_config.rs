use crate::utils::error::{FixerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk configuration. Both tables and all their keys are optional.
///
/// ```toml
/// [server]
/// port = 8080
/// workers = 1
/// threads = 8
/// timeout = 0
/// max_upload_mb = 64
///
/// [model]
/// name = "gemini-1.5-flash"
/// endpoint = "https://generativelanguage.googleapis.com"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub model: ModelSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub workers: Option<usize>,
    pub threads: Option<usize>,
    pub timeout: Option<u64>,
    pub max_upload_mb: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSection {
    pub name: Option<String>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
}

impl FileConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| FixerError::ConfigError {
            message: format!("Cannot read config file {}: {}", path.display(), e),
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| FixerError::ConfigError {
            message: format!("Invalid TOML config: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nport = 5000\nthreads = 4\n\n[model]\nendpoint = \"http://localhost:9999\""
        )
        .unwrap();

        let config = FileConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, Some(5000));
        assert_eq!(config.server.threads, Some(4));
        assert_eq!(config.server.workers, None);
        assert_eq!(config.model.endpoint.as_deref(), Some("http://localhost:9999"));
    }

    #[test]
    fn test_empty_file_is_valid() {
        let config = FileConfig::parse("").unwrap();
        assert!(config.server.port.is_none());
        assert!(config.model.name.is_none());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = FileConfig::from_file("/nonexistent/bugfixer.toml").unwrap_err();
        assert!(matches!(err, FixerError::ConfigError { .. }));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(FileConfig::parse("[server]\nprot = 1").is_err());
    }
}
