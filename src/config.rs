use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::editor::DEFAULT_BATCH_DELAY;

const APP_DIR: &str = "swagger-nav-tui";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Local path or http(s) URL of the OpenAPI/Swagger document
    pub spec_source: Option<String>,
    /// API base URL for requests
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Whether endpoint groups start expanded
    pub groups_expanded: bool,
    /// How long typed characters are held before they reach an editor
    pub paste_batch_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            groups_expanded: true,
            paste_batch_ms: DEFAULT_BATCH_DELAY.as_millis() as u64,
        }
    }
}

impl UiConfig {
    pub fn paste_batch_delay(&self) -> Duration {
        Duration::from_millis(self.paste_batch_ms)
    }
}

impl Config {
    /// `~/.config/swagger-nav-tui/config.toml`, creating the directory if needed
    pub fn config_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| color_eyre::eyre::eyre!("Could not find home directory"))?;

        let app_dir = home_dir.join(".config").join(APP_DIR);
        if !app_dir.exists() {
            fs::create_dir_all(&app_dir)?;
        }

        Ok(app_dir.join("config.toml"))
    }

    /// Load config from the default location, or defaults if there is no file
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string)?;
        tracing::info!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Set the spec source and base URL. Without an explicit base URL one is
    /// derived from a remote source.
    pub fn set_spec_source(&mut self, spec_source: String, base_url: Option<String>) {
        self.server.base_url = base_url
            .filter(|b| !b.trim().is_empty())
            .or_else(|| extract_base_url(&spec_source))
            .or_else(|| self.server.base_url.take());
        self.server.spec_source = Some(spec_source);
    }
}

/// A spec source is either an http(s) URL or a path to an existing file
pub fn validate_source(source: &str) -> Result<(), String> {
    let source = source.trim();
    if source.is_empty() {
        return Err("Spec source cannot be empty".to_string());
    }

    if source.starts_with("http://") || source.starts_with("https://") {
        return url::Url::parse(source)
            .map(|_| ())
            .map_err(|e| format!("Invalid URL: {}", e));
    }

    if source.contains("://") {
        return Err("URL must start with http:// or https://".to_string());
    }

    if !Path::new(source).is_file() {
        return Err(format!("No such file: {}", source));
    }

    Ok(())
}

/// Base URL must be an http(s) URL when given
pub fn validate_base_url(base_url: &str) -> Result<(), String> {
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err("Base URL must start with http:// or https://".to_string());
    }
    url::Url::parse(base_url)
        .map(|_| ())
        .map_err(|e| format!("Invalid URL: {}", e))
}

/// Scheme, host and port of a remote spec URL
/// Example: http://localhost:5000/swagger/v1/swagger.json -> http://localhost:5000
pub fn extract_base_url(spec_source: &str) -> Option<String> {
    let parsed = url::Url::parse(spec_source).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let host = parsed.host_str()?;

    Some(match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.ui.groups_expanded);
        assert_eq!(config.ui.paste_batch_delay(), DEFAULT_BATCH_DELAY);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.set_spec_source("http://localhost:5000/swagger/v1/swagger.json".into(), None);
        config.ui.groups_expanded = false;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(
            loaded.server.base_url.as_deref(),
            Some("http://localhost:5000")
        );
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server]\nspec_source = \"./openapi.yaml\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.spec_source.as_deref(), Some("./openapi.yaml"));
        assert_eq!(config.server.base_url, None);
        assert_eq!(config.ui, UiConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_local_source_keeps_base_url() {
        let mut config = Config::default();
        config.server.base_url = Some("https://api.example.com".into());
        config.set_spec_source("./openapi.yaml".into(), None);
        assert_eq!(
            config.server.base_url.as_deref(),
            Some("https://api.example.com")
        );

        config.set_spec_source("./openapi.yaml".into(), Some("http://127.0.0.1:8080".into()));
        assert_eq!(
            config.server.base_url.as_deref(),
            Some("http://127.0.0.1:8080")
        );
    }

    #[test]
    fn test_extract_base_url() {
        assert_eq!(
            extract_base_url("https://petstore3.swagger.io/api/v3/openapi.json").as_deref(),
            Some("https://petstore3.swagger.io")
        );
        assert_eq!(
            extract_base_url("http://localhost:5000/swagger.json").as_deref(),
            Some("http://localhost:5000")
        );
        assert_eq!(extract_base_url("./openapi.yaml"), None);
    }

    #[test]
    fn test_validate_source() {
        assert!(validate_source("").is_err());
        assert!(validate_source("ftp://example.com/spec.json").is_err());
        assert!(validate_source("https://example.com/spec.json").is_ok());
        assert!(validate_source("/definitely/not/here.yaml").is_err());

        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(validate_source(&file.path().to_string_lossy()).is_ok());
    }

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url("http://localhost:5000").is_ok());
        assert!(validate_base_url("localhost:5000").is_err());
    }
}
