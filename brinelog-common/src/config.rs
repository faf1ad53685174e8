//! Configuration loading and resolution
//!
//! Priority order for every field: environment variable → TOML config
//! file → compiled default. A missing or malformed config file never
//! aborts startup; defaults apply with a warning.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Compiled default backend base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Optional overrides read from the TOML config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub base_url: Option<String>,
    pub media_upload_url: Option<String>,
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub upload_preset: Option<String>,
    pub credential_file: Option<PathBuf>,
}

/// Fully resolved client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend REST API base URL
    pub base_url: String,
    /// Media host upload endpoint. Empty means "derive from cloud_name".
    pub media_upload_url: String,
    /// Media host account name, used to derive the upload endpoint
    pub cloud_name: String,
    /// Public media host API key sent alongside the signature
    pub api_key: String,
    /// Named upload preset covered by the signature
    pub upload_preset: String,
    /// Where the admin credential is persisted
    pub credential_file: PathBuf,
}

impl ClientConfig {
    /// Load configuration from the default config file location
    ///
    /// Missing file → defaults. Malformed file → warning + defaults.
    pub fn load() -> Self {
        let toml_config = match default_config_path() {
            Some(path) if path.exists() => match load_toml_config(&path) {
                Ok(config) => config,
                Err(e) => {
                    warn!("config file ignored: {}", e);
                    TomlConfig::default()
                }
            },
            _ => TomlConfig::default(),
        };
        Self::resolve(toml_config)
    }

    /// Resolve a config from TOML overrides plus the environment
    pub fn resolve(toml_config: TomlConfig) -> Self {
        let cloud_name = resolve_field(
            "BRINELOG_CLOUD_NAME",
            toml_config.cloud_name,
            String::new(),
        );
        let media_upload_url = resolve_field(
            "BRINELOG_MEDIA_UPLOAD_URL",
            toml_config.media_upload_url,
            default_media_upload_url(&cloud_name),
        );
        let credential_file = std::env::var("BRINELOG_CREDENTIAL_FILE")
            .map(PathBuf::from)
            .ok()
            .or(toml_config.credential_file)
            .unwrap_or_else(default_credential_file);

        Self {
            base_url: resolve_field(
                "BRINELOG_BASE_URL",
                toml_config.base_url,
                DEFAULT_BASE_URL.to_string(),
            ),
            media_upload_url,
            cloud_name,
            api_key: resolve_field("BRINELOG_API_KEY", toml_config.api_key, String::new()),
            upload_preset: resolve_field(
                "BRINELOG_UPLOAD_PRESET",
                toml_config.upload_preset,
                String::new(),
            ),
            credential_file,
        }
    }
}

fn resolve_field(env_var: &str, toml_value: Option<String>, default: String) -> String {
    if let Ok(value) = std::env::var(env_var) {
        if !value.trim().is_empty() {
            return value;
        }
    }
    toml_value.unwrap_or(default)
}

/// Media host upload endpoint derived from the account name
fn default_media_upload_url(cloud_name: &str) -> String {
    if cloud_name.is_empty() {
        String::new()
    } else {
        format!("https://api.cloudinary.com/v1_1/{}/image/upload", cloud_name)
    }
}

/// Default config file path: `<config dir>/brinelog/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("BRINELOG_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|d| d.join("brinelog").join("config.toml"))
}

/// Default credential file path: `<config dir>/brinelog/credential`
pub fn default_credential_file() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("brinelog").join("credential"))
        .unwrap_or_else(|| PathBuf::from("./brinelog_credential"))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("parse {} failed: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        for var in [
            "BRINELOG_BASE_URL",
            "BRINELOG_MEDIA_UPLOAD_URL",
            "BRINELOG_CLOUD_NAME",
            "BRINELOG_API_KEY",
            "BRINELOG_UPLOAD_PRESET",
            "BRINELOG_CREDENTIAL_FILE",
            "BRINELOG_CONFIG",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn defaults_apply_with_no_overrides() {
        clear_env();
        let config = ClientConfig::resolve(TomlConfig::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.media_upload_url.is_empty());
        assert!(config.api_key.is_empty());
    }

    #[test]
    #[serial]
    fn env_beats_toml() {
        clear_env();
        std::env::set_var("BRINELOG_BASE_URL", "https://env.example.com");
        let toml_config = TomlConfig {
            base_url: Some("https://toml.example.com".to_string()),
            ..Default::default()
        };
        let config = ClientConfig::resolve(toml_config);
        assert_eq!(config.base_url, "https://env.example.com");
        std::env::remove_var("BRINELOG_BASE_URL");
    }

    #[test]
    #[serial]
    fn toml_beats_default() {
        clear_env();
        let toml_config = TomlConfig {
            base_url: Some("https://toml.example.com".to_string()),
            cloud_name: Some("brinejar".to_string()),
            ..Default::default()
        };
        let config = ClientConfig::resolve(toml_config);
        assert_eq!(config.base_url, "https://toml.example.com");
        assert_eq!(
            config.media_upload_url,
            "https://api.cloudinary.com/v1_1/brinejar/image/upload"
        );
    }

    #[test]
    #[serial]
    fn malformed_toml_is_a_config_error() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "base_url = [not toml").unwrap();

        match load_toml_config(&path) {
            Err(Error::Config(_)) => {}
            other => panic!("expected Config error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    #[serial]
    fn toml_file_round_trip() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "base_url = \"https://file.example.com\"").unwrap();
        writeln!(file, "upload_preset = \"jars\"").unwrap();

        let loaded = load_toml_config(&path).unwrap();
        let config = ClientConfig::resolve(loaded);
        assert_eq!(config.base_url, "https://file.example.com");
        assert_eq!(config.upload_preset, "jars");
    }
}
