//! Service configuration with TOML file support.
//!
//! Policy constants are not configurable; they come from
//! [`badge_types::PolicyParams::default`]. The operator password is never read
//! from the file, only from `BADGE_OPERATOR_PASSWORD`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use badge_types::{Handle, TypesError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PASSWORD_ENV: &str = "BADGE_OPERATOR_PASSWORD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(String),

    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid blacklisted handle: {0}")]
    Blacklist(#[from] TypesError),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Directory of the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_lmdb_map_size")]
    pub lmdb_map_size: usize,

    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Bearer token for unverify and weekly validation. Unset disables them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Entryway used for operator login.
    #[serde(default = "default_service_url")]
    pub service_url: String,

    /// Base of public group links.
    #[serde(default = "default_web_base_url")]
    pub web_base_url: String,

    /// Quoted in warning and removal messages.
    #[serde(default = "default_site_url")]
    pub site_url: String,

    #[serde(default)]
    pub operator_handle: String,

    #[serde(default)]
    pub operator_did: String,

    #[serde(default)]
    pub labeler_did: String,

    #[serde(default = "default_chat_service_did")]
    pub chat_service_did: String,

    /// Base URL of the external per-module validation service.
    #[serde(default = "default_validation_base_url")]
    pub validation_base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Handles that asked not to be verified.
    #[serde(default)]
    pub handle_blacklist: Vec<String>,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./badge_data")
}

fn default_lmdb_map_size() -> usize {
    badge_store_lmdb::DEFAULT_MAP_SIZE
}

fn default_rpc_port() -> u16 {
    8080
}

fn default_service_url() -> String {
    "https://bsky.social".to_string()
}

fn default_web_base_url() -> String {
    "https://bsky.app".to_string()
}

fn default_site_url() -> String {
    "https://verifiedbsky.net".to_string()
}

fn default_chat_service_did() -> String {
    "did:web:api.bsky.chat".to_string()
}

fn default_validation_base_url() -> String {
    "http://localhost:7071/api".to_string()
}

fn default_request_timeout_secs() -> u64 {
    badge_types::params::EXTERNAL_CALL_TIMEOUT.as_secs()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

impl ServiceConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn blacklist(&self) -> Result<HashSet<Handle>, ConfigError> {
        self.handle_blacklist
            .iter()
            .map(|h| Handle::parse(h).map_err(ConfigError::from))
            .collect()
    }

    /// Settings every command talking to the social graph needs.
    pub fn validate_graph_settings(&self) -> Result<(), ConfigError> {
        if self.operator_handle.trim().is_empty() {
            return Err(ConfigError::Missing("operator_handle"));
        }
        if self.operator_did.trim().is_empty() {
            return Err(ConfigError::Missing("operator_did"));
        }
        if self.labeler_did.trim().is_empty() {
            return Err(ConfigError::Missing("labeler_did"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Parse(
                "request_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            lmdb_map_size: default_lmdb_map_size(),
            rpc_port: default_rpc_port(),
            api_token: None,
            service_url: default_service_url(),
            web_base_url: default_web_base_url(),
            site_url: default_site_url(),
            operator_handle: String::new(),
            operator_did: String::new(),
            labeler_did: String::new(),
            chat_service_did: default_chat_service_did(),
            validation_base_url: default_validation_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            handle_blacklist: Vec::new(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = ServiceConfig::from_toml_str("").unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.rpc_port, 8080);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.log_format, "human");
    }

    #[test]
    fn partial_toml_overrides() {
        let config = ServiceConfig::from_toml_str(
            r#"
            rpc_port = 9000
            operator_handle = "badges.example"
            handle_blacklist = ["opted.out"]
            "#,
        )
        .unwrap();
        assert_eq!(config.rpc_port, 9000);
        assert_eq!(config.operator_handle, "badges.example");
        assert_eq!(config.web_base_url, "https://bsky.app");
        let blacklist = config.blacklist().unwrap();
        assert!(blacklist.contains(&Handle::parse("opted.out").unwrap()));
    }

    #[test]
    fn default_config_survives_toml() {
        let mut config = ServiceConfig::default();
        config.api_token = Some("secret".into());
        let text = config.to_toml_string().unwrap();
        assert_eq!(ServiceConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn unknown_types_are_rejected() {
        let err = ServiceConfig::from_toml_str("rpc_port = \"eighty\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "site_url = \"https://badges.example\"").unwrap();
        let config = ServiceConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.site_url, "https://badges.example");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = ServiceConfig::from_toml_file(Path::new("/nonexistent/badge.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn graph_commands_need_operator_and_labeler() {
        let mut config = ServiceConfig::default();
        assert!(matches!(
            config.validate_graph_settings(),
            Err(ConfigError::Missing("operator_handle"))
        ));
        config.operator_handle = "badges.example".into();
        config.operator_did = "did:plc:operator".into();
        assert!(matches!(
            config.validate_graph_settings(),
            Err(ConfigError::Missing("labeler_did"))
        ));
        config.labeler_did = "did:plc:labeler".into();
        assert!(config.validate_graph_settings().is_ok());
    }
}
