//! Configuration loading and management

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Socket address to bind (e.g., "127.0.0.1:8000")
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Default `tracing` filter, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            log_filter: default_log_filter(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Where uploaded files are kept
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaConfig {
    #[serde(default = "default_media_root")]
    pub root: PathBuf,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: default_media_root(),
        }
    }
}

fn default_media_root() -> PathBuf {
    PathBuf::from("./media")
}

/// An account seeded at start-up, with the API token that authenticates it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountConfig {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    pub token: String,
}

/// Complete configuration of a catalog server
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LibraryConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub media: MediaConfig,

    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

impl LibraryConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Reject account lists that could not be seeded or authenticated
    fn check(&self) -> Result<()> {
        for (i, account) in self.accounts.iter().enumerate() {
            if account.token.trim().is_empty() {
                anyhow::bail!("account '{}' has an empty token", account.username);
            }
            let later = &self.accounts[i + 1..];
            if later.iter().any(|a| a.username == account.username) {
                anyhow::bail!("duplicate account username '{}'", account.username);
            }
            if later.iter().any(|a| a.token == account.token) {
                anyhow::bail!("duplicate token for account '{}'", account.username);
            }
        }
        Ok(())
    }

    /// A development configuration with one administrator and one reader
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            media: MediaConfig::default(),
            accounts: vec![
                AccountConfig {
                    username: "admin".to_string(),
                    email: "admin@example.com".to_string(),
                    is_admin: true,
                    token: "admin-token".to_string(),
                },
                AccountConfig {
                    username: "reader".to_string(),
                    email: "reader@example.com".to_string(),
                    is_admin: false,
                    token: "reader-token".to_string(),
                },
            ],
        }
    }
}
