//! Configuration loading for the bot manager.
//!
//! Supports a JSON configuration file plus `HOST`/`PORT` environment
//! overrides applied in `main`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Root configuration for the manager
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub docker: DockerConfig,

    /// Directory where uploaded strategy files are written; also the host
    /// side of the container bind-mount
    #[serde(default = "default_strategies_dir")]
    pub strategies_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockerConfig {
    /// Path of the bind-mounted Docker daemon socket
    #[serde(default = "default_socket")]
    pub socket: String,

    /// Engine API version segment used in request paths
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Image every bot container is created from
    #[serde(default = "default_image")]
    pub image: String,

    /// Bridge network shared with the rest of the backend
    #[serde(default = "default_network")]
    pub network: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_socket() -> String {
    "/var/run/docker.sock".to_string()
}

fn default_api_version() -> String {
    "v1.41".to_string()
}

fn default_image() -> String {
    "strategy-baseline:latest".to_string()
}

fn default_network() -> String {
    "shoal_backend".to_string()
}

fn default_strategies_dir() -> String {
    "./strategies".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            socket: default_socket(),
            api_version: default_api_version(),
            image: default_image(),
            network: default_network(),
        }
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            docker: DockerConfig::default(),
            strategies_dir: default_strategies_dir(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ManagerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
