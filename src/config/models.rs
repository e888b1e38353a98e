// src/config/models.rs
use serde::Deserialize;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub checks: Vec<CheckConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
    #[serde(default = "default_path")]
    pub path: String,
    pub check_timeout_ms: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            path: default_path(),
            check_timeout_ms: None,
        }
    }
}

impl ServerConfig {
    pub fn check_timeout(&self) -> Option<Duration> {
        self.check_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckConfig {
    pub name: String,
    pub kind: ProbeKind,
    /// Absent means the probe runs on every status request.
    pub period_secs: Option<u64>,
}

impl CheckConfig {
    pub fn period(&self) -> Option<Duration> {
        self.period_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProbeKind {
    Tcp {
        address: String,
        #[serde(default = "default_probe_timeout_ms")]
        timeout_ms: u64,
    },
    File {
        path: PathBuf,
    },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("health path must start with '/': {0}")]
    InvalidPath(String),

    #[error("check name must not be empty")]
    EmptyCheckName,

    #[error("duplicate check name: {0}")]
    DuplicateCheck(String),

    #[error("check {0}: period_secs must be greater than zero")]
    ZeroPeriod(String),

    #[error("{0}: timeout must be greater than zero")]
    ZeroTimeout(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.server.path.starts_with('/') {
            return Err(ConfigError::InvalidPath(self.server.path.clone()));
        }
        if self.server.check_timeout_ms == Some(0) {
            return Err(ConfigError::ZeroTimeout("server".to_string()));
        }

        let mut seen = HashSet::new();
        for check in &self.checks {
            if check.name.trim().is_empty() {
                return Err(ConfigError::EmptyCheckName);
            }
            if !seen.insert(check.name.as_str()) {
                return Err(ConfigError::DuplicateCheck(check.name.clone()));
            }
            if check.period_secs == Some(0) {
                return Err(ConfigError::ZeroPeriod(check.name.clone()));
            }
            if let ProbeKind::Tcp { timeout_ms: 0, .. } = check.kind {
                return Err(ConfigError::ZeroTimeout(format!("check {}", check.name)));
            }
        }

        Ok(())
    }
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_path() -> String {
    crate::server::DEFAULT_HEALTH_PATH.to_string()
}

fn default_probe_timeout_ms() -> u64 {
    1000
}
