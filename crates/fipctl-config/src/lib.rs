#![deny(unsafe_code)]

//! Cluster configuration for fipctl.
//!
//! Loads the TOML file that tells the CLI which control planes exist and
//! where their sockets live. Provides [`ClustersConfig`] as the central
//! configuration structure.
//!
//! ```toml
//! default_cluster = "prod"
//!
//! [logging]
//! level = "info"
//!
//! [clusters.prod]
//! socket_path = "/run/fipd/prod.sock"
//! description = "production control plane"
//!
//! [clusters.staging]
//! socket_path = "/run/fipd/staging.sock"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unknown cluster {0:?}")]
    UnknownCluster(String),

    #[error("no cluster specified and no default_cluster configured")]
    NoCluster,
}

/// Top-level fipctl configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ClustersConfig {
    /// Cluster used when the caller names none.
    #[serde(default)]
    pub default_cluster: Option<String>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Known control planes, keyed by cluster name.
    #[serde(default)]
    pub clusters: BTreeMap<String, ClusterConfig>,
}

/// One control plane the CLI knows about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Unix socket path of the cluster's control plane.
    pub socket_path: String,

    /// Optional operator-facing description.
    #[serde(default)]
    pub description: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ClustersConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config = Self::parse(&content)?;
        debug!(path = %path.display(), clusters = config.clusters.len(), "loaded cluster config");
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: ClustersConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, cluster) in &self.clusters {
            if cluster.socket_path.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "clusters.{name}.socket_path must not be empty"
                )));
            }
        }
        if let Some(default) = &self.default_cluster {
            if !self.clusters.contains_key(default) {
                return Err(ConfigError::Validation(format!(
                    "default_cluster {default:?} is not a defined cluster"
                )));
            }
        }
        Ok(())
    }

    /// Names of all defined clusters, in sorted order.
    pub fn cluster_names(&self) -> Vec<&str> {
        self.clusters.keys().map(String::as_str).collect()
    }

    /// Resolve the cluster to talk to: the named one when given,
    /// otherwise `default_cluster`.
    pub fn resolve(&self, name: Option<&str>) -> Result<&ClusterConfig, ConfigError> {
        let key = name
            .or(self.default_cluster.as_deref())
            .ok_or(ConfigError::NoCluster)?;
        self.clusters
            .get(key)
            .ok_or_else(|| ConfigError::UnknownCluster(key.to_string()))
    }
}
