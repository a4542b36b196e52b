//! Server configuration for the DBBE search API.
//!
//! This module provides configuration types for the REST server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DBBE_SERVER_PORT` | 8080 | Server port |
//! | `DBBE_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `DBBE_LOG_LEVEL` | info | Log level |
//! | `DBBE_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `DBBE_ENABLE_CORS` | true | Enable CORS |
//! | `DBBE_CORS_ORIGINS` | * | Allowed origins |
//! | `DBBE_CORS_METHODS` | GET,OPTIONS | Allowed methods |
//! | `DBBE_CORS_HEADERS` | Content-Type,Accept,X-Dbbe-Roles | Allowed headers |
//! | `DBBE_DEFAULT_PAGE_SIZE` | 25 | Page size when `limit` is missing |
//! | `DBBE_MAX_PAGE_SIZE` | 1000 | Largest accepted `limit` |
//! | `DBBE_STORAGE_BACKEND` | memory | `memory` or `elasticsearch` |
//! | `DBBE_DATA_FILE` | (none) | JSON documents for the memory backend |
//! | `DBBE_ES_NODES` | http://localhost:9200 | Elasticsearch nodes |
//! | `DBBE_ES_INDEX_PREFIX` | dbbe | Elasticsearch index prefix |
//! | `DBBE_ROLE_HEADER` | X-Dbbe-Roles | Header carrying the caller's roles |
//! | `DBBE_INTERNAL_ROLE` | ROLE_VIEW_INTERNAL | Role allowed to see internal data |
//!
//! # Example
//!
//! ```rust
//! use dbbe_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::fmt;
use std::str::FromStr;

use clap::Parser;

/// Which search backend serves requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackendMode {
    /// In-process documents loaded from a JSON file.
    Memory,
    /// An Elasticsearch cluster; records are still read from the data file.
    Elasticsearch,
}

impl fmt::Display for StorageBackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackendMode::Memory => write!(f, "memory"),
            StorageBackendMode::Elasticsearch => write!(f, "elasticsearch"),
        }
    }
}

impl FromStr for StorageBackendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StorageBackendMode::Memory),
            "elasticsearch" | "es" => Ok(StorageBackendMode::Elasticsearch),
            other => Err(format!(
                "unknown storage backend '{}', expected 'memory' or 'elasticsearch'",
                other
            )),
        }
    }
}

/// Server configuration for the DBBE search API.
///
/// This struct can be constructed from command line arguments using
/// [`ServerConfig::parse`], from environment variables using
/// [`ServerConfig::from_env`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "dbbe")]
#[command(about = "Database of Byzantine Book Epigrams search server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "DBBE_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "DBBE_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "DBBE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "DBBE_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "DBBE_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "DBBE_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(long, env = "DBBE_CORS_METHODS", default_value = "GET,OPTIONS")]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "DBBE_CORS_HEADERS",
        default_value = "Content-Type,Accept,X-Dbbe-Roles"
    )]
    pub cors_headers: String,

    /// Page size used when a request has no valid `limit`.
    #[arg(long, env = "DBBE_DEFAULT_PAGE_SIZE", default_value = "25")]
    pub default_page_size: usize,

    /// Maximum page size for search results.
    #[arg(long, env = "DBBE_MAX_PAGE_SIZE", default_value = "1000")]
    pub max_page_size: usize,

    /// Search backend (memory, elasticsearch).
    #[arg(long, env = "DBBE_STORAGE_BACKEND", default_value = "memory")]
    pub storage_backend: String,

    /// JSON file with documents keyed by entity path.
    #[arg(long, env = "DBBE_DATA_FILE")]
    pub data_file: Option<String>,

    /// Elasticsearch node URLs (comma-separated).
    #[arg(long, env = "DBBE_ES_NODES", default_value = "http://localhost:9200")]
    pub elasticsearch_nodes: String,

    /// Elasticsearch index prefix.
    #[arg(long, env = "DBBE_ES_INDEX_PREFIX", default_value = "dbbe")]
    pub elasticsearch_index_prefix: String,

    /// Elasticsearch username for basic auth.
    #[arg(long, env = "DBBE_ES_USERNAME")]
    pub elasticsearch_username: Option<String>,

    /// Elasticsearch password for basic auth.
    #[arg(long, env = "DBBE_ES_PASSWORD")]
    pub elasticsearch_password: Option<String>,

    /// Header set by the authenticating proxy with the caller's roles.
    #[arg(long, env = "DBBE_ROLE_HEADER", default_value = "X-Dbbe-Roles")]
    pub role_header: String,

    /// Role that unlocks internal records and filters.
    #[arg(long, env = "DBBE_INTERNAL_ROLE", default_value = "ROLE_VIEW_INTERNAL")]
    pub internal_role: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,OPTIONS".to_string(),
            cors_headers: "Content-Type,Accept,X-Dbbe-Roles".to_string(),
            default_page_size: 25,
            max_page_size: 1000,
            storage_backend: "memory".to_string(),
            data_file: None,
            elasticsearch_nodes: "http://localhost:9200".to_string(),
            elasticsearch_index_prefix: "dbbe".to_string(),
            elasticsearch_username: None,
            elasticsearch_password: None,
            role_header: "X-Dbbe-Roles".to_string(),
            internal_role: "ROLE_VIEW_INTERNAL".to_string(),
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    pub fn from_env() -> Self {
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parses the configured storage backend.
    pub fn storage_backend_mode(&self) -> Result<StorageBackendMode, String> {
        self.storage_backend.parse()
    }

    /// Returns the configured Elasticsearch nodes.
    pub fn elasticsearch_node_list(&self) -> Vec<String> {
        self.elasticsearch_nodes
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.default_page_size == 0 {
            errors.push("Default page size cannot be 0".to_string());
        }

        if self.default_page_size > self.max_page_size {
            errors.push("Default page size cannot exceed max page size".to_string());
        }

        if let Err(e) = self.storage_backend_mode() {
            errors.push(e);
        }

        if self.role_header.trim().is_empty() {
            errors.push("Role header cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0 and a small page size.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            default_page_size: 10,
            max_page_size: 100,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_page_size, 25);
        assert_eq!(
            config.storage_backend_mode(),
            Ok(StorageBackendMode::Memory)
        );
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            port: 3000,
            host: "0.0.0.0".to_string(),
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = ServerConfig {
            port: 0,
            default_page_size: 100,
            max_page_size: 50,
            storage_backend: "sqlite".to_string(),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("Port")));
        assert!(errors.iter().any(|e| e.contains("sqlite")));
    }

    #[test]
    fn test_node_list() {
        let config = ServerConfig {
            elasticsearch_nodes: "http://a:9200, ,http://b:9200".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.elasticsearch_node_list(),
            vec!["http://a:9200", "http://b:9200"]
        );
    }

    #[test]
    fn test_for_testing() {
        let config = ServerConfig::for_testing();
        assert_eq!(config.port, 0);
        assert!(!config.enable_cors);
        assert_eq!(config.max_page_size, 100);
    }
}
