// Configuration types module
// Defines all configuration-related data structures

use crate::logger::LogLevel;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

/// Server configuration, fixed once the listener is bound
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Directory every served path is confined to
    pub root_dir: PathBuf,
    /// Empty means all interfaces
    pub bind_address: String,
    pub port: u16,
    /// Status line version and keep-alive; HTTP/1.1 clients are answered
    /// with `HTTP/1.0` when that is configured
    pub protocol_version: ProtocolVersion,
    /// Runtime worker threads (CPU cores when unset)
    #[serde(default)]
    pub workers: Option<usize>,
}

/// HTTP version announced to clients
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolVersion {
    #[default]
    #[serde(rename = "HTTP/1.0")]
    Http10,
    #[serde(rename = "HTTP/1.1")]
    Http11,
}

impl ProtocolVersion {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http10 => "HTTP/1.0",
            Self::Http11 => "HTTP/1.1",
        }
    }

    /// HTTP/1.0 closes the connection after every response
    pub const fn keep_alive(self) -> bool {
        matches!(self, Self::Http11)
    }

    /// Version written on the status line of every response
    pub const fn http_version(self) -> hyper::Version {
        match self {
            Self::Http10 => hyper::Version::HTTP_10,
            Self::Http11 => hyper::Version::HTTP_11,
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProtocolVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HTTP/1.0" | "1.0" => Ok(Self::Http10),
            "HTTP/1.1" | "1.1" => Ok(Self::Http11),
            other => Err(format!("unsupported protocol version '{other}'")),
        }
    }
}

/// HTTP serving configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Files served in place of a listing, tried in order
    pub index_files: Vec<String>,
    /// Value of the `Server` response header
    pub server_name: String,
    /// Upper bound for one connection, in seconds
    pub connection_timeout: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub access_log: bool,
    /// Access log format (common, combined, json, or custom pattern)
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}
