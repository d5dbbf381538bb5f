// Configuration module entry point
// Layers defaults, config file, environment and command line into one
// immutable Config

mod cli;
mod state;
mod types;

use std::net::{IpAddr, SocketAddr, ToSocketAddrs};

// Re-export public types
pub use cli::Cli;
pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, ProtocolVersion, ServerConfig};

/// Environment variable prefix, e.g. `DIRSERVE_SERVER__PORT=9000`
const ENV_PREFIX: &str = "DIRSERVE";

impl Config {
    /// Load configuration for the given command line.
    ///
    /// Precedence, lowest first: built-in defaults, `cli.config` file (may be
    /// missing), `DIRSERVE_*` environment variables, command line flags.
    pub fn load(cli: &Cli) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&cli.config).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.root_dir", "web")?
            .set_default("server.bind_address", "")?
            .set_default("server.port", 8000)?
            .set_default("server.protocol_version", "HTTP/1.0")?
            .set_default("http.index_files", vec!["index.html", "index.htm"])?
            .set_default(
                "http.server_name",
                concat!("dirserve/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("http.connection_timeout", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_override_option("server.root_dir", cli.dir.clone())?
            .set_override_option("server.port", cli.port.map(i64::from))?
            .set_override_option("server.bind_address", cli.bind.clone())?
            .set_override_option(
                "server.protocol_version",
                cli.protocol.map(ProtocolVersion::as_str),
            )?
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;
        cfg.absolutize_root()
            .map_err(|e| config::ConfigError::Message(format!("Invalid root_dir: {e}")))?;
        Ok(cfg)
    }

    /// Resolve the bind address, an empty host meaning all interfaces
    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        let host = self.server.bind_address.trim();
        let host = if host.is_empty() { "0.0.0.0" } else { host };
        let port = self.server.port;

        if let Ok(ip) = host.trim_matches(['[', ']']).parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, port));
        }
        (host, port)
            .to_socket_addrs()
            .map_err(|e| format!("Invalid address '{host}': {e}"))?
            .next()
            .ok_or_else(|| format!("Invalid address '{host}': no addresses found"))
    }

    fn absolutize_root(&mut self) -> std::io::Result<()> {
        if self.server.root_dir.is_relative() {
            self.server.root_dir = std::env::current_dir()?.join(&self.server.root_dir);
        }
        Ok(())
    }
}
