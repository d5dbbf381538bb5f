//! Command line arguments
//!
//! Every flag is optional here; defaults live in the configuration layer so
//! that a config file or environment variable can supply them instead.

use super::types::ProtocolVersion;
use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "dirserve", version, about = "A simple web server.")]
pub struct Cli {
    /// Specify alternate dir [default: web]
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<String>,

    /// Specify alternate port [default: 8000]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Specify alternate bind address [default: all interfaces]
    #[arg(short, long, value_name = "ADDRESS")]
    pub bind: Option<String>,

    /// HTTP version to speak, HTTP/1.0 or HTTP/1.1 [default: HTTP/1.0]
    #[arg(long, value_name = "VERSION")]
    pub protocol: Option<ProtocolVersion>,

    /// Config file name, extension optional; missing files are ignored
    #[arg(short, long, default_value = "dirserve", env = "DIRSERVE_CONFIG")]
    pub config: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_flags() {
        let cli = Cli::parse_from(["dirserve", "-d", "public", "-p", "9000", "-b", "127.0.0.1"]);
        assert_eq!(cli.dir.as_deref(), Some("public"));
        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.bind.as_deref(), Some("127.0.0.1"));
        assert_eq!(cli.protocol, None);
    }

    #[test]
    fn test_parse_long_flags() {
        let cli = Cli::parse_from([
            "dirserve",
            "--dir",
            "site",
            "--port",
            "8080",
            "--protocol",
            "HTTP/1.1",
        ]);
        assert_eq!(cli.dir.as_deref(), Some("site"));
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.protocol, Some(ProtocolVersion::Http11));
    }

    #[test]
    fn test_rejects_non_numeric_port() {
        assert!(Cli::try_parse_from(["dirserve", "--port", "http"]).is_err());
    }
}
