//! Server configuration from flags and environment.

use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8888;
pub const DEFAULT_DB_PATH: &str = "projectManagementDB.db";

/// Project tracker HTTP server.
#[derive(Debug, Clone, Parser)]
#[command(name = "tracker-server", version)]
pub struct ServerConfig {
    /// TCP port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "TRACKER_BIND", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub bind: IpAddr,

    /// SQLite database file, created on first start
    #[arg(long = "db", env = "TRACKER_DB_PATH", default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Log level (trace|debug|info|warn|error); defaults per build mode
    #[arg(long, env = "TRACKER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; stderr when unset
    #[arg(long, env = "TRACKER_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Also copy file logs to stderr
    #[arg(long, env = "TRACKER_LOG_STDERR")]
    pub log_stderr: bool,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn effective_log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or_else(|| tracker_core::default_log_level())
    }
}

#[cfg(test)]
mod tests {
    use super::{ServerConfig, DEFAULT_DB_PATH, DEFAULT_PORT};
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "tracker-server",
            "--port",
            "9000",
            "--bind",
            "0.0.0.0",
            "--db",
            "/tmp/tracker.db",
            "--log-level",
            "warn",
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:9000");
        assert_eq!(config.db_path, Path::new("/tmp/tracker.db"));
        assert_eq!(config.effective_log_level(), "warn");
        assert!(!config.log_stderr);
    }

    #[test]
    fn log_level_falls_back_to_build_default() {
        let mut config = ServerConfig::try_parse_from(["tracker-server"]).unwrap();
        config.log_level = None;
        assert_eq!(config.effective_log_level(), tracker_core::default_log_level());

        config.log_level = Some("trace".to_string());
        assert_eq!(config.effective_log_level(), "trace");
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert!(ServerConfig::try_parse_from(["tracker-server", "--port", "http"]).is_err());
    }

    #[test]
    fn defaults_match_documented_values() {
        assert_eq!(DEFAULT_PORT, 8888);
        assert_eq!(DEFAULT_DB_PATH, "projectManagementDB.db");
    }
}
