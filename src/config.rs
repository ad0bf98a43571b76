//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;

/// Application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Book service behavior
    pub books: BookServiceConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 9000,
            host: "localhost".to_string(),
        }
    }
}

/// Book service configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookServiceConfig {
    /// Re-derive `finished` when a book is updated
    ///
    /// Off by default: updates leave `finished` as it was at creation.
    pub recompute_finished_on_update: bool,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = ServerConfig::default();
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.port),
                host: env::var("HOST").unwrap_or(defaults.host),
            },
            books: BookServiceConfig {
                recompute_finished_on_update: env::var("RECOMPUTE_FINISHED_ON_UPDATE")
                    .map(|v| parse_flag(&v))
                    .unwrap_or(false),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        env::remove_var("PORT");
        env::remove_var("HOST");
        env::remove_var("RECOMPUTE_FINISHED_ON_UPDATE");
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "localhost");
        assert!(!config.books.recompute_finished_on_update);
        assert_eq!(config.server_addr(), "localhost:9000");
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        env::set_var("PORT", "3000");
        env::set_var("HOST", "0.0.0.0");
        env::set_var("RECOMPUTE_FINISHED_ON_UPDATE", "true");

        let config = Config::from_env();
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
        assert!(config.books.recompute_finished_on_update);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_port_falls_back() {
        clear_env();
        env::set_var("PORT", "not-a-port");
        assert_eq!(Config::from_env().server.port, 9000);
        clear_env();
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" YES "));
        assert!(parse_flag("On"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
