use std::env;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Host the HTTP server binds to
    /// Default: 127.0.0.1
    pub host: String,

    /// Port the HTTP server binds to
    /// Default: 8080
    pub port: u16,

    /// Maximum JSON payload size for all requests (in bytes)
    /// Default: 1MB (1024 * 1024)
    pub max_payload_size: usize,

    /// Directory for the rolling log files
    pub log_dir: String,

    /// Log path reported to the front-end by the settings endpoint
    pub log_path: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Optional environment variables:
    /// - HOST: bind host (default: 127.0.0.1)
    /// - PORT: bind port (default: 8080)
    /// - MAX_PAYLOAD_SIZE: Maximum request payload size in bytes (default: 1048576 = 1MB)
    /// - LOG_DIR: directory for log files (default: logs)
    /// - SCHEDULER_LOG_PATH: value of `log_path` in the settings response (default: empty)
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| format!("PORT must be a valid port number, got '{}'", raw))?,
            None => 8080,
        };

        // Parse MAX_PAYLOAD_SIZE with default fallback
        let max_payload_size = lookup("MAX_PAYLOAD_SIZE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1024 * 1024); // Default: 1MB

        let log_dir = lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string());
        let log_path = lookup("SCHEDULER_LOG_PATH").unwrap_or_default();

        Ok(Config {
            host,
            port,
            max_payload_size,
            log_dir,
            log_path,
        })
    }
}
