//! Worker configuration.

use std::time::Duration;

/// Connection and retry settings shared by every worker of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Entry attempts before giving up.
    pub max_attempts: u32,
    /// Upper bound on one request/response exchange, connect included.
    pub request_timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 65432,
            max_attempts: 3,
            request_timeout: Duration::from_secs(5),
        }
    }
}

impl WorkerConfig {
    /// `host:port` of the server.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WorkerConfig::default();
        assert_eq!(config.addr(), "127.0.0.1:65432");
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
