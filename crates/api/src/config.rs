//! Application configuration loaded from environment variables.

use std::time::Duration;

use orchestrator::OrchestratorConfig;

use crate::chaos::ChaosConfig;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `json` switches to structured log output
/// - `HTTP_TIMEOUT`: seconds allowed per dependency call (default: `5`)
/// - `ORDERS_PAYMENT_URI`, `ORDERS_SHIPPING_URI`: downstream endpoints
/// - `PROXY_HOST`, `PROXY_PORT`: optional outbound HTTP proxy
/// - `DATABASE_URL`: PostgreSQL connection string; orders stay in memory when unset
/// - `SIMULATE_LATENCY`, `SIMULATE_CPU`, `SIMULATE_LEAK`, `SIMULATE_ERROR`: fault injection
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub json_logs: bool,
    pub http_timeout: Duration,
    pub payment_uri: String,
    pub shipping_uri: String,
    pub proxy_host: Option<String>,
    pub proxy_port: Option<u16>,
    pub database_url: Option<String>,
    pub chaos: ChaosConfig,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let flag = |key: &str| {
            non_empty(key)
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
                .unwrap_or(false)
        };

        Self {
            host: non_empty("HOST").unwrap_or(defaults.host),
            port: non_empty("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: non_empty("RUST_LOG").unwrap_or(defaults.log_level),
            json_logs: non_empty("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
            http_timeout: non_empty("HTTP_TIMEOUT")
                .and_then(|t| t.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            payment_uri: non_empty("ORDERS_PAYMENT_URI").unwrap_or(defaults.payment_uri),
            shipping_uri: non_empty("ORDERS_SHIPPING_URI").unwrap_or(defaults.shipping_uri),
            proxy_host: non_empty("PROXY_HOST"),
            proxy_port: non_empty("PROXY_PORT").and_then(|p| p.parse().ok()),
            database_url: non_empty("DATABASE_URL"),
            chaos: ChaosConfig {
                latency: flag("SIMULATE_LATENCY"),
                cpu: flag("SIMULATE_CPU"),
                leak: flag("SIMULATE_LEAK"),
                error: flag("SIMULATE_ERROR"),
                ..defaults.chaos
            },
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the outbound proxy URL when both host and port are set.
    pub fn proxy_url(&self) -> Option<String> {
        match (&self.proxy_host, self.proxy_port) {
            (Some(host), Some(port)) => Some(format!("http://{host}:{port}")),
            _ => None,
        }
    }

    /// Settings for the order placement pipeline.
    pub fn orchestrator(&self) -> OrchestratorConfig {
        OrchestratorConfig::new(self.http_timeout, &self.payment_uri, &self.shipping_uri)
    }
}

impl Default for Config {
    fn default() -> Self {
        let orchestrator = OrchestratorConfig::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            json_logs: false,
            http_timeout: orchestrator.timeout,
            payment_uri: orchestrator.payment_uri,
            shipping_uri: orchestrator.shipping_uri,
            proxy_host: None,
            proxy_port: None,
            database_url: None,
            chaos: ChaosConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serial_test::serial;

    use super::*;

    fn from_map(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.payment_uri, "http://payment/paymentAuth");
        assert_eq!(config.shipping_uri, "http://shipping/shipping");
        assert!(config.database_url.is_none());
        assert!(!config.chaos.any_enabled());
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_reads_overrides() {
        let config = from_map(&[
            ("PORT", "8081"),
            ("HTTP_TIMEOUT", "2"),
            ("ORDERS_PAYMENT_URI", "http://pay.local/auth"),
            ("ORDERS_SHIPPING_URI", "http://ship.local/ship"),
            ("LOG_FORMAT", "JSON"),
            ("DATABASE_URL", "postgres://localhost/orders"),
        ]);
        assert_eq!(config.port, 8081);
        assert_eq!(config.http_timeout, Duration::from_secs(2));
        assert_eq!(config.payment_uri, "http://pay.local/auth");
        assert_eq!(config.shipping_uri, "http://ship.local/ship");
        assert!(config.json_logs);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/orders"));

        let orchestrator = config.orchestrator();
        assert_eq!(orchestrator.timeout, Duration::from_secs(2));
        assert_eq!(orchestrator.payment_uri, "http://pay.local/auth");
    }

    #[test]
    fn test_unparseable_values_fall_back_to_defaults() {
        let config = from_map(&[("PORT", "eighty"), ("HTTP_TIMEOUT", "soon"), ("HOST", "  ")]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_proxy_requires_host_and_port() {
        assert_eq!(from_map(&[("PROXY_HOST", "proxy")]).proxy_url(), None);
        assert_eq!(from_map(&[("PROXY_PORT", "3128")]).proxy_url(), None);
        assert_eq!(
            from_map(&[("PROXY_HOST", "proxy"), ("PROXY_PORT", "3128")]).proxy_url(),
            Some("http://proxy:3128".to_string())
        );
    }

    #[test]
    fn test_fault_toggles() {
        let config = from_map(&[("SIMULATE_LATENCY", "true"), ("SIMULATE_ERROR", "1")]);
        assert!(config.chaos.latency);
        assert!(config.chaos.error);
        assert!(!config.chaos.cpu);
        assert!(!config.chaos.leak);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_process_environment() {
        // SAFETY: serialised with the other environment tests.
        unsafe {
            std::env::set_var("PORT", "9090");
            std::env::set_var("SIMULATE_LEAK", "on");
        }
        let config = Config::from_env();
        unsafe {
            std::env::remove_var("PORT");
            std::env::remove_var("SIMULATE_LEAK");
        }
        assert_eq!(config.port, 9090);
        assert!(config.chaos.leak);
    }

    #[test]
    #[serial]
    fn test_from_env_without_variables_uses_defaults() {
        unsafe {
            std::env::remove_var("PORT");
            std::env::remove_var("DATABASE_URL");
        }
        let config = Config::from_env();
        assert_eq!(config.port, 3000);
        assert!(config.database_url.is_none());
    }
}
