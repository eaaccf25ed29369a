//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `STOREFRONT_HOST` - Bind address (default: 0.0.0.0)
//! - `STOREFRONT_PORT` - Listen port (default: 8083)
//! - `PAYMENT_DELAY_MS` - Simulated payment time (default: 3000)
//! - `AUTH_DELAY_MS` - Simulated password-reset round trip (default: 1500)
//! - `ADMIN_EMAILS` - Comma-separated emails that sign in as admin
//! - `CATALOG_PATH` - JSON product file replacing the bundled catalog

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_PAYMENT_DELAY_MS: u64 = 3000;
const DEFAULT_AUTH_DELAY_MS: u64 = 1500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    pub host: IpAddr,
    pub port: u16,
    pub payment_delay: Duration,
    pub auth_delay: Duration,
    pub admin_emails: Vec<String>,
    pub catalog_path: Option<PathBuf>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8083,
            payment_delay: Duration::from_millis(DEFAULT_PAYMENT_DELAY_MS),
            auth_delay: Duration::from_millis(DEFAULT_AUTH_DELAY_MS),
            admin_emails: Vec::new(),
            catalog_path: None,
        }
    }
}

impl StorefrontConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup, falling back to defaults for
    /// unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let host = parse_or("STOREFRONT_HOST", lookup("STOREFRONT_HOST"), defaults.host)?;
        let port = parse_or("STOREFRONT_PORT", lookup("STOREFRONT_PORT"), defaults.port)?;
        let payment_delay =
            Duration::from_millis(parse_or("PAYMENT_DELAY_MS", lookup("PAYMENT_DELAY_MS"), DEFAULT_PAYMENT_DELAY_MS)?);
        let auth_delay = Duration::from_millis(parse_or("AUTH_DELAY_MS", lookup("AUTH_DELAY_MS"), DEFAULT_AUTH_DELAY_MS)?);
        let admin_emails = lookup("ADMIN_EMAILS")
            .map(|v| v.split(',').map(str::trim).filter(|e| !e.is_empty()).map(String::from).collect())
            .unwrap_or_default();
        let catalog_path = lookup("CATALOG_PATH").filter(|p| !p.trim().is_empty()).map(PathBuf::from);

        Ok(Self { host, port, payment_delay, auth_delay, admin_emails, catalog_path })
    }

    pub fn socket_addr(&self) -> SocketAddr { SocketAddr::new(self.host, self.port) }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::InvalidEnvVar(key, v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config(&[]).unwrap(), StorefrontConfig::default());
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("STOREFRONT_PORT", "9000"),
            ("PAYMENT_DELAY_MS", "10"),
            ("ADMIN_EMAILS", "ops@shop.test, ,owner@shop.test"),
            ("CATALOG_PATH", "/srv/catalog.json"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.payment_delay, Duration::from_millis(10));
        assert_eq!(cfg.auth_delay, Duration::from_millis(1500));
        assert_eq!(cfg.admin_emails, vec!["ops@shop.test", "owner@shop.test"]);
        assert_eq!(cfg.catalog_path, Some(PathBuf::from("/srv/catalog.json")));
        assert_eq!(cfg.socket_addr().port(), 9000);
    }

    #[test]
    fn test_invalid_port() {
        let err = config(&[("STOREFRONT_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar("STOREFRONT_PORT", _)));
    }
}
