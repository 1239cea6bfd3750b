//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `WORKFORCE_*` environment variables, configuration files
//! and command-line flags, in OrthoConfig's usual precedence.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Settings controlling the listener and the document store backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WORKFORCE")]
pub struct AppSettings {
    /// Address to bind the HTTP listener to.
    pub host: Option<IpAddr>,
    /// Port to bind the HTTP listener to.
    pub port: Option<u16>,
    /// PostgreSQL connection string. The in-memory store is used when unset.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Seconds to wait when checking out a pooled connection.
    pub connection_timeout_secs: Option<u64>,
}

impl AppSettings {
    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(
            self.connection_timeout_secs
                .unwrap_or(DEFAULT_CONNECTION_TIMEOUT_SECS),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "WORKFORCE_HOST",
        "WORKFORCE_PORT",
        "WORKFORCE_DATABASE_URL",
        "WORKFORCE_POOL_MAX_SIZE",
        "WORKFORCE_CONNECTION_TIMEOUT_SECS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("workforce")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr(),
            SocketAddr::new(DEFAULT_HOST, DEFAULT_PORT)
        );
        assert!(settings.database_url().is_none());
        assert_eq!(settings.pool_max_size(), DEFAULT_POOL_MAX_SIZE);
        assert_eq!(
            settings.connection_timeout(),
            Duration::from_secs(DEFAULT_CONNECTION_TIMEOUT_SECS)
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("WORKFORCE_HOST", Some("127.0.0.1".to_owned())),
            ("WORKFORCE_PORT", Some("8081".to_owned())),
            (
                "WORKFORCE_DATABASE_URL",
                Some("postgres://localhost/workforce".to_owned()),
            ),
            ("WORKFORCE_POOL_MAX_SIZE", Some("4".to_owned())),
            ("WORKFORCE_CONNECTION_TIMEOUT_SECS", Some("5".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr(),
            "127.0.0.1:8081".parse::<SocketAddr>().expect("valid addr")
        );
        assert_eq!(
            settings.database_url(),
            Some("postgres://localhost/workforce")
        );
        assert_eq!(settings.pool_max_size(), 4);
        assert_eq!(settings.connection_timeout(), Duration::from_secs(5));
    }

    #[rstest]
    fn blank_database_url_selects_memory_store() {
        let _guard = lock_env([
            ("WORKFORCE_HOST", None),
            ("WORKFORCE_PORT", None),
            ("WORKFORCE_DATABASE_URL", Some("   ".to_owned())),
            ("WORKFORCE_POOL_MAX_SIZE", None),
            ("WORKFORCE_CONNECTION_TIMEOUT_SECS", None),
        ]);

        assert!(load_from_empty_args().database_url().is_none());
    }
}
