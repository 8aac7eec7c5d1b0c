use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Signs short-lived access tokens. No default: a missing secret is
    /// a startup failure, never a runtime one.
    pub access_secret: String,
    /// Signs refresh tokens. Distinct from the access secret so a leak
    /// of one cannot mint credentials of the other kind.
    pub refresh_secret: String,
    #[serde(default = "default_access_ttl")]
    pub access_ttl_seconds: i64,
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_seconds: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_access_ttl() -> i64 {
    900 // 15 minutes
}

fn default_refresh_ttl() -> i64 {
    604_800 // 7 days
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from authkit.toml in the current directory,
    /// with environment variable overrides.
    ///
    /// Environment variables use the AUTHKIT_ prefix with `__` between
    /// path segments. Example: AUTHKIT_DATABASE__URL,
    /// AUTHKIT_AUTH__ACCESS_SECRET, AUTHKIT_AUTH__REFRESH_SECRET.
    pub fn load_with_env() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("authkit").required(false))
            .add_source(
                config::Environment::with_prefix("AUTHKIT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        assert_eq!(default_access_ttl(), 900);
        assert_eq!(default_refresh_ttl(), 604_800);
        assert_eq!(default_host(), "0.0.0.0");
        assert_eq!(default_port(), 4000);
    }

    #[test]
    fn full_config_parses_with_defaults_applied() {
        let raw = r#"
            [database]
            url = "sqlite://authkit.db"

            [auth]
            access_secret = "a"
            refresh_secret = "r"

            [server]
        "#;

        let config: AppConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.auth.access_ttl_seconds, 900);
        assert_eq!(config.auth.refresh_ttl_seconds, 604_800);
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn missing_secret_is_rejected() {
        let raw = r#"
            [database]
            url = "sqlite://authkit.db"

            [auth]
            access_secret = "a"

            [server]
        "#;

        assert!(toml::from_str::<AppConfig>(raw).is_err());
    }
}
