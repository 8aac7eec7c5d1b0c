//! Shared configuration for the authkit workspace.

pub mod config;

pub use config::{AppConfig, AuthConfig, DatabaseConfig, ServerConfig};
