//! Listener settings from the environment.
//!
//! - `DEPROP_BIND`: interface to bind (default `0.0.0.0`)
//! - `DEPROP_PORT`: port to listen on (default `8080`)

use anyhow::{Context, Result};

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Where the server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset or blank values keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = Self::default();
        if let Some(bind) = lookup("DEPROP_BIND").filter(|v| !v.trim().is_empty()) {
            settings.bind = bind.trim().to_string();
        }
        if let Some(port) = lookup("DEPROP_PORT").filter(|v| !v.trim().is_empty()) {
            settings.port = port
                .trim()
                .parse()
                .with_context(|| format!("DEPROP_PORT is not a valid port: {}", port))?;
        }
        Ok(settings)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
