//! Web server configuration and per-application context.

use std::net::SocketAddr;

use crate::error::{Result, WebError};

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5000";
/// Upload cap applied to request bodies.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;
/// Session cookie name cleared by `POST /logout`.
pub const SESSION_COOKIE: &str = "session";

/// Settings supplied at startup.
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub listen_addr: SocketAddr,
    /// Application secret. Must not be empty.
    pub secret_key: String,
    pub max_upload_bytes: usize,
}

impl WebConfig {
    pub fn new(listen_addr: SocketAddr, secret_key: impl Into<String>) -> Self {
        Self {
            listen_addr,
            secret_key: secret_key.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    #[must_use]
    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.secret_key.trim().is_empty() {
            return Err(WebError::Config("secret key must not be empty".to_string()));
        }
        if self.max_upload_bytes == 0 {
            return Err(WebError::Config(
                "upload limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Read-only state shared by every handler.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: WebConfig,
}

impl AppContext {
    /// Build a context from a validated configuration.
    pub fn new(config: WebConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }
}
