//! Error types for the web server.

use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("invalid web configuration: {0}")]
    Config(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WebError>;
