//! Console error types.

use std::path::PathBuf;

use thiserror::Error;

use docbind_bindings::ConfigError;

/// Why a new client id cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientIdError {
    #[error("client id is empty")]
    Empty,

    #[error("client {id} already exists")]
    Duplicate { id: String },

    #[error("{id} is not an email address")]
    Malformed { id: String },
}

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("could not read config {path}: {error}")]
    ConfigIo {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error(transparent)]
    Bindings(#[from] ConfigError),

    #[error(transparent)]
    ClientId(#[from] ClientIdError),

    #[error(transparent)]
    Store(#[from] docbind_core_store::Error),
}
