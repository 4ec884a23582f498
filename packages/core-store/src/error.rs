//! Error types for document store access.

use crate::path::PathError;
use crate::reference::DocRef;

/// Errors raised by document stores.
///
/// `Clone` so that a binding can keep the last write failure in its error
/// slot while also reporting it to the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Field path validation error.
    #[error("path error: {0}")]
    Path(#[from] PathError),

    /// A path could not be applied to the document shape.
    #[error("invalid path: {message}")]
    InvalidPath { message: String },

    /// The addressed document does not exist.
    #[error("document not found: {doc}")]
    NotFound { doc: DocRef },

    /// A document was created where one already exists.
    #[error("document already exists: {doc}")]
    AlreadyExists { doc: DocRef },

    /// The store refused the write (permissions, rules, quota).
    #[error("write rejected: {message}")]
    Rejected { message: String },

    /// The write could not be delivered.
    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("{message}")]
    Other { message: String },
}

impl Error {
    pub fn rejected(message: impl Into<String>) -> Self {
        Error::Rejected {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Error::Transport {
            message: message.into(),
        }
    }
}
