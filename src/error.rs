//! Error types for loading and querying the knowledge base.
//!
//! Only construction-time problems are errors. Anything that goes wrong while
//! a game is being played is an ordinary terminal outcome, see
//! [`crate::session::FailureReason`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Fact file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed fact `{line}`: {reason}")]
    MalformedFact { line: String, reason: String },

    #[error("Unknown animal: {0}")]
    UnknownAnimal(String),
}

impl KnowledgeError {
    pub(crate) fn malformed(line: &str, reason: impl Into<String>) -> Self {
        KnowledgeError::MalformedFact {
            line: line.trim().to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            KnowledgeError::FileNotFound { path }
        } else {
            KnowledgeError::Io { path, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, KnowledgeError>;
