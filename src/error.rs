//! Error types shared across the quiz engine, question bank and history store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised when a quiz run cannot start.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    /// The requested number of questions was zero.
    #[error("invalid configuration: question count must be positive (got {requested})")]
    InvalidConfiguration { requested: usize },

    /// The question bank has no entries to draw from.
    #[error("question bank is empty")]
    EmptyBank,
}

/// Errors raised while loading or building a question bank.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("vocabulary file not found: {0}")]
    MissingData(String),

    #[error("unable to decode vocabulary file {file}: {source}")]
    Decode {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate vocabulary id: {0}")]
    DuplicateId(String),
}

/// Errors raised by the session history store.
///
/// These are never fatal to a quiz run: the engine logs them and keeps the
/// completed record available to the shell.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("unable to create history directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to decode session history in {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to encode session history: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("unable to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

/// Errors raised by an AR rendering backend.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("asset unavailable: {0}")]
    AssetUnavailable(String),
}
