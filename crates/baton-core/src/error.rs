use thiserror::Error;

/// Errors raised by the core library.
///
/// Parse failures of the CLI grammar itself are not represented here; those
/// surface as [`crate::dispatch::DispatchError::Usage`] at the dispatch
/// boundary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("session '{0}' not found")]
    NotFound(String),

    #[error("session '{0}' already exists")]
    AlreadyExists(String),

    #[error("invalid session name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("invalid registry: {0}")]
    Registry(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot import '{path}': {reason}")]
    Import { path: String, reason: String },

    #[error("archive error: {0}")]
    Archive(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
