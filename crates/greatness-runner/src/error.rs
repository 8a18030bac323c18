//! Error types for the runner binary.
//!
//! [`RunnerError`] is the top-level error type that wraps every failure
//! mode during startup and shutdown.

/// Top-level error for the runner binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: greatness_engine::ConfigError,
    },

    /// Content tables could not be loaded or failed validation.
    #[error("content error: {source}")]
    Content {
        /// The underlying content error.
        #[from]
        source: greatness_content::ContentError,
    },

    /// The save slot failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: greatness_store::StoreError,
    },

    /// A save document could not be encoded or decoded.
    #[error("snapshot error: {source}")]
    Snapshot {
        /// The underlying snapshot error.
        #[from]
        source: greatness_engine::SnapshotError,
    },
}

impl From<greatness_engine::PersistenceError> for RunnerError {
    fn from(error: greatness_engine::PersistenceError) -> Self {
        match error {
            greatness_engine::PersistenceError::Store { source } => Self::Store { source },
            greatness_engine::PersistenceError::Snapshot { source } => Self::Snapshot { source },
        }
    }
}
