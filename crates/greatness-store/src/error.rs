//! Error types for save slot persistence.

/// Errors that can occur while reading or writing a save slot.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing file could not be read, written, or removed.
    #[error("save slot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The save slot path has no parent directory or file name.
    #[error("invalid save slot path: {0}")]
    InvalidPath(String),
}
