//! Error types for content loading.

/// Errors that can occur while loading or indexing content tables.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// Failed to read a content file from disk.
    #[error("failed to read content file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse content YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// Two records in the same table share an id.
    #[error("duplicate {kind} id: {id}")]
    DuplicateId {
        /// Table the duplicate was found in.
        kind: &'static str,
        /// The repeated id.
        id: String,
    },

    /// A record references an id that does not exist.
    #[error("{kind} {owner} references unknown id {target}")]
    DanglingReference {
        /// Table of the referencing record.
        kind: &'static str,
        /// Id of the referencing record.
        owner: String,
        /// The missing id.
        target: String,
    },

    /// A table violates a structural rule.
    #[error("invalid content: {message}")]
    Invalid {
        /// Description of the violation.
        message: String,
    },
}

impl From<serde_yml::Error> for ContentError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}
