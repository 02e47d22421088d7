//! Error type for every fallible core operation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TreeError>;

/// All failures are local and recoverable: the caller keeps its previous
/// snapshot and reports the message.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("node not found: {id}")]
    NodeNotFound { id: String },

    #[error("duplicate id: {id}")]
    DuplicateId { id: String },

    #[error("the root node cannot be deleted")]
    CannotDeleteRoot,

    #[error("track '{track}' is not active on node '{node}'")]
    TrackNotActive { node: String, track: String },

    #[error("quantity must be a finite number, got {value}")]
    InvalidQuantity { value: f64 },

    #[error("unknown track: {id}")]
    UnknownTrack { id: String },

    #[error("malformed text: {0}")]
    MalformedText(#[source] serde_json::Error),

    #[error("failed to encode export: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("invalid data structure: {message}")]
    InvalidSchema { message: String },

    #[error("import rejected: {message}")]
    InvalidImport { message: String },

    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TreeError {
    pub(crate) fn node_not_found(id: &str) -> Self {
        Self::NodeNotFound { id: id.to_string() }
    }

    pub(crate) fn invalid_schema(message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            message: message.into(),
        }
    }
}
