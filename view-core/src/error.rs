use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewError {
    /// Unknown adapter key. Always fatal to the render call that asked for it.
    #[error("View \"{0}\" not found in adapter")]
    NotFound(String),

    /// Invalid view definition detected while building an adapter.
    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised by the platform collaborator (send/edit/delete/answer).
    #[error("Platform error: {0}")]
    Platform(String),

    /// Raised by a view definition while populating its draft.
    #[error("View error: {0}")]
    View(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ViewError>;
