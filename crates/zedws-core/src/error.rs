use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    /// The workspace store could not be opened or queried at all
    #[error("Workspace store unavailable at {}: {reason}", path.display())]
    StoreUnavailable { path: PathBuf, reason: String },

    /// A stored location matched no recognized path shape
    #[error("Malformed location: {0:?}")]
    MalformedLocation(String),
}

impl Error {
    pub(crate) fn store_unavailable(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::StoreUnavailable {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
