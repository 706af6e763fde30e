//! Content repository errors

use thiserror::Error;

/// Errors raised while talking to the content repository
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("Document not found: {doc_type}/{uid}")]
    NotFound { doc_type: String, uid: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Repository did not advertise a master ref")]
    MissingMasterRef,

    #[error("Invalid endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("Fixture error: {0}")]
    Fixture(#[from] std::io::Error),
}

impl CmsError {
    /// Whether the error means the requested document does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, CmsError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, CmsError>;
