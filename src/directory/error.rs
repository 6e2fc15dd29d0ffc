use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("network error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("directory returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode directory response: {0}")]
    Decode(#[source] reqwest::Error),
}

impl DirectoryError {
    /// HTTP status of the failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            DirectoryError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
