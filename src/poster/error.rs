use std::path::PathBuf;

/// Errors that can occur while generating or storing a poster.
#[derive(Debug, thiserror::Error)]
pub enum PosterError {
    #[error("Salon / Brand name is required")]
    Validation,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server error: {status} {body}")]
    Server {
        /// HTTP status code returned by the endpoint
        status: u16,
        /// Response body text, surfaced verbatim
        body: String,
    },

    #[error("Failed to write poster to '{}': {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

impl PosterError {
    /// Whether the error came from user input and can be fixed by re-prompting.
    pub fn is_validation(&self) -> bool {
        matches!(self, PosterError::Validation)
    }

    /// HTTP status code, for server errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            PosterError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}
