//! PosterSession - the state behind the poster screen.
//!
//! Holds the two input fields, the loading flag and the latest poster, and
//! turns every failure into a [`Notice`] for the user. Nothing here is fatal:
//! after any error the session is idle and ready for another submission.

use std::fmt;

use crate::config::PosterConfig;
use crate::poster::{ImageMaterializer, PosterClient, PosterError, PosterRequest, PosterResult};
use crate::share::{share_poster, ShareError, ShareTarget};

/// Message shown when the brand name is missing.
pub const VALIDATION_MESSAGE: &str = "Salon / Brand name is required.";

/// A user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{}: {}", self.title, self.message)
        }
    }
}

impl From<&PosterError> for Notice {
    fn from(err: &PosterError) -> Self {
        match err {
            PosterError::Validation => Notice::new("Validation", VALIDATION_MESSAGE),
            other => Notice::new("Error", other.to_string()),
        }
    }
}

impl From<&ShareError> for Notice {
    fn from(err: &ShareError) -> Self {
        match err {
            ShareError::Unavailable { .. } => {
                Notice::new("Sharing not supported on this device", "")
            }
            ShareError::Failed { message, .. } => Notice::new("Share error", message.clone()),
        }
    }
}

/// State of the poster screen.
///
/// `generate` takes `&mut self`, so a session never has more than one
/// request in flight.
pub struct PosterSession {
    client: PosterClient,
    materializer: ImageMaterializer,
    salon_name: String,
    offer: String,
    loading: bool,
    poster: Option<PosterResult>,
}

impl PosterSession {
    pub fn new(client: PosterClient, materializer: ImageMaterializer) -> Self {
        Self {
            client,
            materializer,
            salon_name: String::new(),
            offer: String::new(),
            loading: false,
            poster: None,
        }
    }

    /// Build a session from resolved configuration.
    pub fn from_config(config: &PosterConfig) -> Result<Self, PosterError> {
        let client = PosterClient::new(config)?;
        let materializer = ImageMaterializer::new(config.cache_dir.clone());
        Ok(Self::new(client, materializer))
    }

    pub fn set_salon_name(&mut self, salon_name: impl Into<String>) {
        self.salon_name = salon_name.into();
    }

    pub fn set_offer(&mut self, offer: impl Into<String>) {
        self.offer = offer.into();
    }

    pub fn salon_name(&self) -> &str {
        &self.salon_name
    }

    pub fn offer(&self) -> &str {
        &self.offer
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The most recently generated poster, if any.
    pub fn poster(&self) -> Option<&PosterResult> {
        self.poster.as_ref()
    }

    pub fn client(&self) -> &PosterClient {
        &self.client
    }

    /// Generate a poster from the current fields.
    ///
    /// The previous poster is cleared as soon as the request starts. On
    /// success the new poster replaces it; on failure the screen shows none.
    pub async fn generate(&mut self) -> Result<&PosterResult, PosterError> {
        let request = PosterRequest::new(self.salon_name.clone(), self.offer.clone())?;

        self.loading = true;
        self.poster = None;

        let outcome = self.run(&request).await;
        self.loading = false;

        match outcome {
            Ok(poster) => Ok(self.poster.insert(poster)),
            Err(e) => {
                log::error!("Poster generation failed: {}", e);
                Err(e)
            }
        }
    }

    async fn run(&self, request: &PosterRequest) -> Result<PosterResult, PosterError> {
        let bytes = self.client.submit(request).await?;
        self.materializer.store(&bytes).await
    }

    /// Like [`generate`](Self::generate), but reports failure as a notice.
    pub async fn generate_or_notice(&mut self) -> Result<PosterResult, Notice> {
        match self.generate().await {
            Ok(poster) => Ok(poster.clone()),
            Err(e) => Err(Notice::from(&e)),
        }
    }

    /// Share the current poster through `target`.
    ///
    /// Returns `Ok(false)` without touching the target when there is no
    /// poster yet.
    pub fn share(&self, target: &dyn ShareTarget) -> Result<bool, ShareError> {
        match &self.poster {
            Some(poster) => share_poster(target, poster).map(|()| true),
            None => {
                log::debug!("Nothing to share yet");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validation_notice() {
        let notice = Notice::from(&PosterError::Validation);
        assert_eq!(notice.title, "Validation");
        assert_eq!(notice.message, VALIDATION_MESSAGE);
    }

    #[test]
    fn test_server_error_notice() {
        let notice = Notice::from(&PosterError::Server {
            status: 500,
            body: "boom".to_string(),
        });
        assert_eq!(notice, Notice::new("Error", "Server error: 500 boom"));
        assert_eq!(notice.to_string(), "Error: Server error: 500 boom");
    }

    #[test]
    fn test_share_notices() {
        let notice = Notice::from(&ShareError::Unavailable {
            target: "xdg-open".to_string(),
        });
        assert_eq!(notice.title, "Sharing not supported on this device");
        assert_eq!(notice.to_string(), "Sharing not supported on this device");

        let notice = Notice::from(&ShareError::Failed {
            target: "save".to_string(),
            message: "disk full".to_string(),
        });
        assert_eq!(notice, Notice::new("Share error", "disk full"));
    }

    fn test_session() -> PosterSession {
        let client = PosterClient::with_endpoint("http://127.0.0.1:9/generate").unwrap();
        let materializer = ImageMaterializer::new(PathBuf::from("/nonexistent"));
        PosterSession::new(client, materializer)
    }

    #[test]
    fn test_new_session_is_idle_and_empty() {
        let session = test_session();
        assert!(!session.is_loading());
        assert!(session.poster().is_none());
        assert_eq!(session.salon_name(), "");
        assert_eq!(session.offer(), "");
    }

    #[tokio::test]
    async fn test_generate_blank_name_stays_idle() {
        let mut session = test_session();
        session.set_salon_name("   ");

        let result = session.generate().await;

        assert!(matches!(result, Err(PosterError::Validation)));
        assert!(!session.is_loading());
    }

    #[test]
    fn test_share_without_poster_is_noop() {
        let session = test_session();
        let target = crate::share::SaveToDirectory::new(PathBuf::from("/nonexistent"));
        assert!(!session.share(&target).unwrap());
    }
}
