//! PosterRequest - the two form fields sent to the generation endpoint.

use super::error::PosterError;

/// A poster submission: the brand name and an optional offer tagline.
///
/// Values are kept exactly as the user typed them. Only the validity check
/// looks at the trimmed brand name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PosterRequest {
    salon_name: String,
    offer: String,
}

impl PosterRequest {
    /// Build a request, rejecting a blank brand name.
    ///
    /// # Errors
    ///
    /// Returns `PosterError::Validation` if `salon_name` is empty or
    /// whitespace-only.
    pub fn new(salon_name: impl Into<String>, offer: impl Into<String>) -> Result<Self, PosterError> {
        let request = Self {
            salon_name: salon_name.into(),
            offer: offer.into(),
        };
        request.validate()?;
        Ok(request)
    }

    /// Build a request with an empty offer.
    pub fn without_offer(salon_name: impl Into<String>) -> Result<Self, PosterError> {
        Self::new(salon_name, String::new())
    }

    /// Check the brand name is non-empty after trimming.
    pub fn validate(&self) -> Result<(), PosterError> {
        if self.salon_name.trim().is_empty() {
            return Err(PosterError::Validation);
        }
        Ok(())
    }

    pub fn salon_name(&self) -> &str {
        &self.salon_name
    }

    pub fn offer(&self) -> &str {
        &self.offer
    }
}
