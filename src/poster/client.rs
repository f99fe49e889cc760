//! PosterClient - submits poster requests to the generation endpoint.

use reqwest::multipart::Form;
use reqwest::Url;
use serde::Deserialize;

use super::error::PosterError;
use super::request::PosterRequest;
use crate::config::{parse_endpoint, ConfigError, PosterConfig};

/// Form field carrying the brand name.
pub const FIELD_SALON_NAME: &str = "salonName";

/// Form field carrying the offer tagline.
pub const FIELD_OFFER: &str = "offer";

/// Path of the server's health check, relative to the endpoint host.
const HEALTH_PATH: &str = "/health";

/// Body of the server's health check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// Client for the poster generation endpoint.
///
/// Performs exactly one POST per [`submit`](Self::submit) call. There are no
/// retries: a failed attempt is reported once and left to the caller.
pub struct PosterClient {
    endpoint: Url,
    http_client: reqwest::Client,
}

impl PosterClient {
    /// Create a client from the resolved configuration.
    ///
    /// A request timeout is applied only when one is configured and non-zero.
    pub fn new(config: &PosterConfig) -> Result<Self, PosterError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout.filter(|t| !t.is_zero()) {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            http_client,
        })
    }

    /// Create a client for an endpoint given as a string.
    ///
    /// Useful for testing against a mock server.
    pub fn with_endpoint(endpoint: &str) -> Result<Self, PosterError> {
        let endpoint = parse_endpoint(endpoint).map_err(|e| match e {
            ConfigError::InvalidEndpoint { url, reason } => {
                PosterError::InvalidEndpoint { url, reason }
            }
            other => PosterError::InvalidEndpoint {
                url: endpoint.to_string(),
                reason: other.to_string(),
            },
        })?;
        Self::new(&PosterConfig::new(endpoint))
    }

    /// Get the endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Build the multipart body for a request.
    ///
    /// Always exactly two text fields, `salonName` and `offer`.
    fn build_form(request: &PosterRequest) -> Form {
        Form::new()
            .text(FIELD_SALON_NAME, request.salon_name().to_string())
            .text(FIELD_OFFER, request.offer().to_string())
    }

    /// Submit a poster request and return the raw image bytes.
    ///
    /// # Errors
    ///
    /// Returns `PosterError::Validation` before any network I/O if the brand
    /// name is blank, `PosterError::Server` for a non-2xx response (with the
    /// status and body text), or `PosterError::Network` if the request or the
    /// body transfer fails.
    pub async fn submit(&self, request: &PosterRequest) -> Result<Vec<u8>, PosterError> {
        request.validate()?;

        log::info!(
            "Submitting poster request for {:?} to {}",
            request.salon_name(),
            self.endpoint
        );

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .multipart(Self::build_form(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_else(|_| String::new());
            log::warn!("Poster endpoint returned {}: {}", status, body);
            return Err(PosterError::Server { status, body });
        }

        let bytes = response.bytes().await?;
        log::debug!("Received {} bytes of poster data", bytes.len());
        Ok(bytes.to_vec())
    }

    /// Validate the raw field values and submit them.
    ///
    /// Convenience for callers holding the two text fields directly.
    pub async fn submit_fields(&self, salon_name: &str, offer: &str) -> Result<Vec<u8>, PosterError> {
        let request = PosterRequest::new(salon_name, offer)?;
        self.submit(&request).await
    }

    /// URL of the health check on the endpoint's host.
    pub fn health_url(&self) -> Result<Url, PosterError> {
        self.endpoint
            .join(HEALTH_PATH)
            .map_err(|e| PosterError::InvalidEndpoint {
                url: self.endpoint.to_string(),
                reason: e.to_string(),
            })
    }

    /// Check the generation server.
    ///
    /// # Errors
    ///
    /// Returns `PosterError::Server` for a non-2xx response and
    /// `PosterError::Network` if the server cannot be reached or the body is
    /// not the expected JSON.
    pub async fn check_health(&self) -> Result<HealthStatus, PosterError> {
        let url = self.health_url()?;
        log::debug!("Checking server health at {}", url);

        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_else(|_| String::new());
            return Err(PosterError::Server { status, body });
        }

        let health: HealthStatus = response.json().await?;
        Ok(health)
    }
}
