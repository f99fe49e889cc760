//! Helpers shared by the integration tests.

#![allow(dead_code)]

use wiremock::{Match, Request};

/// Ten bytes that look like the start of a PNG file.
pub const PNG_LIKE: &[u8; 10] = b"\x89PNG\r\n\x1a\n\x00\x01";

/// Extract the `(name, value)` pairs of a multipart/form-data request body,
/// in the order they were sent.
pub fn multipart_fields(request: &Request) -> Vec<(String, String)> {
    let content_type = request
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let Some(boundary) = content_type
        .split(';')
        .map(str::trim)
        .find_map(|p| p.strip_prefix("boundary="))
        .map(|b| b.trim_matches('"').to_string())
    else {
        return Vec::new();
    };

    let body = String::from_utf8_lossy(&request.body);
    let delimiter = format!("--{}", boundary);

    body.split(delimiter.as_str())
        .filter_map(|part| {
            // The preamble is empty and the closing delimiter is followed by "--".
            let part = part.strip_prefix("\r\n")?;
            let (headers, value) = part.split_once("\r\n\r\n")?;
            let name = headers
                .lines()
                .find(|l| l.to_ascii_lowercase().starts_with("content-disposition"))
                .and_then(|l| {
                    l.split(';')
                        .map(str::trim)
                        .find_map(|p| p.strip_prefix("name="))
                })
                .map(|n| n.trim_matches('"').to_string())?;
            let value = value.strip_suffix("\r\n").unwrap_or(value);
            Some((name, value.to_string()))
        })
        .collect()
}

/// Matches a multipart request carrying exactly the given fields, in order.
pub struct MultipartFields(pub Vec<(String, String)>);

impl MultipartFields {
    pub fn poster(salon_name: &str, offer: &str) -> Self {
        Self(vec![
            ("salonName".to_string(), salon_name.to_string()),
            ("offer".to_string(), offer.to_string()),
        ])
    }
}

impl Match for MultipartFields {
    fn matches(&self, request: &Request) -> bool {
        multipart_fields(request) == self.0
    }
}
