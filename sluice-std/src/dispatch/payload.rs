//! Payload extraction by content type.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use sluice_core::{DispatchError, Request};

/// Interactivity payloads arrive as a url-encoded form.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
/// Events API payloads arrive as raw JSON.
pub const APPLICATION_JSON: &str = "application/json";
/// Content type of the url-verification echo.
pub const TEXT_PLAIN: &str = "text/plain";

/// Name of the form field carrying the JSON payload.
pub const PAYLOAD_FIELD: &str = "payload";

/// The media type of the request with parameters stripped, lowercased.
///
/// Returns an empty string when the header is absent.
pub fn media_type(request: &Request) -> String {
    let Some(value) = request.headers().get(CONTENT_TYPE) else {
        return String::new();
    };
    let raw = String::from_utf8_lossy(value.as_bytes());
    raw.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Pull the JSON payload out of the request body.
///
/// Form bodies yield the first `payload` field (empty if missing), JSON bodies
/// are returned as they are. Nothing is parsed as JSON here.
pub fn extract(request: &Request) -> Result<Bytes, DispatchError> {
    let media_type = media_type(request);
    match media_type.as_str() {
        FORM_URLENCODED => {
            let fields: Vec<(String, String)> = serde_urlencoded::from_bytes(request.body())
                .map_err(|e| DispatchError::Form(Box::new(e)))?;
            let payload = fields
                .into_iter()
                .find_map(|(name, value)| (name == PAYLOAD_FIELD).then_some(value))
                .unwrap_or_default();
            Ok(Bytes::from(payload))
        }
        APPLICATION_JSON => Ok(request.body().clone()),
        _ => Err(DispatchError::UnsupportedContentType(media_type)),
    }
}
