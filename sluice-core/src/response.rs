//! In-flight HTTP response.

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, HeaderValue, StatusCode, header::CONTENT_TYPE};

/// An HTTP response under construction.
///
/// Mirrors the commit rules of a streaming response writer: the first status
/// written wins and later ones are ignored, and writing body bytes without a
/// status commits an implicit `200 OK`. Handlers that never touch the writer
/// produce an empty `200 OK`.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
}

impl ResponseWriter {
    /// Create an untouched writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Headers to be sent with the response.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable access to the response headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Set the `Content-Type` header.
    pub fn set_content_type(&mut self, value: &'static str) {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(value));
    }

    /// Commit the response status.
    ///
    /// Returns `false` (and changes nothing) if a status was already committed.
    pub fn write_status(&mut self, status: StatusCode) -> bool {
        if self.status.is_some() {
            return false;
        }
        self.status = Some(status);
        true
    }

    /// Append body bytes, committing `200 OK` if no status was written yet.
    pub fn write(&mut self, data: &[u8]) {
        self.status.get_or_insert(StatusCode::OK);
        self.body.extend_from_slice(data);
    }

    /// The committed status, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Whether a status has been committed.
    pub fn is_committed(&self) -> bool {
        self.status.is_some()
    }

    /// Body bytes written so far.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Finish the response.
    pub fn into_response(self) -> http::Response<Bytes> {
        let mut response = http::Response::new(self.body.freeze());
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_writer_is_empty_ok() {
        let writer = ResponseWriter::new();
        assert!(!writer.is_committed());

        let response = writer.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.body().is_empty());
        assert!(response.headers().is_empty());
    }

    #[test]
    fn test_first_status_wins() {
        let mut writer = ResponseWriter::new();
        assert!(writer.write_status(StatusCode::ACCEPTED));
        assert!(!writer.write_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(writer.into_response().status(), StatusCode::ACCEPTED);
    }

    #[test]
    fn test_write_commits_ok() {
        let mut writer = ResponseWriter::new();
        writer.set_content_type("text/plain");
        writer.write(b"abc");
        writer.write(b"123");
        assert_eq!(writer.status(), Some(StatusCode::OK));
        assert!(!writer.write_status(StatusCode::INTERNAL_SERVER_ERROR));

        let response = writer.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain");
        assert_eq!(response.body().as_ref(), b"abc123");
    }
}
