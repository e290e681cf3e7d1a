//! Response adapter.
//!
//! Translates dispatch outcomes into writes on a [`ResponseWriter`].

use crate::dispatch::payload::{APPLICATION_JSON, TEXT_PLAIN};
use http::StatusCode;
use sluice_core::{DispatchError, ResponseWriter, ViewSubmissionResponse};

/// Echo a url-verification challenge verbatim as `text/plain`.
pub fn write_challenge(writer: &mut ResponseWriter, challenge: &str) {
    writer.set_content_type(TEXT_PLAIN);
    writer.write(challenge.as_bytes());
}

/// Send a view-submission response as a JSON body with an explicit `200 OK`.
///
/// The response is encoded before anything is written, so an encoding failure
/// leaves the writer untouched for the error path.
pub fn write_view_response(
    writer: &mut ResponseWriter,
    response: &ViewSubmissionResponse,
) -> Result<(), DispatchError> {
    let body = serde_json::to_vec(response).map_err(DispatchError::Serialize)?;
    writer.set_content_type(APPLICATION_JSON);
    commit(writer, StatusCode::OK);
    writer.write(&body);
    Ok(())
}

/// Default error response: `500` with the error's debug representation.
pub fn write_error(writer: &mut ResponseWriter, error: &DispatchError) {
    commit(writer, StatusCode::INTERNAL_SERVER_ERROR);
    writer.write(format!("{error:?}").as_bytes());
}

fn commit(writer: &mut ResponseWriter, status: StatusCode) {
    if !writer.write_status(status) {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            committed = ?writer.status(),
            ignored = %status,
            "superfluous status write"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::CONTENT_TYPE;

    #[test]
    fn test_challenge_echo() {
        let mut writer = ResponseWriter::new();
        write_challenge(&mut writer, "abc123");

        let response = writer.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain");
        assert_eq!(response.body().as_ref(), b"abc123");
    }

    #[test]
    fn test_view_response_is_json() {
        let mut writer = ResponseWriter::new();
        write_view_response(
            &mut writer,
            &ViewSubmissionResponse::errors([("block", "too short")]),
        )
        .unwrap();

        let response = writer.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"response_action": "errors", "errors": {"block": "too short"}})
        );
    }

    #[test]
    fn test_default_error_is_500_debug() {
        let error = DispatchError::UnknownActionId("nope".into());
        let expected = format!("{error:?}");

        let mut writer = ResponseWriter::new();
        write_error(&mut writer, &error);

        let response = writer.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body().as_ref(), expected.as_bytes());
        assert_eq!(expected, "UnknownActionId(\"nope\")");
    }

    #[test]
    fn test_error_after_commit_keeps_status() {
        let mut writer = ResponseWriter::new();
        write_challenge(&mut writer, "x");
        write_error(&mut writer, &DispatchError::Panic("late".into()));
        assert_eq!(writer.into_response().status(), StatusCode::OK);
    }
}
