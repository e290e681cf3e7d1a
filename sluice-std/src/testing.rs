//! Testing utilities for Sluice.
//!
//! # Features
//!
//! - [`RecordingBlockAction`], [`RecordingViewSubmission`]: registry handlers
//!   that record the identifiers they were invoked with
//! - [`RecordingEvents`]: records `app_home_opened` and `message` events
//! - Request builders ([`json_request`], [`form_request`]) and payload
//!   builders for every envelope the dispatcher understands

use crate::dispatch::payload::{APPLICATION_JSON, FORM_URLENCODED, PAYLOAD_FIELD};
use bytes::Bytes;
use http::{HeaderValue, Method, header::CONTENT_TYPE};
use serde_json::{Value, json};
use sluice_core::{
    AppHomeOpenedEvent, AppHomeOpenedHandler, BlockAction, BlockActionHandler, HandlerResult,
    InteractionCallback, MessageEvent, MessageHandler, Request, ViewSubmissionHandler,
    ViewSubmissionResponse,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Recording Block Action
// ============================================================================

/// A block-action handler that records every action id it is invoked with.
///
/// Clones share the same record, so keep one clone for assertions and
/// register the other.
///
/// ```rust
/// use sluice_std::{Registry, testing::RecordingBlockAction};
///
/// let recorder = RecordingBlockAction::new();
/// Registry::new().register_block_action("btn", recorder.clone()).unwrap();
/// assert_eq!(recorder.count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct RecordingBlockAction {
    calls: Arc<Mutex<Vec<String>>>,
    failure: Option<String>,
}

impl RecordingBlockAction {
    /// Create a recorder that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recorder that records the call, then fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Action ids seen so far, in invocation order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Number of invocations.
    pub fn count(&self) -> usize {
        lock(&self.calls).len()
    }
}

impl BlockActionHandler for RecordingBlockAction {
    fn handle(
        &self,
        _request: &Request,
        _callback: &InteractionCallback,
        action: &BlockAction,
    ) -> HandlerResult {
        lock(&self.calls).push(action.action_id.clone());
        match &self.failure {
            Some(message) => Err(message.clone().into()),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Recording View Submission
// ============================================================================

/// A view-submission handler that records callback ids.
#[derive(Clone, Default)]
pub struct RecordingViewSubmission {
    calls: Arc<Mutex<Vec<String>>>,
    response: Option<ViewSubmissionResponse>,
    failure: Option<String>,
}

impl RecordingViewSubmission {
    /// Create a recorder that acknowledges with an empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recorder that answers every submission with `response`.
    pub fn responding(response: ViewSubmissionResponse) -> Self {
        Self {
            response: Some(response),
            ..Self::default()
        }
    }

    /// Create a recorder that records the call, then fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Callback ids seen so far, in invocation order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Number of invocations.
    pub fn count(&self) -> usize {
        lock(&self.calls).len()
    }
}

impl ViewSubmissionHandler for RecordingViewSubmission {
    fn handle(
        &self,
        _request: &Request,
        callback: &InteractionCallback,
    ) -> HandlerResult<Option<ViewSubmissionResponse>> {
        lock(&self.calls).push(callback.view.callback_id.clone());
        match &self.failure {
            Some(message) => Err(message.clone().into()),
            None => Ok(self.response.clone()),
        }
    }
}

// ============================================================================
// Recording Events
// ============================================================================

/// Records Events API deliveries.
///
/// Implements both [`AppHomeOpenedHandler`] and [`MessageHandler`], so one
/// recorder (and its clones) can observe both singleton slots.
#[derive(Clone, Default)]
pub struct RecordingEvents {
    app_home_opened: Arc<Mutex<Vec<AppHomeOpenedEvent>>>,
    messages: Arc<Mutex<Vec<MessageEvent>>>,
}

impl RecordingEvents {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded `app_home_opened` events.
    pub fn app_home_opened(&self) -> Vec<AppHomeOpenedEvent> {
        lock(&self.app_home_opened).clone()
    }

    /// Recorded `message` events.
    pub fn messages(&self) -> Vec<MessageEvent> {
        lock(&self.messages).clone()
    }
}

impl AppHomeOpenedHandler for RecordingEvents {
    fn handle(&self, _request: &Request, event: &AppHomeOpenedEvent) -> HandlerResult {
        lock(&self.app_home_opened).push(event.clone());
        Ok(())
    }
}

impl MessageHandler for RecordingEvents {
    fn handle(&self, _request: &Request, event: &MessageEvent) -> HandlerResult {
        lock(&self.messages).push(event.clone());
        Ok(())
    }
}

// ============================================================================
// Requests
// ============================================================================

/// A `POST` request with the given content type and body.
pub fn request_with_content_type(content_type: &'static str, body: impl Into<Bytes>) -> Request {
    let mut request = http::Request::new(body.into());
    *request.method_mut() = Method::POST;
    request
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    request
}

/// A `POST` request carrying `payload` as a raw JSON body.
pub fn json_request(payload: &Value) -> Request {
    request_with_content_type(APPLICATION_JSON, payload.to_string())
}

/// A `POST` request carrying `payload` in the `payload` form field.
pub fn form_request(payload: &Value) -> Request {
    let body = form_urlencoded(&payload.to_string());
    request_with_content_type(FORM_URLENCODED, body)
}

fn form_urlencoded(payload: &str) -> String {
    // Infallible for a single string pair.
    serde_urlencoded::to_string([(PAYLOAD_FIELD, payload)]).unwrap_or_default()
}

// ============================================================================
// Payloads
// ============================================================================

/// A `url_verification` envelope.
pub fn url_verification_payload(challenge: &str) -> Value {
    json!({
        "type": "url_verification",
        "token": "verification-token",
        "challenge": challenge,
    })
}

/// An `event_callback` envelope wrapping `event`.
pub fn event_callback_payload(event: Value) -> Value {
    json!({
        "type": "event_callback",
        "token": "verification-token",
        "team_id": "T0001",
        "api_app_id": "A0001",
        "event_id": "Ev0001",
        "event_time": 1_700_000_000,
        "event": event,
    })
}

/// A `block_actions` callback with one button action per id, in order.
pub fn block_actions_payload(action_ids: &[&str]) -> Value {
    let actions: Vec<Value> = action_ids
        .iter()
        .map(|id| {
            json!({
                "action_id": id,
                "block_id": "block",
                "type": "button",
                "value": "clicked",
                "action_ts": "1700000000.000100",
            })
        })
        .collect();

    json!({
        "type": "block_actions",
        "token": "verification-token",
        "trigger_id": "trigger",
        "team": {"id": "T0001", "domain": "example"},
        "user": {"id": "U0001", "username": "alice", "team_id": "T0001"},
        "actions": actions,
    })
}

/// A `view_submission` callback for a modal with the given callback id.
pub fn view_submission_payload(callback_id: &str) -> Value {
    json!({
        "type": "view_submission",
        "token": "verification-token",
        "trigger_id": "trigger",
        "team": {"id": "T0001", "domain": "example"},
        "user": {"id": "U0001", "username": "alice", "team_id": "T0001"},
        "view": {
            "id": "V0001",
            "type": "modal",
            "callback_id": callback_id,
            "private_metadata": "",
            "hash": "h",
            "state": {"values": {}},
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::payload;

    #[test]
    fn test_form_request_round_trips_through_extraction() {
        let value = block_actions_payload(&["a"]);
        let extracted = payload::extract(&form_request(&value)).unwrap();
        let parsed: Value = serde_json::from_slice(&extracted).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_payloads_decode_into_models() {
        let cb: InteractionCallback =
            serde_json::from_value(view_submission_payload("todo.create")).unwrap();
        assert_eq!(cb.view.callback_id, "todo.create");
        assert_eq!(cb.user.username, "alice");

        let cb: InteractionCallback =
            serde_json::from_value(block_actions_payload(&["x", "y"])).unwrap();
        let ids: Vec<&str> = cb.actions.iter().map(|a| a.action_id.as_str()).collect();
        assert_eq!(ids, ["x", "y"]);
    }

    #[test]
    fn test_failing_recorder_still_records() {
        let recorder = RecordingBlockAction::failing("boom");
        let result = recorder.handle(
            &json_request(&json!({})),
            &InteractionCallback::default(),
            &BlockAction::new("a"),
        );
        assert_eq!(result.unwrap_err().to_string(), "boom");
        assert_eq!(recorder.calls(), ["a"]);
    }
}
