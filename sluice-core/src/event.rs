//! Events API payloads.
//!
//! Every inbound payload carries a top-level `type` that decides how the rest
//! of it is read. Only the fields the router needs are modelled; the inner
//! event of an `event_callback` is kept as raw JSON until it is classified.

use crate::error::DispatchError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outer classification of an inbound payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvelopeType {
    /// Endpoint ownership challenge sent when the request URL is configured.
    UrlVerification,
    /// An Events API delivery wrapping an inner event.
    EventCallback,
    /// A click on an interactive block element.
    BlockActions,
    /// A modal submission.
    ViewSubmission,
}

impl EnvelopeType {
    /// Parse the wire name of an envelope type.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "url_verification" => Some(Self::UrlVerification),
            "event_callback" => Some(Self::EventCallback),
            "block_actions" => Some(Self::BlockActions),
            "view_submission" => Some(Self::ViewSubmission),
            _ => None,
        }
    }

    /// The wire name of this envelope type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UrlVerification => "url_verification",
            Self::EventCallback => "event_callback",
            Self::BlockActions => "block_actions",
            Self::ViewSubmission => "view_submission",
        }
    }
}

impl std::fmt::Display for EnvelopeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads the `type` field of a JSON object, or `""` when it is absent.
pub fn type_of(value: &Value) -> &str {
    value.get("type").and_then(Value::as_str).unwrap_or_default()
}

/// The `url_verification` handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlVerification {
    /// Deprecated verification token.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub token: String,
    /// Value that must be echoed back verbatim.
    pub challenge: String,
}

/// An `event_callback` delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCallback {
    /// Deprecated verification token.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub token: String,
    /// Workspace the event originated from.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub team_id: String,
    /// Application the event is addressed to.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub api_app_id: String,
    /// Unique identifier of this delivery.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub event_id: String,
    /// Epoch seconds at which the event was dispatched.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub event_time: i64,
    /// The wrapped event, still unclassified.
    pub event: Value,
}

impl EventCallback {
    /// The wire type of the wrapped event.
    pub fn inner_type(&self) -> &str {
        type_of(&self.event)
    }

    /// Classify and decode the wrapped event.
    pub fn inner_event(&self) -> Result<InnerEvent, DispatchError> {
        let decoded = match self.inner_type() {
            "app_home_opened" => serde_json::from_value(self.event.clone())
                .map(InnerEvent::AppHomeOpened),
            "message" => serde_json::from_value(self.event.clone()).map(InnerEvent::Message),
            other => return Err(DispatchError::UnknownInnerEvent(other.to_string())),
        };
        decoded.map_err(DispatchError::Envelope)
    }
}

/// The inner events the router knows how to deliver.
#[derive(Debug, Clone, PartialEq)]
pub enum InnerEvent {
    /// A user opened the app's Home tab.
    AppHomeOpened(AppHomeOpenedEvent),
    /// A message was posted somewhere the app can see.
    Message(MessageEvent),
}

impl InnerEvent {
    /// The wire type of this event.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::AppHomeOpened(_) => "app_home_opened",
            Self::Message(_) => "message",
        }
    }
}

/// Payload of an `app_home_opened` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppHomeOpenedEvent {
    /// User who opened the tab.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub user: String,
    /// Direct-message channel between the user and the app.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub channel: String,
    /// Which tab was opened (`home` or `messages`).
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub tab: String,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub event_ts: String,
    /// The currently published Home view, if any.
    #[serde(default)]
    pub view: Option<Value>,
}

/// Payload of a `message` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageEvent {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub channel: String,
    #[serde(default)]
    pub channel_type: Option<String>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub ts: String,
    #[serde(default)]
    pub thread_ts: Option<String>,
    /// Set for edits, joins, bot messages and other non-plain messages.
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub event_ts: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn callback(event: Value) -> EventCallback {
        serde_json::from_value(json!({
            "type": "event_callback",
            "team_id": "T1",
            "api_app_id": "A1",
            "event_id": "Ev1",
            "event_time": 1700000000,
            "event": event,
        }))
        .unwrap()
    }

    #[test]
    fn test_envelope_type_wire_names() {
        for ty in [
            EnvelopeType::UrlVerification,
            EnvelopeType::EventCallback,
            EnvelopeType::BlockActions,
            EnvelopeType::ViewSubmission,
        ] {
            assert_eq!(EnvelopeType::from_wire(ty.as_str()), Some(ty));
        }
        assert_eq!(EnvelopeType::from_wire("app_rate_limited"), None);
        assert_eq!(EnvelopeType::from_wire(""), None);
    }

    #[test]
    fn test_type_of_missing() {
        assert_eq!(type_of(&json!({"challenge": "x"})), "");
        assert_eq!(type_of(&json!({"type": 3})), "");
        assert_eq!(type_of(&json!({"type": "message"})), "message");
    }

    #[test]
    fn test_url_verification_requires_challenge() {
        let ok: UrlVerification =
            serde_json::from_value(json!({"type": "url_verification", "challenge": "abc"}))
                .unwrap();
        assert_eq!(ok.challenge, "abc");

        let missing = serde_json::from_value::<UrlVerification>(json!({"type": "url_verification"}));
        assert!(missing.is_err());
    }

    #[test]
    fn test_inner_event_app_home() {
        let cb = callback(json!({
            "type": "app_home_opened",
            "user": "U1",
            "channel": "D1",
            "tab": "home",
        }));
        match cb.inner_event().unwrap() {
            InnerEvent::AppHomeOpened(ev) => {
                assert_eq!(ev.user, "U1");
                assert_eq!(ev.tab, "home");
                assert!(ev.view.is_none());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_inner_event_message() {
        let cb = callback(json!({
            "type": "message",
            "user": "U1",
            "text": "hello",
            "channel": "C1",
            "ts": "1.0",
        }));
        let event = cb.inner_event().unwrap();
        assert_eq!(event.type_name(), "message");
        match event {
            InnerEvent::Message(ev) => {
                assert_eq!(ev.text, "hello");
                assert_eq!(ev.user.as_deref(), Some("U1"));
                assert!(ev.subtype.is_none());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_inner_event_null_fields() {
        let cb = callback(json!({
            "type": "message",
            "user": null,
            "text": null,
            "channel": "C1",
            "ts": null,
        }));
        match cb.inner_event().unwrap() {
            InnerEvent::Message(ev) => {
                assert!(ev.user.is_none());
                assert_eq!(ev.text, "");
                assert_eq!(ev.channel, "C1");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_inner_event_unknown() {
        let cb = callback(json!({"type": "reaction_added"}));
        assert!(matches!(
            cb.inner_event(),
            Err(DispatchError::UnknownInnerEvent(ty)) if ty == "reaction_added"
        ));
    }
}
