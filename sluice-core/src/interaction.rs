//! Interactivity payloads: block actions, view submissions and the responses
//! a view-submission handler may return.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A user interaction delivered to the interactivity endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionCallback {
    /// `block_actions` or `view_submission`.
    #[serde(rename = "type", default, deserialize_with = "crate::de::null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub token: String,
    /// Short-lived id that lets the app open a modal in response.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub trigger_id: String,
    #[serde(default)]
    pub response_url: Option<String>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub api_app_id: String,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub team: Team,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub user: User,
    #[serde(default)]
    pub channel: Option<Channel>,
    /// The actions that fired, in the order the platform delivered them.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub actions: Vec<BlockAction>,
    /// The view the interaction happened in. Always present for submissions.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub view: View,
    /// Where the interacted element lives (message, view, ...).
    #[serde(default)]
    pub container: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub domain: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub team_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub name: String,
}

/// One fired interactive element.
///
/// Element-specific fields that are not modelled here are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockAction {
    /// Routing key; matches an identifier returned by the registry.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub action_id: String,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub block_id: String,
    /// Element type, e.g. `button` or `static_select`.
    #[serde(rename = "type", default, deserialize_with = "crate::de::null_as_default")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub action_ts: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_option: Option<OptionObject>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BlockAction {
    /// A minimal action carrying only its identifier.
    pub fn new(action_id: impl Into<String>) -> Self {
        Self {
            action_id: action_id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextObject {
    #[serde(rename = "type", default, deserialize_with = "crate::de::null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionObject {
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub text: TextObject,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub value: String,
}

/// The view an interaction happened in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct View {
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "crate::de::null_as_default")]
    pub kind: String,
    /// Routing key for submissions; matches an identifier returned by the registry.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub callback_id: String,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub private_metadata: String,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub hash: String,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub state: ViewState,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Input values of a view, keyed by block id then action id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub values: BTreeMap<String, BTreeMap<String, BlockAction>>,
}

impl ViewState {
    /// Look up the input element `action_id` inside block `block_id`.
    pub fn value(&self, block_id: &str, action_id: &str) -> Option<&BlockAction> {
        self.values.get(block_id)?.get(action_id)
    }
}

/// How the platform should update a modal after a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseAction {
    /// Keep the modal open and show per-block validation errors.
    Errors,
    /// Replace the current view.
    Update,
    /// Push a new view onto the modal stack.
    Push,
    /// Close every view in the modal stack.
    Clear,
}

/// Structured response a view-submission handler may return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSubmissionResponse {
    pub response_action: ResponseAction,
    /// Error message per block id. Only used with [`ResponseAction::Errors`].
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, String>,
    /// View definition for `update` and `push`, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<Value>,
}

impl ViewSubmissionResponse {
    /// Keep the modal open and attach errors to blocks.
    pub fn errors<K, V>(errors: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            response_action: ResponseAction::Errors,
            errors: errors
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            view: None,
        }
    }

    /// Replace the submitted view with `view`.
    pub fn update(view: Value) -> Self {
        Self {
            response_action: ResponseAction::Update,
            errors: BTreeMap::new(),
            view: Some(view),
        }
    }

    /// Push `view` on top of the submitted one.
    pub fn push(view: Value) -> Self {
        Self {
            response_action: ResponseAction::Push,
            errors: BTreeMap::new(),
            view: Some(view),
        }
    }

    /// Close the whole modal stack.
    pub fn clear() -> Self {
        Self {
            response_action: ResponseAction::Clear,
            errors: BTreeMap::new(),
            view: None,
        }
    }
}
