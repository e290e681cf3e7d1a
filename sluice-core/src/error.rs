//! Error types for Sluice.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`SluiceError`] - Top-level error type for all Sluice operations
//! - [`DispatchError`] - Errors raised while handling one inbound request
//! - [`RegistryError`] - Wiring errors raised while registering handlers

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The result type returned by every handler callback.
pub type HandlerResult<T = ()> = Result<T, BoxError>;

/// Top-level error type for all Sluice operations.
#[derive(Error, Debug)]
pub enum SluiceError {
    /// An error occurred while dispatching a request.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// An error occurred while registering a handler.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors raised while registering handlers.
///
/// Both variants indicate a wiring bug: two features claimed the same
/// fully-qualified identifier. Composition roots are expected to treat them
/// as fatal and abort startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The action identifier is already bound to a block-action handler.
    #[error("action id already registered: {0}")]
    DuplicateActionId(String),

    /// The callback identifier is already bound to a view-submission handler.
    #[error("callback id already registered: {0}")]
    DuplicateCallbackId(String),
}

/// Errors that can occur while dispatching one inbound request.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The request declared a content type the router cannot read.
    #[error("unsupported content-type: {0:?}")]
    UnsupportedContentType(String),

    /// The request body could not be read by the transport.
    #[error("failed to read request body")]
    Body(#[source] BoxError),

    /// The url-encoded form body could not be decoded.
    #[error("failed to decode form body")]
    Form(#[source] BoxError),

    /// The configured request verifier rejected the request.
    #[error("request verification failed")]
    Verification(#[source] BoxError),

    /// The payload is not a valid event envelope.
    #[error("failed to parse event envelope")]
    Envelope(#[source] serde_json::Error),

    /// The payload is not a valid interaction callback.
    #[error("failed to parse interaction callback")]
    Callback(#[source] serde_json::Error),

    /// The envelope `type` is not one the router understands.
    #[error("unknown envelope type: {0:?}")]
    UnknownEnvelopeType(String),

    /// The inner event of an `event_callback` is not one the router understands.
    #[error("unknown inner event type: {0:?}")]
    UnknownInnerEvent(String),

    /// The envelope data does not have the shape its type promises.
    #[error("envelope data does not match its type: {0}")]
    TypeMismatch(String),

    /// No block-action handler is registered under this action identifier.
    #[error("unknown action id: {0}")]
    UnknownActionId(String),

    /// No view-submission handler is registered under this callback identifier.
    #[error("unknown callback id: {0}")]
    UnknownCallbackId(String),

    /// The app-home-opened handler failed.
    #[error("app_home_opened handler failed")]
    AppHomeOpened(#[source] BoxError),

    /// The message handler failed.
    #[error("message handler failed")]
    Message(#[source] BoxError),

    /// A block-action handler failed; later actions in the batch were skipped.
    #[error("block action {action_id} failed")]
    BlockAction {
        /// Identifier of the failing action.
        action_id: String,
        /// The handler's error.
        #[source]
        source: BoxError,
    },

    /// A view-submission handler failed.
    #[error("view submission {callback_id} failed")]
    ViewSubmission {
        /// Identifier of the submitted view.
        callback_id: String,
        /// The handler's error.
        #[source]
        source: BoxError,
    },

    /// A view-submission response could not be encoded.
    #[error("failed to encode view submission response")]
    Serialize(#[source] serde_json::Error),

    /// Dispatch panicked; the panic was caught at the request boundary.
    #[error("panic during dispatch: {0}")]
    Panic(String),
}

/// Coarse classification of a [`DispatchError`].
///
/// Custom error handlers can match on this to pick a status code without
/// enumerating every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request could not be read or decoded.
    Transport,
    /// The payload decoded but its type is unknown or inconsistent.
    Classification,
    /// No handler is registered for the payload's identifier.
    Routing,
    /// A registered handler returned an error.
    Handler,
    /// The handler's response could not be written.
    Response,
    /// An internal fault (panic) was recovered.
    Internal,
}

impl DispatchError {
    /// Returns the coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedContentType(_)
            | Self::Body(_)
            | Self::Form(_)
            | Self::Verification(_)
            | Self::Envelope(_)
            | Self::Callback(_) => ErrorKind::Transport,
            Self::UnknownEnvelopeType(_) | Self::UnknownInnerEvent(_) | Self::TypeMismatch(_) => {
                ErrorKind::Classification
            }
            Self::UnknownActionId(_) | Self::UnknownCallbackId(_) => ErrorKind::Routing,
            Self::AppHomeOpened(_)
            | Self::Message(_)
            | Self::BlockAction { .. }
            | Self::ViewSubmission { .. } => ErrorKind::Handler,
            Self::Serialize(_) => ErrorKind::Response,
            Self::Panic(_) => ErrorKind::Internal,
        }
    }
}

impl From<BoxError> for SluiceError {
    fn from(err: BoxError) -> Self {
        SluiceError::Custom(err)
    }
}
