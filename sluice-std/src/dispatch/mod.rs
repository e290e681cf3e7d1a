//! # Dispatcher
//!
//! Classifies one inbound request and routes it to exactly one handler path.
//!
//! # Flow
//!
//! 1. Extract the payload by content type ([`payload::extract`]).
//! 2. Run the optional [`RequestVerifier`].
//! 3. Parse the envelope and branch on its `type`:
//!    - `url_verification`: echo the challenge.
//!    - `event_callback`: deliver the inner event to the app-home or message
//!      handler registered on the dispatcher (absent handler = no-op).
//!    - `block_actions`: invoke the registered handler of every action, in
//!      delivery order, stopping at the first failure.
//!    - `view_submission`: invoke the handler registered for the view's
//!      callback id and send back its response, if any.
//!
//! Every failure, including a panic anywhere in the steps above, ends in the
//! error path: the configured [`ErrorHandler`], or `500` with the error's
//! debug representation.
//!
//! # Example
//!
//! ```rust
//! use sluice_std::{Dispatcher, Registry, testing};
//!
//! let dispatcher = Dispatcher::builder(Registry::new()).build();
//! let request = testing::json_request(&testing::url_verification_payload("abc123"));
//!
//! let response = dispatcher.handle(&request);
//! assert_eq!(response.body().as_ref(), b"abc123");
//! ```

pub mod payload;

use crate::{registry::Registry, response};
use bytes::Bytes;
use http::Method;
use serde_json::Value;
use sluice_core::{
    AppHomeOpenedHandler, DispatchError, EnvelopeType, ErrorHandler, EventCallback, InnerEvent,
    InteractionCallback, MessageHandler, Request, RequestVerifier, ResponseWriter,
    UrlVerification, event::type_of,
};
use std::{
    any::Any,
    fmt,
    panic::{self, AssertUnwindSafe},
};

/// Routes inbound requests to registered handlers.
///
/// Build one with [`Dispatcher::builder`] after all handlers are registered,
/// then share it (typically behind an `Arc`) with the transport.
pub struct Dispatcher {
    registry: Registry,
    app_home_opened: Option<Box<dyn AppHomeOpenedHandler>>,
    message: Option<Box<dyn MessageHandler>>,
    error: Option<Box<dyn ErrorHandler>>,
    verifier: Option<Box<dyn RequestVerifier>>,
}

impl Dispatcher {
    /// Start building a dispatcher over `registry`.
    pub fn builder(registry: Registry) -> DispatcherBuilder {
        DispatcherBuilder::new(registry)
    }

    /// A dispatcher with no singleton callbacks and the default error path.
    pub fn new(registry: Registry) -> Self {
        DispatcherBuilder::new(registry).build()
    }

    /// The registry block actions and view submissions are resolved against.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Handle one request end to end and produce the HTTP response.
    ///
    /// Non-POST requests get an untouched (empty `200`) response. For POST,
    /// panics raised while dispatching are caught and reported through the
    /// error path; the error handler itself runs outside that guard.
    pub fn handle(&self, request: &Request) -> http::Response<Bytes> {
        let mut writer = ResponseWriter::new();
        if request.method() != Method::POST {
            return writer.into_response();
        }

        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(&mut writer, request)));
        let result = match outcome {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                #[cfg(feature = "tracing")]
                tracing::error!(panic = %message, "recovered panic during dispatch");
                Err(DispatchError::Panic(message))
            }
        };

        if let Err(error) = result {
            self.fail(&mut writer, request, error);
        }
        writer.into_response()
    }

    /// Run the error path for a request that failed before dispatch.
    ///
    /// Transports use this when, for example, the body cannot be read.
    pub fn respond_with_error(&self, request: &Request, error: DispatchError) -> http::Response<Bytes> {
        let mut writer = ResponseWriter::new();
        self.fail(&mut writer, request, error);
        writer.into_response()
    }

    /// Classify the request and invoke the matching handler.
    ///
    /// Successful outcomes that produce a body (challenge echo, view
    /// response) are written to `writer`. Errors are returned, not written.
    pub fn dispatch(
        &self,
        writer: &mut ResponseWriter,
        request: &Request,
    ) -> Result<(), DispatchError> {
        let payload = payload::extract(request)?;

        if let Some(verifier) = &self.verifier {
            verifier
                .verify(request, &payload)
                .map_err(DispatchError::Verification)?;
        }

        let value: Value = serde_json::from_slice(&payload).map_err(DispatchError::Envelope)?;
        let wire_type = type_of(&value);
        let Some(envelope) = EnvelopeType::from_wire(wire_type) else {
            #[cfg(feature = "tracing")]
            tracing::warn!(envelope = %wire_type, "unknown envelope type");
            return Err(DispatchError::UnknownEnvelopeType(wire_type.to_string()));
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(%envelope, "dispatching payload");

        match envelope {
            EnvelopeType::UrlVerification => {
                let verification: UrlVerification = serde_json::from_value(value)
                    .map_err(|e| DispatchError::TypeMismatch(e.to_string()))?;
                response::write_challenge(writer, &verification.challenge);
                Ok(())
            }
            EnvelopeType::EventCallback => {
                let callback: EventCallback =
                    serde_json::from_value(value).map_err(DispatchError::Envelope)?;
                self.handle_event(request, &callback)
            }
            EnvelopeType::BlockActions => {
                let callback: InteractionCallback =
                    serde_json::from_value(value).map_err(DispatchError::Callback)?;
                self.handle_block_actions(request, &callback)
            }
            EnvelopeType::ViewSubmission => {
                let callback: InteractionCallback =
                    serde_json::from_value(value).map_err(DispatchError::Callback)?;
                self.handle_view_submission(writer, request, &callback)
            }
        }
    }

    fn handle_event(&self, request: &Request, callback: &EventCallback) -> Result<(), DispatchError> {
        let event = callback.inner_event()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            event = event.type_name(),
            event_id = %callback.event_id,
            "delivering inner event"
        );

        match event {
            InnerEvent::AppHomeOpened(event) => match &self.app_home_opened {
                Some(handler) => handler
                    .handle(request, &event)
                    .map_err(DispatchError::AppHomeOpened),
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("no app_home_opened handler, ignoring event");
                    Ok(())
                }
            },
            InnerEvent::Message(event) => match &self.message {
                Some(handler) => handler
                    .handle(request, &event)
                    .map_err(DispatchError::Message),
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("no message handler, ignoring event");
                    Ok(())
                }
            },
        }
    }

    fn handle_block_actions(
        &self,
        request: &Request,
        callback: &InteractionCallback,
    ) -> Result<(), DispatchError> {
        for action in &callback.actions {
            let Some(handler) = self.registry.block_action(&action.action_id) else {
                #[cfg(feature = "tracing")]
                tracing::warn!(action_id = %action.action_id, "unknown action id");
                return Err(DispatchError::UnknownActionId(action.action_id.clone()));
            };

            #[cfg(feature = "tracing")]
            tracing::debug!(action_id = %action.action_id, "invoking block action handler");

            handler
                .handle(request, callback, action)
                .map_err(|source| DispatchError::BlockAction {
                    action_id: action.action_id.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    fn handle_view_submission(
        &self,
        writer: &mut ResponseWriter,
        request: &Request,
        callback: &InteractionCallback,
    ) -> Result<(), DispatchError> {
        let callback_id = &callback.view.callback_id;
        let Some(handler) = self.registry.view_submission(callback_id) else {
            #[cfg(feature = "tracing")]
            tracing::warn!(%callback_id, "unknown callback id");
            return Err(DispatchError::UnknownCallbackId(callback_id.clone()));
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(%callback_id, "invoking view submission handler");

        let reply = handler
            .handle(request, callback)
            .map_err(|source| DispatchError::ViewSubmission {
                callback_id: callback_id.clone(),
                source,
            })?;

        match reply {
            Some(reply) => response::write_view_response(writer, &reply),
            None => Ok(()),
        }
    }

    fn fail(&self, writer: &mut ResponseWriter, request: &Request, error: DispatchError) {
        #[cfg(feature = "tracing")]
        tracing::warn!(error = %error, kind = ?error.kind(), "dispatch failed");

        match &self.error {
            Some(handler) => handler.handle(writer, request, error),
            None => response::write_error(writer, &error),
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("app_home_opened", &self.app_home_opened.is_some())
            .field("message", &self.message.is_some())
            .field("error", &self.error.is_some())
            .field("verifier", &self.verifier.is_some())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Builder for constructing a [`Dispatcher`].
///
/// # Example
/// ```ignore
/// let dispatcher = Dispatcher::builder(registry)
///     .on_app_home_opened(publish_home)
///     .on_error(report_error)
///     .build();
/// ```
pub struct DispatcherBuilder {
    registry: Registry,
    app_home_opened: Option<Box<dyn AppHomeOpenedHandler>>,
    message: Option<Box<dyn MessageHandler>>,
    error: Option<Box<dyn ErrorHandler>>,
    verifier: Option<Box<dyn RequestVerifier>>,
}

impl DispatcherBuilder {
    /// Create a builder with no callbacks.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            app_home_opened: None,
            message: None,
            error: None,
            verifier: None,
        }
    }

    /// Set the handler for `app_home_opened` events.
    pub fn on_app_home_opened<H: AppHomeOpenedHandler>(mut self, handler: H) -> Self {
        self.app_home_opened = Some(Box::new(handler));
        self
    }

    /// Set the handler for `message` events.
    pub fn on_message<H: MessageHandler>(mut self, handler: H) -> Self {
        self.message = Some(Box::new(handler));
        self
    }

    /// Replace the default `500` error response.
    pub fn on_error<H: ErrorHandler>(mut self, handler: H) -> Self {
        self.error = Some(Box::new(handler));
        self
    }

    /// Check every request before its payload is parsed.
    pub fn verifier<V: RequestVerifier>(mut self, verifier: V) -> Self {
        self.verifier = Some(Box::new(verifier));
        self
    }

    /// Build the dispatcher.
    pub fn build(self) -> Dispatcher {
        Dispatcher {
            registry: self.registry,
            app_home_opened: self.app_home_opened,
            message: self.message,
            error: self.error,
            verifier: self.verifier,
        }
    }
}
