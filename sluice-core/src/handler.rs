//! # Handler Capabilities
//!
//! Each category of callback the router can invoke is a single-method trait.
//! Closures with the matching signature implement the traits through blanket
//! impls, so most applications never name a handler type:
//!
//! ```rust
//! use sluice_core::{BlockAction, BlockActionHandler, HandlerResult, InteractionCallback, Request};
//!
//! fn accepts<H: BlockActionHandler>(_handler: H) {}
//!
//! accepts(|_req: &Request, cb: &InteractionCallback, action: &BlockAction| -> HandlerResult {
//!     println!("{} clicked {}", cb.user.id, action.action_id);
//!     Ok(())
//! });
//! ```
//!
//! # Categories
//!
//! | Trait | Registered on | Cardinality |
//! |-------|---------------|-------------|
//! | [`AppHomeOpenedHandler`] | dispatcher | at most one |
//! | [`MessageHandler`] | dispatcher | at most one |
//! | [`BlockActionHandler`] | registry | one per action id |
//! | [`ViewSubmissionHandler`] | registry | one per callback id |
//! | [`ErrorHandler`] | dispatcher | at most one |
//! | [`RequestVerifier`] | dispatcher | at most one |
//!
//! Handlers run synchronously on the request path and are shared across
//! requests, hence the `Send + Sync + 'static` bounds.

use crate::{
    error::{DispatchError, HandlerResult},
    event::{AppHomeOpenedEvent, MessageEvent},
    interaction::{BlockAction, InteractionCallback, ViewSubmissionResponse},
    response::ResponseWriter,
};
use bytes::Bytes;

/// The inbound request as delivered by the transport, body fully buffered.
pub type Request = http::Request<Bytes>;

/// Handles `app_home_opened` events.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle `app_home_opened` events",
    label = "missing `AppHomeOpenedHandler` implementation",
    note = "Closures of type `Fn(&Request, &AppHomeOpenedEvent) -> HandlerResult` implement this trait."
)]
pub trait AppHomeOpenedHandler: Send + Sync + 'static {
    /// Called once per delivered event.
    fn handle(&self, request: &Request, event: &AppHomeOpenedEvent) -> HandlerResult;
}

impl<F> AppHomeOpenedHandler for F
where
    F: Fn(&Request, &AppHomeOpenedEvent) -> HandlerResult + Send + Sync + 'static,
{
    fn handle(&self, request: &Request, event: &AppHomeOpenedEvent) -> HandlerResult {
        (self)(request, event)
    }
}

/// Handles `message` events.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle `message` events",
    label = "missing `MessageHandler` implementation",
    note = "Closures of type `Fn(&Request, &MessageEvent) -> HandlerResult` implement this trait."
)]
pub trait MessageHandler: Send + Sync + 'static {
    /// Called once per delivered event.
    fn handle(&self, request: &Request, event: &MessageEvent) -> HandlerResult;
}

impl<F> MessageHandler for F
where
    F: Fn(&Request, &MessageEvent) -> HandlerResult + Send + Sync + 'static,
{
    fn handle(&self, request: &Request, event: &MessageEvent) -> HandlerResult {
        (self)(request, event)
    }
}

/// Handles a click on one interactive element.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle block actions",
    label = "missing `BlockActionHandler` implementation",
    note = "Closures of type `Fn(&Request, &InteractionCallback, &BlockAction) -> HandlerResult` implement this trait."
)]
pub trait BlockActionHandler: Send + Sync + 'static {
    /// Called for each action in the callback whose id this handler owns.
    ///
    /// Returning an error stops the remaining actions of the same callback.
    fn handle(
        &self,
        request: &Request,
        callback: &InteractionCallback,
        action: &BlockAction,
    ) -> HandlerResult;
}

impl<F> BlockActionHandler for F
where
    F: Fn(&Request, &InteractionCallback, &BlockAction) -> HandlerResult + Send + Sync + 'static,
{
    fn handle(
        &self,
        request: &Request,
        callback: &InteractionCallback,
        action: &BlockAction,
    ) -> HandlerResult {
        (self)(request, callback, action)
    }
}

/// Handles a modal submission.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle view submissions",
    label = "missing `ViewSubmissionHandler` implementation",
    note = "Closures of type `Fn(&Request, &InteractionCallback) -> HandlerResult<Option<ViewSubmissionResponse>>` implement this trait."
)]
pub trait ViewSubmissionHandler: Send + Sync + 'static {
    /// Returning `Some` sends the response back as the HTTP body; `None`
    /// acknowledges the submission with an empty body.
    fn handle(
        &self,
        request: &Request,
        callback: &InteractionCallback,
    ) -> HandlerResult<Option<ViewSubmissionResponse>>;
}

impl<F> ViewSubmissionHandler for F
where
    F: Fn(&Request, &InteractionCallback) -> HandlerResult<Option<ViewSubmissionResponse>>
        + Send
        + Sync
        + 'static,
{
    fn handle(
        &self,
        request: &Request,
        callback: &InteractionCallback,
    ) -> HandlerResult<Option<ViewSubmissionResponse>> {
        (self)(request, callback)
    }
}

/// Takes over the response when dispatch fails.
///
/// The handler owns the outcome completely: it may write any status and body,
/// leave the response untouched, or panic.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle dispatch errors",
    label = "missing `ErrorHandler` implementation",
    note = "Closures of type `Fn(&mut ResponseWriter, &Request, DispatchError)` implement this trait."
)]
pub trait ErrorHandler: Send + Sync + 'static {
    /// Called at most once per request.
    fn handle(&self, response: &mut ResponseWriter, request: &Request, error: DispatchError);
}

impl<F> ErrorHandler for F
where
    F: Fn(&mut ResponseWriter, &Request, DispatchError) + Send + Sync + 'static,
{
    fn handle(&self, response: &mut ResponseWriter, request: &Request, error: DispatchError) {
        (self)(response, request, error)
    }
}

/// Checks that a request really comes from the platform.
///
/// Runs after the payload has been extracted and before it is parsed. No
/// signature scheme ships with Sluice; without a verifier nothing is checked.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot verify requests",
    label = "missing `RequestVerifier` implementation",
    note = "Closures of type `Fn(&Request, &[u8]) -> HandlerResult` implement this trait."
)]
pub trait RequestVerifier: Send + Sync + 'static {
    /// Return an error to reject the request.
    fn verify(&self, request: &Request, payload: &[u8]) -> HandlerResult;
}

impl<F> RequestVerifier for F
where
    F: Fn(&Request, &[u8]) -> HandlerResult + Send + Sync + 'static,
{
    fn verify(&self, request: &Request, payload: &[u8]) -> HandlerResult {
        (self)(request, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    struct CountingAction {
        calls: Arc<AtomicUsize>,
    }

    impl BlockActionHandler for CountingAction {
        fn handle(
            &self,
            _request: &Request,
            _callback: &InteractionCallback,
            _action: &BlockAction,
        ) -> HandlerResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn request() -> Request {
        http::Request::new(Bytes::new())
    }

    #[test]
    fn test_struct_handler_as_trait_object() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler: Arc<dyn BlockActionHandler> = Arc::new(CountingAction {
            calls: calls.clone(),
        });

        handler
            .handle(&request(), &InteractionCallback::default(), &BlockAction::new("a"))
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_closure_handlers() {
        let view: Box<dyn ViewSubmissionHandler> =
            Box::new(|_req: &Request, cb: &InteractionCallback| -> HandlerResult<_> {
                if cb.view.callback_id.is_empty() {
                    Err("no callback id".into())
                } else {
                    Ok(Some(ViewSubmissionResponse::clear()))
                }
            });

        let mut cb = InteractionCallback::default();
        assert!(view.handle(&request(), &cb).is_err());
        cb.view.callback_id = "modal".into();
        assert_eq!(
            view.handle(&request(), &cb).unwrap(),
            Some(ViewSubmissionResponse::clear())
        );

        let verifier: Box<dyn RequestVerifier> =
            Box::new(|_req: &Request, payload: &[u8]| -> HandlerResult {
                if payload.is_empty() {
                    Err("empty payload".into())
                } else {
                    Ok(())
                }
            });
        assert!(verifier.verify(&request(), b"").is_err());
        assert!(verifier.verify(&request(), b"{}").is_ok());
    }

    #[test]
    fn test_error_handler_closure_writes_response() {
        let handler: Box<dyn ErrorHandler> = Box::new(
            |w: &mut ResponseWriter, _req: &Request, err: DispatchError| {
                w.write_status(http::StatusCode::BAD_REQUEST);
                w.write(err.to_string().as_bytes());
            },
        );

        let mut writer = ResponseWriter::new();
        handler.handle(
            &mut writer,
            &request(),
            DispatchError::UnknownActionId("nope".into()),
        );
        let response = writer.into_response();
        assert_eq!(response.status(), http::StatusCode::BAD_REQUEST);
        assert_eq!(response.body().as_ref(), b"unknown action id: nope");
    }
}
