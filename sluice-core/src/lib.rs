//! # sluice-core
//!
//! Core types for the Sluice webhook router.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! feature crates that only register handlers and never touch the dispatcher.
//!
//! # Contents
//!
//! ## Payload Models
//!
//! - [`EnvelopeType`], [`UrlVerification`], [`EventCallback`], [`InnerEvent`]:
//!   the Events API side of the endpoint.
//! - [`InteractionCallback`], [`BlockAction`], [`View`],
//!   [`ViewSubmissionResponse`]: the interactivity side.
//!
//! Only the fields the router and typical handlers need are modelled. Anything
//! else survives as raw JSON (`extra` maps, opaque `view` definitions).
//!
//! ## Handler Capabilities
//!
//! One single-method trait per callback category, each implemented for
//! matching closures. See the [`handler`] module.
//!
//! ## Response
//!
//! [`ResponseWriter`] is the in-flight response handed to error handlers.
//!
//! # Error Types
//!
//! - [`SluiceError`] - Top-level error type
//! - [`DispatchError`] - Per-request failures, classified by [`ErrorKind`]
//! - [`RegistryError`] - Wiring failures at registration time

#![deny(clippy::wildcard_imports)]

mod de;
mod error;
pub mod event;
pub mod handler;
pub mod interaction;
mod response;

// Re-exports
pub use error::{BoxError, DispatchError, ErrorKind, HandlerResult, RegistryError, SluiceError};
pub use event::{
    AppHomeOpenedEvent, EnvelopeType, EventCallback, InnerEvent, MessageEvent, UrlVerification,
};
pub use handler::{
    AppHomeOpenedHandler, BlockActionHandler, ErrorHandler, MessageHandler, Request,
    RequestVerifier, ViewSubmissionHandler,
};
pub use interaction::{
    BlockAction, Channel, InteractionCallback, OptionObject, ResponseAction, Team, TextObject,
    User, View, ViewState, ViewSubmissionResponse,
};
pub use response::ResponseWriter;
