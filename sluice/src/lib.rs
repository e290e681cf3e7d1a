//! # sluice - Inbound Webhook Router
//!
//! `sluice` receives a chat platform's webhook deliveries on one HTTP endpoint,
//! classifies each payload, and routes it to the handler registered for it.
//!
//! ## Quick Start
//!
//! ```rust
//! use sluice::prelude::*;
//!
//! fn main() -> Result<(), SluiceError> {
//!     let registry = Registry::new();
//!
//!     // Feature modules register short names under their own namespace.
//!     let todo = registry.child("todo");
//!     let done_id = todo.register_block_action(
//!         "done",
//!         |_: &Request, cb: &InteractionCallback, _: &BlockAction| -> HandlerResult {
//!             println!("{} finished a task", cb.user.id);
//!             Ok(())
//!         },
//!     )?;
//!     assert_eq!(done_id, "todo.done");
//!
//!     let dispatcher = Dispatcher::builder(registry)
//!         .on_message(|_: &Request, event: &MessageEvent| -> HandlerResult {
//!             println!("message: {}", event.text);
//!             Ok(())
//!         })
//!         .build();
//!
//!     let request = sluice::testing::json_request(
//!         &sluice::testing::block_actions_payload(&["todo.done"]),
//!     );
//!     assert_eq!(dispatcher.handle(&request).status(), 200);
//!     Ok(())
//! }
//! ```
//!
//! ## Crates
//!
//! - `sluice-core`: payload models, handler traits, errors, [`ResponseWriter`]
//! - `sluice-std`: [`Registry`], [`Dispatcher`], response adapter, testing helpers
//! - `sluice` (this crate): re-exports and the tower adapter
//!
//! ## Features
//!
//! All features are off by default.
//!
//! - `tracing`: structured logs for classification, routing and failures
//! - `tower`: `service::WebhookService` for tower/axum servers

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use sluice_core::{
    // Payload models
    AppHomeOpenedEvent,
    // Handler capabilities
    AppHomeOpenedHandler,
    BlockAction,
    BlockActionHandler,
    // Error types
    BoxError,
    Channel,
    DispatchError,
    EnvelopeType,
    ErrorHandler,
    ErrorKind,
    EventCallback,
    HandlerResult,
    InnerEvent,
    InteractionCallback,
    MessageEvent,
    MessageHandler,
    OptionObject,
    RegistryError,
    Request,
    RequestVerifier,
    ResponseAction,
    // Response
    ResponseWriter,
    SluiceError,
    Team,
    TextObject,
    UrlVerification,
    User,
    View,
    ViewState,
    ViewSubmissionHandler,
    ViewSubmissionResponse,
};

pub use sluice_std::{Dispatcher, DispatcherBuilder, Registry, response, testing};

#[cfg(feature = "tower")]
pub mod service;

/// Commonly used items.
pub mod prelude {
    pub use crate::{
        AppHomeOpenedEvent, BlockAction, DispatchError, Dispatcher, ErrorKind, HandlerResult,
        InteractionCallback, MessageEvent, Registry, Request, ResponseWriter, SluiceError,
        ViewSubmissionResponse,
    };

    #[cfg(feature = "tower")]
    pub use crate::service::{ServiceConfig, WebhookService};
}
