//! # sluice-std
//!
//! Standard implementations for the Sluice webhook router.
//!
//! This crate provides:
//! - **Registry**: [`Registry`], a namespaced handler table shared by all scopes
//! - **Dispatch**: [`Dispatcher`], envelope classification and routing
//! - **Response adapter**: default error, challenge and view responses
//! - **Testing**: recording handlers and payload builders

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use sluice_core;

// Modules
pub mod dispatch;
pub mod registry;
pub mod response;
pub mod testing;

pub use dispatch::{Dispatcher, DispatcherBuilder};
pub use registry::Registry;
