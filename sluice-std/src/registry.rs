//! Namespaced handler registry.
//!
//! A [`Registry`] is a namespace prefix plus a handle to one shared handler
//! table. [`Registry::child`] creates another prefix over the *same* table,
//! so a feature module can register short names under its own scope while
//! the dispatcher still resolves every identifier with a single flat lookup.
//!
//! ```rust
//! use sluice_core::{BlockAction, HandlerResult, InteractionCallback, Request};
//! use sluice_std::Registry;
//!
//! let root = Registry::new();
//! let todo = root.child("todo");
//!
//! let id = todo
//!     .register_block_action(
//!         "done",
//!         |_: &Request, _: &InteractionCallback, _: &BlockAction| -> HandlerResult { Ok(()) },
//!     )
//!     .unwrap();
//!
//! assert_eq!(id, "todo.done");
//! assert!(root.block_action("todo.done").is_some());
//! ```

use dashmap::{DashMap, mapref::entry::Entry};
use sluice_core::{BlockActionHandler, RegistryError, ViewSubmissionHandler};
use std::{fmt, sync::Arc};

/// Separator between namespace segments.
pub const SEPARATOR: char = '.';

#[derive(Default)]
struct HandlerTable {
    block_actions: DashMap<String, Arc<dyn BlockActionHandler>>,
    view_submissions: DashMap<String, Arc<dyn ViewSubmissionHandler>>,
}

/// A namespace scope over a shared handler table.
///
/// Cloning is cheap and yields a registry with the same namespace and table.
/// Registration is meant to happen during startup wiring; lookups are safe
/// from any number of threads.
#[derive(Clone, Default)]
pub struct Registry {
    namespace: String,
    table: Arc<HandlerTable>,
}

impl Registry {
    /// Create a root registry with an empty namespace and a fresh table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The namespace new registrations are resolved against.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Resolve a local name to its fully-qualified identifier.
    ///
    /// The root namespace is empty, so top-level names resolve to themselves.
    pub fn resolve(&self, name: &str) -> String {
        if self.namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}{SEPARATOR}{name}", self.namespace)
        }
    }

    /// Create a nested scope that shares this registry's handler table.
    pub fn child(&self, name: &str) -> Registry {
        Registry {
            namespace: self.resolve(name),
            table: Arc::clone(&self.table),
        }
    }

    /// Register a block-action handler under `name`.
    ///
    /// Returns the fully-qualified action identifier to put on the outgoing
    /// element. Fails if the identifier is already taken anywhere in the
    /// shared table.
    pub fn register_block_action<H>(&self, name: &str, handler: H) -> Result<String, RegistryError>
    where
        H: BlockActionHandler,
    {
        let id = self.resolve(name);
        match self.table.block_actions.entry(id.clone()) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateActionId(id)),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(handler));
                #[cfg(feature = "tracing")]
                tracing::info!(action_id = %id, "registered block action handler");
                Ok(id)
            }
        }
    }

    /// Register a view-submission handler under `name`.
    ///
    /// Returns the fully-qualified callback identifier to put on the outgoing
    /// view. Fails if the identifier is already taken anywhere in the shared
    /// table.
    pub fn register_view_submission<H>(
        &self,
        name: &str,
        handler: H,
    ) -> Result<String, RegistryError>
    where
        H: ViewSubmissionHandler,
    {
        let id = self.resolve(name);
        match self.table.view_submissions.entry(id.clone()) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateCallbackId(id)),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(handler));
                #[cfg(feature = "tracing")]
                tracing::info!(callback_id = %id, "registered view submission handler");
                Ok(id)
            }
        }
    }

    /// Look up a block-action handler by fully-qualified identifier.
    pub fn block_action(&self, action_id: &str) -> Option<Arc<dyn BlockActionHandler>> {
        self.table
            .block_actions
            .get(action_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Look up a view-submission handler by fully-qualified identifier.
    pub fn view_submission(&self, callback_id: &str) -> Option<Arc<dyn ViewSubmissionHandler>> {
        self.table
            .view_submissions
            .get(callback_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// All registered action identifiers, sorted.
    pub fn action_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .table
            .block_actions
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        ids.sort();
        ids
    }

    /// All registered callback identifiers, sorted.
    pub fn callback_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .table
            .view_submissions
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        ids.sort();
        ids
    }

    /// Total number of handlers in the shared table.
    pub fn len(&self) -> usize {
        self.table.block_actions.len() + self.table.view_submissions.len()
    }

    /// Check if the shared table has no handlers.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("namespace", &self.namespace)
            .field("block_actions", &self.table.block_actions.len())
            .field("view_submissions", &self.table.view_submissions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_core::{
        BlockAction, HandlerResult, InteractionCallback, Request, ViewSubmissionResponse,
    };

    fn noop_action(_: &Request, _: &InteractionCallback, _: &BlockAction) -> HandlerResult {
        Ok(())
    }

    fn noop_view(_: &Request, _: &InteractionCallback) -> HandlerResult<Option<ViewSubmissionResponse>> {
        Ok(None)
    }

    #[test]
    fn test_root_resolution_is_identity() {
        let root = Registry::new();
        assert_eq!(root.namespace(), "");
        assert_eq!(root.resolve("submit"), "submit");
        assert_eq!(root.register_block_action("hoge", noop_action).unwrap(), "hoge");
    }

    #[test]
    fn test_child_namespaces() {
        let root = Registry::new();
        let fuga = root.child("fuga");
        let deep = fuga.child("piyo");

        assert_eq!(fuga.namespace(), "fuga");
        assert_eq!(deep.namespace(), "fuga.piyo");
        assert_eq!(fuga.resolve("submit"), "fuga.submit");
        assert_eq!(
            deep.register_view_submission("submit", noop_view).unwrap(),
            "fuga.piyo.submit"
        );
    }

    #[test]
    fn test_children_share_table() {
        let root = Registry::new();
        let a = root.child("a");
        let b = root.child("b");
        assert!(Registry::new().block_action("a.submit").is_none());

        a.register_block_action("submit", noop_action).unwrap();
        b.register_block_action("submit", noop_action).unwrap();

        // Every scope sees every identifier.
        for scope in [&root, &a, &b] {
            assert!(scope.block_action("a.submit").is_some());
            assert!(scope.block_action("b.submit").is_some());
            assert!(scope.block_action("submit").is_none());
        }
        assert_eq!(root.action_ids(), ["a.submit", "b.submit"]);
        assert_eq!(root.len(), 2);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let root = Registry::new();
        root.register_block_action("x.y", noop_action).unwrap();

        // Same resolved id reached through a child scope.
        let result = root.child("x").register_block_action("y", noop_action);
        assert_eq!(result, Err(RegistryError::DuplicateActionId("x.y".to_string())));

        root.register_view_submission("modal", noop_view).unwrap();
        let result = root.register_view_submission("modal", noop_view);
        assert_eq!(result, Err(RegistryError::DuplicateCallbackId("modal".to_string())));
    }

    #[test]
    fn test_action_and_callback_maps_are_separate() {
        let root = Registry::new();
        root.register_block_action("same", noop_action).unwrap();
        root.register_view_submission("same", noop_view).unwrap();

        assert_eq!(root.action_ids(), ["same"]);
        assert_eq!(root.callback_ids(), ["same"]);
        assert!(root.view_submission("other").is_none());
    }

    #[test]
    fn test_distinct_names_distinct_ids() {
        let scope = Registry::new().child("feature");
        let ids: Vec<String> = ["open", "close", "submit"]
            .into_iter()
            .map(|name| scope.register_block_action(name, noop_action).unwrap())
            .collect();
        assert_eq!(ids, ["feature.open", "feature.close", "feature.submit"]);
    }

    #[test]
    fn test_debug_output() {
        let root = Registry::new();
        root.register_block_action("a", noop_action).unwrap();
        let rendered = format!("{:?}", root.child("ns"));
        assert!(rendered.contains("namespace: \"ns\""));
        assert!(rendered.contains("block_actions: 1"));
    }
}
