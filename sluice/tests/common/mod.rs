#![allow(dead_code)]

use sluice::{
    BlockAction, BlockActionHandler, DispatchError, Dispatcher, HandlerResult,
    InteractionCallback, Registry, Request, ResponseWriter,
};
use std::sync::{Arc, Mutex};

// ============================================================================
// Shared Log
// ============================================================================

/// Ordered record of handler invocations across a test.
#[derive(Clone, Default)]
pub struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// A block-action handler that appends `label` to `log`.
pub fn logging_action(log: &Log, label: &'static str) -> impl BlockActionHandler {
    let log = log.clone();
    move |_: &Request, _: &InteractionCallback, _: &BlockAction| -> HandlerResult {
        log.push(label);
        Ok(())
    }
}

/// A block-action handler that appends `label` to `log`, then fails.
pub fn failing_action(log: &Log, label: &'static str) -> impl BlockActionHandler {
    let log = log.clone();
    move |_: &Request, _: &InteractionCallback, _: &BlockAction| -> HandlerResult {
        log.push(label);
        Err(format!("{label} failed").into())
    }
}

// ============================================================================
// Example Bot
// ============================================================================

/// Root action `hoge` and child action `fuga.piyo`, with an error handler
/// that panics so any dispatch failure is loud.
pub struct ExampleBot {
    pub dispatcher: Dispatcher,
    pub log: Log,
    pub hoge: String,
    pub piyo: String,
}

pub fn panic_on_error(_: &mut ResponseWriter, _: &Request, err: DispatchError) {
    panic!("unexpected dispatch error: {err}");
}

pub fn example_bot() -> ExampleBot {
    let log = Log::default();
    let registry = Registry::new();

    let hoge = registry
        .register_block_action("hoge", logging_action(&log, "HOGE"))
        .unwrap();
    let piyo = registry
        .child("fuga")
        .register_block_action("piyo", logging_action(&log, "FUGA.PIYO"))
        .unwrap();

    let dispatcher = Dispatcher::builder(registry)
        .on_error(panic_on_error)
        .build();

    ExampleBot {
        dispatcher,
        log,
        hoge,
        piyo,
    }
}
