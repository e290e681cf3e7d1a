//! Namespacing and registration through the public API.

use sluice::{Dispatcher, Registry, RegistryError, SluiceError, testing};

mod common;
use common::{Log, example_bot, logging_action};

#[test]
fn test_example_bot_ids() {
    let bot = example_bot();
    assert_eq!(bot.hoge, "hoge");
    assert_eq!(bot.piyo, "fuga.piyo");
}

#[test]
fn test_example_bot_dispatches_root_and_child_actions() {
    let bot = example_bot();

    for id in [&bot.hoge, &bot.piyo] {
        let request = testing::json_request(&testing::block_actions_payload(&[id.as_str()]));
        let response = bot.dispatcher.handle(&request);
        assert_eq!(response.status(), 200);
        assert!(response.body().is_empty());
    }

    assert_eq!(bot.log.entries(), ["HOGE", "FUGA.PIYO"]);
}

#[test]
#[should_panic(expected = "unexpected dispatch error: unknown action id: piyo")]
fn test_error_handler_runs_outside_panic_guard() {
    // The child name alone is not a registered id; the bot's error handler
    // panics, and that panic is not swallowed by the dispatcher.
    let bot = example_bot();
    let request = testing::json_request(&testing::block_actions_payload(&["piyo"]));
    bot.dispatcher.handle(&request);
}

#[test]
fn test_deeply_nested_child_is_dispatchable() {
    let log = Log::default();
    let root = Registry::new();
    let id = root
        .child("billing")
        .child("invoices")
        .register_block_action("approve", logging_action(&log, "approve"))
        .unwrap();
    assert_eq!(id, "billing.invoices.approve");

    let dispatcher = Dispatcher::new(root);
    let response =
        dispatcher.handle(&testing::json_request(&testing::block_actions_payload(&[id.as_str()])));

    assert_eq!(response.status(), 200);
    assert_eq!(log.entries(), ["approve"]);
}

#[test]
fn test_duplicate_across_scopes_aborts_wiring() {
    fn wire(root: &Registry, log: &Log) -> Result<(), SluiceError> {
        root.register_block_action("todo.done", logging_action(log, "root"))?;
        root.child("todo")
            .register_block_action("done", logging_action(log, "child"))?;
        Ok(())
    }

    let log = Log::default();
    let root = Registry::new();
    let err = wire(&root, &log).unwrap_err();

    assert!(matches!(
        err,
        SluiceError::Registry(RegistryError::DuplicateActionId(ref id)) if id == "todo.done"
    ));
    assert_eq!(root.action_ids(), ["todo.done"]);
}

#[test]
fn test_registration_visible_after_dispatcher_is_built() {
    let log = Log::default();
    let registry = Registry::new();
    let dispatcher = Dispatcher::new(registry.clone());

    let late = registry
        .child("late")
        .register_block_action("button", logging_action(&log, "late"))
        .unwrap();

    let response =
        dispatcher.handle(&testing::json_request(&testing::block_actions_payload(&[late.as_str()])));
    assert_eq!(response.status(), 200);
    assert_eq!(log.entries(), ["late"]);
}
