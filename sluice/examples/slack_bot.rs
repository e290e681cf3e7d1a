//! Minimal bot served over axum.
//!
//! ```text
//! SLUICE_BIND_ADDRESS=0.0.0.0:3000 RUST_LOG=sluice_std=debug cargo run --example slack_bot --features tower,tracing
//! ```
//!
//! Point the app's Event Subscriptions and Interactivity request URLs at
//! `http://<host>/slack/events`.

use anyhow::{Context, Result};
use axum::Router;
use serde_json::json;
use sluice::{
    AppHomeOpenedEvent, BlockAction, DispatchError, Dispatcher, ErrorKind, HandlerResult,
    InteractionCallback, MessageEvent, Registry, Request, ResponseWriter, ViewSubmissionResponse,
    service::WebhookService,
};
use std::net::SocketAddr;
use tracing::info;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

/// Feature module: registers its handlers under the `todo` namespace.
fn register_todo(registry: &Registry) -> Result<()> {
    let todo = registry.child("todo");

    let done = todo.register_block_action(
        "done",
        |_: &Request, cb: &InteractionCallback, action: &BlockAction| -> HandlerResult {
            info!(user = %cb.user.id, task = ?action.value, "task completed");
            Ok(())
        },
    )?;

    let create = todo.register_view_submission(
        "create",
        |_: &Request, cb: &InteractionCallback| -> HandlerResult<Option<ViewSubmissionResponse>> {
            let title = cb
                .view
                .state
                .value("title", "input")
                .and_then(|action| action.value.clone())
                .unwrap_or_default();
            if title.trim().is_empty() {
                return Ok(Some(ViewSubmissionResponse::errors([(
                    "title",
                    "A task needs a title",
                )])));
            }
            info!(user = %cb.user.id, %title, "task created");
            Ok(None)
        },
    )?;

    info!(%done, %create, "todo handlers registered");
    Ok(())
}

fn home_opened(_: &Request, event: &AppHomeOpenedEvent) -> HandlerResult {
    // Publishing a Home view needs a Web API client; log instead.
    info!(user = %event.user, tab = %event.tab, "home opened");
    Ok(())
}

fn message(_: &Request, event: &MessageEvent) -> HandlerResult {
    if event.bot_id.is_none() {
        info!(channel = %event.channel, text = %event.text, "message received");
    }
    Ok(())
}

fn report_error(w: &mut ResponseWriter, _: &Request, err: DispatchError) {
    tracing::error!(error = %err, kind = ?err.kind(), "request failed");
    let status = match err.kind() {
        ErrorKind::Transport | ErrorKind::Classification => http::StatusCode::BAD_REQUEST,
        ErrorKind::Routing => http::StatusCode::NOT_FOUND,
        _ => http::StatusCode::INTERNAL_SERVER_ERROR,
    };
    w.write_status(status);
    w.write(json!({"error": err.to_string()}).to_string().as_bytes());
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slack_bot=info,sluice_std=debug".into()),
        )
        .init();

    let address: SocketAddr = std::env::var("SLUICE_BIND_ADDRESS")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string())
        .parse()
        .context("SLUICE_BIND_ADDRESS must be a socket address")?;

    let registry = Registry::new();
    register_todo(&registry)?;

    let dispatcher = Dispatcher::builder(registry)
        .on_app_home_opened(home_opened)
        .on_message(message)
        .on_error(report_error)
        .build();

    let app = Router::new().route_service("/slack/events", WebhookService::new(dispatcher));

    let listener = tokio::net::TcpListener::bind(address).await?;
    info!(%address, "listening");

    let shutdown_signal = async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received shutdown signal");
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    Ok(())
}
