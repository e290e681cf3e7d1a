//! Tower adapter.
//!
//! [`WebhookService`] turns a [`Dispatcher`] into a
//! `tower::Service<http::Request<B>>`, so it can be mounted in any tower-based
//! server. With axum:
//!
//! ```rust,ignore
//! let app = axum::Router::new().route_service("/slack/events", WebhookService::new(dispatcher));
//! ```
//!
//! The body is collected up to [`ServiceConfig::body_limit`] before dispatch.
//! A body that fails to arrive or exceeds the limit goes through the
//! dispatcher's error path as [`DispatchError::Body`].

use bytes::Bytes;
use futures::future::BoxFuture;
use http::Method;
use http_body::Body;
use http_body_util::{BodyExt, Full, Limited};
use sluice_core::{BoxError, DispatchError};
use sluice_std::Dispatcher;
use std::{
    convert::Infallible,
    sync::Arc,
    task::{Context, Poll},
};
use tower::Service;

/// Default maximum request body size (2 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Transport settings for [`WebhookService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Maximum number of body bytes read before dispatch fails.
    pub body_limit: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

/// A `tower::Service` that feeds every request to a shared [`Dispatcher`].
///
/// Never fails at the service level; every outcome is an HTTP response.
#[derive(Debug, Clone)]
pub struct WebhookService {
    dispatcher: Arc<Dispatcher>,
    config: ServiceConfig,
}

impl WebhookService {
    /// Wrap `dispatcher` with the default [`ServiceConfig`].
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self::from_shared(Arc::new(dispatcher))
    }

    /// Wrap a dispatcher that is already shared elsewhere.
    pub fn from_shared(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            config: ServiceConfig::default(),
        }
    }

    /// Replace the transport settings.
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// The dispatcher requests are routed to.
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// The active transport settings.
    pub fn config(&self) -> ServiceConfig {
        self.config
    }
}

impl<B> Service<http::Request<B>> for WebhookService
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    type Response = http::Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: http::Request<B>) -> Self::Future {
        let dispatcher = Arc::clone(&self.dispatcher);
        let limit = self.config.body_limit;

        Box::pin(async move {
            let (parts, body) = request.into_parts();

            // Only POST bodies are worth reading.
            if parts.method != Method::POST {
                let request = http::Request::from_parts(parts, Bytes::new());
                return Ok(dispatcher.handle(&request).map(Full::new));
            }

            let response = match Limited::new(body, limit).collect().await {
                Ok(collected) => {
                    let request = http::Request::from_parts(parts, collected.to_bytes());
                    dispatcher.handle(&request)
                }
                Err(error) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(%error, limit, "failed to read request body");
                    let request = http::Request::from_parts(parts, Bytes::new());
                    dispatcher.respond_with_error(&request, DispatchError::Body(error))
                }
            };
            Ok(response.map(Full::new))
        })
    }
}
