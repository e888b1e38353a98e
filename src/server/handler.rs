// src/server/handler.rs
use hyper::{Body, Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tower::Service;
use tracing::error;

use crate::health::{default_registry, Registry, Status};
use crate::server::response::{json_response, not_found, server_error_response};

pub const DEFAULT_HEALTH_PATH: &str = "/debug/health";

/// Serves a registry's status as JSON: 200 when every check is healthy,
/// 503 otherwise. Anything but `GET <path>` is a 404.
#[derive(Clone)]
pub struct StatusHandler {
    registry: Arc<Registry>,
    path: Arc<str>,
    check_timeout: Option<Duration>,
}

impl StatusHandler {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            path: Arc::from(DEFAULT_HEALTH_PATH),
            check_timeout: None,
        }
    }

    pub fn with_default_registry() -> Self {
        Self::new(default_registry().clone())
    }

    pub fn with_path(mut self, path: impl AsRef<str>) -> Self {
        self.path = Arc::from(path.as_ref());
        self
    }

    /// Bound each check's evaluation; overrunning checks report unhealthy.
    pub fn with_check_timeout(mut self, timeout: Duration) -> Self {
        self.check_timeout = Some(timeout);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub async fn handle(&self, req: Request<Body>) -> Response<Body> {
        if req.uri().path() != &*self.path || req.method() != Method::GET {
            return not_found();
        }

        let status = match self.current_status().await {
            Some(status) => status,
            None => return server_error_response(),
        };

        let code = if status.is_healthy() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        json_response(code, &status)
    }

    async fn current_status(&self) -> Option<Status> {
        if let Some(timeout) = self.check_timeout {
            return Some(self.registry.check_status_with_timeout(timeout).await);
        }

        // Checks may block; keep them off the async workers.
        let registry = self.registry.clone();
        match tokio::task::spawn_blocking(move || registry.check_status()).await {
            Ok(status) => Some(status),
            Err(e) => {
                error!("Health status evaluation failed: {}", e);
                None
            }
        }
    }
}

impl Service<Request<Body>> for StatusHandler {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let handler = self.clone();
        Box::pin(async move { Ok(handler.handle(req).await) })
    }
}
