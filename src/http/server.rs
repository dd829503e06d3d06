//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the health endpoint and the application
//! - Wrap the application in the fault layer and the host error default
//! - Wire up middleware (tracing, timeout)
//! - Serve with graceful shutdown

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    error_handling::HandleErrorLayer,
    http::Request,
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower::{Service, ServiceBuilder};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServiceConfig;
use crate::faults::{Failure, FaultRegistry};
use crate::http::layer::{handle_unclassified, FaultLayer};

/// HTTP server hosting one fallible application service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server that routes everything except `/health` to `app`.
    pub fn new<S>(config: ServiceConfig, registry: Arc<FaultRegistry>, app: S) -> Self
    where
        S: Service<Request<Body>, Response = Response> + Clone + Send + Sync + 'static,
        S::Error: Into<Failure> + Send + 'static,
        S::Future: Send + 'static,
    {
        let router = Self::build_router(&config, registry, app);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router<S>(config: &ServiceConfig, registry: Arc<FaultRegistry>, app: S) -> Router
    where
        S: Service<Request<Body>, Response = Response> + Clone + Send + Sync + 'static,
        S::Error: Into<Failure> + Send + 'static,
        S::Future: Send + 'static,
    {
        let guarded = ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_unclassified))
            .layer(FaultLayer::new(registry))
            .service(app);

        Router::new()
            .route("/health", get(health))
            .fallback_service(guarded)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The assembled router, for serving elsewhere or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

async fn health() -> &'static str {
    "ok"
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<Infallible>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faults::InvalidArgument;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use tower::{service_fn, ServiceExt};

    async fn app(request: Request<Body>) -> Result<Response, Failure> {
        match request.uri().path() {
            "/bad" => Err(InvalidArgument::new("bad input").into()),
            "/broken" => Err(std::io::Error::other("disk").into()),
            _ => Ok("fine".into_response()),
        }
    }

    fn server() -> HttpServer {
        HttpServer::new(
            ServiceConfig::default(),
            Arc::new(FaultRegistry::new()),
            service_fn(app),
        )
    }

    async fn status_of(path: &str) -> StatusCode {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        server().router().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_routes() {
        assert_eq!(status_of("/health").await, StatusCode::OK);
        assert_eq!(status_of("/anything").await, StatusCode::OK);
        assert_eq!(status_of("/bad").await, StatusCode::BAD_REQUEST);
        assert_eq!(status_of("/broken").await, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
