//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use fault_normalizer::config::ServiceConfig;
use fault_normalizer::faults::{Failure, FaultRegistry};
use fault_normalizer::http::HttpServer;
use tokio::net::TcpListener;
use tower::service_fn;

/// Serve `app` behind the fault pipeline on an ephemeral port.
pub async fn start_server<F, Fut>(registry: Arc<FaultRegistry>, app: F) -> SocketAddr
where
    F: Fn(Request<Body>) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, Failure>> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(ServiceConfig::default(), registry, service_fn(app));
    let router = server.router();

    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, router).await {
            eprintln!("test server error: {err}");
        }
    });

    addr
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
