//! End-to-end behaviour of the fault pipeline over real HTTP.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use fault_normalizer::faults::{Failure, FaultRegistry, InvalidArgument, MissingConfiguration};
use serde_json::{json, Value};
use thiserror::Error;

mod common;

#[derive(Debug, Error)]
#[error("{0}")]
struct ArgNull(String);

#[derive(Debug, Error)]
#[error("{0}")]
struct Weird(String);

async fn app(request: Request<Body>) -> Result<Response, Failure> {
    match request.uri().path() {
        "/arg-null" => Err(ArgNull("boom".into()).into()),
        "/weird" => Err(Weird("x".into()).into()),
        "/config" => Err(MissingConfiguration::with_source(
            "outer",
            InvalidArgument::new("inner wins"),
        )
        .into()),
        _ => Ok(([("cache-control", "max-age=60")], "fine").into_response()),
    }
}

fn header<'a>(response: &'a reqwest::Response, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn test_tracked_failure_is_normalized() {
    let registry = Arc::new(FaultRegistry::new());
    assert!(registry.register::<ArgNull>(StatusCode::BAD_REQUEST));
    let addr = common::start_server(registry, app).await;

    let res = common::client()
        .get(format!("http://{addr}/arg-null"))
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), 400);
    assert_eq!(
        header(&res, "cache-control"),
        Some("no-cache, no-store, must-revalidate")
    );
    assert_eq!(header(&res, "pragma"), Some("no-cache"));
    assert_eq!(header(&res, "expires"), Some("0"));
    assert_eq!(header(&res, "content-type"), Some("application/problem+json"));

    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"status": 400, "errors": {"ArgNull": ["boom"]}}));
}

#[tokio::test]
async fn test_untracked_failure_falls_through_to_host_default() {
    let registry = Arc::new(FaultRegistry::new());
    let addr = common::start_server(registry, app).await;

    let res = common::client()
        .get(format!("http://{addr}/weird"))
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), 500);
    assert!(header(&res, "pragma").is_none());
    assert!(header(&res, "expires").is_none());
    assert_eq!(res.text().await.unwrap(), "Internal Server Error");
}

#[tokio::test]
async fn test_inner_message_reported() {
    let registry = Arc::new(FaultRegistry::new());
    registry.register::<MissingConfiguration>(StatusCode::SERVICE_UNAVAILABLE);
    let addr = common::start_server(registry, app).await;

    let res = common::client()
        .get(format!("http://{addr}/config"))
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), 503);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({"status": 503, "errors": {"MissingConfiguration": ["inner wins"]}})
    );
}

#[tokio::test]
async fn test_success_keeps_handler_headers() {
    let registry = Arc::new(FaultRegistry::new());
    let addr = common::start_server(registry, app).await;

    let res = common::client()
        .get(format!("http://{addr}/ok"))
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(header(&res, "cache-control"), Some("max-age=60"));
    assert_eq!(res.text().await.unwrap(), "fine");
}

#[tokio::test]
async fn test_registry_changes_apply_to_running_server() {
    let registry = Arc::new(FaultRegistry::new());
    let addr = common::start_server(Arc::clone(&registry), app).await;
    let client = common::client();
    let url = format!("http://{addr}/weird");

    assert_eq!(client.get(&url).send().await.unwrap().status(), 500);

    registry.register::<Weird>(StatusCode::CONFLICT);
    assert_eq!(client.get(&url).send().await.unwrap().status(), 409);

    registry.update_status(&Failure::new(Weird(String::new())), StatusCode::GONE);
    assert_eq!(client.get(&url).send().await.unwrap().status(), 410);

    registry.reset_to_defaults();
    assert_eq!(client.get(&url).send().await.unwrap().status(), 500);
}
