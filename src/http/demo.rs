//! Small application served by the binary to exercise the fault pipeline.
//!
//! - `GET /greet?name=<name>` answers `hello, <name>`; a missing name raises
//!   [`InvalidArgument`] (tracked, 400 by default)
//! - `GET /settings` raises [`MissingConfiguration`] (tracked when the
//!   binary registers it)
//! - `GET /crash` raises an I/O error nobody tracks (host default, 500)

use axum::body::Body;
use axum::extract::Query;
use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::faults::{Failure, InvalidArgument, MissingConfiguration};

/// Query parameters for `/greet`.
#[derive(Debug, Deserialize)]
struct GreetParams {
    name: Option<String>,
}

pub async fn demo_app(request: Request<Body>) -> Result<Response, Failure> {
    match request.uri().path() {
        "/greet" => {
            let name = Query::<GreetParams>::try_from_uri(request.uri())
                .ok()
                .and_then(|Query(params)| params.name)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| InvalidArgument::missing("name"))?;
            Ok((
                [(header::CACHE_CONTROL, "max-age=60")],
                format!("hello, {name}"),
            )
                .into_response())
        }
        "/settings" => Err(MissingConfiguration::with_source(
            "settings are unavailable",
            MissingConfiguration::with_message("no [settings] section in the loaded configuration"),
        )
        .into()),
        "/crash" => Err(std::io::Error::other("storage backend unreachable").into()),
        _ => Ok((StatusCode::NOT_FOUND, "not found").into_response()),
    }
}
