//! Response context and cache-suppressing normalization.
//!
//! # Responsibilities
//! - Abstract the outbound response under construction for one request
//! - Rewrite a response into the fixed "do not cache" shape
//!
//! # Design Decisions
//! - The new header set is computed from the old one first, then swapped in
//!   whole; the live header map is never edited while being read
//! - A response whose head has left the process is never touched again

use axum::body::Body;
use axum::http::header::{HeaderName, HeaderValue, CACHE_CONTROL, EXPIRES, PRAGMA};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use bytes::{Bytes, BytesMut};
use thiserror::Error;

/// `Cache-Control` value written on normalized responses.
pub const NO_CACHE_DIRECTIVES: &str = "no-cache, no-store, must-revalidate";
/// `Pragma` value written on normalized responses.
pub const PRAGMA_NO_CACHE: &str = "no-cache";
/// `Expires` value written on normalized responses.
pub const EXPIRES_IMMEDIATELY: &str = "0";

/// Outbound response state for a single request.
pub trait ResponseContext {
    fn status(&self) -> StatusCode;

    fn set_status(&mut self, status: StatusCode);

    fn headers(&self) -> &HeaderMap;

    /// Swap in a complete header set.
    fn replace_headers(&mut self, headers: HeaderMap);

    /// Drop headers and body and reset the status to 200.
    fn clear(&mut self);

    /// Append `chunk` to the response body.
    fn write_body(&mut self, chunk: Bytes);

    /// True once any byte of this response has left the process.
    fn has_started(&self) -> bool;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("response has already started; it can no longer be modified")]
    AlreadyStarted,
}

/// Replace caching headers, status and body of `ctx`.
///
/// Every header except `Cache-Control`, `Pragma` and `Expires` is kept in its
/// original order; the body is discarded; the fixed no-cache triad is
/// appended last.
pub fn normalize<C>(ctx: &mut C, status: StatusCode) -> Result<(), NormalizeError>
where
    C: ResponseContext + ?Sized,
{
    if ctx.has_started() {
        return Err(NormalizeError::AlreadyStarted);
    }

    let headers = normalized_headers(ctx.headers());
    ctx.clear();
    ctx.set_status(status);
    ctx.replace_headers(headers);
    Ok(())
}

/// Compute the header set of a normalized response from the current one.
pub fn normalized_headers(current: &HeaderMap) -> HeaderMap {
    let mut next = HeaderMap::with_capacity(current.len() + 3);
    for (name, value) in current {
        if !is_cache_header(name) {
            next.append(name.clone(), value.clone());
        }
    }

    next.append(CACHE_CONTROL, HeaderValue::from_static(NO_CACHE_DIRECTIVES));
    next.append(PRAGMA, HeaderValue::from_static(PRAGMA_NO_CACHE));
    next.append(EXPIRES, HeaderValue::from_static(EXPIRES_IMMEDIATELY));
    next
}

fn is_cache_header(name: &HeaderName) -> bool {
    name == CACHE_CONTROL || name == PRAGMA || name == EXPIRES
}

/// Buffered response for hosts that stream the body themselves.
///
/// Nothing leaves the process until [`ResponseState::start`] is called; after
/// that the response counts as started for good.
#[derive(Debug, Default)]
pub struct ResponseState {
    status: StatusCode,
    headers: HeaderMap,
    body: BytesMut,
    started: bool,
}

impl ResponseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Mark the head (and whatever body is buffered) as sent.
    pub fn start(&mut self) {
        if !self.started {
            tracing::trace!(status = self.status.as_u16(), "Response started");
        }
        self.started = true;
    }

    /// Convert into an axum response carrying the buffered body.
    pub fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body.freeze()));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseContext for ResponseState {
    fn status(&self) -> StatusCode {
        self.status
    }

    fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn replace_headers(&mut self, headers: HeaderMap) {
        self.headers = headers;
    }

    fn clear(&mut self) {
        self.status = StatusCode::OK;
        self.headers.clear();
        self.body.clear();
    }

    fn write_body(&mut self, chunk: Bytes) {
        self.body.extend_from_slice(&chunk);
    }

    fn has_started(&self) -> bool {
        self.started
    }
}

/// An axum response value that has not been handed to the server yet.
impl ResponseContext for Response {
    fn status(&self) -> StatusCode {
        Response::status(self)
    }

    fn set_status(&mut self, status: StatusCode) {
        *self.status_mut() = status;
    }

    fn headers(&self) -> &HeaderMap {
        Response::headers(self)
    }

    fn replace_headers(&mut self, headers: HeaderMap) {
        *self.headers_mut() = headers;
    }

    fn clear(&mut self) {
        *self.status_mut() = StatusCode::OK;
        self.headers_mut().clear();
        *self.body_mut() = Body::empty();
    }

    fn write_body(&mut self, chunk: Bytes) {
        *self.body_mut() = Body::from(chunk);
    }

    fn has_started(&self) -> bool {
        false
    }
}
