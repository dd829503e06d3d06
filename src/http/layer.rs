//! Tower integration for the fault interceptor.
//!
//! ```text
//! HandleErrorLayer(handle_unclassified)   host default for propagated failures
//!     → FaultLayer                        tracked failures become responses
//!         → application service           Result<Response, E: Into<Failure>>
//! ```

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use crate::faults::{Failure, FaultRegistry};
use crate::http::interceptor::FaultInterceptor;

/// Layer that applies [`FaultInterceptor`] to a fallible service.
#[derive(Clone, Debug)]
pub struct FaultLayer {
    interceptor: FaultInterceptor,
}

impl FaultLayer {
    pub fn new(registry: Arc<FaultRegistry>) -> Self {
        Self::with_interceptor(FaultInterceptor::new(registry))
    }

    pub fn with_interceptor(interceptor: FaultInterceptor) -> Self {
        Self { interceptor }
    }
}

impl<S> Layer<S> for FaultLayer {
    type Service = FaultService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FaultService {
            inner,
            interceptor: self.interceptor.clone(),
        }
    }
}

/// Service produced by [`FaultLayer`].
///
/// A failure from the inner service is resolved against a fresh, unsent
/// response, so only the registry decides between a normalized response and
/// propagation.
///
/// Readiness errors from the inner service are propagated as-is; only
/// failures returned by `call` are classified, since there is no response
/// to normalize before a request has been accepted.
#[derive(Clone, Debug)]
pub struct FaultService<S> {
    inner: S,
    interceptor: FaultInterceptor,
}

impl<S, B> Service<Request<B>> for FaultService<S>
where
    S: Service<Request<B>, Response = Response>,
    S::Error: Into<Failure> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = Failure;
    type Future = BoxFuture<'static, Result<Response, Failure>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        let interceptor = self.interceptor.clone();
        let future = self.inner.call(request);

        Box::pin(async move {
            match future.await {
                Ok(response) => Ok(response),
                Err(error) => {
                    let mut response = Response::new(Body::empty());
                    interceptor
                        .resolve(&mut response, error.into())
                        .map(|_| response)
                }
            }
        })
    }
}

/// Host default for failures the interceptor propagates.
pub async fn handle_unclassified(failure: Failure) -> Response {
    tracing::error!(
        fault = failure.display_name(),
        error = %failure,
        "Unhandled failure"
    );
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
