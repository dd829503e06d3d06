//! Failure interception for one request.
//!
//! # State Machine
//! ```text
//! Invoking ──ok──▶ Succeeded                      (response untouched)
//!    │
//!    └─err─▶ Faulted ──started──▶ Unsafe          (propagate original)
//!               │
//!               └─not started─▶ classify
//!                     ├─ Untracked ──▶ propagate original
//!                     └─ Tracked(s) ─▶ normalize + write body (handled)
//! ```
//!
//! # Design Decisions
//! - Classification is computed once into [`Classification`] and branched on
//! - Only tracked failures get a structured body; everything else is returned
//!   unchanged to the host, which applies its own default
//! - No retries: one failure, one decision

use std::sync::Arc;

use axum::http::StatusCode;
use futures_util::future::BoxFuture;

use crate::faults::{Classification, Failure, FaultRegistry};
use crate::http::body::{ErrorBody, ErrorWriter, JsonErrorWriter};
use crate::http::response::{normalize, ResponseContext};
use crate::observability::metrics;

/// How a request that reached the interceptor ended without propagating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The downstream handler completed; the response was not touched.
    Succeeded,
    /// A tracked failure was turned into a normalized response.
    Handled(StatusCode),
}

/// Wraps a downstream handler and normalizes its tracked failures.
#[derive(Clone)]
pub struct FaultInterceptor {
    registry: Arc<FaultRegistry>,
    writer: Arc<dyn ErrorWriter>,
}

impl FaultInterceptor {
    /// Interceptor writing JSON error bodies.
    pub fn new(registry: Arc<FaultRegistry>) -> Self {
        Self {
            registry,
            writer: Arc::new(JsonErrorWriter),
        }
    }

    /// Replace the error body writer.
    pub fn with_writer(mut self, writer: Arc<dyn ErrorWriter>) -> Self {
        self.writer = writer;
        self
    }

    pub fn registry(&self) -> &Arc<FaultRegistry> {
        &self.registry
    }

    /// Run `next` against `ctx` and resolve any failure it raises.
    ///
    /// `Err` always carries the failure `next` raised, unchanged, except when
    /// the error writer itself fails.
    pub async fn handle<C, F>(&self, ctx: &mut C, next: F) -> Result<Outcome, Failure>
    where
        C: ResponseContext,
        F: for<'a> FnOnce(&'a mut C) -> BoxFuture<'a, Result<(), Failure>>,
    {
        match next(ctx).await {
            Ok(()) => Ok(Outcome::Succeeded),
            Err(failure) => self.resolve(ctx, failure).map(Outcome::Handled),
        }
    }

    /// Decide what happens to `failure` given the current state of `ctx`.
    pub fn resolve<C>(&self, ctx: &mut C, failure: Failure) -> Result<StatusCode, Failure>
    where
        C: ResponseContext,
    {
        let fault = failure.display_name();

        if ctx.has_started() {
            tracing::error!(
                fault,
                error = %failure,
                "Response already started, propagating failure"
            );
            metrics::record_propagated(fault, "response_started");
            return Err(failure);
        }

        let status = match self.registry.classify(&failure) {
            Classification::Tracked(status) => status,
            Classification::Untracked => {
                tracing::warn!(fault, error = %failure, "Untracked failure, propagating");
                metrics::record_propagated(fault, "untracked");
                return Err(failure);
            }
        };

        if let Err(e) = normalize(ctx, status) {
            tracing::error!(fault, error = %e, "Normalization refused, propagating failure");
            metrics::record_propagated(fault, "response_started");
            return Err(failure);
        }

        let body = ErrorBody::from_failure(&failure, status);
        if let Err(e) = self.writer.write_error(ctx, status, &body) {
            tracing::error!(
                fault,
                error = %e,
                original = %failure,
                "Failed to write error body"
            );
            metrics::record_propagated(fault, "write_failed");
            return Err(Failure::new(e));
        }

        tracing::info!(fault, status = status.as_u16(), "Tracked failure normalized");
        metrics::record_handled(fault, status.as_u16());
        Ok(status)
    }
}

impl std::fmt::Debug for FaultInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaultInterceptor")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
