//! Structured error bodies and the writer that serializes them.

use std::collections::BTreeMap;

use axum::http::header::{HeaderValue, CONTENT_TYPE};
use axum::http::StatusCode;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::faults::Failure;
use crate::http::response::ResponseContext;

/// Content type of serialized error bodies.
pub const PROBLEM_JSON: &str = "application/problem+json";

/// Wire shape: `{"status": 400, "errors": {"InvalidArgument": ["..."]}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ErrorBody {
    /// Label the failure by its type name; report the cause's message when
    /// there is one, the failure's own message otherwise.
    pub fn from_failure(failure: &Failure, status: StatusCode) -> Self {
        let message = failure
            .inner_message()
            .unwrap_or_else(|| failure.message());

        Self {
            status: status.as_u16(),
            errors: BTreeMap::from([(failure.display_name().to_string(), vec![message])]),
        }
    }
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to serialize error body: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("response has already started")]
    AlreadyStarted,
}

/// Serializes an error body into a response.
pub trait ErrorWriter: Send + Sync {
    fn write_error(
        &self,
        ctx: &mut dyn ResponseContext,
        status: StatusCode,
        body: &ErrorBody,
    ) -> Result<(), WriteError>;
}

/// Writes error bodies as `application/problem+json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonErrorWriter;

impl ErrorWriter for JsonErrorWriter {
    fn write_error(
        &self,
        ctx: &mut dyn ResponseContext,
        status: StatusCode,
        body: &ErrorBody,
    ) -> Result<(), WriteError> {
        if ctx.has_started() {
            return Err(WriteError::AlreadyStarted);
        }

        let payload = serde_json::to_vec(body)?;

        let mut headers = ctx.headers().clone();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON));
        ctx.replace_headers(headers);
        ctx.set_status(status);
        ctx.write_body(Bytes::from(payload));
        Ok(())
    }
}
