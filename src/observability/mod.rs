//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! http::interceptor decisions
//!     → logging.rs (structured log events)
//!     → metrics.rs (handled / propagated counters)
//! ```

pub mod logging;
pub mod metrics;
