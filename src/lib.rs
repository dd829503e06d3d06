//! Fault classification and error-response normalization for HTTP services.
//!
//! A downstream handler may fail. The interceptor looks up the exact type of
//! the failure in a [`FaultRegistry`]: tracked failures become a normalized,
//! non-cacheable JSON error response; everything else is handed back to the
//! host untouched.

pub mod config;
pub mod faults;
pub mod http;
pub mod observability;

pub use config::ServiceConfig;
pub use faults::{Classification, Failure, FaultKey, FaultRegistry};
pub use http::{FaultInterceptor, FaultLayer, HttpServer};
