//! HTTP fault handling subsystem.
//!
//! # Data Flow
//! ```text
//! request
//!     → layer.rs (FaultService wraps the application)
//!     → application fails with E
//!     → interceptor.rs (started? tracked? → decision)
//!     → response.rs (normalize: no-cache triad, status, cleared body)
//!     → body.rs (ErrorBody serialized by an ErrorWriter)
//!     → server.rs (host default for anything propagated)
//! ```

pub mod body;
pub mod demo;
pub mod interceptor;
pub mod layer;
pub mod response;
pub mod server;

pub use body::{ErrorBody, ErrorWriter, JsonErrorWriter, WriteError};
pub use interceptor::{FaultInterceptor, Outcome};
pub use layer::{handle_unclassified, FaultLayer, FaultService};
pub use response::{normalize, normalized_headers, NormalizeError, ResponseContext, ResponseState};
pub use server::HttpServer;
