//! Fault classification subsystem.
//!
//! # Data Flow
//! ```text
//! handler error E
//!     → failure.rs (Failure: erased E + FaultKey of its exact type)
//!     → registry.rs (FaultKey → StatusCode, or Untracked)
//!     → http::interceptor decides handled vs propagated
//! ```
//!
//! # Design Decisions
//! - Identity is the concrete Rust type (`TypeId`), never a supertype
//! - The registry is an explicit value shared through `Arc`, not a global
//! - Registry operations report no-ops through `bool`, never through errors

pub mod builtin;
pub mod failure;
pub mod registry;

pub use builtin::{InvalidArgument, MissingConfiguration};
pub use failure::{Failure, FaultKey};
pub use registry::{Classification, FaultRegistry, FaultTable};
