//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → overrides.rs adjusts the fault registry at startup
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod overrides;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use overrides::apply_overrides;
pub use schema::{FaultConfig, ListenerConfig, ObservabilityConfig, ServiceConfig, TimeoutConfig};
pub use validation::ValidationError;
