//! Fault types shipped with the crate.

use std::error::Error as StdError;

use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A caller supplied an argument that is missing or unusable.
///
/// This is the one type every fresh registry tracks (mapped to 400).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct InvalidArgument {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl InvalidArgument {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Build the error around an underlying cause. The cause's message is the
    /// one reported in normalized error bodies.
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Shorthand for a required parameter that was not provided.
    pub fn missing(parameter: &str) -> Self {
        Self::new(format!("Value cannot be null. (Parameter '{parameter}')"))
    }
}

/// A configuration section could not be located.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct MissingConfiguration {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl MissingConfiguration {
    pub const DEFAULT_MESSAGE: &'static str = "Unable to locate a specified configuration section.";

    pub fn new() -> Self {
        Self::with_message(Self::DEFAULT_MESSAGE)
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

impl Default for MissingConfiguration {
    fn default() -> Self {
        Self::new()
    }
}
