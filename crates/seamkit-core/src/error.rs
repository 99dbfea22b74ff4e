//! Error handling for SeamKit
//!
//! Provides the error types for every layer of the toolpath pipeline:
//! - Toolpath errors (geometry, flow, and layer construction)
//! - I/O errors (writing the generated program)
//!
//! None of these are recoverable. A failure aborts the layer being built
//! and the whole print with it.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Toolpath error type
///
/// Represents failures while turning ring geometry into motion instructions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolpathError {
    /// A computed quantity is physically meaningless for the requested
    /// seam length / layer height combination
    #[error("Configuration error: {reason}")]
    Configuration {
        /// What went wrong.
        reason: String,
    },

    /// Ring geometry cannot support the requested operation
    #[error("Degenerate geometry: {reason}")]
    DegenerateGeometry {
        /// What went wrong.
        reason: String,
    },

    /// A caller passed an argument outside its valid domain
    #[error("Precondition violated for '{name}': {reason}")]
    Precondition {
        /// The offending argument.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ToolpathError {
    /// Create a configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Create a degenerate geometry error
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            reason: reason.into(),
        }
    }

    /// Create a precondition violation for the named argument
    pub fn precondition(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Precondition {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Main error type for SeamKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Toolpath error
    #[error(transparent)]
    Toolpath(#[from] ToolpathError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this is a configuration error
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Error::Toolpath(ToolpathError::Configuration { .. }))
    }

    /// Check if this is a degenerate geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(
            self,
            Error::Toolpath(ToolpathError::DegenerateGeometry { .. })
        )
    }

    /// Check if this is a precondition violation
    pub fn is_precondition_error(&self) -> bool {
        matches!(self, Error::Toolpath(ToolpathError::Precondition { .. }))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
