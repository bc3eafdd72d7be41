//! Error types for color conversion and matching
//!
//! Every failure in this crate is a caller error: malformed color input,
//! too few colors for a harmony verdict, or an empty catalog. None of them
//! are retried and none are papered over with a placeholder color.

use std::fmt;

/// Result type alias for color operations
pub type ColorResult<T> = Result<T, ColorError>;

/// Error type for color conversion, matching and harmony analysis
#[derive(Debug, Clone, PartialEq)]
pub enum ColorError {
    /// Malformed hex string or out-of-range channel value
    InvalidFormat { input: String, reason: String },

    /// Too few colors for harmony analysis, or an empty catalog
    InsufficientInput {
        context: String,
        required: usize,
        got: usize,
    },

    /// Catalog document could not be decoded
    Catalog { details: String },
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::InvalidFormat { input, reason } => {
                write!(f, "Invalid color format '{}': {}", input, reason)
            }
            ColorError::InsufficientInput {
                context,
                required,
                got,
            } => {
                write!(
                    f,
                    "Insufficient input for {}: need at least {}, got {}",
                    context, required, got
                )
            }
            ColorError::Catalog { details } => {
                write!(f, "Catalog error: {}", details)
            }
        }
    }
}

impl std::error::Error for ColorError {}

impl ColorError {
    /// Create an invalid format error
    pub fn invalid_format(input: impl Into<String>, reason: impl Into<String>) -> Self {
        ColorError::InvalidFormat {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an insufficient input error
    pub fn insufficient_input(context: impl Into<String>, required: usize, got: usize) -> Self {
        ColorError::InsufficientInput {
            context: context.into(),
            required,
            got,
        }
    }

    /// Create a catalog decoding error
    pub fn catalog(details: impl Into<String>) -> Self {
        ColorError::Catalog {
            details: details.into(),
        }
    }
}
