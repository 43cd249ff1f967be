//! Unified error system for the customization engine
//!
//! Two kinds of failure cross the caller boundary:
//! - input rejections (bad upload, unknown design, bad dimensions),
//!   reported synchronously with the session state unchanged
//! - internal storage faults, which callers normally never see because
//!   the manager downgrades persistence failures to log warnings
//!
//! Degraded-but-working conditions (catalog unavailable, malformed
//! catalog fields, snapshot over budget) are deliberately NOT errors;
//! they fall back to safe defaults and log. Nothing in this core is
//! fatal to the hosting application.

use thiserror::Error;

/// Engine error type
#[derive(Debug, Error)]
pub enum EngineError {
    /// Rejected upload (bad MIME type or size)
    #[error("Invalid upload: {message}")]
    InvalidUpload { message: String },

    /// Session already holds the maximum number of designs
    #[error("Design limit reached: at most {max} designs per customization")]
    DesignLimitReached { max: usize },

    /// No design with the given ID in the session
    #[error("Design not found: {id}")]
    DesignNotFound { id: String },

    /// Non-positive or non-finite dimensions
    #[error("Invalid dimensions: {message}")]
    InvalidDimensions { message: String },

    /// Quantity must be at least 1
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity { quantity: u32 },

    /// Base price must be finite and non-negative
    #[error("Invalid base price: {message}")]
    InvalidPrice { message: String },

    /// Unknown option ID for the requested category
    #[error("Option not found: {id}")]
    OptionNotFound { id: String },

    /// Storage fault surfaced on an explicit, user-initiated persist
    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl EngineError {
    // ========== Convenient constructors ==========

    /// Create an InvalidUpload error
    pub fn invalid_upload(message: impl Into<String>) -> Self {
        Self::InvalidUpload {
            message: message.into(),
        }
    }

    /// Create a DesignNotFound error
    pub fn design_not_found(id: impl Into<String>) -> Self {
        Self::DesignNotFound { id: id.into() }
    }

    /// Create an InvalidDimensions error
    pub fn invalid_dimensions(message: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            message: message.into(),
        }
    }

    /// Create an InvalidPrice error
    pub fn invalid_price(message: impl Into<String>) -> Self {
        Self::InvalidPrice {
            message: message.into(),
        }
    }

    /// Create an OptionNotFound error
    pub fn option_not_found(id: impl Into<String>) -> Self {
        Self::OptionNotFound { id: id.into() }
    }

    /// Create a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Whether this error is a synchronous input rejection (safe to
    /// show to the user as-is)
    pub fn is_input_rejection(&self) -> bool {
        !matches!(self, Self::Storage { .. })
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
