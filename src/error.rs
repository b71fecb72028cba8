//! Overlay Error Types
//!
//! The overlay is a best-effort visual layer: most invalid input degrades to
//! a silent no-op rather than an error. Typed failures exist only at the two
//! edges where the caller can act on them - layer creation and
//! configuration.

use thiserror::Error;

/// Result type for overlay operations
pub type Result<T> = std::result::Result<T, OverlayError>;

/// Overlay error types
#[derive(Error, Debug)]
pub enum OverlayError {
    /// Host failed to create or release a visual layer
    #[error("Platform layer error: {0}")]
    Platform(String),

    /// Configuration rejected during validation
    #[error("Invalid configuration: {0}")]
    Config(String),
}
