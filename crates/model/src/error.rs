//! Error types for mount option parsing.

use thiserror::Error;

/// Errors that can occur while parsing mount options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("invalid octal value for option '{key}': '{value}'")]
    InvalidOctal { key: &'static str, value: String },
}
