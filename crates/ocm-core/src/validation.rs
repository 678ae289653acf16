//! Input validation at the CLI/core boundary.
//!
//! All checks run before any network or filesystem access.

use thiserror::Error;

use crate::constants::MAX_NAME_LENGTH;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Asset name cannot be empty")]
    Empty,

    #[error("Asset name too long (max {max} characters)")]
    TooLong { max: usize },

    #[error("Invalid name: path traversal not allowed (..)")]
    PathTraversal,

    #[error("Invalid name: backslashes not allowed (use forward slash for nested paths)")]
    Backslash,

    #[error(
        "Invalid name: \"{0}\". Only alphanumeric, dash, underscore, and forward slash (for nesting) allowed."
    )]
    InvalidCharacters(String),

    #[error("Local MCP server '{0}' needs a non-empty command")]
    EmptyCommand(String),

    #[error("Remote MCP server '{name}' has an invalid url '{url}': {reason}")]
    InvalidUrl {
        name: String,
        url: String,
        reason: String,
    },

    #[error("MCP server '{name}' timeout must be at least {min}ms (got {actual}ms)")]
    TimeoutTooSmall { name: String, min: u64, actual: u64 },

    #[error("MCP server '{0}' oauth must be false or an object")]
    InvalidOAuth(String),

    #[error("Skill manifest invalid: {0}")]
    SkillManifest(String),
}

/// Validate an asset name.
///
/// Names are path segments joined by `/`; each segment is made of ASCII
/// alphanumerics, `-` and `_`.
pub fn validate_asset_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::Empty);
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            max: MAX_NAME_LENGTH,
        });
    }
    if name.contains("..") {
        return Err(ValidationError::PathTraversal);
    }
    if name.contains('\\') {
        return Err(ValidationError::Backslash);
    }

    let segments_ok = name.split('/').all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    });
    if !segments_ok {
        return Err(ValidationError::InvalidCharacters(name.to_string()));
    }

    Ok(())
}
