//! Error taxonomy for GitHub content fetching.

use std::path::PathBuf;

use chrono::{DateTime, Local, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid source '{0}': owner and repo must be non-empty")]
    InvalidSource(String),

    #[error("Asset not found at '{path}' ({url})")]
    NotFound { path: String, url: String },

    #[error(
        "GitHub API rate limit exceeded{}. Set GITHUB_TOKEN to use a higher limit.",
        reset_suffix(.reset)
    )]
    RateLimited { reset: Option<DateTime<Utc>> },

    #[error("GitHub API error: HTTP {status} ({url})")]
    Api { status: u16, url: String },

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("'{path}' is a directory, expected a single file")]
    NotAFile { path: String },

    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }

    pub(crate) fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| FetchError::Io {
            action,
            path,
            source,
        }
    }
}

fn reset_suffix(reset: &Option<DateTime<Utc>>) -> String {
    match reset {
        Some(at) => format!(
            " (resets at {})",
            at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
        ),
        None => String::new(),
    }
}
