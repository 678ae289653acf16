//! GitHub content fetching
//!
//! Listings come from the contents API (`/repos/{owner}/{repo}/contents/{path}`),
//! file bodies from each entry's `download_url`.

pub mod client;
pub mod error;
pub mod fetcher;

pub use client::{
    ContentSource, EntryKind, GitHubClient, Listing, RemoteEntry, classify_failure, token_from_env,
};
pub use error::FetchError;
pub use fetcher::{ContentFetcher, download_from_github};
