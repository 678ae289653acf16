//! GitHub contents API client.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;

use super::error::FetchError;
use crate::constants::{GITHUB_API_BASE, TOKEN_ENV_VARS, USER_AGENT};

/// Kind of a node in a contents listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    /// symlink, submodule
    #[serde(other)]
    Other,
}

/// One node returned by the contents API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl RemoteEntry {
    pub fn file(name: &str, path: &str, download_url: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            kind: EntryKind::File,
            download_url: Some(download_url.to_string()),
        }
    }

    pub fn dir(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            kind: EntryKind::Dir,
            download_url: None,
        }
    }
}

/// Response of a contents request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    File(RemoteEntry),
    Directory(Vec<RemoteEntry>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListingBody {
    Directory(Vec<RemoteEntry>),
    File(RemoteEntry),
}

impl From<ListingBody> for Listing {
    fn from(body: ListingBody) -> Self {
        match body {
            ListingBody::Directory(entries) => Listing::Directory(entries),
            ListingBody::File(entry) => Listing::File(entry),
        }
    }
}

/// Where remote content comes from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// List `path` in `owner/repo`; an empty path is the repository root.
    async fn list(&self, owner: &str, repo: &str, path: &str) -> Result<Listing, FetchError>;

    /// Fetch the raw bytes behind a `download_url`.
    async fn download(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Map a failed response to a [`FetchError`].
///
/// `remaining` and `reset` are the raw `X-RateLimit-Remaining` and
/// `X-RateLimit-Reset` header values.
pub fn classify_failure(
    status: u16,
    remaining: Option<&str>,
    reset: Option<&str>,
    path: &str,
    url: &str,
) -> FetchError {
    match status {
        404 => FetchError::NotFound {
            path: path.to_string(),
            url: url.to_string(),
        },
        403 if remaining.map(str::trim) == Some("0") => FetchError::RateLimited {
            reset: reset.and_then(parse_reset),
        },
        _ => FetchError::Api {
            status,
            url: url.to_string(),
        },
    }
}

fn parse_reset(raw: &str) -> Option<DateTime<Utc>> {
    let secs = raw.trim().parse::<i64>().ok()?;
    Utc.timestamp_opt(secs, 0).single()
}

/// Read the first non-empty token from the environment.
pub fn token_from_env() -> Option<String> {
    TOKEN_ENV_VARS.iter().find_map(|var| {
        std::env::var(var)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

/// [`ContentSource`] backed by api.github.com.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    has_token: bool,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        let has_token = token.is_some();
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                FetchError::Decode {
                    url: GITHUB_API_BASE.to_string(),
                    reason: format!("token is not a valid header value: {e}"),
                }
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|source| FetchError::Http {
                url: GITHUB_API_BASE.to_string(),
                source,
            })?;

        Ok(Self {
            http,
            api_base: GITHUB_API_BASE.to_string(),
            has_token,
        })
    }

    /// Build a client, picking up `GITHUB_TOKEN`/`GH_TOKEN` if set.
    pub fn from_env() -> Result<Self, FetchError> {
        Self::new(token_from_env())
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn has_token(&self) -> bool {
        self.has_token
    }

    pub fn contents_url(&self, owner: &str, repo: &str, path: &str) -> String {
        let path = path.trim_matches('/');
        if path.is_empty() {
            format!("{}/{}/{}/contents", self.api_base, owner, repo)
        } else {
            format!("{}/{}/{}/contents/{}", self.api_base, owner, repo, path)
        }
    }

    async fn get(&self, url: &str, path: &str) -> Result<reqwest::Response, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        if response.status().is_success() {
            return Ok(response);
        }

        let headers = response.headers();
        let remaining = headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok());
        let reset = headers
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok());
        Err(classify_failure(
            response.status().as_u16(),
            remaining,
            reset,
            path,
            url,
        ))
    }
}

#[async_trait]
impl ContentSource for GitHubClient {
    async fn list(&self, owner: &str, repo: &str, path: &str) -> Result<Listing, FetchError> {
        let url = self.contents_url(owner, repo, path);
        tracing::debug!(%url, "listing remote contents");

        let response = self.get(&url, path).await?;
        let body: ListingBody = response.json().await.map_err(|e| FetchError::Decode {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        Ok(body.into())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.get(url, url).await?;
        let bytes = response.bytes().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }
}
