//! Recursive mirroring of repository contents onto the local filesystem.
//!
//! Files of one directory level are downloaded in fixed-size batches: every
//! download of a batch is in flight at once and the whole batch is awaited
//! before the next one starts. Subdirectories are visited one after another,
//! so at most `concurrency` downloads are ever in flight.
//!
//! A failing download does not cancel the rest of its batch; the batch is
//! drained, then the first error in listing order is returned.

use std::path::Path;

use futures::future::{BoxFuture, join_all};

use super::client::{ContentSource, EntryKind, GitHubClient, Listing, RemoteEntry};
use super::error::FetchError;
use crate::constants::DEFAULT_CONCURRENCY;

/// Mirrors remote paths from a [`ContentSource`].
#[derive(Debug, Clone)]
pub struct ContentFetcher<S> {
    source: S,
    concurrency: usize,
}

impl<S: ContentSource> ContentFetcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Override the batch size. Zero is treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Reproduce `remote_path` of `owner/repo` at `destination`.
    ///
    /// A directory is mirrored into `destination`; a single file is written to
    /// `destination` itself.
    pub async fn download(
        &self,
        owner: &str,
        repo: &str,
        remote_path: &str,
        destination: &Path,
    ) -> Result<(), FetchError> {
        check_source(owner, repo)?;
        self.mirror(owner, repo, remote_path, destination).await
    }

    /// Fetch the bytes of a single remote file.
    pub async fn read_file(
        &self,
        owner: &str,
        repo: &str,
        remote_path: &str,
    ) -> Result<Vec<u8>, FetchError> {
        check_source(owner, repo)?;
        match self.source.list(owner, repo, remote_path).await? {
            Listing::File(entry) => {
                let url = download_url(&entry)?;
                self.source.download(url).await
            }
            Listing::Directory(_) => Err(FetchError::NotAFile {
                path: remote_path.to_string(),
            }),
        }
    }

    fn mirror<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        remote_path: &'a str,
        destination: &'a Path,
    ) -> BoxFuture<'a, Result<(), FetchError>> {
        Box::pin(async move {
            let listing = self.source.list(owner, repo, remote_path).await?;
            // An unanswerable existence check counts as pre-existing.
            let created = matches!(tokio::fs::try_exists(destination).await, Ok(false));

            let result = match listing {
                Listing::Directory(entries) => {
                    self.mirror_directory(owner, repo, entries, destination).await
                }
                Listing::File(entry) => self.write_single(&entry, destination).await,
            };

            if result.is_err() && created {
                remove_best_effort(destination).await;
            }
            result
        })
    }

    async fn mirror_directory(
        &self,
        owner: &str,
        repo: &str,
        entries: Vec<RemoteEntry>,
        destination: &Path,
    ) -> Result<(), FetchError> {
        tokio::fs::create_dir_all(destination)
            .await
            .map_err(FetchError::io("create directory", destination))?;

        let mut files = Vec::new();
        let mut dirs = Vec::new();
        for entry in entries {
            check_entry_name(&entry)?;
            match entry.kind {
                EntryKind::File => match entry.download_url {
                    Some(url) => files.push((url, destination.join(&entry.name))),
                    None => {
                        tracing::debug!(path = %entry.path, "skipping file without download url")
                    }
                },
                EntryKind::Dir => dirs.push(entry),
                EntryKind::Other => {
                    tracing::debug!(path = %entry.path, "skipping unsupported entry")
                }
            }
        }

        for (index, batch) in files.chunks(self.concurrency).enumerate() {
            tracing::debug!(
                dir = %destination.display(),
                batch = index + 1,
                size = batch.len(),
                "downloading batch"
            );
            let downloads = batch
                .iter()
                .map(|(url, target)| self.download_file(url, target));
            for result in join_all(downloads).await {
                result?;
            }
        }

        for dir in dirs {
            self.mirror(owner, repo, &dir.path, &destination.join(&dir.name))
                .await?;
        }

        Ok(())
    }

    async fn write_single(&self, entry: &RemoteEntry, destination: &Path) -> Result<(), FetchError> {
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(FetchError::io("create directory", parent))?;
        }
        let url = download_url(entry)?;
        self.download_file(url, destination).await
    }

    async fn download_file(&self, url: &str, target: &Path) -> Result<(), FetchError> {
        let bytes = self.source.download(url).await?;
        tokio::fs::write(target, bytes)
            .await
            .map_err(FetchError::io("write file", target))
    }
}

impl ContentFetcher<GitHubClient> {
    /// Fetcher over api.github.com, authenticated if a token is set.
    pub fn from_env() -> Result<Self, FetchError> {
        Ok(Self::new(GitHubClient::from_env()?))
    }
}

/// Mirror `remote_path` of `owner/repo` to `destination` using GitHub.
pub async fn download_from_github(
    owner: &str,
    repo: &str,
    remote_path: &str,
    destination: &Path,
) -> Result<(), FetchError> {
    ContentFetcher::from_env()?
        .download(owner, repo, remote_path, destination)
        .await
}

fn check_source(owner: &str, repo: &str) -> Result<(), FetchError> {
    if owner.trim().is_empty() || repo.trim().is_empty() {
        return Err(FetchError::InvalidSource(format!("{owner}/{repo}")));
    }
    Ok(())
}

// Listing names become path segments; refuse anything that could escape.
fn check_entry_name(entry: &RemoteEntry) -> Result<(), FetchError> {
    let name = entry.name.as_str();
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(FetchError::Decode {
            url: entry.path.clone(),
            reason: format!("unsafe entry name '{name}'"),
        });
    }
    Ok(())
}

fn download_url(entry: &RemoteEntry) -> Result<&str, FetchError> {
    match (entry.kind, entry.download_url.as_deref()) {
        (EntryKind::File, Some(url)) => Ok(url),
        _ => Err(FetchError::Decode {
            url: entry.path.clone(),
            reason: "entry has no downloadable content".to_string(),
        }),
    }
}

async fn remove_best_effort(path: &Path) {
    let result = match tokio::fs::symlink_metadata(path).await {
        Ok(metadata) if metadata.is_dir() => tokio::fs::remove_dir_all(path).await,
        Ok(_) => tokio::fs::remove_file(path).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => tracing::debug!(path = %path.display(), "removed partial download"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::debug!(path = %path.display(), error = %e, "cleanup failed"),
    }
}
