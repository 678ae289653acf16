//! In-memory content source for fetcher and store tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use ocm_core::github::{ContentSource, FetchError, Listing, RemoteEntry, classify_failure};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Listed(String),
    Started(String),
    Finished(String),
}

#[derive(Debug, Clone)]
struct Failure {
    status: u16,
    remaining: Option<String>,
    reset: Option<String>,
}

impl Failure {
    fn status(status: u16) -> Self {
        Self {
            status,
            remaining: None,
            reset: None,
        }
    }

    fn to_error(&self, path: &str) -> FetchError {
        classify_failure(
            self.status,
            self.remaining.as_deref(),
            self.reset.as_deref(),
            path,
            &format!("fake://{path}"),
        )
    }
}

#[derive(Debug, Default)]
pub struct FakeSource {
    listings: HashMap<String, Result<Listing, Failure>>,
    files: HashMap<String, Result<Vec<u8>, Failure>>,
    events: Mutex<Vec<Event>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(mut self, path: &str, entries: Vec<RemoteEntry>) -> Self {
        self.listings
            .insert(path.to_string(), Ok(Listing::Directory(entries)));
        self
    }

    pub fn with_file(mut self, path: &str, url: &str, body: &[u8]) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path);
        self.listings.insert(
            path.to_string(),
            Ok(Listing::File(RemoteEntry::file(name, path, url))),
        );
        self.files.insert(url.to_string(), Ok(body.to_vec()));
        self
    }

    pub fn with_content(mut self, url: &str, body: &[u8]) -> Self {
        self.files.insert(url.to_string(), Ok(body.to_vec()));
        self
    }

    pub fn with_listing_status(mut self, path: &str, status: u16) -> Self {
        self.listings
            .insert(path.to_string(), Err(Failure::status(status)));
        self
    }

    pub fn with_rate_limit(mut self, path: &str, reset: &str) -> Self {
        self.listings.insert(
            path.to_string(),
            Err(Failure {
                status: 403,
                remaining: Some("0".to_string()),
                reset: Some(reset.to_string()),
            }),
        );
        self
    }

    pub fn with_download_status(mut self, url: &str, status: u16) -> Self {
        self.files.insert(url.to_string(), Err(Failure::status(status)));
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn listed_paths(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Listed(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn finished_downloads(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, Event::Finished(_)))
            .count()
    }

    /// Sizes of runs of downloads started before any of them finished.
    pub fn batch_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::new();
        let mut current = 0;
        for event in self.events() {
            match event {
                Event::Started(_) => current += 1,
                Event::Finished(_) if current > 0 => {
                    sizes.push(current);
                    current = 0;
                }
                _ => {}
            }
        }
        if current > 0 {
            sizes.push(current);
        }
        sizes
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl ContentSource for FakeSource {
    async fn list(&self, _owner: &str, _repo: &str, path: &str) -> Result<Listing, FetchError> {
        self.record(Event::Listed(path.to_string()));
        match self.listings.get(path) {
            Some(Ok(listing)) => Ok(listing.clone()),
            Some(Err(failure)) => Err(failure.to_error(path)),
            None => Err(Failure::status(404).to_error(path)),
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.record(Event::Started(url.to_string()));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::task::yield_now().await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.record(Event::Finished(url.to_string()));

        match self.files.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(failure)) => Err(failure.to_error(url)),
            None => Err(Failure::status(404).to_error(url)),
        }
    }
}

/// `count` file entries named `fNN.txt` under `dir`, served by `source`.
pub fn numbered_files(
    source: FakeSource,
    dir: &str,
    count: usize,
) -> (FakeSource, Vec<RemoteEntry>) {
    let mut source = source;
    let mut entries = Vec::new();
    for i in 0..count {
        let name = format!("f{i:02}.txt");
        let path = format!("{dir}/{name}");
        let url = format!("https://raw.example.com/{path}");
        source = source.with_content(&url, format!("file {i}").as_bytes());
        entries.push(RemoteEntry::file(&name, &path, &url));
    }
    (source, entries)
}
