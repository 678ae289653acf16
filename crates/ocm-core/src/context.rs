//! Per-invocation context.

use crate::assets::{AnyAssetStore, DirectoryAssetStore, McpAssetStore};
use crate::config::ConfigStore;
use crate::constants::DEFAULT_CONCURRENCY;
use crate::github::{ContentFetcher, ContentSource, FetchError, GitHubClient};
use crate::paths::OcmPaths;
use crate::registry::AssetRegistry;
use crate::types::{AssetKind, Scope};

/// Everything an operation needs, resolved once from scope and environment.
///
/// Frontends build this once and hand out stores from it.
#[derive(Debug, Clone)]
pub struct OcmContext {
    paths: OcmPaths,
    registry: AssetRegistry,
    concurrency: usize,
}

impl OcmContext {
    pub fn new(paths: OcmPaths) -> Self {
        Self {
            paths,
            registry: AssetRegistry::builtin(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Context for `scope` rooted at the current directory and home.
    pub fn resolve(scope: Scope) -> anyhow::Result<Self> {
        Ok(Self::new(OcmPaths::resolve(scope)?))
    }

    pub fn with_registry(mut self, registry: AssetRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn paths(&self) -> &OcmPaths {
        &self.paths
    }

    pub fn scope(&self) -> Scope {
        self.paths.scope()
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn config_store(&self) -> ConfigStore {
        ConfigStore::from_paths(&self.paths)
    }

    /// Store for `kind` over an arbitrary content source.
    pub fn store_with_source<S: ContentSource>(
        &self,
        kind: AssetKind,
        source: S,
    ) -> AnyAssetStore<S> {
        let fetcher = ContentFetcher::new(source).with_concurrency(self.concurrency);
        match kind {
            AssetKind::Mcp => AnyAssetStore::Mcp(McpAssetStore::new(
                self.config_store(),
                self.registry.clone(),
                fetcher,
            )),
            _ => AnyAssetStore::Directory(DirectoryAssetStore::new(
                kind,
                self.paths.asset_dir(kind),
                self.registry.clone(),
                fetcher,
            )),
        }
    }

    /// Store for `kind` backed by GitHub; picks up the token from the environment.
    pub fn store(&self, kind: AssetKind) -> Result<AnyAssetStore<GitHubClient>, FetchError> {
        Ok(self.store_with_source(kind, GitHubClient::from_env()?))
    }
}
