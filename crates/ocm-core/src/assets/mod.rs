//! Install, list and remove for every asset kind
//!
//! Skills, agents and commands are directories mirrored from GitHub
//! ([`DirectoryAssetStore`]); MCP servers are entries in opencode.json
//! ([`McpAssetStore`]). [`AnyAssetStore`] picks one by [`AssetKind`].

pub mod directory;
pub mod mcp;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::github::ContentSource;
use crate::registry::AssetSource;
use crate::types::AssetKind;

pub use directory::DirectoryAssetStore;
pub use mcp::McpAssetStore;

/// Result of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub name: String,
    /// Install directory, or the config file for MCP servers.
    pub location: PathBuf,
    pub source: AssetSource,
    /// Non-fatal problems found after installing.
    pub warnings: Vec<String>,
}

/// One row of `list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledAsset {
    pub name: String,
    /// Present for MCP servers only.
    pub server: Option<ServerStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerStatus {
    /// `local`, `remote`, or whatever the entry declares.
    pub kind: String,
    pub enabled: bool,
}

#[async_trait]
pub trait AssetStore {
    fn kind(&self) -> AssetKind;

    async fn install(&self, name: &str) -> anyhow::Result<InstallOutcome>;

    fn list(&self) -> anyhow::Result<Vec<InstalledAsset>>;

    /// Returns whether anything was removed.
    fn remove(&self, name: &str) -> anyhow::Result<bool>;
}

/// Type-tag dispatch over the concrete stores.
#[derive(Debug)]
pub enum AnyAssetStore<S> {
    Directory(DirectoryAssetStore<S>),
    Mcp(McpAssetStore<S>),
}

impl<S> AnyAssetStore<S> {
    pub fn as_mcp(&self) -> Option<&McpAssetStore<S>> {
        match self {
            AnyAssetStore::Mcp(store) => Some(store),
            AnyAssetStore::Directory(_) => None,
        }
    }
}

#[async_trait]
impl<S: ContentSource> AssetStore for AnyAssetStore<S> {
    fn kind(&self) -> AssetKind {
        match self {
            AnyAssetStore::Directory(store) => store.kind(),
            AnyAssetStore::Mcp(store) => store.kind(),
        }
    }

    async fn install(&self, name: &str) -> anyhow::Result<InstallOutcome> {
        match self {
            AnyAssetStore::Directory(store) => store.install(name).await,
            AnyAssetStore::Mcp(store) => store.install(name).await,
        }
    }

    fn list(&self) -> anyhow::Result<Vec<InstalledAsset>> {
        match self {
            AnyAssetStore::Directory(store) => store.list(),
            AnyAssetStore::Mcp(store) => store.list(),
        }
    }

    fn remove(&self, name: &str) -> anyhow::Result<bool> {
        match self {
            AnyAssetStore::Directory(store) => store.remove(name),
            AnyAssetStore::Mcp(store) => store.remove(name),
        }
    }
}
