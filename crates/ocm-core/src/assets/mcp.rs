//! Config-entry-backed assets (MCP servers in opencode.json).

use anyhow::Context;
use async_trait::async_trait;

use super::{AssetStore, InstallOutcome, InstalledAsset, ServerStatus};
use crate::config::schema::{is_enabled_value, kind_of_value};
use crate::config::{ConfigStore, ServerEntry};
use crate::github::{ContentFetcher, ContentSource};
use crate::registry::{AssetRegistry, AssetSource};
use crate::types::AssetKind;
use crate::validation::validate_asset_name;

#[derive(Debug)]
pub struct McpAssetStore<S> {
    config: ConfigStore,
    registry: AssetRegistry,
    fetcher: ContentFetcher<S>,
}

impl<S> McpAssetStore<S> {
    pub fn new(config: ConfigStore, registry: AssetRegistry, fetcher: ContentFetcher<S>) -> Self {
        Self {
            config,
            registry,
            fetcher,
        }
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Validate and store a server definition built locally.
    pub fn add(&self, name: &str, entry: &ServerEntry) -> anyhow::Result<()> {
        validate_asset_name(name)?;
        entry.validate(name)?;
        self.config.upsert_server(name, Some(entry))?;
        tracing::info!(name, kind = entry.kind(), "added MCP server");
        Ok(())
    }

    pub fn enable(&self, name: &str) -> anyhow::Result<()> {
        self.config.set_server_enabled(name, true)?;
        Ok(())
    }

    pub fn disable(&self, name: &str) -> anyhow::Result<()> {
        self.config.set_server_enabled(name, false)?;
        Ok(())
    }

    /// Whether the config declares any servers at all.
    pub fn has_servers(&self) -> bool {
        self.config.has_servers()
    }
}

#[async_trait]
impl<S: ContentSource> AssetStore for McpAssetStore<S> {
    fn kind(&self) -> AssetKind {
        AssetKind::Mcp
    }

    /// Fetch the JSON definition from the registry source and store it.
    async fn install(&self, name: &str) -> anyhow::Result<InstallOutcome> {
        validate_asset_name(name)?;

        let source: AssetSource = self.registry.resolve(AssetKind::Mcp, name);
        let bytes = self
            .fetcher
            .read_file(&source.owner, &source.repo, &source.path)
            .await
            .with_context(|| format!("Failed to fetch MCP definition '{}'", name))?;

        let value: serde_json::Value = serde_json::from_slice(&bytes)
            .with_context(|| format!("MCP definition at {} is not valid JSON", source.path))?;
        let entry = ServerEntry::from_value(value)
            .with_context(|| format!("MCP definition at {} is not a server entry", source.path))?;

        self.add(name, &entry)?;

        Ok(InstallOutcome {
            name: name.to_string(),
            location: self.config.config_path().to_path_buf(),
            source,
            warnings: Vec::new(),
        })
    }

    fn list(&self) -> anyhow::Result<Vec<InstalledAsset>> {
        let document = self.config.read();
        let Some(servers) = document.servers() else {
            return Ok(Vec::new());
        };

        Ok(servers
            .iter()
            .map(|(name, entry)| InstalledAsset {
                name: name.clone(),
                server: Some(ServerStatus {
                    kind: kind_of_value(entry).unwrap_or("unknown").to_string(),
                    enabled: is_enabled_value(entry),
                }),
            })
            .collect())
    }

    fn remove(&self, name: &str) -> anyhow::Result<bool> {
        let removed = self.config.remove_server(name)?;
        if removed {
            tracing::info!(name, "removed MCP server");
        }
        Ok(removed)
    }
}
