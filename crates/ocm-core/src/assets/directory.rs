//! Directory-backed assets (skills, agents, commands).

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;

use super::{AssetStore, InstallOutcome, InstalledAsset};
use crate::github::{ContentFetcher, ContentSource};
use crate::registry::AssetRegistry;
use crate::skills::validate_skill_dir;
use crate::types::AssetKind;
use crate::validation::validate_asset_name;

const IGNORED_ENTRIES: [&str; 1] = [".gitkeep"];

#[derive(Debug)]
pub struct DirectoryAssetStore<S> {
    kind: AssetKind,
    root: PathBuf,
    registry: AssetRegistry,
    fetcher: ContentFetcher<S>,
}

impl<S> DirectoryAssetStore<S> {
    pub fn new(
        kind: AssetKind,
        root: PathBuf,
        registry: AssetRegistry,
        fetcher: ContentFetcher<S>,
    ) -> Self {
        Self {
            kind,
            root,
            registry,
            fetcher,
        }
    }

    /// Directory holding every installed asset of this kind.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn target_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

#[async_trait]
impl<S: ContentSource> AssetStore for DirectoryAssetStore<S> {
    fn kind(&self) -> AssetKind {
        self.kind
    }

    async fn install(&self, name: &str) -> anyhow::Result<InstallOutcome> {
        validate_asset_name(name)?;

        let source = self.registry.resolve(self.kind, name);
        let target = self.target_dir(name);
        tracing::debug!(
            kind = %self.kind,
            name,
            repo = %source.repo_slug(),
            path = %source.path,
            "installing asset"
        );

        self.fetcher
            .download(&source.owner, &source.repo, &source.path, &target)
            .await
            .with_context(|| format!("Failed to install {} '{}'", self.kind, name))?;

        let mut warnings = Vec::new();
        if self.kind == AssetKind::Skill && target.is_dir() {
            if let Err(e) = validate_skill_dir(&target) {
                tracing::warn!(name, error = %e, "installed skill failed validation");
                warnings.push(format!("{e:#}"));
            }
        }

        tracing::info!(kind = %self.kind, name, dir = %target.display(), "installed asset");
        Ok(InstallOutcome {
            name: name.to_string(),
            location: target,
            source,
            warnings,
        })
    }

    fn list(&self) -> anyhow::Result<Vec<InstalledAsset>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {}", self.root.display()));
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry =
                entry.with_context(|| format!("Failed to read {}", self.root.display()))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !IGNORED_ENTRIES.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names.sort();

        Ok(names
            .into_iter()
            .map(|name| InstalledAsset { name, server: None })
            .collect())
    }

    fn remove(&self, name: &str) -> anyhow::Result<bool> {
        validate_asset_name(name)?;

        let target = self.target_dir(name);
        let metadata = match std::fs::symlink_metadata(&target) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to inspect {}", target.display()));
            }
        };

        if metadata.is_dir() {
            std::fs::remove_dir_all(&target)
        } else {
            std::fs::remove_file(&target)
        }
        .with_context(|| format!("Failed to remove {}", target.display()))?;

        tracing::info!(kind = %self.kind, name, "removed asset");
        Ok(true)
    }
}
