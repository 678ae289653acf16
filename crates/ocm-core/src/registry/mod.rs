//! Asset source lookup
//!
//! Most assets live in the default repository under `assets/<kind>/<name>`.
//! The built-in table lists assets that come from somewhere else.

use std::collections::HashMap;

use crate::constants::{ASSETS_ROOT, DEFAULT_REPO};
use crate::types::AssetKind;

/// Where an asset is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSource {
    pub owner: String,
    pub repo: String,
    pub path: String,
}

impl AssetSource {
    /// Build from an `owner/repo` slug and a path inside that repository.
    pub fn new(repo_slug: &str, path: &str) -> anyhow::Result<Self> {
        let (owner, repo) = parse_github_repo(repo_slug)?;
        Ok(Self {
            owner,
            repo,
            path: path.trim_matches('/').to_string(),
        })
    }

    pub fn repo_slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Static (kind, name) -> source table.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    entries: HashMap<(AssetKind, String), AssetSource>,
}

impl AssetRegistry {
    /// Registry with no overrides; every asset resolves to the default repo.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry preloaded with the known assets.
    pub fn builtin() -> Self {
        const BUILTIN: &[(AssetKind, &str, &str, &str)] = &[
            (AssetKind::Agents, "openagent", DEFAULT_REPO, "assets/agents/openagent"),
            (AssetKind::Command, "commit", DEFAULT_REPO, "assets/command/commit"),
            (
                AssetKind::Skill,
                "frontend-design",
                DEFAULT_REPO,
                "assets/skill/frontend-design",
            ),
        ];

        let mut registry = Self::empty();
        for (kind, name, repo, path) in BUILTIN {
            if let Ok(source) = AssetSource::new(repo, path) {
                registry.entries.insert((*kind, name.to_string()), source);
            }
        }
        registry
    }

    pub fn with_entry(
        mut self,
        kind: AssetKind,
        name: &str,
        repo_slug: &str,
        path: &str,
    ) -> anyhow::Result<Self> {
        let source = AssetSource::new(repo_slug, path)?;
        self.entries.insert((kind, name.to_string()), source);
        Ok(self)
    }

    pub fn lookup(&self, kind: AssetKind, name: &str) -> Option<&AssetSource> {
        self.entries.get(&(kind, name.to_string()))
    }

    /// Table entry if present, otherwise the default location.
    pub fn resolve(&self, kind: AssetKind, name: &str) -> AssetSource {
        self.lookup(kind, name)
            .cloned()
            .unwrap_or_else(|| default_source(kind, name))
    }
}

/// `withabdul/ocm` at `assets/<kind>/<name>` (`<name>.json` for MCP servers).
pub fn default_source(kind: AssetKind, name: &str) -> AssetSource {
    let (owner, repo) = DEFAULT_REPO.split_once('/').unwrap_or((DEFAULT_REPO, ""));
    let leaf = match kind {
        AssetKind::Mcp => format!("{name}.json"),
        _ => name.to_string(),
    };
    AssetSource {
        owner: owner.to_string(),
        repo: repo.to_string(),
        path: format!("{}/{}/{}", ASSETS_ROOT, kind.as_str(), leaf),
    }
}

/// Parse "owner/repo" into components.
fn parse_github_repo(slug: &str) -> anyhow::Result<(String, String)> {
    let parts: Vec<&str> = slug.trim().split('/').collect();
    match parts.as_slice() {
        [owner, repo] if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => anyhow::bail!("Invalid GitHub repo format: {} (expected owner/repo)", slug),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_source_for_directory_asset() {
        let source = default_source(AssetKind::Skill, "pdf");
        assert_eq!(source.repo_slug(), "withabdul/ocm");
        assert_eq!(source.path, "assets/skill/pdf");
    }

    #[test]
    fn default_source_for_mcp_is_json_file() {
        let source = default_source(AssetKind::Mcp, "context7");
        assert_eq!(source.path, "assets/mcp/context7.json");
    }

    #[test]
    fn builtin_contains_known_assets() {
        let registry = AssetRegistry::builtin();
        let source = registry.lookup(AssetKind::Agents, "openagent").unwrap();
        assert_eq!(source.path, "assets/agents/openagent");
        assert!(registry.lookup(AssetKind::Skill, "openagent").is_none());
    }

    #[test]
    fn override_wins_over_default() {
        let registry = AssetRegistry::empty()
            .with_entry(AssetKind::Skill, "pdf", "anthropics/skills", "/skills/pdf/")
            .unwrap();
        let source = registry.resolve(AssetKind::Skill, "pdf");
        assert_eq!(source.owner, "anthropics");
        assert_eq!(source.repo, "skills");
        assert_eq!(source.path, "skills/pdf");

        let fallback = registry.resolve(AssetKind::Skill, "docx");
        assert_eq!(fallback.path, "assets/skill/docx");
    }

    #[test]
    fn rejects_malformed_repo_slug() {
        assert!(AssetSource::new("invalid-format", "x").is_err());
        assert!(AssetSource::new("a/b/c", "x").is_err());
        assert!(AssetSource::new("/b", "x").is_err());
    }
}
