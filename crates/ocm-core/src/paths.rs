//! Path resolution for local and global scope.

use std::path::{Path, PathBuf};

use crate::types::{AssetKind, Scope};

/// Resolved OpenCode locations for one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcmPaths {
    scope: Scope,
    base_dir: PathBuf,
    config_path: PathBuf,
}

impl OcmPaths {
    /// Resolve paths from the current directory and the user's home.
    pub fn resolve(scope: Scope) -> anyhow::Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        let project_root = std::env::current_dir()?;
        Ok(Self::for_scope(scope, &project_root, &home))
    }

    /// Compute paths without touching the environment.
    pub fn for_scope(scope: Scope, project_root: &Path, home: &Path) -> Self {
        match scope {
            Scope::Local => Self {
                scope,
                base_dir: project_root.join(".opencode"),
                config_path: project_root.join("opencode.json"),
            },
            Scope::Global => {
                let base_dir = home.join(".config").join("opencode");
                let config_path = base_dir.join("opencode.json");
                Self {
                    scope,
                    base_dir,
                    config_path,
                }
            }
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// The `.opencode` (or `~/.config/opencode`) directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The `opencode.json` holding MCP servers.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Directory holding installed assets of `kind`.
    pub fn asset_dir(&self, kind: AssetKind) -> PathBuf {
        self.base_dir.join(kind.as_str())
    }
}
