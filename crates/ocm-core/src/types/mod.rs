//! Shared core types used across paths, registry and asset stores.

use std::fmt;

/// Installation scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Project-level `.opencode` directory and `opencode.json`.
    Local,
    /// User-level `~/.config/opencode`.
    Global,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Local => "local",
            Scope::Global => "global",
        }
    }
}

impl TryFrom<&str> for Scope {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" | "project" => Ok(Scope::Local),
            "global" | "user" => Ok(Scope::Global),
            _ => anyhow::bail!("Invalid scope: '{}'. Valid values: local, global", value),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asset kinds managed by ocm.
///
/// The tag doubles as the local directory name and the remote folder name
/// under `assets/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Skill,
    Agents,
    Command,
    Mcp,
}

impl AssetKind {
    pub const ALL: [AssetKind; 4] = [
        AssetKind::Skill,
        AssetKind::Agents,
        AssetKind::Command,
        AssetKind::Mcp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Skill => "skill",
            AssetKind::Agents => "agents",
            AssetKind::Command => "command",
            AssetKind::Mcp => "mcp",
        }
    }

    /// Whether the asset lives in a directory (as opposed to a config entry).
    pub fn is_directory_backed(&self) -> bool {
        !matches!(self, AssetKind::Mcp)
    }
}

impl TryFrom<&str> for AssetKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "skill" | "skills" => Ok(AssetKind::Skill),
            "agent" | "agents" => Ok(AssetKind::Agents),
            "command" | "commands" => Ok(AssetKind::Command),
            "mcp" => Ok(AssetKind::Mcp),
            _ => anyhow::bail!(
                "Invalid asset kind: '{}'. Valid values: skill, agents, command, mcp",
                value
            ),
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
