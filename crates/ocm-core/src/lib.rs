//! OCM Core Library
//!
//! Domain logic for managing OpenCode assets: skills, agents and commands
//! mirrored from GitHub, and MCP servers kept in opencode.json.

pub mod assets;
pub mod config;
pub mod constants;
pub mod context;
pub mod github;
pub mod paths;
pub mod registry;
pub mod skills;
pub mod types;
pub mod validation;

/// Re-exports of commonly used types
pub mod prelude {
    // Assets
    pub use crate::assets::{
        AnyAssetStore, AssetStore, DirectoryAssetStore, InstallOutcome, InstalledAsset,
        McpAssetStore, ServerStatus,
    };

    // Configuration
    pub use crate::config::{ConfigDocument, ConfigError, ConfigStore, ServerEntry};

    // GitHub
    pub use crate::github::{ContentFetcher, ContentSource, FetchError, GitHubClient};

    // Context
    pub use crate::context::OcmContext;
    pub use crate::paths::OcmPaths;
    pub use crate::registry::{AssetRegistry, AssetSource};
    pub use crate::types::{AssetKind, Scope};
    pub use crate::validation::{ValidationError, validate_asset_name};
}
