//! Fixed values shared by the fetcher, config store and CLI.

/// Value of the `$schema` key written to `opencode.json`.
pub const CONFIG_SCHEMA: &str = "https://opencode.ai/config.json";

/// Key holding the MCP server map inside `opencode.json`.
pub const MCP_KEY: &str = "mcp";

/// Key that must always be serialized first.
pub const SCHEMA_KEY: &str = "$schema";

/// Default `owner/repo` assets are installed from.
pub const DEFAULT_REPO: &str = "withabdul/ocm";

/// Folder inside the default repository that holds the assets.
pub const ASSETS_ROOT: &str = "assets";

pub const GITHUB_API_BASE: &str = "https://api.github.com/repos";

pub const USER_AGENT: &str = "OpenCode-Manager-OCM";

/// Environment variables checked, in order, for a GitHub token.
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Maximum number of concurrent file downloads per directory level.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Upper bound on asset name length.
pub const MAX_NAME_LENGTH: usize = 100;

/// Lower bound for MCP server `timeout` values, in milliseconds.
pub const MIN_TIMEOUT_MS: u64 = 1000;
