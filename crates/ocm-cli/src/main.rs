//! OCM - OpenCode Manager
//!
//! Usage:
//!   ocm skill install <name>      # Mirror a skill from GitHub
//!   ocm mcp add <name> --url ...  # Add an MCP server to opencode.json
//!   ocm -g agents list            # Operate on ~/.config/opencode
//!   ocm paths                     # Show resolved locations

mod interactive;

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ocm_core::assets::{AssetStore, InstalledAsset};
use ocm_core::config::{OAuthSetting, ServerEntry};
use ocm_core::context::OcmContext;
use ocm_core::paths::OcmPaths;
use ocm_core::skills::validate_skill_dir;
use ocm_core::types::{AssetKind, Scope};

use crate::interactive::Prompter;

#[derive(Parser)]
#[command(name = "ocm")]
#[command(about = "OpenCode Manager - install skills, agents, commands and MCP servers", long_about = None)]
#[command(version)]
struct Cli {
    /// Scope to operate on (local or global)
    #[arg(long, global = true, value_parser = parse_scope)]
    scope: Option<Scope>,

    /// Operate on the global scope (alias for --scope global)
    #[arg(short = 'g', long, global = true, conflicts_with = "scope")]
    global: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage skills
    Skill {
        #[command(subcommand)]
        action: SkillAction,
    },

    /// Manage agents
    Agents {
        #[command(subcommand)]
        action: AssetAction,
    },

    /// Manage commands
    Command {
        #[command(subcommand)]
        action: AssetAction,
    },

    /// Manage MCP servers in opencode.json
    Mcp {
        #[command(subcommand)]
        action: McpAction,
    },

    /// Show where assets and config live
    Paths,
}

#[derive(Subcommand)]
enum AssetAction {
    /// Install from GitHub
    Install {
        /// Asset name; prompted for when omitted on a terminal
        name: Option<String>,
    },

    /// List installed assets
    #[command(alias = "ls")]
    List,

    /// Remove one or more assets
    #[command(alias = "rm")]
    Remove {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Enable an asset (MCP only)
    Enable { name: String },

    /// Disable an asset (MCP only)
    Disable { name: String },
}

#[derive(Subcommand)]
enum SkillAction {
    #[command(flatten)]
    Asset(AssetAction),

    /// Check a skill directory's SKILL.md
    Validate { dir: PathBuf },
}

#[derive(Subcommand)]
enum McpAction {
    #[command(flatten)]
    Asset(AssetAction),

    /// Add a server definition built from flags
    Add(AddArgs),
}

#[derive(Args)]
struct AddArgs {
    /// Server name (key under "mcp")
    name: String,

    /// Remote server URL
    #[arg(long)]
    url: Option<String>,

    /// HTTP header for remote servers (KEY=VALUE)
    #[arg(long = "header", value_name = "KEY=VALUE")]
    headers: Vec<String>,

    /// Environment variable for local servers (KEY=VALUE)
    #[arg(long, value_name = "KEY=VALUE")]
    env: Vec<String>,

    /// Startup timeout in milliseconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Write the entry with "enabled": false
    #[arg(long)]
    disabled: bool,

    /// Turn off OAuth discovery for remote servers
    #[arg(long)]
    no_oauth: bool,

    /// Local server command (after --)
    #[arg(last = true)]
    command: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let flag_scope = scope_from_flags(cli.scope, cli.global);

    let ok = match cli.command {
        Commands::Paths => run_paths(flag_scope)?,
        Commands::Skill {
            action: SkillAction::Validate { dir },
        } => run_validate(&dir),
        Commands::Skill {
            action: SkillAction::Asset(action),
        } => run_asset(AssetKind::Skill, action, flag_scope)?,
        Commands::Agents { action } => run_asset(AssetKind::Agents, action, flag_scope)?,
        Commands::Command { action } => run_asset(AssetKind::Command, action, flag_scope)?,
        Commands::Mcp {
            action: McpAction::Asset(action),
        } => run_asset(AssetKind::Mcp, action, flag_scope)?,
        Commands::Mcp {
            action: McpAction::Add(args),
        } => run_mcp_add(args, flag_scope)?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn parse_scope(s: &str) -> Result<Scope, String> {
    Scope::try_from(s).map_err(|e| e.to_string())
}

fn scope_from_flags(scope: Option<Scope>, global: bool) -> Option<Scope> {
    if global { Some(Scope::Global) } else { scope }
}

/// Flag value, else an interactive choice, else local.
fn resolve_scope(flag_scope: Option<Scope>) -> Result<Scope> {
    if let Some(scope) = flag_scope {
        return Ok(scope);
    }
    if console::user_attended() {
        return Prompter::default().prompt_scope();
    }
    Ok(Scope::Local)
}

fn context_for(flag_scope: Option<Scope>) -> Result<OcmContext> {
    let scope = resolve_scope(flag_scope)?;
    tracing::debug!(%scope, "resolved scope");
    OcmContext::resolve(scope)
}

fn run_asset(kind: AssetKind, action: AssetAction, flag_scope: Option<Scope>) -> Result<bool> {
    let ctx = context_for(flag_scope)?;
    let store = ctx.store(kind)?;

    match action {
        AssetAction::Install { name } => {
            let name = match name {
                Some(name) => name,
                None if console::user_attended() => Prompter::default().prompt_name(kind)?,
                None => anyhow::bail!("Missing required argument: name"),
            };

            println!(
                "{} {}...",
                style(format!("Installing {}:", kind)).blue(),
                style(&name).bold()
            );

            let runtime = tokio::runtime::Runtime::new()
                .context("Failed to create tokio runtime for install")?;
            match runtime.block_on(store.install(&name)) {
                Ok(outcome) => {
                    println!(
                        "{} Installed {} '{}' to {}",
                        style("✓").green(),
                        kind,
                        outcome.name,
                        outcome.location.display()
                    );
                    for warning in &outcome.warnings {
                        println!("  {} {}", style("⚠").yellow(), warning);
                    }
                    Ok(true)
                }
                Err(e) => {
                    eprintln!("{} {:#}", style("Error:").red(), e);
                    Ok(false)
                }
            }
        }
        AssetAction::List => {
            if let Some(mcp) = store.as_mcp()
                && !mcp.has_servers()
            {
                println!(
                    "{}",
                    style(format!(
                        "No MCP servers configured in {}.",
                        mcp.config().config_path().display()
                    ))
                    .yellow()
                );
                return Ok(true);
            }
            let assets = store.list()?;
            print_list(kind, ctx.scope(), &assets);
            Ok(true)
        }
        AssetAction::Remove { names } => {
            let mut ok = true;
            for name in &names {
                match store.remove(name) {
                    Ok(true) => println!(
                        "{} Removed {}: {}",
                        style("✓").green(),
                        kind,
                        style(name).bold()
                    ),
                    Ok(false) => println!(
                        "{} {} '{}' is not installed",
                        style("•").dim(),
                        kind,
                        name
                    ),
                    Err(e) => {
                        ok = false;
                        eprintln!("{} Failed to remove {}: {:#}", style("✗").red(), name, e);
                    }
                }
            }
            Ok(ok)
        }
        AssetAction::Enable { name } => toggle(&store, kind, &name, true),
        AssetAction::Disable { name } => toggle(&store, kind, &name, false),
    }
}

fn toggle<S>(
    store: &ocm_core::assets::AnyAssetStore<S>,
    kind: AssetKind,
    name: &str,
    enabled: bool,
) -> Result<bool> {
    let verb = if enabled { "Enable" } else { "Disable" };
    let Some(mcp) = store.as_mcp() else {
        println!(
            "{}",
            style(format!(
                "{verb} is only supported for MCP servers, not {kind}."
            ))
            .yellow()
        );
        return Ok(true);
    };

    let result = if enabled {
        mcp.enable(name)
    } else {
        mcp.disable(name)
    };
    match result {
        Ok(()) => {
            let state = if enabled {
                style("enabled").green()
            } else {
                style("disabled").yellow()
            };
            println!("{} MCP server '{}' {}", style("✓").green(), name, state);
            Ok(true)
        }
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red(), e);
            Ok(false)
        }
    }
}

fn print_list(kind: AssetKind, scope: Scope, assets: &[InstalledAsset]) {
    if assets.is_empty() {
        println!(
            "{}",
            style(format!("No {} installed ({} scope).", kind, scope)).yellow()
        );
        return;
    }

    println!(
        "{}",
        style(format!("Installed {} ({} scope):", kind, scope))
            .cyan()
            .bold()
    );
    for asset in assets {
        match &asset.server {
            Some(server) => {
                let state = if server.enabled {
                    style("enabled").green()
                } else {
                    style("disabled").dim()
                };
                println!(
                    "{}{} ({}) {}",
                    style(" - ").dim(),
                    asset.name,
                    server.kind,
                    state
                );
            }
            None => println!("{}{}", style(" - ").dim(), asset.name),
        }
    }
}

fn run_mcp_add(args: AddArgs, flag_scope: Option<Scope>) -> Result<bool> {
    let entry = build_server_entry(&args)?;
    let ctx = context_for(flag_scope)?;
    let store = ctx.store(AssetKind::Mcp)?;
    let mcp = store
        .as_mcp()
        .context("MCP store is not config backed")?;

    match mcp.add(&args.name, &entry) {
        Ok(()) => {
            println!(
                "{} Added {} MCP server '{}' to {}",
                style("✓").green(),
                entry.kind(),
                args.name,
                ctx.paths().config_path().display()
            );
            Ok(true)
        }
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red(), e);
            Ok(false)
        }
    }
}

fn build_server_entry(args: &AddArgs) -> Result<ServerEntry> {
    let mut entry = match (&args.url, args.command.is_empty()) {
        (Some(_), false) => anyhow::bail!("Use either --url or a command after --, not both"),
        (None, true) => anyhow::bail!("Provide --url for a remote server or a command after --"),
        (Some(url), true) => {
            if !args.env.is_empty() {
                anyhow::bail!("--env applies to local servers only");
            }
            let mut entry = ServerEntry::remote(url.clone());
            if let ServerEntry::Remote(server) = &mut entry {
                if !args.headers.is_empty() {
                    server.headers = Some(parse_pairs(&args.headers, "--header")?);
                }
                if args.no_oauth {
                    server.oauth = Some(OAuthSetting::Flag(false));
                }
                server.timeout = args.timeout;
            }
            entry
        }
        (None, false) => {
            if !args.headers.is_empty() || args.no_oauth {
                anyhow::bail!("--header and --no-oauth apply to remote servers only");
            }
            let mut entry = ServerEntry::local(args.command.clone());
            if let ServerEntry::Local(server) = &mut entry {
                if !args.env.is_empty() {
                    server.environment = Some(parse_pairs(&args.env, "--env")?);
                }
                server.timeout = args.timeout;
            }
            entry
        }
    };

    if args.disabled {
        entry.set_enabled(false);
    }
    Ok(entry)
}

fn parse_pairs(pairs: &[String], flag: &str) -> Result<BTreeMap<String, String>> {
    pairs
        .iter()
        .map(|pair| {
            let (key, value) = pair
                .split_once('=')
                .with_context(|| format!("Invalid {flag} '{pair}', expected KEY=VALUE"))?;
            let key = key.trim();
            if key.is_empty() {
                anyhow::bail!("Invalid {flag} '{pair}', key is empty");
            }
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}

fn run_validate(dir: &std::path::Path) -> bool {
    match validate_skill_dir(dir) {
        Ok(manifest) => {
            println!(
                "{} {} is a valid skill: {}",
                style("✓").green(),
                style(&manifest.name).bold(),
                manifest.description
            );
            true
        }
        Err(e) => {
            eprintln!("{} {}: {:#}", style("✗").red(), dir.display(), e);
            false
        }
    }
}

fn run_paths(flag_scope: Option<Scope>) -> Result<bool> {
    let scopes = match flag_scope {
        Some(scope) => vec![scope],
        None => vec![Scope::Local, Scope::Global],
    };

    for scope in scopes {
        let paths = OcmPaths::resolve(scope)?;
        println!("{}", style(format!("{} scope", scope)).cyan().bold());
        println!("  config: {}", paths.config_path().display());
        for kind in AssetKind::ALL
            .into_iter()
            .filter(|kind| kind.is_directory_backed())
        {
            println!("  {:<7} {}", format!("{kind}:"), paths.asset_dir(kind).display());
        }
    }
    Ok(true)
}
