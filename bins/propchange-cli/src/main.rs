// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `propchange`: operator CLI for the property-change tracker.
//!
//! Runs the `createPropertyChangeState` repair task and the accept operation
//! against a JSON content dump. Logs go to stderr (`RUST_LOG` filters them);
//! command results go to stdout.

// The CLI is expected to print to stdout.
#![allow(clippy::print_stdout)]

mod content_file;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use propchange_config_fs::FsConfigStore;
use propchange_core::config::ConfigService;
use propchange_core::prefs::RepairPrefs;
use propchange_core::wire::AcceptRequest;
use propchange_repo::plugin::REPAIR_COMMAND;
use propchange_repo::{AcceptService, Backfill, PropertyChangesRepair, RepairOptions, SUB_COMMAND};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::content_file::FileContentStore;

#[derive(Parser, Debug)]
#[command(author, version, about = "Property-change tracker operator tools")]
struct Cli {
    /// Directory holding saved preferences (defaults to the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run integrity checks related to Neos features
    #[command(long_about = PropertyChangesRepair::description(REPAIR_COMMAND))]
    Repair(RepairArgs),
    /// Accept the current value of one property
    Accept(AcceptArgs),
    /// Save default options for `repair`
    Prefs(PrefsArgs),
}

#[derive(Args, Debug)]
struct RepairArgs {
    /// JSON content dump to repair
    #[arg(long)]
    content: PathBuf,
    /// Only check nodes of this type and its concrete sub types
    #[arg(long)]
    node_type: Option<String>,
    /// Workspace to check (defaults to the saved preference, then `live`)
    #[arg(long)]
    workspace: Option<String>,
    /// Count the nodes that would be updated without writing
    #[arg(long)]
    dry_run: bool,
    /// Write changes even when dry runs are the saved default
    #[arg(long, conflicts_with = "dry_run")]
    no_dry_run: bool,
    /// Comma-separated task names to skip
    #[arg(long)]
    skip: Option<String>,
    /// Comma-separated task names to run exclusively
    #[arg(long)]
    only: Option<String>,
}

#[derive(Args, Debug)]
struct AcceptArgs {
    /// JSON content dump holding the node
    #[arg(long)]
    content: PathBuf,
    /// Context path of the node
    #[arg(long)]
    node: String,
    /// Property to accept
    #[arg(long)]
    property: String,
}

#[derive(Args, Debug)]
struct PrefsArgs {
    /// Default workspace
    #[arg(long)]
    workspace: Option<String>,
    /// Make dry runs the default
    #[arg(long)]
    dry_run: bool,
    /// Do not request cleanup by default
    #[arg(long)]
    no_cleanup: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Repair(args) => repair(args, open_config(cli.config_dir.as_deref()).as_ref()),
        Command::Accept(args) => accept(&args),
        Command::Prefs(args) => save_prefs(args, cli.config_dir.as_deref()),
    }
}

/// Config is best-effort: an unusable config dir falls back to defaults.
fn open_config(dir: Option<&Path>) -> Option<ConfigService<FsConfigStore>> {
    let store = match dir {
        Some(dir) => FsConfigStore::with_base(dir),
        None => FsConfigStore::new(),
    };
    store
        .map(ConfigService::new)
        .map_err(|err| warn!(%err, "config store unavailable; using defaults"))
        .ok()
}

fn repair(args: RepairArgs, config: Option<&ConfigService<FsConfigStore>>) -> Result<()> {
    let prefs: RepairPrefs = config
        .map(|c| c.load_or_default(RepairPrefs::KEY))
        .unwrap_or_default();
    let options = RepairOptions {
        node_type: args.node_type,
        workspace: args.workspace.unwrap_or(prefs.workspace),
        dry_run: !args.no_dry_run && (args.dry_run || prefs.dry_run),
        cleanup: prefs.cleanup,
        skip: args.skip,
        only: args.only,
    };

    let content = FileContentStore::open(&args.content)
        .with_context(|| format!("open content dump {}", args.content.display()))?;
    let backfill = Backfill::new(content.schema(), &content, &content);
    let report = PropertyChangesRepair::new(backfill).invoke(REPAIR_COMMAND, &options)?;

    match report {
        Some(report) if options.dry_run => println!(
            "{SUB_COMMAND}: {} nodes would be updated, {} skipped (dry run)",
            report.updated, report.skipped
        ),
        Some(report) => println!(
            "{SUB_COMMAND}: {} nodes updated, {} skipped",
            report.updated, report.skipped
        ),
        None => println!("{SUB_COMMAND}: not selected"),
    }
    Ok(())
}

fn accept(args: &AcceptArgs) -> Result<()> {
    let content = FileContentStore::open(&args.content)
        .with_context(|| format!("open content dump {}", args.content.display()))?;
    let request = AcceptRequest {
        node: args.node.clone(),
        property_name: args.property.clone(),
    };
    let response = AcceptService::new(&content, &content)
        .handle(&request)
        .with_context(|| format!("accept {} on {}", args.property, args.node))?;
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

fn save_prefs(args: PrefsArgs, dir: Option<&Path>) -> Result<()> {
    let store = match dir {
        Some(dir) => FsConfigStore::with_base(dir),
        None => FsConfigStore::new(),
    }
    .context("open config store")?;
    let defaults = RepairPrefs::default();
    let prefs = RepairPrefs {
        workspace: args.workspace.unwrap_or(defaults.workspace),
        dry_run: args.dry_run,
        cleanup: !args.no_cleanup,
    };
    ConfigService::new(store)
        .save(RepairPrefs::KEY, &prefs)
        .context("save repair prefs")?;
    println!("{}", serde_json::to_string_pretty(&prefs)?);
    Ok(())
}
