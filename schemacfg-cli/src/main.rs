//! schemacfg — plan and reconcile connector schema configuration.
//!
//! Usage:
//!   schemacfg show --upstream schemas.json
//!   schemacfg plan --upstream schemas.json --declaration declared.json
//!   schemacfg reconcile --connector conn_1 --declaration declared.json [--dry-run]
//!
//! `show` and `plan` work on files only. `reconcile` talks to the remote API.

use anyhow::Result;
use clap::{Parser, Subcommand};
use schemacfg_cli::{
    RunReport, load_declaration, plan_files, render_patch, run_online, show_file,
};
use schemacfg_sync::HttpClientConfig;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "schemacfg")]
#[command(about = "Plan and reconcile connector schema configuration")]
struct Args {
    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the state a read of a fetched schema config would persist
    Show {
        /// Path to a fetched schema config (bare or enveloped JSON)
        #[arg(short, long)]
        upstream: PathBuf,
    },

    /// Print the patch a declaration would send, without any network access
    Plan {
        /// Path to a fetched schema config (bare or enveloped JSON)
        #[arg(short, long)]
        upstream: PathBuf,

        /// Path to the local declaration
        #[arg(short, long)]
        declaration: PathBuf,
    },

    /// Reconcile a connector against the remote API
    Reconcile {
        /// Connector ID
        #[arg(short, long)]
        connector: String,

        /// Path to the local declaration
        #[arg(short, long)]
        declaration: PathBuf,

        /// Base URL of the remote API
        #[arg(long, default_value = "https://api.fivetran.com")]
        api_url: String,

        /// Per-request timeout in seconds
        #[arg(long, default_value = "60")]
        timeout_secs: u64,

        /// Only print the patch that would be sent
        #[arg(long)]
        dry_run: bool,
    },
}

fn init_logging(verbose: bool) {
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Show { upstream } => {
            let state = show_file(&upstream)?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Command::Plan {
            upstream,
            declaration,
        } => {
            let patch = plan_files(&upstream, &declaration)?;
            println!("{}", render_patch(&patch)?);
        }
        Command::Reconcile {
            connector,
            declaration,
            api_url,
            timeout_secs,
            dry_run,
        } => {
            let declared = load_declaration(&declaration)?;
            let config = HttpClientConfig {
                api_base_url: api_url,
                timeout_secs,
                ..Default::default()
            };
            info!("Reconciling connector {}", connector);
            match run_online(config, &connector, &declared, dry_run).await? {
                RunReport::Planned(patch) => println!("{}", render_patch(&patch)?),
                RunReport::Reconciled { patch, state } => {
                    if let Some(patch) = patch {
                        eprintln!("Applied patch:\n{}", render_patch(&patch)?);
                    }
                    println!("{}", serde_json::to_string_pretty(&state)?);
                }
            }
        }
    }

    Ok(())
}
