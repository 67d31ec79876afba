// SPDX-License-Identifier: AGPL-3.0-or-later
//! boxwalk CLI
//!
//! Lists every folder and file below a Box folder.

mod commands;
mod config;
mod listing;

use boxwalk_core::{BwResult, ErrorKind, FieldSet, Pagination, WalkOrder};
use clap::{ArgAction, Parser, Subcommand};
use commands::TreeOptions;
use console::style;
use listing::OutputFormat;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::Level;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "boxwalk")]
#[command(author, version, about = "boxwalk - recursive Box folder listing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Act on behalf of this Box user id
    #[arg(long, global = true)]
    as_user: Option<String>,

    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every folder and file below a folder
    Tree {
        /// Folder to start from (defaults to the configured root)
        folder_id: Option<String>,

        /// Visit order: folders-first or listing
        #[arg(long)]
        order: Option<WalkOrder>,

        /// Paging scheme: offset or marker. Offset paging stops at 10000 items
        /// per folder; use marker for larger folders
        #[arg(long)]
        pagination: Option<Pagination>,

        /// Items requested per page (1-1000)
        #[arg(long)]
        page_size: Option<u32>,

        /// Extra comma-separated fields to request
        #[arg(long)]
        fields: Option<String>,

        /// Do not list folders deeper than this
        #[arg(long)]
        max_depth: Option<usize>,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Print the authenticated user first
        #[arg(long)]
        show_user: bool,
    },

    /// List one folder's direct children
    Ls {
        /// Folder to list (defaults to the configured root)
        folder_id: Option<String>,

        /// Human-readable sizes
        #[arg(short = 'H', long)]
        human: bool,
    },

    /// Show the authenticated user
    Whoami,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> BwResult<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(user) = cli.as_user {
        config.auth.as_user = Some(user);
    }

    match cli.command {
        Commands::Tree {
            folder_id,
            order,
            pagination,
            page_size,
            fields,
            max_depth,
            format,
            timeout,
            show_user,
        } => {
            if let Some(order) = order {
                config.walk.order = order;
            }
            if let Some(pagination) = pagination {
                config.walk.pagination = pagination;
            }
            if let Some(page_size) = page_size {
                config.walk.page_size = page_size;
            }
            if let Some(fields) = fields {
                config.walk.fields = FieldSet::parse(&fields).names().to_vec();
            }
            if max_depth.is_some() {
                config.walk.max_depth = max_depth;
            }
            let folder_id = folder_id.unwrap_or_else(|| config.walk.root_folder_id.clone());
            let options = TreeOptions {
                format,
                timeout: timeout.map(Duration::from_secs),
                show_user,
            };
            let stdout = std::io::stdout().lock();
            commands::tree(&config, &folder_id, &options, stdout, std::io::stderr()).await
        }
        Commands::Ls { folder_id, human } => {
            let folder_id = folder_id.unwrap_or_else(|| config.walk.root_folder_id.clone());
            commands::ls(&config, &folder_id, human, std::io::stdout(), std::io::stderr()).await
        }
        Commands::Whoami => {
            commands::whoami(&config, std::io::stdout(), std::io::stderr()).await
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", style("Error:").red().bold());
            match e.kind() {
                ErrorKind::Configuration => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}
