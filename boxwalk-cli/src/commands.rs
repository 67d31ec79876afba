// SPDX-License-Identifier: AGPL-3.0-or-later
//! CLI command implementations
//!
//! Commands write their results to `out` and progress or failure notes to
//! `err`; `main` passes stdout and stderr.

use boxwalk_core::{BwError, BwResult, Item, ItemKind, PagedLister, TreeWalker};
use boxwalk_providers::{BoxClient, BoxConfig, BoxUser};
use console::style;
use std::io::Write;
use std::time::Duration;
use tabled::{Table, Tabled};

use crate::config::AppConfig;
use crate::listing::{ListingPrinter, OutputFormat};

/// Resolve the access token and build an authenticated client
fn connect<E: Write>(config: &AppConfig, err: &mut E) -> BwResult<BoxClient> {
    let source = config.auth.token_source();
    let token = source.resolve()?;
    writeln!(err, "Authenticating...")?;
    tracing::debug!(source = %source.describe(), "resolved access token");

    let mut box_config = BoxConfig::new(token).with_api_url(config.auth.api_url.clone());
    if let Some(ref user) = config.auth.as_user {
        box_config = box_config.with_as_user(user.clone());
    }
    BoxClient::new(box_config)
}

fn write_user<W: Write>(out: &mut W, user: &BoxUser) -> BwResult<()> {
    writeln!(out)?;
    writeln!(out, "Authenticated User")?;
    writeln!(out, "Name: {}", user.name)?;
    writeln!(out, "Login: {}", user.login)?;
    Ok(())
}

/// Note printed when a walk stops early
fn incomplete_marker(written: u64) -> String {
    format!("listing incomplete after {} items", written)
}

/// Options of the `tree` command that do not come from the config file
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    pub format: OutputFormat,
    pub timeout: Option<Duration>,
    pub show_user: bool,
}

/// Print the whole tree under `folder_id`
pub async fn tree<O: Write, E: Write>(
    config: &AppConfig,
    folder_id: &str,
    options: &TreeOptions,
    mut out: O,
    mut err: E,
) -> BwResult<()> {
    let client = connect(config, &mut err)?;
    let walker = TreeWalker::new(&client, config.walk.walk_options())?;

    if options.show_user {
        write_user(&mut out, &client.current_user().await?)?;
    }

    let mut printer = ListingPrinter::new(out, options.format);
    printer.header()?;

    let walk = walker.walk_from(folder_id, &mut printer);
    let result = match options.timeout {
        Some(limit) => tokio::time::timeout(limit, walk)
            .await
            .unwrap_or(Err(BwError::Timeout)),
        None => walk.await,
    };

    match result {
        Ok(stats) => {
            tracing::info!(folders = stats.folders, files = stats.files, "listing finished");
            Ok(())
        }
        Err(e) => {
            // The walk error is what gets reported; a failed note is dropped.
            let marker = incomplete_marker(printer.written());
            let _ = writeln!(err, "{}", style(marker).for_stderr().yellow());
            Err(e)
        }
    }
}

/// Format item kind
fn format_kind(kind: ItemKind) -> String {
    match kind {
        ItemKind::Folder => style("d").cyan().to_string(),
        ItemKind::File => "-".to_string(),
    }
}

/// Format file size
fn format_size(size: Option<u64>, human: bool) -> String {
    match size {
        Some(s) if human => bytesize::ByteSize(s).to_string(),
        Some(s) => s.to_string(),
        None => "-".to_string(),
    }
}

#[derive(Tabled)]
struct LsEntry {
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Size")]
    size: String,
}

impl LsEntry {
    fn from_item(item: &Item, human: bool) -> Self {
        Self {
            kind: format_kind(item.kind),
            id: item.id.clone(),
            name: item.name.clone(),
            size: format_size(item.size, human),
        }
    }
}

/// List the direct children of one folder
pub async fn ls<O: Write, E: Write>(
    config: &AppConfig,
    folder_id: &str,
    human: bool,
    mut out: O,
    mut err: E,
) -> BwResult<()> {
    let client = connect(config, &mut err)?;
    let lister = PagedLister::new(&client, config.walk.walk_options().list)?;

    let items = lister.list_all(folder_id).await?;
    if items.is_empty() {
        writeln!(out, "(empty folder)")?;
        return Ok(());
    }

    let rows: Vec<LsEntry> = items.iter().map(|i| LsEntry::from_item(i, human)).collect();
    writeln!(out, "{}", Table::new(rows))?;
    Ok(())
}

/// Show the authenticated user
pub async fn whoami<O: Write, E: Write>(
    config: &AppConfig,
    mut out: O,
    mut err: E,
) -> BwResult<()> {
    let client = connect(config, &mut err)?;
    let user = client.current_user().await?;
    write_user(&mut out, &user)
}
