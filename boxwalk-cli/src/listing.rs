// SPDX-License-Identifier: AGPL-3.0-or-later
//! Listing output sinks

use boxwalk_core::{BwError, BwResult, Item, ItemKind, Visitor};
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;

/// Width of the right-aligned id column
const ID_WIDTH: usize = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = BwError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(BwError::InvalidArgument(format!(
                "unknown format '{}', expected 'text' or 'json'",
                other
            ))),
        }
    }
}

#[derive(Serialize)]
struct ListingRecord<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: ItemKind,
    name: &'a str,
    path: String,
}

/// `{id:>12} /{path}`
pub fn format_line(item: &Item) -> String {
    format!("{:>width$} /{}", item.id, item.display_path(), width = ID_WIDTH)
}

/// Writes one line per visited item
pub struct ListingPrinter<W: Write> {
    out: W,
    format: OutputFormat,
    written: u64,
}

impl<W: Write> ListingPrinter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format, written: 0 }
    }

    /// Title and column header; nothing in JSON mode
    pub fn header(&mut self) -> BwResult<()> {
        if self.format == OutputFormat::Json {
            return Ok(());
        }
        let result = writeln!(self.out)
            .and_then(|_| writeln!(self.out, "File Listing"))
            .and_then(|_| writeln!(self.out, "{:>width$} Path", "ID", width = ID_WIDTH));
        result.map_err(|e| BwError::Visitor(e.to_string()))
    }

    /// Items written so far
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_item(&mut self, item: &Item) -> BwResult<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", format_line(item))
                .map_err(|e| BwError::Visitor(e.to_string())),
            OutputFormat::Json => {
                let record = ListingRecord {
                    id: &item.id,
                    kind: item.kind,
                    name: &item.name,
                    path: item.display_path(),
                };
                serde_json::to_writer(&mut self.out, &record)
                    .map_err(|e| BwError::Visitor(e.to_string()))?;
                writeln!(self.out).map_err(|e| BwError::Visitor(e.to_string()))
            }
        }
    }
}

impl<W: Write> Visitor for ListingPrinter<W> {
    fn visit(&mut self, item: &Item) -> BwResult<()> {
        self.write_item(item)?;
        self.written += 1;
        Ok(())
    }
}
