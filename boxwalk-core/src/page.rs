//! Paged listing requests and responses

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{error::BwError, Item};

/// Largest page the listing API accepts
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Highest `offset` the listing API accepts; larger folders need marker paging
pub const MAX_OFFSET: u64 = 10_000;

/// Fields every listed item must carry for the walk to work
pub const REQUIRED_FIELDS: [&str; 4] = ["id", "type", "name", "path_collection"];

/// Remote fields requested for each item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSet(Vec<String>);

impl FieldSet {
    /// Parse a comma-separated field list, adding any missing required field
    pub fn parse(list: &str) -> Self {
        Self::from_names(list.split(','))
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields = Self(Vec::new());
        for name in names {
            fields.push(name.as_ref());
        }
        for required in REQUIRED_FIELDS {
            fields.push(required);
        }
        fields
    }

    fn push(&mut self, name: &str) {
        let name = name.trim();
        if !name.is_empty() && !self.contains(name) {
            self.0.push(name.to_string());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|f| f == name)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn to_query(&self) -> String {
        self.0.join(",")
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        Self::from_names(REQUIRED_FIELDS)
    }
}

/// How the listing API is paged.
///
/// Offset paging cannot reach past [`MAX_OFFSET`] entries of one folder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pagination {
    #[default]
    Offset,
    Marker,
}

impl FromStr for Pagination {
    type Err = BwError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "offset" => Ok(Pagination::Offset),
            "marker" => Ok(Pagination::Marker),
            other => Err(BwError::InvalidArgument(format!(
                "unknown pagination '{}', expected 'offset' or 'marker'",
                other
            ))),
        }
    }
}

/// Position of the next page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    Offset(u64),
    /// `None` requests the first page
    Marker(Option<String>),
}

impl Cursor {
    pub fn start(pagination: Pagination) -> Self {
        match pagination {
            Pagination::Offset => Cursor::Offset(0),
            Pagination::Marker => Cursor::Marker(None),
        }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cursor::Offset(offset) => write!(f, "offset={}", offset),
            Cursor::Marker(Some(marker)) => write!(f, "marker={}", marker),
            Cursor::Marker(None) => write!(f, "marker=<start>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    pub cursor: Cursor,
    pub fields: FieldSet,
}

/// One batch of a folder's children
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub entries: Vec<Item>,
    /// Entries the server returned that are neither folders nor files
    pub skipped: usize,
    pub total_count: Option<u64>,
    pub next_marker: Option<String>,
}

impl Page {
    pub fn new(entries: Vec<Item>) -> Self {
        Self { entries, ..Default::default() }
    }

    /// Number of entries the server sent, kept or not
    pub fn returned(&self) -> usize {
        self.entries.len() + self.skipped
    }
}
