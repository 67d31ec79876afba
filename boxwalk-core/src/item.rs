//! Remote folder and file items

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Item kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Folder,
    File,
}

/// One ancestor of an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry {
    pub id: String,
    pub name: String,
}

impl PathEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// A folder or file in the remote hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    /// Ancestors from the root down to the parent
    pub path_entries: Vec<PathEntry>,
    pub size: Option<u64>,
    pub modified: Option<DateTime<Utc>>,
}

impl Item {
    pub fn folder(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, ItemKind::Folder)
    }

    pub fn file(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, ItemKind::File)
    }

    fn new(id: impl Into<String>, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            path_entries: Vec::new(),
            size: None,
            modified: None,
        }
    }

    pub fn with_path_entries(mut self, path_entries: Vec<PathEntry>) -> Self {
        self.path_entries = path_entries;
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn is_folder(&self) -> bool {
        self.kind == ItemKind::Folder
    }

    pub fn is_file(&self) -> bool {
        self.kind == ItemKind::File
    }

    /// This item as an ancestor entry of its children
    pub fn as_path_entry(&self) -> PathEntry {
        PathEntry::new(self.id.clone(), self.name.clone())
    }

    /// Ancestor names joined with `/`, followed by the item's own name.
    ///
    /// Never starts with `/`, so an item without ancestors renders as its bare name.
    pub fn display_path(&self) -> String {
        let parents: Vec<&str> = self.path_entries.iter().map(|e| e.name.as_str()).collect();
        let path = format!("{}/{}", parents.join("/"), self.name);
        path.trim_start_matches('/').to_string()
    }
}
