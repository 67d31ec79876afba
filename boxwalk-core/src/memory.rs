//! In-memory folder source
//!
//! Serves a fixed tree with the same paging behaviour as the remote API.
//! It records every listing request and can be told to fail listings of
//! chosen folders.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

use crate::{
    error::{BwError, BwResult},
    page::{Cursor, FieldSet, Page, PageRequest, MAX_PAGE_SIZE},
    source::FolderSource,
    Item,
};

/// Id of the root folder every tree starts from
pub const ROOT_FOLDER_ID: &str = "0";

/// Name the remote API gives the root folder
pub const ROOT_FOLDER_NAME: &str = "All Files";

/// A listing request as seen by [`MemorySource`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub folder_id: String,
    pub cursor: Cursor,
    pub limit: u32,
}

struct Node {
    item: Item,
    children: Vec<String>,
}

pub struct MemorySource {
    nodes: HashMap<String, Node>,
    report_total: bool,
    path_collection: bool,
    failing: Mutex<HashSet<String>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MemorySource {
    /// A source holding only the root folder
    pub fn new() -> Self {
        let root = Item::folder(ROOT_FOLDER_ID, ROOT_FOLDER_NAME);
        let mut nodes = HashMap::new();
        nodes.insert(root.id.clone(), Node { item: root, children: Vec::new() });
        Self {
            nodes,
            report_total: true,
            path_collection: true,
            failing: Mutex::new(HashSet::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Whether pages carry `total_count`
    pub fn with_total_count(mut self, report: bool) -> Self {
        self.report_total = report;
        self
    }

    /// Whether returned items carry their ancestors
    pub fn with_path_collection(mut self, include: bool) -> Self {
        self.path_collection = include;
        self
    }

    pub fn add_folder(&mut self, parent_id: &str, id: &str, name: &str) -> BwResult<()> {
        self.insert(parent_id, Item::folder(id, name))
    }

    pub fn add_file(&mut self, parent_id: &str, id: &str, name: &str) -> BwResult<()> {
        self.insert(parent_id, Item::file(id, name))
    }

    fn insert(&mut self, parent_id: &str, item: Item) -> BwResult<()> {
        if self.nodes.contains_key(&item.id) {
            return Err(BwError::InvalidArgument(format!("duplicate item id {}", item.id)));
        }
        let parent = self
            .nodes
            .get_mut(parent_id)
            .filter(|n| n.item.is_folder())
            .ok_or_else(|| BwError::NotFound(format!("folder {}", parent_id)))?;

        let mut path_entries = parent.item.path_entries.clone();
        path_entries.push(parent.item.as_path_entry());
        parent.children.push(item.id.clone());

        let item = item.with_path_entries(path_entries);
        self.nodes.insert(item.id.clone(), Node { item, children: Vec::new() });
        Ok(())
    }

    /// Make every later listing of `folder_id` fail with a network error
    pub fn fail_listing(&self, folder_id: &str) {
        self.failing.lock().insert(folder_id.to_string());
    }

    /// Listing requests received so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    fn present(&self, item: &Item) -> Item {
        let mut item = item.clone();
        if !self.path_collection {
            item.path_entries.clear();
        }
        item
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FolderSource for MemorySource {
    async fn folder_info(&self, folder_id: &str, _fields: &FieldSet) -> BwResult<Item> {
        self.nodes
            .get(folder_id)
            .filter(|n| n.item.is_folder())
            .map(|n| self.present(&n.item))
            .ok_or_else(|| BwError::NotFound(format!("folder {}", folder_id)))
    }

    async fn folder_items(&self, folder_id: &str, request: &PageRequest) -> BwResult<Page> {
        self.requests.lock().push(RecordedRequest {
            folder_id: folder_id.to_string(),
            cursor: request.cursor.clone(),
            limit: request.limit,
        });

        if self.failing.lock().contains(folder_id) {
            return Err(BwError::Network(format!("listing {} failed", folder_id)));
        }
        if request.limit == 0 || request.limit > MAX_PAGE_SIZE {
            return Err(BwError::InvalidArgument(format!("limit {}", request.limit)));
        }

        let node = self
            .nodes
            .get(folder_id)
            .filter(|n| n.item.is_folder())
            .ok_or_else(|| BwError::NotFound(format!("folder {}", folder_id)))?;

        let start = match &request.cursor {
            Cursor::Offset(offset) => *offset as usize,
            Cursor::Marker(None) => 0,
            Cursor::Marker(Some(marker)) => marker
                .parse::<usize>()
                .map_err(|_| BwError::InvalidArgument(format!("marker {}", marker)))?,
        };
        let total = node.children.len();
        let start = start.min(total);
        let end = (start + request.limit as usize).min(total);

        let entries = node.children[start..end]
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(|n| self.present(&n.item))
            .collect();

        let next_marker = match request.cursor {
            Cursor::Marker(_) if end < total => Some(end.to_string()),
            _ => None,
        };

        Ok(Page {
            entries,
            skipped: 0,
            total_count: self.report_total.then_some(total as u64),
            next_marker,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(cursor: Cursor, limit: u32) -> PageRequest {
        PageRequest { limit, cursor, fields: FieldSet::default() }
    }

    fn sample() -> MemorySource {
        let mut source = MemorySource::new();
        source.add_folder("0", "1", "Docs").unwrap();
        source.add_file("1", "11", "a.txt").unwrap();
        source.add_file("1", "12", "b.txt").unwrap();
        source.add_file("1", "13", "c.txt").unwrap();
        source
    }

    #[tokio::test]
    async fn test_paths_follow_parents() {
        let source = sample();
        let page = source.folder_items("1", &request(Cursor::Offset(0), 10)).await.unwrap();
        assert_eq!(page.entries[0].display_path(), "All Files/Docs/a.txt");
        assert_eq!(page.total_count, Some(3));
    }

    #[tokio::test]
    async fn test_offset_window() {
        let source = sample();
        let page = source.folder_items("1", &request(Cursor::Offset(1), 1)).await.unwrap();
        let ids: Vec<_> = page.entries.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["12"]);
        assert!(page.next_marker.is_none());

        let past_end = source.folder_items("1", &request(Cursor::Offset(9), 5)).await.unwrap();
        assert!(past_end.entries.is_empty());
    }

    #[tokio::test]
    async fn test_marker_window() {
        let source = sample();
        let first = source.folder_items("1", &request(Cursor::Marker(None), 2)).await.unwrap();
        assert_eq!(first.entries.len(), 2);
        assert_eq!(first.next_marker.as_deref(), Some("2"));

        let second = source
            .folder_items("1", &request(Cursor::Marker(first.next_marker), 2))
            .await
            .unwrap();
        assert_eq!(second.entries.len(), 1);
        assert!(second.next_marker.is_none());
    }

    #[tokio::test]
    async fn test_failures_and_requests_are_recorded() {
        let source = sample();
        source.fail_listing("1");
        let err = source.folder_items("1", &request(Cursor::Offset(0), 10)).await.unwrap_err();
        assert!(matches!(err, BwError::Network(_)));
        assert_eq!(source.requests().len(), 1);
        assert_eq!(source.requests()[0].folder_id, "1");
    }

    #[tokio::test]
    async fn test_folder_info() {
        let source = sample().with_path_collection(false);
        let docs = source.folder_info("1", &FieldSet::default()).await.unwrap();
        assert_eq!(docs.name, "Docs");
        assert!(docs.path_entries.is_empty());

        assert!(matches!(
            source.folder_info("11", &FieldSet::default()).await,
            Err(BwError::NotFound(_))
        ));
    }

    #[test]
    fn test_insert_rejects_bad_parent_and_duplicates() {
        let mut source = sample();
        assert!(matches!(source.add_file("11", "20", "x"), Err(BwError::NotFound(_))));
        assert!(matches!(source.add_file("0", "1", "x"), Err(BwError::InvalidArgument(_))));
    }
}
