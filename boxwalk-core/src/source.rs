//! Folder source trait

use async_trait::async_trait;

use crate::{
    error::BwResult,
    page::{FieldSet, Page, PageRequest},
    Item,
};

/// Read-only access to a remote folder hierarchy.
///
/// Implementations issue exactly one request per call and never retry.
#[async_trait]
pub trait FolderSource: Send + Sync {
    /// Fetch a single folder by id
    async fn folder_info(&self, folder_id: &str, fields: &FieldSet) -> BwResult<Item>;

    /// Fetch one page of a folder's direct children
    async fn folder_items(&self, folder_id: &str, request: &PageRequest) -> BwResult<Page>;
}
