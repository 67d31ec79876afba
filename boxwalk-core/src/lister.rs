//! Complete folder listings over a paged API

use futures::{stream, Stream, TryStreamExt};
use serde::{Deserialize, Serialize};

use crate::{
    error::{BwError, BwResult},
    page::{
        Cursor, FieldSet, Page, PageRequest, Pagination, DEFAULT_PAGE_SIZE, MAX_OFFSET,
        MAX_PAGE_SIZE,
    },
    source::FolderSource,
    Item,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    pub page_size: u32,
    pub fields: FieldSet,
    pub pagination: Pagination,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            fields: FieldSet::default(),
            pagination: Pagination::default(),
        }
    }
}

/// Fetches every direct child of a folder, following pagination.
pub struct PagedLister<'a, S: FolderSource + ?Sized> {
    source: &'a S,
    options: ListOptions,
}

impl<'a, S: FolderSource + ?Sized> PagedLister<'a, S> {
    pub fn new(source: &'a S, options: ListOptions) -> BwResult<Self> {
        if options.page_size == 0 || options.page_size > MAX_PAGE_SIZE {
            return Err(BwError::InvalidArgument(format!(
                "page size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, options.page_size
            )));
        }
        Ok(Self { source, options })
    }

    pub fn source(&self) -> &'a S {
        self.source
    }

    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    /// Stream the folder's pages in server order.
    ///
    /// Each page is requested only once the previous one has been consumed.
    /// A page with no entries at all ends the stream without being yielded.
    pub fn pages<'s>(&'s self, folder_id: &'s str) -> impl Stream<Item = BwResult<Page>> + 's {
        let start = Some(Cursor::start(self.options.pagination));
        stream::try_unfold(start, move |state| async move {
            match state {
                Some(cursor) => self.fetch(folder_id, cursor).await,
                None => Ok(None),
            }
        })
    }

    /// All children of the folder, concatenated across pages
    pub async fn list_all(&self, folder_id: &str) -> BwResult<Vec<Item>> {
        self.pages(folder_id)
            .try_fold(Vec::new(), |mut items, page| async move {
                items.extend(page.entries);
                Ok::<_, BwError>(items)
            })
            .await
    }

    async fn fetch(
        &self,
        folder_id: &str,
        cursor: Cursor,
    ) -> BwResult<Option<(Page, Option<Cursor>)>> {
        let request = PageRequest {
            limit: self.options.page_size,
            cursor,
            fields: self.options.fields.clone(),
        };
        let page = self.source.folder_items(folder_id, &request).await?;
        tracing::debug!(
            folder_id,
            cursor = %request.cursor,
            returned = page.returned(),
            skipped = page.skipped,
            total = ?page.total_count,
            "fetched page"
        );

        if page.returned() == 0 {
            return Ok(None);
        }
        let next = self.advance(folder_id, &request.cursor, &page)?;
        Ok(Some((page, next)))
    }

    fn advance(
        &self,
        folder_id: &str,
        cursor: &Cursor,
        page: &Page,
    ) -> BwResult<Option<Cursor>> {
        let returned = page.returned();
        match cursor {
            Cursor::Offset(offset) => {
                // Advance by what actually came back, not by the page size.
                let next = offset + returned as u64;
                if returned < self.options.page_size as usize {
                    return Ok(None);
                }
                if page.total_count.is_some_and(|total| next >= total) {
                    return Ok(None);
                }
                if next > MAX_OFFSET {
                    return Err(BwError::InvalidArgument(format!(
                        "folder {} has more than {} items, use marker pagination",
                        folder_id, MAX_OFFSET
                    )));
                }
                Ok(Some(Cursor::Offset(next)))
            }
            Cursor::Marker(_) => Ok(page
                .next_marker
                .clone()
                .filter(|m| !m.is_empty())
                .map(|m| Cursor::Marker(Some(m)))),
        }
    }
}
