//! boxwalk core
//!
//! Item model, the folder source seam, paged listing and tree walking.

pub mod error;
pub mod item;
pub mod lister;
#[cfg(test)]
mod memory;
pub mod page;
pub mod source;
pub mod walker;

pub use error::{BwError, BwResult, ErrorKind};
pub use item::{Item, ItemKind, PathEntry};
pub use lister::{ListOptions, PagedLister};
pub use page::{Cursor, FieldSet, Page, PageRequest, Pagination};
pub use source::FolderSource;
pub use walker::{TreeWalker, Visitor, WalkOptions, WalkOrder, WalkStats};
