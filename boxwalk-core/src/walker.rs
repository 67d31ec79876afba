//! Depth-first traversal of a remote folder tree

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{
    error::{BwError, BwResult},
    lister::{ListOptions, PagedLister},
    source::FolderSource,
    Item,
};

/// Action applied to every folder and file reached by a walk
pub trait Visitor {
    fn visit(&mut self, item: &Item) -> BwResult<()>;
}

impl<F> Visitor for F
where
    F: FnMut(&Item) -> BwResult<()>,
{
    fn visit(&mut self, item: &Item) -> BwResult<()> {
        self(item)
    }
}

/// Order in which a folder's children are visited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WalkOrder {
    /// Every subfolder subtree first, then the folder's own files
    #[default]
    FoldersFirst,
    /// Children in listing position, descending into folders inline
    Listing,
}

impl FromStr for WalkOrder {
    type Err = BwError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "folders-first" => Ok(WalkOrder::FoldersFirst),
            "listing" => Ok(WalkOrder::Listing),
            other => Err(BwError::InvalidArgument(format!(
                "unknown walk order '{}', expected 'folders-first' or 'listing'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkOptions {
    pub list: ListOptions,
    pub order: WalkOrder,
    /// Folders at this depth are visited but not listed; the root is depth 0
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub folders: u64,
    pub files: u64,
    /// Folders whose children were fetched
    pub listed: u64,
}

enum Pending {
    Folder { item: Item, depth: usize },
    File(Item),
}

pub struct TreeWalker<'a, S: FolderSource + ?Sized> {
    lister: PagedLister<'a, S>,
    order: WalkOrder,
    max_depth: Option<usize>,
}

impl<'a, S: FolderSource + ?Sized> TreeWalker<'a, S> {
    pub fn new(source: &'a S, options: WalkOptions) -> BwResult<Self> {
        Ok(Self {
            lister: PagedLister::new(source, options.list)?,
            order: options.order,
            max_depth: options.max_depth,
        })
    }

    /// Fetch the folder `folder_id`, then walk it
    pub async fn walk_from<V>(&self, folder_id: &str, visitor: &mut V) -> BwResult<WalkStats>
    where
        V: Visitor + ?Sized,
    {
        let fields = &self.lister.options().fields;
        let root = self.lister.source().folder_info(folder_id, fields).await?;
        self.walk(root, visitor).await
    }

    /// Visit `root` and everything below it.
    ///
    /// A folder is visited before its children are fetched. The first
    /// listing or visitor error ends the walk.
    pub async fn walk<V>(&self, root: Item, visitor: &mut V) -> BwResult<WalkStats>
    where
        V: Visitor + ?Sized,
    {
        if !root.is_folder() {
            return Err(BwError::InvalidArgument(format!(
                "{} ({}) is not a folder",
                root.name, root.id
            )));
        }

        let mut stats = WalkStats::default();
        let mut stack = vec![Pending::Folder { item: root, depth: 0 }];

        while let Some(next) = stack.pop() {
            match next {
                Pending::File(item) => {
                    visitor.visit(&item)?;
                    stats.files += 1;
                }
                Pending::Folder { item, depth } => {
                    visitor.visit(&item)?;
                    stats.folders += 1;

                    if self.max_depth.is_some_and(|max| depth >= max) {
                        continue;
                    }

                    tracing::debug!(folder_id = %item.id, depth, "listing folder");
                    let children = self.lister.list_all(&item.id).await?;
                    stats.listed += 1;

                    let children = children.into_iter().map(|child| with_ancestors(child, &item));
                    self.schedule(&mut stack, children, depth + 1);
                }
            }
        }

        tracing::info!(
            folders = stats.folders,
            files = stats.files,
            listed = stats.listed,
            "walk complete"
        );
        Ok(stats)
    }

    /// Push children so that popping yields them in visiting order
    fn schedule(
        &self,
        stack: &mut Vec<Pending>,
        children: impl Iterator<Item = Item>,
        depth: usize,
    ) {
        let pending = children.map(|child| {
            if child.is_folder() {
                Pending::Folder { item: child, depth }
            } else {
                Pending::File(child)
            }
        });

        match self.order {
            WalkOrder::FoldersFirst => {
                let (folders, files): (Vec<_>, Vec<_>) =
                    pending.partition(|p| matches!(p, Pending::Folder { .. }));
                stack.extend(files.into_iter().rev());
                stack.extend(folders.into_iter().rev());
            }
            WalkOrder::Listing => {
                let pending: Vec<_> = pending.collect();
                stack.extend(pending.into_iter().rev());
            }
        }
    }
}

/// Fill in ancestors the listing left out, from the folder being walked
fn with_ancestors(mut child: Item, parent: &Item) -> Item {
    if child.path_entries.is_empty() {
        child.path_entries = parent.path_entries.clone();
        child.path_entries.push(parent.as_path_entry());
    }
    child
}
