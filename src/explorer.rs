//! The file explorer tree and its ordering.
//!
//! The explorer shows every page of the site as a tree of folders and files.
//! The tree is built from page slugs ([`FileNode::from_pages`]), then shaped
//! by the operations listed in [`ExplorerOptions::order`]: filter, map, and
//! sort, each applied recursively to every folder's children.
//!
//! ## Ordering
//!
//! [`explorer_sort`] is the default comparator:
//!
//! 1. Folders come before files. A folder/file pair never falls through to
//!    name comparison.
//! 2. Two folders, or two files, compare by display name using
//!    [`collation::compare_names`]: case- and accent-insensitive, digit runs
//!    by numeric value, ascending.
//!
//! Names equal under the collation compare `Equal`; [`FileNode::sort`] uses a
//! stable sort, so such siblings keep the order they were inserted in.
//!
//! ```text
//! [Zebra-folder/, apple.md, banana-folder/]
//!   → [banana-folder/, Zebra-folder/, apple.md]
//! ```

use crate::collation::compare_names;
use crate::links::{self, INDEX};
use crate::scan::Page;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Comparator deciding the display order of two sibling nodes.
pub type SortFn = fn(&FileNode, &FileNode) -> Ordering;
/// Predicate keeping a node (and its subtree) in the explorer.
pub type FilterFn = fn(&FileNode) -> bool;
/// In-place transformation applied to every node.
pub type MapFn = fn(&mut FileNode);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    File,
}

/// One entry of the explorer tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FileNode {
    /// Last slug segment (`rust` for `notes/rust`). Empty for the root.
    pub segment: String,
    /// Full slug. For folders this is the folder path (`notes`), not its index page.
    pub slug: String,
    /// Label shown in the explorer and used for ordering.
    pub display_name: String,
    pub kind: NodeKind,
    pub children: Vec<FileNode>,
}

impl FileNode {
    /// The unnamed root folder.
    pub fn root() -> Self {
        Self {
            segment: String::new(),
            slug: String::new(),
            display_name: String::new(),
            kind: NodeKind::Directory,
            children: Vec::new(),
        }
    }

    /// A folder node. Its display name defaults to the segment with dashes as spaces.
    pub fn directory(slug: &str) -> Self {
        let segment = links::basename(slug).to_string();
        Self {
            display_name: links::display_title(&segment),
            segment,
            slug: slug.to_string(),
            kind: NodeKind::Directory,
            children: Vec::new(),
        }
    }

    /// A file node for the page at `slug`.
    pub fn file(slug: &str, display_name: &str) -> Self {
        Self {
            segment: links::basename(slug).to_string(),
            slug: slug.to_string(),
            display_name: display_name.to_string(),
            kind: NodeKind::File,
            children: Vec::new(),
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Build the tree for a set of pages.
    ///
    /// Intermediate folders are created as needed. A folder's `index` page is
    /// not listed as a file; its title becomes the folder's display name.
    /// Children keep page order until the tree is sorted.
    pub fn from_pages(pages: &[Page]) -> Self {
        let mut root = Self::root();
        for page in pages {
            root.insert(&page.slug, &page.title);
        }
        root
    }

    fn insert(&mut self, slug: &str, title: &str) {
        let segments: Vec<&str> = slug.split('/').collect();
        let Some((last, folders)) = segments.split_last() else {
            return;
        };

        let mut node = self;
        let mut prefix = String::new();
        for folder in folders {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(folder);

            let existing = node
                .children
                .iter()
                .position(|c| c.is_directory() && c.segment == *folder);
            let idx = match existing {
                Some(idx) => idx,
                None => {
                    node.children.push(Self::directory(&prefix));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[idx];
        }

        if *last == INDEX {
            node.display_name = title.to_string();
        } else {
            node.children.push(Self::file(slug, title));
        }
    }

    /// Drop every descendant rejected by `keep`, along with its subtree.
    pub fn filter(&mut self, keep: FilterFn) {
        self.children.retain(keep);
        for child in &mut self.children {
            child.filter(keep);
        }
    }

    /// Apply `f` to every descendant, parents before children.
    pub fn map(&mut self, f: MapFn) {
        for child in &mut self.children {
            f(child);
            child.map(f);
        }
    }

    /// Stable-sort every folder's children with `compare`.
    pub fn sort(&mut self, compare: SortFn) {
        self.children.sort_by(compare);
        for child in &mut self.children {
            child.sort(compare);
        }
    }

    /// Run the configured filter/map/sort steps in order.
    pub fn apply(&mut self, options: &ExplorerOptions) {
        for op in &options.order {
            match op {
                TreeOp::Filter => {
                    if let Some(keep) = options.filter_fn {
                        self.filter(keep);
                    }
                }
                TreeOp::Map => {
                    if let Some(f) = options.map_fn {
                        self.map(f);
                    }
                }
                TreeOp::Sort => self.sort(options.sort_fn),
            }
        }
    }

    /// A copy of this tree with `options` applied.
    pub fn shaped(&self, options: &ExplorerOptions) -> FileNode {
        let mut tree = self.clone();
        tree.apply(options);
        tree
    }

    /// Depth-first list of descendants with their depth (children of the root are depth 0).
    pub fn walk(&self) -> Vec<(usize, &FileNode)> {
        let mut out = Vec::new();
        self.walk_into(0, &mut out);
        out
    }

    fn walk_into<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a FileNode)>) {
        for child in &self.children {
            out.push((depth, child));
            child.walk_into(depth + 1, out);
        }
    }

    /// Find the folder node at `slug` (`""` is the root).
    pub fn find_folder(&self, slug: &str) -> Option<&FileNode> {
        if slug.is_empty() {
            return Some(self);
        }
        slug.split('/').try_fold(self, |node, segment| {
            node.children
                .iter()
                .find(|c| c.is_directory() && c.segment == segment)
        })
    }

    /// Slugs of every folder below this node.
    pub fn folder_slugs(&self) -> Vec<&str> {
        self.walk()
            .into_iter()
            .filter(|(_, n)| n.is_directory())
            .map(|(_, n)| n.slug.as_str())
            .collect()
    }

    /// Whether `slug` is this folder or lies inside it.
    pub fn contains_slug(&self, slug: &str) -> bool {
        self.slug.is_empty()
            || slug == self.slug
            || slug
                .strip_prefix(self.slug.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// Default explorer ordering: folders first, then ascending by display name.
pub fn explorer_sort(a: &FileNode, b: &FileNode) -> Ordering {
    match (a.is_directory(), b.is_directory()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => compare_names(&a.display_name, &b.display_name),
    }
}

/// Default filter: hide the top-level `tags` folder, whose pages are generated.
pub fn hide_tags_folder(node: &FileNode) -> bool {
    !(node.is_directory() && node.slug == "tags")
}

/// Whether a folder starts expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderState {
    #[default]
    Collapsed,
    Open,
}

/// What clicking a folder name does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderClickBehavior {
    /// Toggle the folder open or closed.
    #[default]
    Collapse,
    /// Navigate to the folder's listing page.
    Link,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeOp {
    Filter,
    Map,
    Sort,
}

/// Options of an explorer component.
#[derive(Debug, Clone)]
pub struct ExplorerOptions {
    pub title: String,
    pub folder_default_state: FolderState,
    pub folder_click_behavior: FolderClickBehavior,
    pub sort_fn: SortFn,
    pub filter_fn: Option<FilterFn>,
    pub map_fn: Option<MapFn>,
    pub order: Vec<TreeOp>,
}

impl Default for ExplorerOptions {
    fn default() -> Self {
        Self {
            title: "Explorer".to_string(),
            folder_default_state: FolderState::default(),
            folder_click_behavior: FolderClickBehavior::default(),
            sort_fn: explorer_sort,
            filter_fn: Some(hide_tags_folder),
            map_fn: None,
            order: vec![TreeOp::Filter, TreeOp::Map, TreeOp::Sort],
        }
    }
}
