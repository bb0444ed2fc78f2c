//! Shared test utilities for the notegarden test suite.
//!
//! Provides fixture setup, lookup helpers, and explorer tree assertions that
//! work with scan-phase data structures (`Content`, `Page`, `FileNode`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let content = scan(tmp.path()).unwrap();
//!
//! let apple = find_page(&content, "apple");
//! assert_eq!(apple.tags, vec!["fruit", "red"]);
//!
//! assert_tree_shape(&tree, &[
//!     ("Bananas", &["banana"]),
//!     ("Zebra folder", &["file2", "file10"]),
//!     ("Apple", &[]),
//! ]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::explorer::FileNode;
use crate::scan::{Content, Page};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Content lookups, panicking with a clear message on miss
// =========================================================================

/// Find a page by slug. Panics if not found.
pub fn find_page<'a>(content: &'a Content, slug: &str) -> &'a Page {
    content
        .pages
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs = page_slugs(content);
            panic!("page '{slug}' not found. Available: {slugs:?}")
        })
}

/// All page slugs in scan order.
pub fn page_slugs(content: &Content) -> Vec<&str> {
    content.pages.iter().map(|p| p.slug.as_str()).collect()
}

// =========================================================================
// Explorer tree helpers
// =========================================================================

/// Display names of a node's children, in order.
pub fn child_names(node: &FileNode) -> Vec<&str> {
    node.children
        .iter()
        .map(|c| c.display_name.as_str())
        .collect()
}

/// Assert the first two levels of a tree.
///
/// Each entry is `(display name, child display names)`. Use `&[]` for files
/// and empty folders.
pub fn assert_tree_shape(root: &FileNode, expected: &[(&str, &[&str])]) {
    let expected_names: Vec<&str> = expected.iter().map(|(n, _)| *n).collect();
    assert_eq!(child_names(root), expected_names, "top-level entries mismatch");

    for ((name, children), node) in expected.iter().zip(&root.children) {
        assert_eq!(
            child_names(node),
            children.to_vec(),
            "children of '{name}' mismatch"
        );
    }
}
