//! CLI output formatting for all commands.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every entity (page,
//! folder, tag) leads with its positional index and title; the source file
//! is shown as secondary context on an indented `Source:` line.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Pages
//!     001 Apple
//!         Source: apple.md
//!         Tags: fruit, red
//!     002 Banana
//!         Source: banana-folder/banana.md
//!
//! Tags
//!     #fruit (3 pages)
//!
//! Config
//!     config.toml
//! ```
//!
//! ## Tree
//!
//! ```text
//! Pages
//! 001 Bananas/
//!     001 Banana
//! 002 Zebra folder/
//!     001 file2
//!     002 file10
//! 003 Apple
//! ```
//!
//! ## Build
//!
//! ```text
//! Generated 7 content pages, 1 folder page, 4 tag pages → public
//! Unresolved links: 1
//!     index: missing.md
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::explorer::FileNode;
use crate::generate::BuildReport;
use crate::links::UnresolvedLink;
use crate::scan::{self, Content};
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Positional index + title.
///
/// ```text
/// 001 Apple
/// 002 Zebra folder/
/// ```
fn entity_header(index: usize, title: &str, is_folder: bool) -> String {
    let suffix = if is_folder { "/" } else { "" };
    format!("{} {}{}", format_index(index), title, suffix)
}

/// `1 page`, `3 pages`.
fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

// ============================================================================
// Check
// ============================================================================

/// Inventory of scanned content: pages, tags, and config.
pub fn format_scan_output(content: &Content, source_root: &Path) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    for (i, page) in content.pages.iter().enumerate() {
        lines.push(format!("{}{}", indent(1), entity_header(i + 1, &page.title, false)));
        lines.push(format!("{}Source: {}", indent(2), page.source_path));
        if let Some(desc) = &page.description {
            lines.push(format!("{}{}", indent(2), truncate_desc(desc.trim(), 60)));
        }
        if !page.tags.is_empty() {
            lines.push(format!("{}Tags: {}", indent(2), page.tags.join(", ")));
        }
    }

    let tags = scan::tag_counts(&content.pages);
    if !tags.is_empty() {
        lines.push(String::new());
        lines.push("Tags".to_string());
        for (tag, count) in tags {
            lines.push(format!("{}#{} ({})", indent(1), tag, plural(count, "page")));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push(format!("{}config.toml", indent(1)));
    } else {
        lines.push(format!("{}(stock defaults)", indent(1)));
    }
    lines
}

pub fn print_scan_output(content: &Content, source_root: &Path) {
    for line in format_scan_output(content, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Tree
// ============================================================================

/// The explorer tree as shown in the sidebar, under its title.
pub fn format_explorer_tree(title: &str, tree: &FileNode) -> Vec<String> {
    let mut lines = vec![title.to_string()];
    tree_lines(tree, 0, &mut lines);
    lines
}

fn tree_lines(node: &FileNode, depth: usize, lines: &mut Vec<String>) {
    for (i, child) in node.children.iter().enumerate() {
        lines.push(format!(
            "{}{}",
            indent(depth),
            entity_header(i + 1, &child.display_name, child.is_directory())
        ));
        tree_lines(child, depth + 1, lines);
    }
}

pub fn print_explorer_tree(title: &str, tree: &FileNode) {
    for line in format_explorer_tree(title, tree) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_summary(report: &BuildReport, unresolved: &[UnresolvedLink]) -> Vec<String> {
    let mut lines = vec![format!(
        "Generated {}, {}, {} → {}",
        plural(report.content_pages, "content page"),
        plural(report.folder_pages, "folder page"),
        plural(report.tag_pages, "tag page"),
        report.output_dir.display()
    )];
    if !unresolved.is_empty() {
        lines.push(format!("Unresolved links: {}", unresolved.len()));
        for link in unresolved {
            lines.push(format!("{}{}: {}", indent(1), link.from, link.dest));
        }
    }
    lines
}

pub fn print_build_summary(report: &BuildReport, unresolved: &[UnresolvedLink]) {
    for line in format_build_summary(report, unresolved) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
