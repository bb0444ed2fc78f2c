//! Slugs, output paths, and internal link resolution.
//!
//! Every page is identified by a slug: its path relative to the content root,
//! without the `.md` extension, with spaces in each segment turned into
//! dashes. `notes/My Note.md` becomes `notes/My-Note`. A folder's own page is
//! `<folder>/index`, and the site root is `index`.
//!
//! ## Display Titles
//!
//! Dashes in a segment are shown as spaces wherever a segment is displayed
//! without a better title:
//! - `Zebra-folder/` → "Zebra folder"
//! - `reading-list.md` (no title) → "reading list"
//!
//! ## Link Graph
//!
//! [`LinkGraph`] records which pages link to which. Only links that resolve
//! to an existing page are kept; everything else is reported back to the
//! caller so it can be logged.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

/// Characters removed from slugs because they break URLs.
const UNSAFE_SLUG_CHARS: &[char] = &['?', '#', '%', '&', '"', '<', '>'];

/// Slug the root page and folder pages end with.
pub const INDEX: &str = "index";

/// Slugify a single path segment.
pub fn slugify_segment(segment: &str) -> String {
    segment
        .trim()
        .chars()
        .filter(|c| !UNSAFE_SLUG_CHARS.contains(c))
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect()
}

/// Slugify a content-relative markdown path (`notes/My Note.md` → `notes/My-Note`).
pub fn slugify_path(rel: &Path) -> String {
    let stem = rel.with_extension("");
    stem.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(slugify_segment(&s.to_string_lossy())),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Human-readable title for a segment with no better title: dashes become spaces.
pub fn display_title(segment: &str) -> String {
    segment.replace('-', " ")
}

/// Last segment of a slug (`notes/rust` → `rust`).
pub fn basename(slug: &str) -> &str {
    slug.rsplit('/').next().unwrap_or(slug)
}

/// Folder containing a slug (`notes/rust` → `notes`, `rust` → ``).
pub fn parent_folder(slug: &str) -> &str {
    slug.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

/// The folder a folder-page slug belongs to (`notes/index` → `Some("notes")`,
/// `index` → `Some("")`).
pub fn folder_of_index(slug: &str) -> Option<&str> {
    if slug == INDEX {
        Some("")
    } else {
        slug.strip_suffix("/index")
    }
}

/// Slug of a folder's own page.
pub fn folder_index_slug(folder: &str) -> String {
    if folder.is_empty() {
        INDEX.to_string()
    } else {
        format!("{folder}/{INDEX}")
    }
}

/// Slug of a tag page.
pub fn tag_slug(tag: &str) -> String {
    format!("tags/{tag}")
}

/// Absolute URL of a page.
///
/// - `index` → `/`
/// - `notes/index` → `/notes/`
/// - `notes/rust` → `/notes/rust.html`
pub fn href(slug: &str) -> String {
    match folder_of_index(slug) {
        Some("") => "/".to_string(),
        Some(folder) => format!("/{folder}/"),
        None => format!("/{slug}.html"),
    }
}

/// Absolute URL of a folder listing.
pub fn folder_href(folder: &str) -> String {
    href(&folder_index_slug(folder))
}

/// Output file of a page relative to the output root.
pub fn output_path(slug: &str) -> PathBuf {
    PathBuf::from(format!("{slug}.html"))
}

/// Resolve a markdown link destination found on page `from` to a slug.
///
/// Returns `None` for external links (any scheme), pure fragments, and empty
/// destinations. Relative destinations are resolved against the folder of
/// `from`; a leading `/` makes them relative to the content root.
/// `.md`/`.html` suffixes are dropped and a trailing `/` points at the
/// folder's index page.
pub fn resolve_link(from: &str, dest: &str) -> Option<String> {
    let dest = dest.split('#').next().unwrap_or("");
    if dest.is_empty() || dest.contains(':') {
        return None;
    }
    let dest = dest.replace("%20", " ");

    let (base, rest) = match dest.strip_prefix('/') {
        Some(rest) => ("", rest.to_string()),
        None => (parent_folder(from), dest.clone()),
    };
    if !names_a_page(&rest) {
        return None;
    }

    let mut segments: Vec<String> = base
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    for part in rest.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(slugify_segment(other)),
        }
    }

    let last_part = rest.rsplit('/').next().unwrap_or("");
    if matches!(last_part, "" | "." | "..") {
        segments.push(INDEX.to_string());
    } else if let Some(last) = segments.last_mut() {
        for ext in [".md", ".html"] {
            if let Some(stripped) = last.strip_suffix(ext) {
                *last = stripped.to_string();
                break;
            }
        }
    }

    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

/// False for destinations whose last segment has a non-page extension (`pic.png`).
fn names_a_page(rest: &str) -> bool {
    let last = rest.rsplit('/').next().unwrap_or("");
    if last == "." || last == ".." {
        return true;
    }
    match last.rsplit_once('.') {
        Some((_, ext)) => ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("html"),
        None => true,
    }
}

/// A link that did not resolve to any page.
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedLink {
    pub from: String,
    pub dest: String,
}

/// Directed page-to-page link graph.
#[derive(Debug, Default)]
pub struct LinkGraph {
    outgoing: BTreeMap<String, BTreeSet<String>>,
    incoming: BTreeMap<String, BTreeSet<String>>,
}

impl LinkGraph {
    /// Build the graph from `(slug, link destinations)` pairs.
    ///
    /// Self links are dropped. Destinations pointing at a folder with no
    /// index page resolve to nothing and are reported as unresolved.
    pub fn build<'a, I>(pages: I) -> (Self, Vec<UnresolvedLink>)
    where
        I: IntoIterator<Item = (&'a str, &'a [String])> + Clone,
    {
        let known: BTreeSet<&str> = pages.clone().into_iter().map(|(slug, _)| slug).collect();
        let mut graph = LinkGraph::default();
        let mut unresolved = Vec::new();

        for (from, dests) in pages {
            for dest in dests {
                let Some(target) = resolve_link(from, dest) else {
                    continue;
                };
                if !known.contains(target.as_str()) {
                    unresolved.push(UnresolvedLink {
                        from: from.to_string(),
                        dest: dest.clone(),
                    });
                    continue;
                }
                if target == from {
                    continue;
                }
                graph
                    .outgoing
                    .entry(from.to_string())
                    .or_default()
                    .insert(target.clone());
                graph
                    .incoming
                    .entry(target)
                    .or_default()
                    .insert(from.to_string());
            }
        }
        (graph, unresolved)
    }

    /// Pages linking to `slug`, in slug order.
    pub fn backlinks(&self, slug: &str) -> impl Iterator<Item = &str> {
        self.incoming
            .get(slug)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Pages `slug` links to, in slug order.
    pub fn outlinks(&self, slug: &str) -> impl Iterator<Item = &str> {
        self.outgoing
            .get(slug)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Pages one hop away in either direction.
    pub fn neighbors(&self, slug: &str) -> BTreeSet<&str> {
        self.outlinks(slug).chain(self.backlinks(slug)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_spaces_become_dashes() {
        assert_eq!(slugify_segment("My Note"), "My-Note");
        assert_eq!(slugify_segment("  padded "), "padded");
    }

    #[test]
    fn segment_drops_unsafe_chars() {
        assert_eq!(slugify_segment("what? & why#"), "what--why");
    }

    #[test]
    fn path_strips_extension_and_joins() {
        assert_eq!(slugify_path(Path::new("notes/My Note.md")), "notes/My-Note");
        assert_eq!(slugify_path(Path::new("index.md")), "index");
    }

    #[test]
    fn display_title_replaces_dashes() {
        assert_eq!(display_title("Zebra-folder"), "Zebra folder");
        assert_eq!(display_title("plain"), "plain");
    }

    #[test]
    fn basename_and_parent() {
        assert_eq!(basename("notes/rust"), "rust");
        assert_eq!(basename("rust"), "rust");
        assert_eq!(parent_folder("notes/deep/rust"), "notes/deep");
        assert_eq!(parent_folder("rust"), "");
    }

    #[test]
    fn href_for_root_folder_and_page() {
        assert_eq!(href("index"), "/");
        assert_eq!(href("notes/index"), "/notes/");
        assert_eq!(href("notes/rust"), "/notes/rust.html");
        assert_eq!(folder_href("notes"), "/notes/");
        assert_eq!(folder_href(""), "/");
    }

    #[test]
    fn output_paths() {
        assert_eq!(output_path("index"), PathBuf::from("index.html"));
        assert_eq!(output_path("notes/index"), PathBuf::from("notes/index.html"));
        assert_eq!(output_path("tags/rust"), PathBuf::from("tags/rust.html"));
    }

    #[test]
    fn resolve_relative_link() {
        assert_eq!(
            resolve_link("notes/a", "b.md").as_deref(),
            Some("notes/b")
        );
        assert_eq!(
            resolve_link("notes/a", "../top.md").as_deref(),
            Some("top")
        );
        assert_eq!(
            resolve_link("notes/a", "./sub/c.html").as_deref(),
            Some("notes/sub/c")
        );
    }

    #[test]
    fn resolve_absolute_link() {
        assert_eq!(resolve_link("notes/a", "/other.md").as_deref(), Some("other"));
    }

    #[test]
    fn resolve_folder_link() {
        assert_eq!(
            resolve_link("index", "notes/").as_deref(),
            Some("notes/index")
        );
        assert_eq!(resolve_link("notes/a", "/").as_deref(), Some("index"));
    }

    #[test]
    fn resolve_slugifies_segments() {
        assert_eq!(
            resolve_link("index", "My%20Note.md").as_deref(),
            Some("My-Note")
        );
    }

    #[test]
    fn resolve_strips_fragment() {
        assert_eq!(resolve_link("index", "a.md#intro").as_deref(), Some("a"));
        assert_eq!(resolve_link("index", "#intro"), None);
    }

    #[test]
    fn attachments_are_not_pages() {
        assert_eq!(resolve_link("index", "images/pic.png"), None);
        assert_eq!(resolve_link("notes/a", "..").as_deref(), Some("index"));
    }

    #[test]
    fn external_links_are_ignored() {
        assert_eq!(resolve_link("index", "https://example.com"), None);
        assert_eq!(resolve_link("index", "mailto:me@example.com"), None);
    }

    #[test]
    fn graph_tracks_both_directions() {
        let a_links = vec!["b.md".to_string(), "missing.md".to_string()];
        let b_links = vec!["a.md".to_string(), "b.md".to_string()];
        let pages = [("a", a_links.as_slice()), ("b", b_links.as_slice())];
        let (graph, unresolved) = LinkGraph::build(pages);

        assert_eq!(graph.outlinks("a").collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(graph.backlinks("b").collect::<Vec<_>>(), vec!["a"]);
        // self link dropped
        assert_eq!(graph.outlinks("b").collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(
            unresolved,
            vec![UnresolvedLink {
                from: "a".to_string(),
                dest: "missing.md".to_string()
            }]
        );
    }

    #[test]
    fn neighbors_merge_in_and_out() {
        let a_links = vec!["b.md".to_string()];
        let c_links = vec!["a.md".to_string()];
        let none: Vec<String> = vec![];
        let pages = [
            ("a", a_links.as_slice()),
            ("b", none.as_slice()),
            ("c", c_links.as_slice()),
        ];
        let (graph, _) = LinkGraph::build(pages);
        let neighbors: Vec<&str> = graph.neighbors("a").into_iter().collect();
        assert_eq!(neighbors, vec!["b", "c"]);
    }
}
