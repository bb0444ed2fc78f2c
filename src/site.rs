//! The assembled site: pages, explorer tree, link graph, and tags.
//!
//! Built once from scanned [`Content`] and shared read-only by every render.

use crate::collation::compare_names;
use crate::config::SiteConfig;
use crate::explorer::FileNode;
use crate::links::{self, LinkGraph, UnresolvedLink};
use crate::scan::{self, Content, Page};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug)]
pub struct Site {
    pub config: SiteConfig,
    pub pages: Vec<Page>,
    /// Explorer tree in page order. Layouts shape their own copy once per build.
    pub tree: FileNode,
    pub links: LinkGraph,
    /// Internal links that point at no page.
    pub unresolved: Vec<UnresolvedLink>,
    by_slug: HashMap<String, usize>,
}

impl Site {
    pub fn new(content: Content) -> Self {
        let Content { pages, config } = content;
        let tree = FileNode::from_pages(&pages);
        let (links, unresolved) = LinkGraph::build(
            pages
                .iter()
                .map(|p| (p.slug.as_str(), p.links.as_slice()))
                .collect::<Vec<_>>(),
        );
        let by_slug = pages
            .iter()
            .enumerate()
            .map(|(i, p)| (p.slug.clone(), i))
            .collect();
        Self {
            config,
            pages,
            tree,
            links,
            unresolved,
            by_slug,
        }
    }

    pub fn page(&self, slug: &str) -> Option<&Page> {
        self.by_slug.get(slug).map(|&i| &self.pages[i])
    }

    pub fn title_of(&self, slug: &str) -> Option<&str> {
        self.page(slug).map(|p| p.title.as_str())
    }

    /// Display name of a folder as the explorer shows it.
    pub fn folder_title(&self, folder: &str) -> String {
        self.tree
            .find_folder(folder)
            .map(|node| node.display_name.clone())
            .unwrap_or_else(|| links::display_title(links::basename(folder)))
    }

    /// Slugs of every folder in the tree.
    pub fn folders(&self) -> Vec<&str> {
        self.tree.folder_slugs()
    }

    /// Every page inside `folder` (recursively), excluding the folder's own index page.
    pub fn pages_in_folder(&self, folder: &str) -> Vec<&Page> {
        let own_index = links::folder_index_slug(folder);
        let mut pages: Vec<&Page> = self
            .pages
            .iter()
            .filter(|p| p.slug != own_index)
            .filter(|p| folder.is_empty() || p.slug.starts_with(&format!("{folder}/")))
            .collect();
        pages.sort_by(|a, b| by_date_then_title(a, b));
        pages
    }

    pub fn pages_tagged(&self, tag: &str) -> Vec<&Page> {
        let mut pages: Vec<&Page> = self
            .pages
            .iter()
            .filter(|p| p.tags.iter().any(|t| t == tag))
            .collect();
        pages.sort_by(|a, b| by_date_then_title(a, b));
        pages
    }

    /// Every tag with its page count, alphabetical.
    pub fn tags(&self) -> BTreeMap<&str, usize> {
        scan::tag_counts(&self.pages)
    }
}

/// Listing order: dated pages first, newest first; then by title.
///
/// Only dates that parse (see [`parse_date`]) count. A page whose date is
/// free text such as `"March 2024"` still shows it, but lists with the
/// undated pages.
pub fn by_date_then_title(a: &Page, b: &Page) -> Ordering {
    let da = a.date.as_deref().and_then(parse_date);
    let db = b.date.as_deref().and_then(parse_date);
    match (da, db) {
        (Some(da), Some(db)) if da != db => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => compare_names(&a.title, &b.title),
    }
}

/// Parse a front-matter date: RFC 3339 (`2024-05-01T08:00:00+02:00`, compared
/// in UTC), a local date-time (`2024-05-01T08:00:00`, `2024-05-01 08:00`)
/// or a plain date (`2024-05-01`, midnight).
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(slug: &str, title: &str, date: Option<&str>, tags: &[&str]) -> Page {
        Page {
            slug: slug.to_string(),
            title: title.to_string(),
            date: date.map(str::to_string),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Page::default()
        }
    }

    fn site(pages: Vec<Page>) -> Site {
        Site::new(Content {
            pages,
            config: SiteConfig::default(),
        })
    }

    fn slugs(pages: &[&Page]) -> Vec<String> {
        pages.iter().map(|p| p.slug.clone()).collect()
    }

    #[test]
    fn lookup_by_slug() {
        let site = site(vec![page("a", "A", None, &[])]);
        assert_eq!(site.title_of("a"), Some("A"));
        assert!(site.page("missing").is_none());
    }

    #[test]
    fn folder_listing_is_recursive_and_skips_own_index() {
        let site = site(vec![
            page("notes/index", "Notes", None, &[]),
            page("notes/a", "A", None, &[]),
            page("notes/deep/b", "B", None, &[]),
            page("notes-old/c", "C", None, &[]),
        ]);
        assert_eq!(
            slugs(&site.pages_in_folder("notes")),
            vec!["notes/a", "notes/deep/b"]
        );
    }

    #[test]
    fn root_listing_contains_everything_but_home() {
        let site = site(vec![
            page("index", "Home", None, &[]),
            page("a", "A", None, &[]),
            page("x/b", "B", None, &[]),
        ]);
        assert_eq!(slugs(&site.pages_in_folder("")), vec!["a", "x/b"]);
    }

    #[test]
    fn listing_orders_dates_then_titles() {
        let site = site(vec![
            page("a", "Zed", None, &[]),
            page("b", "alpha", None, &[]),
            page("c", "Old", Some("2023-01-01"), &[]),
            page("d", "New", Some("2024-06-01"), &[]),
        ]);
        assert_eq!(slugs(&site.pages_in_folder("")), vec!["d", "c", "b", "a"]);
    }

    #[test]
    fn free_text_dates_list_with_undated_pages() {
        let site = site(vec![
            page("a", "Zed", None, &[]),
            page("b", "Beta", Some("March 2024"), &[]),
            page("c", "Old", Some("2023-01-01"), &[]),
        ]);
        // Lexically "March 2024" would sort above "2023-01-01".
        assert_eq!(slugs(&site.pages_in_folder("")), vec!["c", "b", "a"]);
    }

    #[test]
    fn dates_compare_chronologically_across_formats() {
        let site = site(vec![
            page("day", "Day", Some("2024-06-01"), &[]),
            page("morning", "Morning", Some("2024-06-01T08:00:00"), &[]),
            page("offset", "Offset", Some("2024-06-01T12:00:00+09:00"), &[]),
        ]);
        // 12:00+09:00 is 03:00 UTC.
        assert_eq!(
            slugs(&site.pages_in_folder("")),
            vec!["morning", "offset", "day"]
        );
    }

    #[test]
    fn parse_date_formats() {
        assert!(parse_date("2024-05-01").is_some());
        assert!(parse_date("1979-05-27T07:32:00Z").is_some());
        assert!(parse_date("1979-05-27T00:32:00.999999-07:00").is_some());
        assert!(parse_date("1979-05-27 07:32:00").is_some());
        assert!(parse_date("March 2024").is_none());
        assert!(parse_date("2024-13-01").is_none());
    }

    #[test]
    fn tags_counted_and_listed() {
        let site = site(vec![
            page("a", "A", None, &["rust", "web"]),
            page("b", "B", None, &["rust"]),
        ]);
        let tags = site.tags();
        assert_eq!(tags.get("rust"), Some(&2));
        assert_eq!(tags.get("web"), Some(&1));
        assert_eq!(slugs(&site.pages_tagged("web")), vec!["a"]);
    }

    #[test]
    fn folder_title_prefers_index_title() {
        let site = site(vec![
            page("banana-folder/index", "Bananas", None, &[]),
            page("Zebra-folder/a", "A", None, &[]),
        ]);
        assert_eq!(site.folder_title("banana-folder"), "Bananas");
        assert_eq!(site.folder_title("Zebra-folder"), "Zebra folder");
        assert_eq!(site.folder_title("tags"), "tags");
    }

    #[test]
    fn unresolved_links_collected() {
        let mut a = page("a", "A", None, &[]);
        a.links = vec!["nope.md".to_string()];
        let site = site(vec![a]);
        assert_eq!(site.unresolved.len(), 1);
    }
}
