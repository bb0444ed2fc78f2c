//! Content discovery.
//!
//! Walks the content directory and turns every markdown file into a [`Page`].
//!
//! ## Directory Structure
//!
//! ```text
//! content/
//! ├── config.toml              # Site configuration (optional)
//! ├── index.md                 # Home page (optional)
//! ├── apple.md                 # Page → /apple.html
//! ├── banana-folder/
//! │   ├── index.md             # Folder intro, names the folder in the explorer
//! │   └── banana.md            # Page → /banana-folder/banana.html
//! ├── Zebra-folder/
//! │   ├── file2.md
//! │   └── file10.md
//! └── .obsidian/               # Hidden entries are skipped
//! ```
//!
//! ## Front Matter
//!
//! A page may start with a TOML block fenced by `+++`:
//!
//! ```text
//! +++
//! title = "Apple"
//! tags = ["fruit", "red"]
//! date = "2024-03-01"
//! description = "All about apples"
//! draft = false
//! +++
//! ```
//!
//! Title resolution (first available wins): front matter `title`, first
//! `# heading`, file name with dashes as spaces. Pages with `draft = true`
//! are left out of the site. Unrecognised keys are ignored.

use crate::config::{self, SiteConfig};
use crate::links;
use log::debug;
use pulldown_cmark::{Event, Parser, Tag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid front matter in {0}: {1}")]
    FrontMatter(PathBuf, toml::de::Error),
    #[error("Unterminated front matter in {0}")]
    UnterminatedFrontMatter(PathBuf),
    #[error("{0} and {1} both map to slug '{2}'")]
    DuplicateSlug(PathBuf, PathBuf, String),
}

/// Everything the generate stage needs: pages plus resolved config.
#[derive(Debug, Serialize)]
pub struct Content {
    pub pages: Vec<Page>,
    pub config: SiteConfig,
}

/// Every distinct tag with the number of pages carrying it, alphabetical.
pub fn tag_counts(pages: &[Page]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for page in pages {
        for tag in &page.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }
    counts
}

/// A markdown page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    /// Path-derived identifier, e.g. `notes/My-Note`.
    pub slug: String,
    pub title: String,
    /// Normalized tags: no leading `#`, spaces as dashes, no duplicates,
    /// `/` only between non-empty segments (`lang/rust`).
    pub tags: Vec<String>,
    /// Date string as written in front matter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Markdown body with front matter removed.
    pub body: String,
    /// Source path relative to the content root.
    pub source_path: String,
    /// Raw destinations of every link in the body.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
}

impl Page {
    /// Words in the body, used for reading time.
    pub fn word_count(&self) -> usize {
        self.body.split_whitespace().count()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FrontMatter {
    title: Option<String>,
    tags: Vec<String>,
    date: Option<toml::Value>,
    description: Option<String>,
    draft: bool,
}

const FRONT_MATTER_FENCE: &str = "+++";

pub fn scan(root: &Path) -> Result<Content, ScanError> {
    let config = config::load_config(root)?;
    let pages = scan_pages(root)?;
    Ok(Content { pages, config })
}

/// Parse every markdown page under `root`, sorted by slug.
pub fn scan_pages(root: &Path) -> Result<Vec<Page>, ScanError> {
    let mut by_slug: BTreeMap<String, Page> = BTreeMap::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_markdown(path) {
            continue;
        }
        let rel = path.strip_prefix(root).unwrap_or(path);
        let Some(page) = parse_page(path, rel)? else {
            debug!("skipping draft {}", rel.display());
            continue;
        };
        debug!("scanned {} → {}", rel.display(), page.slug);

        if let Some(existing) = by_slug.get(&page.slug) {
            return Err(ScanError::DuplicateSlug(
                PathBuf::from(&existing.source_path),
                rel.to_path_buf(),
                page.slug,
            ));
        }
        by_slug.insert(page.slug.clone(), page);
    }

    Ok(by_slug.into_values().collect())
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

/// Parse one markdown file. Returns `Ok(None)` for drafts.
fn parse_page(path: &Path, rel: &Path) -> Result<Option<Page>, ScanError> {
    let content = fs::read_to_string(path)?;
    let (front, body) = split_front_matter(&content)
        .ok_or_else(|| ScanError::UnterminatedFrontMatter(rel.to_path_buf()))?;

    let front: FrontMatter = match front {
        Some(raw) => {
            toml::from_str(raw).map_err(|e| ScanError::FrontMatter(rel.to_path_buf(), e))?
        }
        None => FrontMatter::default(),
    };
    if front.draft {
        return Ok(None);
    }

    let slug = links::slugify_path(rel);
    let fallback_title = || {
        let stem = rel
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        links::display_title(&stem)
    };
    let title = front
        .title
        .filter(|t| !t.trim().is_empty())
        .or_else(|| first_heading(body))
        .unwrap_or_else(fallback_title);

    Ok(Some(Page {
        slug,
        title,
        tags: normalize_tags(&front.tags),
        date: front.date.map(|d| match d {
            toml::Value::String(s) => s,
            other => other.to_string(),
        }),
        description: front.description,
        body: body.to_string(),
        source_path: rel.to_string_lossy().replace('\\', "/"),
        links: extract_links(body),
    }))
}

/// Split `+++`-fenced front matter from the body.
///
/// Returns `None` when an opening fence has no closing fence.
fn split_front_matter(content: &str) -> Option<(Option<&str>, &str)> {
    let trimmed = content.trim_start_matches('\u{feff}');
    let Some(rest) = trimmed.strip_prefix(FRONT_MATTER_FENCE) else {
        return Some((None, trimmed));
    };
    let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FRONT_MATTER_FENCE {
            let front = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((Some(front), body));
        }
        offset += line.len();
    }
    None
}

fn first_heading(body: &str) -> Option<String> {
    body.lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line.trim_start_matches("# ").trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Tags become paths under `tags/`, so empty and dot-only segments are
/// dropped: `../../x` is the tag `x`.
fn normalize_tags(raw: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw {
        let tag = tag
            .trim()
            .trim_start_matches('#')
            .split(['/', '\\'])
            .map(links::slugify_segment)
            .filter(|segment| !segment.is_empty() && !segment.chars().all(|c| c == '.'))
            .collect::<Vec<_>>()
            .join("/");
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Destinations of every inline and reference link in `body`.
pub fn extract_links(body: &str) -> Vec<String> {
    Parser::new(body)
        .filter_map(|event| match event {
            Event::Start(Tag::Link { dest_url, .. }) => Some(dest_url.to_string()),
            _ => None,
        })
        .collect()
}
