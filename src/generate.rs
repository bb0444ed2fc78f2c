//! HTML site generation.
//!
//! Takes the assembled [`Site`] and writes the final static site. Every page
//! is rendered through the declared [`Layouts`]: markdown pages with the
//! content layout, folder and tag listings with the list layout.
//!
//! ## Generated Pages
//!
//! - **Content pages** (`/{slug}.html`): one per markdown file
//! - **Folder pages** (`/{folder}/index.html`): listing of the folder's pages,
//!   unless the folder has its own `index.md`, which is rendered there instead
//! - **Home** (`/index.html`): the root `index.md`, or a listing of everything
//! - **Tag pages** (`/tags/{tag}.html`) and the tag index (`/tags/index.html`)
//!
//! ## Output Structure
//!
//! ```text
//! public/
//! ├── index.html
//! ├── index.css                  # Color variables + static/style.css
//! ├── script.js                  # Dark mode, search, explorer state
//! ├── apple.html
//! ├── banana-folder/
//! │   ├── index.html             # From banana-folder/index.md
//! │   └── banana.html
//! ├── Zebra-folder/
//! │   ├── index.html             # Generated listing
//! │   ├── file2.html
//! │   └── file10.html
//! ├── tags/
//! │   ├── index.html
//! │   └── fruit.html
//! └── static/
//!     └── contentIndex.json      # Search index
//! ```
//!
//! Pages are rendered in parallel with [rayon](https://docs.rs/rayon); the
//! site is only read while rendering.

use crate::components::{self, PageKind, RenderContext};
use crate::config;
use crate::layout::{Layouts, render_all};
use crate::links;
use crate::markdown::{self, Heading};
use crate::scan::Page;
use crate::site::Site;
use log::{debug, info, warn};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{first} and {second} would both be written to {slug}.html")]
    DuplicateOutput {
        slug: String,
        first: String,
        second: String,
    },
    #[error("{0} would be written outside the output directory")]
    UnsafeOutput(String),
}

/// What a build wrote.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub content_pages: usize,
    pub folder_pages: usize,
    pub tag_pages: usize,
    pub unresolved_links: usize,
    pub output_dir: PathBuf,
}

impl BuildReport {
    pub fn total_pages(&self) -> usize {
        self.content_pages + self.folder_pages + self.tag_pages
    }
}

/// One entry of `static/contentIndex.json`.
#[derive(Debug, Serialize)]
pub struct ContentIndexEntry<'a> {
    pub title: &'a str,
    pub tags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<&'a str>,
    pub links: Vec<&'a str>,
    pub content: String,
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/script.js");

/// Slug of the tag index page.
pub const TAG_INDEX: &str = "tags/index";

/// A page to render.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderJob<'a> {
    Content(&'a Page),
    /// Listing of a folder (`""` for the root).
    Folder(&'a str),
    Tag(&'a str),
    TagIndex,
}

impl RenderJob<'_> {
    pub fn slug(&self) -> String {
        match self {
            RenderJob::Content(page) => page.slug.clone(),
            RenderJob::Folder(folder) => links::folder_index_slug(folder),
            RenderJob::Tag(tag) => links::tag_slug(tag),
            RenderJob::TagIndex => TAG_INDEX.to_string(),
        }
    }

    /// What produces this page, for error messages.
    pub fn describe(&self) -> String {
        match self {
            RenderJob::Content(page) => page.source_path.clone(),
            RenderJob::Folder("") => "the root listing".to_string(),
            RenderJob::Folder(folder) => format!("the listing of folder '{folder}'"),
            RenderJob::Tag(tag) => format!("the page of tag '{tag}'"),
            RenderJob::TagIndex => "the tag index".to_string(),
        }
    }
}

/// Every page the site produces.
pub fn render_jobs(site: &Site) -> Vec<RenderJob<'_>> {
    let mut jobs: Vec<RenderJob> = site.pages.iter().map(RenderJob::Content).collect();

    if site.page(links::INDEX).is_none() {
        jobs.push(RenderJob::Folder(""));
    }
    for folder in site.folders() {
        if folder != "tags" && site.page(&links::folder_index_slug(folder)).is_none() {
            jobs.push(RenderJob::Folder(folder));
        }
    }

    let tags = site.tags();
    if !tags.is_empty() {
        jobs.push(RenderJob::TagIndex);
        jobs.extend(tags.into_keys().map(RenderJob::Tag));
    }
    jobs
}

/// Reject jobs that would overwrite each other or escape the output directory.
///
/// Jobs are written in parallel, so two jobs with one slug would leave
/// whichever finished last.
pub fn check_outputs(jobs: &[RenderJob]) -> Result<(), GenerateError> {
    let mut seen: HashMap<String, &RenderJob> = HashMap::with_capacity(jobs.len());
    for job in jobs {
        let slug = job.slug();
        if slug
            .split('/')
            .any(|segment| segment.is_empty() || segment.chars().all(|c| c == '.'))
        {
            return Err(GenerateError::UnsafeOutput(slug));
        }
        if let Some(first) = seen.get(&slug) {
            return Err(GenerateError::DuplicateOutput {
                first: first.describe(),
                second: job.describe(),
                slug,
            });
        }
        seen.insert(slug, job);
    }
    Ok(())
}

pub fn generate(site: &Site, output_dir: &Path) -> Result<BuildReport, GenerateError> {
    let jobs = render_jobs(site);
    check_outputs(&jobs)?;

    let layouts = Layouts::for_site(&site.config, &site.tree);
    fs::create_dir_all(output_dir)?;

    for link in &site.unresolved {
        warn!("{}: link to '{}' does not match any page", link.from, link.dest);
    }

    info!("Rendering {} pages", jobs.len());
    jobs.par_iter()
        .map(|job| -> Result<(), GenerateError> {
            let slug = job.slug();
            let html = render_job(site, &layouts, job, &slug);
            let path = output_dir.join(links::output_path(&slug));
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, html.into_string())?;
            debug!("Generated {}", path.display());
            Ok(())
        })
        .collect::<Result<Vec<()>, GenerateError>>()?;

    let css = format!(
        "{}\n\n{}",
        config::generate_color_css(&site.config.colors),
        CSS_STATIC
    );
    fs::write(output_dir.join("index.css"), css)?;
    fs::write(output_dir.join("script.js"), JS)?;
    write_content_index(site, output_dir)?;

    let mut report = BuildReport {
        unresolved_links: site.unresolved.len(),
        output_dir: output_dir.to_path_buf(),
        ..BuildReport::default()
    };
    for job in &jobs {
        match job {
            RenderJob::Content(_) => report.content_pages += 1,
            RenderJob::Folder(_) => report.folder_pages += 1,
            RenderJob::Tag(_) | RenderJob::TagIndex => report.tag_pages += 1,
        }
    }
    info!("Site generated at {}", output_dir.display());
    Ok(report)
}

fn write_content_index(site: &Site, output_dir: &Path) -> Result<(), GenerateError> {
    let index: BTreeMap<&str, ContentIndexEntry> = site
        .pages
        .iter()
        .map(|page| {
            let entry = ContentIndexEntry {
                title: &page.title,
                tags: &page.tags,
                date: page.date.as_deref(),
                links: site.links.outlinks(&page.slug).collect(),
                content: markdown::plain_text(&page.body),
            };
            (page.slug.as_str(), entry)
        })
        .collect();
    let dir = output_dir.join("static");
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("contentIndex.json"), serde_json::to_string(&index)?)?;
    Ok(())
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_job(site: &Site, layouts: &Layouts, job: &RenderJob, slug: &str) -> Markup {
    match job {
        RenderJob::Content(page) => {
            let rendered = markdown::render(&page.slug, &page.body);
            render_page(
                site,
                layouts,
                slug,
                page.title.clone(),
                PageKind::Content(page),
                &rendered.html,
                &rendered.headings,
            )
        }
        RenderJob::Folder(folder) => {
            let title = if folder.is_empty() {
                site.config.site.title.clone()
            } else {
                site.folder_title(folder)
            };
            let kind = PageKind::Folder {
                folder,
                entries: site.pages_in_folder(folder),
            };
            render_page(site, layouts, slug, title, kind, "", &[])
        }
        RenderJob::Tag(tag) => {
            let kind = PageKind::Tag {
                tag,
                entries: site.pages_tagged(tag),
            };
            render_page(site, layouts, slug, format!("Tag: {tag}"), kind, "", &[])
        }
        RenderJob::TagIndex => {
            let kind = PageKind::TagIndex {
                tags: site.tags().into_iter().collect(),
            };
            render_page(site, layouts, slug, "All tags".to_string(), kind, "", &[])
        }
    }
}

/// Lay one page out: sidebars, article header, body, footer.
fn render_page(
    site: &Site,
    layouts: &Layouts,
    slug: &str,
    title: String,
    kind: PageKind,
    body_html: &str,
    toc: &[Heading],
) -> Markup {
    let layout = if kind.is_list() {
        &layouts.list
    } else {
        &layouts.content
    };
    let ctx = RenderContext {
        site,
        slug,
        title,
        kind,
        toc,
    };
    let shared = &layouts.shared;
    let content = html! {
        div #garden-body {
            div.left.sidebar { (render_all(&layout.left, &ctx)) }
            div.center {
                div.page-header {
                    header { (render_all(&shared.header, &ctx)) }
                    div.popover-hint { (render_all(&layout.before_body, &ctx)) }
                }
                article.popover-hint {
                    (PreEscaped(body_html))
                    (components::listing(&ctx))
                }
                hr;
                div.page-footer { (render_all(&shared.after_body, &ctx)) }
            }
            div.right.sidebar { (render_all(&layout.right, &ctx)) }
        }
        (shared.footer.render(&ctx))
    };
    base_document(site.config.site.lang(), shared.head.render(&ctx), slug, content)
}

/// Renders the base HTML document structure
fn base_document(lang: &str, head: Markup, slug: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(lang) {
            head { (head) }
            body data-slug=(slug) {
                div #garden-root.page {
                    (content)
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
