//! HTML rendering of the page components.
//!
//! Each function renders one component for one page. All of them read the
//! shared [`Site`] immutably, so pages can be rendered from any thread.
//!
//! ## Components
//!
//! | Function | Renders |
//! |----------|---------|
//! | [`head`] | `<head>` contents: meta tags, stylesheet, scripts |
//! | [`breadcrumbs`] | Home › folders › page trail |
//! | [`article_title`] | The page's `<h1>` |
//! | [`content_meta`] | Date and reading time, or the item count of a list page |
//! | [`tag_list`] | Links to the page's tag pages |
//! | [`page_title`] | Site title linking home |
//! | [`spacer`] | Empty flexible gap |
//! | [`darkmode`] | Light/dark toggle button |
//! | [`search`] | Search box filled from `static/contentIndex.json` |
//! | [`explorer`] | The file tree, shaped by [`ExplorerOptions`] |
//! | [`table_of_contents`] | Heading outline of a content page |
//! | [`graph`] | Pages linked to or from this one |
//! | [`backlinks`] | Pages linking here |
//! | [`footer`] | Version line and footer links |
//!
//! Uses [maud](https://maud.lambda.xyz/), which escapes all interpolated text.

use crate::config::FooterLink;
use crate::explorer::{ExplorerOptions, FileNode, FolderClickBehavior, FolderState};
use crate::links;
use crate::markdown::Heading;
use crate::scan::Page;
use crate::site::Site;
use maud::{Markup, PreEscaped, html};

/// Words per minute used for the reading-time estimate.
pub const WORDS_PER_MINUTE: usize = 200;

/// Sets `data-theme` before first paint so dark mode doesn't flash.
const THEME_BOOTSTRAP: &str = r#"(function(){var t=localStorage.getItem("theme");if(!t){t=window.matchMedia("(prefers-color-scheme: dark)").matches?"dark":"light"}document.documentElement.setAttribute("data-theme",t)})();"#;

/// What kind of page is being rendered.
#[derive(Debug, Clone)]
pub enum PageKind<'a> {
    /// A markdown page.
    Content(&'a Page),
    /// Listing of a folder without its own `index.md`.
    Folder {
        folder: &'a str,
        entries: Vec<&'a Page>,
    },
    /// Listing of the pages carrying one tag.
    Tag { tag: &'a str, entries: Vec<&'a Page> },
    /// Listing of every tag.
    TagIndex { tags: Vec<(&'a str, usize)> },
}

impl PageKind<'_> {
    pub fn is_list(&self) -> bool {
        !matches!(self, PageKind::Content(_))
    }
}

/// Everything a component may look at while rendering one page.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub site: &'a Site,
    /// Slug of the page being rendered (`notes/index` for the notes folder page).
    pub slug: &'a str,
    pub title: String,
    pub kind: PageKind<'a>,
    /// Headings of the rendered body, empty for list pages.
    pub toc: &'a [Heading],
}

impl RenderContext<'_> {
    /// Folder the page lives in, for breadcrumbs and explorer expansion.
    /// A folder page lives in its parent.
    fn location(&self) -> &str {
        match links::folder_of_index(self.slug) {
            Some(folder) => links::parent_folder(folder),
            None => links::parent_folder(self.slug),
        }
    }
}

// ============================================================================
// Head and footer
// ============================================================================

pub fn head(ctx: &RenderContext) -> Markup {
    let site = &ctx.site.config.site;
    let description = match &ctx.kind {
        PageKind::Content(page) => page.description.as_deref(),
        _ => None,
    };
    let full_title = if ctx.slug == links::INDEX {
        site.title.clone()
    } else {
        format!("{} | {}", ctx.title, site.title)
    };
    html! {
        meta charset="utf-8";
        title { (full_title) }
        meta name="viewport" content="width=device-width, initial-scale=1.0";
        meta property="og:title" content=(ctx.title);
        @if let Some(description) = description {
            meta name="description" content=(description);
            meta property="og:description" content=(description);
        }
        @if !site.base_url.is_empty() {
            link rel="canonical" href={ (site.base_url.trim_end_matches('/')) (links::href(ctx.slug)) };
        }
        link rel="stylesheet" href="/index.css";
        script { (PreEscaped(THEME_BOOTSTRAP)) }
        script src="/script.js" defer {}
    }
}

pub fn footer(links: &[FooterLink]) -> Markup {
    html! {
        footer {
            p { "Created with notegarden v" (env!("CARGO_PKG_VERSION")) }
            ul {
                @for link in links {
                    li { a href=(link.url) { (link.label) } }
                }
            }
        }
    }
}

// ============================================================================
// Article header
// ============================================================================

/// Home › folder › subfolder › page. Nothing on the home page.
pub fn breadcrumbs(ctx: &RenderContext) -> Markup {
    if ctx.slug == links::INDEX {
        return html! {};
    }
    let location = ctx.location();
    let mut folders = Vec::new();
    if !location.is_empty() {
        let mut prefix = String::new();
        for segment in location.split('/') {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);
            folders.push((ctx.site.folder_title(&prefix), links::folder_href(&prefix)));
        }
    }
    html! {
        nav.breadcrumb-container aria-label="breadcrumbs" {
            div.breadcrumb-element {
                a href="/" { "Home" }
                p { " ❯ " }
            }
            @for (title, href) in &folders {
                div.breadcrumb-element {
                    a href=(href) { (title) }
                    p { " ❯ " }
                }
            }
            div.breadcrumb-element {
                span.current { (ctx.title) }
            }
        }
    }
}

pub fn article_title(ctx: &RenderContext) -> Markup {
    html! {
        h1.article-title { (ctx.title) }
    }
}

/// Estimated minutes to read `words`, never less than one.
pub fn reading_minutes(words: usize) -> usize {
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

pub fn content_meta(ctx: &RenderContext) -> Markup {
    let parts: Vec<String> = match &ctx.kind {
        PageKind::Content(page) => {
            let mut parts = Vec::new();
            if let Some(date) = &page.date {
                parts.push(date.clone());
            }
            parts.push(format!("{} min read", reading_minutes(page.word_count())));
            parts
        }
        PageKind::Folder { entries, .. } => {
            vec![count_label(entries.len(), "item under this folder", "items under this folder")]
        }
        PageKind::Tag { entries, .. } => {
            vec![count_label(entries.len(), "item with this tag", "items with this tag")]
        }
        PageKind::TagIndex { tags } => vec![count_label(tags.len(), "tag", "tags")],
    };
    html! {
        p.content-meta { (parts.join(", ")) }
    }
}

fn count_label(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("1 {one}")
    } else {
        format!("{n} {many}")
    }
}

pub fn tag_list(ctx: &RenderContext) -> Markup {
    let tags = match &ctx.kind {
        PageKind::Content(page) if !page.tags.is_empty() => &page.tags,
        _ => return html! {},
    };
    html! {
        ul.tags {
            @for tag in tags {
                li { a.internal.tag-link href=(links::href(&links::tag_slug(tag))) { "#" (tag) } }
            }
        }
    }
}

// ============================================================================
// Sidebar
// ============================================================================

pub fn page_title(ctx: &RenderContext) -> Markup {
    html! {
        h2.page-title { a href="/" { (ctx.site.config.site.title) } }
    }
}

pub fn spacer() -> Markup {
    html! { div.spacer {} }
}

pub fn darkmode() -> Markup {
    html! {
        button.darkmode type="button" aria-label="Toggle dark mode" {
            span.light-label { "Light mode" }
            span.dark-label { "Dark mode" }
        }
    }
}

pub fn search() -> Markup {
    html! {
        div.search {
            input.search-bar type="search" placeholder="Search" aria-label="Search pages";
            ul.search-results hidden {}
        }
    }
}

/// The file tree. `tree` is the site tree already shaped by `options`.
pub fn explorer(ctx: &RenderContext, options: &ExplorerOptions, tree: &FileNode) -> Markup {
    html! {
        nav.explorer {
            h2 { (options.title) }
            ul.explorer-ul {
                @for child in &tree.children {
                    (explorer_node(child, ctx, options))
                }
            }
        }
    }
}

fn explorer_node(node: &FileNode, ctx: &RenderContext, options: &ExplorerOptions) -> Markup {
    if !node.is_directory() {
        let active = node.slug == ctx.slug;
        return html! {
            li { a.active[active] href=(links::href(&node.slug)) { (node.display_name) } }
        };
    }
    let own_page = links::folder_index_slug(&node.slug);
    let open = options.folder_default_state == FolderState::Open
        || node.contains_slug(ctx.slug)
        || own_page == ctx.slug;
    html! {
        li.folder {
            details open[open] {
                summary {
                    @match options.folder_click_behavior {
                        FolderClickBehavior::Link => {
                            a.folder-title.active[own_page == ctx.slug] href=(links::folder_href(&node.slug)) {
                                (node.display_name)
                            }
                        }
                        FolderClickBehavior::Collapse => {
                            span.folder-title { (node.display_name) }
                        }
                    }
                }
                ul {
                    @for child in &node.children {
                        (explorer_node(child, ctx, options))
                    }
                }
            }
        }
    }
}

pub fn table_of_contents(ctx: &RenderContext) -> Markup {
    if ctx.toc.is_empty() {
        return html! {};
    }
    let top = ctx.toc.iter().map(|h| h.depth).min().unwrap_or(1);
    html! {
        details.toc open {
            summary { h3 { "Table of Contents" } }
            ul {
                @for heading in ctx.toc {
                    li class={ "depth-" (heading.depth - top) } {
                        a href={ "#" (heading.id) } { (heading.text) }
                    }
                }
            }
        }
    }
}

/// Local graph: every page this one links to or is linked from.
pub fn graph(ctx: &RenderContext) -> Markup {
    let neighbors = ctx.site.links.neighbors(ctx.slug);
    html! {
        div.graph data-slug=(ctx.slug) {
            h3 { "Graph View" }
            ul.graph-neighbors {
                @for slug in neighbors.iter().copied() {
                    li { a href=(links::href(slug)) { (ctx.site.title_of(slug).unwrap_or(slug)) } }
                }
            }
        }
    }
}

pub fn backlinks(ctx: &RenderContext) -> Markup {
    let sources: Vec<&str> = ctx.site.links.backlinks(ctx.slug).collect();
    html! {
        div.backlinks {
            h3 { "Backlinks" }
            ul {
                @if sources.is_empty() {
                    li { "No backlinks found" }
                }
                @for slug in sources.iter().copied() {
                    li { a.internal href=(links::href(slug)) { (ctx.site.title_of(slug).unwrap_or(slug)) } }
                }
            }
        }
    }
}

pub fn mobile_only(inner: Markup) -> Markup {
    html! { div.mobile-only { (inner) } }
}

pub fn desktop_only(inner: Markup) -> Markup {
    html! { div.desktop-only { (inner) } }
}

// ============================================================================
// List page bodies
// ============================================================================

/// Body of a list page: the entries, or every tag on the tag index.
pub fn listing(ctx: &RenderContext) -> Markup {
    match &ctx.kind {
        PageKind::Content(_) => html! {},
        PageKind::Folder { entries, .. } | PageKind::Tag { entries, .. } => page_listing(entries),
        PageKind::TagIndex { tags } => html! {
            ul.section-ul {
                @for (tag, count) in tags {
                    li.section-li {
                        a.internal.tag-link href=(links::href(&links::tag_slug(tag))) { "#" (tag) }
                        " " span.count { "(" (count) ")" }
                    }
                }
            }
        },
    }
}

fn page_listing(entries: &[&Page]) -> Markup {
    html! {
        ul.section-ul {
            @for page in entries {
                li.section-li {
                    div.section {
                        p.meta { (page.date.as_deref().unwrap_or("")) }
                        div.desc {
                            h3 { a.internal href=(links::href(&page.slug)) { (page.title) } }
                        }
                        @if !page.tags.is_empty() {
                            ul.tags {
                                @for tag in &page.tags {
                                    li { a.internal.tag-link href=(links::href(&links::tag_slug(tag))) { "#" (tag) } }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
