//! # notegarden
//!
//! A small static site generator for markdown notes. A folder of `.md` files
//! becomes a site with a sidebar file explorer, breadcrumbs, tag pages,
//! backlinks and a search index. Pages are assembled from declared layouts:
//! lists of components placed into fixed regions of the page.
//!
//! # Architecture: Scan → Assemble → Generate
//!
//! ```text
//! 1. Scan      content/  →  Content   (markdown + front matter + config.toml)
//! 2. Assemble  Content   →  Site      (explorer tree, link graph, tags)
//! 3. Generate  Site      →  public/   (HTML through the layouts, CSS, JS, search index)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the content directory and parses pages and front matter |
//! | [`site`] | The assembled site shared by every render |
//! | [`explorer`] | File tree, its ordering function, and the filter/map/sort pipeline |
//! | [`collation`] | Case- and accent-insensitive, numeric-aware name comparison |
//! | [`layout`] | Components and the declared shared, content and list layouts |
//! | [`components`] | HTML of each component, rendered with Maud |
//! | [`markdown`] | Markdown to HTML with heading anchors and link rewriting |
//! | [`links`] | Slugs, URLs, link resolution and the backlink graph |
//! | [`generate`] | Renders every page in parallel and writes the site |
//! | [`config`] | `config.toml` loading, validation, merging and CSS generation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Explorer Ordering
//!
//! Folders come before files; within each group entries are ordered by
//! display name, ignoring case and accents and comparing digit runs as
//! numbers, so `file2` precedes `file10` and `café` ties with `CAFE`.
//! See [`explorer::explorer_sort`].
//!
//! ## Layouts Are Data
//!
//! A layout is a struct of `Vec<Component>`. Rendering is one `match` in
//! [`layout::Component::render`]; there is no trait object or registry.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): malformed markup
//! is a build error and all interpolation is escaped.

pub mod collation;
pub mod components;
pub mod config;
pub mod explorer;
pub mod generate;
pub mod layout;
pub mod links;
pub mod markdown;
pub mod output;
pub mod scan;
pub mod site;

#[cfg(test)]
pub(crate) mod test_helpers;
