//! Markdown to HTML with heading anchors and internal link rewriting.
//!
//! Uses [pulldown-cmark](https://docs.rs/pulldown-cmark). Every heading gets
//! an `id` (kept if the source sets one with `{#id}`), collected into the
//! table of contents. Links to other pages (`notes/a.md`, `../b.md`,
//! `folder/`) are rewritten to their published URLs.

use crate::links;
use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use std::collections::HashSet;

/// A heading collected for the table of contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    /// 1 for `#`, 6 for `######`.
    pub depth: usize,
    pub text: String,
    pub id: String,
}

#[derive(Debug, Clone)]
pub struct RenderedMarkdown {
    pub html: String,
    pub headings: Vec<Heading>,
}

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options
}

/// Render the body of the page at `slug`.
pub fn render(slug: &str, body: &str) -> RenderedMarkdown {
    let mut events: Vec<Event> = Parser::new_ext(body, options())
        .map(|event| rewrite_link(slug, event))
        .collect();

    let mut headings = Vec::new();
    let mut used_ids = HashSet::new();
    let mut open: Option<(usize, usize, String)> = None;

    for i in 0..events.len() {
        let closes_heading = match &events[i] {
            Event::Start(Tag::Heading { level, .. }) => {
                open = Some((i, heading_depth(*level), String::new()));
                false
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, buf)) = open.as_mut() {
                    buf.push_str(text);
                }
                false
            }
            Event::End(TagEnd::Heading(_)) => true,
            _ => false,
        };
        if !closes_heading {
            continue;
        }
        let Some((start, depth, text)) = open.take() else {
            continue;
        };
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[start] {
            if id.is_none() {
                *id = Some(CowStr::from(unique_anchor(&text, &mut used_ids)));
            }
            let anchor_id = id.as_ref().map(|s| s.to_string()).unwrap_or_default();
            used_ids.insert(anchor_id.clone());
            headings.push(Heading {
                depth,
                text: text.trim().to_string(),
                id: anchor_id,
            });
        }
    }

    let mut out = String::new();
    html::push_html(&mut out, events.into_iter());
    RenderedMarkdown {
        html: out,
        headings,
    }
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn rewrite_link<'a>(slug: &str, event: Event<'a>) -> Event<'a> {
    match event {
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => {
            let dest_url = match links::resolve_link(slug, &dest_url) {
                Some(target) => {
                    let fragment = dest_url
                        .split_once('#')
                        .map(|(_, f)| format!("#{f}"))
                        .unwrap_or_default();
                    CowStr::from(format!("{}{fragment}", links::href(&target)))
                }
                None => dest_url,
            };
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            })
        }
        other => other,
    }
}

/// Heading text to an anchor id: lowercase alphanumerics, spaces as dashes.
pub fn anchor(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.trim().chars() {
        if c.is_alphanumeric() || c == '_' {
            out.extend(c.to_lowercase());
        } else if (c.is_whitespace() || c == '-') && !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

fn unique_anchor(text: &str, used: &mut HashSet<String>) -> String {
    let base = match anchor(text) {
        a if a.is_empty() => "section".to_string(),
        a => a,
    };
    if !used.contains(&base) {
        return base;
    }
    (1..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !used.contains(candidate))
        .unwrap_or(base)
}

/// Text content of a markdown body, for the search index.
pub fn plain_text(body: &str) -> String {
    let mut out = String::new();
    for event in Parser::new_ext(body, options()) {
        match event {
            Event::Text(text) | Event::Code(text) => {
                out.push(' ');
                out.push_str(&text);
            }
            Event::SoftBreak | Event::HardBreak | Event::End(_) => out.push(' '),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
