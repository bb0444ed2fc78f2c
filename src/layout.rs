//! Page layouts: which components appear where.
//!
//! A layout is plain data. [`SharedLayout`] holds the components every page
//! gets (head, header, after-body, footer); [`PageLayout`] holds the
//! per-archetype regions (before the body, left sidebar, right sidebar).
//! There are two archetypes: content pages (one markdown file) and list pages
//! (folder and tag listings).
//!
//! ```text
//! ┌────────────┬──────────────────────────┬──────────────┐
//! │ left       │ header                   │ right        │
//! │            │ before_body              │              │
//! │ PageTitle  │ ┌──────────────────────┐ │ TOC          │
//! │ Darkmode   │ │ article              │ │ Graph        │
//! │ Search     │ └──────────────────────┘ │ Backlinks    │
//! │ Explorer   │ after_body               │              │
//! ├────────────┴──────────────────────────┴──────────────┤
//! │ footer                                               │
//! └──────────────────────────────────────────────────────┘
//! ```

use crate::components::{self, RenderContext};
use crate::config::{FooterLink, SiteConfig};
use crate::explorer::{ExplorerOptions, FileNode};
use maud::{Markup, html};

/// Options of the footer component.
#[derive(Debug, Clone, PartialEq)]
pub struct FooterOptions {
    /// Rendered in order.
    pub links: Vec<FooterLink>,
}

/// The explorer component: its options and, once shaped for a site, the
/// tree every page renders.
#[derive(Debug, Clone)]
pub struct ExplorerPanel {
    pub options: ExplorerOptions,
    tree: Option<FileNode>,
}

impl ExplorerPanel {
    pub fn new(options: ExplorerOptions) -> Self {
        Self {
            options,
            tree: None,
        }
    }

    /// Apply the options to `tree` once; later renders reuse the result.
    pub fn shape(&mut self, tree: &FileNode) {
        self.tree = Some(tree.shaped(&self.options));
    }

    pub fn shaped_tree(&self) -> Option<&FileNode> {
        self.tree.as_ref()
    }

    fn render(&self, ctx: &RenderContext) -> Markup {
        match &self.tree {
            Some(tree) => components::explorer(ctx, &self.options, tree),
            None => components::explorer(ctx, &self.options, &ctx.site.tree.shaped(&self.options)),
        }
    }
}

/// A placeable page component.
#[derive(Debug, Clone)]
pub enum Component {
    Head,
    Footer(FooterOptions),
    Breadcrumbs,
    ArticleTitle,
    ContentMeta,
    TagList,
    PageTitle,
    Spacer,
    Darkmode,
    Search,
    Explorer(ExplorerPanel),
    TableOfContents,
    Graph,
    Backlinks,
    /// Shown only on narrow viewports.
    MobileOnly(Box<Component>),
    /// Shown only on wide viewports.
    DesktopOnly(Box<Component>),
}

impl Component {
    pub fn mobile_only(inner: Component) -> Self {
        Component::MobileOnly(Box::new(inner))
    }

    pub fn desktop_only(inner: Component) -> Self {
        Component::DesktopOnly(Box::new(inner))
    }

    pub fn render(&self, ctx: &RenderContext) -> Markup {
        match self {
            Component::Head => components::head(ctx),
            Component::Footer(options) => components::footer(&options.links),
            Component::Breadcrumbs => components::breadcrumbs(ctx),
            Component::ArticleTitle => components::article_title(ctx),
            Component::ContentMeta => components::content_meta(ctx),
            Component::TagList => components::tag_list(ctx),
            Component::PageTitle => components::page_title(ctx),
            Component::Spacer => components::spacer(),
            Component::Darkmode => components::darkmode(),
            Component::Search => components::search(),
            Component::Explorer(panel) => panel.render(ctx),
            Component::TableOfContents => components::table_of_contents(ctx),
            Component::Graph => components::graph(ctx),
            Component::Backlinks => components::backlinks(ctx),
            Component::MobileOnly(inner) => components::mobile_only(inner.render(ctx)),
            Component::DesktopOnly(inner) => components::desktop_only(inner.render(ctx)),
        }
    }

    /// Component name, wrappers shown as `DesktopOnly(Explorer)`.
    /// The explorer panel of this component, looking through wrappers.
    fn explorer_panel(&mut self) -> Option<&mut ExplorerPanel> {
        match self {
            Component::Explorer(panel) => Some(panel),
            Component::MobileOnly(inner) | Component::DesktopOnly(inner) => inner.explorer_panel(),
            _ => None,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Component::Head => "Head".into(),
            Component::Footer(_) => "Footer".into(),
            Component::Breadcrumbs => "Breadcrumbs".into(),
            Component::ArticleTitle => "ArticleTitle".into(),
            Component::ContentMeta => "ContentMeta".into(),
            Component::TagList => "TagList".into(),
            Component::PageTitle => "PageTitle".into(),
            Component::Spacer => "Spacer".into(),
            Component::Darkmode => "Darkmode".into(),
            Component::Search => "Search".into(),
            Component::Explorer(_) => "Explorer".into(),
            Component::TableOfContents => "TableOfContents".into(),
            Component::Graph => "Graph".into(),
            Component::Backlinks => "Backlinks".into(),
            Component::MobileOnly(inner) => format!("MobileOnly({})", inner.name()),
            Component::DesktopOnly(inner) => format!("DesktopOnly({})", inner.name()),
        }
    }
}

/// Render a region's components in order.
pub fn render_all(region: &[Component], ctx: &RenderContext) -> Markup {
    html! {
        @for component in region {
            (component.render(ctx))
        }
    }
}

/// Components shared across all pages.
#[derive(Debug, Clone)]
pub struct SharedLayout {
    pub head: Component,
    pub header: Vec<Component>,
    pub after_body: Vec<Component>,
    pub footer: Component,
}

/// Components of one page archetype.
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub before_body: Vec<Component>,
    pub left: Vec<Component>,
    pub right: Vec<Component>,
}

/// The three layouts a build renders with.
#[derive(Debug, Clone)]
pub struct Layouts {
    pub shared: SharedLayout,
    pub content: PageLayout,
    pub list: PageLayout,
}

impl Layouts {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            shared: shared_page_components(config),
            content: default_content_page_layout(config),
            list: default_list_page_layout(config),
        }
    }

    /// Layouts for one build, with every explorer shaped against `tree`.
    pub fn for_site(config: &SiteConfig, tree: &FileNode) -> Self {
        let mut layouts = Self::from_config(config);
        layouts.shape_explorers(tree);
        layouts
    }

    pub fn shape_explorers(&mut self, tree: &FileNode) {
        let shared = &mut self.shared;
        let regions = [
            &mut shared.header,
            &mut shared.after_body,
            &mut self.content.before_body,
            &mut self.content.left,
            &mut self.content.right,
            &mut self.list.before_body,
            &mut self.list.left,
            &mut self.list.right,
        ];
        let components = regions
            .into_iter()
            .flat_map(|region| region.iter_mut())
            .chain([&mut shared.head, &mut shared.footer]);
        for component in components {
            if let Some(panel) = component.explorer_panel() {
                panel.shape(tree);
            }
        }
    }
}

pub fn shared_page_components(config: &SiteConfig) -> SharedLayout {
    SharedLayout {
        head: Component::Head,
        header: vec![],
        after_body: vec![],
        footer: Component::Footer(FooterOptions {
            links: config.footer.links.clone(),
        }),
    }
}

/// Left sidebar shared by both archetypes.
fn left_sidebar(config: &SiteConfig) -> Vec<Component> {
    vec![
        Component::PageTitle,
        Component::mobile_only(Component::Spacer),
        Component::Darkmode,
        Component::Search,
        Component::desktop_only(Component::Explorer(ExplorerPanel::new(
            config.explorer.options(),
        ))),
    ]
}

/// Layout of a page showing a single piece of content.
pub fn default_content_page_layout(config: &SiteConfig) -> PageLayout {
    PageLayout {
        before_body: vec![
            Component::Breadcrumbs,
            Component::ArticleTitle,
            Component::ContentMeta,
            Component::TagList,
        ],
        left: left_sidebar(config),
        right: vec![
            Component::desktop_only(Component::TableOfContents),
            Component::Graph,
            Component::Backlinks,
        ],
    }
}

/// Layout of a page listing other pages (folders, tags).
pub fn default_list_page_layout(config: &SiteConfig) -> PageLayout {
    PageLayout {
        before_body: vec![
            Component::Breadcrumbs,
            Component::ArticleTitle,
            Component::ContentMeta,
        ],
        left: left_sidebar(config),
        right: vec![],
    }
}
