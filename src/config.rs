//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by the user's `config.toml` in the content root.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Notes"           # Shown in the page title and the sidebar heading
//! base_url = ""             # e.g. "https://notes.example.com", used for canonical links
//! locale = "en-US"          # <html lang>
//!
//! [explorer]
//! title = "Pages"
//! folder_default_state = "collapsed"   # or "open"
//! folder_click_behavior = "collapse"   # or "link"
//!
//! [[footer.links]]
//! label = "GitHub"
//! url = "https://github.com/ahawker"
//!
//! [colors.light]
//! background = "#faf8f8"
//! ...
//!
//! [processing]
//! max_processes = 4         # Max parallel render workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want:
//!
//! ```toml
//! [site]
//! title = "My Garden"
//! ```
//!
//! Tables merge key by key; arrays (such as `footer.links`) replace the
//! default array entirely. Unknown keys are rejected to catch typos early.

use crate::explorer::{ExplorerOptions, FolderClickBehavior, FolderState, explorer_sort};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity.
    pub site: SiteSection,
    /// Sidebar explorer settings.
    pub explorer: ExplorerConfig,
    /// Footer links.
    pub footer: FooterConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.title must not be empty".into(),
            ));
        }
        if self.explorer.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "explorer.title must not be empty".into(),
            ));
        }
        for (i, link) in self.footer.links.iter().enumerate() {
            if link.label.trim().is_empty() || link.url.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "footer.links[{i}] needs both label and url"
                )));
            }
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    pub title: String,
    /// Absolute site URL without trailing slash. Empty disables canonical links.
    pub base_url: String,
    /// BCP 47 locale tag.
    pub locale: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Notes".to_string(),
            base_url: String::new(),
            locale: "en-US".to_string(),
        }
    }
}

impl SiteSection {
    /// Primary language subtag for `<html lang>` (`en-US` → `en`).
    pub fn lang(&self) -> &str {
        self.locale.split(['-', '_']).next().unwrap_or("en")
    }
}

/// Explorer settings. The comparator itself is not configurable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExplorerConfig {
    pub title: String,
    pub folder_default_state: FolderState,
    pub folder_click_behavior: FolderClickBehavior,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            title: "Pages".to_string(),
            folder_default_state: FolderState::Collapsed,
            folder_click_behavior: FolderClickBehavior::Collapse,
        }
    }
}

impl ExplorerConfig {
    /// Explorer options for this config, ordered by [`explorer_sort`].
    pub fn options(&self) -> ExplorerOptions {
        ExplorerOptions {
            title: self.title.clone(),
            folder_default_state: self.folder_default_state,
            folder_click_behavior: self.folder_click_behavior,
            sort_fn: explorer_sort,
            ..ExplorerOptions::default()
        }
    }
}

/// One footer link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FooterLink {
    pub label: String,
    pub url: String,
}

impl FooterLink {
    pub fn new(label: &str, url: &str) -> Self {
        Self {
            label: label.to_string(),
            url: url.to_string(),
        }
    }
}

/// Footer links, rendered in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FooterConfig {
    pub links: Vec<FooterLink>,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            links: vec![
                FooterLink::new("GitHub", "https://github.com/ahawker"),
                FooterLink::new("Blog", "https://andrew.hawker.io"),
                FooterLink::new("LinkedIn", "https://linkedin.com/in/ahawker"),
                FooterLink::new("Email", "mailto:andrew.r.hawker@gmail.com"),
            ],
        }
    }
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background.
    pub background: String,
    /// Borders and explorer guides.
    pub border: String,
    /// Muted text: dates, meta lines, empty states.
    pub muted: String,
    /// Body text.
    pub text: String,
    /// Headings.
    pub heading: String,
    /// Links and the active explorer entry.
    pub link: String,
    /// Link hover.
    pub link_hover: String,
    /// Background of tags and code spans.
    pub highlight: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#faf8f8".to_string(),
            border: "#e5e5e5".to_string(),
            muted: "#b8b8b8".to_string(),
            text: "#4e4e4e".to_string(),
            heading: "#2b2b2b".to_string(),
            link: "#284b63".to_string(),
            link_hover: "#84a59d".to_string(),
            highlight: "rgba(143, 159, 169, 0.15)".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#161618".to_string(),
            border: "#393639".to_string(),
            muted: "#646464".to_string(),
            text: "#d4d4d4".to_string(),
            heading: "#ebebec".to_string(),
            link: "#7b97aa".to_string(),
            link_hover: "#84a59d".to_string(),
            highlight: "rgba(143, 159, 169, 0.15)".to_string(),
        }
    }

    fn css_variables(&self, indent: &str) -> String {
        [
            ("bg", &self.background),
            ("border", &self.border),
            ("muted", &self.muted),
            ("text", &self.text),
            ("heading", &self.heading),
            ("link", &self.link),
            ("link-hover", &self.link_hover),
            ("highlight", &self.highlight),
        ]
        .iter()
        .map(|(name, value)| format!("{indent}--color-{name}: {value};"))
        .collect::<Vec<_>>()
        .join("\n")
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# notegarden configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file at the root of the content directory.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Shown in the browser tab and at the top of the left sidebar.
title = "Notes"

# Absolute URL of the published site, without trailing slash.
# Leave empty to skip canonical links.
base_url = ""

# Language of the content, used for <html lang>.
locale = "en-US"

# ---------------------------------------------------------------------------
# Explorer (left sidebar file tree)
# ---------------------------------------------------------------------------
[explorer]
title = "Pages"

# "collapsed": folders start closed unless they contain the current page.
# "open": every folder starts expanded.
folder_default_state = "collapsed"

# "collapse": clicking a folder name toggles it.
# "link": clicking a folder name opens its listing page.
folder_click_behavior = "collapse"

# ---------------------------------------------------------------------------
# Footer links, rendered in this order
# ---------------------------------------------------------------------------
[[footer.links]]
label = "GitHub"
url = "https://github.com/ahawker"

[[footer.links]]
label = "Blog"
url = "https://andrew.hawker.io"

[[footer.links]]
label = "LinkedIn"
url = "https://linkedin.com/in/ahawker"

[[footer.links]]
label = "Email"
url = "mailto:andrew.r.hawker@gmail.com"

# ---------------------------------------------------------------------------
# Colors - Light mode
# ---------------------------------------------------------------------------
[colors.light]
background = "#faf8f8"
border = "#e5e5e5"
muted = "#b8b8b8"         # Dates, meta lines
text = "#4e4e4e"
heading = "#2b2b2b"
link = "#284b63"
link_hover = "#84a59d"
highlight = "rgba(143, 159, 169, 0.15)"

# ---------------------------------------------------------------------------
# Colors - Dark mode (toggle in the sidebar, or prefers-color-scheme)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#161618"
border = "#393639"
muted = "#646464"
text = "#d4d4d4"
heading = "#ebebec"
link = "#7b97aa"
link_hover = "#84a59d"
highlight = "rgba(143, 159, 169, 0.15)"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
///
/// The dark scheme applies when the page carries `data-theme="dark"`, which
/// the darkmode toggle sets (initially from `prefers-color-scheme`).
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        ":root {{\n{light}\n}}\n\n:root[data-theme=\"dark\"] {{\n{dark}\n}}",
        light = colors.light.css_variables("    "),
        dark = colors.dark.css_variables("    "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_site_and_explorer() {
        let config = SiteConfig::default();
        assert_eq!(config.site.title, "Notes");
        assert_eq!(config.explorer.title, "Pages");
        assert_eq!(config.explorer.folder_default_state, FolderState::Collapsed);
    }

    #[test]
    fn default_footer_links_in_order() {
        let config = SiteConfig::default();
        let labels: Vec<&str> = config
            .footer
            .links
            .iter()
            .map(|l| l.label.as_str())
            .collect();
        assert_eq!(labels, vec!["GitHub", "Blog", "LinkedIn", "Email"]);
    }

    #[test]
    fn explorer_options_use_explorer_sort() {
        let options = ExplorerConfig::default().options();
        assert_eq!(options.title, "Pages");
        assert!(options.filter_fn.is_some());
    }

    #[test]
    fn lang_from_locale() {
        let mut site = SiteSection::default();
        assert_eq!(site.lang(), "en");
        site.locale = "pt_BR".to_string();
        assert_eq!(site.lang(), "pt");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[site]
title = "Garden"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.site.title, "Garden");
        assert_eq!(config.site.locale, "en-US");
        assert_eq!(config.explorer.title, "Pages");
        assert_eq!(config.colors.light.background, "#faf8f8");
    }

    #[test]
    fn parse_explorer_settings() {
        let toml = r#"
[explorer]
title = "Files"
folder_default_state = "open"
folder_click_behavior = "link"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.explorer.title, "Files");
        assert_eq!(config.explorer.folder_default_state, FolderState::Open);
        assert_eq!(
            config.explorer.folder_click_behavior,
            FolderClickBehavior::Link
        );
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "Notes");
        assert_eq!(config.footer.links.len(), 4);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r##"
[colors.light]
background = "#123456"
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.colors.light.background, "#123456");
        assert_eq!(config.colors.light.text, "#4e4e4e");
        assert_eq!(config.colors.dark.background, "#161618");
    }

    #[test]
    fn footer_links_replace_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[[footer.links]]
label = "Mastodon"
url = "https://example.social/@me"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(
            config.footer.links,
            vec![FooterLink::new("Mastodon", "https://example.social/@me")]
        );
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[site]\ntitel = \"x\"\n");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[sidebar]\nwidth = 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_folder_state_rejected() {
        let result: Result<SiteConfig, _> =
            toml::from_str("[explorer]\nfolder_default_state = \"half\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_empty_titles() {
        let mut config = SiteConfig::default();
        config.site.title = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = SiteConfig::default();
        config.explorer.title = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("explorer.title"));
    }

    #[test]
    fn validate_footer_link_fields() {
        let mut config = SiteConfig::default();
        config.footer.links.push(FooterLink::new("Broken", ""));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("footer.links[4]"));
    }

    #[test]
    fn validate_zero_processes() {
        let mut config = SiteConfig::default();
        config.processing.max_processes = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[site]\ntitle = \"\"\n").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str(
            r##"
[colors.light]
background = "#fff"
text = "#000"
"##,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r##"
[colors.light]
background = "#fafafa"
"##,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let light = merged.get("colors").unwrap().get("light").unwrap();
        assert_eq!(light.get("background").unwrap().as_str(), Some("#fafafa"));
        assert_eq!(light.get("text").unwrap().as_str(), Some("#000"));
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value = toml::from_str("a = [1, 2, 3]").unwrap();
        let overlay: toml::Value = toml::from_str("a = [9]").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_array().unwrap().len(), 1);
    }

    #[test]
    fn merge_toml_preserves_base_keys() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("a = 10").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(10));
        assert_eq!(merged.get("b").unwrap().as_integer(), Some(2));
    }

    // =========================================================================
    // Processing config tests
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let threads = effective_threads(&ProcessingConfig {
            max_processes: None,
        });
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(threads, cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // stock config / CSS tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.site.title, defaults.site.title);
        assert_eq!(config.explorer.title, defaults.explorer.title);
        assert_eq!(config.footer.links, defaults.footer.links);
        assert_eq!(config.colors.dark.background, defaults.colors.dark.background);
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value().unwrap();
        for section in ["site", "explorer", "footer", "colors", "processing"] {
            assert!(val.get(section).is_some(), "missing [{section}]");
        }
    }

    #[test]
    fn generate_css_includes_both_schemes() {
        let mut colors = ColorConfig::default();
        colors.light.background = "#f0f0f0".to_string();
        colors.dark.background = "#1a1a1a".to_string();
        let css = generate_color_css(&colors);
        assert!(css.contains("--color-bg: #f0f0f0;"));
        assert!(css.contains("--color-bg: #1a1a1a;"));
        assert!(css.contains(":root[data-theme=\"dark\"]"));
        assert!(css.contains("--color-link-hover:"));
    }
}
