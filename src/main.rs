use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;
use notegarden::{config, generate, output, scan, site::Site};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "notegarden")]
#[command(about = "Static site generator for markdown notes")]
#[command(long_about = "\
Static site generator for markdown notes

Your folder of markdown files is the data source. Folders become sections of
the sidebar explorer, front matter adds titles, tags and dates, and links
between pages become backlinks.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── index.md                     # Home page (optional, else a listing)
  ├── apple.md                     # Page → apple.html
  ├── banana-folder/
  │   ├── index.md                 # Folder page (optional, else a listing)
  │   └── banana.md                # Page → banana-folder/banana.html
  └── .obsidian/                   # Hidden entries are skipped

Front matter (TOML between +++ fences):

  +++
  title = \"Apple\"
  tags = [\"fruit\", \"red\"]
  date = 2024-05-01
  draft = false
  +++

Run 'notegarden gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "public", global = true)]
    output: PathBuf,

    /// Log every scanned and generated file
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the content directory and render the site
    Build,
    /// Validate content directory without building
    Check,
    /// Print the explorer tree as the sidebar shows it
    Tree,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Build => {
            println!("==> Scanning {}", cli.source.display());
            let content = scan::scan(&cli.source)?;
            init_thread_pool(&content.config.processing);
            let site = Site::new(content);
            info!("{} pages, {} folders", site.pages.len(), site.folders().len());

            println!("==> Generating HTML → {}", cli.output.display());
            let report = generate::generate(&site, &cli.output)?;
            output::print_build_summary(&report, &site.unresolved);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let content = scan::scan(&cli.source)?;
            output::print_scan_output(&content, &cli.source);
            println!("==> Content is valid");
        }
        Command::Tree => {
            let content = scan::scan(&cli.source)?;
            let options = content.config.explorer.options();
            let tree = Site::new(content).tree.shaped(&options);
            output::print_explorer_tree(&options.title, &tree);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
