use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

use review_page::config::{load_config, ReviewConfig};
use review_page::generate::{Generator, Options, OutputFormat};
use review_page::render::{CodeFormatter, Highlighter};
use review_page::scan::load_scan_dir;
use review_page::vcs::{parse_filter_expr, GitRepo, SvnRepo, Vcs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum VcsKind {
    Git,
    Svn,
}

/// Generate static HTML review pages for recent commits or revisions
#[derive(Parser)]
#[command(name = "review-page", version, about)]
struct Cli {
    /// Repository or working copy (defaults to current directory)
    repo: Option<PathBuf>,

    /// Output directory [config: output.dir]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Version control backend
    #[arg(long, value_enum, default_value = "git")]
    vcs: VcsKind,

    /// Generate a single commit / revision instead of the most recent ones
    #[arg(short, long)]
    revision: Option<String>,

    /// Number of recent changes to generate [config: output.count]
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Directory of analyzer JSON reports [config: scan.results_dir]
    #[arg(long)]
    scan_results: Option<PathBuf>,

    /// File filter expression (e.g. '+*.c,-*.lock,-deleted')
    #[arg(long)]
    filter: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "html")]
    format: OutputFormat,

    /// Disable syntax highlighting of code lines
    #[arg(long)]
    no_highlight: bool,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let dir = match &cli.repo {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let vcs: Box<dyn Vcs> = match cli.vcs {
        VcsKind::Git => Box::new(
            GitRepo::open(&dir).with_context(|| format!("Not a git repository: {}", dir.display()))?,
        ),
        VcsKind::Svn => {
            let config = load_config(&dir);
            Box::new(
                SvnRepo::open(&dir, config.svn.strip_prefixes)
                    .with_context(|| format!("Not an svn working copy: {}", dir.display()))?,
            )
        }
    };
    let config = load_config(vcs.root());

    let ids = match &cli.revision {
        Some(rev) => vec![rev.clone()],
        None => vcs
            .recent_changes(cli.count.unwrap_or(config.output.count))
            .context("Failed to list recent changes")?,
    };
    if ids.is_empty() {
        log::warn!("No changes found in {}", vcs.root().display());
    }

    let scan_issues = match scan_dir(&cli, &config, vcs.root()) {
        Some(scan_dir) => load_scan_dir(&scan_dir, &config.scan.path_markers),
        None => Vec::new(),
    };

    let formatter = if cli.no_highlight || !config.display.syntax_highlight {
        CodeFormatter::Plain
    } else {
        CodeFormatter::Highlighted(Highlighter::new(&config.display.theme))
    };

    let options = Options {
        out_dir: cli.output.clone().unwrap_or_else(|| PathBuf::from(&config.output.dir)),
        format: cli.format,
        context: config.context.window,
        expand_step: config.context.expand_step,
        filter: cli.filter.as_deref().map(parse_filter_expr).unwrap_or_default(),
    };

    let written = Generator::new(vcs.as_ref(), formatter, options, scan_issues).run(&ids)?;
    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}

/// Scan results directory from the CLI, else from config relative to the repo.
fn scan_dir(cli: &Cli, config: &ReviewConfig, root: &Path) -> Option<PathBuf> {
    cli.scan_results
        .clone()
        .or_else(|| config.scan.results_dir.as_ref().map(|d| root.join(d)))
}
