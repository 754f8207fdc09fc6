//! Headless preview: load a page, run its lifecycle and report what the
//! interaction layer did.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use timeless_config::SiteConfig;
use timeless_dom::Document;
use timeless_page::{Page, PageEvent, PageOptions, StepOutcome};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "timeless")]
#[command(version, about = "Run the Timeless Partners page scripts against an HTML file")]
struct Cli {
    /// HTML page to load
    page: PathBuf,

    /// Site configuration (defaults to ./timeless.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// URL fragment present at load, without the `#`
    #[arg(long)]
    fragment: Option<String>,

    /// Milliseconds to run after the load event
    #[arg(long, default_value_t = 5000.0)]
    run_ms: f64,

    /// Footer year instead of the current one
    #[arg(long)]
    year: Option<i32>,

    /// Print the resulting document to stdout
    #[arg(long)]
    dump: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SiteConfig::load_from_file(path)?,
        None => SiteConfig::load_or_default(),
    };
    let mut doc = Document::from_file(&cli.page)
        .with_context(|| format!("loading {}", cli.page.display()))?;
    if let Some(fragment) = cli.fragment.as_deref() {
        doc.set_fragment(Some(fragment));
    }

    let mut page = Page::new(doc, config).with_options(PageOptions { year: cli.year });
    page.dispatch(PageEvent::DomContentLoaded);
    page.dispatch(PageEvent::Load);
    page.advance(cli.run_ms);

    for (step, outcome) in page.init_report().steps() {
        match outcome {
            StepOutcome::Done => info!(step, "ready"),
            StepOutcome::Skipped(reason) => info!(step, %reason, "skipped"),
            StepOutcome::Failed(reason) => warn!(step, %reason, "failed"),
        }
    }
    info!(
        drawer = ?page.drawer_state(),
        scroll_y = page.document().viewport().scroll_y(),
        listeners = page.listeners().len(),
        settled = page.is_settled(),
        elapsed_ms = page.now_ms(),
        "preview finished"
    );

    if cli.dump {
        let doc = page.document();
        println!("{}", doc.outer_html(doc.root()));
    }
    Ok(())
}
