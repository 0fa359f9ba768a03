use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use oblog::build::build_site;
use oblog::config::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// The project directory; `oblog.yaml` is looked up here and in its
    /// parents
    #[arg(default_value = ".")]
    project_dir: PathBuf,

    /// Write the site here instead of the configured output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    let mut config = Config::from_directory(&cli.project_dir).with_context(|| {
        format!(
            "Failed to load configuration for {}",
            cli.project_dir.display()
        )
    })?;
    if let Some(output) = cli.output {
        config.output_directory = Some(output);
    }

    let summary = build_site(&config).context("Failed to build site")?;
    match &summary.latest {
        Some(latest) => info!(
            "Wrote {} posts ({} drafts); home page is {}",
            summary.posts, summary.drafts, latest
        ),
        None => info!(
            "Wrote {} posts ({} drafts); no public posts, so no home page",
            summary.posts, summary.drafts
        ),
    }
    Ok(())
}
