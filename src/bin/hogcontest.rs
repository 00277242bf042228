//! Full contest pipeline: convert submissions, run the tournament, render
//! the rankings page.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use time::{format_description, OffsetDateTime};

use hog_contest::prelude::*;
use hog_contest::report;

#[derive(Parser)]
#[command(
    name = "hogcontest",
    about = "Runs the Hog contest end to end: convert submissions, play the tournament, \
             render the rankings page"
)]
struct Cli {
    /// Submission files or directories (scanned non-recursively)
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Tournament runner binary
    #[arg(long, default_value = "bacon")]
    runner: PathBuf,

    /// Directory converted artifacts are written to
    #[arg(long, default_value = "strat")]
    strat_dir: PathBuf,

    /// Results file the runner writes
    #[arg(short = 'o', long, default_value = "results.txt")]
    results: PathBuf,

    /// Worker threads for the runner (default: physical CPU count)
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// HTML template to render the rankings into
    #[arg(long)]
    template: Option<PathBuf>,

    /// Rendered rankings page
    #[arg(long, default_value = "hog.html")]
    report: PathBuf,

    /// Suppress per-submission progress output
    #[arg(short, long)]
    quiet: bool,

    /// Log diagnostics to a timestamped file instead of stderr
    #[arg(long)]
    log: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !cli.log {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .init();
    }

    let mut config = Configuration::from_env();
    if cli.quiet {
        config = config.with_verbose(false);
    }
    if cli.log {
        config = config.with_log(true);
    }

    // stale artifacts from an earlier run must not compete again
    clear_stale_artifacts(&cli.strat_dir)?;

    let summary = BatchConverter::new(config, &cli.strat_dir).run(&cli.paths);
    println!(
        "converted {} of {} submissions",
        summary.converted, summary.attempted
    );
    if summary.converted == 0 {
        anyhow::bail!("no strategies were converted; nothing to run");
    }

    let mut runner = TournamentRunner::new(&cli.runner);
    if let Some(threads) = cli.threads {
        runner = runner.with_threads(threads);
    }
    runner.run(&summary.artifacts, &cli.results)?;
    println!("results saved to {}", cli.results.display());

    if let Some(template_path) = &cli.template {
        render(template_path, &cli.results, &cli.report)?;
        println!("rankings page saved to {}", cli.report.display());
    }

    if !summary.unnamed.is_empty() {
        eprintln!(
            "WARNING: some teams {:?} did not specify team names in their submissions!",
            summary.unnamed
        );
    }

    Ok(())
}

fn render(template_path: &Path, results_path: &Path, report_path: &Path) -> anyhow::Result<()> {
    let template = std::fs::read_to_string(template_path)
        .with_context(|| format!("can't read template {}", template_path.display()))?;
    let results_text = std::fs::read_to_string(results_path)
        .with_context(|| format!("can't read results {}", results_path.display()))?;
    let results = report::parse_results(&results_text)?;
    let html = report::render_report(&template, &results, &timestamp());
    std::fs::write(report_path, html)
        .with_context(|| format!("can't write report {}", report_path.display()))
}

fn clear_stale_artifacts(strat_dir: &Path) -> anyhow::Result<()> {
    let Ok(entries) = std::fs::read_dir(strat_dir) else {
        return Ok(()); // nothing there yet
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "strat") {
            std::fs::remove_file(&path)
                .with_context(|| format!("can't remove stale artifact {}", path.display()))?;
        }
    }
    Ok(())
}

fn timestamp() -> String {
    let format =
        format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]").unwrap();
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(&format).unwrap_or_default()
}
