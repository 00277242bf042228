//! Convert Hog strategy submissions into tournament-ready artifacts.

use std::path::PathBuf;

use clap::Parser;
use hog_contest::prelude::*;

#[derive(Parser)]
#[command(
    name = "hogconv",
    about = "Converts each Hog strategy submission to a .strat (space-separated matrix) file \
             that may then be imported into the tournament runner",
    after_help = "Artifacts are written to the current directory by default; use -o to pick \
                  another. Run hogcontest to drive the full convert -> tournament -> report \
                  pipeline in one go."
)]
struct Cli {
    /// Submission files or directories (scanned non-recursively)
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Directory artifacts are written to
    #[arg(short = 'o', long = "out-dir", default_value = ".")]
    out_dir: PathBuf,

    /// Emit ready-to-evaluate code stubs instead of .strat matrices
    #[arg(long)]
    code_stub: bool,

    /// Stop querying a strategy after its first invalid answer
    #[arg(long)]
    short_circuit: bool,

    /// Per-submission conversion budget in seconds
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Suppress per-submission progress output
    #[arg(short, long)]
    quiet: bool,

    /// Log diagnostics to a timestamped file instead of stderr
    #[arg(long)]
    log: bool,
}

fn main() {
    let cli = Cli::parse();

    if !cli.log {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .init();
    }

    // flags only tighten what HOGCONV_* variables already configured
    let mut config = Configuration::from_env();
    if cli.quiet {
        config = config.with_verbose(false);
    }
    if cli.log {
        config = config.with_log(true);
    }
    if cli.short_circuit {
        config = config.with_short_circuit_invalid(true);
    }
    if cli.code_stub {
        config = config.with_output_format(OutputFormat::CodeStub);
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(std::time::Duration::from_secs(secs));
    }

    let summary = BatchConverter::new(config, &cli.out_dir).run(&cli.paths);

    println!();
    println!(
        "converted a total of {} {}.",
        summary.converted,
        if summary.converted == 1 {
            "strategy"
        } else {
            "strategies"
        }
    );

    if !summary.unnamed.is_empty() {
        eprintln!(
            "WARNING: some teams {:?} did not specify team names in their submissions!",
            summary.unnamed
        );
    }
}
