//! oci-sbom-diff: streaming OCI container-image diff for SPDX SBOMs.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use oci_sbom_diff::cli::{exit_codes, run_diff, run_view, DiffOptions, ViewOptions};
use oci_sbom_diff::reports::ReportFormat;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nSupported input:",
        "\n  SPDX 2.x JSON documents with a top-level \"packages\" array",
        "\n\nOutput formats:",
        "\n  json, summary",
        "\n\nFeatures:",
        "\n  Streaming extraction, multi-arch grouping, digest/license change summaries"
    )
}

#[derive(Parser)]
#[command(name = "oci-sbom-diff")]
#[command(version, long_version = build_long_version())]
#[command(about = "Streaming OCI container-image diff for SPDX SBOMs", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  No changes detected (or --fail-on-change not set)
    1  Changes detected (with --fail-on-change)
    3  Error occurred

EXAMPLES:
    # Diff two fleet snapshots
    oci-sbom-diff diff base.spdx.json new.spdx.json

    # CI/CD gate on image drift
    oci-sbom-diff diff base.spdx.json new.spdx.json -o summary --fail-on-change

    # Export JSON for processing
    oci-sbom-diff diff base.spdx.json new.spdx.json -o json > diff.json

    # Inspect a single SBOM
    oci-sbom-diff view fleet.spdx.json -o summary")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `diff` subcommand
#[derive(Parser)]
struct DiffArgs {
    /// Path to the base/old SBOM
    base: PathBuf,

    /// Path to the new SBOM
    new: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    output: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Exit with code 1 if any changes are detected
    #[arg(long)]
    fail_on_change: bool,
}

/// Arguments for the `view` subcommand
#[derive(Parser)]
struct ViewArgs {
    /// Path to the SBOM file
    sbom: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    output: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the OCI packages of two SBOM files
    Diff(DiffArgs),
    /// Parse and inspect a single SBOM file
    View(ViewArgs),
    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let colored = !cli.no_color && std::env::var_os("NO_COLOR").is_none();

    let outcome: Result<i32> = match cli.command {
        Commands::Diff(args) => run_diff(&DiffOptions {
            base: args.base,
            new: args.new,
            format: args.output,
            output_file: args.output_file,
            fail_on_change: args.fail_on_change,
            quiet: cli.quiet,
            colored,
        }),
        Commands::View(args) => run_view(&ViewOptions {
            file: args.sbom,
            format: args.output,
            output_file: args.output_file,
            quiet: cli.quiet,
            colored,
        }),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }
    };

    match outcome {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}
