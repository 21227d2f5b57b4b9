use clap::{Parser, Subcommand};
use poshi::{convert_file, run_check, run_format, Config, OutputFormat, RunnerOptions, Target};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "poshi")]
#[command(about = "Checks, formats and converts Poshi test definitions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a poshi.toml (default: ./poshi.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report syntax errors without changing anything
    Check {
        /// Files, directories or globs to check
        #[arg(value_name = "PATTERNS", default_value = ".")]
        patterns: Vec<String>,

        /// Output format
        #[arg(long = "output-format", value_enum, default_value = "text")]
        output_format: OutputFormat,
    },
    /// Rewrite files into canonical readable syntax
    Fmt {
        /// Files, directories or globs to format
        #[arg(value_name = "PATTERNS", default_value = ".")]
        patterns: Vec<String>,

        /// Only report files that would change
        #[arg(long)]
        check: bool,

        /// Output format
        #[arg(long = "output-format", value_enum, default_value = "text")]
        output_format: OutputFormat,
    },
    /// Convert between readable syntax and structured JSON
    Convert {
        file: PathBuf,

        /// Conversion direction (default: from the file extension)
        #[arg(long, value_enum)]
        to: Option<Target>,

        /// Write here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Check {
            patterns,
            output_format,
        } => {
            let options = RunnerOptions {
                config,
                output_format,
            };
            let results = run_check(patterns, options).await?;
            std::process::exit(if results.has_failures() { 1 } else { 0 });
        }
        Commands::Fmt {
            patterns,
            check,
            output_format,
        } => {
            let options = RunnerOptions {
                config,
                output_format,
            };
            let results = run_format(patterns, options, check).await?;
            std::process::exit(if results.has_failures() { 1 } else { 0 });
        }
        Commands::Convert { file, to, output } => {
            let write_to_stdout = output.is_none();
            let converted = convert_file(&file, to, output, &config).await?;
            if write_to_stdout {
                print!("{}", converted);
            }
            Ok(())
        }
    }
}
