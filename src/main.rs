use clap::{Args, Parser, Subcommand, ValueEnum};
use logfeat::pipeline::{run_convert, run_features, ConvertPlan, FeaturesPlan};
use logfeat_core::config::{Config, OutputFormat};
use logfeat_feeds::FeedSource;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "logfeat",
    version,
    about = "Normalize service logs and aggregate them into windowed feature rows"
)]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/logfeat/config.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, global = true)]
    debug: bool,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Raw log partitions → canonical store and conversion report.
    Convert(ConvertArgs),
    /// Canonical store → one feature file per window size.
    Features(FeaturesArgs),
    /// `convert` followed by `features`, both from config.
    Run,
}

#[derive(Args)]
struct ConvertArgs {
    /// Directory of raw partitions, or a single raw log file.
    #[arg(long, conflicts_with = "stdin")]
    input_dir: Option<PathBuf>,

    /// Canonical store to write.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Conversion report to write.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Read raw lines from stdin instead of partition files.
    #[arg(long, requires = "service")]
    stdin: bool,

    /// Default service for lines read from stdin.
    #[arg(long)]
    service: Option<String>,
}

#[derive(Args)]
struct FeaturesArgs {
    /// Canonical store to aggregate.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory for feature files.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Window size in minutes; repeat for several passes.
    #[arg(long = "window", value_name = "MINUTES")]
    windows: Vec<u32>,

    #[arg(long, value_enum)]
    format: Option<Format>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Jsonl,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Csv => OutputFormat::Csv,
            Format::Jsonl => OutputFormat::Jsonl,
        }
    }
}

fn init_tracing(debug: bool, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if debug { "debug" } else { "info" })
    });
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug, cli.log_json);

    let mut cfg = Config::load(cli.config.as_deref())?;
    tracing::debug!(?cfg, "configuration loaded");

    match cli.command {
        Command::Convert(args) => {
            if let Some(dir) = args.input_dir {
                cfg.convert.input_dir = dir;
            }
            if let Some(out) = args.out {
                cfg.convert.canonical_out = out;
            }
            if let Some(report) = args.report {
                cfg.convert.report_out = report;
            }
            let mut plan = ConvertPlan::from_config(&cfg.convert);
            if args.stdin {
                let service = args.service.unwrap_or_default();
                plan.source = FeedSource::Stdin { service };
                plan.per_source_dir = None;
            }
            run_convert(&plan).await?;
        }
        Command::Features(args) => {
            if let Some(input) = args.input {
                cfg.features.canonical_in = input;
            }
            if let Some(dir) = args.out_dir {
                cfg.features.out_dir = dir;
            }
            if !args.windows.is_empty() {
                cfg.features.windows_minutes = args.windows;
            }
            if let Some(format) = args.format {
                cfg.features.format = format.into();
            }
            run_features(&FeaturesPlan::from_config(&cfg)?).await?;
        }
        Command::Run => {
            cfg.features.canonical_in = cfg.convert.canonical_out.clone();
            let features = FeaturesPlan::from_config(&cfg)?;
            run_convert(&ConvertPlan::from_config(&cfg.convert)).await?;
            run_features(&features).await?;
        }
    }
    Ok(())
}
