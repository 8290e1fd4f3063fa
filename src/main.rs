use std::io;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use slicebench::config::{DispatchMode, ElementType, ExperimentConfig, Preset};
use slicebench::harness::workload::FillMode;
use slicebench::io::{create_progress_bar, ReportMode, ReportWriter};
use slicebench::{Element, Harness, Op};

#[derive(Parser, Debug)]
#[command(name = "slicebench")]
#[command(about = "Benchmark elementwise kernels split across worker threads", long_about = None)]
struct Args {
    /// Starting point for every setting not given explicitly
    #[arg(long, value_enum, default_value = "array")]
    preset: Preset,

    /// Element type of the workload buffers
    #[arg(short, long, value_enum)]
    element: Option<ElementType>,

    /// Kernel to benchmark (repeatable)
    #[arg(short, long = "kernel", value_enum)]
    kernels: Vec<Op>,

    /// Input size in elements (repeatable)
    #[arg(short, long = "size")]
    sizes: Vec<usize>,

    /// Highest worker count to dispatch with
    #[arg(short = 'j', long)]
    max_workers: Option<usize>,

    /// Trials per configuration
    #[arg(short, long)]
    trials: Option<usize>,

    /// Field delimiter of the report
    #[arg(short, long)]
    delimiter: Option<String>,

    /// Report means only
    #[arg(long)]
    mean_only: bool,

    /// How buffers are filled before each trial
    #[arg(long, value_enum)]
    fill: Option<FillMode>,

    /// Seed for the random fill
    #[arg(long)]
    seed: Option<u64>,

    /// Use the two-pass standard deviation instead of the single-pass form
    #[arg(long)]
    two_pass: bool,

    /// Dispatch with fresh threads, a reused pool, or both
    #[arg(long, value_enum)]
    dispatch: Option<DispatchMode>,

    /// Disable progress bar
    #[arg(short, long)]
    quiet: bool,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> ExperimentConfig {
        let mut config = ExperimentConfig::preset(self.preset);

        if let Some(element) = self.element {
            config.element = element;
        }
        if !self.kernels.is_empty() {
            config.kernels = self.kernels;
        }
        if !self.sizes.is_empty() {
            config.sizes = self.sizes;
        }
        if let Some(max_workers) = self.max_workers {
            config.max_workers = max_workers;
        }
        if let Some(trials) = self.trials {
            config.trials = trials;
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if self.mean_only {
            config.report_mode = ReportMode::MeanOnly;
        }
        if let Some(fill) = self.fill {
            config.fill = fill;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.two_pass {
            config.stdev = slicebench::StdevFormula::TwoPass;
        }
        if let Some(dispatch) = self.dispatch {
            config.dispatch = dispatch;
        }

        config
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run<T: Element>(config: ExperimentConfig, quiet: bool) -> Result<()> {
    let total = config.kernels.len() * config.sizes.len();
    let progress = (!quiet).then(|| create_progress_bar(total));

    let mut writer = ReportWriter::new(io::stdout().lock(), config.delimiter.clone(), config.report_mode);
    let mut harness = Harness::new(config).context("Invalid experiment configuration")?;

    harness
        .run::<T, _>(progress.as_ref(), |row| writer.write_row(row))
        .context("Experiment aborted")?;

    if let Some(ref pb) = progress {
        pb.finish_with_message("Experiment complete");
    }

    info!(rows = writer.rows_written(), "Report written");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let quiet = args.quiet;
    let config = args.into_config();
    config.validate().context("Invalid experiment configuration")?;

    let cores = num_cpus::get();
    if config.max_workers > cores {
        warn!(
            max_workers = config.max_workers,
            cores, "Worker ceiling exceeds available cores"
        );
    }

    let start_time = Instant::now();

    match config.element {
        ElementType::F32 => run::<f32>(config, quiet)?,
        ElementType::F64 => run::<f64>(config, quiet)?,
        ElementType::I32 => run::<i32>(config, quiet)?,
        ElementType::I64 => run::<i64>(config, quiet)?,
    }

    info!(elapsed = ?start_time.elapsed(), "Done");
    Ok(())
}
