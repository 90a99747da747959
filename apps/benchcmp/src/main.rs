//! benchcmp binary
//!
//! Reads one or two files of benchmark output, compares them and prints the
//! report on stdout. Logs go to stderr.

use anyhow::{bail, Context, Result};
use bench_stats::stats::PolicyKind;
use bench_stats::{Analyzer, AnalyzerConfig, BenchStatsError, OutputFormat, Reporter};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "benchcmp")]
#[command(
    version,
    about = "Compare benchmark results and report statistically significant changes"
)]
struct Args {
    /// Baseline results, or `-` for stdin
    old: String,

    /// Candidate results, or `-` for stdin. Omit to summarize a single run.
    new: Option<String>,

    /// Outlier policy: mad, iqr or none
    #[arg(long)]
    outlier_policy: Option<PolicyKind>,

    /// Multiplier on the outlier policy's spread measure
    #[arg(long)]
    outlier_threshold: Option<f64>,

    /// Significance threshold for the p-value
    #[arg(long)]
    alpha: Option<f64>,

    /// Output format: console, markdown, json or json-pretty
    #[arg(short, long, default_value = "console")]
    format: OutputFormat,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Drop the first N samples of every benchmark as warm-up
    #[arg(long)]
    skip_first: Option<usize>,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn inputs(&self) -> Vec<&str> {
        std::iter::once(self.old.as_str())
            .chain(self.new.as_deref())
            .collect()
    }

    /// Defaults, then the config file, then flags
    fn build_config(&self) -> Result<AnalyzerConfig> {
        let mut config = match &self.config {
            Some(path) => AnalyzerConfig::from_file(path)?,
            None => AnalyzerConfig::default(),
        };

        if let Some(policy) = self.outlier_policy {
            config.outliers.policy = policy;
        }
        if let Some(threshold) = self.outlier_threshold {
            config.outliers.threshold = Some(threshold);
        }
        if let Some(alpha) = self.alpha {
            config.thresholds.alpha = alpha;
        }
        if let Some(skip) = self.skip_first {
            config.analysis.skip_first = skip;
        }
        config.validate()?;

        let actual = self.inputs().len();
        if let Some(expected) = config.analysis.inputs {
            if expected != actual {
                return Err(BenchStatsError::InputCount { expected, actual }.into());
            }
        }

        Ok(config)
    }
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let config = args.build_config()?;

    let paths = args.inputs();
    if paths.iter().filter(|p| **p == "-").count() > 1 {
        bail!("stdin can only be used for one input");
    }

    let texts = paths
        .iter()
        .map(|p| read_input(p))
        .collect::<Result<Vec<_>>>()?;
    let inputs: Vec<(&str, &str)> = paths
        .iter()
        .zip(&texts)
        .map(|(p, t)| (*p, t.as_str()))
        .collect();

    let analysis = Analyzer::new(config).analyze_inputs(&inputs);

    let reporter = Reporter::new(args.format);
    match &args.output {
        Some(path) => {
            reporter.write_to_file(&analysis, path)?;
            tracing::info!("Report written to {}", path.display());
        }
        None => reporter.report(&analysis)?,
    }

    if analysis.is_empty() {
        tracing::error!("No benchmark samples found in {}", paths.join(", "));
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    // Logs on stderr so the report on stdout stays clean
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
