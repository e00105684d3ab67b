//! Grover Demo Suite
//!
//! Shared pieces of the `demo-*` binaries: logging setup, harness
//! configuration from file, environment and flags, and console output.
//!
//! Configuration is layered. Defaults come first, then a JSON file given with
//! `--config`, then individual flags (or their `GROVER_*` environment
//! variables).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use grover_sim::{Counts, DiffusionMethod, HarnessConfig};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

/// Harness options shared by every demo.
#[derive(Args, Debug, Clone, Default)]
pub struct HarnessArgs {
    /// JSON file with harness settings
    #[arg(long, env = "GROVER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Measurement shots per search
    #[arg(long, env = "GROVER_SHOTS")]
    pub shots: Option<u64>,

    /// Minimum observed probability of the marked item
    #[arg(long, env = "GROVER_THRESHOLD")]
    pub threshold: Option<f64>,

    /// Sampling seed for reproducible tallies
    #[arg(long, env = "GROVER_SEED")]
    pub seed: Option<u64>,

    /// Build the diffuser from Hadamard layers instead of the closed form
    #[arg(long)]
    pub decomposed: bool,
}

impl HarnessArgs {
    /// Resolve the layered configuration and validate it.
    pub fn resolve(&self) -> Result<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => HarnessConfig::default(),
        };
        if let Some(shots) = self.shots {
            config.shots = shots;
        }
        if let Some(threshold) = self.threshold {
            config.success_threshold = threshold;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if self.decomposed {
            config.diffusion = DiffusionMethod::Decomposed;
        }
        config.validate().context("Invalid harness configuration")?;
        Ok(config)
    }
}

/// Read a harness configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<HarnessConfig> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    HarnessConfig::from_json(&text)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Install the tracing subscriber; `-v` count picks the level.
pub fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

/// Create a progress bar for demo operations.
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");
    let pb = ProgressBar::new(len);
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print a failure message.
pub fn print_failure(message: &str) {
    println!("{} {}", style("✗").red().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Text bar of `width` cells filled in proportion to `fraction`.
pub fn histogram_bar(fraction: f64, width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "·".repeat(width - filled))
}

/// Print the `limit` most frequent outcomes, highlighting `target`.
pub fn print_counts(counts: &Counts, target: &str, limit: usize) {
    let total = counts.total().max(1) as f64;
    for (bitstring, count) in counts.sorted().into_iter().take(limit) {
        let fraction = count as f64 / total;
        let line = format!(
            "  |{bitstring}⟩ {} {count:>6} ({:5.1}%)",
            histogram_bar(fraction, 30),
            fraction * 100.0
        );
        if bitstring == target {
            println!("{}", style(line).green().bold());
        } else {
            println!("{line}");
        }
    }
    if counts.len() > limit {
        println!("  {}", style(format!("… {} more outcomes", counts.len() - limit)).dim());
    }
}
