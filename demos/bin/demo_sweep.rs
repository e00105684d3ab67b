//! Parallel Sweep Demo
//!
//! Searches for every marked item across a range of register widths at the
//! optimal iteration count, in parallel, and summarizes each width.

use std::collections::BTreeMap;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;
use serde::Serialize;
use tracing::info;

use grover_demos::{
    HarnessArgs, histogram_bar, init_logging, print_header, print_info, print_json, print_result,
    print_section, print_success,
};
use grover_sim::sweep::{ScenarioOutcome, SweepSummary, exhaustive_scenarios, run_sweep};
use grover_sim::{MAX_QUBITS, optimal_iterations, theoretical_success_probability};

#[derive(Parser, Debug)]
#[command(name = "demo-sweep")]
#[command(about = "Sweep Grover search over every target of several register widths")]
struct Args {
    /// Smallest register width
    #[arg(long, default_value = "2")]
    min_qubits: usize,

    /// Largest register width
    #[arg(long, default_value = "8")]
    max_qubits: usize,

    /// Emit the per-width summary as JSON instead of formatted text
    #[arg(long)]
    json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    harness: HarnessArgs,
}

/// Aggregate for one register width.
#[derive(Debug, Serialize)]
struct WidthSummary {
    num_qubits: usize,
    iterations: usize,
    theoretical_probability: f64,
    mean_observed_probability: f64,
    min_observed_probability: f64,
    summary: SweepSummary,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    if args.min_qubits == 0 || args.min_qubits > args.max_qubits {
        anyhow::bail!(
            "Invalid width range {}..={}",
            args.min_qubits,
            args.max_qubits
        );
    }
    if args.max_qubits > MAX_QUBITS {
        anyhow::bail!("At most {MAX_QUBITS} qubits are supported");
    }
    let config = args.harness.resolve()?;

    let scenarios = exhaustive_scenarios(args.min_qubits..=args.max_qubits)?;
    info!(points = scenarios.len(), "starting sweep");
    let start = Instant::now();
    let outcomes = run_sweep(&scenarios, &config);
    let elapsed = start.elapsed();

    let widths = summarize_by_width(&outcomes);
    let overall = SweepSummary::from_outcomes(&outcomes);

    if args.json {
        return print_json(&widths);
    }

    print_header("Grover Parallel Sweep");
    print_result("Widths", format!("{}..={}", args.min_qubits, args.max_qubits));
    print_result("Searches", overall.total);
    print_result("Shots per search", config.shots);
    print_result("Elapsed", format!("{:.2?}", elapsed));

    for width in &widths {
        print_section(&format!("{} qubits, {} iterations", width.num_qubits, width.iterations));
        print_result(
            "Theoretical",
            format!(
                "{} {:.1}%",
                histogram_bar(width.theoretical_probability, 30),
                width.theoretical_probability * 100.0
            ),
        );
        print_result(
            "Mean observed",
            format!(
                "{} {:.1}%",
                histogram_bar(width.mean_observed_probability, 30),
                width.mean_observed_probability * 100.0
            ),
        );
        print_result(
            "Worst observed",
            format!("{:.1}%", width.min_observed_probability * 100.0),
        );
        print_result(
            "Passed",
            format!("{}/{}", width.summary.passed, width.summary.total),
        );
    }

    println!();
    if overall.all_passed() {
        print_success(&format!("All {} searches passed", overall.total));
    } else {
        print_info(&format!(
            "{} searches passed, {} failed, {} rejected",
            overall.passed, overall.failed, overall.rejected
        ));
    }
    Ok(())
}

fn summarize_by_width(outcomes: &[ScenarioOutcome]) -> Vec<WidthSummary> {
    let mut groups: BTreeMap<usize, Vec<ScenarioOutcome>> = BTreeMap::new();
    for outcome in outcomes {
        groups
            .entry(outcome.scenario.num_qubits)
            .or_default()
            .push(outcome.clone());
    }

    groups
        .into_iter()
        .map(|(num_qubits, group)| {
            let observed: Vec<f64> = group
                .iter()
                .filter_map(|o| o.report.as_ref().ok())
                .map(|r| r.observed_probability)
                .collect();
            let iterations = optimal_iterations(num_qubits);
            WidthSummary {
                num_qubits,
                iterations,
                theoretical_probability: theoretical_success_probability(num_qubits, iterations),
                mean_observed_probability: if observed.is_empty() {
                    0.0
                } else {
                    observed.iter().sum::<f64>() / observed.len() as f64
                },
                min_observed_probability: observed.iter().copied().fold(1.0, f64::min),
                summary: SweepSummary::from_outcomes(&group),
            }
        })
        .collect()
}
