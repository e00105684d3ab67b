//! Reference Scenario Demo
//!
//! Runs the four reference searches (2, 3, 3 and 4 qubits) and fails if any
//! of them misses its threshold.

use anyhow::Result;
use clap::Parser;
use console::style;
use serde::Serialize;

use grover_demos::{
    HarnessArgs, create_progress_bar, init_logging, print_failure, print_header, print_json,
    print_result, print_section, print_success,
};
use grover_sim::sweep::{ScenarioOutcome, SweepSummary, run_scenario};
use grover_sim::{GroverTestReport, default_scenarios};

#[derive(Parser, Debug)]
#[command(name = "demo-scenarios")]
#[command(about = "Run the reference Grover scenarios")]
struct Args {
    /// Emit per-scenario reports as JSON instead of formatted text
    #[arg(long)]
    json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    harness: HarnessArgs,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    summary: SweepSummary,
    reports: Vec<&'a GroverTestReport>,
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
    let config = args.harness.resolve()?;
    let scenarios = default_scenarios();

    let pb = (!args.json).then(|| create_progress_bar(scenarios.len() as u64, "scenarios"));
    let mut outcomes: Vec<ScenarioOutcome> = Vec::with_capacity(scenarios.len());
    for (i, &scenario) in scenarios.iter().enumerate() {
        if let Some(pb) = &pb {
            pb.set_message(scenario.label());
        }
        outcomes.push(run_scenario(i, scenario, &config));
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }
    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }

    let summary = SweepSummary::from_outcomes(&outcomes);

    if args.json {
        let reports = outcomes
            .iter()
            .map(|o| o.report.as_ref().map_err(|e| anyhow::anyhow!("{}: {e}", o.scenario.label())))
            .collect::<Result<Vec<_>>>()?;
        print_json(&JsonOutput { summary, reports })?;
    } else {
        print_header("Grover Reference Scenarios");
        for outcome in &outcomes {
            print_outcome(outcome);
        }

        print_section("Summary");
        print_result("Scenarios", summary.total);
        print_result("Passed", summary.passed);
        print_result("Failed", summary.failed);
        print_result("Rejected", summary.rejected);
        println!();
    }

    if !summary.all_passed() {
        anyhow::bail!(
            "{} of {} scenarios did not pass",
            summary.total - summary.passed,
            summary.total
        );
    }
    if !args.json {
        print_success("All scenarios passed");
    }
    Ok(())
}

fn print_outcome(outcome: &ScenarioOutcome) {
    print_section(&outcome.scenario.label());
    match &outcome.report {
        Ok(report) => {
            print_result("Target", format!("|{}⟩", report.target_bitstring));
            print_result(
                "Simulated success",
                format!("{:.1}%", report.exact_probability * 100.0),
            );
            print_result(
                "Observed frequency",
                format!(
                    "{:.1}% ({}/{})",
                    report.observed_probability * 100.0,
                    report.counts.get(&report.target_bitstring),
                    report.shots
                ),
            );
            if report.passed {
                print_success("passed");
            } else {
                print_failure("below threshold");
            }
        }
        Err(e) => print_failure(&format!("rejected: {e}")),
    }
}
