//! Grover's Search Algorithm Demo
//!
//! Simulates one search, samples it and reports whether the marked item was
//! found often enough.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tracing::info;

use grover_demos::{
    HarnessArgs, init_logging, print_counts, print_failure, print_header, print_info,
    print_json, print_result, print_section, print_success,
};
use grover_sim::{
    BitSpace, FailureReason, GroverEngine, PhaseKickbackCircuit, optimal_iterations,
    run_grover_test_with, theoretical_success_probability,
};

#[derive(Parser, Debug)]
#[command(name = "demo-grover")]
#[command(about = "Simulate and sample Grover's search algorithm")]
struct Args {
    /// Number of qubits (search space size = 2^n)
    #[arg(short = 'n', long, default_value = "4")]
    qubits: usize,

    /// Marked state to search for (0 to 2^n - 1)
    #[arg(short, long, default_value = "7")]
    marked: usize,

    /// Number of Grover iterations (optimal for the width when omitted)
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Also run the ancilla-based gate circuit and compare amplitudes
    #[arg(long)]
    kickback: bool,

    /// Emit the full report as JSON instead of formatted text
    #[arg(long)]
    json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    harness: HarnessArgs,
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
    BitSpace::new(args.qubits).context("Invalid register width")?;
    let iterations = resolve_iterations(args.iterations, args.qubits);
    info!(qubits = args.qubits, marked = args.marked, iterations, "starting demo");

    let report = run_grover_test_with(args.qubits, args.marked, iterations, &config)
        .with_context(|| {
            format!(
                "Cannot search for {} in a {}-qubit register",
                args.marked, args.qubits
            )
        })?;

    if args.json {
        return print_json(&report);
    }

    print_header("Grover's Search Algorithm Demo");

    print_section("Problem Setup");
    print_result("Qubits", args.qubits);
    print_result("Search space size", 1usize << args.qubits);
    print_result(
        "Marked state",
        format!("|{}⟩ = |{}⟩", args.marked, report.target_bitstring),
    );
    print_result("Grover iterations", iterations);
    print_result("Diffuser", format!("{:?}", config.diffusion));
    print_result("Shots", config.shots);
    print_result("Threshold", format!("{:.2}", config.success_threshold));
    if let Some(seed) = config.seed {
        print_result("Seed", seed);
    }

    print_section("Expected Results");
    print_result(
        "Theoretical success",
        format!(
            "{:.1}%",
            theoretical_success_probability(args.qubits, iterations) * 100.0
        ),
    );
    print_result(
        "Simulated success",
        format!("{:.1}%", report.exact_probability * 100.0),
    );

    print_section("Measurement Counts");
    print_counts(&report.counts, &report.target_bitstring, 8);

    if args.kickback {
        print_section("Gate-Level Circuit");
        let mut engine = GroverEngine::new(args.qubits, args.marked, iterations)?
            .with_diffusion_method(config.diffusion);
        engine.run()?;
        let circuit =
            PhaseKickbackCircuit::run(args.qubits, &engine.oracle().qubit_pattern(), iterations)?;
        let sign = if iterations % 2 == 0 { 1.0 } else { -1.0 };
        let deviation = circuit
            .data_amplitudes()
            .iter()
            .zip(engine.state_vector()?.amplitudes())
            .map(|(gate, closed)| (gate - closed * sign).norm())
            .fold(0.0, f64::max);
        print_result("Register qubits", circuit.register().num_qubits());
        print_result("Global phase", if sign < 0.0 { "-1" } else { "+1" });
        print_result("Max amplitude deviation", format!("{deviation:.2e}"));
        print_result("Ancilla residual", format!("{:.2e}", circuit.ancilla_residual()));
    }

    println!();
    print_result(
        "Observed frequency",
        format!("{:.1}%", report.observed_probability * 100.0),
    );
    match report.failure {
        None => print_success(&format!("Found |{}⟩", report.target_bitstring)),
        Some(FailureReason::BelowThreshold) => print_failure(&format!(
            "|{}⟩ observed below the {:.0}% threshold",
            report.target_bitstring,
            report.success_threshold * 100.0
        )),
        Some(FailureReason::NotObserved) => print_failure(&format!(
            "|{}⟩ was never observed",
            report.target_bitstring
        )),
    }
    if iterations != optimal_iterations(args.qubits) {
        print_info(&format!(
            "Optimal iteration count for {} qubits is {}",
            args.qubits,
            optimal_iterations(args.qubits)
        ));
    }

    Ok(())
}

/// Explicit count when given (zero included), otherwise the optimal one.
fn resolve_iterations(requested: Option<usize>, qubits: usize) -> usize {
    requested.unwrap_or_else(|| optimal_iterations(qubits))
}
