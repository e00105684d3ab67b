//! Integration tests for the demo suite.
//!
//! These cover configuration layering and the output helpers the binaries
//! share.

use std::io::Write;

use clap::Parser;
use grover_demos::{HarnessArgs, histogram_bar, load_config};
use grover_sim::{DEFAULT_SHOTS, DiffusionMethod, HarnessConfig};

#[derive(Parser, Debug)]
struct TestCli {
    #[command(flatten)]
    harness: HarnessArgs,
}

fn parse(args: &[&str]) -> HarnessArgs {
    TestCli::try_parse_from(std::iter::once("test").chain(args.iter().copied()))
        .unwrap()
        .harness
}

fn config_file(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

/// No flags and no file resolve to the library defaults.
#[test]
fn test_defaults_without_flags() {
    let args = HarnessArgs::default();
    assert_eq!(args.resolve().unwrap(), HarnessConfig::default());
}

/// Flags override the built-in defaults.
#[test]
fn test_flags_override_defaults() {
    let config = parse(&["--shots", "256", "--seed", "42", "--decomposed"])
        .resolve()
        .unwrap();
    assert_eq!(config.shots, 256);
    assert_eq!(config.seed, Some(42));
    assert_eq!(config.diffusion, DiffusionMethod::Decomposed);
}

/// A config file is applied first, then flags win over it.
#[test]
fn test_file_then_flags() {
    let file = config_file(r#"{ "shots": 4096, "success_threshold": 0.9, "seed": 1 }"#);
    let path = file.path().to_str().unwrap();

    let from_file = parse(&["--config", path]).resolve().unwrap();
    assert_eq!(from_file.shots, 4096);
    assert_eq!(from_file.success_threshold, 0.9);
    assert_eq!(from_file.seed, Some(1));

    let overridden = parse(&["--config", path, "--seed", "7"]).resolve().unwrap();
    assert_eq!(overridden.shots, 4096);
    assert_eq!(overridden.seed, Some(7));
}

/// Partial config files keep defaults for missing fields.
#[test]
fn test_partial_config_file() {
    let file = config_file(r#"{ "seed": 3 }"#);
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.shots, DEFAULT_SHOTS);
    assert_eq!(config.seed, Some(3));
}

/// Missing and malformed files are reported, not ignored.
#[test]
fn test_bad_config_files() {
    let missing = load_config(std::path::Path::new("/nonexistent/grover.json"));
    assert!(missing.is_err());

    let file = config_file("{ not json");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse"));
}

/// Out-of-range settings fail validation after layering.
#[test]
fn test_invalid_settings_rejected() {
    assert!(parse(&["--shots", "0"]).resolve().is_err());
    assert!(parse(&["--threshold", "1.5"]).resolve().is_err());
}

#[test]
fn test_histogram_bar() {
    assert_eq!(histogram_bar(0.0, 4), "····");
    assert_eq!(histogram_bar(0.5, 4), "██··");
    assert_eq!(histogram_bar(1.0, 4), "████");
    assert_eq!(histogram_bar(2.0, 4), "████");
}
