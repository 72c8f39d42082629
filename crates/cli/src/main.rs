// MemLab - Memory Conformance Harness
// Copyright (C) 2026 The MemLab Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use memlab_config::{CaseAssertion, CaseScript, SpaceDescriptor, StopReason};
use memlab_core::bench::Bench;
use memlab_core::scenario;
use memlab_core::{AccessError, BenchError, Outcome};

const EXIT_PASS: u8 = 0;
const EXIT_ASSERT_FAIL: u8 = 1;
const EXIT_CONFIG_ERROR: u8 = 2;
const EXIT_RUNTIME_ERROR: u8 = 3;

const RESULT_SCHEMA_VERSION: &str = "1.0";

// Guard against accidentally huge runs from CI misconfiguration.
const MAX_ALLOWED_ACCESSES: u64 = 1_000_000;

#[derive(Parser, Debug)]
#[command(author, version, about = "MemLab Conformance Harness", long_about = None)]
struct Cli {
    /// Enable transaction-level execution tracing
    #[arg(short, long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Deterministic, CI-friendly runner mode driven by a case script (YAML).
    Test(TestArgs),

    /// Run a scenario interactively and print the resulting memory image.
    Run(RunArgs),

    /// List the registered conformance scenarios.
    Scenarios,
}

#[derive(Parser, Debug)]
struct TestArgs {
    /// Path to the case script (YAML)
    #[arg(short = 'c', long)]
    script: PathBuf,

    /// Path to a space descriptor (overrides the script)
    #[arg(short = 's', long)]
    space: Option<PathBuf>,

    /// Override max accesses (takes precedence over script)
    #[arg(long)]
    max_accesses: Option<u64>,

    /// Directory to write test artifacts (result.json, ram.bin, journal.log)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Registered scenario name
    #[arg(long)]
    scenario: String,

    /// Path to a space descriptor (YAML)
    #[arg(short = 's', long)]
    space: Option<PathBuf>,

    /// Number of bytes to hexdump from the bottom of the space
    #[arg(long, default_value = "32")]
    dump_bytes: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct TestResult {
    result_schema_version: String,
    status: String,
    accesses: u64,
    stop_reason: StopReason,
    signal_code: Option<u32>,
    max_accesses: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    assertions: Vec<AssertionResult>,
    space_digest: String,
    checksum: u32,
    config: CaseConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct AssertionResult {
    assertion: CaseAssertion,
    passed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct CaseConfig {
    script: PathBuf,
    space: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing with appropriate level based on --trace flag
    if cli.trace {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    match cli.command {
        Commands::Test(args) => run_test(args),
        Commands::Run(args) => run_scenario(args),
        Commands::Scenarios => list_scenarios(),
    }
}

/// Resolve a path mentioned inside a script relative to the script itself.
fn resolve_script_path(script_path: &Path, value: &str) -> PathBuf {
    let p = Path::new(value);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        script_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(p)
    }
}

fn space_digest(bench: &Bench) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bench.space.contents());
    format!("{:x}", hasher.finalize())
}

fn stop_reason_for(outcome: &Outcome) -> StopReason {
    match outcome {
        Outcome::Completed { .. } => StopReason::Completion,
        Outcome::NoSignal => StopReason::NoSignal,
        Outcome::Fault(BenchError::Access(AccessError::Violation(_))) => {
            StopReason::MemoryViolation
        }
        Outcome::Fault(BenchError::Access(AccessError::Misaligned { .. })) => {
            StopReason::MisalignedAccess
        }
        Outcome::Fault(BenchError::Signal(_)) => StopReason::DuplicateSignal,
    }
}

fn evaluate_assertion(
    assertion: &CaseAssertion,
    bench: &Bench,
    stop_reason: &StopReason,
) -> bool {
    match assertion {
        CaseAssertion::MemoryValue(a) => {
            let details = &a.memory_value;
            let mask = details.mask.unwrap_or(u64::MAX);
            match bench.space.peek(details.address) {
                Ok(byte) => (byte as u64) & mask == details.expected_value & mask,
                Err(_) => false,
            }
        }
        CaseAssertion::ExpectedStopReason(a) => a.expected_stop_reason == *stop_reason,
        CaseAssertion::SignalCode(a) => bench.signal.code() == Some(a.signal_code),
        CaseAssertion::Checksum(a) => bench.space.checksum() == a.checksum,
    }
}

fn write_config_error_outputs(args: &TestArgs, message: String) {
    let Some(dir) = &args.output_dir else {
        return;
    };
    if let Err(e) = std::fs::create_dir_all(dir) {
        error!("Failed to create output dir {:?}: {}", dir, e);
        return;
    }

    let result = TestResult {
        result_schema_version: RESULT_SCHEMA_VERSION.to_string(),
        status: "error".to_string(),
        accesses: 0,
        stop_reason: StopReason::ConfigError,
        signal_code: None,
        max_accesses: args.max_accesses.unwrap_or(0),
        message: Some(message),
        assertions: Vec::new(),
        space_digest: String::new(),
        checksum: 0,
        config: CaseConfig {
            script: args.script.clone(),
            space: args.space.clone(),
        },
    };

    write_result_json(dir, &result);
}

fn write_result_json(dir: &Path, result: &TestResult) {
    let path = dir.join("result.json");
    match std::fs::File::create(&path) {
        Ok(f) => {
            if let Err(e) = serde_json::to_writer_pretty(f, result) {
                error!("Failed to write result.json {:?}: {}", path, e);
            }
        }
        Err(e) => error!("Failed to create result.json {:?}: {}", path, e),
    }
}

fn write_artifacts(dir: &Path, result: &TestResult, bench: &Bench) {
    if let Err(e) = std::fs::create_dir_all(dir) {
        error!("Failed to create output dir {:?}: {}", dir, e);
        return;
    }

    write_result_json(dir, result);

    let ram_path = dir.join("ram.bin");
    if let Err(e) = std::fs::write(&ram_path, bench.space.contents()) {
        error!("Failed to write ram.bin {:?}: {}", ram_path, e);
    }

    let journal_path = dir.join("journal.log");
    let mut log = String::new();
    for tx in bench.journal().snapshot() {
        log.push_str(&tx.to_string());
        log.push('\n');
    }
    if let Err(e) = std::fs::write(&journal_path, log) {
        error!("Failed to write journal.log {:?}: {}", journal_path, e);
    }
}

fn run_test(args: TestArgs) -> ExitCode {
    let script = match CaseScript::from_file(&args.script) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("{:#}", e);
            error!("{}", msg);
            write_config_error_outputs(&args, msg);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let max_accesses = args.max_accesses.unwrap_or(script.limits.max_accesses);
    if max_accesses > MAX_ALLOWED_ACCESSES {
        let msg = format!(
            "max_accesses {} exceeds MAX_ALLOWED_ACCESSES {}",
            max_accesses, MAX_ALLOWED_ACCESSES
        );
        error!("{}", msg);
        write_config_error_outputs(&args, msg);
        return ExitCode::from(EXIT_CONFIG_ERROR);
    }

    let space_path = args.space.clone().or_else(|| {
        script
            .inputs
            .space
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| resolve_script_path(&args.script, s))
    });

    let descriptor = match &space_path {
        Some(path) => match SpaceDescriptor::from_file(path) {
            Ok(d) => d,
            Err(e) => {
                let msg = format!("{:#}", e);
                error!("{}", msg);
                write_config_error_outputs(&args, msg);
                return ExitCode::from(EXIT_CONFIG_ERROR);
            }
        },
        None => SpaceDescriptor::default(),
    };

    let Some(scenario) = scenario::lookup(&script.inputs.scenario) else {
        let msg = format!("Unknown scenario '{}'", script.inputs.scenario);
        error!("{}", msg);
        write_config_error_outputs(&args, msg);
        return ExitCode::from(EXIT_CONFIG_ERROR);
    };

    let mut bench = match Bench::from_config(&descriptor) {
        Ok(b) => b,
        Err(e) => {
            let msg = format!("{:#}", e);
            error!("{}", msg);
            write_config_error_outputs(&args, msg);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let outcome = bench.run(scenario);

    let accesses = bench.journal().len() as u64;
    let mut stop_reason = stop_reason_for(&outcome);
    if accesses > max_accesses {
        stop_reason = StopReason::MaxAccesses;
        error!(
            "Scenario issued {} accesses, over the limit of {}",
            accesses, max_accesses
        );
    }

    let message = match &outcome {
        Outcome::Fault(e) => Some(format!("{}", e)),
        Outcome::NoSignal => Some("Scenario returned without raising the completion signal".into()),
        Outcome::Completed { .. } => None,
    };

    let mut assertion_results = Vec::new();
    let mut all_passed = true;
    let mut expected_stop_reason_matched = false;

    for assertion in &script.assertions {
        let passed = evaluate_assertion(assertion, &bench, &stop_reason);

        if matches!(assertion, CaseAssertion::ExpectedStopReason(_)) && passed {
            expected_stop_reason_matched = true;
        }

        if !passed {
            all_passed = false;
            error!("Assertion failed: {:?}", assertion);
        }

        assertion_results.push(AssertionResult {
            assertion: assertion.clone(),
            passed,
        });
    }

    let anomaly = stop_reason != StopReason::Completion;
    let status = if !all_passed {
        "fail"
    } else if anomaly && !expected_stop_reason_matched {
        "error"
    } else {
        "pass"
    };

    let result = TestResult {
        result_schema_version: RESULT_SCHEMA_VERSION.to_string(),
        status: status.to_string(),
        accesses,
        stop_reason,
        signal_code: bench.signal.code(),
        max_accesses,
        message,
        assertions: assertion_results,
        space_digest: space_digest(&bench),
        checksum: bench.space.checksum(),
        config: CaseConfig {
            script: args.script.clone(),
            space: space_path,
        },
    };

    if let Some(dir) = &args.output_dir {
        write_artifacts(dir, &result, &bench);
    }

    info!(
        "Case '{}' finished: {} ({} accesses)",
        script.inputs.scenario, status, accesses
    );

    match status {
        "pass" => ExitCode::from(EXIT_PASS),
        "fail" => ExitCode::from(EXIT_ASSERT_FAIL),
        _ => ExitCode::from(EXIT_RUNTIME_ERROR),
    }
}

fn run_scenario(args: RunArgs) -> ExitCode {
    let descriptor = match &args.space {
        Some(path) => match SpaceDescriptor::from_file(path) {
            Ok(d) => d,
            Err(e) => {
                error!("{:#}", e);
                return ExitCode::from(EXIT_CONFIG_ERROR);
            }
        },
        None => SpaceDescriptor::default(),
    };

    let Some(scenario) = scenario::lookup(&args.scenario) else {
        error!("Unknown scenario '{}'", args.scenario);
        return ExitCode::from(EXIT_CONFIG_ERROR);
    };

    let mut bench = match Bench::from_config(&descriptor) {
        Ok(b) => b,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let outcome = bench.run(scenario);

    println!("scenario: {}", scenario.name());
    println!("outcome:  {:?}", outcome);
    println!("journal:");
    for tx in bench.journal().snapshot() {
        println!("  {}", tx);
    }

    let dump_len = args.dump_bytes.min(bench.space.size());
    println!("memory (first {:#x} bytes):", dump_len);
    if let Ok(bytes) = bench.space.peek_range(0, dump_len) {
        for (row, chunk) in bytes.chunks(16).enumerate() {
            let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
            println!("  {:06x}: {}", row * 16, hex.join(" "));
        }
    }

    match outcome {
        Outcome::Completed { .. } => ExitCode::from(EXIT_PASS),
        _ => ExitCode::from(EXIT_RUNTIME_ERROR),
    }
}

fn list_scenarios() -> ExitCode {
    for s in scenario::registry() {
        println!("{:<20} {}", s.name(), s.summary());
    }
    ExitCode::from(EXIT_PASS)
}
