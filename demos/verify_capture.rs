//! Example: Verify a trace capture against the opcode schemas
//!
//! Parses a capture, compares a sample of every registered opcode with its
//! schema and ground-truth reference, and prints the report.
//!
//! Run with: `cargo run --example verify_capture -- session.trace [wirecheck.toml]`

use std::process::ExitCode;
use wirecheck::compare::{builtin_references, compare_capture, CompareOptions};
use wirecheck::config::WirecheckConfig;
use wirecheck::core::serialization::MultiFormat;
use wirecheck::schema::lookup;
use wirecheck::trace::TraceCapture;
use wirecheck::utils::{global_metrics, logging};

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let Some(capture_path) = args.next() else {
        eprintln!("usage: verify_capture <capture> [config.toml]");
        return Ok(ExitCode::from(2));
    };

    let config = match args.next() {
        Some(path) => WirecheckConfig::from_file(path)?,
        None => WirecheckConfig::from_env()?,
    };
    config.validate_strict()?;
    logging::init(&config.logging)?;

    let magic = config
        .trace
        .magic_bytes()
        .ok_or("trace magic must be 8 ASCII bytes")?;
    let data = std::fs::read(&capture_path)?;
    let capture = TraceCapture::parse_with_magic(&data, &magic)?;

    let report = compare_capture(
        &capture,
        &builtin_references(),
        &CompareOptions::from(&config),
    );
    println!("{report}");

    for section in report.sections.iter().filter(|s| s.failed_checks().next().is_some()) {
        let (Some(schema), Some(record)) = (
            lookup(section.opcode),
            capture.sample(section.opcode, config.trace.preferred_direction),
        ) else {
            continue;
        };
        println!("0x{:02X} {} field breakdown:", section.opcode, section.name);
        for row in schema.breakdown(&record.payload) {
            println!("  {row}");
        }
    }

    let out = format!("{capture_path}.report.{}", config.report.format.extension());
    report.export_to_file(&out, config.report.format)?;
    println!("Report written to {out}");

    global_metrics().log_metrics();

    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
