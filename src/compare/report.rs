//! Whole-capture comparison report.

use crate::compare::check::CheckResult;
use crate::compare::comparator::compare_payload;
use crate::compare::reference::{self, ReferencePayload};
use crate::config::{WirecheckConfig, DEFAULT_HEX_PREVIEW};
use crate::core::serialization::MultiFormat;
use crate::schema::registry::{is_known, REGISTRY};
use crate::trace::{Direction, TraceCapture};
use crate::utils::hex::hex_preview;
use crate::utils::metrics::{global_metrics, Timer};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Knobs for [`compare_capture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareOptions {
    /// Direction sampled first when an opcode appears both ways
    pub preferred_direction: Direction,
    pub hex_preview_bytes: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            preferred_direction: Direction::Sent,
            hex_preview_bytes: DEFAULT_HEX_PREVIEW,
        }
    }
}

impl From<&WirecheckConfig> for CompareOptions {
    fn from(config: &WirecheckConfig) -> Self {
        Self {
            preferred_direction: config.trace.preferred_direction,
            hex_preview_bytes: config.report.hex_preview_bytes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Verified,
    Failed,
    /// The capture holds no message with this opcode
    NotGenerated,
}

impl fmt::Display for SectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SectionStatus::Verified => "VERIFIED",
            SectionStatus::Failed => "FAILED",
            SectionStatus::NotGenerated => "NOT GENERATED",
        })
    }
}

/// Results for one registered opcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpcodeSection {
    pub opcode: u8,
    pub name: String,
    /// Hex preview and provenance of the reference, if one is registered
    pub reference: Option<String>,
    /// Description and hex preview of the sampled record
    pub sample: Option<String>,
    pub sent: usize,
    pub received: usize,
    pub checks: Vec<CheckResult>,
    pub status: SectionStatus,
}

impl OpcodeSection {
    pub fn failed_checks(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| !c.passed)
    }
}

/// Outcome of comparing every registered opcode in a capture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub sections: Vec<OpcodeSection>,
    /// Opcodes in the capture with no schema, with record counts
    pub unknown_opcodes: Vec<(u8, usize)>,
    pub total_records: usize,
    pub skipped_empty: usize,
    pub truncated_tail: usize,
    pub skipped_malformed: usize,
    pub malformed: Option<String>,
}

impl MultiFormat for ComparisonReport {}

impl ComparisonReport {
    pub fn total_checks(&self) -> usize {
        self.sections.iter().map(|s| s.checks.len()).sum()
    }

    pub fn passed(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.checks)
            .filter(|c| c.passed)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.total_checks() - self.passed()
    }

    /// No check failed. Opcodes missing from the capture do not count as failures.
    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    pub fn section(&self, opcode: u8) -> Option<&OpcodeSection> {
        self.sections.iter().find(|s| s.opcode == opcode)
    }

    pub fn not_generated(&self) -> impl Iterator<Item = &OpcodeSection> {
        self.sections
            .iter()
            .filter(|s| s.status == SectionStatus::NotGenerated)
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} records ({} empty skipped, {} trailing bytes)",
            self.total_records, self.skipped_empty, self.truncated_tail
        )?;
        if let Some(reason) = &self.malformed {
            writeln!(
                f,
                "{} malformed records skipped, first: {reason}",
                self.skipped_malformed
            )?;
        }

        for s in &self.sections {
            writeln!(f)?;
            writeln!(f, "0x{:02X} {} [{}]", s.opcode, s.name, s.status)?;
            if let Some(r) = &s.reference {
                writeln!(f, "  ref:    {r}")?;
            }
            match &s.sample {
                Some(sample) => {
                    writeln!(f, "  ours:   {sample}")?;
                    writeln!(f, "  seen:   {} sent, {} received", s.sent, s.received)?;
                }
                None => writeln!(f, "  ours:   not generated")?,
            }
            for c in &s.checks {
                writeln!(f, "    {c}")?;
            }
        }

        if !self.unknown_opcodes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Unknown opcodes:")?;
            for (op, count) in &self.unknown_opcodes {
                writeln!(f, "  0x{op:02X}: {count}")?;
            }
        }

        writeln!(f)?;
        write!(
            f,
            "{} checks, {} passed, {} failed",
            self.total_checks(),
            self.passed(),
            self.failed()
        )
    }
}

fn describe_reference(r: &ReferencePayload, preview: usize) -> String {
    let len = match r.full_len {
        Some(full) if !r.is_complete() => format!("{}B of {full}B", r.bytes.len()),
        _ => format!("{}B", r.bytes.len()),
    };
    format!(
        "{len} {} ({})",
        hex_preview(r.as_slice(), preview),
        r.provenance
    )
}

/// Compare a sample of every registered opcode in `capture`.
///
/// Each section samples the first record in the preferred direction (falling
/// back to the other direction) and runs the structural checks against the
/// first matching reference.
pub fn compare_capture(
    capture: &TraceCapture,
    references: &[ReferencePayload],
    options: &CompareOptions,
) -> ComparisonReport {
    let _timer = Timer::start("compare_capture");
    let mut report = ComparisonReport {
        total_records: capture.len(),
        skipped_empty: capture.skipped_empty(),
        truncated_tail: capture.truncated_tail(),
        skipped_malformed: capture.skipped_malformed(),
        malformed: capture.malformed().map(str::to_string),
        ..Default::default()
    };

    for schema in &REGISTRY {
        let reference = reference::find(references, schema.opcode);
        let (sent, received) = capture.direction_counts(schema.opcode);
        let sample = capture.sample(schema.opcode, options.preferred_direction);

        let (checks, status) = match sample {
            Some(record) => {
                let checks =
                    compare_payload(&record.payload, schema, reference.map(|r| r.as_slice()));
                let status = if checks.iter().all(|c| c.passed) {
                    SectionStatus::Verified
                } else {
                    SectionStatus::Failed
                };
                (checks, status)
            }
            None => (Vec::new(), SectionStatus::NotGenerated),
        };

        let failed = checks.iter().filter(|c| !c.passed).count();
        global_metrics().checks_evaluated(checks.len() as u64, failed as u64);
        if failed > 0 {
            warn!(
                opcode = schema.opcode,
                name = schema.name,
                failed,
                "Structural checks failed"
            );
        }

        report.sections.push(OpcodeSection {
            opcode: schema.opcode,
            name: schema.name.to_string(),
            reference: reference.map(|r| describe_reference(r, options.hex_preview_bytes)),
            sample: sample.map(|r| {
                format!("{r} {}", hex_preview(&r.payload, options.hex_preview_bytes))
            }),
            sent,
            received,
            checks,
            status,
        });
    }

    report.unknown_opcodes = capture
        .opcode_counts()
        .into_iter()
        .filter(|(op, _)| !is_known(*op))
        .collect();
    let unknown: usize = report.unknown_opcodes.iter().map(|(_, n)| n).sum();
    if unknown > 0 {
        global_metrics().unknown_opcode_records(unknown as u64);
        debug!(
            opcodes = report.unknown_opcodes.len(),
            records = unknown,
            "Capture holds opcodes without a schema"
        );
    }

    report
}
