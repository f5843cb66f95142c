//! # Structural Comparator
//!
//! Checks captured payloads against the opcode schemas and, where one exists,
//! a reference payload captured from the retail game.
//!
//! A check asserts layout (opcode byte, length, field positions, flag-driven
//! trailing data), never field values: object ids and vectors legitimately
//! differ between sessions.
//!
//! ## Components
//! - **Check**: one labelled pass/fail result
//! - **Reference**: ground-truth payloads with provenance
//! - **Comparator**: per-payload checks
//! - **Report**: per-opcode sections over a whole capture

pub mod check;
pub mod comparator;
pub mod reference;
pub mod report;

pub use check::CheckResult;
pub use comparator::{compare, compare_payload};
pub use reference::{builtin_references, ReferencePayload};
pub use report::{compare_capture, CompareOptions, ComparisonReport, OpcodeSection, SectionStatus};
