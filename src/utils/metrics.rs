//! Observability and Metrics
//!
//! Process-wide counters for capture parsing, structural comparison,
//! manifest construction and checksum response decoding.
//!
//! Uses atomic counters so the global collector can be shared freely.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Global metrics collector for verification runs
#[derive(Debug)]
pub struct Metrics {
    /// Captures successfully opened (magic accepted)
    pub captures_parsed: AtomicU64,
    /// Captures that ended in a truncated or malformed record
    pub captures_truncated: AtomicU64,
    /// Records read from captures
    pub records_parsed: AtomicU64,
    /// Zero-length records skipped
    pub records_empty: AtomicU64,
    /// Payload bytes read from captures
    pub payload_bytes: AtomicU64,
    /// Structural checks evaluated
    pub checks_run: AtomicU64,
    /// Structural checks that failed
    pub checks_failed: AtomicU64,
    /// Records whose opcode had no schema
    pub unknown_opcodes: AtomicU64,
    /// Files content-hashed
    pub files_hashed: AtomicU64,
    /// Bytes content-hashed
    pub bytes_hashed: AtomicU64,
    /// Manifest rounds whose directory was missing
    pub rounds_missing: AtomicU64,
    /// Grammar variants tried against checksum responses
    pub grammar_attempts: AtomicU64,
    /// Grammar variants rejected
    pub grammar_rejections: AtomicU64,
    /// Responses no variant could decode exactly
    pub responses_unresolved: AtomicU64,
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            captures_parsed: AtomicU64::new(0),
            captures_truncated: AtomicU64::new(0),
            records_parsed: AtomicU64::new(0),
            records_empty: AtomicU64::new(0),
            payload_bytes: AtomicU64::new(0),
            checks_run: AtomicU64::new(0),
            checks_failed: AtomicU64::new(0),
            unknown_opcodes: AtomicU64::new(0),
            files_hashed: AtomicU64::new(0),
            bytes_hashed: AtomicU64::new(0),
            rounds_missing: AtomicU64::new(0),
            grammar_attempts: AtomicU64::new(0),
            grammar_rejections: AtomicU64::new(0),
            responses_unresolved: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a parsed capture and its record totals
    pub fn capture_parsed(&self, records: u64, empty: u64, payload_bytes: u64, truncated: bool) {
        self.captures_parsed.fetch_add(1, Ordering::Relaxed);
        self.records_parsed.fetch_add(records, Ordering::Relaxed);
        self.records_empty.fetch_add(empty, Ordering::Relaxed);
        self.payload_bytes.fetch_add(payload_bytes, Ordering::Relaxed);
        if truncated {
            self.captures_truncated.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a batch of structural checks
    pub fn checks_evaluated(&self, total: u64, failed: u64) {
        self.checks_run.fetch_add(total, Ordering::Relaxed);
        self.checks_failed.fetch_add(failed, Ordering::Relaxed);
    }

    /// Record `count` records whose opcode has no schema
    pub fn unknown_opcode_records(&self, count: u64) {
        self.unknown_opcodes.fetch_add(count, Ordering::Relaxed);
    }

    pub fn file_hashed(&self, byte_count: u64) {
        self.files_hashed.fetch_add(1, Ordering::Relaxed);
        self.bytes_hashed.fetch_add(byte_count, Ordering::Relaxed);
    }

    pub fn round_missing(&self) {
        self.rounds_missing.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one grammar attempt and whether it was rejected
    pub fn grammar_attempt(&self, rejected: bool) {
        self.grammar_attempts.fetch_add(1, Ordering::Relaxed);
        if rejected {
            self.grammar_rejections.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn response_unresolved(&self) {
        self.responses_unresolved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            captures_parsed: self.captures_parsed.load(Ordering::Relaxed),
            captures_truncated: self.captures_truncated.load(Ordering::Relaxed),
            records_parsed: self.records_parsed.load(Ordering::Relaxed),
            records_empty: self.records_empty.load(Ordering::Relaxed),
            payload_bytes: self.payload_bytes.load(Ordering::Relaxed),
            checks_run: self.checks_run.load(Ordering::Relaxed),
            checks_failed: self.checks_failed.load(Ordering::Relaxed),
            unknown_opcodes: self.unknown_opcodes.load(Ordering::Relaxed),
            files_hashed: self.files_hashed.load(Ordering::Relaxed),
            bytes_hashed: self.bytes_hashed.load(Ordering::Relaxed),
            rounds_missing: self.rounds_missing.load(Ordering::Relaxed),
            grammar_attempts: self.grammar_attempts.load(Ordering::Relaxed),
            grammar_rejections: self.grammar_rejections.load(Ordering::Relaxed),
            responses_unresolved: self.responses_unresolved.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    pub fn log_metrics(&self) {
        let s = self.snapshot();
        info!(
            captures_parsed = s.captures_parsed,
            captures_truncated = s.captures_truncated,
            records_parsed = s.records_parsed,
            records_empty = s.records_empty,
            payload_bytes = s.payload_bytes,
            checks_run = s.checks_run,
            checks_failed = s.checks_failed,
            unknown_opcodes = s.unknown_opcodes,
            files_hashed = s.files_hashed,
            bytes_hashed = s.bytes_hashed,
            rounds_missing = s.rounds_missing,
            grammar_attempts = s.grammar_attempts,
            grammar_rejections = s.grammar_rejections,
            responses_unresolved = s.responses_unresolved,
            uptime_seconds = s.uptime_seconds,
            "Verification metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub captures_parsed: u64,
    pub captures_truncated: u64,
    pub records_parsed: u64,
    pub records_empty: u64,
    pub payload_bytes: u64,
    pub checks_run: u64,
    pub checks_failed: u64,
    pub unknown_opcodes: u64,
    pub files_hashed: u64,
    pub bytes_hashed: u64,
    pub rounds_missing: u64,
    pub grammar_attempts: u64,
    pub grammar_rejections: u64,
    pub responses_unresolved: u64,
    pub uptime_seconds: u64,
}

static METRICS: once_cell::sync::Lazy<Metrics> = once_cell::sync::Lazy::new(Metrics::new);

/// Get the global metrics instance
pub fn global_metrics() -> &'static Metrics {
    &METRICS
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!(
            operation = self.operation,
            duration_us = self.start.elapsed().as_micros() as u64,
            "Operation completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_counters() {
        let m = Metrics::new();
        m.capture_parsed(10, 2, 400, true);
        m.checks_evaluated(7, 1);
        m.grammar_attempt(true);
        m.grammar_attempt(false);
        m.file_hashed(128);

        let s = m.snapshot();
        assert_eq!(s.captures_parsed, 1);
        assert_eq!(s.captures_truncated, 1);
        assert_eq!(s.records_parsed, 10);
        assert_eq!(s.records_empty, 2);
        assert_eq!(s.checks_run, 7);
        assert_eq!(s.checks_failed, 1);
        assert_eq!(s.grammar_attempts, 2);
        assert_eq!(s.grammar_rejections, 1);
        assert_eq!(s.bytes_hashed, 128);
    }

    #[test]
    fn test_global_is_shared() {
        let before = global_metrics().snapshot().rounds_missing;
        global_metrics().round_missing();
        assert!(global_metrics().snapshot().rounds_missing > before);
    }
}
