//! Process-wide parse counters.
//!
//! Plain relaxed atomics: the counters are monotonic event counts with no
//! cross-counter consistency requirement.

use std::sync::atomic::{AtomicU64, Ordering};

static STATEMENTS_PARSED: AtomicU64 = AtomicU64::new(0);
static PARSE_FAILURES: AtomicU64 = AtomicU64::new(0);

/// A point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub statements_parsed: u64,
    pub parse_failures: u64,
}

pub(crate) fn record_parse(ok: bool) {
    STATEMENTS_PARSED.fetch_add(1, Ordering::Relaxed);
    if !ok {
        PARSE_FAILURES.fetch_add(1, Ordering::Relaxed);
    }
}

/// Read the current counter values.
#[must_use]
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        statements_parsed: STATEMENTS_PARSED.load(Ordering::Relaxed),
        parse_failures: PARSE_FAILURES.load(Ordering::Relaxed),
    }
}

/// Zero the counters. Intended for tests and long-lived processes that
/// report deltas.
pub fn reset() {
    STATEMENTS_PARSED.store(0, Ordering::Relaxed);
    PARSE_FAILURES.store(0, Ordering::Relaxed);
}
