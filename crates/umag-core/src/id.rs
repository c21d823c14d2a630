//! Strongly-typed identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`SweepId`] allocation.
static SWEEP_INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a sweep value.
///
/// Allocated from a monotonic atomic counter via [`SweepId::next`].
/// Cloning a sweep preserves its ID, so the same sweep passed to several
/// builder calls (or twice in one call) resolves to the same grid axes.
/// Sweeps derived by arithmetic or indexing always receive a fresh ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SweepId(u64);

impl SweepId {
    /// Allocate a fresh, unique sweep ID.
    ///
    /// Each call returns a new ID that has never been returned before
    /// within this process. Thread-safe.
    pub fn next() -> Self {
        Self(SWEEP_INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SweepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
