//! Link and cut lifetime counters
//!
//! Every heap keeps its own [`LinkCutStats`]. The same events are also added
//! to process-wide totals held in atomics, readable through
//! [`process_stats`]. Which of the two a heap reports from `total_links` and
//! `total_cuts` is chosen by [`CounterScope`](crate::CounterScope).

use std::sync::atomic::{AtomicU64, Ordering};

static PROCESS_LINKS: AtomicU64 = AtomicU64::new(0);
static PROCESS_CUTS: AtomicU64 = AtomicU64::new(0);

/// Counts of structural operations performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LinkCutStats {
    /// Trees hung under another root during consolidation
    pub links: u64,
    /// Subtrees detached from their parent by decrease-key or delete
    pub cuts: u64,
}

impl LinkCutStats {
    /// Adds another heap's counters into these, used when melding.
    pub fn absorb(&mut self, other: LinkCutStats) {
        self.links += other.links;
        self.cuts += other.cuts;
    }
}

/// Returns the process-wide totals across all heaps.
///
/// Heaps run by the k-smallest extractor for its shadow nodes do not
/// contribute.
pub fn process_stats() -> LinkCutStats {
    LinkCutStats {
        links: PROCESS_LINKS.load(Ordering::Relaxed),
        cuts: PROCESS_CUTS.load(Ordering::Relaxed),
    }
}

pub(crate) fn publish_link() {
    PROCESS_LINKS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn publish_cut() {
    PROCESS_CUTS.fetch_add(1, Ordering::Relaxed);
}
