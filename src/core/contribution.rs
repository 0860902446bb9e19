// derived per-segment counters; mutated only by the engine
use std::collections::{HashMap, HashSet};

use crate::core::index::MappingIndex;
use crate::core::types::{SegmentId, SignalId};

/// For each segment, how many currently-selected signals map to it.
///
/// Invariant: `count(s)` always equals the number of selected signals whose
/// mapping includes `s`; never negative; a segment with count zero holds no
/// key at all (the map stays sparse).
///
/// Callers never set counts directly. The engine drives the ledger from
/// signal-selection changes plus the mapping index, which is what keeps the
/// provenance of "why is this segment selected" recoverable.
#[derive(Debug, Default, Clone)]
pub struct ContributionLedger {
    counts: HashMap<SegmentId, u32>,
}

impl ContributionLedger {
    pub fn new() -> Self {
        ContributionLedger::default()
    }

    /// Count of selected signals contributing to `segment` (0 if none).
    pub fn count(&self, segment: &SegmentId) -> u32 {
        self.counts.get(segment).copied().unwrap_or(0)
    }

    pub fn is_contributing(&self, segment: &SegmentId) -> bool {
        self.counts.contains_key(segment)
    }

    /// Segments with a nonzero count.
    pub fn segments(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.counts.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    //engine-only mutation below this line

    pub(crate) fn on_signal_selected(&mut self, segments: impl Iterator<Item = SegmentId>) {
        for seg in segments {
            *self.counts.entry(seg).or_insert(0) += 1;
        }
    }

    pub(crate) fn on_signal_deselected(&mut self, segments: impl Iterator<Item = SegmentId>) {
        for seg in segments {
            match self.counts.get_mut(&seg) {
                Some(c) if *c > 1 => *c -= 1,
                Some(_) => {
                    // hit zero: drop the key to keep the map sparse
                    self.counts.remove(&seg);
                }
                // floor at 0: deselecting a signal the index no longer maps
                // (dataset refreshed underneath) must not underflow
                None => {}
            }
        }
    }

    /// Rebuild all counts from scratch against a fresh index.
    ///
    /// Used after `MappingIndex::rebuild`, where stale counters would
    /// otherwise survive the snapshot replacement.
    pub(crate) fn recompute(&mut self, index: &MappingIndex, selected: &HashSet<SignalId>) {
        self.counts.clear();
        for sig in selected {
            self.on_signal_selected(index.segments_of(sig));
        }
    }

    pub(crate) fn clear(&mut self) {
        self.counts.clear();
    }
}
