// bipartite signal <-> segment relation, rebuilt wholesale per dataset snapshot
use std::collections::{HashMap, HashSet};

use crate::core::types::{MappingRow, SegmentId, SignalId};

/// The signal→segments relation and its inverse, built from flat dimension rows.
///
/// Rebuilt whenever the caller supplies fresh rows (date range, geometry or
/// anomaly filters change the visible dataset). Rebuilding replaces internal
/// state only; it never touches selection state. The engine recomputes its
/// contribution counts against the new index (see `SelectionEngine::update_mappings`).
#[derive(Debug, Default, Clone)]
pub struct MappingIndex {
    signal_to_segments: HashMap<SignalId, HashSet<SegmentId>>,
    segment_to_signals: HashMap<SegmentId, HashSet<SignalId>>,
}

impl MappingIndex {
    pub fn new() -> Self {
        MappingIndex::default()
    }

    /// Replace the relation with the deduplicated contents of `rows`. O(rows).
    pub fn rebuild(&mut self, rows: &[MappingRow]) {
        self.signal_to_segments.clear();
        self.segment_to_signals.clear();

        for row in rows {
            // HashSet insertion dedups repeated (signal, segment) pairs
            self.signal_to_segments
                .entry(row.signal_id.clone())
                .or_default()
                .insert(row.segment_id);
            self.segment_to_signals
                .entry(row.segment_id)
                .or_default()
                .insert(row.signal_id.clone());
        }
    }

    /// Segments mapped to `signal`. Empty for a signal the index doesn't know.
    pub fn segments_of(&self, signal: &SignalId) -> impl Iterator<Item = SegmentId> + '_ {
        self.signal_to_segments
            .get(signal)
            .into_iter()
            .flatten()
            .copied()
    }

    /// Signals sharing `segment`. Empty for a segment the index doesn't know.
    pub fn signals_of(&self, segment: &SegmentId) -> impl Iterator<Item = &SignalId> + '_ {
        self.segment_to_signals.get(segment).into_iter().flatten()
    }

    pub fn contains_signal(&self, signal: &SignalId) -> bool {
        self.signal_to_segments.contains_key(signal)
    }

    pub fn contains_segment(&self, segment: &SegmentId) -> bool {
        self.segment_to_signals.contains_key(segment)
    }

    pub fn signal_count(&self) -> usize {
        self.signal_to_segments.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segment_to_signals.len()
    }

    //for reports
    pub fn iter_pairs(&self) -> impl Iterator<Item = (&SignalId, SegmentId)> + '_ {
        self.signal_to_segments
            .iter()
            .flat_map(|(sig, segs)| segs.iter().map(move |&seg| (sig, seg)))
    }
}
