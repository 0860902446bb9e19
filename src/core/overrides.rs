// sticky manual segment forcings
use std::collections::HashMap;

use crate::core::types::SegmentId;

/// Explicit user forcings of a segment's selection state, independent of the
/// contribution counts. Absent key = "no override, use the derived default".
///
/// Overrides are sticky: nothing in the contribution ledger ever clears one.
/// A manually deselected shared segment stays deselected while unrelated
/// signal selections come and go; only a second toggle of that segment or a
/// full clear removes the entry. Entries whose segment id vanishes from a
/// rebuilt mapping are retained (they pin the derived value if the id returns).
#[derive(Debug, Default, Clone)]
pub struct OverrideLedger {
    forced: HashMap<SegmentId, bool>,
}

impl OverrideLedger {
    pub fn new() -> Self {
        OverrideLedger::default()
    }

    /// The override for `segment`, if the user has set one.
    pub fn get(&self, segment: &SegmentId) -> Option<bool> {
        self.forced.get(segment).copied()
    }

    /// Segments the user has forced on.
    pub fn forced_on(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.forced
            .iter()
            .filter_map(|(&seg, &on)| on.then_some(seg))
    }

    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, bool)> + '_ {
        self.forced.iter().map(|(&seg, &on)| (seg, on))
    }

    pub fn is_empty(&self) -> bool {
        self.forced.is_empty()
    }

    pub fn len(&self) -> usize {
        self.forced.len()
    }

    /// Record a direct user toggle of `segment`.
    ///
    /// `derived_now` is the segment's derived selection value *before* the
    /// toggle (override if present, else contribution > 0); the new override
    /// is its negation. The engine computes `derived_now` because the ledger
    /// deliberately knows nothing about contributions.
    pub(crate) fn toggle(&mut self, segment: SegmentId, derived_now: bool) {
        self.forced.insert(segment, !derived_now);
    }

    pub(crate) fn clear(&mut self) {
        self.forced.clear();
    }
}
