// selection orchestration + the public query/mutation API
use std::collections::HashSet;

use tracing::{debug, trace};

use crate::core::contribution::ContributionLedger;
use crate::core::index::MappingIndex;
use crate::core::overrides::OverrideLedger;
use crate::core::types::{MappingRow, SegmentId, SignalId};

/// Sole owner and sole mutator of map selection state.
///
/// Holds the set of selected signal ids, the contribution and override
/// ledgers, and the mapping index they are reconciled against. Map and chart
/// components read the derived views and route every change through the
/// mutation API; nothing hands out a mutable set for callers to poke at.
/// That split is what makes "why is this segment selected" answerable:
/// either its contribution count is nonzero (a selected signal maps to it)
/// or the user forced it directly.
///
/// Every operation is total. Toggling an id unknown to the current mapping
/// is a silent no-op for contribution bookkeeping but still records the
/// membership/override, so a later `update_mappings` that brings the id back
/// makes the selection meaningful again without replaying history.
///
/// Single-threaded and synchronous: each mutation runs to completion before
/// any reader observes state, so the engine needs no locking and pushes no
/// notifications. The UI layer wraps it with its own reactivity.
#[derive(Debug, Default)]
pub struct SelectionEngine {
    index: MappingIndex,
    selected_signals: HashSet<SignalId>,
    contribution: ContributionLedger,
    overrides: OverrideLedger,
}

impl SelectionEngine {
    pub fn new() -> Self {
        SelectionEngine::default()
    }

    /// Replace the signal/segment mapping with a fresh dataset snapshot.
    ///
    /// Selections and overrides are kept: a filter tweak must not wipe what
    /// the user picked. Contribution counts are recomputed against the new
    /// index so that selected signals which vanished from the dataset become
    /// inert instead of leaving stale counters behind. Callers that want a
    /// reset call `clear_all_selections` explicitly.
    pub fn update_mappings(&mut self, rows: &[MappingRow]) {
        self.index.rebuild(rows);
        self.contribution.recompute(&self.index, &self.selected_signals);
        debug!(
            rows = rows.len(),
            signals = self.index.signal_count(),
            segments = self.index.segment_count(),
            "mapping index rebuilt"
        );
    }

    /// Flip membership of `signal` and adjust contributions for every segment
    /// it maps to. Overrides are never touched here; a pinned segment keeps
    /// its pinned value no matter what its signals do.
    pub fn toggle_signal(&mut self, signal: impl Into<SignalId>) {
        let signal = signal.into();
        if self.selected_signals.remove(&signal) {
            trace!(%signal, "signal deselected");
            self.contribution
                .on_signal_deselected(self.index.segments_of(&signal));
        } else {
            trace!(%signal, "signal selected");
            self.contribution
                .on_signal_selected(self.index.segments_of(&signal));
            self.selected_signals.insert(signal);
        }
    }

    /// Flip the derived selection of one segment via a sticky override.
    ///
    /// Uses the *pre-toggle* derived value, so toggling a segment that is
    /// currently selected through its signal forces it off, and toggling it
    /// again forces it back on. Signals and contributions are untouched.
    pub fn toggle_xd_segment(&mut self, segment: impl Into<SegmentId>) {
        let segment = segment.into();
        let derived_now = self.is_xd_segment_selected(&segment);
        trace!(%segment, forced_to = !derived_now, "segment override toggled");
        self.overrides.toggle(segment, derived_now);
    }

    pub fn is_signal_selected(&self, signal: &SignalId) -> bool {
        self.selected_signals.contains(signal)
    }

    /// Derived value: override if the user set one, else contribution > 0.
    pub fn is_xd_segment_selected(&self, segment: &SegmentId) -> bool {
        match self.overrides.get(segment) {
            Some(forced) => forced,
            None => self.contribution.count(segment) > 0,
        }
    }

    /// Currently selected signals, sorted for stable display and queries.
    pub fn selected_signals_list(&self) -> Vec<SignalId> {
        let mut out: Vec<SignalId> = self.selected_signals.iter().cloned().collect();
        out.sort();
        out
    }

    /// Every segment whose derived selection is true, sorted.
    ///
    /// This is the one list map/chart filtering code may consume. It is
    /// derived on every call from the ledgers, never stored as its own set;
    /// a separately-mutated copy is exactly the provenance-losing shape that
    /// caused shared segments to be deselected wrongly.
    pub fn selected_xd_segments_list(&self) -> Vec<SegmentId> {
        // candidates: anything with a nonzero count, plus anything overridden
        let mut out: Vec<SegmentId> = self
            .contribution
            .segments()
            .chain(self.overrides.iter().map(|(seg, _)| seg))
            .filter(|seg| self.is_xd_segment_selected(seg))
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// True iff any signal is selected or any segment's derived value is true.
    pub fn has_map_selections(&self) -> bool {
        !self.selected_signals.is_empty()
            || self
                .contribution
                .segments()
                .chain(self.overrides.iter().map(|(seg, _)| seg))
                .any(|seg| self.is_xd_segment_selected(&seg))
    }

    /// Segment filter for outbound analytics queries.
    ///
    /// `None` = no map selections at all, run the query unfiltered.
    /// `Some(vec)` = filter to exactly these segments; an empty vec with
    /// selections present means "explicitly empty result", not unfiltered
    /// (e.g. every mapped segment of the selected signal was forced off).
    pub fn segment_filter(&self) -> Option<Vec<SegmentId>> {
        if self.has_map_selections() {
            Some(self.selected_xd_segments_list())
        } else {
            None
        }
    }

    /// Empty signals, contributions and overrides in one synchronous step.
    /// The mapping index is kept; it belongs to the dataset, not the user.
    pub fn clear_all_selections(&mut self) {
        debug!(
            signals = self.selected_signals.len(),
            overrides = self.overrides.len(),
            "clearing all map selections"
        );
        self.selected_signals.clear();
        self.contribution.clear();
        self.overrides.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(pairs: &[(&str, i64)]) -> SelectionEngine {
        let rows: Vec<MappingRow> = pairs.iter().map(|&p| MappingRow::from(p)).collect();
        let mut engine = SelectionEngine::new();
        engine.update_mappings(&rows);
        engine
    }

    fn seg_list(engine: &SelectionEngine) -> Vec<i64> {
        engine.selected_xd_segments_list().iter().map(|s| s.0).collect()
    }

    #[test]
    fn union_of_selected_signal_segments_with_no_overrides() {
        let mut engine = engine_with(&[("1", 100), ("1", 200), ("2", 200), ("2", 300)]);

        engine.toggle_signal("1");
        engine.toggle_signal("2");

        assert_eq!(seg_list(&engine), vec![100, 200, 300]);
        assert!(engine.is_signal_selected(&"1".into()));
        assert!(engine.is_signal_selected(&"2".into()));
    }

    ///regression: deselecting signal A used to drop segment 200 even though
    ///signal B still maps to it. The shared segment must survive.
    #[test]
    fn shared_segment_survives_deselecting_one_of_its_signals() {
        let mut engine = engine_with(&[("A", 100), ("A", 200), ("B", 200), ("B", 300)]);

        engine.toggle_signal("A");
        engine.toggle_signal("B");
        engine.toggle_signal("A"); // deselect A

        assert!(!engine.is_xd_segment_selected(&SegmentId(100)));
        assert!(engine.is_xd_segment_selected(&SegmentId(200)), "B still contributes to 200");
        assert!(engine.is_xd_segment_selected(&SegmentId(300)));
    }

    #[test]
    fn manual_override_wins_over_contribution() {
        let mut engine = engine_with(&[("A", 100), ("A", 200)]);

        engine.toggle_signal("A");
        engine.toggle_xd_segment(100); // manual deselect of a contributed segment

        assert_eq!(seg_list(&engine), vec![200]);
        assert!(engine.is_signal_selected(&"A".into()), "signal stays selected");
    }

    ///regression: chart not updating after a manual deselect because the
    ///override was dropped when an unrelated signal toggled.
    ///Overrides are sticky until toggled again or cleared.
    #[test]
    fn override_survives_unrelated_signal_toggles() {
        let mut engine = engine_with(&[("A", 100), ("A", 200), ("B", 200), ("B", 300)]);

        engine.toggle_signal("A");
        engine.toggle_xd_segment(200); // force shared segment off
        engine.toggle_signal("B"); // B contributes to 200 now, but the pin holds

        assert!(!engine.is_xd_segment_selected(&SegmentId(200)));
        assert_eq!(seg_list(&engine), vec![100, 300]);

        engine.toggle_signal("B");
        engine.toggle_signal("B"); // toggle B off and on again
        assert!(!engine.is_xd_segment_selected(&SegmentId(200)), "pin still holds");
    }

    #[test]
    fn override_on_unmapped_segment_selects_only_that_segment() {
        let mut engine = engine_with(&[("A", 100)]);

        engine.toggle_xd_segment(999);

        assert_eq!(seg_list(&engine), vec![999]);
        assert!(!engine.is_signal_selected(&"A".into()));
        assert!(engine.has_map_selections());
    }

    #[test]
    fn clear_all_selections_is_atomic_and_idempotent() {
        let mut engine = engine_with(&[("A", 100), ("B", 200)]);

        engine.toggle_signal("A");
        engine.toggle_xd_segment(200);
        engine.toggle_xd_segment(999);

        engine.clear_all_selections();
        engine.clear_all_selections(); // second clear is a no-op

        assert!(engine.selected_signals_list().is_empty());
        assert!(engine.selected_xd_segments_list().is_empty());
        assert!(!engine.has_map_selections());
        assert_eq!(engine.segment_filter(), None);
    }

    #[test]
    fn combined_signal_then_segment_toggle_sequence() {
        let mut engine = engine_with(&[("1", 100), ("1", 200), ("2", 200), ("2", 300)]);

        engine.toggle_signal("1");
        engine.toggle_signal("2");
        assert_eq!(seg_list(&engine), vec![100, 200, 300]);

        engine.toggle_signal("1");
        assert_eq!(seg_list(&engine), vec![200, 300]);

        engine.toggle_xd_segment(300);
        assert_eq!(seg_list(&engine), vec![200]);
    }

    #[test]
    fn toggling_unknown_signal_is_recorded_and_becomes_meaningful_later() {
        let mut engine = engine_with(&[("A", 100)]);

        // "B" is not in the mapping yet: membership recorded, nothing contributed
        engine.toggle_signal("B");
        assert!(engine.is_signal_selected(&"B".into()));
        assert!(seg_list(&engine).is_empty());

        // the dataset refresh brings B in; no history replay needed
        let rows: Vec<MappingRow> = vec![("A", 100).into(), ("B", 500).into()];
        engine.update_mappings(&rows);
        assert_eq!(seg_list(&engine), vec![500]);
    }

    #[test]
    fn update_mappings_keeps_selection_but_degrades_dangling_signals() {
        let mut engine = engine_with(&[("A", 100), ("B", 200)]);

        engine.toggle_signal("A");
        engine.toggle_signal("B");

        // refresh drops A from the dataset entirely
        let rows: Vec<MappingRow> = vec![("B", 200).into()];
        engine.update_mappings(&rows);

        assert!(engine.is_signal_selected(&"A".into()), "membership survives the refresh");
        assert_eq!(seg_list(&engine), vec![200], "A no longer contributes anything");
    }

    #[test]
    fn segment_filter_distinguishes_unfiltered_from_explicitly_empty() {
        let mut engine = engine_with(&[("A", 100)]);

        assert_eq!(engine.segment_filter(), None, "no selections: unfiltered");

        engine.toggle_signal("A");
        engine.toggle_xd_segment(100); // force off the only mapped segment

        assert!(engine.has_map_selections());
        assert_eq!(
            engine.segment_filter(),
            Some(vec![]),
            "selections present but every segment forced off: explicitly empty"
        );
    }

    #[test]
    fn signal_toggle_involution_restores_derived_state() {
        let mut engine = engine_with(&[("A", 100), ("A", 200), ("B", 200)]);

        engine.toggle_signal("B");
        engine.toggle_xd_segment(100);
        let before = seg_list(&engine);

        engine.toggle_signal("A");
        engine.toggle_signal("A");

        assert_eq!(seg_list(&engine), before);
    }

    #[test]
    fn segment_toggle_involution_restores_derived_state() {
        let mut engine = engine_with(&[("A", 100), ("A", 200)]);
        engine.toggle_signal("A");

        assert!(engine.is_xd_segment_selected(&SegmentId(200)));
        engine.toggle_xd_segment(200);
        assert!(!engine.is_xd_segment_selected(&SegmentId(200)));
        engine.toggle_xd_segment(200);
        assert!(engine.is_xd_segment_selected(&SegmentId(200)));
    }

    #[test]
    fn selected_lists_are_sorted() {
        let mut engine = engine_with(&[("9", 300), ("2", 100), ("5", 200)]);

        engine.toggle_signal("9");
        engine.toggle_signal("2");
        engine.toggle_signal("5");

        let sigs: Vec<String> = engine
            .selected_signals_list()
            .iter()
            .map(|s| s.0.clone())
            .collect();
        assert_eq!(sigs, vec!["2", "5", "9"]);
        assert_eq!(seg_list(&engine), vec![100, 200, 300]);
    }
}
