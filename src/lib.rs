//! Selection reconciliation for the travel-time dashboard map.
//!
//! Traffic signals and the XD road segments they control are related
//! many-to-many and can be toggled independently or in combination. This
//! crate tracks which of them are selected and derives each segment's state
//! from two sources with distinct provenance:
//!
//! - a **contribution ledger**: per segment, how many currently-selected
//!   signals map to it (a segment shared by two selected signals survives
//!   deselecting one of them);
//! - an **override ledger**: sticky manual forcings from direct segment
//!   clicks, which win over contributions until toggled again or cleared.
//!
//! The derived value is `override if present, else contribution > 0`. Map
//! and chart components read the derived lists and route every change
//! through [`SelectionEngine`]; the engine is the sole mutator of selection
//! state.
//!
//! ```
//! use selection_core::{MappingRow, SegmentId, SelectionEngine};
//!
//! let mut engine = SelectionEngine::new();
//! engine.update_mappings(&[
//!     MappingRow::from(("1", 100)),
//!     MappingRow::from(("1", 200)),
//!     MappingRow::from(("2", 200)),
//!     MappingRow::from(("2", 300)),
//! ]);
//!
//! engine.toggle_signal("1");
//! engine.toggle_signal("2");
//! engine.toggle_signal("1"); // deselect: segment 200 survives via signal "2"
//! engine.toggle_xd_segment(300); // manual deselect, sticky
//!
//! assert_eq!(engine.selected_xd_segments_list(), vec![SegmentId(200)]);
//! ```

pub mod core;
pub mod mapping;

pub use crate::core::contribution::ContributionLedger;
pub use crate::core::engine::SelectionEngine;
pub use crate::core::index::MappingIndex;
pub use crate::core::overrides::OverrideLedger;
pub use crate::core::types::{MappingRow, SegmentId, SignalId};
pub use crate::mapping::loader::{MappingLoadError, load_mapping_rows, parse_mapping_rows};
