// identity types shared across the core
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, stable identity of a traffic-signal intersection.
///
/// The dashboard backend keys signals by a string ID column, so the wrapper
/// owns a `String`. Comparable + hashable, nothing else; display names and
/// coordinates live in external dimension stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalId(pub String);

/// Opaque identity of an XD road segment (an INRIX XD link).
///
/// XD codes are large integers in the source data, so `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub i64);

impl SignalId {
    pub fn new(id: impl Into<String>) -> Self {
        SignalId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl SegmentId {
    pub fn new(id: i64) -> Self {
        SegmentId(id)
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SignalId {
    fn from(s: &str) -> Self {
        SignalId(s.to_string())
    }
}

impl From<i64> for SegmentId {
    fn from(v: i64) -> Self {
        SegmentId(v)
    }
}

// lets call sites pass plain integer literals
impl From<i32> for SegmentId {
    fn from(v: i32) -> Self {
        SegmentId(v as i64)
    }
}

/// One (signal, segment) pair from the signal/XD dimension export.
///
/// The dataset layer hands the engine a flat list of these whenever the
/// user-visible dataset changes; multiplicity both ways is expected (one
/// signal controls many segments, one segment can be shared by signals).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MappingRow {
    pub signal_id: SignalId,
    pub segment_id: SegmentId,
}

impl MappingRow {
    pub fn new(signal_id: impl Into<SignalId>, segment_id: impl Into<SegmentId>) -> Self {
        MappingRow {
            signal_id: signal_id.into(),
            segment_id: segment_id.into(),
        }
    }
}

impl From<(&str, i64)> for MappingRow {
    fn from((sig, seg): (&str, i64)) -> Self {
        MappingRow::new(sig, seg)
    }
}
