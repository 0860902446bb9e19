/*
Inputs:

    a TOON mapping export (the signal/XD dimension table: one row per
    (signal_id, segment_id) pair, duplicates allowed)

Outputs:

    Vec<MappingRow>, ready for SelectionEngine::update_mappings

Responsibilities:

    Read + decode the file, surface IO and decode failures as typed errors.
    Deduplication is NOT done here; MappingIndex::rebuild owns that.
*/
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use toon_format::decode_default;

use crate::core::types::MappingRow;

/// On-disk shape of the mapping export: a single `rows` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingFile {
    pub rows: Vec<MappingRow>,
}

#[derive(Debug)]
pub enum MappingLoadError {
    Io { path: PathBuf, source: io::Error },
    Decode { message: String },
}

impl fmt::Display for MappingLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingLoadError::Io { path, source } => {
                write!(f, "failed to read mapping file {}: {}", path.display(), source)
            }
            MappingLoadError::Decode { message } => {
                write!(f, "failed to decode mapping document: {}", message)
            }
        }
    }
}

impl std::error::Error for MappingLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MappingLoadError::Io { source, .. } => Some(source),
            MappingLoadError::Decode { .. } => None,
        }
    }
}

/// Decode mapping rows from an in-memory TOON document.
pub fn parse_mapping_rows(input: &str) -> Result<Vec<MappingRow>, MappingLoadError> {
    let file: MappingFile = decode_default(input).map_err(|e| MappingLoadError::Decode {
        message: e.to_string(),
    })?;
    Ok(file.rows)
}

/// Read and decode a mapping export from disk.
pub fn load_mapping_rows(path: &Path) -> Result<Vec<MappingRow>, MappingLoadError> {
    let contents = fs::read_to_string(path).map_err(|source| MappingLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_mapping_rows(&contents)
}
