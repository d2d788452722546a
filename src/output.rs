//! Persistence boundary: the on-disk level format and the file sink.
//!
//! A level record carries the certified move count and the tubes with
//! letter-coded colors, matching the format consumed by the game client.
//! The record is fully built in memory before anything is written; there
//! are no partial writes.

use std::collections::HashMap;
use std::error::Error;
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::puzzle::{Color, Configuration, Tube};

/// One accepted level as persisted to disk.
///
/// Serializes as `{"moves": 3, "tubes": [["a","b"],["b","a"],[]]}` with the
/// first letter of each tube at the bottom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub moves: usize,
    pub tubes: Vec<Vec<Color>>,
}

impl LevelRecord {
    pub fn new(config: &Configuration, moves: usize) -> Self {
        Self {
            moves,
            tubes: config.tubes().iter().map(|tube| tube.to_vec()).collect(),
        }
    }

    pub fn to_configuration(&self) -> Configuration {
        Configuration::from_tubes(
            self.tubes
                .iter()
                .map(|tube| Tube::from_slice(tube))
                .collect(),
        )
    }

    /// Tube height implied by the record: in a well-formed level every color
    /// occurs exactly `height` times. Returns `None` for records that break
    /// that invariant (or contain no balls at all).
    pub fn implied_height(&self) -> Option<usize> {
        let mut counts: HashMap<Color, usize> = HashMap::new();
        for tube in &self.tubes {
            for &ball in tube {
                *counts.entry(ball).or_insert(0) += 1;
            }
        }
        let &height = counts.values().next()?;
        if counts.values().all(|&n| n == height) {
            Some(height)
        } else {
            None
        }
    }
}

/// Failure writing a level record; propagated to the caller untouched.
#[derive(Debug)]
pub struct PersistenceError {
    pub path: PathBuf,
    pub source: io::Error,
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to write level to {}: {}",
            self.path.display(),
            self.source
        )
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Destination for accepted levels. The generation pipeline only ever talks
/// to this seam; tests substitute an in-memory sink.
pub trait LevelSink {
    /// Persist one accepted level. `index` is 1-based.
    fn persist(&mut self, index: usize, record: &LevelRecord) -> Result<(), PersistenceError>;
}

/// Derive the per-level output path by inserting the 1-based level index
/// before the extension: `level.json` becomes `level_3.json`.
pub fn indexed_path(base: &Path, index: usize) -> PathBuf {
    let stem = base
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("level");
    match base.extension().and_then(OsStr::to_str) {
        Some(ext) => base.with_file_name(format!("{stem}_{index}.{ext}")),
        None => base.with_file_name(format!("{stem}_{index}")),
    }
}

/// Writes each accepted level as pretty-printed JSON next to `base`.
pub struct JsonFileSink {
    base: PathBuf,
}

impl JsonFileSink {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl LevelSink for JsonFileSink {
    fn persist(&mut self, index: usize, record: &LevelRecord) -> Result<(), PersistenceError> {
        let path = indexed_path(&self.base, index);
        let json = serde_json::to_string_pretty(record).map_err(|e| PersistenceError {
            path: path.clone(),
            source: io::Error::other(e),
        })?;
        fs::write(&path, json).map_err(|e| PersistenceError {
            path: path.clone(),
            source: e,
        })?;
        println!("saved level {} to {} ({} moves)", index, path.display(), record.moves);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_json_shape() {
        let config = Configuration::from_letters(&["ab", "ba", ""]);
        let record = LevelRecord::new(&config, 3);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({"moves": 3, "tubes": [["a", "b"], ["b", "a"], []]})
        );
    }

    #[test]
    fn test_record_round_trip() {
        let config = Configuration::from_letters(&["abc", "cab", "bca", ""]);
        let record = LevelRecord::new(&config, 9);
        let json = serde_json::to_string(&record).unwrap();
        let parsed: LevelRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
        assert_eq!(parsed.to_configuration(), config);
    }

    #[test]
    fn test_implied_height() {
        let record = LevelRecord::new(&Configuration::from_letters(&["ab", "ba", ""]), 3);
        assert_eq!(record.implied_height(), Some(2));

        let uneven = LevelRecord::new(&Configuration::from_letters(&["ab", "b", ""]), 0);
        assert_eq!(uneven.implied_height(), None);

        let empty = LevelRecord::new(&Configuration::from_letters(&["", ""]), 0);
        assert_eq!(empty.implied_height(), None);
    }

    #[test]
    fn test_indexed_path() {
        assert_eq!(
            indexed_path(Path::new("level.json"), 1),
            PathBuf::from("level_1.json")
        );
        assert_eq!(
            indexed_path(Path::new("out/pack.json"), 12),
            PathBuf::from("out/pack_12.json")
        );
        assert_eq!(indexed_path(Path::new("levels"), 3), PathBuf::from("levels_3"));
    }

    #[test]
    fn test_json_file_sink_writes_record() {
        let base = std::env::temp_dir().join(format!("tubesort-sink-{}.json", std::process::id()));
        let record = LevelRecord::new(&Configuration::from_letters(&["aa", "bb", ""]), 0);

        let mut sink = JsonFileSink::new(&base);
        sink.persist(1, &record).unwrap();

        let path = indexed_path(&base, 1);
        let written = fs::read_to_string(&path).unwrap();
        let parsed: LevelRecord = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, record);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_sink_reports_write_failure() {
        let mut sink = JsonFileSink::new("this-dir-does-not-exist/level.json");
        let record = LevelRecord::new(&Configuration::from_letters(&["aa", "bb"]), 0);
        let err = sink.persist(1, &record).unwrap_err();
        assert_eq!(
            err.path,
            PathBuf::from("this-dir-does-not-exist/level_1.json")
        );
    }
}
