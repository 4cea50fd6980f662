//! The state→action value table and its on-disk lifecycle.
//!
//! One canonical snapshot per deployment: saves go through a temp file and
//! an atomic rename, loads read the whole blob or nothing. A state the
//! table has never seen reads as the explicit zero vector rather than being
//! auto-inserted, so lookups never mutate.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::state::DiscreteState;
use super::ACTIONS;

/// Value vector for a state the table has no entry for.
pub const ZERO_VALUES: [f64; 4] = [0.0; 4];

#[derive(Debug, Default, Clone)]
pub struct QTable {
    entries: HashMap<DiscreteState, [f64; 4]>,
}

/// On-disk shape. JSON maps need string keys, so states persist as a list
/// of (state, values) pairs instead of a map.
#[derive(Serialize, Deserialize)]
struct PersistedTable {
    entries: Vec<PersistedEntry>,
}

#[derive(Serialize, Deserialize)]
struct PersistedEntry {
    state: DiscreteState,
    values: [f64; 4],
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Action values for a state; unseen states yield the zero vector.
    pub fn values(&self, state: &DiscreteState) -> [f64; 4] {
        self.entries.get(state).copied().unwrap_or(ZERO_VALUES)
    }

    /// Mutable entry for a state, inserting the zero vector on first touch.
    /// Only the trainer takes this path.
    pub fn entry(&mut self, state: DiscreteState) -> &mut [f64; 4] {
        self.entries.entry(state).or_insert(ZERO_VALUES)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn states(&self) -> impl Iterator<Item = &DiscreteState> {
        self.entries.keys()
    }

    /// Index of the best action for a value vector; ties break to the first
    /// index in canonical action order.
    pub fn best_action_index(values: &[f64; 4]) -> usize {
        let mut best = 0;
        for i in 1..ACTIONS.len() {
            if values[i] > values[best] {
                best = i;
            }
        }
        best
    }

    /// Persists the table to `path` atomically: serialize to `<path>.tmp`,
    /// then rename over the canonical snapshot.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let persisted = PersistedTable {
            entries: self
                .entries
                .iter()
                .map(|(state, values)| PersistedEntry {
                    state: *state,
                    values: *values,
                })
                .collect(),
        };
        let tmp = path.with_extension("tmp");
        let file = File::create(&tmp)
            .with_context(|| format!("Failed to create {}", tmp.display()))?;
        serde_json::to_writer(BufWriter::new(file), &persisted)
            .context("Failed to serialize Q-table")?;
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to move snapshot into {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let persisted: PersistedTable =
            serde_json::from_slice(&bytes).context("Failed to deserialize Q-table")?;
        let entries = persisted
            .entries
            .into_iter()
            .map(|e| (e.state, e.values))
            .collect();
        Ok(Self { entries })
    }

    /// Load for service startup: a missing or corrupt snapshot is the
    /// PolicyUnavailable condition, not an error.
    pub fn load_or_none(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match Self::load(path) {
            Ok(table) => Some(table),
            Err(e) => {
                warn!("Q-table snapshot unreadable, falling back to rule policy: {e:#}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(sim_bin: u8) -> DiscreteState {
        DiscreteState {
            sim_bin,
            sent_bin: 2,
            exp_bin: 1,
            loc: 1,
            prev: 1,
        }
    }

    #[test]
    fn test_unseen_state_reads_zero_vector() {
        let table = QTable::new();
        assert_eq!(table.values(&state(3)), ZERO_VALUES);
        assert!(table.is_empty());
    }

    #[test]
    fn test_lookup_does_not_insert() {
        let table = QTable::new();
        let _ = table.values(&state(3));
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_entry_inserts_and_updates() {
        let mut table = QTable::new();
        table.entry(state(3))[0] = 0.7;
        assert_eq!(table.values(&state(3))[0], 0.7);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_best_action_index_ties_break_first() {
        assert_eq!(QTable::best_action_index(&[0.0, 0.0, 0.0, 0.0]), 0);
        assert_eq!(QTable::best_action_index(&[0.1, 0.5, 0.5, 0.2]), 1);
        assert_eq!(QTable::best_action_index(&[0.1, 0.2, 0.9, 0.2]), 2);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q_table.json");

        let mut table = QTable::new();
        table.entry(state(8))[0] = 1.25;
        table.entry(state(1))[1] = 0.5;
        table.entry(state(1))[3] = -0.05;
        table.save(&path).unwrap();

        let loaded = QTable::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.values(&state(8)), table.values(&state(8)));
        assert_eq!(loaded.values(&state(1)), table.values(&state(1)));
        // A state that was never populated still reads as zero after reload.
        assert_eq!(loaded.values(&state(5)), ZERO_VALUES);
    }

    #[test]
    fn test_save_leaves_no_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q_table.json");
        QTable::new().save(&path).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_load_or_none_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(QTable::load_or_none(&dir.path().join("absent.json")).is_none());
    }

    #[test]
    fn test_load_or_none_corrupt_blob() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q_table.json");
        std::fs::write(&path, b"not json at all {{{").unwrap();
        assert!(QTable::load_or_none(&path).is_none());
    }
}
