//! Tabular state-action value store.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::ai::state_encoding::StateKey;
use crate::game::Move;

/// Q-values keyed by board state, then by move.
///
/// A move only appears under a state once that pair has been written; absent
/// pairs read as 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    values: HashMap<StateKey, HashMap<Move, f64>>,
}

/// One stored move value, as laid out in the persisted JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MoveValue {
    row: usize,
    col: usize,
    value: f64,
}

/// On-disk layout. `BTreeMap` keeps the output stable between saves.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedTable {
    states: BTreeMap<String, Vec<MoveValue>>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `mv` in `key`, 0 when never written.
    pub fn value_of(&self, key: &StateKey, mv: Move) -> f64 {
        self.values
            .get(key)
            .and_then(|moves| moves.get(&mv))
            .copied()
            .unwrap_or(0.0)
    }

    /// Whether any move has been written under `key`.
    pub fn contains_state(&self, key: &StateKey) -> bool {
        self.values.contains_key(key)
    }

    /// Largest stored value under `key`, 0 when the state is unseen.
    pub fn max_value(&self, key: &StateKey) -> f64 {
        self.values
            .get(key)
            .and_then(|moves| moves.values().copied().reduce(f64::max))
            .unwrap_or(0.0)
    }

    /// Highest-valued candidate that has a stored value under `key`. Ties keep
    /// the first candidate in the order given. `None` when the state is unseen
    /// or no candidate has been valued, in which case the caller picks at random.
    pub fn best_move(&self, key: &StateKey, candidates: &[Move]) -> Option<Move> {
        let moves = self.values.get(key)?;
        let mut best: Option<(Move, f64)> = None;
        for &mv in candidates {
            let Some(&value) = moves.get(&mv) else {
                continue;
            };
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((mv, value)),
            }
        }
        best.map(|(mv, _)| mv)
    }

    /// Insert or overwrite a value.
    pub fn set_value(&mut self, key: StateKey, mv: Move, value: f64) {
        self.values.entry(key).or_default().insert(mv, value);
    }

    /// Number of distinct states.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of stored (state, move) pairs.
    pub fn entry_count(&self) -> usize {
        self.values.values().map(HashMap::len).sum()
    }

    /// Serialize to the persisted JSON layout.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let states = self
            .values
            .iter()
            .map(|(key, moves)| {
                let mut entries: Vec<MoveValue> = moves
                    .iter()
                    .map(|(mv, &value)| MoveValue {
                        row: mv.row,
                        col: mv.col,
                        value,
                    })
                    .collect();
                entries.sort_by_key(|e| (e.row, e.col));
                (key.as_str().to_string(), entries)
            })
            .collect();
        serde_json::to_string(&PersistedTable { states })
    }

    /// Parse the persisted JSON layout. A move listed twice under one state is
    /// rejected rather than silently collapsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let persisted: PersistedTable = serde_json::from_str(json)?;
        let mut values = HashMap::with_capacity(persisted.states.len());
        for (key, entries) in persisted.states {
            let mut moves = HashMap::with_capacity(entries.len());
            for entry in entries {
                let mv = Move::new(entry.row, entry.col);
                if moves.insert(mv, entry.value).is_some() {
                    return Err(<serde_json::Error as serde::de::Error>::custom(format!(
                        "duplicate move {mv} under state {key}"
                    )));
                }
            }
            values.insert(StateKey::from_encoded(key), moves);
        }
        Ok(QTable { values })
    }
}
