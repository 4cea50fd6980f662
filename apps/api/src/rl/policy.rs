//! Decision policy — turns a discrete state (plus the continuous inputs the
//! fallback rule needs) into a hiring action.
//!
//! The service holds one `PolicyService` for its lifetime. The value table
//! inside is an immutable snapshot behind a lock: readers clone the `Arc`,
//! retraining swaps the whole snapshot, and nobody ever observes a
//! half-updated policy.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use super::qtable::QTable;
use super::state::DiscreteState;
use super::Action;

/// Fallback rule thresholds.
const FALLBACK_HIRE_SCORE: f64 = 0.80;
const FALLBACK_TASK_SCORE: f64 = 0.65;

/// Where a decision came from, reported alongside the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionSource {
    #[serde(rename = "RL")]
    Rl,
    #[serde(rename = "RULE_FALLBACK")]
    RuleFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub action: Action,
    pub source: DecisionSource,
}

pub struct PolicyService {
    table: RwLock<Option<Arc<QTable>>>,
}

impl PolicyService {
    pub fn new(table: Option<QTable>) -> Self {
        Self {
            table: RwLock::new(table.map(Arc::new)),
        }
    }

    /// The current table snapshot, if any.
    pub fn snapshot(&self) -> Option<Arc<QTable>> {
        self.table.read().expect("policy lock poisoned").clone()
    }

    pub fn has_table(&self) -> bool {
        self.snapshot().is_some()
    }

    /// Replaces the live table with a freshly trained one. Readers that
    /// already hold a snapshot keep it; new decisions see the new table.
    pub fn swap(&self, table: QTable) {
        *self.table.write().expect("policy lock poisoned") = Some(Arc::new(table));
    }

    /// Picks an action for a state. With a table: argmax over the state's
    /// value vector, ties to the first index — an unseen state reads as
    /// all zeros, so it deliberately resolves to HIRE, the first action in
    /// canonical order. Without one: the deterministic rule fallback.
    pub fn decide(&self, state: &DiscreteState, match_score: f64, location_match: bool) -> Decision {
        match self.snapshot() {
            Some(table) => {
                let values = table.values(state);
                let best = QTable::best_action_index(&values);
                Decision {
                    action: Action::from_index(best).unwrap_or(Action::Reject),
                    source: DecisionSource::Rl,
                }
            }
            None => Decision {
                action: rule_fallback(match_score, location_match),
                source: DecisionSource::RuleFallback,
            },
        }
    }
}

/// The table-less rule: location match and a strong score hire; a moderate
/// score earns a trial task; everything else rejects. Never HOLD.
pub fn rule_fallback(match_score: f64, location_match: bool) -> Action {
    if location_match && match_score >= FALLBACK_HIRE_SCORE {
        Action::Hire
    } else if match_score >= FALLBACK_TASK_SCORE {
        Action::AssignTask
    } else {
        Action::Reject
    }
}
