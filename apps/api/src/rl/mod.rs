//! Reinforcement-learning decision subsystem: the fixed action set, state
//! discretization, the tabular Q-learning trainer, and the inference policy.

pub mod policy;
pub mod qtable;
pub mod state;
pub mod trainer;

use serde::{Deserialize, Serialize};

/// Hiring actions, in canonical order. The order is load-bearing: Q-vectors
/// index by it and argmax ties resolve to the lowest index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Hire,
    Reject,
    AssignTask,
    Hold,
}

pub const ACTIONS: [Action; 4] = [Action::Hire, Action::Reject, Action::AssignTask, Action::Hold];

impl Action {
    pub fn index(self) -> usize {
        match self {
            Action::Hire => 0,
            Action::Reject => 1,
            Action::AssignTask => 2,
            Action::Hold => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Action> {
        ACTIONS.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Hire => "HIRE",
            Action::Reject => "REJECT",
            Action::AssignTask => "ASSIGN_TASK",
            Action::Hold => "HOLD",
        }
    }

    /// Parses an action name. Unknown names yield `None`; the discretizer
    /// maps that to the REJECT default.
    pub fn from_name(name: &str) -> Option<Action> {
        match name {
            "HIRE" => Some(Action::Hire),
            "REJECT" => Some(Action::Reject),
            "ASSIGN_TASK" => Some(Action::AssignTask),
            "HOLD" => Some(Action::Hold),
            _ => None,
        }
    }
}
