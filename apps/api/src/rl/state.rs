//! State discretization — maps continuous evaluation features onto the
//! small discrete space the Q-table is keyed by. Used identically at
//! training and inference time; everything here is a pure function.

use serde::{Deserialize, Serialize};

use super::Action;

/// Discrete state tuple. Equal feature values always discretize to equal
/// states, and equal states hash/compare equal — this is the Q-table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiscreteState {
    /// Similarity bin, 0..=9.
    pub sim_bin: u8,
    /// Sentiment bin, 0..=4 (over the [0,1]-normalized value).
    pub sent_bin: u8,
    /// Experience bin, 0..=3.
    pub exp_bin: u8,
    /// Location-match flag, 0 or 1.
    pub loc: u8,
    /// Previous-action index, 0..=3.
    pub prev: u8,
}

/// Continuous inputs to discretization, as produced by an evaluation.
#[derive(Debug, Clone)]
pub struct RlFeatures {
    /// Compatibility (or raw similarity) in [0,1].
    pub match_score: f64,
    /// Sentiment in [-1,1] or already-normalized [0,1].
    pub sentiment: f64,
    pub experience_months: u32,
    pub location_match: bool,
    /// Missing/unknown previous action defaults to REJECT.
    pub prev_action: Option<Action>,
}

/// Accepts sentiment in either [-1,1] or [0,1] and returns [0,1]: negative
/// values map through (v+1)/2, the rest pass through, then clamp.
pub fn normalize_sentiment(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.5;
    }
    let v = if value < 0.0 { (value + 1.0) / 2.0 } else { value };
    v.clamp(0.0, 1.0)
}

/// [0,1] similarity into 10 bins, capped at 9.
pub fn bin_similarity(value: f64) -> u8 {
    let v = if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 };
    ((v * 10.0).floor() as u8).min(9)
}

/// Sentiment into 5 bins over its normalized form, capped at 4.
pub fn bin_sentiment(value: f64) -> u8 {
    let v = normalize_sentiment(value);
    ((v * 5.0).floor() as u8).min(4)
}

/// Experience months into 4 coarse bins.
pub fn bin_experience(months: u32) -> u8 {
    match months {
        0..=12 => 0,
        13..=36 => 1,
        37..=72 => 2,
        _ => 3,
    }
}

pub fn discretize(features: &RlFeatures) -> DiscreteState {
    DiscreteState {
        sim_bin: bin_similarity(features.match_score),
        sent_bin: bin_sentiment(features.sentiment),
        exp_bin: bin_experience(features.experience_months),
        loc: u8::from(features.location_match),
        prev: features.prev_action.unwrap_or(Action::Reject).index() as u8,
    }
}
