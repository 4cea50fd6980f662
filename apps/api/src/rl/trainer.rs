//! Offline Q-learning trainer. Pure simulation: episodes are sampled from a
//! synthetic state distribution and rewarded by a fixed heuristic outcome
//! model — no real evaluation data is touched. Everything stochastic runs
//! off one explicitly seeded RNG, so a fixed seed reproduces the table
//! exactly.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use super::qtable::QTable;
use super::state::{discretize, DiscreteState, RlFeatures};
use super::{Action, ACTIONS};

/// Experience buckets (months) the state sampler draws from.
const EXPERIENCE_BUCKETS: [u32; 6] = [6, 18, 30, 48, 84, 120];

/// Probability that a sampled state has a location match.
const LOCATION_MATCH_RATE: f64 = 0.55;

/// Per-bin experience normalization used by the reward model.
const EXP_NORM: [f64; 4] = [0.15, 0.45, 0.70, 0.90];

/// Uniform noise half-width added to the performance proxy.
const PERF_NOISE: f64 = 0.03;

#[derive(Debug, Clone)]
pub struct TrainerConfig {
    pub episodes: u32,
    pub steps_per_episode: u32,
    /// Learning rate α.
    pub alpha: f64,
    /// Discount factor γ.
    pub gamma: f64,
    /// Initial exploration rate ε.
    pub epsilon: f64,
    pub epsilon_min: f64,
    pub epsilon_decay: f64,
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            episodes: 2000,
            steps_per_episode: 6,
            alpha: 0.12,
            gamma: 0.95,
            epsilon: 1.0,
            epsilon_min: 0.05,
            epsilon_decay: 0.995,
            seed: 42,
        }
    }
}

impl TrainerConfig {
    /// Shorter schedule used when the service bootstraps a missing table at
    /// startup.
    pub fn bootstrap() -> Self {
        Self {
            episodes: 1200,
            ..Self::default()
        }
    }
}

/// Runs the full training schedule and returns the value table.
pub fn train(config: &TrainerConfig) -> QTable {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut table = QTable::new();
    let mut epsilon = config.epsilon;

    for _ in 0..config.episodes {
        let mut state = sample_state(&mut rng);
        for _ in 0..config.steps_per_episode {
            let action_idx = epsilon_greedy(&table, &state, epsilon, &mut rng);
            let reward = simulate_reward(&state, action_idx, &mut rng);
            // The environment is episodic by construction: the next state is
            // an independent resample, not a transition.
            let next_state = sample_state(&mut rng);

            let max_next = table
                .values(&next_state)
                .into_iter()
                .fold(f64::NEG_INFINITY, f64::max);
            let q = table.entry(state);
            q[action_idx] += config.alpha * (reward + config.gamma * max_next - q[action_idx]);

            state = next_state;
        }
        epsilon = (epsilon * config.epsilon_decay).max(config.epsilon_min);
    }

    info!(
        "trained Q-table: {} states over {} episodes (seed {})",
        table.len(),
        config.episodes,
        config.seed
    );
    table
}

/// Draws a plausible random state: uniform similarity and sentiment, one of
/// a handful of experience buckets, a biased location flag, and a uniform
/// previous action.
fn sample_state(rng: &mut ChaCha8Rng) -> DiscreteState {
    let match_score: f64 = rng.gen();
    let sentiment: f64 = rng.gen();
    let experience_months = EXPERIENCE_BUCKETS[rng.gen_range(0..EXPERIENCE_BUCKETS.len())];
    let location_match = rng.gen::<f64>() < LOCATION_MATCH_RATE;
    let prev_action = ACTIONS[rng.gen_range(0..ACTIONS.len())];
    discretize(&RlFeatures {
        match_score,
        sentiment,
        experience_months,
        location_match,
        prev_action: Some(prev_action),
    })
}

/// Continuous proxies recovered from a discrete state: bin centers for
/// similarity and sentiment, the fixed per-bucket experience table, and the
/// location flag as 0/1.
fn state_to_continuous(state: &DiscreteState) -> (f64, f64, f64, f64) {
    let m = (f64::from(state.sim_bin) + 0.5) / 10.0;
    let s = (f64::from(state.sent_bin) + 0.5) / 5.0;
    let e = EXP_NORM[usize::from(state.exp_bin).min(EXP_NORM.len() - 1)];
    let l = f64::from(state.loc);
    (m, s, e, l)
}

/// Synthetic reward model. A noisy performance proxy drives per-action
/// shaping; the thresholds and constants are part of the contract and must
/// stay put for seed-reproducible training.
fn simulate_reward(state: &DiscreteState, action_idx: usize, rng: &mut ChaCha8Rng) -> f64 {
    let (m, s, e, l) = state_to_continuous(state);
    let noise = rng.gen_range(-PERF_NOISE..PERF_NOISE);
    let perf = (0.6 * m + 0.2 * s + 0.15 * e + 0.05 * l + noise).clamp(0.0, 1.0);

    match Action::from_index(action_idx).unwrap_or(Action::Hold) {
        Action::Hire => {
            if perf >= 0.70 {
                1.0 + if s > 0.5 { 0.1 } else { 0.0 }
            } else if perf <= 0.40 {
                -1.0
            } else if m > 0.65 {
                0.1
            } else {
                -0.1
            }
        }
        Action::Reject => {
            if perf < 0.40 {
                0.5
            } else if perf >= 0.70 {
                -0.6
            } else {
                -0.05
            }
        }
        Action::AssignTask => {
            let p_success = (0.25 + 0.5 * m + 0.15 * e + 0.1 * l).clamp(0.0, 1.0);
            if rng.gen::<f64>() < p_success {
                0.6
            } else {
                -0.4
            }
        }
        Action::Hold => -0.05,
    }
}

/// Epsilon-greedy action selection: explore uniformly with probability ε,
/// otherwise exploit the argmax (ties to the first index).
fn epsilon_greedy(
    table: &QTable,
    state: &DiscreteState,
    epsilon: f64,
    rng: &mut ChaCha8Rng,
) -> usize {
    if rng.gen::<f64>() < epsilon {
        return rng.gen_range(0..ACTIONS.len());
    }
    QTable::best_action_index(&table.values(state))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> TrainerConfig {
        TrainerConfig {
            episodes: 400,
            ..TrainerConfig::default()
        }
    }

    #[test]
    fn test_training_is_deterministic_for_a_seed() {
        let config = small_config();
        let a = train(&config);
        let b = train(&config);
        assert_eq!(a.len(), b.len());
        for state in a.states() {
            assert_eq!(a.values(state), b.values(state), "state {state:?} diverged");
        }
    }

    #[test]
    fn test_different_seeds_produce_different_tables() {
        let a = train(&small_config());
        let b = train(&TrainerConfig {
            seed: 7,
            ..small_config()
        });
        let diverged = a
            .states()
            .any(|s| a.values(s) != b.values(s));
        assert!(diverged);
    }

    #[test]
    fn test_trained_table_is_populated() {
        let table = train(&small_config());
        assert!(!table.is_empty());
    }

    #[test]
    fn test_hire_beats_reject_on_strong_states() {
        // Statistical property: over states with similarity bin >= 8 and a
        // location match, HIRE should average higher value than REJECT.
        let table = train(&TrainerConfig::default());
        let mut hire_sum = 0.0;
        let mut reject_sum = 0.0;
        let mut n = 0u32;
        for state in table.states() {
            if state.sim_bin >= 8 && state.loc == 1 {
                let v = table.values(state);
                hire_sum += v[Action::Hire.index()];
                reject_sum += v[Action::Reject.index()];
                n += 1;
            }
        }
        assert!(n > 0, "no strong states visited during training");
        assert!(
            hire_sum / f64::from(n) > reject_sum / f64::from(n),
            "hire avg {} <= reject avg {}",
            hire_sum / f64::from(n),
            reject_sum / f64::from(n)
        );
    }

    #[test]
    fn test_reward_model_hire_thresholds() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        // sim_bin 9, sent_bin 4, exp_bin 3, loc 1: perf far above 0.70.
        let strong = DiscreteState {
            sim_bin: 9,
            sent_bin: 4,
            exp_bin: 3,
            loc: 1,
            prev: 1,
        };
        let r = simulate_reward(&strong, Action::Hire.index(), &mut rng);
        assert!((r - 1.1).abs() < 1e-9, "reward was {r}");

        // sim_bin 0, sent_bin 0, exp_bin 0, loc 0: perf far below 0.40.
        let weak = DiscreteState {
            sim_bin: 0,
            sent_bin: 0,
            exp_bin: 0,
            loc: 0,
            prev: 1,
        };
        let r = simulate_reward(&weak, Action::Hire.index(), &mut rng);
        assert_eq!(r, -1.0);
        let r = simulate_reward(&weak, Action::Reject.index(), &mut rng);
        assert_eq!(r, 0.5);
    }

    #[test]
    fn test_reward_model_hold_is_fixed_penalty() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let state = DiscreteState {
            sim_bin: 5,
            sent_bin: 2,
            exp_bin: 1,
            loc: 0,
            prev: 0,
        };
        for _ in 0..10 {
            assert_eq!(simulate_reward(&state, Action::Hold.index(), &mut rng), -0.05);
        }
    }

    #[test]
    fn test_exploit_prefers_known_best_action() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let state = DiscreteState {
            sim_bin: 4,
            sent_bin: 2,
            exp_bin: 1,
            loc: 0,
            prev: 1,
        };
        let mut table = QTable::new();
        table.entry(state)[Action::AssignTask.index()] = 2.0;
        // epsilon 0: always exploit.
        assert_eq!(
            epsilon_greedy(&table, &state, 0.0, &mut rng),
            Action::AssignTask.index()
        );
    }
}
