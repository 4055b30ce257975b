//! A deterministic multi-armed bandit. The simplest possible `Simulator`:
//! one step, one observation, a fixed per-arm reward. Used to exercise
//! convergence and terminal-reward pass-through.

use crate::history::History;
use crate::rng::Rng;
use crate::simulator::{Simulator, StepResult};

/// Whether the single coin has been spent yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BanditState {
    spent: bool,
}

/// An `n`-armed bandit with fixed, deterministic per-arm rewards.
#[derive(Debug, Clone)]
pub struct Bandit {
    rewards: Vec<f64>,
}

impl Bandit {
    /// Builds a bandit with one arm per entry in `rewards`.
    pub fn new(rewards: Vec<f64>) -> Self {
        assert!(!rewards.is_empty(), "a bandit needs at least one arm");
        Bandit { rewards }
    }

    /// The canonical two-armed bandit used in the test scenarios: arm 0
    /// pays 0, arm 1 pays 1.
    pub fn two_armed() -> Self {
        Bandit::new(vec![0.0, 1.0])
    }
}

impl Simulator for Bandit {
    type State = BanditState;

    fn create_start_state(&self, _rng: &mut Rng) -> Self::State {
        BanditState { spent: false }
    }

    fn step(&self, state: &mut Self::State, action: usize, _rng: &mut Rng) -> StepResult {
        state.spent = true;
        StepResult {
            observation: 0,
            reward: self.rewards[action],
            terminal: true,
        }
    }

    fn num_actions(&self) -> usize {
        self.rewards.len()
    }

    fn num_observations(&self) -> usize {
        1
    }

    fn discount(&self) -> f64 {
        1.0
    }

    fn reward_range(&self) -> f64 {
        self.rewards.iter().cloned().fold(1.0_f64, |acc, r| acc.max(r.abs()))
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        state.spent
    }

    fn generate_legal(&self, state: &Self::State, _history: &History) -> Vec<usize> {
        if state.spent {
            Vec::new()
        } else {
            (0..self.rewards.len()).collect()
        }
    }

    fn display_state(&self, state: &Self::State) -> String {
        if state.spent {
            "spent".to_string()
        } else {
            "fresh".to_string()
        }
    }

    fn display_action(&self, action: usize) -> String {
        format!("arm{action}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unspent_state_exposes_every_arm() {
        let bandit = Bandit::two_armed();
        let history = History::new();
        let state = BanditState { spent: false };
        assert_eq!(bandit.generate_legal(&state, &history), vec![0, 1]);
    }

    #[test]
    fn stepping_pays_the_arm_reward_and_terminates() {
        let bandit = Bandit::two_armed();
        let mut rng = Rng::from_seed(0);
        let mut state = bandit.create_start_state(&mut rng);
        let result = bandit.step(&mut state, 1, &mut rng);
        assert_eq!(result.reward, 1.0);
        assert!(result.terminal);
        assert!(bandit.is_terminal(&state));
    }

    #[test]
    fn reward_range_covers_the_largest_magnitude_arm() {
        let bandit = Bandit::new(vec![0.0, -3.0, 2.0]);
        assert_eq!(bandit.reward_range(), 3.0);
    }
}
