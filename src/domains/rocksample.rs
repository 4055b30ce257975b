//! A one-dimensional "rock sample" corridor. A single rock of unknown
//! (binary) value sits near one end of a corridor; the agent must decide
//! whether it's worth the trip to sample it. Used to exercise
//! `Check`-preference under an uninformative prior and RAVE-vs-plain
//! comparisons.

use crate::history::History;
use crate::rng::Rng;
use crate::simulator::{Simulator, StepResult};

/// North and South are legal but have no effect in a one-dimensional
/// corridor; kept so the action encoding matches the usual RockSample
/// action set.
pub const NORTH: usize = 0;
pub const SOUTH: usize = 1;
pub const EAST: usize = 2;
pub const WEST: usize = 3;
pub const SAMPLE: usize = 4;
pub const CHECK: usize = 5;
const NUM_ACTIONS: usize = 6;

/// `Check`'s sensor reading: the corridor sensor is perfect, so this
/// always matches the rock's true value.
pub const OBS_BAD: usize = 0;
pub const OBS_GOOD: usize = 1;
/// No information: returned by every action other than `Check`.
pub const OBS_NONE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RockSampleState {
    pub position: usize,
    pub rock_good: bool,
    pub rock_collected: bool,
    pub exited: bool,
}

/// A corridor of `size` cells (0-indexed) with one rock at the far end.
#[derive(Debug, Clone)]
pub struct RockSample {
    size: usize,
    rock_position: usize,
    start_position: usize,
}

impl RockSample {
    /// Builds a corridor of `size` cells with the agent starting at
    /// `size / 2` and the rock at the last cell.
    pub fn new(size: usize) -> Self {
        assert!(size >= 2, "a corridor needs at least two cells");
        RockSample {
            size,
            rock_position: size - 1,
            start_position: size / 2,
        }
    }
}

impl Simulator for RockSample {
    type State = RockSampleState;

    fn create_start_state(&self, rng: &mut Rng) -> Self::State {
        RockSampleState {
            position: self.start_position,
            rock_good: rng.unit_f64() < 0.5,
            rock_collected: false,
            exited: false,
        }
    }

    fn step(&self, state: &mut Self::State, action: usize, _rng: &mut Rng) -> StepResult {
        match action {
            NORTH | SOUTH => StepResult {
                observation: OBS_NONE,
                reward: 0.0,
                terminal: false,
            },
            EAST => {
                if state.position == self.size - 1 {
                    state.exited = true;
                    StepResult {
                        observation: OBS_NONE,
                        reward: 0.0,
                        terminal: true,
                    }
                } else {
                    state.position += 1;
                    StepResult {
                        observation: OBS_NONE,
                        reward: 0.0,
                        terminal: false,
                    }
                }
            }
            WEST => {
                state.position = state.position.saturating_sub(1);
                StepResult {
                    observation: OBS_NONE,
                    reward: 0.0,
                    terminal: false,
                }
            }
            SAMPLE => {
                let reward = if state.position == self.rock_position && !state.rock_collected {
                    if state.rock_good {
                        10.0
                    } else {
                        -10.0
                    }
                } else {
                    -10.0
                };
                if state.position == self.rock_position {
                    state.rock_collected = true;
                    state.rock_good = false;
                }
                StepResult {
                    observation: OBS_NONE,
                    reward,
                    terminal: false,
                }
            }
            CHECK => {
                let observation = if state.rock_good { OBS_GOOD } else { OBS_BAD };
                StepResult {
                    observation,
                    reward: 0.0,
                    terminal: false,
                }
            }
            _ => StepResult {
                observation: OBS_NONE,
                reward: 0.0,
                terminal: false,
            },
        }
    }

    fn num_actions(&self) -> usize {
        NUM_ACTIONS
    }

    fn num_observations(&self) -> usize {
        3
    }

    fn discount(&self) -> f64 {
        0.95
    }

    fn reward_range(&self) -> f64 {
        10.0
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        state.exited
    }

    /// A potential function for the PGS rollout variant: positive
    /// only while a still-good, still-uncollected rock remains at the
    /// agent's current cell, rewarding progress toward sampling it.
    fn potential(&self, state: &Self::State) -> f64 {
        if state.position == self.rock_position && state.rock_good && !state.rock_collected {
            1.0
        } else {
            0.0
        }
    }

    /// Reinvigorates a particle's hidden rock value to stay consistent
    /// with the most recent observation. `Check`/`OBS_NONE` carries no
    /// information, so any particle is left as-is; a `Check` result
    /// pins `rock_good` to what was actually observed.
    fn local_move(&self, state: &mut Self::State, _history: &History, last_observation: usize, _rng: &mut Rng) -> bool {
        match last_observation {
            OBS_GOOD => state.rock_good = true,
            OBS_BAD => state.rock_good = false,
            _ => {}
        }
        true
    }

    /// Prunes actions that can only waste a simulation step: `Check`
    /// once a prior `Check` in this history already pinned the rock's
    /// value (the sensor is perfect, so repeating it learns nothing), and
    /// `West` from the corridor's leftmost cell (no movement, no reward).
    fn pgs_legal(&self, state: &Self::State, history: &History) -> Vec<usize> {
        let mut legal: Vec<usize> = (0..NUM_ACTIONS).collect();
        if history.iter().any(|step| step.action == CHECK) {
            legal.retain(|&a| a != CHECK);
        }
        if state.position == 0 {
            legal.retain(|&a| a != WEST);
        }
        legal
    }

    fn display_state(&self, state: &Self::State) -> String {
        format!(
            "pos={} rock_good={} collected={} exited={}",
            state.position, state.rock_good, state.rock_collected, state.exited
        )
    }

    fn display_action(&self, action: usize) -> String {
        match action {
            NORTH => "N".to_string(),
            SOUTH => "S".to_string(),
            EAST => "E".to_string(),
            WEST => "W".to_string(),
            SAMPLE => "Sample".to_string(),
            CHECK => "Check".to_string(),
            other => format!("a{other}"),
        }
    }

    fn display_observation(&self, observation: usize) -> String {
        match observation {
            OBS_BAD => "bad".to_string(),
            OBS_GOOD => "good".to_string(),
            _ => "none".to_string(),
        }
    }
}
