//! The abstract domain interface consumed by the engine.
//!
//! A single-agent, partially observable contract: `step` advances a state
//! and returns `(observation, reward, terminal)`. The rollout trace
//! returned alongside a simulation's return is what lets RAVE's
//! action-trace bookkeeping fall out of the existing rollout machinery
//! instead of needing something new.

use crate::history::History;
use crate::rng::Rng;

/// The outcome of stepping a state forward by one action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub observation: usize,
    pub reward: f64,
    pub terminal: bool,
}

/// The domain interface the POMCP engine is generic over.
///
/// Implementors own all state semantics; the engine only ever calls
/// through this trait and never introspects `State` directly.
pub trait Simulator: Send + Sync {
    /// Opaque hidden-state representation. Cloning a state is the
    /// engine's only way to copy one; there is no separate `free` — Rust
    /// drop glue handles deallocation when the last owner goes away.
    type State: Clone + Send + Sync;

    /// Samples a fresh state from the domain's start-state prior.
    fn create_start_state(&self, rng: &mut Rng) -> Self::State;

    /// Checks whether a state is internally consistent. Used only for
    /// optional debug-time invariant checking; defaults to always valid.
    fn validate(&self, _state: &Self::State) -> bool {
        true
    }

    /// Whether a state is terminal — no further actions extend the
    /// episode from here. Defaults to `false`; domains that only signal
    /// termination through `step`'s `StepResult::terminal` need not
    /// override this.
    fn is_terminal(&self, _state: &Self::State) -> bool {
        false
    }

    /// Advances `state` in place by applying `action`, returning the
    /// resulting observation, reward, and terminal flag.
    fn step(&self, state: &mut Self::State, action: usize, rng: &mut Rng) -> StepResult;

    /// Size of the domain's full, fixed action space. Actions are
    /// encoded as `0..num_actions()`.
    fn num_actions(&self) -> usize;

    /// Size of the domain's observation range. Observations are encoded
    /// as `0..num_observations()`, though children are created sparsely.
    fn num_observations(&self) -> usize;

    /// Discount factor applied per step.
    fn discount(&self) -> f64;

    /// An upper bound on `|reward|`, used by convention to scale
    /// `exploration_constant`.
    fn reward_range(&self) -> f64;

    /// Domain-specific legal action set for `state`/`history`. Defaults
    /// to the full action range — an override's absence means "the full
    /// set".
    fn generate_legal(&self, _state: &Self::State, _history: &History) -> Vec<usize> {
        (0..self.num_actions()).collect()
    }

    /// Domain-specific rollout bias. An empty vector (the default) means
    /// "no preference" and callers should fall back to
    /// `generate_legal`.
    fn generate_preferred(&self, _state: &Self::State, _history: &History) -> Vec<usize> {
        Vec::new()
    }

    /// Attempts to perturb `state` into another hidden state consistent
    /// with `history`/`last_observation`, returning whether the proposal
    /// is accepted. Used by particle invigoration. Defaults to `false`
    /// (no local-move transform available), which simply makes
    /// invigoration fall back to start-state resampling.
    fn local_move(
        &self,
        _state: &mut Self::State,
        _history: &History,
        _last_observation: usize,
        _rng: &mut Rng,
    ) -> bool {
        false
    }

    /// Preferred Generator Search (PGS) potential function `Φ(state)`.
    /// Defaults to `0.0`, which makes the PGS rollout signal degenerate
    /// to "no reward" unless overridden.
    fn potential(&self, _state: &Self::State) -> f64 {
        0.0
    }

    /// PGS-pruned legal action set, used instead of `generate_legal`
    /// when `use_pgs` is set. Defaults to `generate_legal`'s result.
    fn pgs_legal(&self, state: &Self::State, history: &History) -> Vec<usize> {
        self.generate_legal(state, history)
    }

    /// Human-readable dump of a state, for CLI/demo output. Optional for
    /// correctness; defaults to a placeholder.
    fn display_state(&self, _state: &Self::State) -> String {
        "<state>".to_string()
    }

    /// Human-readable dump of an action.
    fn display_action(&self, action: usize) -> String {
        format!("a{action}")
    }

    /// Human-readable dump of an observation.
    fn display_observation(&self, observation: usize) -> String {
        format!("o{observation}")
    }
}
