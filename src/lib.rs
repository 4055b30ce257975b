//! # pomcp
//!
//! A Partially Observable Monte Carlo Planning (POMCP) engine: online,
//! particle-filter-based planning for partially observable domains.
//! Generic over a domain trait, with recursive simulation instead of a
//! four-pass loop, and a plain builder-style configuration struct.
//!
//! ## Basic usage
//!
//! ```
//! use pomcp::{Pomcp, PomcpConfig, Rng};
//! use pomcp::simulator::{Simulator, StepResult};
//!
//! #[derive(Clone)]
//! struct CoinState { spent: bool }
//!
//! struct TwoArmedBandit;
//!
//! impl Simulator for TwoArmedBandit {
//!     type State = CoinState;
//!
//!     fn create_start_state(&self, _rng: &mut Rng) -> Self::State {
//!         CoinState { spent: false }
//!     }
//!
//!     fn step(&self, state: &mut Self::State, action: usize, _rng: &mut Rng) -> StepResult {
//!         state.spent = true;
//!         StepResult { observation: 0, reward: if action == 1 { 1.0 } else { 0.0 }, terminal: true }
//!     }
//!
//!     fn num_actions(&self) -> usize { 2 }
//!     fn num_observations(&self) -> usize { 1 }
//!     fn discount(&self) -> f64 { 1.0 }
//!     fn reward_range(&self) -> f64 { 1.0 }
//!     fn is_terminal(&self, state: &Self::State) -> bool { state.spent }
//! }
//!
//! let config = PomcpConfig::default().with_num_simulations(64);
//! let mut engine = Pomcp::new(TwoArmedBandit, config, Rng::from_seed(7)).unwrap();
//! let best = engine.select_action();
//! assert_eq!(best, 1);
//! ```
//!
//! ## How it works
//!
//! Each decision runs `num_simulations` independent simulations from
//! particles drawn from the root belief. Each simulation descends the
//! tree by UCB1 (optionally RAVE-blended), transitions the sampled state
//! through the simulator, expands a leaf into tree form once it has
//! accumulated enough visits, performs a rollout from there, and backs
//! the discounted return up through every ancestor it passed through.
//! After the real action is taken and an observation is received,
//! `update` prunes the tree to the matching child, re-roots, and
//! refreshes the belief — resampling via particle invigoration when it
//! runs dry.

pub mod belief;
pub mod config;
pub mod domains;
pub mod engine;
pub mod error;
pub mod history;
pub mod pool;
pub mod rng;
pub mod simulator;
pub mod statistic;
pub mod stats;
pub mod tree;

pub use config::PomcpConfig;
pub use engine::Pomcp;
pub use error::{PomcpError, Result};
pub use rng::Rng;
pub use stats::SearchStatistics;
