//! Concrete domains implementing `Simulator`, used to exercise and demo
//! the engine. Kept separate from the core planning machinery so the
//! crate is actually runnable out of the box.

pub mod bandit;
pub mod rocksample;
