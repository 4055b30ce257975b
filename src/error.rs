//! Error types for the POMCP planner.
//!
//! The engine itself never surfaces transient, recoverable conditions
//! (belief exhaustion, a refused local move) as errors — those are logged
//! and retried internally. Only configuration-level problems reach the
//! caller.

/// Error types for the POMCP engine.
#[derive(thiserror::Error, Debug)]
pub enum PomcpError {
    /// A simulator declared zero legal actions in its full action space.
    /// This is a simulator misconfiguration, not a runtime condition the
    /// engine can recover from.
    #[error("simulator declares no actions (num_actions == 0)")]
    NoLegalActions,

    /// Invalid configuration supplied to the engine or CLI.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An unknown domain name was requested (CLI-level).
    #[error("unrecognized problem: {0}")]
    UnknownProblem(String),
}

/// Result type for POMCP operations.
pub type Result<T> = std::result::Result<T, PomcpError>;
