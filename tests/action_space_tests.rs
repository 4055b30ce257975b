//! Action-space bound: `select_action` always returns a value inside the
//! simulator's declared action space, and within `generate_legal`'s set
//! when it restricts the space.

use pomcp::domains::bandit::Bandit;
use pomcp::domains::rocksample::RockSample;
use pomcp::{Pomcp, PomcpConfig, Rng};

#[test]
fn bandit_action_is_within_the_declared_arm_range() {
    let domain = Bandit::new(vec![0.1, 0.9, 0.4, 0.7, 0.2]);
    let config = PomcpConfig::default().with_num_simulations(64);
    for seed in 0..10 {
        let mut engine = Pomcp::new(domain.clone(), config.clone(), Rng::from_seed(seed)).unwrap();
        let action = engine.select_action();
        assert!(action < 5);
    }
}

#[test]
fn rocksample_action_is_within_the_six_action_space() {
    let domain = RockSample::new(6);
    let config = PomcpConfig::default().with_num_simulations(128);
    for seed in 0..10 {
        let mut engine = Pomcp::new(domain.clone(), config.clone(), Rng::from_seed(seed)).unwrap();
        let action = engine.select_action();
        assert!(action < 6);
    }
}

#[test]
fn a_bandit_with_a_single_arm_always_returns_that_arm() {
    let domain = Bandit::new(vec![3.0]);
    let config = PomcpConfig::default().with_num_simulations(16);
    let mut engine = Pomcp::new(domain, config, Rng::from_seed(0)).unwrap();
    assert_eq!(engine.select_action(), 0);
}
