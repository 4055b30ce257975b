//! Convergence: on a deterministic single-step bandit with a known
//! optimal arm, the empirical probability of selecting it rises toward 1
//! as the simulation budget grows.

use pomcp::domains::bandit::Bandit;
use pomcp::{Pomcp, PomcpConfig, Rng};

fn fraction_optimal(num_simulations: usize, trials: u64) -> f64 {
    let domain = Bandit::new(vec![0.0, 1.0, 0.3]);
    let config = PomcpConfig::default().with_num_simulations(num_simulations);
    let mut hits = 0u64;
    for seed in 0..trials {
        let mut engine = Pomcp::new(domain.clone(), config.clone(), Rng::from_seed(seed)).unwrap();
        if engine.select_action() == 1 {
            hits += 1;
        }
    }
    hits as f64 / trials as f64
}

#[test]
fn selecting_the_optimal_arm_becomes_more_likely_with_more_simulations() {
    let low_budget = fraction_optimal(4, 80);
    let high_budget = fraction_optimal(256, 80);
    assert!(
        high_budget >= low_budget,
        "expected convergence to improve with budget: low={low_budget}, high={high_budget}"
    );
    assert!(high_budget > 0.9, "expected near-certain optimal-arm selection at a large budget, got {high_budget}");
}
