//! Runs the two-armed bandit to completion and prints the chosen arm and
//! the payoff it received: a minimal, directly-runnable illustration of
//! the engine against one of the crate's built-in domains.

use pomcp::domains::bandit::Bandit;
use pomcp::simulator::Simulator;
use pomcp::{Pomcp, PomcpConfig, Rng};

fn main() {
    env_logger::init();

    let domain = Bandit::two_armed();
    let config = PomcpConfig::default().with_num_simulations(256);
    let mut engine = Pomcp::new(domain.clone(), config, Rng::from_env_or_entropy()).expect("bandit has actions");

    let mut env_rng = Rng::from_env_or_entropy();
    let mut state = domain.create_start_state(&mut env_rng);

    let action = engine.select_action();
    println!("chose {}", domain.display_action(action));

    let step = domain.step(&mut state, action, &mut env_rng);
    println!("observed {}, reward {:.2}", domain.display_observation(step.observation), step.reward);

    engine.update(action, step.observation, step.reward);
    println!("{}", engine.statistics().summary());
}
