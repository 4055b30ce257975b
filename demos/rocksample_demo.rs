//! Runs a rock-sample corridor episode to completion, printing each
//! decision along the way. Shows tree reuse and particle invigoration
//! working together across a multi-step episode, unlike the single-shot
//! bandit demo.

use pomcp::domains::rocksample::RockSample;
use pomcp::simulator::Simulator;
use pomcp::{Pomcp, PomcpConfig, Rng};

fn main() {
    env_logger::init();

    let domain = RockSample::new(5);
    let config = PomcpConfig::default()
        .with_num_simulations(512)
        .with_use_rave(true);
    let mut engine = Pomcp::new(domain.clone(), config.clone(), Rng::from_env_or_entropy()).expect("rocksample has actions");

    let mut env_rng = Rng::from_env_or_entropy();
    let mut state = domain.create_start_state(&mut env_rng);

    let mut step_index = 0;
    while !domain.is_terminal(&state) && step_index < config.max_depth {
        let action = engine.select_action();
        let step = domain.step(&mut state, action, &mut env_rng);

        println!(
            "step {step_index}: {} -> observed {}, reward {:.2}",
            domain.display_action(action),
            domain.display_observation(step.observation),
            step.reward
        );

        engine.update(action, step.observation, step.reward);
        step_index += 1;

        if step.terminal {
            break;
        }
    }

    println!("{}", engine.statistics().summary());
}
