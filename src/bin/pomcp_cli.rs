//! The experiment driver: parses CLI arguments, repeatedly runs a
//! built-in domain against a `Pomcp` engine across a sweep of simulation
//! budgets, and streams a CSV-like result line per decision plus a
//! closing summary.

use std::fs::File;
use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use pomcp::config::PomcpConfig;
use pomcp::domains::bandit::Bandit;
use pomcp::domains::rocksample::RockSample;
use pomcp::engine::Pomcp;
use pomcp::error::PomcpError;
use pomcp::rng::Rng;
use pomcp::simulator::Simulator;

#[derive(Parser, Debug)]
#[command(name = "pomcp-cli", about = "Runs POMCP experiments against a built-in problem")]
struct Cli {
    /// Built-in domain to run: `bandit` or `rocksample`.
    #[arg(long)]
    problem: String,

    /// Optional domain-size parameter (corridor length for `rocksample`).
    #[arg(long)]
    size: Option<usize>,

    /// Optional domain-defined count parameter.
    #[arg(long)]
    number: Option<usize>,

    /// Number of independent experiments per simulation budget.
    #[arg(long, default_value_t = 1)]
    runs: usize,

    /// Per-decision simulation budget, expressed as log2(n). Used as the
    /// sole, non-sweeping budget when `--mindoubles`/`--maxdoubles` are
    /// omitted.
    #[arg(long, default_value_t = 10)]
    simulations: u32,

    /// Smallest simulation-budget exponent in the sweep. Defaults to
    /// `--simulations` when omitted.
    #[arg(long)]
    mindoubles: Option<u32>,

    /// Largest simulation-budget exponent in the sweep. Defaults to
    /// `--simulations` when omitted.
    #[arg(long)]
    maxdoubles: Option<u32>,

    /// Wall-clock safety stop per decision, in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Output file for the result stream; stdout if omitted.
    #[arg(long)]
    outputfile: Option<String>,

    /// Enables particle invigoration via `local_move`.
    #[arg(long, default_value_t = true)]
    usetransforms: bool,

    /// Enables RAVE (all-moves-as-first) statistics.
    #[arg(long, default_value_t = false)]
    userave: bool,

    /// Swaps the rollout/legal generators for the PGS variant.
    #[arg(long, default_value_t = false)]
    usepgs: bool,

    /// Keeps the matching subtree across `update` instead of rebuilding.
    #[arg(long, default_value_t = true)]
    reusetree: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(1);
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> pomcp::Result<()> {
    let mut out: Box<dyn Write> = match &cli.outputfile {
        Some(path) => {
            let file = File::create(path).map_err(|e| PomcpError::InvalidConfiguration(e.to_string()))?;
            Box::new(file)
        }
        None => Box::new(io::stdout()),
    };

    match cli.problem.as_str() {
        "bandit" => {
            let domain = match cli.number {
                Some(n) if n > 0 => Bandit::new((0..n).map(|i| i as f64).collect()),
                _ => Bandit::two_armed(),
            };
            run_experiment(domain, &cli, out.as_mut())
        }
        "rocksample" => {
            let size = cli.size.unwrap_or(5);
            let domain = RockSample::new(size);
            run_experiment(domain, &cli, out.as_mut())
        }
        other => Err(PomcpError::UnknownProblem(other.to_string())),
    }
}

fn run_experiment<Sim>(domain: Sim, cli: &Cli, out: &mut dyn Write) -> pomcp::Result<()>
where
    Sim: Simulator + Clone,
{
    let timeout = cli.timeout.map(Duration::from_secs);
    let mut returns = Vec::new();
    let mut total_simulations: u64 = 0;
    let mut global_run_id = 0usize;

    let mindoubles = cli.mindoubles.unwrap_or(cli.simulations);
    let maxdoubles = cli.maxdoubles.unwrap_or(cli.simulations);

    for doublings in mindoubles..=maxdoubles {
        let num_simulations = 1usize << doublings;
        let config = PomcpConfig::default()
            .with_num_simulations(num_simulations)
            .with_use_rave(cli.userave)
            .with_use_pgs(cli.usepgs)
            .with_use_transforms(cli.usetransforms)
            .with_reuse_tree(cli.reusetree);

        for _ in 0..cli.runs {
            let mut env_rng = Rng::from_env_or_entropy();
            let mut engine = Pomcp::new(domain.clone(), config.clone(), Rng::from_env_or_entropy())?;
            let mut true_state = domain.create_start_state(&mut env_rng);

            let mut discounted_return = 0.0;
            let mut discount_factor = 1.0;
            let mut decision_index = 0usize;

            while !domain.is_terminal(&true_state) && decision_index < config.max_depth {
                let action = engine.select_action_within(timeout);
                let step = domain.step(&mut true_state, action, &mut env_rng);

                discounted_return += discount_factor * step.reward;
                discount_factor *= domain.discount();

                writeln!(
                    out,
                    "{global_run_id},{decision_index},{action},{},{},{discounted_return:.6}",
                    step.observation, step.reward
                )
                .map_err(|e| PomcpError::InvalidConfiguration(e.to_string()))?;

                engine.update(action, step.observation, step.reward);
                total_simulations += num_simulations as u64;
                decision_index += 1;

                if step.terminal {
                    break;
                }
            }

            returns.push(discounted_return);
            global_run_id += 1;
        }
    }

    let n = returns.len().max(1) as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stderr = (variance / n).sqrt();

    writeln!(out, "summary,mean={mean:.6},stderr={stderr:.6},simulations={total_simulations}")
        .map_err(|e| PomcpError::InvalidConfiguration(e.to_string()))?;

    Ok(())
}
