//! The POMCP engine: configuration, root management, `select_action`,
//! `update`, simulation/rollout, UCB selection, and particle
//! invigoration.
//!
//! Generic over a domain trait, owns a root, and runs `num_simulations`
//! simulations per decision. Selection, expansion, rollout, and backup
//! all happen within a single recursive descent (`simulate_v`) rather
//! than as separate passes over a path.

use std::collections::HashSet;
use std::time::Instant;

use crate::belief::Belief;
use crate::config::PomcpConfig;
use crate::error::{PomcpError, Result};
use crate::history::History;
use crate::pool::Pool;
use crate::rng::Rng;
use crate::simulator::Simulator;
use crate::stats::SearchStatistics;
use crate::tree::{release_subtree, select_action_ucb, VNode};

fn fill_belief<Sim: Simulator>(simulator: &Sim, belief: &mut Belief<Sim::State>, target: usize, rng: &mut Rng) {
    while belief.len() < target {
        belief.add_sample(simulator.create_start_state(rng));
    }
}

/// A POMCP planner generic over a domain `Simulator`.
pub struct Pomcp<Sim: Simulator> {
    simulator: Sim,
    config: PomcpConfig,
    root: Box<VNode<Sim>>,
    history: History,
    rng: Rng,
    pool: Pool<Box<VNode<Sim>>>,
    statistics: SearchStatistics,
}

impl<Sim: Simulator> Pomcp<Sim> {
    /// Builds a fresh engine with an empty history and a root belief
    /// populated from `simulator.create_start_state`.
    pub fn new(simulator: Sim, config: PomcpConfig, rng: Rng) -> Result<Self> {
        if simulator.num_actions() == 0 {
            return Err(PomcpError::NoLegalActions);
        }

        let pool_capacity = config.node_pool_capacity;
        let belief_size = config.belief_size;

        let mut engine = Pomcp {
            simulator,
            config,
            root: Box::new(VNode::new(0)),
            history: History::new(),
            rng,
            pool: Pool::new(pool_capacity),
            statistics: SearchStatistics::new(),
        };

        fill_belief(&engine.simulator, &mut engine.root.belief, belief_size, &mut engine.rng);
        Ok(engine)
    }

    /// The history accumulated since the current root.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The engine's configuration.
    pub fn config(&self) -> &PomcpConfig {
        &self.config
    }

    /// The domain this engine is planning in.
    pub fn simulator(&self) -> &Sim {
        &self.simulator
    }

    /// Read-only access to the root node, for introspection (tests,
    /// diagnostics, visualization).
    pub fn root(&self) -> &VNode<Sim> {
        &self.root
    }

    /// Runs `num_simulations` simulations from the current root and
    /// returns the action with the largest mean return among visited
    /// children, ties broken by visit count then by action index. Falls
    /// back to a uniform-random legal action if no simulation produced a
    /// visited child.
    pub fn select_action(&mut self) -> usize {
        self.select_action_within(None)
    }

    /// As `select_action`, but stops issuing further simulations once
    /// `deadline` has elapsed (checked between simulations, not within
    /// one). `None` runs the full `num_simulations` budget. This is the
    /// hook a caller wanting wall-clock budgeting uses.
    pub fn select_action_within(&mut self, deadline: Option<std::time::Duration>) -> usize {
        let start = Instant::now();
        let mut ran = 0;
        for _ in 0..self.config.num_simulations {
            if let Some(budget) = deadline {
                if start.elapsed() >= budget {
                    self.statistics.stopped_early = true;
                    break;
                }
            }
            self.run_single_simulation();
            ran += 1;
        }
        self.statistics.iterations += ran;
        self.statistics.total_time += start.elapsed();
        self.best_root_action()
    }

    /// Runs exactly one simulation from the root: selection, expansion,
    /// rollout, and backup, performed in one recursive descent. Exposed
    /// directly so a caller wanting wall-clock budgeting can interleave
    /// it with its own clock.
    pub fn run_single_simulation(&mut self) {
        let mut state = match self.root.belief.create_sample(&mut self.rng) {
            Some(s) => s,
            None => self.simulator.create_start_state(&mut self.rng),
        };
        let mut history = self.history.clone();
        let (_, trace) = Self::simulate_v(
            &self.simulator,
            &self.config,
            &mut self.rng,
            &mut self.pool,
            &mut self.root,
            &mut state,
            0,
            &mut history,
        );
        self.statistics.max_depth = self.statistics.max_depth.max(trace.len());
    }

    /// Advances the engine by one real step: appends to history, seeds the
    /// new root's belief by filtering the old root's particles through the
    /// real `action`/`observation` (the standard particle-filter update),
    /// re-roots the tree at the matching child (or rebuilds it if
    /// `reuse_tree` is off or the observation was never visited), and tops
    /// the belief back up via invigoration. Never fails.
    pub fn update(&mut self, action: usize, observation: usize, _reward: f64) -> &History {
        self.history.append(action, observation);

        let filtered = self.filter_belief(action, observation);

        let reused_child = if self.config.reuse_tree && self.root.expanded {
            self.root.qnodes[action].take_child(observation)
        } else {
            None
        };

        let old_root = std::mem::replace(&mut self.root, Box::new(VNode::new(0)));
        release_subtree(old_root, &mut self.pool);

        self.root = match reused_child {
            Some(mut child) => {
                child.depth = 0;
                child
            }
            None => VNode::acquire(&mut self.pool, 0),
        };

        self.root.belief.clear();
        for particle in filtered {
            self.root.belief.add_sample(particle);
        }

        self.invigorate();

        &self.history
    }

    /// Steps every particle in the current root's belief through `action`
    /// and keeps the ones whose resulting observation matches `observation`
    /// — rejection sampling against the real transition, so the new root's
    /// belief reflects the evidence actually received instead of starting
    /// from the unconditioned prior. `invigorate` tops the survivors back
    /// up to `belief_size` afterward.
    fn filter_belief(&mut self, action: usize, observation: usize) -> Vec<Sim::State> {
        let particles: Vec<Sim::State> = self.root.belief.iter().cloned().collect();
        let mut matches = Vec::with_capacity(particles.len());
        for mut candidate in particles {
            let step = self.simulator.step(&mut candidate, action, &mut self.rng);
            if step.observation == observation {
                matches.push(candidate);
            }
        }
        matches
    }

    /// Current search statistics, with `tree_size` and node-pool metrics
    /// refreshed at call time.
    pub fn statistics(&self) -> SearchStatistics {
        let mut stats = self.statistics.clone();
        stats.tree_size = Self::count_nodes(&self.root);
        stats.update_node_pool_stats(
            self.pool.capacity(),
            self.pool.available(),
            self.pool.total_allocated() as usize,
            self.pool.total_returned() as usize,
        );
        stats
    }

    /// A textual dump of the tree rooted at the current root, for
    /// debugging and demo output.
    pub fn visualize_tree(&self) -> String {
        let mut out = String::new();
        Self::visualize_node(&self.simulator, &self.root, None, 0, &mut out);
        out
    }

    fn visualize_node(simulator: &Sim, node: &VNode<Sim>, action: Option<usize>, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        let label = match action {
            Some(a) => simulator.display_action(a),
            None => "root".to_string(),
        };
        out.push_str(&format!(
            "{indent}{label} (visits: {}, value: {:.3})\n",
            node.stat.count(),
            node.stat.mean()
        ));
        for (a, q) in node.qnodes.iter().enumerate() {
            for child in q.children.iter().flatten() {
                Self::visualize_node(simulator, child, Some(a), depth + 1, out);
            }
        }
    }

    fn count_nodes(node: &VNode<Sim>) -> usize {
        1 + node
            .qnodes
            .iter()
            .flat_map(|q| q.children.iter())
            .flatten()
            .map(|child| Self::count_nodes(child))
            .sum::<usize>()
    }

    fn best_root_action(&mut self) -> usize {
        let mut best: Option<usize> = None;

        for a in 0..self.root.qnodes.len() {
            if self.root.qnodes[a].value.count() == 0 {
                continue;
            }
            best = Some(match best {
                None => a,
                Some(b) => {
                    let mean_a = self.root.qnodes[a].value.mean();
                    let mean_b = self.root.qnodes[b].value.mean();
                    if mean_a > mean_b {
                        a
                    } else if mean_a == mean_b && self.root.qnodes[a].value.count() > self.root.qnodes[b].value.count() {
                        a
                    } else {
                        b
                    }
                }
            });
        }

        match best {
            Some(a) => a,
            None => {
                let legal = self.fallback_legal_actions();
                *self.rng.choose(&legal).unwrap_or(&0)
            }
        }
    }

    fn fallback_legal_actions(&mut self) -> Vec<usize> {
        match self.root.belief.create_sample(&mut self.rng) {
            Some(state) => {
                let legal = self.simulator.generate_legal(&state, &self.history);
                if legal.is_empty() {
                    (0..self.simulator.num_actions()).collect()
                } else {
                    legal
                }
            }
            None => (0..self.simulator.num_actions()).collect(),
        }
    }

    /// Tops the root belief back up to `belief_size` after `update`'s
    /// particle filter has already populated it with transitions
    /// consistent with the real action/observation. Each addition is a
    /// `local_move`-perturbed clone of a surviving particle; full
    /// resampling from the start-state prior only happens if the filter
    /// left the belief completely empty.
    fn invigorate(&mut self) {
        if !self.config.use_transforms {
            if self.root.belief.is_empty() {
                log::warn!(
                    "belief exhausted at {} with invigoration disabled; resampling from the start-state prior",
                    self.history
                );
                fill_belief(&self.simulator, &mut self.root.belief, self.config.belief_size, &mut self.rng);
            }
            return;
        }

        let target_len = self.config.belief_size;
        let max_additions = self.config.resolved_num_transforms();
        let max_attempts = self.config.resolved_max_attempts();
        let mut attempts = 0;
        let mut additions = 0;

        while self.root.belief.len() < target_len && additions < max_additions && attempts < max_attempts {
            attempts += 1;
            let sample = match self.root.belief.create_sample(&mut self.rng) {
                Some(s) => s,
                None => break,
            };
            let mut candidate = sample;
            let last_observation = self.history.last_observation().unwrap_or(0);
            if self.simulator.local_move(&mut candidate, &self.history, last_observation, &mut self.rng) {
                self.root.belief.add_sample(candidate);
                additions += 1;
            }
        }

        if self.root.belief.is_empty() {
            log::warn!(
                "belief exhausted at {} after {attempts} invigoration attempts; resampling from the start-state prior",
                self.history
            );
            fill_belief(&self.simulator, &mut self.root.belief, target_len, &mut self.rng);
        }
    }

    fn legal_actions_for_tree(simulator: &Sim, config: &PomcpConfig, state: &Sim::State, history: &History) -> Vec<usize> {
        let legal = if config.use_pgs {
            simulator.pgs_legal(state, history)
        } else {
            simulator.generate_legal(state, history)
        };
        if legal.is_empty() {
            (0..simulator.num_actions()).collect()
        } else {
            legal
        }
    }

    fn rollout_legal(simulator: &Sim, config: &PomcpConfig, state: &Sim::State, history: &History) -> Vec<usize> {
        if config.use_pgs {
            let legal = simulator.pgs_legal(state, history);
            return if legal.is_empty() {
                (0..simulator.num_actions()).collect()
            } else {
                legal
            };
        }
        let preferred = simulator.generate_preferred(state, history);
        if !preferred.is_empty() {
            return preferred;
        }
        let legal = simulator.generate_legal(state, history);
        if legal.is_empty() {
            (0..simulator.num_actions()).collect()
        } else {
            legal
        }
    }

    /// Rollout from `state` at `depth`, accumulating up to `max_depth -
    /// depth` discounted steps. Under `use_pgs`, the accumulated
    /// signal is the potential delta `Φ(state') - Φ(state)` rather than
    /// the environment reward. Returns the accumulated value and the
    /// sequence of actions taken, consumed by RAVE back-up at the calling
    /// tree level.
    fn rollout(
        simulator: &Sim,
        config: &PomcpConfig,
        rng: &mut Rng,
        state: &mut Sim::State,
        depth: usize,
        history: &History,
    ) -> (f64, Vec<usize>) {
        let mut total = 0.0;
        let mut discount_factor = 1.0;
        let mut trace = Vec::new();
        let mut d = depth;

        while d <= config.max_depth {
            if simulator.is_terminal(state) {
                break;
            }
            let legal = Self::rollout_legal(simulator, config, state, history);
            let action = match rng.choose(&legal) {
                Some(&a) => a,
                None => break,
            };

            let before = if config.use_pgs { simulator.potential(state) } else { 0.0 };
            let step = simulator.step(state, action, rng);
            let reward = if config.use_pgs {
                simulator.potential(state) - before
            } else {
                step.reward
            };

            total += discount_factor * reward;
            trace.push(action);
            discount_factor *= simulator.discount();
            d += 1;

            if step.terminal {
                break;
            }
        }

        (total, trace)
    }

    /// The recursive core of POMCP: descends one action/observation pair
    /// per call, expanding a leaf into tree form
    /// once it has accumulated `expand_count` leaf visits, otherwise
    /// falling through to a rollout. Returns the discounted return
    /// obtained from this node downward and the trace of actions taken,
    /// used by the RAVE backup at every ancestor.
    #[allow(clippy::too_many_arguments)]
    fn simulate_v(
        simulator: &Sim,
        config: &PomcpConfig,
        rng: &mut Rng,
        pool: &mut Pool<Box<VNode<Sim>>>,
        node: &mut VNode<Sim>,
        state: &mut Sim::State,
        depth: usize,
        history: &mut History,
    ) -> (f64, Vec<usize>) {
        if depth > config.max_depth || simulator.is_terminal(state) {
            return (0.0, Vec::new());
        }

        if !node.expanded && node.leaf_visits < config.expand_count {
            node.leaf_visits += 1;
            return Self::rollout(simulator, config, rng, state, depth, history);
        }

        if !node.expanded {
            node.expand_actions(simulator.num_actions(), config.smart_tree_count, config.smart_tree_value);
        }

        let legal = Self::legal_actions_for_tree(simulator, config, state, history);
        let a = select_action_ucb(node, &legal, config.exploration_constant, config.use_rave, config.rave_constant);

        let step = simulator.step(state, a, rng);
        history.append(a, step.observation);

        if node.qnodes[a].child(step.observation).is_none() {
            let child = VNode::acquire(pool, depth + 1);
            node.qnodes[a].set_child(step.observation, child);
        }
        let child = node.qnodes[a].child_mut(step.observation).expect("child just inserted");

        let (r_child, trace_child) = if step.terminal {
            (0.0, Vec::new())
        } else {
            Self::simulate_v(simulator, config, rng, pool, child, state, depth + 1, history)
        };

        history.truncate(history.len() - 1);

        let r = step.reward + simulator.discount() * r_child;

        node.qnodes[a].value.add(r);
        node.stat.add(r);

        let mut trace = Vec::with_capacity(1 + trace_child.len());
        trace.push(a);
        trace.extend(trace_child);

        if config.use_rave {
            let mut credited = HashSet::with_capacity(trace.len());
            for (i, &b) in trace.iter().enumerate() {
                if credited.insert(b) {
                    node.qnodes[b].amaf.add(r * config.rave_discount.powi(i as i32));
                }
            }
        }

        (r, trace)
    }
}
