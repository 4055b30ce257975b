//! Tree data structures for POMCP.
//!
//! Two mutually recursive node flavors: a `VNode` (observation/belief
//! node, one per history) holding one `QNode` per action, and a `QNode`
//! (action node) holding a sparse collection of child `VNode`s indexed by
//! observation.

use crate::belief::Belief;
use crate::pool::Pool;
use crate::simulator::Simulator;
use crate::statistic::Statistic;

/// Per-action node under a `VNode`.
pub struct QNode<Sim: Simulator> {
    /// Monte Carlo return estimate for taking this action.
    pub value: Statistic,

    /// All-moves-as-first (RAVE) return estimate; only meaningfully
    /// populated when `use_rave` is enabled.
    pub amaf: Statistic,

    /// Sparse, observation-indexed children. Grown lazily; absent slots
    /// are `None` until first visited.
    pub children: Vec<Option<Box<VNode<Sim>>>>,
}

impl<Sim: Simulator> QNode<Sim> {
    /// Creates a fresh, unvisited action node.
    pub fn new() -> Self {
        QNode {
            value: Statistic::new(),
            amaf: Statistic::new(),
            children: Vec::new(),
        }
    }

    /// Looks up the child `VNode` for `observation`, if it has been
    /// created.
    pub fn child(&self, observation: usize) -> Option<&VNode<Sim>> {
        self.children.get(observation).and_then(|c| c.as_deref())
    }

    /// Mutable lookup of the child `VNode` for `observation`.
    pub fn child_mut(&mut self, observation: usize) -> Option<&mut VNode<Sim>> {
        self.children.get_mut(observation).and_then(|c| c.as_deref_mut())
    }

    /// Installs `node` as the child for `observation`, growing the
    /// sparse child vector as needed.
    pub fn set_child(&mut self, observation: usize, node: Box<VNode<Sim>>) {
        if self.children.len() <= observation {
            self.children.resize_with(observation + 1, || None);
        }
        self.children[observation] = Some(node);
    }

    /// Detaches and returns the child for `observation`, leaving its
    /// slot empty.
    pub fn take_child(&mut self, observation: usize) -> Option<Box<VNode<Sim>>> {
        self.children.get_mut(observation).and_then(|c| c.take())
    }
}

impl<Sim: Simulator> Default for QNode<Sim> {
    fn default() -> Self {
        Self::new()
    }
}

/// Observation/belief node. Holds the backed-up value statistic for the
/// history it represents, the particle belief at that history, and one
/// `QNode` per legal action once expanded.
pub struct VNode<Sim: Simulator> {
    /// Backed-up value statistic for this node.
    pub stat: Statistic,

    /// Particle belief at this history.
    pub belief: Belief<Sim::State>,

    /// One entry per action in the domain's action space, once expanded.
    /// Empty until `expand_actions` is called.
    pub qnodes: Vec<QNode<Sim>>,

    /// Depth of this node in the tree (root is 0).
    pub depth: usize,

    /// Whether `expand_actions` has been called on this node yet.
    pub expanded: bool,

    /// Number of times this node has been visited *while still a leaf*
    /// (i.e. before `expanded` flips true). Distinct from `stat.count()`,
    /// which only accumulates once the node is expanded: a leaf's own
    /// statistic must stay untouched so that an expanded node's visit
    /// count always equals the sum of its actions' visit counts.
    pub leaf_visits: u64,
}

impl<Sim: Simulator> VNode<Sim> {
    /// Creates a fresh, unexpanded node at `depth`.
    pub fn new(depth: usize) -> Self {
        VNode {
            stat: Statistic::new(),
            belief: Belief::new(),
            qnodes: Vec::new(),
            depth,
            expanded: false,
            leaf_visits: 0,
        }
    }

    /// Resets a recycled node back to a fresh, unexpanded state at
    /// `depth`, ready to be reused from the pool.
    pub fn reset(&mut self, depth: usize) {
        self.stat.clear();
        self.belief.clear();
        self.qnodes.clear();
        self.depth = depth;
        self.expanded = false;
        self.leaf_visits = 0;
    }

    /// Allocates `num_actions` action nodes (each seeded with the given
    /// prior) and marks this node expanded. A no-op if already expanded.
    pub fn expand_actions(&mut self, num_actions: usize, prior_count: u64, prior_value: f64) {
        if self.expanded {
            return;
        }
        self.qnodes = (0..num_actions)
            .map(|_| {
                let mut q = QNode::new();
                if prior_count > 0 {
                    q.value.set_prior(prior_count, prior_value);
                }
                q
            })
            .collect();
        self.expanded = true;
    }

    /// Acquires a node from `pool`, resetting it to `depth`, or
    /// allocates a fresh one if the pool is empty.
    pub fn acquire(pool: &mut Pool<Box<VNode<Sim>>>, depth: usize) -> Box<VNode<Sim>> {
        match pool.acquire() {
            Some(mut node) => {
                node.reset(depth);
                node
            }
            None => Box::new(VNode::new(depth)),
        }
    }
}

/// Recursively releases `node` and its entire subtree: every descendant
/// `VNode`'s particles are dropped (via `Belief::clear`, itself just a
/// `Vec::clear`) and the nodes themselves are returned to `pool` up to
/// its capacity. There is no explicit particle free call because dropping
/// the `Vec<State>` already does it.
pub fn release_subtree<Sim: Simulator>(mut node: Box<VNode<Sim>>, pool: &mut Pool<Box<VNode<Sim>>>) {
    for q in node.qnodes.drain(..) {
        for child in q.children.into_iter().flatten() {
            release_subtree(child, pool);
        }
    }
    node.belief.clear();
    pool.release(node);
}

/// UCB1 child selection, generalized with an optional RAVE blend.
///
/// `legal` must be non-empty; callers are responsible for falling back
/// to the full action range before calling this. Unvisited actions among
/// `legal` are preferred,
/// scanned in ascending action-index order. Ties in UCB value are broken
/// by lowest action index.
pub fn select_action_ucb<Sim: Simulator>(
    node: &VNode<Sim>,
    legal: &[usize],
    exploration_constant: f64,
    use_rave: bool,
    rave_constant: f64,
) -> usize {
    debug_assert!(node.expanded, "select_action_ucb requires an expanded node");
    debug_assert!(!legal.is_empty(), "select_action_ucb requires a non-empty legal set");

    let mut unvisited: Option<usize> = None;
    for &a in legal {
        if node.qnodes[a].value.count() == 0 && unvisited.map_or(true, |u| a < u) {
            unvisited = Some(a);
        }
    }
    if let Some(a) = unvisited {
        return a;
    }

    let parent_count = node.stat.count().max(1) as f64;
    let mut best_action = legal[0];
    let mut best_value = f64::NEG_INFINITY;

    for &a in legal {
        let q = &node.qnodes[a];
        let count = q.value.count();
        let mean = if use_rave && q.amaf.count() > 0 {
            let beta = rave_constant / (rave_constant + count as f64);
            (1.0 - beta) * q.value.mean() + beta * q.amaf.mean()
        } else {
            q.value.mean()
        };

        let value = if exploration_constant == 0.0 {
            mean
        } else {
            let exploration = exploration_constant * (parent_count.ln() / count as f64).sqrt();
            mean + exploration
        };

        if value > best_value || (value == best_value && a < best_action) {
            best_value = value;
            best_action = a;
        }
    }

    best_action
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Rng;

    #[derive(Clone)]
    struct Dummy;

    struct DummySim;

    impl Simulator for DummySim {
        type State = Dummy;

        fn create_start_state(&self, _rng: &mut Rng) -> Self::State {
            Dummy
        }

        fn step(&self, _state: &mut Self::State, _action: usize, _rng: &mut Rng) -> crate::simulator::StepResult {
            crate::simulator::StepResult {
                observation: 0,
                reward: 0.0,
                terminal: false,
            }
        }

        fn num_actions(&self) -> usize {
            3
        }

        fn num_observations(&self) -> usize {
            2
        }

        fn discount(&self) -> f64 {
            1.0
        }

        fn reward_range(&self) -> f64 {
            1.0
        }
    }

    fn expanded_node() -> VNode<DummySim> {
        let mut n = VNode::new(0);
        n.expand_actions(3, 0, 0.0);
        n
    }

    #[test]
    fn prefers_unvisited_action_in_ascending_order() {
        let mut n = expanded_node();
        n.qnodes[1].value.add(10.0);
        n.stat.add(10.0);
        let a = select_action_ucb(&n, &[0, 1, 2], 1.0, false, 300.0);
        assert_eq!(a, 0, "action 0 has never been visited and should win outright");
    }

    #[test]
    fn greedy_when_exploration_constant_is_zero() {
        let mut n = expanded_node();
        n.qnodes[0].value.add(1.0);
        n.qnodes[1].value.add(5.0);
        n.qnodes[2].value.add(2.0);
        n.stat.add(1.0);
        n.stat.add(5.0);
        n.stat.add(2.0);
        let a = select_action_ucb(&n, &[0, 1, 2], 0.0, false, 300.0);
        assert_eq!(a, 1);
    }

    #[test]
    fn ties_break_on_lowest_action_index() {
        let mut n = expanded_node();
        for a in 0..3 {
            n.qnodes[a].value.add(5.0);
            n.stat.add(5.0);
        }
        let a = select_action_ucb(&n, &[0, 1, 2], 0.0, false, 300.0);
        assert_eq!(a, 0);
    }

    #[test]
    fn restricts_to_the_given_legal_subset() {
        let mut n = expanded_node();
        n.qnodes[0].value.add(100.0); // best overall, but illegal here
        n.qnodes[1].value.add(1.0);
        n.qnodes[2].value.add(2.0);
        n.stat.add(100.0);
        n.stat.add(1.0);
        n.stat.add(2.0);
        let a = select_action_ucb(&n, &[1, 2], 0.0, false, 300.0);
        assert_eq!(a, 2);
    }

    #[test]
    fn rave_blend_can_change_the_selected_action() {
        let mut n = expanded_node();
        n.qnodes[0].value.add(1.0);
        n.qnodes[0].value.add(1.0);
        n.qnodes[1].value.add(0.5);
        n.qnodes[1].value.add(0.5);
        n.qnodes[1].amaf.add(10.0);
        n.qnodes[1].amaf.add(10.0);
        n.qnodes[2].value.add(0.0);
        n.qnodes[2].value.add(0.0);
        n.stat.add(1.0);
        n.stat.add(1.0);
        n.stat.add(0.5);
        n.stat.add(0.5);
        n.stat.add(0.0);
        n.stat.add(0.0);

        let without_rave = select_action_ucb(&n, &[0, 1, 2], 0.0, false, 300.0);
        let with_rave = select_action_ucb(&n, &[0, 1, 2], 0.0, true, 1.0);
        assert_eq!(without_rave, 0);
        assert_eq!(with_rave, 1);
    }

    #[test]
    fn release_subtree_drops_nested_beliefs_back_to_the_pool() {
        let mut root: VNode<DummySim> = VNode::new(0);
        root.expand_actions(1, 0, 0.0);
        root.belief.add_sample(Dummy);
        let mut child = Box::new(VNode::new(1));
        child.belief.add_sample(Dummy);
        child.belief.add_sample(Dummy);
        root.qnodes[0].set_child(0, child);

        let mut pool: Pool<Box<VNode<DummySim>>> = Pool::new(8);
        release_subtree(Box::new(root), &mut pool);
        assert_eq!(pool.available(), 2);
    }

    #[test]
    fn acquired_node_from_pool_is_reset() {
        let mut pool: Pool<Box<VNode<DummySim>>> = Pool::new(4);
        let mut stale = Box::new(VNode::new(9));
        stale.expand_actions(3, 0, 0.0);
        stale.stat.add(42.0);
        pool.release(stale);

        let fresh = VNode::<DummySim>::acquire(&mut pool, 0);
        assert_eq!(fresh.depth, 0);
        assert!(!fresh.expanded);
        assert_eq!(fresh.stat.count(), 0);
    }
}
