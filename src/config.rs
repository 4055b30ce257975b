//! Configuration options for the POMCP engine.
//!
//! A builder-with-`Default` struct: `with_*` setters returning `Self` by
//! value, covering simulation budget, RAVE, particle invigoration, and
//! PGS tuning.

/// Tunable parameters controlling one `Pomcp` engine instance.
///
/// # Example
///
/// ```
/// use pomcp::config::PomcpConfig;
///
/// let config = PomcpConfig::default()
///     .with_num_simulations(2000)
///     .with_exploration_constant(1.5)
///     .with_use_rave(true);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PomcpConfig {
    /// Simulations run per `select_action` call.
    pub num_simulations: usize,

    /// Maximum rollout/search depth.
    pub max_depth: usize,

    /// UCB exploration constant `c`. By convention scaled to the
    /// simulator's reward range.
    pub exploration_constant: f64,

    /// Enables all-moves-as-first (RAVE) statistics during back-up.
    pub use_rave: bool,

    /// RAVE equivalence parameter `k`, controlling how quickly the AMAF
    /// estimate's influence decays as real visits accumulate.
    pub rave_constant: f64,

    /// Per-depth decay applied to AMAF credit along a simulation's
    /// action trace.
    pub rave_discount: f64,

    /// Enables particle invigoration via `Simulator::local_move` when
    /// the belief would otherwise run dry.
    pub use_transforms: bool,

    /// Invigoration attempts per update, targeting this many additions.
    /// `None` means "match `belief_size`".
    pub num_transforms: Option<usize>,

    /// Invigoration accept/reject attempt budget. `None` means
    /// `10 * belief_size`.
    pub max_attempts: Option<usize>,

    /// Minimum leaf visits before a node is expanded into tree form.
    pub expand_count: u64,

    /// Keeps the matching subtree on `update` instead of rebuilding the
    /// root from scratch.
    pub reuse_tree: bool,

    /// Prior pseudo-count seeded into a freshly expanded QNode's value
    /// statistic.
    pub smart_tree_count: u64,

    /// Prior pseudo-value seeded into a freshly expanded QNode's value
    /// statistic.
    pub smart_tree_value: f64,

    /// Swaps the rollout/legal-action generators for the PGS variant.
    pub use_pgs: bool,

    /// Target particle count maintained per VNode.
    pub belief_size: usize,

    /// Bound on recycled VNode slots kept in the node pool.
    pub node_pool_capacity: usize,
}

impl Default for PomcpConfig {
    fn default() -> Self {
        PomcpConfig {
            num_simulations: 1000,
            max_depth: 50,
            exploration_constant: 1.0,
            use_rave: false,
            rave_constant: 300.0,
            rave_discount: 1.0,
            use_transforms: true,
            num_transforms: None,
            max_attempts: None,
            expand_count: 1,
            reuse_tree: true,
            smart_tree_count: 0,
            smart_tree_value: 0.0,
            use_pgs: false,
            belief_size: 1000,
            node_pool_capacity: 4096,
        }
    }
}

impl PomcpConfig {
    /// Sets the number of simulations run per `select_action` call.
    pub fn with_num_simulations(mut self, n: usize) -> Self {
        self.num_simulations = n;
        self
    }

    /// Sets the maximum rollout/search depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the UCB exploration constant.
    pub fn with_exploration_constant(mut self, constant: f64) -> Self {
        self.exploration_constant = constant;
        self
    }

    /// Enables or disables RAVE.
    pub fn with_use_rave(mut self, use_rave: bool) -> Self {
        self.use_rave = use_rave;
        self
    }

    /// Sets the RAVE equivalence parameter.
    pub fn with_rave_constant(mut self, k: f64) -> Self {
        self.rave_constant = k;
        self
    }

    /// Sets the per-depth AMAF credit decay.
    pub fn with_rave_discount(mut self, discount: f64) -> Self {
        self.rave_discount = discount;
        self
    }

    /// Enables or disables particle invigoration.
    pub fn with_use_transforms(mut self, use_transforms: bool) -> Self {
        self.use_transforms = use_transforms;
        self
    }

    /// Sets the invigoration attempt target, overriding the
    /// `belief_size` default.
    pub fn with_num_transforms(mut self, n: usize) -> Self {
        self.num_transforms = Some(n);
        self
    }

    /// Sets the invigoration accept/reject attempt budget, overriding
    /// the `10 * belief_size` default.
    pub fn with_max_attempts(mut self, n: usize) -> Self {
        self.max_attempts = Some(n);
        self
    }

    /// Sets the minimum leaf visits before expansion.
    pub fn with_expand_count(mut self, count: u64) -> Self {
        self.expand_count = count;
        self
    }

    /// Enables or disables subtree reuse across `update` calls.
    pub fn with_reuse_tree(mut self, reuse_tree: bool) -> Self {
        self.reuse_tree = reuse_tree;
        self
    }

    /// Sets the prior seeded into a freshly expanded QNode.
    pub fn with_smart_tree_prior(mut self, count: u64, value: f64) -> Self {
        self.smart_tree_count = count;
        self.smart_tree_value = value;
        self
    }

    /// Enables or disables the PGS rollout/legal-action scheme.
    pub fn with_use_pgs(mut self, use_pgs: bool) -> Self {
        self.use_pgs = use_pgs;
        self
    }

    /// Sets the target particle count per VNode.
    pub fn with_belief_size(mut self, size: usize) -> Self {
        self.belief_size = size;
        self
    }

    /// Sets the node pool capacity.
    pub fn with_node_pool_capacity(mut self, capacity: usize) -> Self {
        self.node_pool_capacity = capacity;
        self
    }

    /// Resolves `num_transforms`, falling back to `belief_size`.
    pub fn resolved_num_transforms(&self) -> usize {
        self.num_transforms.unwrap_or(self.belief_size)
    }

    /// Resolves `max_attempts`, falling back to `10 * belief_size`.
    pub fn resolved_max_attempts(&self) -> usize {
        self.max_attempts.unwrap_or(10 * self.belief_size)
    }
}
