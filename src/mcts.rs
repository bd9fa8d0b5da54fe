//! Upper Confidence bounds applied to Trees (UCT) search orchestrator.
//!
//! [`UctSearch`] owns a search tree, a private simulator and the four
//! pluggable policies of the `policy` module. Each iteration selects and
//! expands a leaf with the tree policy, plays it out with the simulation
//! policy and propagates the reward with the backup function. Once the
//! iteration budget is spent, the final-choice function picks the action to
//! play from the root.

use rand::{rngs::StdRng, SeedableRng};
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    backup_to_root, most_visited_action, ActionOf, BackupFunction, ExpandPolicy, FinalActionChooser,
    GameAction, GameSimulator, GameState, Node, RewardFunction, SimulationPolicy, Tree, TreePolicy
};

/// Lifecycle of a `UctSearch`: it only accepts a new root while idle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStatus{
    /// No search in progress; the root may be replaced.
    Idle,
    /// A `search` call is in progress.
    Running
}

/// Represents possible errors that can occur while building or running a search.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError{
    #[error("no root node has been set")]
    NoRoot,
    #[error("the root cannot be replaced while a search is running")]
    RootChangeDuringSearch,
    #[error("state has no snapshot to restore the simulator from")]
    MissingSnapshot,
    #[error("trajectory does not end in a terminal state")]
    NonTerminalTrajectory,
    #[error("state has no legal action")]
    NoLegalActions,
    #[error("every action of the node already has a child")]
    FullyExpanded,
    #[error("an edge for action {0} already exists")]
    DuplicateAction(usize),
    /// The root has no explored child to choose from yet.
    #[error("no action of the root has been explored")]
    Unexplored
}

/// Configuration parameters of a `UctSearch`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UctConfig{
    /// Weight of the exploration term of UCB1.
    pub exploration_coef: f64,
    /// Seed of the search's random generator; `None` seeds it from the OS.
    pub seed: Option<u64>
}

impl UctConfig{
    /// The default configuration.
    ///
    /// - `exploration_coef`: `1/√2`, the usual UCT constant for rewards in [0, 1].
    /// - `seed`: `None`.
    pub const DEFAULT: UctConfig = UctConfig{
        exploration_coef: std::f64::consts::FRAC_1_SQRT_2,
        seed: None
    };

    /// Returns the configuration with another exploration coefficient.
    pub fn with_exploration_coef(mut self, exploration_coef: f64) -> Self{
        self.exploration_coef = exploration_coef;
        self
    }

    /// Returns the configuration with a fixed seed, making searches reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self{
        self.seed = Some(seed);
        self
    }
}

impl Default for UctConfig{
    fn default() -> Self{
        Self::DEFAULT
    }
}

/// The UCT search algorithm.
///
/// # Type Parameters
/// - `Sim`: The simulator the search replays actions with. It is owned by the
///   search and must never be the simulator of the live game.
#[derive(Debug)]
pub struct UctSearch<Sim: GameSimulator>{
    sim: Sim,
    tree_policy: TreePolicy<Sim::State>,
    simulation_policy: SimulationPolicy<Sim::State>,
    backup: BackupFunction<Sim::State>,
    final_choice: FinalActionChooser<Sim::State>,
    status: SearchStatus,
    tree: Option<Tree<Sim::State>>,
    rng: StdRng
}

impl<Sim: GameSimulator> UctSearch<Sim>{
    /// Creates a search with the default configuration and policies.
    ///
    /// # Parameters
    /// - `sim`: The private simulator of the search.
    /// - `reward`: Scores finished rollouts.
    #[inline]
    pub fn new(sim: Sim, reward: RewardFunction<Sim::State>) -> Self{
        Self::from_config(sim, reward, &UctConfig::DEFAULT)
    }

    /// Creates a search with the default policies tuned by `config`.
    pub fn from_config(sim: Sim, reward: RewardFunction<Sim::State>, config: &UctConfig) -> Self{
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng()
        };

        UctSearch {
            sim,
            tree_policy: TreePolicy::new(ExpandPolicy::new(), config.exploration_coef),
            simulation_policy: SimulationPolicy::new(reward),
            backup: backup_to_root::<Sim::State>,
            final_choice: most_visited_action::<Sim::State>,
            status: SearchStatus::Idle,
            tree: None,
            rng
        }
    }

    /// Replaces the selection and expansion policy.
    pub fn with_tree_policy(mut self, tree_policy: TreePolicy<Sim::State>) -> Self{
        self.tree_policy = tree_policy;
        self
    }

    /// Replaces the rollout policy, reward function included.
    pub fn with_simulation_policy(mut self, simulation_policy: SimulationPolicy<Sim::State>) -> Self{
        self.simulation_policy = simulation_policy;
        self
    }

    /// Replaces the function propagating rollout rewards.
    pub fn with_backup(mut self, backup: BackupFunction<Sim::State>) -> Self{
        self.backup = backup;
        self
    }

    /// Replaces the function picking the action returned by `search` and `action`.
    pub fn with_final_choice(mut self, final_choice: FinalActionChooser<Sim::State>) -> Self{
        self.final_choice = final_choice;
        self
    }

    /// `SearchStatus::Running` only while `search` is iterating.
    #[inline]
    pub fn status(&self) -> SearchStatus{
        self.status
    }

    /// The current tree, `None` until a root is set.
    #[inline]
    pub fn tree(&self) -> Option<&Tree<Sim::State>>{
        self.tree.as_ref()
    }

    /// The private simulator rollouts and expansions are replayed on.
    #[inline]
    pub fn simulator(&self) -> &Sim{
        &self.sim
    }

    /// Replaces the whole tree with a new one rooted at `root`.
    ///
    /// Only the state of `root` is kept; its edges and statistics are
    /// dropped, so a node taken from an earlier tree starts from scratch.
    ///
    /// # Returns
    /// `SearchError::RootChangeDuringSearch` while a search is running.
    pub fn set_root(&mut self, root: Node<Sim::State>) -> Result<(), SearchError>{
        if self.status != SearchStatus::Idle {
            return Err(SearchError::RootChangeDuringSearch);
        }

        self.tree = Some(Tree::new(root));
        Ok(())
    }

    /// Runs up to `max_iterations` iterations from the root and returns the
    /// action chosen by the final-choice function.
    ///
    /// A root with a single legal action returns it without iterating.
    ///
    /// # Returns
    /// The chosen action, or
    /// - `SearchError::NoRoot` if no root was set,
    /// - `SearchError::NoLegalActions` if the root is terminal,
    /// - any error raised by a policy during an iteration.
    ///
    /// The search is idle again when this returns, whatever the result.
    pub fn search(&mut self, max_iterations: usize) -> Result<ActionOf<Sim::State>, SearchError>{
        let tree = self.tree.as_ref().ok_or(SearchError::NoRoot)?;

        match tree.get(tree.root()).state().legal_actions() {
            [] => return Err(SearchError::NoLegalActions),
            [only] => return Ok(only.clone()),
            _ => {}
        }

        self.status = SearchStatus::Running;
        let result = self.run(max_iterations);
        self.status = SearchStatus::Idle;

        result
    }

    /// The action the final-choice function picks from the current tree,
    /// without running any iteration.
    ///
    /// # Returns
    /// `SearchError::NoRoot` if no root was set, `SearchError::Unexplored`
    /// if the root has no child yet.
    pub fn action(&self) -> Result<ActionOf<Sim::State>, SearchError>{
        let tree = self.tree.as_ref().ok_or(SearchError::NoRoot)?;

        (self.final_choice)(tree, tree.root()).ok_or(SearchError::Unexplored)
    }

    fn run(&mut self, max_iterations: usize) -> Result<ActionOf<Sim::State>, SearchError>{
        let tree = self.tree.as_mut().ok_or(SearchError::NoRoot)?;
        let root = tree.root();

        for iteration in 0..max_iterations {
            let leaf = self.tree_policy.traverse(tree, root, &mut self.sim, &mut self.rng)?;
            let reward = self.simulation_policy.rollout(tree.get(leaf).state(), &mut self.sim, &mut self.rng)?;
            (self.backup)(tree, leaf, reward);

            trace!(iteration, leaf = leaf.index(), reward, "uct iteration");
        }

        let action = (self.final_choice)(tree, root).ok_or(SearchError::Unexplored)?;

        debug!(
            iterations = max_iterations,
            nodes = tree.len(),
            root_visits = tree.get(root).visits(),
            action = action.id(),
            "uct search done"
        );

        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{first_player_reward, PickAction, PickSimulator, PickState};
    use crate::NodeId;
    use crate::{win_reward, DraughtsSimulator, DraughtsState, Player};

    fn pick_search(seed: u64) -> UctSearch<PickSimulator>{
        UctSearch::from_config(
            PickSimulator::default(),
            Box::new(first_player_reward),
            &UctConfig::DEFAULT.with_seed(seed)
        )
    }

    #[test]
    fn test_config_defaults() {
        let config = UctConfig::default();
        assert_eq!(config.exploration_coef, std::f64::consts::FRAC_1_SQRT_2);
        assert_eq!(config.seed, None);

        let config = config.with_exploration_coef(2.0).with_seed(3);
        assert_eq!(config, UctConfig { exploration_coef: 2.0, seed: Some(3) });
    }

    #[test]
    fn test_search_without_root() {
        let mut search = pick_search(0);

        assert_eq!(search.search(10).unwrap_err(), SearchError::NoRoot);
        assert_eq!(search.action().unwrap_err(), SearchError::NoRoot);
        assert_eq!(search.status(), SearchStatus::Idle);
    }

    #[test]
    fn test_single_action_short_circuit() -> Result<(), SearchError> {
        let mut search = pick_search(0);
        search.set_root(Node::new_root(PickState::from_picks(&[0, 1, 2])))?;

        let action = search.search(1000)?;

        assert_eq!(action.value, 3);
        assert_eq!(search.simulator().steps, 0);
        assert_eq!(search.tree().map(|tree| tree.len()), Some(1));
        Ok(())
    }

    #[test]
    fn test_terminal_root() -> Result<(), SearchError> {
        let mut search = pick_search(0);
        search.set_root(Node::new_root(PickState::from_picks(&[0, 1, 2, 3])))?;

        assert_eq!(search.search(10).unwrap_err(), SearchError::NoLegalActions);
        assert_eq!(search.status(), SearchStatus::Idle);
        Ok(())
    }

    #[test]
    fn test_root_visits_match_iterations() -> Result<(), SearchError> {
        let mut search = pick_search(1);
        search.set_root(Node::new_root(PickState::new()))?;

        search.search(50)?;

        let tree = search.tree().ok_or(SearchError::NoRoot)?;
        assert_eq!(tree.get(tree.root()).visits(), 50);
        assert_eq!(tree.get(tree.root()).edges().len(), 4);
        Ok(())
    }

    #[test]
    fn test_search_finds_winning_pick() -> Result<(), SearchError> {
        // First player holds 1, second holds 2: taking 3 wins, taking 0 loses.
        let mut search = pick_search(5);
        search.set_root(Node::new_root(PickState::from_picks(&[1, 2])))?;

        let action = search.search(200)?;

        assert_eq!(action.value, 3);
        assert_eq!(search.action()?, action);
        Ok(())
    }

    #[test]
    fn test_same_seed_same_choice() -> Result<(), SearchError> {
        let mut first = pick_search(7);
        let mut second = pick_search(7);
        first.set_root(Node::new_root(PickState::new()))?;
        second.set_root(Node::new_root(PickState::new()))?;

        assert_eq!(first.search(100)?, second.search(100)?);
        Ok(())
    }

    #[test]
    fn test_set_root_with_node_from_previous_tree() -> Result<(), SearchError> {
        let mut search = pick_search(9);
        search.set_root(Node::new_root(PickState::new()))?;
        search.search(50)?;

        let tree = search.tree().ok_or(SearchError::NoRoot)?;
        let expanded = tree.get(tree.root()).clone();
        assert_eq!(expanded.edges().len(), 4);

        search.set_root(expanded)?;
        search.search(10)?;

        let tree = search.tree().ok_or(SearchError::NoRoot)?;
        assert_eq!(tree.get(tree.root()).visits(), 10);
        assert_eq!(tree.get(tree.root()).edges().len(), 4);
        assert_eq!(tree.len(), 11);
        Ok(())
    }

    fn least_visited_action(tree: &Tree<PickState>, node: NodeId) -> Option<PickAction>{
        tree.get(node).edges().iter()
            .min_by_key(|(_, child)| tree.get(*child).visits())
            .map(|(action, _)| action.clone())
    }

    #[test]
    fn test_custom_final_choice_is_used() -> Result<(), SearchError> {
        // Taking 3 wins and gets nearly every visit; the custom choice picks the loser.
        let mut search = pick_search(5).with_final_choice(least_visited_action);
        search.set_root(Node::new_root(PickState::from_picks(&[1, 2])))?;

        let action = search.search(200)?;

        assert_eq!(action.value, 0);
        assert_eq!(search.action()?, action);
        Ok(())
    }

    #[test]
    fn test_set_root_while_running() {
        let mut search = pick_search(0);
        search.status = SearchStatus::Running;

        let result = search.set_root(Node::new_root(PickState::new()));

        assert_eq!(result.unwrap_err(), SearchError::RootChangeDuringSearch);
        assert!(search.tree().is_none());
    }

    #[test]
    fn test_error_returns_to_idle() -> Result<(), SearchError> {
        let mut search = pick_search(0);
        search.set_root(Node::new_root(PickState::detached(&[])))?;

        assert_eq!(search.search(10).unwrap_err(), SearchError::MissingSnapshot);
        assert_eq!(search.status(), SearchStatus::Idle);

        search.set_root(Node::new_root(PickState::new()))?;
        search.search(10)?;
        Ok(())
    }

    #[test]
    fn test_action_before_search() -> Result<(), SearchError> {
        let mut search = pick_search(0);
        search.set_root(Node::new_root(PickState::new()))?;

        assert_eq!(search.action().unwrap_err(), SearchError::Unexplored);
        Ok(())
    }

    #[test]
    fn test_draughts_search_returns_legal_action() -> Result<(), SearchError> {
        let mut search = UctSearch::from_config(
            DraughtsSimulator::new(),
            win_reward(Player::Black),
            &UctConfig::DEFAULT.with_seed(42)
        );
        let state = DraughtsState::start();
        search.set_root(Node::new_root(state.clone()))?;

        let action = search.search(30)?;

        assert!(state.legal_actions().contains(&action));
        assert_eq!(action.player(), Player::Black);
        Ok(())
    }
}
