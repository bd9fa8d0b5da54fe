//! Pluggable UCT policies: expand, tree, simulation, backup and final choice.
//!
//! Every policy keeps its decision rule as a plain function pointer so callers
//! can swap in their own. The defaults follow plain UCT: uniform random
//! expansion and rollouts, UCB1 selection and the robust (most visited) child
//! as the final move.

use rand::{rngs::StdRng, Rng};

use crate::{ActionOf, GameAction, GameSimulator, GameState, Node, NodeId, SearchError, Tree};

/// Sequence of `(state, action taken from it)` produced by a rollout.
///
/// The last entry holds the terminal state and no action.
pub type Trajectory<S> = [(S, Option<ActionOf<S>>)];

/// Picks an action of the node's state that has no edge yet.
pub type UntriedActionChooser<S> = fn(node: &Node<S>, rng: &mut StdRng) -> Option<ActionOf<S>>;

/// Picks the child to descend into from a fully expanded node.
pub type ChildChooser<S> = fn(tree: &Tree<S>, node: NodeId, exploration_coef: f64) -> Option<NodeId>;

/// Picks the next action of a rollout.
pub type RolloutActionChooser<S> = fn(state: &S, rng: &mut StdRng) -> Option<ActionOf<S>>;

/// Propagates a reward from a node to its ancestors.
pub type BackupFunction<S> = fn(tree: &mut Tree<S>, node: NodeId, reward: f64);

/// Picks the action to actually play once the search is over.
pub type FinalActionChooser<S> = fn(tree: &Tree<S>, node: NodeId) -> Option<ActionOf<S>>;

/// Scores a finished rollout. Must fail with
/// `SearchError::NonTerminalTrajectory` if the last state is not terminal.
pub type RewardFunction<S> = Box<dyn Fn(&Trajectory<S>) -> Result<f64, SearchError>>;

/// Uniformly random choice among the untried actions of `node`.
pub fn random_untried_action<S: GameState>(node: &Node<S>, rng: &mut StdRng) -> Option<ActionOf<S>>{
    let untried: Vec<&ActionOf<S>> = node.state().legal_actions().iter()
        .filter(|action| !node.is_tried(action.id()))
        .collect();

    if untried.is_empty() {
        return None;
    }

    Some(untried[rng.random_range(0..untried.len())].clone())
}

/// Child with the highest UCB1 score; ties go to the first edge found.
pub fn max_ucb_child<S: GameState>(tree: &Tree<S>, node: NodeId, exploration_coef: f64) -> Option<NodeId>{
    let mut best: Option<(f64, NodeId)> = None;

    for (action, child) in tree.get(node).edges() {
        let Some(score) = tree.eval_action(node, action, exploration_coef) else {
            continue;
        };

        if best.map_or(true, |(best_score, _)| score > best_score) {
            best = Some((score, *child));
        }
    }

    best.map(|(_, child)| child)
}

/// Uniformly random legal action of `state`.
pub fn random_action<S: GameState>(state: &S, rng: &mut StdRng) -> Option<ActionOf<S>>{
    let actions = state.legal_actions();

    if actions.is_empty() {
        return None;
    }

    Some(actions[rng.random_range(0..actions.len())].clone())
}

/// Adds `reward` to `node` and every ancestor up to the root.
pub fn backup_to_root<S: GameState>(tree: &mut Tree<S>, node: NodeId, reward: f64){
    tree.backup(node, reward);
}

/// Action whose child was visited the most (robust child). Ties go to the
/// first edge found.
pub fn most_visited_action<S: GameState>(tree: &Tree<S>, node: NodeId) -> Option<ActionOf<S>>{
    let mut best: Option<(u32, &ActionOf<S>)> = None;

    for (action, child) in tree.get(node).edges() {
        let visits = tree.get(*child).visits();

        if best.map_or(true, |(best_visits, _)| visits > best_visits) {
            best = Some((visits, action));
        }
    }

    best.map(|(_, action)| action.clone())
}

/// Grows the tree by one node.
#[derive(Clone, Debug)]
pub struct ExpandPolicy<S: GameState>{
    chooser: UntriedActionChooser<S>
}

impl<S: GameState> Default for ExpandPolicy<S>{
    fn default() -> Self{
        Self::new()
    }
}

impl<S: GameState> ExpandPolicy<S>{
    /// Expansion with a uniformly random untried action.
    pub fn new() -> Self{
        Self::with_chooser(random_untried_action::<S>)
    }

    /// Expansion with a custom untried-action chooser.
    ///
    /// # Parameters
    /// - `chooser`: returns the action to expand, or `None` when every action
    ///   of the node already has a child.
    pub fn with_chooser(chooser: UntriedActionChooser<S>) -> Self{
        ExpandPolicy { chooser }
    }

    /// Replays one untried action of `node` and links the resulting state as
    /// a new child.
    ///
    /// The simulator is restored to the node's snapshot before stepping.
    ///
    /// # Returns
    /// The new child, or
    /// - `SearchError::FullyExpanded` if every action of `node` already has a child,
    /// - `SearchError::MissingSnapshot` if the node's state has no snapshot.
    pub fn expand<Sim>(&self, tree: &mut Tree<S>, node: NodeId, sim: &mut Sim, rng: &mut StdRng) -> Result<NodeId, SearchError>
    where Sim: GameSimulator<State = S>
    {
        let current = tree.get(node);
        let action = (self.chooser)(current, rng).ok_or(SearchError::FullyExpanded)?;
        let snapshot = current.state().snapshot().ok_or(SearchError::MissingSnapshot)?;

        sim.restore(&snapshot);
        let state = sim.step(&action);

        tree.add_child(node, action, state)
    }
}

/// Walks down from the root, expanding the first node that still has an
/// untried action.
#[derive(Clone, Debug)]
pub struct TreePolicy<S: GameState>{
    expand: ExpandPolicy<S>,
    best_child: ChildChooser<S>,
    exploration_coef: f64
}

impl<S: GameState> TreePolicy<S>{
    /// UCB1 selection with the given exploration coefficient.
    pub fn new(expand: ExpandPolicy<S>, exploration_coef: f64) -> Self{
        Self::with_chooser(expand, max_ucb_child::<S>, exploration_coef)
    }

    /// Tree policy with a custom child selection.
    ///
    /// # Parameters
    /// - `expand`: policy applied to the first node with an untried action.
    /// - `best_child`: picks the child of a fully expanded node.
    /// - `exploration_coef`: passed unchanged to `best_child`.
    pub fn with_chooser(expand: ExpandPolicy<S>, best_child: ChildChooser<S>, exploration_coef: f64) -> Self{
        TreePolicy { expand, best_child, exploration_coef }
    }

    /// Exploration coefficient handed to the child chooser.
    #[inline]
    pub fn exploration_coef(&self) -> f64{
        self.exploration_coef
    }

    /// Descends from `root` until it expands a new node or reaches a terminal one.
    ///
    /// A node with untried actions is always expanded before any of its
    /// children is compared by score.
    pub fn traverse<Sim>(&self, tree: &mut Tree<S>, root: NodeId, sim: &mut Sim, rng: &mut StdRng) -> Result<NodeId, SearchError>
    where Sim: GameSimulator<State = S>
    {
        let mut node = root;

        while !tree.get(node).state().is_terminal() {
            if tree.get(node).has_untried_actions() {
                return self.expand.expand(tree, node, sim, rng);
            }

            node = (self.best_child)(tree, node, self.exploration_coef).ok_or(SearchError::NoLegalActions)?;
        }

        Ok(node)
    }
}

/// Random playout to a terminal state, scored by a reward function.
pub struct SimulationPolicy<S: GameState>{
    reward: RewardFunction<S>,
    chooser: RolloutActionChooser<S>
}

impl<S: GameState> SimulationPolicy<S>{
    /// Uniformly random rollouts scored by `reward`.
    pub fn new(reward: RewardFunction<S>) -> Self{
        Self::with_chooser(reward, random_action::<S>)
    }

    /// Rollouts driven by `chooser` and scored by `reward`.
    pub fn with_chooser(reward: RewardFunction<S>, chooser: RolloutActionChooser<S>) -> Self{
        SimulationPolicy { reward, chooser }
    }

    /// Plays `state` out to a terminal state and returns its reward.
    ///
    /// The simulator is restored to `state`'s snapshot first; a terminal
    /// `state` is scored directly without touching the simulator.
    ///
    /// # Returns
    /// The reward, or `SearchError::MissingSnapshot` if a non-terminal
    /// `state` has no snapshot. Errors of the reward function are forwarded.
    pub fn rollout<Sim>(&self, state: &S, sim: &mut Sim, rng: &mut StdRng) -> Result<f64, SearchError>
    where Sim: GameSimulator<State = S>
    {
        let mut trajectory = Vec::new();
        let mut current = state.clone();

        if !current.is_terminal() {
            let snapshot = current.snapshot().ok_or(SearchError::MissingSnapshot)?;
            sim.restore(&snapshot);
        }

        while !current.is_terminal() {
            let action = (self.chooser)(&current, rng).ok_or(SearchError::NoLegalActions)?;
            let next = sim.step(&action);
            trajectory.push((std::mem::replace(&mut current, next), Some(action)));
        }

        trajectory.push((current, None));
        (self.reward)(trajectory.as_slice())
    }
}

impl<S: GameState> std::fmt::Debug for SimulationPolicy<S>{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result{
        f.debug_struct("SimulationPolicy").finish_non_exhaustive()
    }
}
