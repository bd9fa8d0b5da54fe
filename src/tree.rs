//! Arena-allocated search tree.
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`]. A
//! node's parent link is a plain index, never an owner; every child is owned
//! by the arena and reachable from exactly one parent edge. Dropping the tree
//! drops every node at once.

use crate::{ActionOf, GameAction, GameState, SearchError};

/// Index of a node in its tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId{
    /// Position of the node in its tree's arena.
    #[inline]
    pub fn index(self) -> usize{
        self.0
    }
}

/// A node of the search tree
///
/// # Type Parameters
/// - `S`: The game state stored in the node
#[derive(Clone, Debug)]
pub struct Node<S: GameState>{
    state: S,
    parent: Option<NodeId>,
    edges: Vec<(ActionOf<S>, NodeId)>,
    visits: u32,
    total_reward: f64,
    mean_reward: f64
}

impl<S: GameState> Node<S>{
    /// Creates a detached node holding `state`, to be installed as a root.
    #[inline]
    pub fn new_root(state: S) -> Self{
        Node { state, parent: None, edges: Vec::new(), visits: 0, total_reward: 0.0, mean_reward: 0.0 }
    }

    /// State reached through the edge leading to this node.
    #[inline]
    pub fn state(&self) -> &S{
        &self.state
    }

    /// Parent node, `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId>{
        self.parent
    }

    /// `true` for the node without a parent.
    #[inline]
    pub fn is_root(&self) -> bool{
        self.parent.is_none()
    }

    /// `(action, child)` edges in insertion order.
    #[inline]
    pub fn edges(&self) -> &[(ActionOf<S>, NodeId)]{
        &self.edges
    }

    /// Actions already expanded from this node.
    pub fn tried_actions(&self) -> impl Iterator<Item = &ActionOf<S>>{
        self.edges.iter().map(|(action, _)| action)
    }

    /// `true` if an edge for the action with this id exists.
    pub fn is_tried(&self, action_id: usize) -> bool{
        self.edges.iter().any(|(action, _)| action.id() == action_id)
    }

    /// Child reached through `action`, matched by action identity.
    pub fn child(&self, action: &ActionOf<S>) -> Option<NodeId>{
        self.edges.iter()
            .find(|(tried, _)| tried.id() == action.id())
            .map(|(_, child)| *child)
    }

    /// `true` while some legal action of the node's state has no edge yet.
    #[inline]
    pub fn has_untried_actions(&self) -> bool{
        self.edges.len() < self.state.legal_actions().len()
    }

    /// Number of rollouts backed up through this node.
    #[inline]
    pub fn visits(&self) -> u32{
        self.visits
    }

    #[inline]
    pub fn total_reward(&self) -> f64{
        self.total_reward
    }

    /// `total_reward / visits`, 0 before the first visit.
    #[inline]
    pub fn mean_reward(&self) -> f64{
        self.mean_reward
    }

    /// Records one rollout result passing through this node.
    #[inline]
    pub fn backup(&mut self, reward: f64){
        self.visits += 1;
        self.total_reward += reward;
        self.mean_reward = self.total_reward / self.visits as f64;
    }
}

/// The standard Upper Confidence Bound 1 (UCB1) score of a child.
///
/// `mean + exploration_coef * sqrt(2 * ln(parent_visits) / child_visits)`
///
/// # Returns
/// `f64::INFINITY` for a child that was never visited.
#[inline]
pub fn ucb1(mean: f64, child_visits: u32, parent_visits: u32, exploration_coef: f64) -> f64{
    if child_visits == 0 {
        return f64::INFINITY;
    }
    mean + exploration_coef * (2.0 * (parent_visits as f64).ln() / child_visits as f64).sqrt()
}

/// Search tree with arena-based node storage.
#[derive(Clone, Debug)]
pub struct Tree<S: GameState>{
    nodes: Vec<Node<S>>
}

impl<S: GameState> Tree<S>{
    /// Creates a tree whose root holds the state of `root`.
    ///
    /// Only the state is kept: parent link, edges and statistics are reset, so
    /// a node taken from another tree never brings foreign ids or old visits.
    pub fn new(root: Node<S>) -> Self{
        Tree { nodes: vec![Node::new_root(root.state)] }
    }

    /// Id of the root, always the first node of the arena.
    #[inline]
    pub fn root(&self) -> NodeId{
        NodeId(0)
    }

    /// Gets a node. `id` must come from this tree.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node<S>{
        &self.nodes[id.0]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<S>{
        &mut self.nodes[id.0]
    }

    /// Number of nodes, root included.
    #[inline]
    pub fn len(&self) -> usize{
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool{
        self.nodes.is_empty()
    }

    /// Creates a child of `parent` for `action` holding `state`.
    ///
    /// # Returns
    /// The id of the new child, or `SearchError::DuplicateAction` if `parent`
    /// already has an edge for this action identity.
    pub fn add_child(&mut self, parent: NodeId, action: ActionOf<S>, state: S) -> Result<NodeId, SearchError>{
        if self.get(parent).is_tried(action.id()) {
            return Err(SearchError::DuplicateAction(action.id()));
        }

        let child = NodeId(self.nodes.len());
        let mut node = Node::new_root(state);
        node.parent = Some(parent);

        self.nodes.push(node);
        self.get_mut(parent).edges.push((action, child));
        Ok(child)
    }

    /// UCB1 score of the child of `node` reached through `action`.
    ///
    /// # Returns
    /// `None` if `action` has no edge from `node`.
    pub fn eval_action(&self, node: NodeId, action: &ActionOf<S>, exploration_coef: f64) -> Option<f64>{
        let parent = self.get(node);
        let child = self.get(parent.child(action)?);

        Some(ucb1(child.mean_reward, child.visits, parent.visits, exploration_coef))
    }

    /// Adds `reward` to `node` and every one of its ancestors.
    pub fn backup(&mut self, node: NodeId, reward: f64){
        let mut current = Some(node);

        while let Some(id) = current {
            let node = self.get_mut(id);
            node.backup(reward);
            current = node.parent;
        }
    }
}
