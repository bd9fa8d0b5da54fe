//! Module defining the capability traits the UCT search is generic over.
//!
//! The search framework only ever talks to a game through these three traits:
//! an action with a stable identity, a state that knows its legal actions, and
//! a simulator that can step a position forward and be saved/restored.

use std::fmt::Debug;

/// Trait for a move that can be played from a `GameState`.
pub trait GameAction: Clone + Debug{
    /// Stable identity of the action within the state that produced it.
    ///
    /// Two actions of the same state never share an id, even when they
    /// otherwise compare equal. The search tree keys its edges by this id.
    ///
    /// # Examples
    /// ```rust
    /// use draughts_uct::{DraughtsState, GameAction, GameState};
    /// let state = DraughtsState::start();
    /// let ids: Vec<usize> = state.legal_actions().iter().map(|a| a.id()).collect();
    /// assert_eq!(ids, (0..ids.len()).collect::<Vec<_>>());
    /// ```
    fn id(&self) -> usize;
}

/// Trait for a game position as seen by the search.
///
/// Implementations are expected to compute their legal actions lazily and
/// cache them, since the search asks for them repeatedly.
pub trait GameState: Clone + Debug{
    /// The move type of this game.
    type Action: GameAction;

    /// A detached copy of the position, used to restore a `GameSimulator`.
    type Snapshot: Clone;

    /// Returns every legal action from this position, in a stable order.
    ///
    /// # Returns
    /// An empty slice when the position is terminal.
    fn legal_actions(&self) -> &[Self::Action];

    /// Determines if the position is terminal (no legal action left).
    #[inline]
    fn is_terminal(&self) -> bool{
        self.legal_actions().is_empty()
    }

    /// Returns a detached snapshot of the position.
    ///
    /// # Returns
    /// `None` if this state cannot be replayed by a simulator. Expansion and
    /// rollout refuse to run from such a state.
    fn snapshot(&self) -> Option<Self::Snapshot>;
}

/// Trait for the mutable game instance that applies actions.
///
/// The search owns its own simulator and always restores the snapshot it
/// intends to play from before stepping; `restore` replaces the whole position.
pub trait GameSimulator{
    /// The state type produced by `step`.
    type State: GameState;

    /// Applies `action` to the current position, advances the turn and
    /// returns the resulting state.
    ///
    /// # Parameters
    /// - `action`: an action legal in the simulator's current position.
    fn step(&mut self, action: &ActionOf<Self::State>) -> Self::State;

    /// Saves the current position.
    fn snapshot(&self) -> SnapshotOf<Self::State>;

    /// Replaces the current position with `snapshot`.
    fn restore(&mut self, snapshot: &SnapshotOf<Self::State>);
}

/// Action type of a `GameState`.
pub type ActionOf<S> = <S as GameState>::Action;

/// Snapshot type of a `GameState`.
pub type SnapshotOf<S> = <S as GameState>::Snapshot;
