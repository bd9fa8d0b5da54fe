//! Draughts game state and its detachable snapshot.

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

use crate::{rules, Board, DraughtsAction, GameState, Player};

/// Detached copy of a position: the player to move and the board.
///
/// Used to restore a [`DraughtsSimulator`](crate::DraughtsSimulator) before
/// search code steps it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimState{
    pub player: Player,
    pub board: Board
}

/// A draughts position with lazily computed legal actions.
///
/// The state owns its board; it never aliases the simulator's board.
#[derive(Clone, Debug)]
pub struct DraughtsState{
    player: Player,
    board: Board,
    actions: OnceCell<Vec<DraughtsAction>>
}

impl DraughtsState{
    /// Creates a state from a copy of `board`.
    pub fn new(player: Player, board: &Board) -> Self{
        DraughtsState { player, board: *board, actions: OnceCell::new() }
    }

    /// The standard start position, black to move.
    pub fn start() -> Self{
        Self::new(Player::Black, &Board::start_position())
    }

    /// Creates a state from a detached snapshot, e.g. the live simulator's.
    pub fn from_snapshot(snapshot: &SimState) -> Self{
        Self::new(snapshot.player, &snapshot.board)
    }

    /// Side to move.
    #[inline]
    pub fn player(&self) -> Player{
        self.player
    }

    #[inline]
    pub fn board(&self) -> &Board{
        &self.board
    }

    /// The winner of a terminal state: the side that is not to move.
    ///
    /// # Returns
    /// `None` while the game is still running.
    pub fn winner(&self) -> Option<Player>{
        if self.is_terminal() { Some(self.player.opponent()) } else { None }
    }

    /// Replaces player and board with `snapshot` and drops the cached actions.
    pub fn load(&mut self, snapshot: &SimState){
        self.player = snapshot.player;
        self.board = snapshot.board;
        self.actions = OnceCell::new();
    }
}

impl GameState for DraughtsState{
    type Action = DraughtsAction;
    type Snapshot = SimState;

    fn legal_actions(&self) -> &[DraughtsAction]{
        self.actions.get_or_init(|| rules::legal_actions(self.player, &self.board))
    }

    fn snapshot(&self) -> Option<SimState>{
        Some(SimState { player: self.player, board: self.board })
    }
}
