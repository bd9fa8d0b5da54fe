//! The authoritative mutable draughts game.

use crate::{Board, DraughtsAction, DraughtsState, GameSimulator, Player, SimState};

/// Owns the single live `(player, board)` pair of a game.
///
/// The position only changes through [`step`](GameSimulator::step),
/// [`reset`](DraughtsSimulator::reset) and [`restore`](GameSimulator::restore).
#[derive(Clone, Debug)]
pub struct DraughtsSimulator{
    player: Player,
    board: Board
}

impl Default for DraughtsSimulator{
    fn default() -> Self{
        DraughtsSimulator::new()
    }
}

impl DraughtsSimulator{
    /// Creates a simulator on the start position, black to move.
    pub fn new() -> Self{
        DraughtsSimulator { player: Player::Black, board: Board::start_position() }
    }

    /// Restores the start position, black to move.
    pub fn reset(&mut self){
        self.player = Player::Black;
        self.board = Board::start_position();
    }

    /// A fresh state for the current position.
    pub fn state(&self) -> DraughtsState{
        DraughtsState::new(self.player, &self.board)
    }

    #[inline]
    pub fn board(&self) -> &Board{
        &self.board
    }

    /// Side to move in the live position.
    #[inline]
    pub fn current_player(&self) -> Player{
        self.player
    }
}

impl GameSimulator for DraughtsSimulator{
    type State = DraughtsState;

    fn step(&mut self, action: &DraughtsAction) -> DraughtsState{
        action.apply(&mut self.board);
        self.player = action.player().opponent();
        self.state()
    }

    fn snapshot(&self) -> SimState{
        SimState { player: self.player, board: self.board }
    }

    fn restore(&mut self, snapshot: &SimState){
        self.player = snapshot.player;
        self.board = snapshot.board;
    }
}
