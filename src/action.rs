//! Draughts actions.
//!
//! An action is immutable once built: it records who moves, how the piece
//! travels, and the ordered list of cell writes that applies it to a board.

use crate::{Board, Cell, GameAction, Player, Pos};

/// A single cell write: `(position, new cell value)`.
pub type Mutation = (Pos, Cell);

/// How the moving piece travels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Motion{
    /// A man steps one square diagonally forward.
    ManSlide{ from: Pos, to: Pos, promotes: bool },
    /// A man captures one or more pieces in a single chain.
    ManJump{ from: Pos, skipped: Vec<Pos>, targets: Vec<Pos>, promotes: bool },
    /// A queen slides any distance along a free diagonal.
    QueenSlide{ from: Pos, to: Pos },
    /// A queen captures one or more pieces in a single chain.
    QueenJump{ from: Pos, skipped: Vec<Pos>, targets: Vec<Pos> }
}

/// One legal move of a draughts position.
///
/// Built only by the rules engine. `id` is the action's index in the legal
/// action list of the state that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DraughtsAction{
    id: usize,
    player: Player,
    motion: Motion,
    mutations: Vec<Mutation>
}

impl DraughtsAction{
    pub(crate) fn man_slide(player: Player, from: Pos, to: Pos) -> Self{
        let promotes = to.row == player.promotion_row();
        Self::build(player, Motion::ManSlide { from, to, promotes })
    }

    /// Capture chain of a man. `targets` must not be empty.
    pub(crate) fn man_jump(player: Player, from: Pos, skipped: Vec<Pos>, targets: Vec<Pos>) -> Self{
        let promotes = targets.last().is_some_and(|last| last.row == player.promotion_row());
        Self::build(player, Motion::ManJump { from, skipped, targets, promotes })
    }

    pub(crate) fn queen_slide(player: Player, from: Pos, to: Pos) -> Self{
        Self::build(player, Motion::QueenSlide { from, to })
    }

    /// Capture chain of a queen. `targets` must not be empty.
    pub(crate) fn queen_jump(player: Player, from: Pos, skipped: Vec<Pos>, targets: Vec<Pos>) -> Self{
        Self::build(player, Motion::QueenJump { from, skipped, targets })
    }

    fn build(player: Player, motion: Motion) -> Self{
        let mutations = Self::mutations_of(player, &motion);
        DraughtsAction { id: 0, player, motion, mutations }
    }

    /// Source emptied first, then every captured square, then the landing square.
    fn mutations_of(player: Player, motion: &Motion) -> Vec<Mutation>{
        match motion {
            Motion::ManSlide { from, to, promotes } => {
                let piece = if *promotes { Cell::queen(player) } else { Cell::man(player) };
                vec![(*from, Cell::Empty), (*to, piece)]
            }
            Motion::QueenSlide { from, to } => {
                vec![(*from, Cell::Empty), (*to, Cell::queen(player))]
            }
            Motion::ManJump { from, skipped, targets, promotes } => {
                let piece = if *promotes { Cell::queen(player) } else { Cell::man(player) };
                Self::chain_mutations(*from, skipped, targets, piece)
            }
            Motion::QueenJump { from, skipped, targets } => {
                Self::chain_mutations(*from, skipped, targets, Cell::queen(player))
            }
        }
    }

    fn chain_mutations(from: Pos, skipped: &[Pos], targets: &[Pos], piece: Cell) -> Vec<Mutation>{
        let mut mutations = Vec::with_capacity(skipped.len() + 2);
        mutations.push((from, Cell::Empty));
        mutations.extend(skipped.iter().map(|&pos| (pos, Cell::Empty)));
        mutations.push((targets.last().copied().unwrap_or(from), piece));
        mutations
    }

    #[inline]
    pub(crate) fn with_id(mut self, id: usize) -> Self{
        self.id = id;
        self
    }

    /// Side playing the action.
    #[inline]
    pub fn player(&self) -> Player{
        self.player
    }

    /// How the moving piece travels, with its slide or capture details.
    #[inline]
    pub fn motion(&self) -> &Motion{
        &self.motion
    }

    /// Square the moving piece leaves.
    pub fn source_position(&self) -> Pos{
        match &self.motion {
            Motion::ManSlide { from, .. }
            | Motion::ManJump { from, .. }
            | Motion::QueenSlide { from, .. }
            | Motion::QueenJump { from, .. } => *from
        }
    }

    /// Square the moving piece ends on.
    pub fn final_position(&self) -> Pos{
        match &self.motion {
            Motion::ManSlide { to, .. } | Motion::QueenSlide { to, .. } => *to,
            Motion::ManJump { from, targets, .. } | Motion::QueenJump { from, targets, .. } => {
                targets.last().copied().unwrap_or(*from)
            }
        }
    }

    /// Captured squares, in capture order. Empty for slides.
    pub fn skipped_positions(&self) -> &[Pos]{
        match &self.motion {
            Motion::ManJump { skipped, .. } | Motion::QueenJump { skipped, .. } => skipped,
            Motion::ManSlide { .. } | Motion::QueenSlide { .. } => &[]
        }
    }

    /// Intermediate and final landing squares of a capture chain. Empty for slides.
    pub fn target_positions(&self) -> &[Pos]{
        match &self.motion {
            Motion::ManJump { targets, .. } | Motion::QueenJump { targets, .. } => targets,
            Motion::ManSlide { .. } | Motion::QueenSlide { .. } => &[]
        }
    }

    /// Number of captured pieces; 0 for slides.
    #[inline]
    pub fn priority(&self) -> usize{
        self.skipped_positions().len()
    }

    /// `true` when a man becomes a queen with this action.
    pub fn promotes(&self) -> bool{
        match &self.motion {
            Motion::ManSlide { promotes, .. } | Motion::ManJump { promotes, .. } => *promotes,
            Motion::QueenSlide { .. } | Motion::QueenJump { .. } => false
        }
    }

    /// Ordered cell writes that apply this action.
    #[inline]
    pub fn mutations(&self) -> &[Mutation]{
        &self.mutations
    }

    /// Applies the mutation list to `board`.
    pub fn apply(&self, board: &mut Board){
        for &(pos, cell) in &self.mutations {
            board.set(pos, cell);
        }
    }
}

impl GameAction for DraughtsAction{
    #[inline]
    fn id(&self) -> usize{
        self.id
    }
}
