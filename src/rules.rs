//! Legal action generation.
//!
//! Captures are found by depth-first search over capture chains. Every prefix
//! of a chain is itself a playable action; the forced-capture rule is applied
//! afterwards over the whole position, keeping only the longest captures.

use crate::{is_on_board, Board, Cell, DraughtsAction, Player, Pos, BOARD_SIZE};

/// The four diagonal directions as `(delta_row, delta_col)`.
const DIRECTIONS: [(i32, i32); 4] = [(1, -1), (1, 1), (-1, -1), (-1, 1)];

/// Set of board positions, one bit per cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct PosSet(u64);

impl PosSet{
    #[inline]
    fn contains(self, pos: Pos) -> bool{
        self.0 & (1 << pos.index()) != 0
    }

    #[inline]
    fn with(self, pos: Pos) -> PosSet{
        PosSet(self.0 | (1 << pos.index()))
    }
}

/// Capture chain under construction.
struct Chain{
    skipped: Vec<Pos>,
    targets: Vec<Pos>,
    captured: PosSet
}

impl Chain{
    fn new() -> Self{
        Chain { skipped: Vec::new(), targets: Vec::new(), captured: PosSet::default() }
    }

    fn push(&mut self, skipped: Pos, target: Pos){
        self.skipped.push(skipped);
        self.targets.push(target);
        self.captured = self.captured.with(skipped);
    }

    fn pop(&mut self){
        if let Some(skipped) = self.skipped.pop() {
            self.targets.pop();
            self.captured = PosSet(self.captured.0 & !(1 << skipped.index()));
        }
    }
}

#[inline]
fn is_opponent(board: &Board, pos: Pos, player: Player) -> bool{
    board.get(pos).owner() == Some(player.opponent())
}

/// Computes the legal actions of `player` on `board`.
///
/// Pieces are scanned in row-major order. If any capture exists, only the
/// captures with the maximal number of taken pieces are returned; otherwise
/// every slide is returned. Action ids are assigned in output order.
///
/// # Returns
/// An empty list when `player` cannot move.
pub fn legal_actions(player: Player, board: &Board) -> Vec<DraughtsAction>{
    let pieces: Vec<(Pos, Cell)> = board.pieces()
        .filter(|(pos, cell)| pos.is_dark() && cell.owner() == Some(player))
        .collect();

    let mut captures = Vec::new();
    for &(pos, cell) in &pieces {
        if cell.is_queen() {
            queen_jumps(player, pos, board, &mut captures);
        }
        else {
            man_jumps(player, pos, board, &mut captures);
        }
    }

    let max_priority = captures.iter().map(DraughtsAction::priority).max().unwrap_or(0);

    let actions = if max_priority > 0 {
        captures.retain(|action| action.priority() == max_priority);
        captures
    }
    else {
        let mut slides = Vec::new();
        for &(pos, cell) in &pieces {
            if cell.is_queen() {
                queen_slides(player, pos, board, &mut slides);
            }
            else {
                man_slides(player, pos, board, &mut slides);
            }
        }
        slides
    };

    actions.into_iter()
        .enumerate()
        .map(|(id, action)| action.with_id(id))
        .collect()
}

/// Single forward diagonal steps of a man.
fn man_slides(player: Player, pos: Pos, board: &Board, out: &mut Vec<DraughtsAction>){
    for delta_col in [-1, 1] {
        let to = pos.offset(player.forward(), delta_col);

        if is_on_board(to) && board.get(to).is_empty() {
            out.push(DraughtsAction::man_slide(player, pos, to));
        }
    }
}

/// Every capture chain (and every prefix of one) a man at `src` can play.
fn man_jumps(player: Player, src: Pos, board: &Board, out: &mut Vec<DraughtsAction>){
    extend_man_chain(player, src, src, &mut Chain::new(), PosSet::default(), board, out);
}

fn extend_man_chain(
    player: Player,
    src: Pos,
    at: Pos,
    chain: &mut Chain,
    visited: PosSet,
    board: &Board,
    out: &mut Vec<DraughtsAction>
){
    let visited = visited.with(at);

    for (delta_row, delta_col) in DIRECTIONS {
        let over = at.offset(delta_row, delta_col);
        let land = over.offset(delta_row, delta_col);

        if !is_on_board(over) || !is_on_board(land) {
            continue;
        }

        if !is_opponent(board, over, player) || chain.captured.contains(over) {
            continue;
        }

        if !board.get(land).is_empty() || visited.contains(land) {
            continue;
        }

        chain.push(over, land);
        out.push(DraughtsAction::man_jump(player, src, chain.skipped.clone(), chain.targets.clone()));
        extend_man_chain(player, src, land, chain, visited, board, out);
        chain.pop();
    }
}

/// Slides of a queen along each free diagonal ray.
fn queen_slides(player: Player, pos: Pos, board: &Board, out: &mut Vec<DraughtsAction>){
    for (delta_row, delta_col) in DIRECTIONS {
        let mut to = pos.offset(delta_row, delta_col);

        while is_on_board(to) && board.get(to).is_empty() {
            out.push(DraughtsAction::queen_slide(player, pos, to));
            to = to.offset(delta_row, delta_col);
        }
    }
}

/// Every capture chain (and every prefix of one) a queen at `src` can play.
fn queen_jumps(player: Player, src: Pos, board: &Board, out: &mut Vec<DraughtsAction>){
    extend_queen_chain(player, src, src, &DIRECTIONS, &mut Chain::new(), board, out);
}

/// First occupied square on the ray from `from` along `(delta_row, delta_col)`.
fn first_piece_on_ray(board: &Board, from: Pos, delta_row: i32, delta_col: i32) -> Option<Pos>{
    let mut pos = from.offset(delta_row, delta_col);

    while is_on_board(pos) {
        if !board.get(pos).is_empty() {
            return Some(pos);
        }
        pos = pos.offset(delta_row, delta_col);
    }

    None
}

fn extend_queen_chain(
    player: Player,
    src: Pos,
    at: Pos,
    directions: &[(i32, i32)],
    chain: &mut Chain,
    board: &Board,
    out: &mut Vec<DraughtsAction>
){
    for &(delta_row, delta_col) in directions {
        let Some(over) = first_piece_on_ray(board, at, delta_row, delta_col) else {
            continue;
        };

        if !is_opponent(board, over, player) || chain.captured.contains(over) {
            continue;
        }

        let mut landings = Vec::with_capacity(BOARD_SIZE as usize);
        let mut land = over.offset(delta_row, delta_col);
        while is_on_board(land) && board.get(land).is_empty() {
            landings.push(land);
            land = land.offset(delta_row, delta_col);
        }

        for &land in &landings {
            chain.push(over, land);
            out.push(DraughtsAction::queen_jump(player, src, chain.skipped.clone(), chain.targets.clone()));
            chain.pop();
        }

        let onward: Vec<(i32, i32)> = DIRECTIONS.iter()
            .copied()
            .filter(|&direction| direction != (-delta_row, -delta_col))
            .collect();

        for &land in &landings {
            chain.push(over, land);
            extend_queen_chain(player, src, land, &onward, chain, board, out);
            chain.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Motion, GameAction};

    fn white_man(row: i32, col: i32) -> (Pos, Cell){
        (Pos::new(row, col), Cell::WhiteMan)
    }

    fn black_man(row: i32, col: i32) -> (Pos, Cell){
        (Pos::new(row, col), Cell::BlackMan)
    }

    #[test]
    fn test_start_position_black_slides() {
        let actions = legal_actions(Player::Black, &Board::start_position());

        assert_eq!(actions.len(), 7);
        assert!(actions.iter().all(|a| matches!(a.motion(), Motion::ManSlide { .. })));
        assert!(actions.iter().all(|a| a.source_position().row == 5 && a.final_position().row == 4));
        assert!(actions.iter().all(|a| a.priority() == 0));
    }

    #[test]
    fn test_ids_follow_output_order() {
        let actions = legal_actions(Player::White, &Board::start_position());

        assert_eq!(actions.len(), 7);
        assert!(actions.iter().enumerate().all(|(index, a)| a.id() == index));
    }

    #[test]
    fn test_single_capture() {
        let board = Board::with_pieces(&[white_man(3, 2), black_man(4, 3)]);
        let actions = legal_actions(Player::White, &board);

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].skipped_positions(), &[Pos::new(4, 3)]);
        assert_eq!(actions[0].target_positions(), &[Pos::new(5, 4)]);
        assert_eq!(actions[0].priority(), 1);
        assert!(matches!(actions[0].motion(), Motion::ManJump { .. }));
    }

    #[test]
    fn test_chain_prefixes_are_generated() {
        let board = Board::with_pieces(&[white_man(3, 2), black_man(4, 3), black_man(6, 5)]);

        let mut raw = Vec::new();
        man_jumps(Player::White, Pos::new(3, 2), &board, &mut raw);

        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].priority(), 1);
        assert_eq!(raw[1].priority(), 2);
        assert_eq!(raw[1].target_positions(), &[Pos::new(5, 4), Pos::new(7, 6)]);

        let actions = legal_actions(Player::White, &board);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].skipped_positions(), &[Pos::new(4, 3), Pos::new(6, 5)]);
    }

    #[test]
    fn test_chain_promotion_on_last_row() {
        let board = Board::with_pieces(&[white_man(3, 2), black_man(4, 3), black_man(6, 5)]);
        let actions = legal_actions(Player::White, &board);

        assert!(actions[0].promotes());
        assert_eq!(actions[0].mutations().last(), Some(&(Pos::new(7, 6), Cell::WhiteQueen)));
    }

    #[test]
    fn test_men_capture_backwards() {
        let board = Board::with_pieces(&[black_man(3, 2), white_man(4, 3)]);
        let actions = legal_actions(Player::Black, &board);

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].final_position(), Pos::new(5, 4));
    }

    #[test]
    fn test_forced_capture_is_global() {
        // The man at (1, 0) can only slide, the man at (3, 2) must capture.
        let board = Board::with_pieces(&[white_man(1, 0), white_man(3, 2), black_man(4, 3)]);
        let actions = legal_actions(Player::White, &board);

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].source_position(), Pos::new(3, 2));
    }

    #[test]
    fn test_forced_capture_keeps_longest_across_pieces() {
        let board = Board::with_pieces(&[
            white_man(1, 0), black_man(2, 1),
            white_man(3, 4), black_man(4, 5), black_man(6, 5)
        ]);
        let actions = legal_actions(Player::White, &board);

        assert!(!actions.is_empty());
        assert!(actions.iter().all(|a| a.priority() == 2));
        assert!(actions.iter().all(|a| a.source_position() == Pos::new(3, 4)));
    }

    #[test]
    fn test_queen_never_recaptures_taken_piece() {
        // The queen can circle back: after taking (2,3), (5,4) and (5,2) it
        // lands on (4,1), whose (-1,1) ray meets the already taken (2,3).
        let board = Board::with_pieces(&[
            (Pos::new(1, 2), Cell::WhiteQueen),
            black_man(2, 1), black_man(2, 3),
            black_man(5, 2), black_man(5, 4)
        ]);

        let mut raw = Vec::new();
        queen_jumps(Player::White, Pos::new(1, 2), &board, &mut raw);
        for action in &raw {
            let skipped = action.skipped_positions();
            assert!(skipped.iter().enumerate().all(|(i, pos)| !skipped[..i].contains(pos)));
        }

        let actions = legal_actions(Player::White, &board);
        assert_eq!(actions.len(), 5);
        assert!(actions.iter().all(|a| a.priority() == 3));

        let finals: Vec<Pos> = actions.iter().map(DraughtsAction::final_position).collect();
        assert_eq!(finals, vec![
            Pos::new(4, 5), Pos::new(3, 6), Pos::new(2, 7),
            Pos::new(4, 1), Pos::new(3, 0)
        ]);
        assert!(actions[3..].iter().all(|a| a.skipped_positions() == [Pos::new(2, 3), Pos::new(5, 4), Pos::new(5, 2)]));
    }

    #[test]
    fn test_queen_slides() {
        let board = Board::with_pieces(&[(Pos::new(0, 1), Cell::WhiteQueen)]);
        let actions = legal_actions(Player::White, &board);

        // (1,0) on one ray, (1,2)..(6,7) on the other.
        assert_eq!(actions.len(), 7);
        assert!(actions.iter().all(|a| matches!(a.motion(), Motion::QueenSlide { .. })));
    }

    #[test]
    fn test_queen_long_capture_landings() {
        let board = Board::with_pieces(&[(Pos::new(0, 1), Cell::WhiteQueen), black_man(3, 4)]);
        let actions = legal_actions(Player::White, &board);

        let finals: Vec<Pos> = actions.iter().map(DraughtsAction::final_position).collect();
        assert_eq!(finals, vec![Pos::new(4, 5), Pos::new(5, 6), Pos::new(6, 7)]);
        assert!(actions.iter().all(|a| a.skipped_positions() == [Pos::new(3, 4)]));
    }

    #[test]
    fn test_queen_chain_turns() {
        let board = Board::with_pieces(&[
            (Pos::new(0, 1), Cell::BlackQueen),
            white_man(2, 3),
            white_man(5, 4)
        ]);
        let actions = legal_actions(Player::Black, &board);

        // Take (2,3) landing on (4,5), then turn onto the (1,-1) ray to take (5,4).
        assert!(actions.iter().all(|a| a.priority() == 2));
        let finals: Vec<Pos> = actions.iter().map(DraughtsAction::final_position).collect();
        assert_eq!(finals, vec![Pos::new(6, 3), Pos::new(7, 2)]);
        assert!(actions.iter().all(|a| a.target_positions()[0] == Pos::new(4, 5)));
    }

    #[test]
    fn test_queen_blocked_by_own_piece() {
        let board = Board::with_pieces(&[
            (Pos::new(0, 1), Cell::WhiteQueen),
            white_man(1, 2),
            black_man(3, 4)
        ]);
        let actions = legal_actions(Player::White, &board);

        assert!(actions.iter().all(|a| a.priority() == 0));
    }

    #[test]
    fn test_legality_over_random_positions() {
        use rand::{rngs::StdRng, Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        let mut board = Board::start_position();
        let mut player = Player::Black;

        for _ in 0..200 {
            let actions = legal_actions(player, &board);
            if actions.is_empty() {
                break;
            }

            let max = actions.iter().map(DraughtsAction::priority).max().unwrap_or(0);
            for action in &actions {
                assert_eq!(action.priority(), max);
                assert!(board.get(action.final_position()).is_empty());
                assert_eq!(board.get(action.source_position()).owner(), Some(player));

                let mut after = board;
                action.apply(&mut after);
                assert!(after.get(action.source_position()).is_empty());
                assert_eq!(after.get(action.final_position()).owner(), Some(player));
            }

            let action = &actions[rng.random_range(0..actions.len())];
            action.apply(&mut board);
            player = player.opponent();
        }
    }
}
