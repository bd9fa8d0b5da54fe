//! Reward functions for draughts rollouts.

use crate::{DraughtsState, Player, RewardFunction, SearchError, Trajectory};

/// Scores a finished rollout from `player`'s point of view: 1 if `player`
/// won the final state, 0 otherwise.
///
/// The returned function fails with `SearchError::NonTerminalTrajectory` if
/// the trajectory is empty or its last state is not terminal.
pub fn win_reward(player: Player) -> RewardFunction<DraughtsState>{
    Box::new(move |trajectory: &Trajectory<DraughtsState>| -> Result<f64, SearchError>{
        let winner = trajectory.last()
            .and_then(|(state, _)| state.winner())
            .ok_or(SearchError::NonTerminalTrajectory)?;

        Ok(if winner == player { 1.0 } else { 0.0 })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Board, Cell, DraughtsAction, GameState, Pos};

    fn finished(player_to_move: Player) -> Vec<(DraughtsState, Option<DraughtsAction>)>{
        let board = Board::with_pieces(&[(Pos::new(4, 3), Cell::WhiteMan)]);
        vec![(DraughtsState::new(player_to_move, &board), None)]
    }

    #[test]
    fn test_win_reward() -> Result<(), SearchError> {
        // Black to move with no piece left: white has won.
        let trajectory = finished(Player::Black);
        assert!(trajectory[0].0.is_terminal());

        assert_eq!(win_reward(Player::White)(trajectory.as_slice())?, 1.0);
        assert_eq!(win_reward(Player::Black)(trajectory.as_slice())?, 0.0);
        Ok(())
    }

    #[test]
    fn test_win_reward_rejects_unfinished_game() {
        let start: Vec<(DraughtsState, Option<DraughtsAction>)> = vec![(DraughtsState::start(), None)];
        let reward = win_reward(Player::White);

        assert_eq!(reward(start.as_slice()), Err(SearchError::NonTerminalTrajectory));
        assert_eq!(reward(Vec::new().as_slice()), Err(SearchError::NonTerminalTrajectory));
    }
}
