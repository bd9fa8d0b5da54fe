//! Test utilities for the search framework
//!
//! `PickState` is a tiny two-player game: players alternately pick one of the
//! numbers 0..4 that has not been picked yet. After four picks the first
//! player wins if the sum of their picks is larger than the second player's.

use std::cell::OnceCell;

use crate::{GameAction, GameSimulator, GameState, SearchError, Trajectory};

/// Number of values to pick from.
pub const PICK_COUNT: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickAction{
    id: usize,
    pub value: usize
}

impl GameAction for PickAction{
    fn id(&self) -> usize{
        self.id
    }
}

/// A simple test game state
#[derive(Clone, Debug)]
pub struct PickState{
    picks: Vec<usize>,
    detached: bool,
    actions: OnceCell<Vec<PickAction>>
}

impl PickState{
    pub fn new() -> Self{
        Self::from_picks(&[])
    }

    pub fn from_picks(picks: &[usize]) -> Self{
        PickState { picks: picks.to_vec(), detached: false, actions: OnceCell::new() }
    }

    /// A state that refuses to produce a snapshot.
    pub fn detached(picks: &[usize]) -> Self{
        PickState { detached: true, ..Self::from_picks(picks) }
    }

    pub fn picks(&self) -> &[usize]{
        &self.picks
    }

    /// `(first player sum) - (second player sum)`, once the game is over.
    pub fn margin(&self) -> Option<i64>{
        if self.picks.len() != PICK_COUNT {
            return None;
        }

        Some(self.picks.iter().enumerate().map(|(turn, &value)|{
            if turn % 2 == 0 { value as i64 } else { -(value as i64) }
        }).sum())
    }
}

impl Default for PickState{
    fn default() -> Self{
        Self::new()
    }
}

impl GameState for PickState{
    type Action = PickAction;
    type Snapshot = Vec<usize>;

    fn legal_actions(&self) -> &[PickAction]{
        self.actions.get_or_init(||{
            (0..PICK_COUNT)
                .filter(|value| !self.picks.contains(value))
                .enumerate()
                .map(|(id, value)| PickAction { id, value })
                .collect()
        })
    }

    fn snapshot(&self) -> Option<Vec<usize>>{
        if self.detached { None } else { Some(self.picks.clone()) }
    }
}

/// A simple test simulator implementation
#[derive(Clone, Debug, Default)]
pub struct PickSimulator{
    picks: Vec<usize>,
    pub steps: usize
}

impl GameSimulator for PickSimulator{
    type State = PickState;

    fn step(&mut self, action: &PickAction) -> PickState{
        self.picks.push(action.value);
        self.steps += 1;
        PickState::from_picks(&self.picks)
    }

    fn snapshot(&self) -> Vec<usize>{
        self.picks.clone()
    }

    fn restore(&mut self, snapshot: &Vec<usize>){
        self.picks = snapshot.clone();
    }
}

/// Reward of the first player: 1 for a win, 0.5 for a draw, 0 for a loss.
pub fn first_player_reward(trajectory: &Trajectory<PickState>) -> Result<f64, SearchError>{
    let margin = trajectory.last()
        .and_then(|(state, _)| state.margin())
        .ok_or(SearchError::NonTerminalTrajectory)?;

    Ok(match margin {
        m if m > 0 => 1.0,
        0 => 0.5,
        _ => 0.0
    })
}
