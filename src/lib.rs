//! A draughts (checkers) rules engine paired with a policy-driven
//! Upper Confidence bounds applied to Trees (UCT) search.
//!
//! The rules engine generates every legal move of a position, including
//! multi-step capture chains, forced maximum capture and promotion. The
//! search framework is generic over three small traits and never names
//! draughts types; draughts is one implementation of them.
//!
//! # Modules
//! - `board`: Board, cells, positions and players.
//! - `action`: The draughts move type and its board mutations.
//! - `rules`: Legal-action generation.
//! - `state`: Immutable draughts positions with cached legal actions.
//! - `simulator`: The mutable game that applies actions.
//! - `game`: Traits the search is generic over.
//! - `tree`: Arena-based search tree and the UCB1 score.
//! - `policy`: Pluggable expand, tree, simulation, backup and final-choice policies.
//! - `mcts`: The UCT search orchestrator.
//! - `reward`: Reward functions for draughts rollouts.
//! - `session`: A human-versus-agent game.
//! - `test_utils`: A toy game for testing the search framework.
//!
//! # Examples
//! ```rust
//! use draughts_uct::{win_reward, DraughtsSimulator, DraughtsState, GameSimulator, Node, Player,
//!                    SearchError, UctConfig, UctSearch};
//!
//! fn main() -> Result<(), SearchError> {
//!     let mut live = DraughtsSimulator::new();
//!
//!     // The search replays moves on its own simulator.
//!     let config = UctConfig::DEFAULT.with_seed(7);
//!     let mut search = UctSearch::from_config(DraughtsSimulator::new(), win_reward(Player::Black), &config);
//!
//!     search.set_root(Node::new_root(DraughtsState::from_snapshot(&live.snapshot())))?;
//!     let action = search.search(100)?;
//!
//!     let state = live.step(&action);
//!     assert_eq!(state.player(), Player::White);
//!     Ok(())
//! }
//! ```

mod board;
mod action;
pub mod rules;
mod state;
mod simulator;
mod game;
mod tree;
mod policy;
mod mcts;
mod reward;
mod session;

#[doc(hidden)]
pub mod test_utils;

pub use board::*;
pub use action::*;
pub use state::*;
pub use simulator::*;
pub use game::*;
pub use tree::*;
pub use policy::*;
pub use mcts::*;
pub use reward::*;
pub use session::*;
