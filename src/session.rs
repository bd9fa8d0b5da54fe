//! A human-versus-agent draughts game.
//!
//! [`GameSession`] ties the live simulator to a [`UctSearch`] running on its
//! own simulator. The agent never steps the live game while searching: it
//! copies the live position into a fresh root, searches, then plays the
//! chosen action on the live simulator.

use thiserror::Error;
use tracing::debug;

use crate::{
    win_reward, DraughtsAction, DraughtsSimulator, DraughtsState, GameAction, GameSimulator, GameState, Node,
    Player, SearchError, UctConfig, UctSearch
};

/// Represents possible errors that can occur when playing a session move.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError{
    #[error("action is not legal in the current position")]
    IllegalAction,
    #[error("the game is already over")]
    GameOver,
    #[error(transparent)]
    Search(#[from] SearchError)
}

/// State of the game after a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome{
    InProgress,
    Won(Player)
}

/// Configuration of a `GameSession`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionConfig{
    /// Side played by the search.
    pub agent: Player,
    /// Search iterations per agent move.
    pub iterations: usize,
    pub uct: UctConfig
}

impl SessionConfig{
    /// The default configuration: the agent plays white with 2000 iterations
    /// per move and `UctConfig::DEFAULT`.
    pub const DEFAULT: SessionConfig = SessionConfig{
        agent: Player::White,
        iterations: 2000,
        uct: UctConfig::DEFAULT
    };

    /// Returns the configuration with the search playing `agent`.
    pub fn with_agent(mut self, agent: Player) -> Self{
        self.agent = agent;
        self
    }

    /// Returns the configuration with another iteration budget per agent move.
    pub fn with_iterations(mut self, iterations: usize) -> Self{
        self.iterations = iterations;
        self
    }

    pub fn with_uct(mut self, uct: UctConfig) -> Self{
        self.uct = uct;
        self
    }
}

impl Default for SessionConfig{
    fn default() -> Self{
        Self::DEFAULT
    }
}

/// A live game between a human and the UCT agent.
#[derive(Debug)]
pub struct GameSession{
    config: SessionConfig,
    live: DraughtsSimulator,
    state: DraughtsState,
    search: UctSearch<DraughtsSimulator>
}

impl GameSession{
    /// Starts a game on the start position, black to move.
    pub fn new(config: SessionConfig) -> Self{
        let search = UctSearch::from_config(DraughtsSimulator::new(), win_reward(config.agent), &config.uct);
        let live = DraughtsSimulator::new();
        let state = live.state();

        GameSession { config, live, state, search }
    }

    /// Configuration the session was created with.
    #[inline]
    pub fn config(&self) -> &SessionConfig{
        &self.config
    }

    /// Puts the live game back on the start position.
    pub fn reset(&mut self){
        self.live.reset();
        self.state = self.live.state();
    }

    /// The current live position.
    #[inline]
    pub fn state(&self) -> &DraughtsState{
        &self.state
    }

    /// Whether the live game is still running, and its winner once over.
    pub fn outcome(&self) -> Outcome{
        match self.state.winner() {
            Some(winner) => Outcome::Won(winner),
            None => Outcome::InProgress
        }
    }

    /// Plays a human move on the live game.
    ///
    /// `action` is matched against the current legal actions by id, and must
    /// also equal the listed action.
    ///
    /// # Returns
    /// The outcome after the move, or
    /// - `SessionError::GameOver` if the game is already finished,
    /// - `SessionError::IllegalAction` if `action` is not legal here.
    pub fn play(&mut self, action: &DraughtsAction) -> Result<Outcome, SessionError>{
        if self.state.is_terminal() {
            return Err(SessionError::GameOver);
        }

        let legal = self.state.legal_actions().get(action.id())
            .is_some_and(|listed| listed == action);
        if !legal {
            return Err(SessionError::IllegalAction);
        }

        Ok(self.apply(action))
    }

    /// Lets the agent search the live position and play its choice.
    ///
    /// # Returns
    /// The action played and the outcome after it, `SessionError::GameOver`
    /// if the game is already finished, or the search's error.
    pub fn play_agent(&mut self) -> Result<(DraughtsAction, Outcome), SessionError>{
        if self.state.is_terminal() {
            return Err(SessionError::GameOver);
        }

        let root = DraughtsState::from_snapshot(&self.live.snapshot());
        self.search.set_root(Node::new_root(root))?;
        let action = self.search.search(self.config.iterations)?;

        let outcome = self.apply(&action);
        Ok((action, outcome))
    }

    fn apply(&mut self, action: &DraughtsAction) -> Outcome{
        self.state = self.live.step(action);
        let outcome = self.outcome();

        debug!(
            player = ?action.player(),
            from = ?action.source_position(),
            to = ?action.final_position(),
            captures = action.priority(),
            outcome = ?outcome,
            "move played"
        );

        outcome
    }
}
