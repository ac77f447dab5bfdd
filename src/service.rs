//! In-process facade over training and inference.
//!
//! A [`GomokuService`] owns the configuration and the result of the most
//! recent training run. Training runs and table reads go through one mutex, so
//! two runs through the same service never interleave their load, train and
//! store phases.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::ai::QLearningAgent;
use crate::config::AppConfig;
use crate::error::{BoardInputError, ServiceError, TableError};
use crate::game::{Board, Move, Player};
use crate::storage::TableStore;
use crate::training::{Trainer, TrainingRun};

/// Result of a training trigger, serialized as the response body.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TrainingSummary {
    pub percent_complete: f64,
    pub games_played: usize,
    /// Reserved; no run selects a best model.
    pub best_model: Option<String>,
}

impl From<&TrainingRun> for TrainingSummary {
    fn from(run: &TrainingRun) -> Self {
        TrainingSummary {
            percent_complete: run.percent_complete(),
            games_played: run.games_played,
            best_model: None,
        }
    }
}

#[derive(Default)]
struct ServiceState {
    last_run: Option<TrainingRun>,
    agents: Option<(QLearningAgent, QLearningAgent)>,
}

pub struct GomokuService {
    config: AppConfig,
    state: Mutex<ServiceState>,
    verbose: bool,
}

impl GomokuService {
    pub fn new(config: AppConfig) -> Self {
        GomokuService {
            config,
            state: Mutex::new(ServiceState::default()),
            verbose: true,
        }
    }

    /// Silence training progress output.
    pub fn quiet(mut self) -> Self {
        self.verbose = false;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Progress of the most recent in-process run, if any.
    pub fn last_run(&self) -> Option<TrainingRun> {
        self.lock().last_run.clone()
    }

    /// Run one full training session: load both tables, play the configured
    /// number of games, and persist both tables. Agents from an earlier run are
    /// dropped first, so a failed run leaves live play refused.
    pub fn trigger_training(&self) -> Result<TrainingSummary, ServiceError> {
        let mut state = self.lock();

        let mut trainer = Trainer::new(
            self.config.training.clone(),
            self.config.agent.clone(),
            self.config.storage.clone(),
        );
        if !self.verbose {
            trainer = trainer.quiet();
        }

        state.agents = None;
        let mut run = TrainingRun::new(self.config.training.games_to_play);
        let result = trainer.run_with(&mut run);
        state.last_run = Some(run);
        let report = result?;

        let summary = TrainingSummary::from(&report.run);
        state.agents = Some((report.black, report.white));
        Ok(summary)
    }

    /// Move for `color` from its persisted table, played greedily on `grid`.
    pub fn trained_move(
        &self,
        color: Player,
        grid: Option<&[Vec<Option<Player>>]>,
    ) -> Result<Move, ServiceError> {
        let table = {
            let _state = self.lock();
            TableStore::new(self.config.storage.clone())
                .load(color)
                .map_err(|e| match e {
                    TableError::Missing(_) => ServiceError::TableNotFound { color },
                    e => ServiceError::Table(e),
                })?
        };
        let board = self.parse_board(grid)?;

        let mut agent = QLearningAgent::new(color, table, self.config.agent.clone());
        greedy_move(&mut agent, &board)
    }

    /// Move for `color` from the tables of the last in-process run. Refused
    /// until a run has reached 100%.
    pub fn live_move(
        &self,
        color: Player,
        grid: Option<&[Vec<Option<Player>>]>,
    ) -> Result<Move, ServiceError> {
        let mut state = self.lock();
        let percent_complete = state
            .last_run
            .as_ref()
            .map_or(0.0, TrainingRun::percent_complete);
        let agents = match state.agents.as_mut() {
            Some(agents) if percent_complete >= 100.0 => agents,
            _ => return Err(ServiceError::TrainingNotComplete { percent_complete }),
        };
        let board = self.parse_board(grid)?;

        let agent = match color {
            Player::Black => &mut agents.0,
            Player::White => &mut agents.1,
        };
        greedy_move(agent, &board)
    }

    fn parse_board(&self, grid: Option<&[Vec<Option<Player>>]>) -> Result<Board, BoardInputError> {
        let grid = grid.ok_or(BoardInputError::Missing)?;
        Board::from_grid(grid, self.config.training.board_size)
    }

    fn lock(&self) -> MutexGuard<'_, ServiceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Parse a JSON grid of `null`, `"black"` and `"white"` cells.
pub fn parse_grid(json: &str) -> Result<Vec<Vec<Option<Player>>>, BoardInputError> {
    serde_json::from_str(json).map_err(|e| BoardInputError::Parse(e.to_string()))
}

fn greedy_move(agent: &mut QLearningAgent, board: &Board) -> Result<Move, ServiceError> {
    use crate::ai::Agent;

    let saved_rate = agent.exploration_rate();
    agent.set_exploration_rate(0.0);
    let mv = agent.select_move(board);
    agent.set_exploration_rate(saved_rate);
    mv.ok_or(ServiceError::NoLegalMoves)
}
