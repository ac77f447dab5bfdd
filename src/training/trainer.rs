use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::ai::{AgentConfig, QLearningAgent, QTable, RandomAgent};
use crate::error::TrainingError;
use crate::game::{Board, GameOutcome, Player, DEFAULT_SIZE};
use crate::storage::{write_audit_record, AuditRecord, StorageConfig, TableMetadata, TableStore};
use crate::training::episode::{
    apply_terminal_credit, episode_seed, evaluate, play_self_play_game, SelfPlayGame,
};
use crate::training::metrics::TrainingMetrics;

/// Trainer configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub games_to_play: usize,
    pub board_size: usize,
    /// Turn cap per game, clamped to the number of cells.
    pub max_turns: usize,
    pub log_interval: usize,
    /// Evaluate against a random opponent every N games; 0 disables.
    pub eval_interval: usize,
    pub eval_games: usize,
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            games_to_play: 100,
            board_size: DEFAULT_SIZE,
            max_turns: DEFAULT_SIZE * DEFAULT_SIZE,
            log_interval: 10,
            eval_interval: 0,
            eval_games: 20,
            seed: None,
        }
    }
}

impl TrainerConfig {
    /// Change the board size. A turn cap that covered the whole old board
    /// keeps covering the whole new one; a tighter cap is kept, clamped to the
    /// new cell count.
    pub fn set_board_size(&mut self, size: usize) {
        let old_cells = self.board_size * self.board_size;
        let new_cells = size * size;
        self.max_turns = if self.max_turns >= old_cells {
            new_cells
        } else {
            self.max_turns.min(new_cells)
        };
        self.board_size = size;
    }
}

/// Progress of one training run. Owned by the caller, never global.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingRun {
    pub games_to_play: usize,
    pub games_played: usize,
    /// Sum of terminal rewards from Black's side: +1 Black win, −1 White win.
    pub total_score: i64,
    pub last_outcome: Option<GameOutcome>,
}

impl TrainingRun {
    pub fn new(games_to_play: usize) -> Self {
        TrainingRun {
            games_to_play,
            ..Default::default()
        }
    }

    pub fn record_game(&mut self, outcome: GameOutcome) {
        self.games_played += 1;
        self.total_score += outcome.reward_for(Player::Black) as i64;
        self.last_outcome = Some(outcome);
    }

    pub fn percent_complete(&self) -> f64 {
        if self.games_to_play == 0 {
            return 100.0;
        }
        (self.games_played as f64 / self.games_to_play as f64 * 100.0).min(100.0)
    }

    pub fn is_complete(&self) -> bool {
        self.games_played >= self.games_to_play
    }
}

/// Everything a finished run produced.
pub struct TrainingReport {
    pub run: TrainingRun,
    pub black: QLearningAgent,
    pub white: QLearningAgent,
    pub table_paths: Vec<PathBuf>,
    pub audit_path: PathBuf,
}

/// Self-play trainer for a pair of Q-learning agents.
pub struct Trainer {
    config: TrainerConfig,
    agent_config: AgentConfig,
    store: TableStore,
    output_dir: PathBuf,
    verbose: bool,
}

impl Trainer {
    pub fn new(config: TrainerConfig, agent_config: AgentConfig, storage: StorageConfig) -> Self {
        let output_dir = storage.output_dir.clone();
        Trainer {
            config,
            agent_config,
            store: TableStore::new(storage),
            output_dir,
            verbose: true,
        }
    }

    /// Silence progress output.
    pub fn quiet(mut self) -> Self {
        self.verbose = false;
        self
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn store(&self) -> &TableStore {
        &self.store
    }

    /// Build both agents from their persisted tables, or from empty tables when
    /// none exist yet. A corrupt table fails the whole load.
    pub fn load_agents(&self) -> Result<(QLearningAgent, QLearningAgent), TrainingError> {
        let black = self.load_agent(Player::Black, 0)?;
        let white = self.load_agent(Player::White, 1)?;
        Ok((black, white))
    }

    fn load_agent(&self, color: Player, stream: usize) -> Result<QLearningAgent, TrainingError> {
        let table = match self.store.load_optional(color)? {
            Some(table) => {
                self.log(format_args!(
                    "Loaded {} table from {} ({} states)",
                    color,
                    self.store.table_path(color).display(),
                    table.len()
                ));
                table
            }
            None => {
                self.log(format_args!(
                    "No {} table at {}, starting from scratch",
                    color,
                    self.store.table_path(color).display()
                ));
                QTable::new()
            }
        };
        let config = self.agent_config.clone();
        Ok(match self.config.seed {
            Some(seed) => QLearningAgent::with_seed(color, table, config, episode_seed(seed, stream)),
            None => QLearningAgent::new(color, table, config),
        })
    }

    /// Play `games_to_play` self-play games, crediting both agents after each
    /// game. Returns the last game played.
    pub fn train(
        &self,
        black: &mut QLearningAgent,
        white: &mut QLearningAgent,
        run: &mut TrainingRun,
    ) -> Result<Option<SelfPlayGame>, TrainingError> {
        let mut metrics = TrainingMetrics::new();
        let mut eval_opponent = match self.config.seed {
            Some(seed) => RandomAgent::with_seed(episode_seed(seed, 2)),
            None => RandomAgent::new(),
        };
        let mut last_game = None;

        self.log(format_args!(
            "Starting self-play training for {} games on a {}x{} board...",
            run.games_to_play, self.config.board_size, self.config.board_size
        ));
        self.log(format_args!("-------------------------------------------"));

        while !run.is_complete() {
            let game = play_self_play_game(
                black,
                white,
                self.config.board_size,
                self.config.max_turns,
            )?;
            apply_terminal_credit(&game, black, white);
            run.record_game(game.outcome);
            metrics.record_episode(game.result());

            let played = run.games_played;
            let window = self.config.log_interval.max(1);
            if played % window == 0 || run.is_complete() {
                self.log(format_args!(
                    "Game {}/{} | last: {} | black: {:.1}% | white: {:.1}% | draw: {:.1}% | avg_len: {:.1} | score: {} | states: {}/{}",
                    played,
                    run.games_to_play,
                    game.outcome.label(),
                    metrics.win_rate(Player::Black, window) * 100.0,
                    metrics.win_rate(Player::White, window) * 100.0,
                    metrics.draw_rate(window) * 100.0,
                    metrics.average_game_length(window),
                    run.total_score,
                    black.table().len(),
                    white.table().len(),
                ));
            }

            if self.config.eval_interval > 0 && played % self.config.eval_interval == 0 {
                let win_rate = evaluate(
                    black,
                    &mut eval_opponent,
                    self.config.eval_games,
                    self.config.board_size,
                    self.config.max_turns,
                )?;
                self.log(format_args!(
                    "  >> Eval black vs Random ({} games): {:.1}% win rate",
                    self.config.eval_games,
                    win_rate * 100.0
                ));
            }

            last_game = Some(game);
        }

        self.log(format_args!("-------------------------------------------"));
        self.log(format_args!(
            "Training complete. Games: {} | total score: {}",
            metrics.total_episodes(),
            run.total_score
        ));
        Ok(last_game)
    }

    /// Persist both tables with their metadata sidecars.
    pub fn save_agents(
        &self,
        agents: [&QLearningAgent; 2],
        run: &TrainingRun,
    ) -> Result<Vec<PathBuf>, TrainingError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let mut paths = Vec::with_capacity(agents.len());
        for agent in agents {
            let metadata = TableMetadata {
                color: agent.color(),
                timestamp,
                games_played: run.games_played,
                total_score: run.total_score,
                board_size: self.config.board_size,
                states: agent.table().len(),
                entries: agent.table().entry_count(),
                hyperparameters: agent.config().clone(),
            };
            let path = self.store.save(agent.color(), agent.table(), &metadata)?;
            self.log(format_args!("  >> Saved {} table: {}", agent.color(), path.display()));
            paths.push(path);
        }
        Ok(paths)
    }

    /// Full run: load both tables, train, persist both tables, and write the
    /// audit record of the final game.
    pub fn run(&self) -> Result<TrainingReport, TrainingError> {
        let mut run = TrainingRun::new(self.config.games_to_play);
        self.run_with(&mut run)
    }

    /// Like `run`, reporting progress into a caller-owned `TrainingRun`.
    pub fn run_with(&self, run: &mut TrainingRun) -> Result<TrainingReport, TrainingError> {
        let (mut black, mut white) = self.load_agents()?;
        let last_game = self.train(&mut black, &mut white, run)?;
        let table_paths = self.save_agents([&black, &white], run)?;

        let (final_board, outcome) = match last_game {
            Some(game) => (game.final_board, game.outcome),
            None => (Board::new(self.config.board_size), GameOutcome::Draw),
        };
        let record = AuditRecord {
            board: &final_board,
            outcome,
            games_played: run.games_played,
            total_score: run.total_score,
        };
        let audit_path =
            write_audit_record(&self.output_dir, &record).map_err(TrainingError::Audit)?;
        self.log(format_args!("  >> Game saved to {}", audit_path.display()));

        Ok(TrainingReport {
            run: run.clone(),
            black,
            white,
            table_paths,
            audit_path,
        })
    }

    fn log(&self, args: std::fmt::Arguments<'_>) {
        if self.verbose {
            println!("{args}");
        }
    }
}
