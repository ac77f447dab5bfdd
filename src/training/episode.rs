use crate::ai::{Agent, QLearningAgent, RandomAgent};
use crate::error::TrainingError;
use crate::game::{Board, Game, GameOutcome, Move, Player};
use crate::training::metrics::EpisodeResult;

/// One move as it was played: who moved, the board they saw, and the move.
#[derive(Debug, Clone)]
pub struct RecordedMove {
    pub player: Player,
    pub board_before: Board,
    pub mv: Move,
}

/// Chronological record of one game, used for credit assignment.
#[derive(Debug, Clone, Default)]
pub struct GameRecord {
    moves: Vec<RecordedMove>,
}

impl GameRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, player: Player, board_before: Board, mv: Move) {
        self.moves.push(RecordedMove {
            player,
            board_before,
            mv,
        });
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn moves(&self) -> &[RecordedMove] {
        &self.moves
    }
}

/// A finished self-play game.
#[derive(Debug, Clone)]
pub struct SelfPlayGame {
    pub record: GameRecord,
    pub final_board: Board,
    pub outcome: GameOutcome,
}

impl SelfPlayGame {
    pub fn result(&self) -> EpisodeResult {
        EpisodeResult {
            winner: self.outcome.winner(),
            game_length: self.record.len(),
        }
    }
}

/// Play one game between `black` and `white`, Black moving first, until a
/// five-in-a-row, a full board, or `max_turns`.
pub fn play_self_play_game(
    black: &mut dyn Agent,
    white: &mut dyn Agent,
    board_size: usize,
    max_turns: usize,
) -> Result<SelfPlayGame, TrainingError> {
    let mut game = Game::new(board_size, max_turns);
    let mut record = GameRecord::new();

    let outcome = loop {
        if let Some(outcome) = game.outcome() {
            break outcome;
        }
        let player = game.current_player();
        let agent: &mut dyn Agent = match player {
            Player::Black => &mut *black,
            Player::White => &mut *white,
        };
        let mv = agent
            .select_move(game.board())
            .ok_or(TrainingError::NoLegalMoves(player))?;
        record.push(player, game.board().clone(), mv);
        game.play(mv)
            .map_err(|source| TrainingError::InvalidMove { player, source })?;
    };

    Ok(SelfPlayGame {
        record,
        final_board: game.into_board(),
        outcome,
    })
}

/// Credit every recorded move with its color's terminal reward, walking the
/// game backwards. The successor state of a move is the board the same color
/// next moved on, or the final board after that color's last move.
pub fn apply_terminal_credit(
    game: &SelfPlayGame,
    black: &mut QLearningAgent,
    white: &mut QLearningAgent,
) {
    let moves = game.record.moves();
    for (i, step) in moves.iter().enumerate().rev() {
        let successor = moves
            .get(i + 2)
            .map_or(&game.final_board, |next| &next.board_before);
        let reward = game.outcome.reward_for(step.player);
        let agent = match step.player {
            Player::Black => &mut *black,
            Player::White => &mut *white,
        };
        agent.update(&step.board_before, successor, step.mv, reward);
    }
}

/// Play a single evaluation game between two agents.
/// Returns Some(true) if agent won, Some(false) if agent lost, None if draw.
pub fn play_eval_game(
    agent: &mut dyn Agent,
    opponent: &mut dyn Agent,
    agent_color: Player,
    board_size: usize,
    max_turns: usize,
) -> Result<Option<bool>, TrainingError> {
    let game = match agent_color {
        Player::Black => play_self_play_game(agent, opponent, board_size, max_turns)?,
        Player::White => play_self_play_game(opponent, agent, board_size, max_turns)?,
    };
    Ok(game.outcome.winner().map(|winner| winner == agent_color))
}

/// Evaluate a Q-learning agent, greedy and on its own color, against a random
/// opponent. Returns the agent's win rate.
pub fn evaluate(
    agent: &mut QLearningAgent,
    opponent: &mut RandomAgent,
    eval_games: usize,
    board_size: usize,
    max_turns: usize,
) -> Result<f32, TrainingError> {
    if eval_games == 0 {
        return Ok(0.0);
    }

    let color = agent.color();
    let saved_rate = agent.exploration_rate();
    agent.set_exploration_rate(0.0);

    let mut wins = 0;
    let mut result = Ok(());
    for _ in 0..eval_games {
        match play_eval_game(agent, opponent, color, board_size, max_turns) {
            Ok(Some(true)) => wins += 1,
            Ok(_) => {}
            Err(e) => {
                result = Err(e);
                break;
            }
        }
    }

    agent.set_exploration_rate(saved_rate); // restore
    result.map(|()| wins as f32 / eval_games as f32)
}

/// Derive a deterministic seed for a given stream index.
pub fn episode_seed(base_seed: u64, index: usize) -> u64 {
    // FNV-1a-inspired mixing for deterministic, well-distributed seeds
    let mut hash = base_seed ^ 0x517cc1b727220a95;
    let index = index as u64;
    hash = hash.wrapping_mul(0x100000001b3);
    hash ^= index;
    hash = hash.wrapping_mul(0x100000001b3);
    hash ^= index >> 32;
    hash
}
