use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::agent::Agent;
use super::q_table::QTable;
use super::state_encoding::key_of;
use crate::game::{has_five_in_row, Board, Move, Player};

/// Q-learning hyperparameters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// α, in (0, 1]
    pub learning_rate: f64,
    /// γ, in [0, 1]
    pub discount_factor: f64,
    /// ε, in [0, 1]
    pub exploration_rate: f64,
    /// Shaping reward `reward_for` returns on non-terminal boards.
    pub progress_reward: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            learning_rate: 0.1,
            discount_factor: 0.95,
            exploration_rate: 0.1,
            progress_reward: 0.1,
        }
    }
}

/// Tabular Q-learning agent playing one color.
pub struct QLearningAgent {
    color: Player,
    table: QTable,
    config: AgentConfig,
    rng: StdRng,
}

impl QLearningAgent {
    pub fn new(color: Player, table: QTable, config: AgentConfig) -> Self {
        QLearningAgent {
            color,
            table,
            config,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Agent with a deterministic random source.
    pub fn with_seed(color: Player, table: QTable, config: AgentConfig, seed: u64) -> Self {
        QLearningAgent {
            color,
            table,
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Epsilon-greedy move selection with a caller-supplied random source.
    ///
    /// One uniform draw decides between exploring and exploiting. Exploiting
    /// falls back to a uniform random move when the table has nothing for this
    /// position.
    pub fn select_move_with<R: Rng + ?Sized>(&self, board: &Board, rng: &mut R) -> Option<Move> {
        epsilon_greedy(&self.table, self.config.exploration_rate, board, rng)
    }

    /// Apply one Q-learning step:
    /// `Q(s,a) += α · (reward + γ · max_a' Q(s',a') − Q(s,a))`.
    pub fn update(&mut self, old_board: &Board, new_board: &Board, mv: Move, reward: f64) {
        let state = key_of(old_board);
        let next_state = key_of(new_board);

        let current = self.table.value_of(&state, mv);
        let max_future = self.table.max_value(&next_state);
        let target = reward + self.config.discount_factor * max_future;
        let updated = current + self.config.learning_rate * (target - current);
        self.table.set_value(state, mv, updated);
    }

    /// +1 if `own_color` has five in a row, −1 if the opponent does, otherwise
    /// the configured progress reward. Not used by the training loop, which
    /// credits every step with the terminal reward.
    pub fn reward_for(&self, board: &Board, own_color: Player) -> f64 {
        if has_five_in_row(board, own_color) {
            1.0
        } else if has_five_in_row(board, own_color.other()) {
            -1.0
        } else {
            self.config.progress_reward
        }
    }

    pub fn color(&self) -> Player {
        self.color
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn exploration_rate(&self) -> f64 {
        self.config.exploration_rate
    }

    pub fn set_exploration_rate(&mut self, rate: f64) {
        self.config.exploration_rate = rate;
    }
}

impl Agent for QLearningAgent {
    fn select_move(&mut self, board: &Board) -> Option<Move> {
        epsilon_greedy(&self.table, self.config.exploration_rate, board, &mut self.rng)
    }

    fn name(&self) -> &str {
        match self.color {
            Player::Black => "Q-learning (black)",
            Player::White => "Q-learning (white)",
        }
    }

    fn color(&self) -> Option<Player> {
        Some(self.color)
    }
}

fn epsilon_greedy<R: Rng + ?Sized>(
    table: &QTable,
    exploration_rate: f64,
    board: &Board,
    rng: &mut R,
) -> Option<Move> {
    let legal = board.legal_moves();
    if legal.is_empty() {
        return None;
    }

    if rng.random::<f64>() < exploration_rate {
        return Some(legal[rng.random_range(0..legal.len())]);
    }

    let key = key_of(board);
    let mv = table
        .best_move(&key, &legal)
        .unwrap_or_else(|| legal[rng.random_range(0..legal.len())]);
    Some(mv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Cell;

    fn agent_with(exploration_rate: f64) -> QLearningAgent {
        QLearningAgent::with_seed(
            Player::Black,
            QTable::new(),
            AgentConfig {
                exploration_rate,
                ..Default::default()
            },
            42,
        )
    }

    #[test]
    fn test_update_from_zero() {
        let mut agent = agent_with(0.0);
        let old = Board::new(5);
        let mut new = old.clone();
        new.apply(Move::new(2, 2), Player::Black).unwrap();

        agent.update(&old, &new, Move::new(2, 2), 1.0);
        let value = agent.table().value_of(&key_of(&old), Move::new(2, 2));
        assert_eq!(value, 0.1);
    }

    #[test]
    fn test_update_uses_future_value() {
        let mut agent = agent_with(0.0);
        let old = Board::new(5);
        let mut new = old.clone();
        new.apply(Move::new(0, 0), Player::Black).unwrap();

        agent.update(&new, &new, Move::new(1, 1), 1.0); // Q(s', (1,1)) = 0.1
        agent.update(&old, &new, Move::new(0, 0), 0.0);

        let value = agent.table().value_of(&key_of(&old), Move::new(0, 0));
        // 0 + 0.1 * (0 + 0.95 * 0.1 - 0)
        assert!((value - 0.0095).abs() < 1e-12);
    }

    #[test]
    fn test_repeated_updates_accumulate() {
        let mut agent = agent_with(0.0);
        let old = Board::new(5);
        let new = Board::new(3);
        agent.update(&old, &new, Move::new(4, 4), 1.0);
        agent.update(&old, &new, Move::new(4, 4), 1.0);
        let value = agent.table().value_of(&key_of(&old), Move::new(4, 4));
        // 0.1 + 0.1 * (1 - 0.1)
        assert!((value - 0.19).abs() < 1e-12);
    }

    #[test]
    fn test_negative_reward_update() {
        let mut agent = agent_with(0.0);
        let board = Board::new(5);
        agent.update(&board, &Board::new(3), Move::new(0, 0), -1.0);
        assert_eq!(agent.table().value_of(&key_of(&board), Move::new(0, 0)), -0.1);
    }

    #[test]
    fn test_exploit_picks_best_known_move() {
        let mut agent = agent_with(0.0);
        let board = Board::new(5);
        let key = key_of(&board);
        agent.table.set_value(key.clone(), Move::new(3, 1), 0.8);
        agent.table.set_value(key, Move::new(0, 0), 0.2);

        for _ in 0..20 {
            assert_eq!(agent.select_move(&board), Some(Move::new(3, 1)));
        }
    }

    #[test]
    fn test_exploit_unseen_state_falls_back_to_legal_random() {
        let mut agent = agent_with(0.0);
        let mut board = Board::new(5);
        board.apply(Move::new(0, 0), Player::White).unwrap();
        for _ in 0..50 {
            let mv = agent.select_move(&board).unwrap();
            assert_eq!(board.get(mv.row, mv.col), Cell::Empty);
        }
    }

    #[test]
    fn test_full_exploration_never_consults_table() {
        let mut agent = agent_with(1.0);
        let mut board = Board::new(5);
        board.apply(Move::new(1, 1), Player::Black).unwrap();
        board.apply(Move::new(3, 3), Player::White).unwrap();
        agent.table.set_value(key_of(&board), Move::new(0, 0), 100.0);

        let legal = board.legal_moves();
        let mut rng = StdRng::seed_from_u64(2024);
        let mut expected_rng = StdRng::seed_from_u64(2024);
        for _ in 0..200 {
            let mv = agent.select_move_with(&board, &mut rng).unwrap();
            let _explore_draw: f64 = expected_rng.random();
            let expected = legal[expected_rng.random_range(0..legal.len())];
            assert_eq!(mv, expected);
        }
    }

    #[test]
    fn test_seeded_agents_are_reproducible() {
        let board = Board::new(15);
        let mut a = agent_with(0.5);
        let mut b = agent_with(0.5);
        for _ in 0..20 {
            assert_eq!(a.select_move(&board), b.select_move(&board));
        }
    }

    #[test]
    fn test_no_move_on_full_board() {
        let mut agent = agent_with(0.1);
        let mut board = Board::new(2);
        for mv in board.legal_moves() {
            board.apply(mv, Player::Black).unwrap();
        }
        assert_eq!(agent.select_move(&board), None);
    }

    #[test]
    fn test_reward_for() {
        let agent = agent_with(0.1);
        let mut board = Board::new(5);
        assert_eq!(agent.reward_for(&board, Player::Black), 0.1);

        for col in 0..5 {
            board.apply(Move::new(4, col), Player::White).unwrap();
        }
        assert_eq!(agent.reward_for(&board, Player::White), 1.0);
        assert_eq!(agent.reward_for(&board, Player::Black), -1.0);
    }
}
