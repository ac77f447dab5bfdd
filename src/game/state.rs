use super::{has_five_in_row, Board, Move, MoveError, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

impl GameOutcome {
    pub fn winner(self) -> Option<Player> {
        match self {
            GameOutcome::Winner(p) => Some(p),
            GameOutcome::Draw => None,
        }
    }

    /// Terminal reward for `player`: +1 win, -1 loss, 0 draw.
    pub fn reward_for(self, player: Player) -> f64 {
        match self {
            GameOutcome::Winner(winner) if winner == player => 1.0,
            GameOutcome::Winner(_) => -1.0,
            GameOutcome::Draw => 0.0,
        }
    }

    /// Audit label: the winner's color or "draw".
    pub fn label(self) -> &'static str {
        match self {
            GameOutcome::Winner(p) => p.name(),
            GameOutcome::Draw => "draw",
        }
    }
}

/// One game in progress: board, side to move, and the outcome once decided.
/// Black always moves first.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    board: Board,
    current_player: Player,
    outcome: Option<GameOutcome>,
    turns: usize,
    max_turns: usize,
}

impl Game {
    /// New game on an empty board. `max_turns` is clamped to the cell count.
    pub fn new(size: usize, max_turns: usize) -> Self {
        Game {
            board: Board::new(size),
            current_player: Player::Black,
            outcome: None,
            turns: 0,
            max_turns: max_turns.min(size * size),
        }
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Play a move for the current player. A win for the mover ends the game;
    /// a full board or the turn limit ends it as a draw.
    pub fn play(&mut self, mv: Move) -> Result<(), MoveError> {
        debug_assert!(!self.is_terminal(), "move played after game end");
        let mover = self.current_player;
        self.board.apply(mv, mover)?;
        self.turns += 1;

        if has_five_in_row(&self.board, mover) {
            self.outcome = Some(GameOutcome::Winner(mover));
        } else if self.board.is_full() || self.turns >= self.max_turns {
            self.outcome = Some(GameOutcome::Draw);
        }

        self.current_player = mover.other();
        Ok(())
    }
}
