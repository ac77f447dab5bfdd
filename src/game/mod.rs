//! Core Gomoku game logic: board representation, players, win detection, and
//! the per-game state machine.

mod board;
mod player;
mod state;
mod win;

pub use board::{Board, Cell, Move, MoveError, DEFAULT_SIZE};
pub use player::Player;
pub use state::{Game, GameOutcome};
pub use win::{has_five_in_row, WIN_LENGTH};
