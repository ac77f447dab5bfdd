use crate::game::{Board, Move, Player};

/// Universal interface for move-selecting agents.
pub trait Agent {
    /// Select a move on `board`. `None` only when the board has no empty cell.
    fn select_move(&mut self, board: &Board) -> Option<Move>;

    /// Return the agent's display name.
    fn name(&self) -> &str;

    /// Color this agent plays, if it is bound to one.
    fn color(&self) -> Option<Player> {
        None
    }
}
