use std::fmt;

use crate::game::Board;

/// Lossless fingerprint of a board position, used to index the Q-table.
///
/// One character per cell (`.`, `B`, `W`) in row-major order with rows
/// separated by `/`, so boards of different sizes never share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(String);

impl StateKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap an already-encoded key, as read back from a persisted table.
    pub fn from_encoded(encoded: String) -> Self {
        StateKey(encoded)
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encode a board as a state key. Pure function of cell contents and positions.
pub fn key_of(board: &Board) -> StateKey {
    let size = board.size();
    let mut key = String::with_capacity(size * (size + 1));
    for (i, row) in board.rows().enumerate() {
        if i > 0 {
            key.push('/');
        }
        key.extend(row.iter().map(|cell| cell.symbol()));
    }
    StateKey(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Move, Player};

    #[test]
    fn test_empty_board_key() {
        let board = Board::new(3);
        assert_eq!(key_of(&board).as_str(), ".../.../...");
    }

    #[test]
    fn test_key_layout() {
        let mut board = Board::new(3);
        board.apply(Move::new(0, 2), Player::Black).unwrap();
        board.apply(Move::new(2, 0), Player::White).unwrap();
        assert_eq!(key_of(&board).as_str(), "..B/.../W..");
    }

    #[test]
    fn test_identical_boards_share_key() {
        // Same position reached in a different move order
        let mut a = Board::new(15);
        a.apply(Move::new(7, 7), Player::Black).unwrap();
        a.apply(Move::new(3, 9), Player::White).unwrap();
        a.apply(Move::new(0, 14), Player::Black).unwrap();

        let mut b = Board::new(15);
        b.apply(Move::new(0, 14), Player::Black).unwrap();
        b.apply(Move::new(3, 9), Player::White).unwrap();
        b.apply(Move::new(7, 7), Player::Black).unwrap();

        assert_eq!(key_of(&a), key_of(&b));
        assert_eq!(key_of(&a), key_of(&a.clone()));
    }

    #[test]
    fn test_single_cell_difference_changes_key() {
        let base = Board::new(5);
        let base_key = key_of(&base);
        for mv in base.legal_moves() {
            for player in [Player::Black, Player::White] {
                let mut other = base.clone();
                other.apply(mv, player).unwrap();
                assert_ne!(key_of(&other), base_key, "{mv} as {player}");
            }
        }

        let mut black = Board::new(5);
        black.apply(Move::new(2, 2), Player::Black).unwrap();
        let mut white = Board::new(5);
        white.apply(Move::new(2, 2), Player::White).unwrap();
        assert_ne!(key_of(&black), key_of(&white));
    }

    #[test]
    fn test_different_sizes_never_collide() {
        // 2x2 and 1x4 style layouts would collide without row separators
        assert_ne!(key_of(&Board::new(2)), key_of(&Board::new(3)));
        assert_eq!(key_of(&Board::new(2)).as_str(), "../..");
    }
}
