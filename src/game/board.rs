use std::fmt;

use crate::error::BoardInputError;

use super::Player;

pub const DEFAULT_SIZE: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Black,
    White,
}

impl Cell {
    /// Single-character rendering shared by the state key and audit output.
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Black => 'B',
            Cell::White => 'W',
        }
    }

    pub fn from_player(player: Option<Player>) -> Cell {
        player.map_or(Cell::Empty, Player::to_cell)
    }
}

/// A board coordinate, 0-indexed from the top-left corner.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub fn new(row: usize, col: usize) -> Self {
        Move { row, col }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("move {mv} is outside the {size}x{size} board")]
    OutOfBounds { mv: Move, size: usize },

    #[error("cell {0} is already occupied")]
    Occupied(Move),
}

/// Square grid of cells stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(size: usize) -> Self {
        Board {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Build a board from nested rows of `None` / player values, as supplied by
    /// an external caller. The grid must be exactly `size` rows of `size` cells.
    pub fn from_grid(grid: &[Vec<Option<Player>>], size: usize) -> Result<Self, BoardInputError> {
        if grid.len() != size {
            return Err(BoardInputError::WrongRowCount {
                expected: size,
                found: grid.len(),
            });
        }
        let mut board = Board::new(size);
        for (row, cells) in grid.iter().enumerate() {
            if cells.len() != size {
                return Err(BoardInputError::WrongRowLength {
                    row,
                    expected: size,
                    found: cells.len(),
                });
            }
            for (col, &cell) in cells.iter().enumerate() {
                board.cells[row * size + col] = Cell::from_player(cell);
            }
        }
        Ok(board)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Get the cell at a specific position. Panics when out of range.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.size + col]
    }

    /// Get the cell at a signed position, `None` when off the board.
    pub fn get_signed(&self, row: isize, col: isize) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.size || col >= self.size {
            return None;
        }
        Some(self.get(row, col))
    }

    pub fn contains(&self, mv: Move) -> bool {
        mv.row < self.size && mv.col < self.size
    }

    /// Every empty cell in row-major order.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &cell)| cell == Cell::Empty)
            .map(|(idx, _)| Move::new(idx / self.size, idx % self.size))
            .collect()
    }

    /// Place a stone. This is the only way a board is mutated.
    pub fn apply(&mut self, mv: Move, player: Player) -> Result<(), MoveError> {
        if !self.contains(mv) {
            return Err(MoveError::OutOfBounds {
                mv,
                size: self.size,
            });
        }
        let idx = mv.row * self.size + mv.col;
        if self.cells[idx] != Cell::Empty {
            return Err(MoveError::Occupied(mv));
        }
        self.cells[idx] = player.to_cell();
        Ok(())
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&cell| cell != Cell::Empty)
    }

    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell != Cell::Empty).count()
    }

    /// Cells row by row.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size.max(1))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: Vec<String> = row.iter().map(|cell| cell.symbol().to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
