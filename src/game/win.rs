use super::{Board, Player};

/// Stones in a line needed to win. Longer runs also win.
pub const WIN_LENGTH: usize = 5;

/// Horizontal, vertical, and the two diagonals. Each line is scanned both ways
/// from its origin, so mirrored directions are not listed.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Check whether `player` has five or more stones in a row anywhere on the board.
pub fn has_five_in_row(board: &Board, player: Player) -> bool {
    let target = player.to_cell();
    let size = board.size();

    for row in 0..size {
        for col in 0..size {
            if board.get(row, col) != target {
                continue;
            }
            for &(dr, dc) in &DIRECTIONS {
                let count = 1
                    + run_length(board, row, col, dr, dc, player)
                    + run_length(board, row, col, -dr, -dc, player);
                if count >= WIN_LENGTH {
                    return true;
                }
            }
        }
    }
    false
}

/// Count contiguous `player` stones from (row, col) in one direction, not
/// counting the origin. Stops at the first other cell or the board edge.
fn run_length(board: &Board, row: usize, col: usize, dr: isize, dc: isize, player: Player) -> usize {
    let target = player.to_cell();
    let mut count = 0;
    for step in 1..WIN_LENGTH as isize {
        let r = row as isize + dr * step;
        let c = col as isize + dc * step;
        match board.get_signed(r, c) {
            Some(cell) if cell == target => count += 1,
            _ => break,
        }
    }
    count
}
