use crate::board::{Board, Cell};

/// Cells in the 3x3 window around a candidate, the candidate included.
pub const DIMENSION: usize = 9;

pub const HIDDEN: f64 = -1.0;
pub const FLAGGED: f64 = 9.0;
pub const OFF_BOARD: f64 = -2.0;

pub type Features = [f64; DIMENSION];

pub fn encode(cell: &Cell) -> f64 {
    if cell.flagged {
        FLAGGED
    } else if !cell.revealed {
        HIDDEN
    } else {
        f64::from(cell.adjacent_mines)
    }
}

/// The row-major 3x3 neighbourhood of `(x, y)` as the player sees it.
pub fn featurize(board: &Board, x: usize, y: usize) -> Features {
    let mut features = [OFF_BOARD; DIMENSION];

    for dy in 0..3 {
        for dx in 0..3 {
            let nx = x.checked_add(dx).and_then(|nx| nx.checked_sub(1));
            let ny = y.checked_add(dy).and_then(|ny| ny.checked_sub(1));
            let cell = nx
                .zip(ny)
                .and_then(|(nx, ny)| board.cell(nx, ny));

            if let Some(cell) = cell {
                features[dy * 3 + dx] = encode(&cell);
            }
        }
    }

    features
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_visible_state_only() {
        let mut board: Board = "*..\n...\n..*".parse().unwrap();
        board.reveal(1, 0);
        board.flag(0, 0);

        assert_eq!(
            featurize(&board, 1, 1),
            [FLAGGED, 1.0, HIDDEN, HIDDEN, HIDDEN, HIDDEN, HIDDEN, HIDDEN, HIDDEN]
        );
    }

    #[test]
    fn corners_read_off_board() {
        let board: Board = "..\n..".parse().unwrap();

        assert_eq!(
            featurize(&board, 0, 0),
            [OFF_BOARD, OFF_BOARD, OFF_BOARD, OFF_BOARD, HIDDEN, HIDDEN, OFF_BOARD, HIDDEN, HIDDEN]
        );
    }

    #[test]
    fn far_off_board_reads_off_board() {
        let board: Board = "..\n..".parse().unwrap();

        assert_eq!(featurize(&board, usize::MAX, usize::MAX), [OFF_BOARD; DIMENSION]);
        assert_eq!(featurize(&board, usize::MAX, 0), [OFF_BOARD; DIMENSION]);
    }
}
