use super::{BoardState, Cell, CellContent};
use std::fmt;
use std::fmt::{Display, Formatter};

/// What a cell shows to the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tile {
    Hidden,
    Flag,
    /// A revealed cell with no adjacent mines.
    Empty,
    Number(u8),
    /// A mine uncovered at the end of a lost round.
    Mine,
    MineHit,
    /// A flag on a cell that turned out to be empty.
    WrongFlag,
}

impl Tile {
    pub fn derive(cell: &Cell, state: BoardState, is_hit: bool) -> Tile {
        match (cell.revealed, cell.flagged, cell.content) {
            (_, true, CellContent::Empty) if state == BoardState::Lost => Tile::WrongFlag,
            (_, true, _) => Tile::Flag,
            (true, false, CellContent::Mine) if is_hit => Tile::MineHit,
            (true, false, CellContent::Mine) => Tile::Mine,
            (true, false, CellContent::Empty) => Tile::number(cell.adjacent_mines),
            (false, false, _) => Tile::Hidden,
        }
    }

    fn number(adjacent_mines: u8) -> Tile {
        if adjacent_mines == 0 {
            Tile::Empty
        } else {
            Tile::Number(adjacent_mines)
        }
    }
}

impl Display for Tile {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Tile::Hidden => f.write_str("#"),
            Tile::Flag => f.write_str("F"),
            Tile::Empty => f.write_str("."),
            Tile::Number(n) => write!(f, "{}", n),
            Tile::Mine => f.write_str("*"),
            Tile::MineHit => f.write_str("@"),
            Tile::WrongFlag => f.write_str("X"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(content: CellContent, revealed: bool, flagged: bool, adjacent_mines: u8) -> Cell {
        Cell {
            content,
            revealed,
            flagged,
            adjacent_mines,
            tile: Tile::Hidden,
        }
    }

    #[test]
    fn derives_from_cell_and_outcome() {
        let ongoing = BoardState::Ongoing;
        let lost = BoardState::Lost;

        assert_eq!(Tile::derive(&cell(CellContent::Empty, false, false, 3), ongoing, false), Tile::Hidden);
        assert_eq!(Tile::derive(&cell(CellContent::Empty, true, false, 0), ongoing, false), Tile::Empty);
        assert_eq!(Tile::derive(&cell(CellContent::Empty, true, false, 3), ongoing, false), Tile::Number(3));
        assert_eq!(Tile::derive(&cell(CellContent::Empty, false, true, 3), ongoing, false), Tile::Flag);
        assert_eq!(Tile::derive(&cell(CellContent::Empty, false, true, 3), lost, false), Tile::WrongFlag);
        assert_eq!(Tile::derive(&cell(CellContent::Mine, false, true, 0), lost, false), Tile::Flag);
        assert_eq!(Tile::derive(&cell(CellContent::Mine, true, false, 0), lost, false), Tile::Mine);
        assert_eq!(Tile::derive(&cell(CellContent::Mine, true, false, 0), lost, true), Tile::MineHit);
    }

    #[test]
    fn renders_one_char_per_tile() {
        let rendered: String = [
            Tile::Hidden,
            Tile::Flag,
            Tile::Empty,
            Tile::Number(8),
            Tile::Mine,
            Tile::MineHit,
            Tile::WrongFlag,
        ]
        .iter()
        .map(Tile::to_string)
        .collect();

        assert_eq!(rendered, "#F.8*@X");
    }
}
