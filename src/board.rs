mod generation;
mod neighbours;
mod tile;

pub use neighbours::Neighbours;
pub use tile::Tile;

use std::collections::VecDeque;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Instant;
use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellContent {
    Empty,
    Mine,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BoardState {
    Ongoing,
    Won,
    Lost,
}

/// Everything that describes a board apart from its cells.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoardMetadata {
    pub height: usize,
    pub width: usize,
    pub mine_count: usize,
    pub seed: u64,
    pub safe_origin: (usize, usize),
    /// Seconds since the last generation, as of the last `update_timer`.
    pub elapsed: f32,
    pub state: BoardState,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub content: CellContent,
    pub revealed: bool,
    pub flagged: bool,
    /// Only meaningful for empty cells.
    pub adjacent_mines: u8,
    pub tile: Tile,
}

impl Cell {
    pub fn is_mine(&self) -> bool {
        self.content == CellContent::Mine
    }

    /// Neither revealed nor flagged.
    pub fn is_hidden(&self) -> bool {
        !self.revealed && !self.flagged
    }
}

impl Default for Cell {
    fn default() -> Cell {
        Cell {
            content: CellContent::Empty,
            revealed: false,
            flagged: false,
            adjacent_mines: 0,
            tile: Tile::Hidden,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum BoardError {
    #[error("board dimensions must be positive, got {height}x{width}")]
    EmptyDimensions { height: usize, width: usize },
    #[error("{mine_count} mines leave no safe cell on a {height}x{width} board")]
    TooManyMines {
        height: usize,
        width: usize,
        mine_count: usize,
    },
    #[error("unexpected character {0:?} in board layout")]
    InvalidLayout(char),
    #[error("board layout rows have different lengths")]
    RaggedLayout,
}

/// A minesweeper board for one round of play.
///
/// Cells are stored row-major. Coordinates are `(x, y)` with `x` the column;
/// every mutation silently ignores coordinates outside the board.
#[derive(Clone, Debug)]
pub struct Board {
    metadata: BoardMetadata,
    cells: Vec<Cell>,
    generated_at: Instant,
    hit: Option<(usize, usize)>,
}

impl Board {
    /// An empty, unrevealed board. Mines are placed by `generate`.
    pub fn new(height: usize, width: usize, mine_count: usize) -> Result<Board, BoardError> {
        if height == 0 || width == 0 {
            return Err(BoardError::EmptyDimensions { height, width });
        }

        if mine_count >= height * width {
            return Err(BoardError::TooManyMines {
                height,
                width,
                mine_count,
            });
        }

        Ok(Board {
            metadata: BoardMetadata {
                height,
                width,
                mine_count,
                seed: 0,
                safe_origin: (0, 0),
                elapsed: 0.0,
                state: BoardState::Ongoing,
            },
            cells: vec![Cell::default(); height * width],
            generated_at: Instant::now(),
            hit: None,
        })
    }

    /// Like `new`, with the mine count derived from a density in `[0, 1]`.
    /// The count is capped so that the safe cell always fits.
    pub fn with_density(height: usize, width: usize, density: f32) -> Result<Board, BoardError> {
        let total = height * width;
        let mine_count = (total as f32 * density.max(0.0)) as usize;

        Board::new(height, width, mine_count.min(total.saturating_sub(1)))
    }

    /// Reset every cell and place a fresh set of mines, seeded from the clock.
    pub fn generate(&mut self, safe_x: usize, safe_y: usize) {
        self.generate_with_seed(safe_x, safe_y, generation::clock_seed());
    }

    pub fn generate_with_seed(&mut self, safe_x: usize, safe_y: usize, seed: u64) {
        let width = self.metadata.width;
        let height = self.metadata.height;
        let safe_origin = (safe_x.min(width - 1), safe_y.min(height - 1));

        for cell in self.cells.iter_mut() {
            *cell = Cell::default();
        }

        self.hit = None;
        self.generated_at = Instant::now();
        self.metadata.seed = seed;
        self.metadata.safe_origin = safe_origin;
        self.metadata.elapsed = 0.0;
        self.metadata.state = BoardState::Ongoing;

        let safe_index = safe_origin.1 * width + safe_origin.0;
        for index in generation::place_mines(width * height, safe_index, self.metadata.mine_count, seed)
        {
            self.cells[index].content = CellContent::Mine;
        }

        self.compute_adjacency();
        self.refresh_tiles();
    }

    pub fn reveal(&mut self, x: usize, y: usize) {
        if !self.is_ongoing() {
            return;
        }

        if let Some(index) = self.index(x, y) {
            let cell = self.cells[index];

            if !cell.revealed && !cell.flagged {
                if cell.is_mine() {
                    self.lose(x, y);
                    return;
                }

                self.flood_fill(x, y);
                self.refresh_tiles();
            }
        }

        self.evaluate_win();
    }

    /// Toggles the flag on an unrevealed cell.
    pub fn flag(&mut self, x: usize, y: usize) {
        if !self.is_ongoing() {
            return;
        }

        if let Some(index) = self.index(x, y) {
            let cell = &mut self.cells[index];
            if !cell.revealed {
                cell.flagged = !cell.flagged;
                self.refresh_tiles();
            }
        }
    }

    /// Reveals the unflagged neighbours of a revealed number once the number
    /// of flags around it matches its adjacency count.
    pub fn chord(&mut self, x: usize, y: usize) {
        if !self.is_ongoing() {
            return;
        }

        let cell = match self.cell(x, y) {
            Some(cell) if cell.revealed => cell,
            _ => return,
        };

        let flagged = self
            .neighbours(x, y)
            .filter(|&(nx, ny)| self.cells[self.flat(nx, ny)].flagged)
            .count();

        if flagged != cell.adjacent_mines as usize {
            return;
        }

        for (nx, ny) in self.neighbours(x, y) {
            let neighbour = self.cells[self.flat(nx, ny)];
            if !neighbour.flagged && !neighbour.revealed {
                self.reveal(nx, ny);
            }
        }
    }

    /// Refreshes the elapsed time. Only the owner of the board calls this.
    pub fn update_timer(&mut self) {
        self.metadata.elapsed = self.generated_at.elapsed().as_secs_f32();
    }

    /// True when every empty cell has been revealed. Flags do not count.
    pub fn win_condition(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_mine() || cell.revealed)
    }

    pub fn metadata(&self) -> BoardMetadata {
        self.metadata
    }

    pub fn state(&self) -> BoardState {
        self.metadata.state
    }

    pub fn width(&self) -> usize {
        self.metadata.width
    }

    pub fn height(&self) -> usize {
        self.metadata.height
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.index(x, y).map(|index| self.cells[index])
    }

    pub fn neighbours(&self, x: usize, y: usize) -> Neighbours {
        Neighbours::new(x, y, self.metadata.width, self.metadata.height)
    }

    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> {
        let width = self.metadata.width;
        let height = self.metadata.height;

        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    fn is_ongoing(&self) -> bool {
        self.metadata.state == BoardState::Ongoing
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.metadata.width && y < self.metadata.height {
            Some(self.flat(x, y))
        } else {
            None
        }
    }

    fn flat(&self, x: usize, y: usize) -> usize {
        y * self.metadata.width + x
    }

    fn compute_adjacency(&mut self) {
        for (x, y) in self.positions().collect::<Vec<_>>() {
            let index = self.flat(x, y);
            if self.cells[index].is_mine() {
                continue;
            }

            let count = self
                .neighbours(x, y)
                .filter(|&(nx, ny)| self.cells[self.flat(nx, ny)].is_mine())
                .count();

            self.cells[index].adjacent_mines = count as u8;
        }
    }

    fn flood_fill(&mut self, x: usize, y: usize) {
        let mut queue = VecDeque::new();
        queue.push_back((x, y));

        while let Some((cx, cy)) = queue.pop_front() {
            let index = self.flat(cx, cy);
            let cell = &mut self.cells[index];

            if cell.revealed || cell.flagged {
                continue;
            }

            cell.revealed = true;

            if cell.adjacent_mines == 0 && !cell.is_mine() {
                queue.extend(self.neighbours(cx, cy));
            }
        }
    }

    fn lose(&mut self, x: usize, y: usize) {
        self.hit = Some((x, y));

        // Flagged mines stay flagged so a correct flag still shows as one.
        for cell in self.cells.iter_mut() {
            if cell.is_mine() && !cell.flagged {
                cell.revealed = true;
            }
        }

        self.metadata.state = BoardState::Lost;
        self.refresh_tiles();
    }

    fn evaluate_win(&mut self) {
        if self.is_ongoing() && self.win_condition() {
            self.metadata.state = BoardState::Won;
            self.refresh_tiles();
        }
    }

    fn refresh_tiles(&mut self) {
        let state = self.metadata.state;
        let hit = self.hit.map(|(x, y)| self.flat(x, y));

        for (index, cell) in self.cells.iter_mut().enumerate() {
            cell.tile = Tile::derive(cell, state, hit == Some(index));
        }
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.metadata.width) {
            for cell in row {
                write!(f, "{}", cell.tile)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Parses a fixed layout: one line per row, `.` for an empty cell and `*`
/// for a mine. The result is an ongoing board with nothing revealed.
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(layout: &str) -> Result<Board, BoardError> {
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|row| !row.is_empty())
            .collect();

        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());

        if height == 0 || width == 0 {
            return Err(BoardError::EmptyDimensions { height, width });
        }

        let mut cells = Vec::with_capacity(height * width);
        for row in &rows {
            if row.chars().count() != width {
                return Err(BoardError::RaggedLayout);
            }

            for c in row.chars() {
                let content = match c {
                    '.' => CellContent::Empty,
                    '*' => CellContent::Mine,
                    other => return Err(BoardError::InvalidLayout(other)),
                };

                cells.push(Cell {
                    content,
                    ..Cell::default()
                });
            }
        }

        let mine_count = cells.iter().filter(|cell| cell.is_mine()).count();
        let safe_index = cells.iter().position(|cell| !cell.is_mine()).unwrap_or(0);

        let mut board = Board {
            metadata: BoardMetadata {
                height,
                width,
                mine_count,
                seed: 0,
                safe_origin: (safe_index % width, safe_index / width),
                elapsed: 0.0,
                state: BoardState::Ongoing,
            },
            cells,
            generated_at: Instant::now(),
            hit: None,
        };

        board.compute_adjacency();
        board.refresh_tiles();

        Ok(board)
    }
}
