use super::Solver;
use crate::board::{Board, Cell};
use crate::highlight::Highlighter;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{BTreeSet, HashSet};

/// Frontier-based deduction with a ratio-guided guess when nothing is certain.
///
/// The frontier is every revealed number. For each frontier cell that is not
/// yet exhausted, a step chords when all its mines are flagged and flags its
/// hidden neighbours when they must all be mines. If neither applies anywhere,
/// the step reveals a hidden neighbour of the frontier cell with the lowest
/// share of unflagged mines among its unrevealed neighbours.
pub struct HeuristicSweep {
    started: bool,
    steps: u32,
    frontier: BTreeSet<(usize, usize)>,
    visited: HashSet<(usize, usize)>,
    last_guess: Option<(usize, usize)>,
    rng: SmallRng,
}

struct Surroundings {
    unrevealed: usize,
    flagged: usize,
}

impl HeuristicSweep {
    pub fn new() -> HeuristicSweep {
        HeuristicSweep::with_rng(SmallRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> HeuristicSweep {
        HeuristicSweep::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> HeuristicSweep {
        HeuristicSweep {
            started: false,
            steps: 0,
            frontier: BTreeSet::new(),
            visited: HashSet::new(),
            last_guess: None,
            rng,
        }
    }

    fn surroundings(board: &Board, x: usize, y: usize) -> Surroundings {
        let mut surroundings = Surroundings {
            unrevealed: 0,
            flagged: 0,
        };

        for (nx, ny) in board.neighbours(x, y) {
            if let Some(cell) = board.cell(nx, ny) {
                if !cell.revealed {
                    surroundings.unrevealed += 1;
                }
                if cell.flagged {
                    surroundings.flagged += 1;
                }
            }
        }

        surroundings
    }

    fn hidden_neighbours(board: &Board, x: usize, y: usize) -> Vec<(usize, usize)> {
        board
            .neighbours(x, y)
            .filter(|&(nx, ny)| board.cell(nx, ny).map_or(false, |cell| cell.is_hidden()))
            .collect()
    }

    fn scan_frontier(&mut self, board: &Board) {
        for (x, y) in board.positions() {
            if let Some(cell) = board.cell(x, y) {
                if cell.revealed && !cell.is_mine() && cell.adjacent_mines > 0 {
                    self.frontier.insert((x, y));
                }
            }
        }
    }
}

impl Default for HeuristicSweep {
    fn default() -> HeuristicSweep {
        HeuristicSweep::new()
    }
}

impl Solver for HeuristicSweep {
    fn step(&mut self, board: &mut Board, highlighter: &dyn Highlighter) -> bool {
        self.steps += 1;

        if !self.started {
            self.started = true;
            let (x, y) = (board.width() / 2, board.height() / 2);
            highlighter.highlight(x, y);
            board.reveal(x, y);
            return true;
        }

        let before: Vec<Cell> = board.cells().to_vec();

        self.scan_frontier(board);

        let mut acted = false;
        let mut best_ratio = 1.0;
        let mut guess = None;

        let frontier: Vec<(usize, usize)> = self.frontier.iter().copied().collect();
        for (x, y) in frontier {
            if self.visited.contains(&(x, y)) {
                continue;
            }

            highlighter.highlight(x, y);

            let required = board.cell(x, y).map_or(0, |cell| cell.adjacent_mines as usize);
            let Surroundings {
                unrevealed,
                flagged,
            } = HeuristicSweep::surroundings(board, x, y);

            if unrevealed == flagged {
                self.visited.insert((x, y));
            }

            if flagged == required && unrevealed != flagged {
                board.chord(x, y);
                acted = true;
            }

            if unrevealed == required {
                for (nx, ny) in HeuristicSweep::hidden_neighbours(board, x, y) {
                    board.flag(nx, ny);
                    acted = true;
                }
            }

            if !acted && unrevealed > 0 && required > flagged {
                let ratio = (required - flagged) as f32 / unrevealed as f32;
                if ratio < best_ratio {
                    let candidates = HeuristicSweep::hidden_neighbours(board, x, y);
                    if let Some(&pick) = candidates.choose(&mut self.rng) {
                        best_ratio = ratio;
                        guess = Some(pick);
                    }
                }
            }
        }

        if !acted {
            if guess.is_some() {
                self.last_guess = guess;
            }

            // A stale guess is a no-op reveal, which reads as no progress.
            if let Some((x, y)) = self.last_guess {
                highlighter.highlight(x, y);
                board.reveal(x, y);
            }
        }

        board.cells() != before.as_slice()
    }

    fn name(&self) -> &'static str {
        "heuristic sweep"
    }

    fn steps(&self) -> u32 {
        self.steps
    }

    fn reset(&mut self) {
        self.started = false;
        self.steps = 0;
        self.frontier.clear();
        self.visited.clear();
        self.last_guess = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardState;
    use crate::highlight::NoHighlight;
    use crate::solver::testing::RecordingHighlighter;
    use insta::assert_display_snapshot;

    #[test]
    fn first_step_reveals_the_centre() {
        let mut board: Board = "*....\n.....\n.....\n.....\n....*".parse().unwrap();
        let highlighter = RecordingHighlighter::default();
        let mut solver = HeuristicSweep::with_seed(1);

        assert!(solver.step(&mut board, &highlighter));

        assert_eq!(*highlighter.0.borrow(), vec![(2, 2)]);
        assert!(board.cell(2, 2).unwrap().revealed);
        assert_eq!(board.state(), BoardState::Won);
    }

    #[test]
    fn flags_certain_mines_then_chords() {
        let mut board: Board = ".*.....\n.......\n.......".parse().unwrap();
        let mut solver = HeuristicSweep::with_seed(7);

        assert!(solver.step(&mut board, &NoHighlight));
        assert_eq!(board.to_string(), "##1....\n111....\n.......\n");

        assert!(solver.step(&mut board, &NoHighlight));
        assert!(board.cell(1, 0).unwrap().flagged);
        assert_eq!(board.state(), BoardState::Ongoing);

        assert!(solver.step(&mut board, &NoHighlight));
        assert_eq!(board.state(), BoardState::Won);
        assert_display_snapshot!(solver.steps(), @"3");
    }

    #[test]
    fn reports_no_progress_once_nothing_changes() {
        let mut board: Board = "...\n...\n...".parse().unwrap();
        let mut solver = HeuristicSweep::with_seed(3);

        assert!(solver.step(&mut board, &NoHighlight));
        assert_eq!(board.state(), BoardState::Won);

        assert!(!solver.step(&mut board, &NoHighlight));
        assert_eq!(solver.steps(), 2);
    }

    #[test]
    fn guesses_a_hidden_neighbour_when_nothing_is_certain() {
        let mut board: Board = "*..\n...\n...".parse().unwrap();
        let mut solver = HeuristicSweep::with_seed(11);

        solver.step(&mut board, &NoHighlight);
        assert_eq!(board.to_string(), "###\n#1#\n###\n");

        assert!(solver.step(&mut board, &NoHighlight));

        let revealed = board.cells().iter().filter(|cell| cell.revealed).count();
        assert!(board.state() == BoardState::Lost || revealed > 1);
    }

    #[test]
    fn stale_guess_makes_no_progress() {
        let (mut board, mut solver) = (0..64)
            .find_map(|seed| {
                let mut board: Board = ".*...\n.....\n.....".parse().unwrap();
                board.flag(4, 2);
                let mut solver = HeuristicSweep::with_seed(seed);

                solver.step(&mut board, &NoHighlight);
                solver.step(&mut board, &NoHighlight);

                if board.state() == BoardState::Ongoing {
                    Some((board, solver))
                } else {
                    None
                }
            })
            .unwrap();
        let guess = solver.last_guess.unwrap();
        assert!(board.cell(guess.0, guess.1).unwrap().revealed);

        board.flag(1, 0);
        for (x, y) in board.positions() {
            if board.cell(x, y).map_or(false, |cell| !cell.is_mine()) {
                board.reveal(x, y);
            }
        }
        assert_eq!(board.to_string(), "1F1..\n111..\n....F\n");

        let highlighter = RecordingHighlighter::default();
        assert!(!solver.step(&mut board, &highlighter));
        assert_eq!(board.to_string(), "1F1..\n111..\n....F\n");
        assert_eq!(highlighter.0.borrow().last(), Some(&guess));
        assert_eq!(board.state(), BoardState::Ongoing);
    }

    #[test]
    fn reset_starts_from_the_centre_again() {
        let mut board: Board = "*..\n...\n...".parse().unwrap();
        let highlighter = RecordingHighlighter::default();
        let mut solver = HeuristicSweep::with_seed(5);

        solver.step(&mut board, &highlighter);
        solver.reset();
        assert_eq!(solver.steps(), 0);

        highlighter.0.borrow_mut().clear();
        solver.step(&mut board, &highlighter);
        assert_eq!(*highlighter.0.borrow(), vec![(1, 1)]);
    }
}
