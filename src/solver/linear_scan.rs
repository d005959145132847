use super::Solver;
use crate::board::Board;
use crate::highlight::Highlighter;

/// Reveals every cell in raster order with no regard for mines.
#[derive(Default)]
pub struct LinearScan {
    x: usize,
    y: usize,
    steps: u32,
}

impl LinearScan {
    pub fn new() -> LinearScan {
        LinearScan::default()
    }
}

impl Solver for LinearScan {
    fn step(&mut self, board: &mut Board, highlighter: &dyn Highlighter) -> bool {
        if self.x >= board.width() || self.y >= board.height() {
            self.x = 0;
            self.y = 0;
        }

        highlighter.highlight(self.x, self.y);
        board.reveal(self.x, self.y);

        self.x += 1;
        if self.x >= board.width() {
            self.x = 0;
            self.y += 1;
        }
        if self.y >= board.height() {
            self.y = 0;
        }

        self.steps += 1;

        true
    }

    fn name(&self) -> &'static str {
        "linear scan"
    }

    fn steps(&self) -> u32 {
        self.steps
    }

    fn reset(&mut self) {
        self.x = 0;
        self.y = 0;
        self.steps = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardState;
    use crate::highlight::NoHighlight;
    use crate::solver::testing::RecordingHighlighter;

    #[test]
    fn clears_safe_board_within_nine_steps() {
        let mut board: Board = "...\n...\n...".parse().unwrap();
        let mut solver = LinearScan::new();

        while board.state() == BoardState::Ongoing && solver.steps() < 9 {
            assert!(solver.step(&mut board, &NoHighlight));
        }

        assert_eq!(board.state(), BoardState::Won);
        assert!(solver.steps() <= 9);
    }

    #[test]
    fn visits_cells_in_raster_order_and_wraps() {
        let mut board: Board = "*.\n..".parse().unwrap();
        let highlighter = RecordingHighlighter::default();
        let mut solver = LinearScan::new();

        for _ in 0..5 {
            solver.step(&mut board, &highlighter);
        }

        assert_eq!(
            *highlighter.0.borrow(),
            vec![(0, 0), (1, 0), (0, 1), (1, 1), (0, 0)]
        );
        assert_eq!(board.state(), BoardState::Lost);
        assert_eq!(solver.steps(), 5);
    }

    #[test]
    fn reset_returns_to_origin() {
        let mut board: Board = "...\n...".parse().unwrap();
        let highlighter = RecordingHighlighter::default();
        let mut solver = LinearScan::new();

        solver.step(&mut board, &highlighter);
        solver.step(&mut board, &highlighter);
        solver.reset();
        solver.step(&mut board, &highlighter);

        assert_eq!(*highlighter.0.borrow(), vec![(0, 0), (1, 0), (0, 0)]);
        assert_eq!(solver.steps(), 1);
    }
}
