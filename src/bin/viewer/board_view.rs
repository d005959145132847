use cursive::theme::{BaseColor, Color, ColorStyle, Effect, PaletteColor};
use cursive::view::View;
use cursive::{Printer, Vec2};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use sweeper_solver::board::{BoardState, Tile};
use sweeper_solver::scheduler::SharedSession;
use sweeper_solver::solver::Algorithm;

const HEADER_ROWS: usize = 3;

/// Draws the shared board, the fading highlight trail and the session totals.
pub struct BoardView {
    session: Arc<SharedSession>,
}

impl BoardView {
    pub fn new(session: Arc<SharedSession>) -> Self {
        Self { session }
    }

    fn tile_style(tile: Tile) -> Option<ColorStyle> {
        let color = match tile {
            Tile::Mine | Tile::MineHit | Tile::WrongFlag => Color::Dark(BaseColor::Red),
            Tile::Flag => Color::Light(BaseColor::Yellow),
            Tile::Number(1) => Color::Light(BaseColor::Blue),
            Tile::Number(2) => Color::Dark(BaseColor::Green),
            Tile::Number(3) => Color::Light(BaseColor::Red),
            Tile::Number(_) => Color::Dark(BaseColor::Magenta),
            Tile::Hidden | Tile::Empty => return None,
        };

        Some(ColorStyle::new(color, PaletteColor::View))
    }
}

impl View for BoardView {
    fn draw(&self, printer: &Printer) {
        let stats = self.session.stats();
        let round = self.session.round();
        let algorithm = Algorithm::from_index(self.session.selected_algorithm());

        let (metadata, tiles) = {
            let board = self.session.board().read();
            let tiles: Vec<Tile> = board.cells().iter().map(|cell| cell.tile).collect();
            (board.metadata(), tiles)
        };

        let trail: HashMap<(usize, usize), f32> = self
            .session
            .trail()
            .snapshot(Instant::now())
            .into_iter()
            .map(|(entry, fade)| ((entry.x, entry.y), fade))
            .collect();

        printer.print((0, 0), &format!("{:<16} {}", algorithm.name(), stats));

        let state = match metadata.state {
            BoardState::Ongoing => "playing",
            BoardState::Won => "won",
            BoardState::Lost => "lost",
        };
        printer.print(
            (0, 1),
            &format!(
                "{:<16} {:.1}s, {} steps, {} mines  [<-/-> solver, r restart, t trail, q quit]",
                state,
                metadata.elapsed,
                round.steps(),
                metadata.mine_count
            ),
        );

        for (index, tile) in tiles.iter().enumerate() {
            let (x, y) = (index % metadata.width, index / metadata.width);
            let position = (x * 2, y + HEADER_ROWS);
            let text = tile.to_string();

            match trail.get(&(x, y)) {
                Some(&fade) if fade < 0.5 => printer.with_color(ColorStyle::highlight(), |printer| {
                    printer.print(position, &text)
                }),
                Some(_) => printer.with_color(ColorStyle::highlight_inactive(), |printer| {
                    printer.print(position, &text)
                }),
                None => match BoardView::tile_style(*tile) {
                    Some(style) if *tile == Tile::MineHit => printer.with_color(style, |printer| {
                        printer.with_effect(Effect::Reverse, |printer| printer.print(position, &text))
                    }),
                    Some(style) => printer.with_color(style, |printer| printer.print(position, &text)),
                    None => printer.print(position, &text),
                },
            }
        }
    }

    fn required_size(&mut self, _constraint: Vec2) -> Vec2 {
        let metadata = self.session.board().read().metadata();

        Vec2::new((metadata.width * 2).max(80), metadata.height + HEADER_ROWS)
    }
}
