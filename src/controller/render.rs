//! Render hooks.
//!
//! The coordinator calls the renderer after every turn with a board view
//! taken outside the game lock, so a slow renderer never blocks a move.

use std::io::Write;

use tracing::warn;

use super::GameSummary;
use crate::board::{Cell, TerrainKind, BOARD_SIZE};
use crate::core::BoardView;
use crate::scheduler::TurnReport;

/// Consumer of board views and the final summary.
pub trait Renderer {
    /// Called after every turn.
    fn render(&mut self, view: &BoardView, report: &TurnReport);

    /// Called once the game has ended.
    fn game_over(&mut self, _summary: &GameSummary) {}
}

/// Draws nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _view: &BoardView, _report: &TurnReport) {}
}

/// Plain-text board printed to any writer.
///
/// Tokens show as their colour letter, star squares as `*`, yards as the
/// lowercase colour letter, lanes as `=` and the rest of the track as `.`.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Board as lines of text, one per row.
    #[must_use]
    pub fn draw(view: &BoardView) -> String {
        let mut board = String::with_capacity(BOARD_SIZE * (2 * BOARD_SIZE + 1));
        for row in 0..BOARD_SIZE as u8 {
            for col in 0..BOARD_SIZE as u8 {
                let cell = Cell::new(row, col);
                let symbol = match view.token_at(cell) {
                    Some(token) => token.color.symbol(),
                    None => terrain_symbol(view.terrain.at(cell)),
                };
                board.push(symbol);
                board.push(' ');
            }
            board.pop();
            board.push('\n');
        }
        board
    }
}

fn terrain_symbol(kind: TerrainKind) -> char {
    match kind {
        TerrainKind::Plain => '.',
        TerrainKind::HomeYard(color) => color.symbol().to_ascii_lowercase(),
        TerrainKind::Safe => '*',
        TerrainKind::ColoredPath(_) => '=',
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, view: &BoardView, report: &TurnReport) {
        let rolls: Vec<String> = report.rolls.iter().map(u8::to_string).collect();
        let text = format!("{} rolled {}\n{}\n", report.player, rolls.join(", "), Self::draw(view));
        if let Err(error) = self.out.write_all(text.as_bytes()) {
            warn!(%error, "failed to draw board");
        }
    }

    fn game_over(&mut self, summary: &GameSummary) {
        if let Err(error) = write!(self.out, "{}", summary.standings) {
            warn!(%error, "failed to print standings");
        }
    }
}
