use std::fmt::Write;

use minefield_core::{BoardView, CellView};

fn cell_glyph(cell: CellView) -> char {
    match cell {
        CellView::Closed => '#',
        CellView::Flagged => 'F',
        CellView::Open(0) => '.',
        CellView::Open(count) => char::from(b'0' + count),
        CellView::Mine => '*',
    }
}

/// Draws the board as a text grid with row and column numbers.
pub fn render_board(view: &BoardView) -> String {
    let (rows, cols) = view.size;
    let mut out = String::new();

    out.push_str("    ");
    for col in 0..cols {
        let _ = write!(out, "{:>3}", col);
    }
    out.push('\n');

    for row in 0..rows {
        let _ = write!(out, "{:>3} ", row);
        for col in 0..cols {
            let _ = write!(out, "{:>3}", cell_glyph(view.cell_at((row, col)).unwrap_or_default()));
        }
        out.push('\n');
    }

    out
}

pub fn render_status(view: &BoardView, flags: usize) -> String {
    if view.lost {
        "Boom! You hit a mine. Type `reset` to play again.".to_string()
    } else if view.is_cleared() {
        "Board cleared, well done! Type `reset` to play again.".to_string()
    } else {
        format!("Mines: {}  Flags: {}", view.mine_count, flags)
    }
}
