use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Read-only snapshot of a [`MineField`] as a renderer sees it.
///
/// Mine positions only leak through [`CellView::Mine`], which appears once a mine is open.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub size: Coord2,
    pub mine_count: CellCount,
    pub cells: Array2<CellView>,
    pub lost: bool,
}

impl BoardView {
    pub fn from_field<R>(field: &MineField<R>) -> Self {
        let size = (field.rows(), field.cols());
        let mut cells: Array2<CellView> = Array2::default(size.to_nd_index());

        for row in field.row_indices() {
            for col in field.col_indices() {
                let index = field.cell_index(row, col);
                cells[(row, col).to_nd_index()] = cell_view(field, index);
            }
        }

        Self {
            size,
            mine_count: field.mine_count(),
            cells,
            lost: field.lost(),
        }
    }

    /// `None` for coordinates outside the board.
    pub fn cell_at(&self, coords: Coord2) -> Option<CellView> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    /// Won state, derived: no mine was opened and the only closed cells left are mines.
    pub fn is_cleared(&self) -> bool {
        !self.lost && self.cells.iter().filter(|cell| cell.is_closed()).count() == self.mine_count
    }
}

fn cell_view<R>(field: &MineField<R>, index: CellIndex) -> CellView {
    match (field.is_open(index), field.has_bomb(index)) {
        (true, true) => CellView::Mine,
        (true, false) => CellView::Open(field.bombs_in_vicinity(index)),
        (false, _) if field.has_flag(index) => CellView::Flagged,
        (false, _) => CellView::Closed,
    }
}
