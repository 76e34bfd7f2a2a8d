use alloc::collections::{BTreeSet, VecDeque};
use core::ops::Range;
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::*;

/// Rectangular board of cells with a hidden set of mines and a set of player flags.
///
/// Cells are addressed by a row-major [`CellIndex`]. Open-state only moves forward through [`MineField::open`];
/// [`MineField::reset`] starts the whole board over with freshly placed mines.
#[derive(Clone, Debug)]
pub struct MineField<R = SmallRng> {
    rows: Coord,
    cols: Coord,
    tiles: Array2<bool>,
    mines: BTreeSet<CellIndex>,
    flags: BTreeSet<CellIndex>,
    source: R,
}

impl MineField<SmallRng> {
    pub fn with_seed(rows: Coord, cols: Coord, seed: u64) -> Result<Self> {
        Self::with_source(rows, cols, SmallRng::seed_from_u64(seed))
    }
}

impl<R> MineField<R> {
    /// Allocates a closed board without mines; place them with [`MineField::init_bombs`] before play.
    pub fn with_source(rows: Coord, cols: Coord, source: R) -> Result<Self> {
        if rows == 0 || cols == 0 {
            log::warn!("Rejected {}x{} board", rows, cols);
            return Err(GameError::EmptyBoard);
        }

        Ok(Self {
            rows,
            cols,
            tiles: Array2::default((rows, cols).to_nd_index()),
            mines: BTreeSet::new(),
            flags: BTreeSet::new(),
            source,
        })
    }

    /// Board with mines at exactly the given indices.
    pub fn with_mines(rows: Coord, cols: Coord, mines: &[CellIndex], source: R) -> Result<Self> {
        let mut field = Self::with_source(rows, cols, source)?;
        for &index in mines {
            let index = field.validate_index(index)?;
            field.mines.insert(index);
        }
        Ok(field)
    }

    pub fn rows(&self) -> Coord {
        self.rows
    }

    pub fn cols(&self) -> Coord {
        self.cols
    }

    pub fn size(&self) -> CellCount {
        area(self.rows, self.cols)
    }

    pub fn config(&self) -> GameConfig {
        GameConfig::new_unchecked((self.rows, self.cols), self.mine_count())
    }

    pub fn mine_count(&self) -> CellCount {
        self.mines.len()
    }

    pub fn flag_count(&self) -> CellCount {
        self.flags.len()
    }

    pub fn open_count(&self) -> CellCount {
        self.tiles.iter().filter(|&&open| open).count()
    }

    pub fn row_indices(&self) -> Range<Coord> {
        0..self.rows
    }

    pub fn col_indices(&self) -> Range<Coord> {
        0..self.cols
    }

    pub fn cell_index(&self, row: Coord, col: Coord) -> CellIndex {
        linear_index((row, col), self.cols)
    }

    /// Inverse of [`MineField::cell_index`], `None` for indices outside the board.
    pub fn coordinates(&self, index: CellIndex) -> Option<Coord2> {
        self.validate_index(index)
            .ok()
            .map(|index| coords_of(index, self.cols))
    }

    pub fn validate_index(&self, index: CellIndex) -> Result<CellIndex> {
        if index < self.size() {
            Ok(index)
        } else {
            Err(GameError::InvalidIndex)
        }
    }

    pub fn is_open(&self, index: CellIndex) -> bool {
        self.validate_index(index)
            .is_ok_and(|index| self.tiles[coords_of(index, self.cols).to_nd_index()])
    }

    pub fn has_bomb(&self, index: CellIndex) -> bool {
        self.mines.contains(&index)
    }

    pub fn has_flag(&self, index: CellIndex) -> bool {
        self.flags.contains(&index)
    }

    /// `true` once any mine has been opened.
    pub fn lost(&self) -> bool {
        self.mines.iter().any(|&index| self.is_open(index))
    }

    /// In-bounds neighbors in a fixed order: the row above left to right, then left and right, then the row below.
    pub fn neighbors(&self, index: CellIndex) -> impl Iterator<Item = CellIndex> + use<R> {
        let cols = self.cols;
        let iter = match self.validate_index(index) {
            Ok(index) => self.tiles.iter_neighbors(coords_of(index, self.cols)),
            Err(_) => NeighborIter::empty(),
        };
        iter.map(move |coords| linear_index(coords, cols))
    }

    pub fn bombs_in_vicinity(&self, index: CellIndex) -> u8 {
        self.neighbors(index)
            .filter(|&neighbor| self.has_bomb(neighbor))
            .count() as u8
    }

    /// Marks a cell as a suspected mine. Open cells can be flagged too.
    pub fn flag(&mut self, index: CellIndex) -> Result<MarkOutcome> {
        let index = self.validate_index(index)?;
        Ok(if self.flags.insert(index) {
            MarkOutcome::Changed
        } else {
            MarkOutcome::NoChange
        })
    }

    pub fn unflag(&mut self, index: CellIndex) -> Result<MarkOutcome> {
        let index = self.validate_index(index)?;
        Ok(if self.flags.remove(&index) {
            MarkOutcome::Changed
        } else {
            MarkOutcome::NoChange
        })
    }

    /// Opens a cell.
    ///
    /// Opening a mine reveals every mine on the board and leaves all other cells as they were. Opening a safe cell
    /// also opens its safe neighbors and cascades through every zero-vicinity cell reached; flags do not stop it.
    pub fn open(&mut self, index: CellIndex) -> Result<RevealOutcome> {
        let index = self.validate_index(index)?;
        let was_open = self.is_open(index);
        let nd_index = coords_of(index, self.cols).to_nd_index();
        self.tiles[nd_index] = true;

        if self.has_bomb(index) {
            log::debug!("Opened mine at {}, revealing all {} mines", index, self.mines.len());
            for &mine in &self.mines {
                self.tiles[coords_of(mine, self.cols).to_nd_index()] = true;
            }
            return Ok(RevealOutcome::HitMine);
        }

        let opened = CellCount::from(!was_open) + self.flood_fill(index);

        Ok(if opened > 0 {
            RevealOutcome::Revealed
        } else {
            RevealOutcome::NoChange
        })
    }

    /// Breadth-first reveal seeded with the neighbors of `start`, returns how many cells were newly opened.
    fn flood_fill(&mut self, start: CellIndex) -> CellCount {
        let mut opened = 0;
        let mut visited = BTreeSet::from([start]);
        let mut to_visit: VecDeque<_> = self.neighbors(start).collect();

        while let Some(index) = to_visit.pop_front() {
            if !visited.insert(index) {
                continue;
            }

            if self.has_bomb(index) {
                continue;
            }

            let nd_index = coords_of(index, self.cols).to_nd_index();
            if !self.tiles[nd_index] {
                self.tiles[nd_index] = true;
                opened += 1;
            }

            if self.bombs_in_vicinity(index) == 0 {
                to_visit.extend(
                    self.neighbors(index)
                        .filter(|neighbor| !visited.contains(neighbor)),
                );
            }
        }

        log::trace!("Flood fill from {} opened {} cells", start, opened);
        opened
    }
}

impl<R: RandomSource> MineField<R> {
    /// Creates a board and places `config.mines` random mines on it.
    pub fn from_config(config: GameConfig, source: R) -> Result<Self> {
        config.validate()?;
        let mut field = Self::with_source(config.size.0, config.size.1, source)?;
        field.init_bombs(config.mines)?;
        Ok(field)
    }

    /// Replaces the mines with `amount` randomly placed ones and clears all flags.
    ///
    /// Open-state is left alone. Asking for more mines than cells fails with [`GameError::TooManyMines`] and keeps the
    /// current mines and flags.
    pub fn init_bombs(&mut self, amount: CellCount) -> Result<()> {
        let size = self.size();
        let mines = draw_mine_set(&mut self.source, size, amount)?;
        log::debug!(
            "Placed {} mines on {}x{} board",
            amount,
            self.rows,
            self.cols
        );

        self.mines = mines;
        self.flags.clear();
        Ok(())
    }

    /// Closes every cell and re-places the same number of mines.
    pub fn reset(&mut self) -> Result<()> {
        self.tiles.fill(false);
        self.init_bombs(self.mine_count())
    }
}

fn linear_index((row, col): Coord2, cols: Coord) -> CellIndex {
    CellIndex::from(col) + CellIndex::from(row) * CellIndex::from(cols)
}

fn coords_of(index: CellIndex, cols: Coord) -> Coord2 {
    let cols = CellIndex::from(cols);
    ((index / cols) as Coord, (index % cols) as Coord)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn field(rows: Coord, cols: Coord, mines: &[CellIndex]) -> MineField {
        MineField::with_mines(rows, cols, mines, SmallRng::seed_from_u64(0)).unwrap()
    }

    fn open_cells(field: &MineField) -> BTreeSet<CellIndex> {
        (0..field.size()).filter(|&i| field.is_open(i)).collect()
    }

    #[test]
    fn coordinates_round_trip_over_whole_board() {
        let field = field(3, 5, &[]);

        for index in 0..field.size() {
            let (row, col) = field.coordinates(index).unwrap();
            assert!(row < 3 && col < 5);
            assert_eq!(field.cell_index(row, col), index);
        }
        assert_eq!(field.cell_index(2, 1), 11);
        assert_eq!(field.coordinates(7), Some((1, 2)));
        assert_eq!(field.coordinates(15), None);
        assert_eq!(field.coordinates(CellIndex::MAX), None);
    }

    #[test]
    fn row_and_col_indices_are_restartable() {
        let field = field(2, 3, &[]);
        let rows = field.row_indices();

        assert_eq!(rows.clone().collect::<Vec<_>>(), [0, 1]);
        assert_eq!(rows.collect::<Vec<_>>(), [0, 1]);
        assert_eq!(field.col_indices().collect::<Vec<_>>(), [0, 1, 2]);
    }

    #[test]
    fn neighbor_counts_by_position() {
        let field = field(4, 4, &[]);

        assert_eq!(field.neighbors(5).count(), 8);
        assert_eq!(field.neighbors(1).count(), 5);
        assert_eq!(field.neighbors(4).count(), 5);
        assert_eq!(field.neighbors(0).count(), 3);
        assert_eq!(field.neighbors(15).count(), 3);
        assert_eq!(field.neighbors(16).count(), 0);

        for index in 0..field.size() {
            assert!(field.neighbors(index).all(|n| n < field.size() && n != index));
        }
    }

    #[test]
    fn neighbors_are_reported_in_offset_order() {
        let field = field(3, 3, &[]);

        assert_eq!(
            field.neighbors(4).collect::<Vec<_>>(),
            [0, 1, 2, 3, 5, 6, 7, 8]
        );
        assert_eq!(field.neighbors(3).collect::<Vec<_>>(), [0, 1, 4, 6, 7]);
    }

    #[test]
    fn bombs_in_vicinity_counts_adjacent_mines() {
        let field = field(4, 4, &[0, 5]);

        assert_eq!(field.bombs_in_vicinity(1), 2);
        assert_eq!(field.bombs_in_vicinity(10), 1);
        assert_eq!(field.bombs_in_vicinity(15), 0);
        assert_eq!(field.bombs_in_vicinity(0), 1);
    }

    #[test]
    fn scenario_flood_then_hit_mine() {
        let mut field = field(4, 4, &[0, 5]);

        assert_eq!(field.open(15), Ok(RevealOutcome::Revealed));
        assert_eq!(
            open_cells(&field),
            BTreeSet::from([2, 3, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15])
        );
        assert!(!field.lost());

        assert_eq!(field.open(5), Ok(RevealOutcome::HitMine));
        assert!(field.lost());
        assert!(field.is_open(0));
        assert!(field.is_open(5));
        assert!(!field.is_open(1));
        assert!(!field.is_open(4));
    }

    #[test]
    fn flood_fill_region_is_closed() {
        let mut field = field(6, 7, &[3, 17, 30, 31]);

        field.open(41).unwrap();

        for index in open_cells(&field) {
            assert!(!field.has_bomb(index));
            if field.bombs_in_vicinity(index) == 0 {
                assert!(field.neighbors(index).all(|n| field.is_open(n)));
            }
        }
    }

    #[test]
    fn numbered_cell_cascades_through_zero_neighbors() {
        let mut field = field(4, 4, &[0, 5]);
        assert_eq!(field.bombs_in_vicinity(10), 1);

        assert_eq!(field.open(10), Ok(RevealOutcome::Revealed));

        assert_eq!(
            open_cells(&field),
            BTreeSet::from([2, 3, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15])
        );
        assert!(!field.lost());
    }

    #[test]
    fn numbered_cell_opens_safe_neighbors() {
        let mut field = field(2, 3, &[0, 5]);

        assert_eq!(field.open(1), Ok(RevealOutcome::Revealed));

        assert_eq!(open_cells(&field), BTreeSet::from([1, 2, 3, 4]));
        assert!(!field.is_open(0));
        assert!(!field.is_open(5));
    }

    #[test]
    fn reopening_is_no_change() {
        let mut field = field(3, 3, &[8]);

        assert_eq!(field.open(0), Ok(RevealOutcome::Revealed));
        assert_eq!(field.open(0), Ok(RevealOutcome::NoChange));
        assert_eq!(field.open(4), Ok(RevealOutcome::NoChange));
        assert_eq!(field.open_count(), 8);
    }

    #[test]
    fn mine_reveal_leaves_safe_cells_closed() {
        let mut field = field(3, 3, &[0, 8]);

        assert_eq!(field.open(8), Ok(RevealOutcome::HitMine));

        assert_eq!(open_cells(&field), BTreeSet::from([0, 8]));
        assert!(field.lost());
    }

    #[test]
    fn flags_do_not_stop_flood_fill() {
        let mut field = field(3, 3, &[]);
        field.flag(2).unwrap();

        field.open(0).unwrap();

        assert_eq!(field.open_count(), 9);
        assert!(field.has_flag(2));
    }

    #[test]
    fn flag_and_unflag() {
        let mut field = field(2, 2, &[0]);
        field.open(3).unwrap();

        assert_eq!(field.flag(3), Ok(MarkOutcome::Changed));
        assert_eq!(field.flag(3), Ok(MarkOutcome::NoChange));
        assert!(field.has_flag(3));
        assert_eq!(field.unflag(3), Ok(MarkOutcome::Changed));
        assert_eq!(field.unflag(3), Ok(MarkOutcome::NoChange));
        assert_eq!(field.flag_count(), 0);
    }

    #[test]
    fn out_of_range_indices() {
        let mut field = field(2, 2, &[0]);

        assert_eq!(field.open(4), Err(GameError::InvalidIndex));
        assert_eq!(field.flag(4), Err(GameError::InvalidIndex));
        assert!(!field.is_open(4));
        assert!(!field.has_bomb(4));
        assert!(!field.has_flag(4));
        assert!(
            MineField::with_mines(2, 2, &[4], SmallRng::seed_from_u64(0)).is_err()
        );
    }

    #[test]
    fn empty_board_is_rejected() {
        assert_eq!(
            MineField::with_seed(0, 4, 1).map(|_| ()),
            Err(GameError::EmptyBoard)
        );
    }

    #[test]
    fn init_bombs_places_exact_count_and_clears_flags() {
        let mut field = MineField::with_seed(9, 9, 7).unwrap();
        field.flag(3).unwrap();

        field.init_bombs(10).unwrap();

        assert_eq!(field.mine_count(), 10);
        assert_eq!(field.flag_count(), 0);
        assert_eq!((0..81).filter(|&i| field.has_bomb(i)).count(), 10);
    }

    #[test]
    fn init_bombs_keeps_open_state() {
        let mut field = field(3, 3, &[]);
        field.open(0).unwrap();

        field.init_bombs(2).unwrap();

        assert_eq!(field.open_count(), 9);
    }

    #[test]
    fn init_bombs_rejects_overfull_board() {
        let mut field = field(2, 2, &[1]);
        field.flag(2).unwrap();

        assert_eq!(
            field.init_bombs(5),
            Err(GameError::TooManyMines {
                requested: 5,
                capacity: 4
            })
        );
        assert!(field.has_bomb(1));
        assert!(field.has_flag(2));

        field.init_bombs(4).unwrap();
        assert_eq!(field.mine_count(), 4);
    }

    #[test]
    fn reset_closes_everything_and_keeps_density() {
        let mut field = MineField::with_seed(5, 5, 3).unwrap();
        field.init_bombs(6).unwrap();
        field.open(12).unwrap();
        field.flag(0).unwrap();

        field.reset().unwrap();

        assert_eq!(field.open_count(), 0);
        assert_eq!(field.mine_count(), 6);
        assert_eq!(field.flag_count(), 0);
        assert!(!field.lost());
    }

    #[test]
    fn from_config_places_mines() {
        let field =
            MineField::from_config(GameConfig::new((8, 10), 12), SmallRng::seed_from_u64(9))
                .unwrap();

        assert_eq!(field.config(), GameConfig::new_unchecked((8, 10), 12));
        assert_eq!(field.size(), 80);
        assert_eq!(field.open_count(), 0);
    }
}
