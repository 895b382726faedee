//! Fixed-size Game of Life grid.
//!
//! Cells outside the grid are absent: boundary cells simply have fewer than
//! eight neighbours.

use bevy::log::trace;

use crate::error::{GridError, GridResult};

#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    /// current generation, row-major
    cells: Vec<bool>,
    /// scratch buffer for the next generation, swapped in by `advance`
    next: Vec<bool>,
}

impl Grid {
    /// Creates a `rows` x `cols` grid with every cell dead.
    pub fn new(rows: usize, cols: usize) -> GridResult<Self> {
        let len = rows
            .checked_mul(cols)
            .filter(|&len| len != 0 && len <= isize::MAX as usize)
            .ok_or(GridError::InvalidDimension { rows, cols })?;
        Ok(Self {
            rows,
            cols,
            cells: vec![false; len],
            next: vec![false; len],
        })
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Overwrites every cell with an independent fair coin flip drawn from `rng`.
    pub fn randomize(&mut self, rng: &mut fastrand::Rng) {
        for cell in self.cells.iter_mut() {
            *cell = rng.bool();
        }
    }

    /// Kills every cell.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    pub fn get_cell(&self, row: usize, col: usize) -> GridResult<bool> {
        let idx = self.idx(row, col)?;
        Ok(self.cells[idx])
    }

    pub fn set_cell(&mut self, row: usize, col: usize, alive: bool) -> GridResult<()> {
        let idx = self.idx(row, col)?;
        self.cells[idx] = alive;
        Ok(())
    }

    /// Flips a single cell, returning its new state.
    pub fn toggle_cell(&mut self, row: usize, col: usize) -> GridResult<bool> {
        let idx = self.idx(row, col)?;
        self.cells[idx] = !self.cells[idx];
        Ok(self.cells[idx])
    }

    /// Counts the live cells in the Moore neighbourhood of `(row, col)`,
    /// excluding the cell itself.
    pub fn count_live_neighbors(&self, row: usize, col: usize) -> GridResult<u8> {
        self.idx(row, col)?;
        Ok(neighbours_of(&self.cells, self.rows, self.cols, row, col))
    }

    /// Advances the grid by one generation.
    ///
    /// Every neighbour count is taken from the current generation; the result
    /// is built in the scratch buffer and swapped in once complete.
    pub fn advance(&mut self) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let idx = row * self.cols + col;
                let n = neighbours_of(&self.cells, self.rows, self.cols, row, col);
                self.next[idx] = matches!((self.cells[idx], n), (true, 2) | (_, 3));
            }
        }
        std::mem::swap(&mut self.cells, &mut self.next);
        trace!(population = self.population(), "advanced grid");
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|alive| **alive).count()
    }

    /// Row-major snapshot of the grid as `(row, col, alive)` triples.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, bool)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, &alive)| (idx / cols, idx % cols, alive))
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> GridResult<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(GridError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }
}

// the scratch buffer carries no state between calls
impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions() == other.dimensions() && self.cells == other.cells
    }
}

impl Eq for Grid {}

/// Live neighbour count of an in-bounds cell.
#[inline]
fn neighbours_of(cells: &[bool], rows: usize, cols: usize, row: usize, col: usize) -> u8 {
    let row_range = row.saturating_sub(1)..=(row + 1).min(rows - 1);
    let col_range = col.saturating_sub(1)..=(col + 1).min(cols - 1);
    row_range
        .flat_map(|r| col_range.clone().map(move |c| (r, c)))
        .filter(|&pos| pos != (row, col))
        .filter(|&(r, c)| cells[r * cols + c])
        .count() as u8
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    fn grid_with(rows: usize, cols: usize, alive: &[(usize, usize)]) -> Grid {
        let mut grid = Grid::new(rows, cols).unwrap();
        for &(r, c) in alive {
            grid.set_cell(r, c, true).unwrap();
        }
        grid
    }

    fn alive_cells(grid: &Grid) -> Vec<(usize, usize)> {
        grid.cells()
            .filter(|&(_, _, alive)| alive)
            .map(|(r, c, _)| (r, c))
            .collect()
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert_eq!(
            Err(GridError::InvalidDimension { rows: 0, cols: 5 }),
            Grid::new(0, 5)
        );
        assert_eq!(
            Err(GridError::InvalidDimension { rows: 5, cols: 0 }),
            Grid::new(5, 0)
        );
        assert!(Grid::new(0, 0).is_err());
    }

    #[test]
    fn overflowing_dimensions_are_rejected() {
        assert_eq!(
            Err(GridError::InvalidDimension {
                rows: 1 << 63,
                cols: 2
            }),
            Grid::new(1 << 63, 2)
        );
        assert!(Grid::new(usize::MAX, usize::MAX).is_err());
        assert!(Grid::new(2, usize::MAX).is_err());
    }

    #[test]
    fn set_then_get() {
        let mut grid = Grid::new(3, 4).unwrap();
        grid.set_cell(2, 3, true).unwrap();
        assert_eq!(Ok(true), grid.get_cell(2, 3));
        assert_eq!(vec![(2, 3)], alive_cells(&grid));

        grid.set_cell(2, 3, false).unwrap();
        assert_eq!(Ok(false), grid.get_cell(2, 3));
        assert_eq!(0, grid.population());
    }

    #[test]
    fn toggle_flips_a_single_cell() {
        let mut grid = Grid::new(2, 2).unwrap();
        assert_eq!(Ok(true), grid.toggle_cell(1, 0));
        assert_eq!(vec![(1, 0)], alive_cells(&grid));
        assert_eq!(Ok(false), grid.toggle_cell(1, 0));
        assert_eq!(0, grid.population());
    }

    #[test]
    fn corner_neighbours() {
        let grid = grid_with(3, 3, &[(0, 1), (1, 0), (1, 1)]);
        assert_eq!(Ok(3), grid.count_live_neighbors(0, 0));
        // opposite corner only touches the centre
        assert_eq!(Ok(1), grid.count_live_neighbors(2, 2));
    }

    #[test]
    fn cell_never_counts_itself() {
        let full = grid_with(
            3,
            3,
            &(0..3).flat_map(|r| (0..3).map(move |c| (r, c))).collect::<Vec<_>>(),
        );
        assert_eq!(Ok(8), full.count_live_neighbors(1, 1));
        assert_eq!(Ok(3), full.count_live_neighbors(0, 0));
        assert_eq!(Ok(5), full.count_live_neighbors(0, 1));

        let lonely = grid_with(3, 3, &[(1, 1)]);
        assert_eq!(Ok(0), lonely.count_live_neighbors(1, 1));
    }

    #[test]
    fn single_cell_grid() {
        let mut grid = grid_with(1, 1, &[(0, 0)]);
        assert_eq!(Ok(0), grid.count_live_neighbors(0, 0));
        grid.advance();
        assert_eq!(Ok(false), grid.get_cell(0, 0));
    }

    #[test]
    fn blinker_oscillates() {
        let horizontal = [(1, 0), (1, 1), (1, 2)];
        let mut grid = grid_with(3, 3, &horizontal);

        grid.advance();
        assert_eq!(vec![(0, 1), (1, 1), (2, 1)], alive_cells(&grid));

        grid.advance();
        assert_eq!(horizontal.to_vec(), alive_cells(&grid));
    }

    #[test]
    fn block_is_still_life() {
        let mut grid = grid_with(4, 4, &[(1, 1), (1, 2), (2, 1), (2, 2)]);
        let before = grid.clone();
        for _ in 0..3 {
            grid.advance();
            assert_eq!(before, grid);
        }
    }

    #[test]
    fn glider_moves_diagonally() {
        let mut grid = grid_with(6, 6, &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)]);
        for _ in 0..4 {
            grid.advance();
        }
        assert_eq!(
            vec![(1, 2), (2, 3), (3, 1), (3, 2), (3, 3)],
            alive_cells(&grid)
        );
    }

    #[test]
    fn plus_turns_into_ring() {
        let mut grid = grid_with(3, 3, &[(0, 1), (1, 0), (1, 1), (1, 2), (2, 1)]);
        grid.advance();
        // centre had four neighbours, corners three, arms three
        assert_eq!(
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)],
            alive_cells(&grid)
        );
    }

    #[test]
    fn isolated_pair_dies() {
        let mut grid = grid_with(4, 4, &[(1, 1), (1, 2)]);
        grid.advance();
        assert_eq!(0, grid.population());
    }

    #[test]
    fn out_of_bounds_is_rejected_without_side_effects() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut grid = Grid::new(4, 5).unwrap();
        grid.randomize(&mut rng);
        let snapshot: Vec<_> = grid.cells().collect();

        let oob = GridError::OutOfBounds {
            row: 4,
            col: 0,
            rows: 4,
            cols: 5,
        };
        assert_eq!(Err(oob), grid.get_cell(4, 0));
        assert_eq!(Err(oob), grid.set_cell(4, 0, true));
        assert_eq!(Err(oob), grid.toggle_cell(4, 0));
        assert_eq!(Err(oob), grid.count_live_neighbors(4, 0));
        assert!(grid.set_cell(0, 5, true).is_err());
        assert!(grid.toggle_cell(usize::MAX, usize::MAX).is_err());
        assert!(grid.count_live_neighbors(0, usize::MAX).is_err());

        assert_eq!(snapshot, grid.cells().collect::<Vec<_>>());
    }

    #[test]
    fn randomize_is_reproducible() {
        let mut a = Grid::new(26, 40).unwrap();
        let mut b = Grid::new(26, 40).unwrap();
        a.randomize(&mut fastrand::Rng::with_seed(42));
        b.randomize(&mut fastrand::Rng::with_seed(42));
        assert_eq!(alive_cells(&a), alive_cells(&b));
        // 1040 fair coin flips landing all on one side would be remarkable
        assert!(a.population() > 0 && a.population() < 26 * 40);
    }

    #[test]
    fn clear_kills_everything() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.randomize(&mut fastrand::Rng::with_seed(1));
        grid.clear();
        assert_eq!(0, grid.population());
    }

    proptest! {
        #[test]
        fn fresh_grid_is_dead(rows in 1..64_usize, cols in 1..64_usize) {
            let grid = Grid::new(rows, cols).unwrap();
            prop_assert_eq!((rows, cols), grid.dimensions());
            prop_assert_eq!(rows * cols, grid.cells().count());
            prop_assert!(grid.cells().all(|(_, _, alive)| !alive));
        }

        #[test]
        fn dead_grid_stays_dead(rows in 1..32_usize, cols in 1..32_usize, steps in 0..8_usize) {
            let mut grid = Grid::new(rows, cols).unwrap();
            for _ in 0..steps {
                grid.advance();
            }
            prop_assert_eq!(0, grid.population());
        }

        #[test]
        fn advance_keeps_dimensions(
            rows in 1..32_usize,
            cols in 1..32_usize,
            seed in any::<u64>(),
        ) {
            let mut grid = Grid::new(rows, cols).unwrap();
            grid.randomize(&mut fastrand::Rng::with_seed(seed));
            grid.advance();
            prop_assert_eq!((rows, cols), grid.dimensions());
            prop_assert_eq!(rows * cols, grid.cells().count());
        }

        /// Compares `advance` against the rule applied to an untouched copy.
        #[test]
        fn advance_reads_a_single_snapshot(
            rows in 1..24_usize,
            cols in 1..24_usize,
            seed in any::<u64>(),
        ) {
            let mut grid = Grid::new(rows, cols).unwrap();
            grid.randomize(&mut fastrand::Rng::with_seed(seed));
            let before = grid.clone();
            grid.advance();
            for (r, c, alive) in grid.cells() {
                let n = before.count_live_neighbors(r, c).unwrap();
                let was_alive = before.get_cell(r, c).unwrap();
                prop_assert_eq!(alive, n == 3 || (was_alive && n == 2));
            }
        }

        #[test]
        fn set_leaves_other_cells_alone(
            rows in 1..16_usize,
            cols in 1..16_usize,
            seed in any::<u64>(),
            alive in any::<bool>(),
            pick in any::<prop::sample::Index>(),
        ) {
            let mut grid = Grid::new(rows, cols).unwrap();
            grid.randomize(&mut fastrand::Rng::with_seed(seed));
            let before: Vec<_> = grid.cells().collect();
            let (row, col, _) = before[pick.index(before.len())];
            grid.set_cell(row, col, alive).unwrap();
            prop_assert_eq!(Ok(alive), grid.get_cell(row, col));
            for ((r, c, now), (_, _, was)) in grid.cells().zip(before) {
                if (r, c) != (row, col) {
                    prop_assert_eq!(was, now);
                }
            }
        }
    }
}
