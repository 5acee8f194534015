use std::fmt;

pub const SIZE: usize = 4;

/// The playing field used by the game.
pub type Board = Grid<SIZE>;

/// Square matrix of tile values, `0` meaning an empty cell.
///
/// Every non-zero cell holds a power of two no smaller than 2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Grid<const N: usize = SIZE> {
    cells: [[u32; N]; N],
}

impl<const N: usize> Default for Grid<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Grid<N> {
    pub const fn new() -> Self {
        Self { cells: [[0; N]; N] }
    }

    pub const fn from_rows(cells: [[u32; N]; N]) -> Self {
        Self { cells }
    }

    pub const fn rows(&self) -> &[[u32; N]; N] {
        &self.cells
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [[u32; N]; N] {
        &mut self.cells
    }

    pub const fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row][col]
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: u32) {
        self.cells[row][col] = value;
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&cell| cell == 0).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|&cell| cell != 0)
    }

    pub fn max_tile(&self) -> u32 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Reverses every row.
    pub fn mirror(&self) -> Self {
        let mut cells = self.cells;

        for row in &mut cells {
            row.reverse();
        }

        Self { cells }
    }

    /// Swaps rows and columns.
    pub fn transpose(&self) -> Self {
        let mut cells = [[0; N]; N];

        for (i, row) in self.cells.iter().enumerate() {
            for (j, &cell) in row.iter().enumerate() {
                cells[j][i] = cell;
            }
        }

        Self { cells }
    }

    /// Reflects across the anti-diagonal: the transpose of the grid turned by
    /// a half rotation.
    pub fn transpose_rotate(&self) -> Self {
        let mut rotated = self.mirror();
        rotated.cells.reverse();

        rotated.transpose()
    }
}

impl<const N: usize> fmt::Display for Grid<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i != 0 {
                f.write_str("\n")?;
            }

            for (j, &cell) in row.iter().enumerate() {
                if j != 0 {
                    f.write_str(" ")?;
                }

                if cell == 0 {
                    write!(f, "{:>5}", ".")?;
                } else {
                    write!(f, "{cell:>5}")?;
                }
            }
        }

        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Right = 2,
    Left = 3,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Right, Self::Left];

    pub fn iter() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter()
    }

    /// Reorients `grid` so that moving in this direction becomes a move to the
    /// left.
    pub fn canonicalize<const N: usize>(self, grid: &Grid<N>) -> Grid<N> {
        match self {
            Self::Left => *grid,
            Self::Right => grid.mirror(),
            Self::Up => grid.transpose(),
            Self::Down => grid.transpose_rotate(),
        }
    }

    /// Undoes [`Direction::canonicalize`]. Each transform is its own inverse.
    pub fn restore<const N: usize>(self, grid: &Grid<N>) -> Grid<N> {
        self.canonicalize(grid)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Right => "right",
            Self::Left => "left",
        })
    }
}
