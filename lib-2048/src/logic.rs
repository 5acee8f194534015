use log::trace;
use rand::Rng;

use crate::{
    error::{Error, Result},
    grid::{Direction, Grid},
};

/// Result of applying one move to a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slide<const N: usize> {
    pub grid: Grid<N>,
    pub score_delta: u64,
    pub changed: bool,
}

/// Slides one row to the left in place, merging equal neighbours, and returns
/// the score gained.
///
/// A tile produced by a merge never merges again in the same move, so
/// `[2, 2, 2, 2]` becomes `[4, 4, 0, 0]`.
pub fn slide_row<const N: usize>(row: &mut [u32; N]) -> u64 {
    let mut score = 0;
    // Slots before `occupied` are settled; `merge` may still absorb an equal tile.
    let mut occupied = 0;
    let mut merge: Option<usize> = None;

    for i in 0..N {
        let cell = row[i];

        if cell == 0 {
            continue;
        }

        match merge {
            Some(target) if row[target] == cell => {
                row[target] += cell;
                score += u64::from(row[target]);
                row[i] = 0;
                merge = Some(target + 1);
            }
            _ => {
                row[i] = 0;
                row[occupied] = cell;
                merge = Some(occupied);
                occupied += 1;
            }
        }
    }

    score
}

pub fn slide<const N: usize>(grid: &Grid<N>, direction: Direction) -> Slide<N> {
    let mut canonical = direction.canonicalize(grid);

    let score_delta: u64 = canonical.rows_mut().iter_mut().map(slide_row).sum();

    let new_grid = direction.restore(&canonical);

    // A merge always changes the grid, so a non-zero score settles it early.
    if score_delta == 0 && new_grid == *grid {
        trace!("{direction} leaves the grid unchanged");

        Slide {
            grid: *grid,
            score_delta: 0,
            changed: false,
        }
    } else {
        Slide {
            grid: new_grid,
            score_delta,
            changed: true,
        }
    }
}

/// Returns true when the grid is full and no two neighbours, in a row or a
/// column, hold the same value.
pub fn is_terminal<const N: usize>(grid: &Grid<N>) -> bool {
    [*grid, grid.transpose()].iter().all(|orientation| {
        orientation.rows().iter().all(|row| {
            row.iter().all(|&cell| cell != 0) && row.windows(2).all(|pair| pair[0] != pair[1])
        })
    })
}

/// Places a 2 (nine times in ten) or a 4 on an empty cell chosen uniformly at
/// random, returning its position and value.
///
/// Cells are sampled over the whole grid until an empty one comes up.
pub fn place_random_tile<const N: usize>(
    grid: &mut Grid<N>,
    rng: &mut impl Rng,
) -> Result<(usize, usize, u32)> {
    if grid.is_full() {
        return Err(Error::GridFull);
    }

    let value = if rng.gen_range(0..10) == 0 { 4 } else { 2 };

    loop {
        let row = rng.gen_range(0..N);
        let col = rng.gen_range(0..N);

        if grid.get(row, col) == 0 {
            grid.set(row, col, value);

            trace!("placed {value} at ({row}, {col})");

            return Ok((row, col, value));
        }
    }
}
