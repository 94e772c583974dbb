use rayon::prelude::*;

use crate::board::{triangle_positions, Board, BoardError, Position, MIN_SIZE};
use crate::solver::solve;

/// Outcome of solving a board of one size with the hole at `hole`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurveyEntry {
    pub hole: Position,
    pub solved: bool,
    pub best_run: Option<usize>,
    pub num_moves: usize,
}

/// Solves a board of side `size` once for every possible hole position.
/// Every hole gets its own independent search. Entries are in scan order of the holes.
pub fn survey(size: usize) -> Result<Vec<SurveyEntry>, BoardError> {
    if size < MIN_SIZE {
        return Err(BoardError::SizeTooSmall { size });
    }
    let holes: Vec<Position> = triangle_positions(size).collect();
    holes
        .into_par_iter()
        .map(|hole| -> Result<SurveyEntry, BoardError> {
            let solution = solve(Board::new(size, hole)?);
            Ok(SurveyEntry {
                hole,
                solved: solution.is_solved(),
                best_run: solution.best_run(),
                num_moves: solution.moves().len(),
            })
        })
        .collect()
}
