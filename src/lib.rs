mod board;
mod direction;
mod solver;
mod survey;

pub use board::{triangle_positions, Board, BoardError, Cell, Position, MIN_SIZE};
pub use direction::Direction;
pub use solver::{
    solve, solve_with_observer, Move, NoopObserver, Solution, SolveObserver, Step,
    VerboseObserver, MAX_REMAINING_PEGS,
};
pub use survey::{survey, SurveyEntry};
