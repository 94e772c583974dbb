use std::fmt;

use itertools::Itertools;

use crate::board::{Board, Position};
use crate::direction::Direction;

mod observer;
pub use observer::{NoopObserver, SolveObserver, VerboseObserver};

/// A board with at most this many pegs left counts as solved.
pub const MAX_REMAINING_PEGS: usize = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    /// Marks the starting layout.
    Initial,
    Jump { from: Position, direction: Direction },
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Initial => write!(f, "INITIAL"),
            Move::Jump { from, direction } => write!(f, "{direction} from {from}"),
        }
    }
}

/// The layout right after `mv` was made.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    board: Board,
    mv: Move,
}

impl Step {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn mv(&self) -> Move {
        self.mv
    }
}

/// What [solve] found out about a board.
#[derive(Clone, Debug)]
pub struct Solution {
    solved: bool,
    steps: Vec<Step>,
    best_run: Option<usize>,
    board: Board,
}

impl Solution {
    /// Whether the search got down to [MAX_REMAINING_PEGS] pegs.
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Steps in the order they were recorded: the initial layout first, then the
    /// jumps of the winning path from the last one back to the first one.
    /// If the board wasn't solved, this only holds the initial layout.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The initial layout followed by the winning path in the order the jumps are played.
    pub fn steps_in_play_order(&self) -> impl Iterator<Item = &Step> + '_ {
        let (initial, jumps) = self
            .steps
            .split_first()
            .expect("the initial step is always recorded");
        std::iter::once(initial).chain(jumps.iter().rev())
    }

    /// The jumps of the winning path in the order they are played.
    pub fn moves(&self) -> Vec<(Position, Direction)> {
        self.steps_in_play_order()
            .filter_map(|step| match step.mv {
                Move::Initial => None,
                Move::Jump { from, direction } => Some((from, direction)),
            })
            .collect_vec()
    }

    /// Lowest number of pegs left on any explored branch, `None` if no jump was ever tried.
    pub fn best_run(&self) -> Option<usize> {
        self.best_run
    }

    /// The board after the search. This is the final layout of the winning path,
    /// or the starting layout if no solution was found.
    pub fn final_board(&self) -> &Board {
        &self.board
    }
}

/// Solves `board` with a depth-first search that stops at the first solution.
pub fn solve(board: Board) -> Solution {
    solve_with_observer(board, &mut NoopObserver)
}

pub fn solve_with_observer<O: SolveObserver + ?Sized>(mut board: Board, observer: &mut O) -> Solution {
    let mut search = Search {
        steps: vec![Step {
            board: board.snapshot(),
            mv: Move::Initial,
        }],
        best_run: None,
        observer,
    };
    let solved = board.count_pegs() <= MAX_REMAINING_PEGS || _solve(&mut board, &mut search);
    Solution {
        solved,
        steps: search.steps,
        best_run: search.best_run,
        board,
    }
}

struct Search<'a, O: ?Sized> {
    steps: Vec<Step>,
    best_run: Option<usize>,
    observer: &'a mut O,
}

impl<O: ?Sized> Search<'_, O> {
    fn record_pegs(&mut self, pegs: usize) {
        self.best_run = Some(self.best_run.map_or(pegs, |best| best.min(pegs)));
    }

    fn push_jump(&mut self, board: Board, from: Position, direction: Direction) {
        self.steps.push(Step {
            board,
            mv: Move::Jump { from, direction },
        });
    }
}

// Invariant:
//  - When `_solve` returns false, `board` is unchanged. Any jumps made during execution have been undone.
//  - When it returns true, `board` holds the final layout and the steps of the path are recorded, last jump first.
fn _solve<O: SolveObserver + ?Sized>(board: &mut Board, search: &mut Search<'_, O>) -> bool {
    for from in board.positions() {
        if !board.is_peg(from) {
            continue;
        }

        let moves = board.available_moves(from).collect_vec();
        for direction in moves {
            board.apply_move(from, direction);
            let snapshot = board.snapshot();
            search.observer.on_apply(board, from, direction);

            if _solve(board, search) {
                search.push_jump(snapshot, from, direction);
                return true;
            }

            // No further jump from here leads to a solution
            let pegs = board.count_pegs();
            search.record_pegs(pegs);
            if pegs <= MAX_REMAINING_PEGS {
                search.push_jump(snapshot, from, direction);
                return true;
            }

            board.undo_move(from, direction);
            search.observer.on_undo(board, from, direction);
        }
    }

    false
}
