use std::io::{self, Write};

use crate::board::{Board, Position};
use crate::direction::Direction;

/// Gets notified about every jump the solver tries. Observers only watch, they can't influence the search.
pub trait SolveObserver {
    /// Called after the peg at `from` jumped in `direction`. `board` is the resulting layout.
    fn on_apply(&mut self, _board: &Board, _from: Position, _direction: Direction) {}

    /// Called after that jump was reverted because it led to a dead end.
    fn on_undo(&mut self, _board: &Board, _from: Position, _direction: Direction) {}
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl SolveObserver for NoopObserver {}

/// Prints every tried jump and every revert to a writer.
pub struct VerboseObserver<W: Write> {
    out: W,

    // First write error. Once set, nothing more gets written.
    error: Option<io::Error>,
}

impl<W: Write> VerboseObserver<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Returns the writer, or the first error that happened while writing to it.
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.out),
        }
    }

    fn write(&mut self, write: impl FnOnce(&mut W) -> io::Result<()>) {
        if self.error.is_none() {
            if let Err(error) = write(&mut self.out) {
                self.error = Some(error);
            }
        }
    }
}

impl<W: Write> SolveObserver for VerboseObserver<W> {
    fn on_apply(&mut self, board: &Board, _from: Position, direction: Direction) {
        self.write(|out| write!(out, "\n{direction}\n{board}"));
    }

    fn on_undo(&mut self, _board: &Board, _from: Position, _direction: Direction) {
        self.write(|out| write!(out, "\nDEAD MOVE! REVERTING.\n\n"));
    }
}
