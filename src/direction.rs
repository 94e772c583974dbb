use strum::{Display, VariantArray};

use crate::board::Position;

/// One of the six directions a peg can jump in on a triangular board.
///
/// The declaration order is the scan order used by [crate::Board::available_moves]
/// and therefore by the solver. Don't reorder the variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, VariantArray)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    UpLeft,
    UpRight,
    Left,
    Right,
    DownLeft,
    DownRight,
}

impl Direction {
    /// The (row, column) delta of one step in this direction.
    /// The jumped-over peg is one step away, the landing cell two steps.
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::UpLeft => (-1, -1),
            Self::UpRight => (-1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
            Self::DownLeft => (1, 0),
            Self::DownRight => (1, 1),
        }
    }

    /// Position `steps` cells away from `from`, or `None` if that would leave the non-negative quadrant.
    pub fn offset(self, from: Position, steps: isize) -> Option<Position> {
        let (d_row, d_col) = self.delta();
        Some(Position {
            row: from.row.checked_add_signed(d_row * steps)?,
            col: from.col.checked_add_signed(d_col * steps)?,
        })
    }
}
