use std::fmt;
use std::str::FromStr;

use bitvec::prelude::*;
use itertools::Itertools;
use rand::Rng;
use strum::VariantArray;
use thiserror::Error;

use crate::direction::Direction;

/// Smallest side length a [Board] can have.
pub const MIN_SIZE: usize = 3;

const PEG_SYMBOL: &str = "*";
const EMPTY_SYMBOL: &str = "o";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BoardError {
    #[error("Board size {size} is too small, it must be at least {MIN_SIZE}")]
    SizeTooSmall { size: usize },

    #[error("Hole {hole} is outside of a triangle with side {size}")]
    HoleOutsideTriangle { hole: Position, size: usize },

    #[error("Invalid board layout in row {row}: {reason}")]
    Parse { row: usize, reason: String },
}

/// A zero-based `(row, col)` position. Whether it lies on a board is decided by [Board::contains].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    OutOfBoard,
    Empty,
    Peg,
}

/// All positions of a triangle with side `size`, row by row, left to right.
pub fn triangle_positions(size: usize) -> impl Iterator<Item = Position> {
    (0..size).flat_map(|row| (0..=row).map(move |col| Position::new(row, col)))
}

const fn num_cells(size: usize) -> usize {
    size * (size + 1) / 2
}

/// A triangular peg solitaire board. Row `r` has the `r + 1` cells `0..=r`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,

    // One bit per cell of the triangle, set if the cell holds a peg.
    // Cells are ordered by rows, first left-to-right, then top-to-bottom.
    pegs: BitVec,
}

impl Board {
    /// Creates a board of side `size` with every cell pegged except `hole`.
    pub fn new(size: usize, hole: Position) -> Result<Self, BoardError> {
        if size < MIN_SIZE {
            return Err(BoardError::SizeTooSmall { size });
        }
        let mut board = Self {
            size,
            pegs: bitvec![1; num_cells(size)],
        };
        if !board.contains(hole) {
            return Err(BoardError::HoleOutsideTriangle { hole, size });
        }
        board.set(hole, false);
        Ok(board)
    }

    /// Creates a board of side `size` with the hole at a uniformly chosen cell.
    pub fn with_random_hole(size: usize, rng: &mut impl Rng) -> Result<Self, BoardError> {
        if size < MIN_SIZE {
            return Err(BoardError::SizeTooSmall { size });
        }
        let index = rng.gen_range(0..num_cells(size));
        let hole = triangle_positions(size)
            .nth(index)
            .expect("index is below the number of cells");
        Self::new(size, hole)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.col <= pos.row && pos.row < self.size
    }

    /// All positions of this board in scan order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        triangle_positions(self.size)
    }

    fn index(&self, pos: Position) -> usize {
        assert!(self.contains(pos), "{pos} is outside of the board");
        num_cells(pos.row) + pos.col
    }

    pub fn cell(&self, pos: Position) -> Cell {
        if !self.contains(pos) {
            Cell::OutOfBoard
        } else if self.pegs[self.index(pos)] {
            Cell::Peg
        } else {
            Cell::Empty
        }
    }

    #[inline]
    pub fn is_peg(&self, pos: Position) -> bool {
        self.cell(pos) == Cell::Peg
    }

    #[inline]
    pub fn is_empty(&self, pos: Position) -> bool {
        self.cell(pos) == Cell::Empty
    }

    fn set(&mut self, pos: Position, peg: bool) {
        let index = self.index(pos);
        self.pegs.set(index, peg);
    }

    /// Returns the jumped-over and the landing position of a jump, if both are on the board.
    fn jump_cells(&self, from: Position, direction: Direction) -> Option<(Position, Position)> {
        let over = direction.offset(from, 1).filter(|&p| self.contains(p))?;
        let to = direction.offset(from, 2).filter(|&p| self.contains(p))?;
        Some((over, to))
    }

    /// Whether the peg at `from` may jump in `direction`: it lands on an empty cell
    /// of the board after jumping over a peg.
    pub fn can_jump(&self, from: Position, direction: Direction) -> bool {
        match self.jump_cells(from, direction) {
            Some((over, to)) => self.is_peg(from) && self.is_peg(over) && self.is_empty(to),
            None => false,
        }
    }

    /// The legal jumps of the peg at `from`, in [Direction] declaration order.
    pub fn available_moves(&self, from: Position) -> impl Iterator<Item = Direction> + '_ {
        Direction::VARIANTS
            .iter()
            .copied()
            .filter(move |&direction| self.can_jump(from, direction))
    }

    /// Jumps the peg at `from` in `direction`, removing the peg it jumps over.
    ///
    /// Panics if the jump isn't legal.
    pub fn apply_move(&mut self, from: Position, direction: Direction) {
        assert!(
            self.can_jump(from, direction),
            "Illegal jump {direction} from {from}"
        );
        let (over, to) = self
            .jump_cells(from, direction)
            .expect("legal jumps stay on the board");
        self.set(from, false);
        self.set(over, false);
        self.set(to, true);
    }

    /// Reverts a jump previously made with [Self::apply_move].
    ///
    /// Panics if the board doesn't look like that jump was just made.
    pub fn undo_move(&mut self, from: Position, direction: Direction) {
        let cells = self.jump_cells(from, direction);
        let Some((over, to)) = cells.filter(|&(over, to)| {
            self.is_empty(from) && self.is_empty(over) && self.is_peg(to)
        }) else {
            panic!("Jump {direction} from {from} can't be undone, it wasn't applied");
        };
        self.set(from, true);
        self.set(over, true);
        self.set(to, false);
    }

    #[inline]
    pub fn count_pegs(&self) -> usize {
        self.pegs.count_ones()
    }

    /// An independent copy of the current layout.
    #[inline]
    pub fn snapshot(&self) -> Board {
        self.clone()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            let line = (0..=row)
                .map(|col| match self.cell(Position::new(row, col)) {
                    Cell::Peg => PEG_SYMBOL,
                    _ => EMPTY_SYMBOL,
                })
                .join(" ");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board(size={}, pegs={})", self.size, self.count_pegs())?;
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Board {
    type Err = BoardError;

    /// Parses the layout printed by the [fmt::Display] impl. Blank lines and indentation are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let size = rows.len();
        if size < MIN_SIZE {
            return Err(BoardError::SizeTooSmall { size });
        }

        let mut pegs = BitVec::with_capacity(num_cells(size));
        for (row, line) in rows.into_iter().enumerate() {
            let tokens = line.split_whitespace().collect_vec();
            if tokens.len() != row + 1 {
                return Err(BoardError::Parse {
                    row,
                    reason: format!("expected {} cells, found {}", row + 1, tokens.len()),
                });
            }
            for token in tokens {
                match token {
                    PEG_SYMBOL => pegs.push(true),
                    EMPTY_SYMBOL => pegs.push(false),
                    other => {
                        return Err(BoardError::Parse {
                            row,
                            reason: format!("unknown cell {other:?}"),
                        })
                    }
                }
            }
        }

        Ok(Self { size, pegs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    fn parse(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn new_board() {
        let board = Board::new(3, pos(1, 0)).unwrap();
        assert_eq!(
            parse(
                "
                *
                o *
                * * *
            "
            ),
            board
        );
        assert_eq!(5, board.count_pegs());
        assert_eq!(Cell::Empty, board.cell(pos(1, 0)));
        assert_eq!(Cell::Peg, board.cell(pos(2, 2)));
        assert_eq!(Cell::OutOfBoard, board.cell(pos(0, 1)));
        assert_eq!(Cell::OutOfBoard, board.cell(pos(3, 0)));
    }

    #[test]
    fn new_board_has_one_hole() {
        for size in 3..8 {
            for hole in triangle_positions(size) {
                let board = Board::new(size, hole).unwrap();
                assert_eq!(num_cells(size) - 1, board.count_pegs());
                let holes = board.positions().filter(|&p| board.is_empty(p)).collect_vec();
                assert_eq!(vec![hole], holes);
            }
        }
    }

    #[test]
    fn size_too_small() {
        assert_eq!(
            Err(BoardError::SizeTooSmall { size: 2 }),
            Board::new(2, pos(0, 0))
        );
        assert_eq!(
            Err(BoardError::SizeTooSmall { size: 0 }),
            Board::new(0, pos(0, 0))
        );
    }

    #[test]
    fn hole_outside_triangle() {
        assert_eq!(
            Err(BoardError::HoleOutsideTriangle { hole: pos(1, 2), size: 4 }),
            Board::new(4, pos(1, 2))
        );
        assert_eq!(
            Err(BoardError::HoleOutsideTriangle { hole: pos(4, 0), size: 4 }),
            Board::new(4, pos(4, 0))
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            "Hole (1, 2) is outside of a triangle with side 4",
            BoardError::HoleOutsideTriangle { hole: pos(1, 2), size: 4 }.to_string()
        );
        assert_eq!(
            "Board size 2 is too small, it must be at least 3",
            BoardError::SizeTooSmall { size: 2 }.to_string()
        );
    }

    #[test]
    fn random_hole() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..50 {
            let board = Board::with_random_hole(5, &mut rng).unwrap();
            assert_eq!(14, board.count_pegs());
        }
        assert_eq!(
            Err(BoardError::SizeTooSmall { size: 1 }),
            Board::with_random_hole(1, &mut rng)
        );
    }

    #[test]
    fn display() {
        let board = Board::new(4, pos(2, 1)).unwrap();
        assert_eq!("*\n* *\n* o *\n* * * *\n", board.to_string());
    }

    #[test]
    fn parse_display_output() {
        let board = Board::new(6, pos(3, 2)).unwrap();
        assert_eq!(board, board.to_string().parse().unwrap());
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            Err(BoardError::SizeTooSmall { size: 2 }),
            "*\no *".parse::<Board>()
        );
        assert!(matches!(
            "*\no *\n* *".parse::<Board>(),
            Err(BoardError::Parse { row: 2, .. })
        ));
        assert!(matches!(
            "*\no x\n* * *".parse::<Board>(),
            Err(BoardError::Parse { row: 1, .. })
        ));
    }

    #[test]
    fn available_moves_n3() {
        // Nothing can reach the hole at (1, 0).
        let board = Board::new(3, pos(1, 0)).unwrap();
        for p in board.positions() {
            assert_eq!(0, board.available_moves(p).count(), "at {p}");
        }
        // (2, 2) can't jump up-left, (0, 0) isn't empty.
        assert!(!board.can_jump(pos(2, 2), Direction::UpLeft));

        let board = Board::new(3, pos(0, 0)).unwrap();
        assert_eq!(
            vec![Direction::UpRight],
            board.available_moves(pos(2, 0)).collect_vec()
        );
        assert_eq!(
            vec![Direction::UpLeft],
            board.available_moves(pos(2, 2)).collect_vec()
        );
        assert_eq!(0, board.available_moves(pos(2, 1)).count());
        // Empty cells can't jump at all.
        assert_eq!(0, board.available_moves(pos(0, 0)).count());
    }

    #[test]
    fn available_moves_keep_direction_order() {
        let board = parse(
            "
            *
            * *
            o * o
            * * * *
            o * * * o
            * * * * * *
            * * o * o * *
        ",
        );
        let expected = vec![
            Direction::UpLeft,
            Direction::UpRight,
            Direction::Left,
            Direction::Right,
            Direction::DownLeft,
            Direction::DownRight,
        ];
        for _ in 0..3 {
            assert_eq!(expected, board.available_moves(pos(4, 2)).collect_vec());
        }
    }

    #[test]
    fn available_moves_stay_on_board() {
        let mut rng = StdRng::seed_from_u64(1);
        for size in 3..9 {
            for _ in 0..20 {
                let mut board = Board::with_random_hole(size, &mut rng).unwrap();
                // Thin the board out so that lots of jumps become possible
                for p in board.positions().collect_vec() {
                    if rng.gen_bool(0.3) {
                        board.set(p, false);
                    }
                }
                for from in board.positions() {
                    for direction in board.available_moves(from) {
                        let over = direction.offset(from, 1).unwrap();
                        let to = direction.offset(from, 2).unwrap();
                        assert!(board.contains(over));
                        assert!(board.contains(to));
                        assert!(board.is_peg(over));
                        assert!(board.is_empty(to));
                    }
                }
            }
        }
    }

    #[test]
    fn apply_move() {
        let mut board = Board::new(3, pos(0, 0)).unwrap();
        board.apply_move(pos(2, 0), Direction::UpRight);
        assert_eq!(
            parse(
                "
                *
                o *
                o * *
            "
            ),
            board
        );
    }

    #[test]
    fn apply_then_undo_restores_board() {
        let mut rng = StdRng::seed_from_u64(2);
        for size in 4..8 {
            let mut board = Board::with_random_hole(size, &mut rng).unwrap();
            let mut history = vec![];
            loop {
                let moves = board
                    .positions()
                    .flat_map(|p| board.available_moves(p).map(move |d| (p, d)))
                    .collect_vec();
                if moves.is_empty() {
                    break;
                }
                let (from, direction) = moves[rng.gen_range(0..moves.len())];
                let before = board.snapshot();
                board.apply_move(from, direction);
                assert_eq!(before.count_pegs() - 1, board.count_pegs());

                board.undo_move(from, direction);
                assert_eq!(before, board);

                board.apply_move(from, direction);
                history.push((before, from, direction));
            }
            while let Some((before, from, direction)) = history.pop() {
                board.undo_move(from, direction);
                assert_eq!(before, board);
            }
            assert_eq!(num_cells(size) - 1, board.count_pegs());
        }
    }

    #[test]
    fn snapshot_is_independent() {
        let mut board = Board::new(4, pos(0, 0)).unwrap();
        let snapshot = board.snapshot();
        board.apply_move(pos(2, 0), Direction::UpRight);
        assert_eq!(Board::new(4, pos(0, 0)).unwrap(), snapshot);
        assert_ne!(snapshot, board);
    }

    #[test]
    #[should_panic = "Illegal jump UP_LEFT from (2, 2)"]
    fn illegal_move() {
        let mut board = Board::new(3, pos(1, 0)).unwrap();
        board.apply_move(pos(2, 2), Direction::UpLeft);
    }

    #[test]
    #[should_panic = "can't be undone"]
    fn undo_without_apply() {
        let mut board = Board::new(3, pos(0, 0)).unwrap();
        board.undo_move(pos(2, 0), Direction::UpRight);
    }

    #[test]
    #[should_panic = "can't be undone"]
    fn undo_off_board() {
        let mut board = Board::new(3, pos(0, 0)).unwrap();
        board.undo_move(pos(0, 0), Direction::UpLeft);
    }
}
