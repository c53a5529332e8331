//! Grid geometry for the playing field
use rand::Rng;
use std::collections::VecDeque;

/// A cell on the board.  Coordinates are signed so that a snake head that has
/// left the board (e.g., `x == -1`) can still be represented.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct Position {
    pub(crate) x: i32,
    pub(crate) y: i32,
}

impl Position {
    pub(crate) const fn new(x: i32, y: i32) -> Position {
        Position { x, y }
    }

    /// `|a.x - b.x| + |a.y - b.y|`
    pub(crate) fn manhattan_distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Return the position offset by `(dx, dy)`
    pub(crate) fn offset(self, dx: i32, dy: i32) -> Position {
        Position {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// The dimensions of the playing field
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Board {
    width: u16,
    height: u16,
}

impl Board {
    pub(crate) fn new(width: u16, height: u16) -> Board {
        Board { width, height }
    }

    pub(crate) fn width(self) -> u16 {
        self.width
    }

    pub(crate) fn height(self) -> u16 {
        self.height
    }

    /// The larger of the two dimensions.  No square ring around a cell on the
    /// board has a radius greater than this and still touches the board.
    pub(crate) fn extent(self) -> u32 {
        u32::from(self.width.max(self.height))
    }

    pub(crate) fn in_bounds(self, pos: Position) -> bool {
        (0..i32::from(self.width)).contains(&pos.x) && (0..i32::from(self.height)).contains(&pos.y)
    }

    /// The cell on the board nearest to `pos`
    pub(crate) fn clamp(self, pos: Position) -> Position {
        Position {
            x: pos.x.clamp(0, i32::from(self.width.max(1)) - 1),
            y: pos.y.clamp(0, i32::from(self.height.max(1)) - 1),
        }
    }

    /// The cell at the center of the board, rounding down
    pub(crate) fn center(self) -> Position {
        Position::new(i32::from(self.width / 2), i32::from(self.height / 2))
    }

    /// Sample a cell uniformly from the whole board, occupied or not.
    ///
    /// # Panics
    ///
    /// Panics if the board has no cells.
    pub(crate) fn random_position<R: Rng + ?Sized>(self, rng: &mut R) -> Position {
        Position {
            x: rng.random_range(0..i32::from(self.width)),
            y: rng.random_range(0..i32::from(self.height)),
        }
    }

    /// Iterate over every cell of the board in row-major order
    pub(crate) fn positions(self) -> impl Iterator<Item = Position> {
        let width = i32::from(self.width);
        (0..i32::from(self.height)).flat_map(move |y| (0..width).map(move |x| Position { x, y }))
    }
}

/// Is `pos` equal to any of the segments in `body`?
pub(crate) fn is_occupied(pos: Position, body: &VecDeque<Position>) -> bool {
    body.contains(&pos)
}
