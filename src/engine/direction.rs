use crate::board::Position;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Return the cell one step from `pos` in this direction.  The result may
    /// lie outside the board.
    pub(crate) fn advance(self, pos: Position) -> Position {
        match self {
            Direction::Up => pos.offset(0, -1),
            Direction::Down => pos.offset(0, 1),
            Direction::Left => pos.offset(-1, 0),
            Direction::Right => pos.offset(1, 0),
        }
    }

    pub(crate) fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub(crate) fn is_opposite(self, other: Direction) -> bool {
        self.reverse() == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Direction::Up, Position::new(2, 7), Position::new(2, 6))]
    #[case(Direction::Down, Position::new(2, 7), Position::new(2, 8))]
    #[case(Direction::Left, Position::new(2, 7), Position::new(1, 7))]
    #[case(Direction::Right, Position::new(2, 7), Position::new(3, 7))]
    #[case(Direction::Up, Position::new(2, 0), Position::new(2, -1))]
    #[case(Direction::Left, Position::new(0, 7), Position::new(-1, 7))]
    fn test_direction_advance(#[case] d: Direction, #[case] pos: Position, #[case] r: Position) {
        assert_eq!(d.advance(pos), r);
    }

    #[rstest]
    #[case(Direction::Up, Direction::Down, true)]
    #[case(Direction::Down, Direction::Up, true)]
    #[case(Direction::Left, Direction::Right, true)]
    #[case(Direction::Right, Direction::Left, true)]
    #[case(Direction::Up, Direction::Left, false)]
    #[case(Direction::Right, Direction::Right, false)]
    fn test_is_opposite(#[case] a: Direction, #[case] b: Direction, #[case] r: bool) {
        assert_eq!(a.is_opposite(b), r);
    }
}
