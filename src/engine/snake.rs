use super::direction::Direction;
use crate::board::{Board, Position};
use std::collections::VecDeque;

/// Snake state.  Snate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snake {
    /// The positions of all of the cells in the snake, head first.  Never
    /// empty.
    body: VecDeque<Position>,

    /// The direction in which the snake will move on the next tick unless a
    /// turn is pending
    direction: Direction,

    /// A turn requested since the last tick, applied at the start of the next
    /// one
    pending: Option<Direction>,
}

impl Snake {
    /// Create a snake with its head at `head`, facing `direction`, with up to
    /// `len - 1` further segments trailing straight behind it.  Segments that
    /// would fall off of `board` are left out, but the head is always present.
    pub(crate) fn new(head: Position, direction: Direction, len: usize, board: Board) -> Snake {
        let behind = direction.reverse();
        let body = std::iter::successors(Some(head), |&p| Some(behind.advance(p)))
            .take(len.max(1))
            .take_while(|&p| p == head || board.in_bounds(p))
            .collect();
        Snake {
            body,
            direction,
            pending: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_body<I: IntoIterator<Item = Position>>(
        body: I,
        direction: Direction,
    ) -> Snake {
        let body = body.into_iter().collect::<VecDeque<_>>();
        assert!(!body.is_empty(), "snake body should not be empty");
        Snake {
            body,
            direction,
            pending: None,
        }
    }

    /// Return the position of the snake's head
    pub(crate) fn head(&self) -> Position {
        self.body[0]
    }

    /// Return the position of the last segment of the snake
    pub(crate) fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Return the positions of all of the snake's segments, head first
    pub(crate) fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub(crate) fn len(&self) -> usize {
        self.body.len()
    }

    /// The direction the snake last moved in (or starts out facing)
    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    /// The direction the snake will move in on the next tick
    #[cfg(test)]
    pub(crate) fn heading(&self) -> Direction {
        self.pending.unwrap_or(self.direction)
    }

    /// Request a turn to `direction`, to take effect on the next tick.
    /// Requests to reverse relative to the current direction are ignored.
    /// Returns whether the request was accepted.
    pub(crate) fn turn(&mut self, direction: Direction) -> bool {
        if direction.is_opposite(self.direction) {
            false
        } else {
            self.pending = Some(direction);
            true
        }
    }

    /// Apply any pending turn, then put a new head one cell forwards.  The
    /// tail is left in place; call [`Snake::drop_tail()`] unless growing.
    pub(crate) fn advance(&mut self) -> Position {
        if let Some(d) = self.pending.take() {
            self.direction = d;
        }
        let head = self.direction.advance(self.head());
        self.body.push_front(head);
        head
    }

    pub(crate) fn drop_tail(&mut self) {
        if self.body.len() > 1 {
            let _ = self.body.pop_back();
        }
    }

    /// Lengthen the snake by one segment without moving it by doubling up the
    /// tail
    pub(crate) fn grow_in_place(&mut self) {
        self.body.push_back(self.tail());
    }

    /// Does the head share a cell with any other segment?
    pub(crate) fn bites_itself(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|&p| p == head)
    }
}
