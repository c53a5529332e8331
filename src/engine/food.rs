use super::rules::{FoodPlacement, GameConfig, MAX_PLACEMENT_ATTEMPTS};
use crate::board::{is_occupied, Board, Position};
use rand::{seq::IteratorRandom, Rng};
use std::collections::VecDeque;

/// A food item on the board
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Food {
    pub(crate) position: Position,

    /// Engine time (in milliseconds) at which the food spoils.  `None` means
    /// either that the food never spoils or that its timer has not been
    /// started yet.
    pub(crate) expires_at: Option<u64>,

    pub(crate) active: bool,
}

impl Food {
    /// Food that nothing can eat, for when there's nowhere to put real food
    pub(crate) fn inactive(position: Position) -> Food {
        Food {
            position,
            expires_at: None,
            active: false,
        }
    }

    pub(crate) fn expired(&self, now: u64) -> bool {
        self.active && self.expires_at.is_some_and(|t| now >= t)
    }

    /// Seconds until the food spoils, rounding down
    pub(crate) fn time_left(&self, now: u64) -> Option<u64> {
        self.expires_at
            .filter(|_| self.active)
            .map(|t| t.saturating_sub(now) / 1000)
    }
}

/// Chooses where new food goes
#[derive(Debug)]
pub(crate) struct FoodPlacer<'a, R> {
    pub(crate) config: &'a GameConfig,
    pub(crate) rng: &'a mut R,
}

impl<R: Rng> FoodPlacer<'_, R> {
    /// Create a new active food item that is not on `body`.  `speed` is the
    /// snake's current speed, used to keep the food within reach, and `now`
    /// is the engine time at which the food's timer starts, if known.
    ///
    /// Returns `None` if every cell on the board is covered by `body`.
    pub(crate) fn place(
        &mut self,
        body: &VecDeque<Position>,
        speed: u64,
        now: Option<u64>,
    ) -> Option<Food> {
        let position = match (self.config.placement, self.config.reach(speed)) {
            (FoodPlacement::Reachable, Some(reach)) => self.place_reachable(body, reach),
            _ => self.place_anywhere(body),
        }?;
        let expires_at = self
            .config
            .food_timeout_ms()
            .and_then(|ms| now.map(|t| t.saturating_add(ms)));
        Some(Food {
            position,
            expires_at,
            active: true,
        })
    }

    fn place_anywhere(&mut self, body: &VecDeque<Position>) -> Option<Position> {
        self.config
            .board()
            .positions()
            .filter(|&p| !is_occupied(p, body))
            .choose(&mut *self.rng)
    }

    fn place_reachable(&mut self, body: &VecDeque<Position>, reach: u32) -> Option<Position> {
        let board = self.config.board();
        let head = body.front().copied().unwrap_or_else(|| board.center());
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let p = board.random_position(&mut *self.rng);
            if !is_occupied(p, body) && p.manhattan_distance(head) <= reach {
                return Some(p);
            }
        }
        log::debug!("No reachable food spot found at random; searching around the head");
        nearest_free(board, head, body, reach).or_else(|| {
            log::debug!("Nothing free within reach of the head; placing food anywhere");
            self.place_anywhere(body)
        })
    }
}

/// Search the square rings around `center` for a free cell, starting at
/// radius 1 and going out to `max_radius` (or the edge of the board, whichever
/// comes first).  Each ring is scanned column by column from left to right,
/// top to bottom within each column.
pub(crate) fn nearest_free(
    board: Board,
    center: Position,
    body: &VecDeque<Position>,
    max_radius: u32,
) -> Option<Position> {
    let max_radius = i32::try_from(max_radius.min(board.extent())).unwrap_or(i32::MAX);
    for radius in 1..=max_radius {
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx.abs() != radius && dy.abs() != radius {
                    continue;
                }
                let p = center.offset(dx, dy);
                if board.in_bounds(p) && !is_occupied(p, body) {
                    return Some(p);
                }
            }
        }
    }
    None
}
