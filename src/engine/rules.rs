//! Per-session game parameters and the named rule sets they come from
use crate::board::Board;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fastest the snake will ever move, in milliseconds per tick
pub(crate) const MIN_SPEED: u64 = 50;

/// How many random cells to try when placing reachable food before falling
/// back to searching outwards from the snake's head
pub(crate) const MAX_PLACEMENT_ATTEMPTS: usize = 100;

/// Points lost when a food item spoils before being eaten
pub(crate) const EXPIRY_PENALTY: u32 = 1;

/// The parameters of a single game.  Created when a game is set up and never
/// changed afterwards.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct GameConfig {
    pub(crate) board_width: u16,
    pub(crate) board_height: u16,

    /// Number of terminal columns used to draw each cell.  Not used by the
    /// simulation.
    pub(crate) cell_size: u16,

    /// Milliseconds per tick at a score of zero
    pub(crate) initial_speed: u64,

    /// Milliseconds taken off of the tick period per speed level
    pub(crate) speed_increment: u64,

    /// Seconds that food stays on the board before spoiling, or `None` if food
    /// never spoils
    pub(crate) food_timeout: Option<u64>,

    /// Points earned per food eaten
    pub(crate) score_step: u32,

    /// Score needed to go up one speed level
    pub(crate) points_per_level: u32,

    /// Length of the snake at the start of a game
    pub(crate) initial_length: usize,

    pub(crate) placement: FoodPlacement,
}

impl GameConfig {
    pub(crate) fn board(&self) -> Board {
        Board::new(self.board_width, self.board_height)
    }

    /// Milliseconds per tick at the given score:
    /// `max(initial_speed - floor(score / points_per_level) * speed_increment, MIN_SPEED)`
    pub(crate) fn speed_at(&self, score: u32) -> u64 {
        let levels = u64::from(score / self.points_per_level.max(1));
        self.initial_speed
            .saturating_sub(levels.saturating_mul(self.speed_increment))
            .max(MIN_SPEED)
    }

    /// The number of cells the snake can cover before food placed now spoils
    /// when moving at `speed` milliseconds per tick, or `None` if food doesn't
    /// spoil
    pub(crate) fn reach(&self, speed: u64) -> Option<u32> {
        let timeout = self.food_timeout?;
        let cells = timeout.saturating_mul(1000) / speed.max(1);
        Some(u32::try_from(cells).unwrap_or(u32::MAX))
    }

    /// Food lifetime in milliseconds
    pub(crate) fn food_timeout_ms(&self) -> Option<u64> {
        self.food_timeout.map(|secs| secs.saturating_mul(1000))
    }
}

/// How a new food item's position is chosen
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum FoodPlacement {
    /// Any cell not covered by the snake
    Anywhere,

    /// A cell not covered by the snake that the head can get to before the
    /// food spoils
    Reachable,
}

/// The available rule sets
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum Variant {
    /// Ten points a food, food never spoils, the snake speeds up with every
    /// food eaten
    Basic,

    /// One point a food, food spoils after twelve seconds, and letting it
    /// spoil costs a point and lengthens the snake anyway
    #[default]
    Classic,
}

impl Variant {
    pub(crate) fn config(self, board_width: u16, board_height: u16, cell_size: u16) -> GameConfig {
        match self {
            Variant::Basic => GameConfig {
                board_width,
                board_height,
                cell_size,
                initial_speed: 150,
                speed_increment: 5,
                food_timeout: None,
                score_step: 10,
                points_per_level: 10,
                initial_length: 3,
                placement: FoodPlacement::Anywhere,
            },
            Variant::Classic => GameConfig {
                board_width,
                board_height,
                cell_size,
                initial_speed: 250,
                speed_increment: 10,
                food_timeout: Some(12),
                score_step: 1,
                points_per_level: 5,
                initial_length: 1,
                placement: FoodPlacement::Reachable,
            },
        }
    }

    /// The name recorded alongside scores achieved with this variant
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Variant::Basic => "basic",
            Variant::Classic => "classic",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::Basic => "Basic",
            Variant::Classic => "Classic",
        };
        f.pad(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 250)]
    #[case(4, 250)]
    #[case(5, 240)]
    #[case(12, 230)]
    #[case(100, 50)]
    #[case(1000, 50)]
    #[case(u32::MAX, 50)]
    fn classic_speed(#[case] score: u32, #[case] speed: u64) {
        assert_eq!(Variant::Classic.config(20, 20, 1).speed_at(score), speed);
    }

    #[rstest]
    #[case(0, 150)]
    #[case(10, 145)]
    #[case(50, 125)]
    #[case(1000, 50)]
    fn basic_speed(#[case] score: u32, #[case] speed: u64) {
        assert_eq!(Variant::Basic.config(20, 20, 1).speed_at(score), speed);
    }

    #[test]
    fn speed_monotone_and_bounded() {
        for variant in [Variant::Basic, Variant::Classic] {
            let config = variant.config(20, 20, 1);
            let mut prev = config.speed_at(0);
            for score in 1..500 {
                let speed = config.speed_at(score);
                assert!(speed <= prev, "speed went up at score {score}");
                assert!(speed >= MIN_SPEED);
                prev = speed;
            }
        }
    }

    #[rstest]
    #[case(250, 48)]
    #[case(150, 80)]
    #[case(50, 240)]
    #[case(70, 171)]
    fn classic_reach(#[case] speed: u64, #[case] cells: u32) {
        assert_eq!(Variant::Classic.config(20, 20, 1).reach(speed), Some(cells));
    }

    #[test]
    fn basic_food_never_spoils() {
        let config = Variant::Basic.config(20, 20, 1);
        assert_eq!(config.reach(150), None);
        assert_eq!(config.food_timeout_ms(), None);
    }

    #[test]
    fn display_padding() {
        assert_eq!(format!("{:7}", Variant::Basic), "Basic  ");
        assert_eq!(Variant::Classic.as_str(), "classic");
    }
}
