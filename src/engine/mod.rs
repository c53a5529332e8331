//! The tick-driven snake simulation.
//!
//! The engine owns no timers: whoever drives it passes the current time (in
//! milliseconds on any monotonic clock) to [`Engine::tick()`] whenever a tick
//! is due, and [`Engine::current_speed()`] says how long to wait between
//! ticks.
mod direction;
mod food;
mod rules;
mod snake;
pub(crate) use self::direction::Direction;
pub(crate) use self::food::Food;
use self::food::FoodPlacer;
pub(crate) use self::rules::{GameConfig, Variant};
use self::rules::EXPIRY_PENALTY;
pub(crate) use self::snake::Snake;
use crate::board::Board;

/// Everything about a game in progress that changes as it's played
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct GameState {
    pub(crate) snake: Snake,
    pub(crate) food: Food,
    pub(crate) score: u32,
    pub(crate) status: Status,

    /// Whole seconds elapsed since the first tick after the game was started
    pub(crate) game_time: u64,
}

impl GameState {
    pub(crate) fn game_over(&self) -> bool {
        matches!(self.status, Status::GameOver(_))
    }

    pub(crate) fn game_started(&self) -> bool {
        self.status != Status::NotStarted
    }

    pub(crate) fn game_paused(&self) -> bool {
        self.status == Status::Paused
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Status {
    NotStarted,
    Running,
    Paused,
    GameOver(Ending),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Ending {
    /// The snake ran into a wall or itself
    Collision,

    /// The snake covers the whole board, and there's nowhere left to put food
    BoardFilled,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Engine<R = rand::rngs::ThreadRng> {
    rng: R,
    config: GameConfig,
    state: GameState,

    /// Engine time of the first tick since `start()`, from which `game_time`
    /// is measured
    started_at: Option<u64>,
}

impl<R: rand::Rng> Engine<R> {
    pub(crate) fn new_with_rng(config: GameConfig, mut rng: R) -> Engine<R> {
        let state = initial_state(&config, &mut rng);
        Engine {
            rng,
            config,
            state,
            started_at: None,
        }
    }

    /// Throw away the current game and set up a new one, waiting to be
    /// started
    pub(crate) fn reset(&mut self) {
        self.state = initial_state(&self.config, &mut self.rng);
        self.started_at = None;
        log::debug!("Game reset");
    }

    /// Advance the game by one step.  Does nothing unless the game is running.
    pub(crate) fn tick(&mut self, now: u64) {
        if self.state.status != Status::Running {
            return;
        }
        let started = *self.started_at.get_or_insert(now);
        self.state.game_time = now.saturating_sub(started) / 1000;
        let speed = self.current_speed();
        if self.state.food.active && self.state.food.expires_at.is_none() {
            self.state.food.expires_at = self
                .config
                .food_timeout_ms()
                .map(|ms| now.saturating_add(ms));
        }

        if self.state.food.expired(now) {
            self.state.snake.grow_in_place();
            self.state.score = self.state.score.saturating_sub(EXPIRY_PENALTY);
            log::debug!(
                "Food at {:?} spoiled; score is now {}",
                self.state.food.position,
                self.state.score
            );
            self.replace_food(speed, now);
            if self.state.game_over() {
                return;
            }
        }

        let head = self.state.snake.advance();
        if self.state.food.active && head == self.state.food.position {
            self.state.score = self.state.score.saturating_add(self.config.score_step);
            log::debug!(
                "Ate food at {head:?}; score is now {}; length is now {}",
                self.state.score,
                self.state.snake.len()
            );
            self.replace_food(speed, now);
        } else {
            self.state.snake.drop_tail();
        }

        if !self.board().in_bounds(head) || self.state.snake.bites_itself() {
            log::info!("Snake crashed at {head:?} with a score of {}", self.state.score);
            self.state.status = Status::GameOver(Ending::Collision);
        }
    }

    /// Put down new food, or end the game if there's no room for any
    fn replace_food(&mut self, speed: u64, now: u64) {
        let placed = FoodPlacer {
            config: &self.config,
            rng: &mut self.rng,
        }
        .place(self.state.snake.body(), speed, Some(now));
        if let Some(food) = placed {
            self.state.food = food;
        } else {
            log::info!("Board filled with a score of {}", self.state.score);
            self.state.food = Food::inactive(self.state.food.position);
            self.state.status = Status::GameOver(Ending::BoardFilled);
        }
    }
}

impl<R> Engine<R> {
    pub(crate) fn state(&self) -> &GameState {
        &self.state
    }

    pub(crate) fn config(&self) -> &GameConfig {
        &self.config
    }

    pub(crate) fn board(&self) -> Board {
        self.config.board()
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Begin a game that hasn't been started yet
    pub(crate) fn start(&mut self) {
        if self.state.status == Status::NotStarted {
            self.state.status = Status::Running;
            self.state.game_time = 0;
            self.started_at = None;
            log::debug!("Game started");
        }
    }

    /// Pause a running game or resume a paused one
    pub(crate) fn pause(&mut self) {
        match self.state.status {
            Status::Running => self.state.status = Status::Paused,
            Status::Paused => self.state.status = Status::Running,
            Status::NotStarted | Status::GameOver(_) => (),
        }
    }

    /// Ask the snake to turn on the next tick.  Ignored unless the game is
    /// running or if `direction` is directly backwards.
    pub(crate) fn change_direction(&mut self, direction: Direction) {
        if self.state.status == Status::Running {
            let _ = self.state.snake.turn(direction);
        }
    }

    /// Milliseconds that should pass between ticks at the current score
    pub(crate) fn current_speed(&self) -> u64 {
        self.config.speed_at(self.state.score)
    }

    /// Whole seconds left before the current food spoils
    pub(crate) fn food_time_left(&self, now: u64) -> Option<u64> {
        self.state.food.time_left(now)
    }
}

fn initial_state<R: rand::Rng>(config: &GameConfig, rng: &mut R) -> GameState {
    let board = config.board();
    let snake = Snake::new(
        board.center(),
        Direction::Right,
        config.initial_length,
        board,
    );
    let food = FoodPlacer { config, rng }
        .place(snake.body(), config.initial_speed, None)
        .unwrap_or_else(|| Food::inactive(snake.head()));
    GameState {
        snake,
        food,
        score: 0,
        status: Status::NotStarted,
        game_time: 0,
    }
}
