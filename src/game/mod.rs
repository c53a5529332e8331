mod paused;
use self::paused::{PauseOpt, Paused};
use crate::app::{Globals, Screen};
use crate::board::Position;
use crate::command::Command;
use crate::consts;
use crate::engine::{Direction, Engine, Ending, Status};
use crate::menu::MainMenu;
use crate::records::NewRecord;
use crate::util::{center_rect, format_time, get_display_area, next_deadline, Clock};
use crossterm::event::{poll, read, Event};
use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
    Frame,
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Game<R = rand::rngs::ThreadRng> {
    engine: Engine<R>,
    globals: Globals,
    clock: Clock,

    /// Clock reading at which the next tick is due.  Only set while the game
    /// is running.
    next_tick: Option<u64>,

    /// The pause menu, present whenever the game is paused
    paused: Option<Paused>,

    /// What became of the final score, once the game is over
    outcome: Option<Outcome>,
}

impl Game<rand::rngs::ThreadRng> {
    pub(crate) fn new(globals: Globals) -> Self {
        Game::new_with_rng(globals, rand::rng())
    }
}

impl<R: Rng> Game<R> {
    pub(crate) fn new_with_rng(globals: Globals, rng: R) -> Game<R> {
        let engine = Engine::new_with_rng(globals.options.game_config(), rng);
        log::info!(
            "New {} game on a {}x{} board",
            globals.options.mode.as_str(),
            engine.board().width(),
            engine.board().height()
        );
        Game {
            engine,
            globals,
            clock: Clock::new(),
            next_tick: None,
            paused: None,
            outcome: None,
        }
    }

    /// Wait for either an input event or the next tick, whichever comes
    /// first, and handle it
    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Screen>> {
        if self.engine.state().status == Status::Running {
            let due = match self.next_tick {
                Some(due) => due,
                None => {
                    let due = self
                        .clock
                        .now_ms()
                        .saturating_add(self.engine.current_speed());
                    self.next_tick = Some(due);
                    due
                }
            };
            let wait = self.clock.until(due);
            if wait.is_zero() || !poll(wait)? {
                self.tick(due);
                Ok(None)
            } else {
                Ok(self.handle_event(read()?))
            }
        } else {
            Ok(self.handle_event(read()?))
        }
    }

    fn tick(&mut self, due: u64) {
        let now = self.clock.now_ms();
        self.engine.tick(now);
        if self.engine.state().game_over() {
            self.next_tick = None;
            self.record_result();
        } else {
            self.next_tick = Some(next_deadline(due, self.engine.current_speed(), now));
        }
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        if let Some(paused) = self.paused.as_mut() {
            match paused.handle_event(event)? {
                PauseOpt::Resume => self.resume(),
                PauseOpt::Restart => self.restart(),
                PauseOpt::MainMenu => return Some(self.main_menu()),
                PauseOpt::Quit => return Some(Screen::Quit),
            }
            return None;
        }
        match self.engine.state().status {
            Status::NotStarted => match Command::from_key_event(event.as_key_press_event()?)? {
                Command::Enter | Command::Space => self.engine.start(),
                Command::M | Command::Esc => return Some(self.main_menu()),
                Command::Quit | Command::Q => return Some(Screen::Quit),
                _ => (),
            },
            Status::Running => {
                if event == Event::FocusLost {
                    self.pause();
                } else {
                    match Command::from_key_event(event.as_key_press_event()?)? {
                        Command::Quit => return Some(Screen::Quit),
                        Command::Up => self.engine.change_direction(Direction::Up),
                        Command::Left => self.engine.change_direction(Direction::Left),
                        Command::Down => self.engine.change_direction(Direction::Down),
                        Command::Right => self.engine.change_direction(Direction::Right),
                        Command::Esc | Command::P => self.pause(),
                        _ => (),
                    }
                }
            }
            // Not reachable without the pause menu being up
            Status::Paused => (),
            Status::GameOver(_) => match Command::from_key_event(event.as_key_press_event()?)? {
                Command::R => self.restart(),
                Command::M => return Some(self.main_menu()),
                Command::Quit | Command::Q => return Some(Screen::Quit),
                _ => (),
            },
        }
        None
    }

    fn pause(&mut self) {
        self.engine.pause();
        if self.engine.state().game_paused() {
            self.paused = Some(Paused::new());
            self.next_tick = None;
        }
    }

    fn resume(&mut self) {
        self.paused = None;
        if self.engine.state().game_paused() {
            self.engine.pause();
        }
    }

    fn restart(&mut self) {
        self.engine.reset();
        self.paused = None;
        self.outcome = None;
        self.next_tick = None;
    }

    /// Save the finished game to the records table if anything was scored.
    /// Only the first call after a game ends does anything.
    fn record_result(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        let score = self.engine.state().score;
        let time_in_seconds = self.engine.state().game_time;
        let outcome = if score == 0 {
            Outcome::NotRecorded
        } else {
            let new_record = self.globals.records.is_new_record(score);
            let record = NewRecord {
                player_name: self.globals.player_name.clone(),
                score,
                time_in_seconds,
                difficulty: Some(self.globals.options.mode.as_str().to_owned()),
            };
            match self.globals.records.add_record(record, chrono::Utc::now()) {
                Ok(_) => Outcome::Recorded { new_record },
                Err(e) => {
                    log::error!("{:?}", anyhow::Error::from(e));
                    Outcome::SaveFailed
                }
            }
        };
        self.outcome = Some(outcome);
    }
}

impl<R> Game<R> {
    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    #[cfg(test)]
    pub(crate) fn engine(&self) -> &Engine<R> {
        &self.engine
    }

    fn main_menu(&self) -> Screen {
        Screen::Main(MainMenu::new(self.globals.clone()))
    }

    fn status_line(&self) -> Line<'static> {
        let state = self.engine.state();
        let mut line = Line::raw(format!(
            " Score: {}   Time: {}   Speed: {} ms",
            state.score,
            format_time(state.game_time),
            self.engine.current_speed()
        ));
        if state.game_started() && !state.game_over() {
            if let Some(secs) = self.engine.food_time_left(self.clock.now_ms()) {
                line.push_span("   ");
                let style = if secs <= consts::FOOD_WARNING_SECS {
                    consts::FOOD_WARNING_STYLE
                } else {
                    Style::new()
                };
                line.push_span(Span::styled(format!("Food: {secs}s"), style));
            }
        }
        line.style(consts::STATUS_BAR_STYLE)
    }

    /// The two lines of text shown beneath the board
    fn messages(&self) -> [Line<'static>; 2] {
        match self.engine.state().status {
            Status::NotStarted => [
                Line::from_iter([
                    Span::raw(" Press "),
                    Span::styled("Enter", consts::KEY_STYLE),
                    Span::raw(" or "),
                    Span::styled("Space", consts::KEY_STYLE),
                    Span::raw(" to start"),
                ]),
                Line::from_iter([
                    Span::raw(" Pause ("),
                    Span::styled("p", consts::KEY_STYLE),
                    Span::raw(") · Main Menu ("),
                    Span::styled("m", consts::KEY_STYLE),
                    Span::raw(")"),
                ]),
            ],
            Status::Running | Status::Paused => [Line::default(), Line::default()],
            Status::GameOver(ending) => {
                let reason = match ending {
                    Ending::Collision => "the snake crashed",
                    Ending::BoardFilled => "the board is full",
                };
                let note = match self.outcome {
                    Some(Outcome::Recorded { new_record: true }) => "  New record!",
                    Some(Outcome::Recorded { new_record: false }) => "  Score saved",
                    Some(Outcome::SaveFailed) => "  Score could not be saved",
                    Some(Outcome::NotRecorded) | None => "",
                };
                [
                    Line::raw(format!(" GAME OVER: {reason}{note}")),
                    Line::from_iter([
                        Span::raw(" Choose One: Restart ("),
                        Span::styled("r", consts::KEY_STYLE),
                        Span::raw(") · Main Menu ("),
                        Span::styled("m", consts::KEY_STYLE),
                        Span::raw(") · Quit ("),
                        Span::styled("q", consts::KEY_STYLE),
                        Span::raw(")"),
                    ]),
                ]
            }
        }
    }
}

impl<R> Widget for &Game<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [status_area, block_area, msg1_area, msg2_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(display);
        self.status_line().render(status_area, buf);

        let board = self.engine.board();
        let cell_width = self.engine.config().cell_size.max(1);
        let block_size = Size {
            width: board
                .width()
                .saturating_mul(cell_width)
                .saturating_add(2),
            height: board.height().saturating_add(2),
        };
        let block_area = center_rect(block_area, block_size);
        Block::bordered().render(block_area, buf);

        let mut canvas = Canvas {
            area: block_area.inner(Margin::new(1, 1)),
            cell_width,
            buf,
        };
        let state = self.engine.state();
        for &p in state.snake.body().iter().skip(1) {
            canvas.draw_cell(p, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE);
        }
        if state.food.active {
            canvas.draw_cell(
                state.food.position,
                consts::FOOD_SYMBOL,
                consts::FOOD_STYLE,
            );
        }
        // Draw the head last so that, if it's a collision, we overwrite
        // whatever it's colliding with
        if state.status == Status::GameOver(Ending::Collision) {
            canvas.draw_cell(
                board.clamp(state.snake.head()),
                consts::COLLISION_SYMBOL,
                consts::COLLISION_STYLE,
            );
        } else {
            canvas.draw_cell(
                state.snake.head(),
                head_symbol(state.snake.direction()),
                consts::SNAKE_STYLE,
            );
        }

        let [msg1, msg2] = self.messages();
        msg1.render(msg1_area, buf);
        msg2.render(msg2_area, buf);

        if let Some(paused) = self.paused {
            let pause_area = center_rect(
                display,
                Size {
                    width: Paused::WIDTH,
                    height: Paused::HEIGHT,
                },
            );
            paused.render(pause_area, buf);
        }
    }
}

fn head_symbol(direction: Direction) -> char {
    match direction {
        Direction::Up => consts::SNAKE_HEAD_NORTH_SYMBOL,
        Direction::Down => consts::SNAKE_HEAD_SOUTH_SYMBOL,
        Direction::Left => consts::SNAKE_HEAD_WEST_SYMBOL,
        Direction::Right => consts::SNAKE_HEAD_EAST_SYMBOL,
    }
}

/// Draws board cells into a region of a buffer, `cell_width` columns per cell
#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    cell_width: u16,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn draw_cell(&mut self, pos: Position, symbol: char, style: Style) {
        let (Ok(x), Ok(y)) = (u16::try_from(pos.x), u16::try_from(pos.y)) else {
            return;
        };
        let Some(x) = x
            .checked_mul(self.cell_width)
            .and_then(|x| self.area.x.checked_add(x))
        else {
            return;
        };
        let Some(y) = self.area.y.checked_add(y) else {
            return;
        };
        if x >= self.area.right() || y >= self.area.bottom() {
            return;
        }
        if let Some(cell) = self.buf.cell_mut((x, y)) {
            cell.set_char(symbol);
            cell.set_style(Style::reset().patch(style));
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Outcome {
    /// The score was zero, so there was nothing to record
    NotRecorded,
    Recorded {
        new_record: bool,
    },
    SaveFailed,
}
