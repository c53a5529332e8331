use crate::consts;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    text::{Line, Span, Text},
    widgets::Widget,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Logo;

impl Logo {
    const TIMED_WIDTH: u16 = 31;
    const SNAKE_WIDTH: u16 = 28;
    const SNAKE_BODY_LENGTH: u16 = 13;
    const SNAKE_FOOD_GUTTER: u16 = 2;
    const TEXT_HEIGHT: u16 = 5;
    pub(super) const HEIGHT: u16 = Self::TEXT_HEIGHT + 2;
    pub(super) const WIDTH: u16 = Self::TIMED_WIDTH + Self::SNAKE_WIDTH;

    #[rustfmt::skip]
    const TIMED: [&'static str; Self::TEXT_HEIGHT as usize] = [
         " _____ _                    _  ",
         "|_   _(_)_ __ ___   ___  __| | ",
        r"  | | | | '_ ` _ \ / _ \/ _` | ",
         "  | | | | | | | | |  __/ (_| | ",
        r"  |_| |_|_| |_| |_|\___|\__,_| ",
    ];

    #[rustfmt::skip]
    const SNAKE: [&'static str; Self::TEXT_HEIGHT as usize] = [
         " ____              _        ",
         "/ ___| _ __   __ _| | _____ ",
        r"\___ \| '_ \ / _` | |/ / _ \",
         " ___) | | | | (_| |   <  __/",
        r"|____/|_| |_|\__,_|_|\_\___|",
    ];
}

impl Widget for Logo {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [area] = Layout::horizontal([Self::WIDTH])
            .flex(Flex::Start)
            .areas(area);
        let [words_area, diagram_area] = Layout::vertical([Self::TEXT_HEIGHT, 1])
            .flex(Flex::Start)
            .spacing(1)
            .areas(area);
        let [timed_area, snake_area] = Layout::horizontal([Self::TIMED_WIDTH, Self::SNAKE_WIDTH])
            .flex(Flex::Start)
            .areas(words_area);
        Text::from_iter(Self::TIMED)
            .style(consts::FOOD_STYLE)
            .render(timed_area, buf);
        Text::from_iter(Self::SNAKE)
            .style(consts::SNAKE_STYLE)
            .render(snake_area, buf);
        let [body_area, head_area, _, food_area] = Layout::horizontal([
            Constraint::Length(Self::SNAKE_BODY_LENGTH),
            Constraint::Length(1),
            Constraint::Length(Self::SNAKE_FOOD_GUTTER),
            Constraint::Length(1),
        ])
        .flex(Flex::Center)
        .areas(diagram_area);
        for p in body_area.positions() {
            if let Some(cell) = buf.cell_mut(p) {
                cell.set_char(consts::SNAKE_BODY_SYMBOL);
                cell.set_style(consts::SNAKE_STYLE);
            }
        }
        for p in head_area.positions() {
            if let Some(cell) = buf.cell_mut(p) {
                cell.set_char(consts::SNAKE_HEAD_EAST_SYMBOL);
                cell.set_style(consts::SNAKE_STYLE);
            }
        }
        for p in food_area.positions() {
            if let Some(cell) = buf.cell_mut(p) {
                cell.set_char(consts::FOOD_SYMBOL);
                cell.set_style(consts::FOOD_STYLE);
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Instructions;

impl Instructions {
    pub(super) const HEIGHT: u16 = 5;
    pub(super) const WIDTH: u16 = 21;
}

impl Widget for Instructions {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let keys = |lead: &'static str, ks: [&'static str; 4]| {
            let mut line = Line::raw(lead);
            for (i, k) in ks.into_iter().enumerate() {
                if i > 0 {
                    line.push_span(" ");
                }
                line.push_span(Span::styled(k, consts::KEY_STYLE));
            }
            line
        };
        let text = Text::from_iter([
            Line::from("Move the snake with:"),
            keys("       ", ["←", "↓", "↑", "→"]),
            keys("   or: ", ["h", "j", "k", "l"]),
            keys("   or: ", ["a", "s", "w", "d"]),
            Line::from("Eat the food in time!"),
        ]);
        debug_assert_eq!(
            text.height(),
            usize::from(Self::HEIGHT),
            "Instructions::HEIGHT is wrong"
        );
        debug_assert_eq!(
            text.width(),
            usize::from(Self::WIDTH),
            "Instructions::WIDTH is wrong"
        );
        text.render(area, buf);
    }
}
