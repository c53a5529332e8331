use crate::app::{Globals, Screen};
use crate::command::Command;
use crate::consts;
use crate::menu::MainMenu;
use crate::records::{GameRecord, RECORDS_SHOWN};
use crate::util::{center_rect, format_time, get_display_area};
use crossterm::event::{read, Event};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect, Size},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Row, Table, Widget},
    Frame,
};

/// Screen listing the best recorded games
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct RecordsScreen {
    globals: Globals,

    /// Result of the last action taken on this screen
    message: Option<String>,
}

impl RecordsScreen {
    const TABLE_WIDTHS: [u16; 6] = [3, 20, 6, 6, 8, 10];

    pub(crate) fn new(mut globals: Globals) -> RecordsScreen {
        // Games may have been recorded by another instance since startup
        globals.records.refresh();
        RecordsScreen {
            globals,
            message: None,
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Screen>> {
        Ok(self.handle_event(read()?))
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        match Command::from_key_event(event.as_key_press_event()?)? {
            Command::C => self.clear(),
            Command::Esc | Command::Enter | Command::M => {
                return Some(Screen::Main(MainMenu::new(self.globals.clone())));
            }
            Command::Q | Command::Quit => return Some(Screen::Quit),
            _ => (),
        }
        None
    }

    fn clear(&mut self) {
        let msg = match self.globals.records.clear_records() {
            Ok(()) => "All records cleared",
            Err(e) => {
                log::error!("{:?}", anyhow::Error::from(e));
                "Records could not be cleared; see the log for details"
            }
        };
        self.message = Some(String::from(msg));
    }

    fn table_width() -> u16 {
        let columns = Self::TABLE_WIDTHS.iter().sum::<u16>();
        let spacing = u16::try_from(Self::TABLE_WIDTHS.len() - 1).unwrap_or_default();
        columns + spacing
    }
}

impl Widget for &RecordsScreen {
    /*
     *                                   RECORDS
     *
     *           #   Player                Score  Time   Mode     Date
     *           1   Alice                 42     1:15   classic  2026-10-19
     *           …
     *
     *                              All records cleared
     *
     *    Records file: ~/.local/share/timed-snake/records.json
     *    Back (Esc) · Clear Records (c) · Quit (q)
     */

    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [title_area, _, table_area, _, message_area, _, path_area, keys_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(u16::try_from(RECORDS_SHOWN + 1).unwrap_or(u16::MAX)),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(display);

        Line::styled("RECORDS", Style::new().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .render(title_area, buf);

        let table_area = center_rect(
            table_area,
            Size {
                width: RecordsScreen::table_width(),
                height: table_area.height,
            },
        );
        let records = self.globals.records.top_records(RECORDS_SHOWN);
        if records.is_empty() {
            Line::raw("No games recorded yet")
                .alignment(Alignment::Center)
                .render(table_area, buf);
        } else {
            let header = Row::new(["#", "Player", "Score", "Time", "Mode", "Date"])
                .style(consts::TABLE_HEADER_STYLE);
            let rows = records
                .iter()
                .enumerate()
                .map(|(i, rec)| record_row(i + 1, rec));
            Table::new(rows, RecordsScreen::TABLE_WIDTHS)
                .header(header)
                .render(table_area, buf);
        }

        if let Some(ref msg) = self.message {
            Line::raw(msg.as_str())
                .alignment(Alignment::Center)
                .render(message_area, buf);
        }

        Line::raw(format!(
            " Records file: {}",
            self.globals.records.path().display()
        ))
        .render(path_area, buf);
        Line::from_iter([
            Span::raw(" Back ("),
            Span::styled("Esc", consts::KEY_STYLE),
            Span::raw(") · Clear Records ("),
            Span::styled("c", consts::KEY_STYLE),
            Span::raw(") · Quit ("),
            Span::styled("q", consts::KEY_STYLE),
            Span::raw(")"),
        ])
        .render(keys_area, buf);
    }
}

fn record_row(rank: usize, rec: &GameRecord) -> Row<'_> {
    Row::new([
        Cell::from(rank.to_string()),
        Cell::from(rec.player_name.as_str()),
        Cell::from(rec.score.to_string()),
        Cell::from(format_time(rec.time_in_seconds)),
        Cell::from(rec.difficulty.as_deref().unwrap_or("-")),
        Cell::from(rec.date.get(..10).unwrap_or(&rec.date)),
    ])
}
