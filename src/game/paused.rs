use crate::command::Command;
use crate::consts;
use crate::util::EnumExt;
use crossterm::event::Event;
use enum_map::Enum;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        block::{Block, Padding},
        Widget,
    },
};

/// The pause menu pop-up
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Paused {
    selection: PauseOpt,
}

impl Paused {
    pub(super) const HEIGHT: u16 = 6;
    pub(super) const WIDTH: u16 = 19;

    pub(super) fn new() -> Paused {
        Paused {
            selection: PauseOpt::min(),
        }
    }

    /// Handle an input event.  Returns `Some` if the user made a choice.
    pub(super) fn handle_event(&mut self, event: Event) -> Option<PauseOpt> {
        match Command::from_key_event(event.as_key_press_event()?)? {
            Command::Esc | Command::P => return Some(PauseOpt::Resume),
            Command::R => return Some(PauseOpt::Restart),
            Command::M => return Some(PauseOpt::MainMenu),
            Command::Q | Command::Quit => return Some(PauseOpt::Quit),
            Command::Enter | Command::Space => return Some(self.selection),
            Command::Up => self.selection = self.selection.prev().unwrap_or(self.selection),
            Command::Down => self.selection = self.selection.next().unwrap_or(self.selection),
            Command::Next => self.selection = self.selection.next().unwrap_or_else(PauseOpt::min),
            Command::Prev => self.selection = self.selection.prev().unwrap_or_else(PauseOpt::max),
            Command::Home => self.selection = PauseOpt::min(),
            Command::End => self.selection = PauseOpt::max(),
            _ => (),
        }
        None
    }
}

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(super) enum PauseOpt {
    Resume,
    Restart,
    MainMenu,
    Quit,
}

impl PauseOpt {
    /// The option's label and the key that chooses it
    fn label(self) -> (&'static str, &'static str) {
        match self {
            PauseOpt::Resume => ("Resume", "Esc"),
            PauseOpt::Restart => ("Restart", "r"),
            PauseOpt::MainMenu => ("Main Menu", "m"),
            PauseOpt::Quit => ("Quit", "q"),
        }
    }

    fn to_line(self, selected: bool) -> Line<'static> {
        let (label, key) = self.label();
        let line = Line::from_iter([
            Span::raw(if selected { "» " } else { "  " }),
            Span::raw(format!("{label} (")),
            Span::styled(key, consts::KEY_STYLE),
            Span::raw(")"),
        ]);
        if selected {
            line.style(consts::MENU_SELECTION_STYLE)
        } else {
            line
        }
    }
}

impl Widget for Paused {
    /*
     * ┌──── PAUSED ─────┐
     * │ » Resume (Esc)  │
     * │   Restart (r)   │
     * │   Main Menu (m) │
     * │   Quit (q)      │
     * └─────────────────┘
     */

    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" PAUSED ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1))
            .style(Style::reset());
        let inner = block.inner(area);
        block.render(area, buf);
        for (opt, row) in PauseOpt::iter().zip(inner.rows()) {
            opt.to_line(self.selection == opt).render(row, buf);
        }
    }
}
