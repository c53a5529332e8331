use crate::game::Game;
use crate::menu::MainMenu;
use crate::options::Options;
use crate::records::RecordStore;
use crate::scores::RecordsScreen;
use ratatui::{backend::Backend, Terminal};
use std::io;

#[derive(Clone, Debug)]
pub(crate) struct App {
    screen: Screen,
}

impl App {
    pub(crate) fn new(globals: Globals) -> App {
        App {
            screen: Screen::Main(MainMenu::new(globals)),
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.process_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        match self.screen {
            Screen::Main(ref menu) => {
                terminal.draw(|frame| menu.draw(frame))?;
            }
            Screen::Game(ref game) => {
                terminal.draw(|frame| game.draw(frame))?;
            }
            Screen::Records(ref records) => {
                terminal.draw(|frame| records.draw(frame))?;
            }
            Screen::Quit => (),
        }
        Ok(())
    }

    fn process_input(&mut self) -> io::Result<()> {
        let next = match self.screen {
            Screen::Main(ref mut menu) => menu.process_input()?,
            Screen::Game(ref mut game) => game.process_input()?,
            Screen::Records(ref mut records) => records.process_input()?,
            Screen::Quit => None,
        };
        if let Some(screen) = next {
            self.screen = screen;
        }
        Ok(())
    }

    fn quitting(&self) -> bool {
        matches!(self.screen, Screen::Quit)
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Screen {
    Main(MainMenu),
    Game(Game),
    Records(RecordsScreen),
    Quit,
}

/// State carried from screen to screen for the life of the program
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Globals {
    /// The most recently chosen gameplay options
    pub(crate) options: Options,

    pub(crate) records: RecordStore,

    /// Name under which finished games are recorded
    pub(crate) player_name: String,
}

#[cfg(test)]
pub(crate) fn test_globals(dir: &std::path::Path) -> Globals {
    Globals {
        options: Options::default(),
        records: RecordStore::load(dir.join("records.json")),
        player_name: String::from("Tester"),
    }
}
