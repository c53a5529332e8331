mod widgets;
use self::widgets::{Instructions, Logo};
use crate::app::{Globals, Screen};
use crate::command::Command;
use crate::consts;
use crate::game::Game;
use crate::options::{Adjustable, OptKey, OptValue, Options};
use crate::scores::RecordsScreen;
use crate::util::{get_display_area, EnumExt};
use crossterm::event::{read, Event};
use enum_map::{Enum, EnumMap};
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        block::{Block, Padding},
        Widget,
    },
    Frame,
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MainMenu {
    selection: Selection,
    options: OptionsMenu,
    globals: Globals,
}

impl MainMenu {
    pub(crate) fn new(globals: Globals) -> Self {
        MainMenu {
            selection: Selection::default(),
            options: OptionsMenu::new(globals.options),
            globals,
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Screen>> {
        Ok(self.handle_event(read()?))
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        match (
            self.selection,
            Command::from_key_event(event.as_key_press_event()?)?,
        ) {
            (_, Command::Quit) => return Some(Screen::Quit),
            (_, Command::Home) => self.select(Selection::PlayButton, None),
            (_, Command::End) => self.select(Selection::QuitButton, None),
            (Selection::PlayButton, Command::Enter) | (_, Command::P) => {
                return Some(Screen::Game(Game::new(self.chosen_globals())));
            }
            (Selection::PlayButton, Command::Prev) => self.select(Selection::QuitButton, None),
            (Selection::PlayButton, Command::Down | Command::Next) => {
                self.select(Selection::Options, Some(true));
            }
            (Selection::Options, Command::Up | Command::Prev) => {
                if let Some(sel) = self.options.move_up() {
                    self.select(sel, None);
                }
            }
            (Selection::Options, Command::Down | Command::Next) => {
                if let Some(sel) = self.options.move_down() {
                    self.select(sel, None);
                }
            }
            (Selection::Options, Command::Left) => self.options.move_left(),
            (Selection::Options, Command::Right) => self.options.move_right(),
            (Selection::Options, Command::Space | Command::Enter) => self.options.toggle(),
            (Selection::RecordsButton, Command::Enter) | (_, Command::R) => {
                return Some(Screen::Records(RecordsScreen::new(self.chosen_globals())));
            }
            (Selection::RecordsButton, Command::Up | Command::Prev) => {
                self.select(Selection::Options, Some(false));
            }
            (Selection::RecordsButton, Command::Down | Command::Next) => {
                self.select(Selection::QuitButton, None);
            }
            (Selection::QuitButton, Command::Enter) | (_, Command::Q) => {
                return Some(Screen::Quit);
            }
            (Selection::QuitButton, Command::Next) => self.select(Selection::PlayButton, None),
            (Selection::QuitButton, Command::Up | Command::Prev) => {
                self.select(Selection::RecordsButton, None);
            }
            _ => (),
        }
        None
    }

    /// The globals to pass on to the next screen, carrying the options
    /// currently selected in the menu
    fn chosen_globals(&self) -> Globals {
        let mut globals = self.globals.clone();
        globals.options = self.options.to_options();
        globals
    }

    fn select(&mut self, selection: Selection, first_option: Option<bool>) {
        self.selection = selection;
        if selection == Selection::Options {
            if let Some(first) = first_option {
                self.options.selection = if first {
                    Some(OptKey::min())
                } else {
                    Some(OptKey::max())
                };
            }
        } else {
            self.options.selection = None;
        }
    }
}

impl Widget for &MainMenu {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [logo_area, instructions_area, play_area, options_area, records_area, quit_area] =
            Layout::vertical([
                Logo::HEIGHT,
                Instructions::HEIGHT,
                1,
                OptionsMenu::HEIGHT,
                1,
                1,
            ])
            .flex(Flex::Start)
            .spacing(1)
            .areas(display);

        let [logo_area] = Layout::horizontal([Logo::WIDTH])
            .flex(Flex::Center)
            .areas(logo_area);
        Logo.render(logo_area, buf);

        let [instructions_area] = Layout::horizontal([Instructions::WIDTH])
            .flex(Flex::Center)
            .areas(instructions_area);
        Instructions.render(instructions_area, buf);

        button("Play", "p", self.selection == Selection::PlayButton).render(play_area, buf);

        let [options_area] = Layout::horizontal([OptionsMenu::WIDTH])
            .flex(Flex::Center)
            .areas(options_area);
        (&self.options).render(options_area, buf);

        button("Records", "r", self.selection == Selection::RecordsButton)
            .render(records_area, buf);
        button("Quit", "q", self.selection == Selection::QuitButton).render(quit_area, buf);
    }
}

/// A centered `[Label (k)]` button
fn button(label: &'static str, key: &'static str, selected: bool) -> Line<'static> {
    let style = if selected {
        consts::MENU_SELECTION_STYLE
    } else {
        Style::new()
    };
    Line::from_iter([
        Span::styled(format!("[{label} ("), style),
        Span::styled(key, consts::KEY_STYLE.patch(style)),
        Span::styled(")]", style),
    ])
    .centered()
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum Selection {
    #[default]
    PlayButton,
    Options,
    RecordsButton,
    QuitButton,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct OptionsMenu {
    /// If the currently-selected main menu item is an element of this menu,
    /// then `selection` is `Some(key)`, where `key` is the key of the selected
    /// item within the `OptionsMenu`.
    selection: Option<OptKey>,
    settings: EnumMap<OptKey, OptValue>,
}

impl OptionsMenu {
    #[allow(clippy::cast_possible_truncation)]
    const HEIGHT: u16 = (OptKey::LENGTH as u16) + 2 /* for border */;
    const HORIZONTAL_PADDING: u16 = 1; // padding on each side
    const POINTER_WIDTH: u16 = 2;
    const LABEL_VALUE_GUTTER: u16 = 2;
    const WIDTH: u16 = 2 /* for border */ + 2 * Self::HORIZONTAL_PADDING + Self::POINTER_WIDTH + OptKey::DISPLAY_WIDTH + Self::LABEL_VALUE_GUTTER + OptValue::DISPLAY_WIDTH;

    fn new(options: Options) -> Self {
        let settings = EnumMap::from_iter(OptKey::iter().map(|key| (key, options.get(key))));
        OptionsMenu {
            selection: None,
            settings,
        }
    }

    fn to_options(&self) -> Options {
        let mut opts = Options::default();
        for key in OptKey::iter() {
            opts.set(key, self.settings[key]);
        }
        opts
    }

    fn move_up(&mut self) -> Option<Selection> {
        self.selection = self.selection?.prev();
        self.selection.is_none().then_some(Selection::PlayButton)
    }

    fn move_down(&mut self) -> Option<Selection> {
        self.selection = self.selection?.next();
        self.selection.is_none().then_some(Selection::RecordsButton)
    }

    fn move_left(&mut self) {
        if let Some(sel) = self.selection {
            self.settings[sel].decrease();
        }
    }

    fn move_right(&mut self) {
        if let Some(sel) = self.selection {
            self.settings[sel].increase();
        }
    }

    fn toggle(&mut self) {
        if let Some(sel) = self.selection {
            self.settings[sel].toggle();
        }
    }
}

impl Widget for &OptionsMenu {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" Options: ")
            .padding(Padding::horizontal(OptionsMenu::HORIZONTAL_PADDING));
        let menu_area = block.inner(area);
        block.render(area, buf);
        for ((key, value), row) in OptKey::iter()
            .map(|key| (key, self.settings[key]))
            .zip(menu_area.rows())
        {
            let selected = Some(key) == self.selection;
            let style = if selected {
                consts::MENU_SELECTION_STYLE
            } else {
                Style::new()
            };
            let s = format!(
                "{pointer:pwidth$}{key:lwidth$}{space:gutter$}{value}",
                pointer = if selected { "»" } else { "" },
                pwidth = usize::from(OptionsMenu::POINTER_WIDTH),
                lwidth = usize::from(OptKey::DISPLAY_WIDTH),
                space = "",
                gutter = usize::from(OptionsMenu::LABEL_VALUE_GUTTER),
            );
            Span::styled(s, style).render(row, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Variant;
    use crate::options::LevelSize;
    use crate::app::test_globals;
    use crossterm::event::KeyCode;
    use tempfile::TempDir;

    fn globals(tmpdir: &TempDir) -> Globals {
        test_globals(tmpdir.path())
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(code.into())
    }

    /// The text of row `y` of `buf`, with trailing whitespace removed
    fn row_text(buf: &Buffer, y: u16) -> String {
        let mut s = (0..buf.area.width)
            .filter_map(|x| buf.cell((x, y)))
            .map(|cell| cell.symbol())
            .collect::<String>();
        s.truncate(s.trim_end().len());
        s
    }

    mod main_menu {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn draw_initial() {
            let tmpdir = TempDir::new().unwrap();
            let menu = MainMenu::new(globals(&tmpdir));
            let area = Rect::new(0, 0, 80, 24);
            let mut buffer = Buffer::empty(area);
            menu.render(area, &mut buffer);
            let rows = (0..24)
                .map(|y| row_text(&buffer, y).trim_start().to_owned())
                .collect::<Vec<_>>();
            assert_eq!(rows[8], "Move the snake with:");
            assert_eq!(rows[12], "Eat the food in time!");
            assert_eq!(rows[14], "[Play (p)]");
            assert_eq!(rows[16], "┌ Options: ─────────────────┐");
            assert_eq!(rows[17], "│   Mode        ◀ Classic ▷ │");
            assert_eq!(rows[18], "│   Level Size  ◀ Large   ▷ │");
            assert_eq!(rows[19], "└───────────────────────────┘");
            assert_eq!(rows[21], "[Records (r)]");
            assert_eq!(rows[23], "[Quit (q)]");
        }

        #[test]
        fn interact_options() {
            let tmpdir = TempDir::new().unwrap();
            let mut menu = MainMenu::new(globals(&tmpdir));
            assert!(menu.handle_event(key(KeyCode::Down)).is_none());
            assert_eq!(menu.selection, Selection::Options);
            assert_eq!(menu.options.selection, Some(OptKey::Mode));
            assert!(menu.handle_event(key(KeyCode::Char(' '))).is_none());
            assert!(menu.handle_event(key(KeyCode::Down)).is_none());
            assert_eq!(menu.options.selection, Some(OptKey::LevelSize));
            assert!(menu.handle_event(key(KeyCode::Left)).is_none());
            assert!(menu.handle_event(key(KeyCode::Left)).is_none());
            assert!(menu.handle_event(key(KeyCode::Left)).is_none());

            let area = Rect::new(0, 0, 80, 24);
            let mut buffer = Buffer::empty(area);
            menu.render(area, &mut buffer);
            assert_eq!(
                row_text(&buffer, 17).trim_start(),
                "│   Mode        ◁ Basic   ▶ │"
            );
            assert_eq!(
                row_text(&buffer, 18).trim_start(),
                "│ » Level Size  ◁ Small   ▶ │"
            );

            assert_eq!(
                menu.options.to_options(),
                Options {
                    mode: Variant::Basic,
                    level_size: LevelSize::Small,
                }
            );
            assert!(menu.handle_event(key(KeyCode::Down)).is_none());
            assert_eq!(menu.selection, Selection::RecordsButton);
            assert_eq!(menu.options.selection, None);
            let Some(Screen::Records(screen)) = menu.handle_event(key(KeyCode::Enter)) else {
                panic!("Enter on Records button did not open records screen");
            };
            let mut expected = globals(&tmpdir);
            expected.options.mode = Variant::Basic;
            expected.options.level_size = LevelSize::Small;
            assert_eq!(screen, RecordsScreen::new(expected));
        }

        #[test]
        fn play() {
            let tmpdir = TempDir::new().unwrap();
            let mut menu = MainMenu::new(globals(&tmpdir));
            assert!(menu.handle_event(key(KeyCode::Down)).is_none());
            assert!(menu.handle_event(key(KeyCode::Down)).is_none());
            assert!(menu.handle_event(key(KeyCode::Left)).is_none());
            let Some(Screen::Game(game)) = menu.handle_event(key(KeyCode::Char('p'))) else {
                panic!("'p' did not start a game");
            };
            assert_eq!(game.engine().config().board_width, 26);
        }

        #[test]
        fn quit_key() {
            let tmpdir = TempDir::new().unwrap();
            let mut menu = MainMenu::new(globals(&tmpdir));
            assert!(matches!(
                menu.handle_event(key(KeyCode::Char('q'))),
                Some(Screen::Quit)
            ));
        }

        #[test]
        fn quit_button() {
            let tmpdir = TempDir::new().unwrap();
            let mut menu = MainMenu::new(globals(&tmpdir));
            assert!(menu.handle_event(key(KeyCode::End)).is_none());
            assert_eq!(menu.selection, Selection::QuitButton);
            assert!(menu.handle_event(key(KeyCode::Up)).is_none());
            assert_eq!(menu.selection, Selection::RecordsButton);
            assert!(menu.handle_event(key(KeyCode::Down)).is_none());
            assert!(matches!(
                menu.handle_event(key(KeyCode::Enter)),
                Some(Screen::Quit)
            ));
        }

        /// Test that tabbing to the end of the options menu and then tabbing
        /// again until you loop back around to the options menu puts you at
        /// the start of the options.
        #[test]
        fn tab_wraparound() {
            let tmpdir = TempDir::new().unwrap();
            let mut menu = MainMenu::new(globals(&tmpdir));
            assert_eq!(menu.options.selection, None);
            for _ in OptKey::iter() {
                assert!(menu.handle_event(key(KeyCode::Tab)).is_none());
            }
            assert_eq!(menu.options.selection, Some(OptKey::max()));
            assert!(menu.handle_event(key(KeyCode::Tab)).is_none());
            assert_eq!(menu.selection, Selection::RecordsButton);
            assert_eq!(menu.options.selection, None);
            assert!(menu.handle_event(key(KeyCode::Tab)).is_none());
            assert_eq!(menu.selection, Selection::QuitButton);
            assert!(menu.handle_event(key(KeyCode::Tab)).is_none());
            assert!(menu.handle_event(key(KeyCode::Tab)).is_none());
            assert_eq!(menu.options.selection, Some(OptKey::min()));
        }

        #[test]
        fn backtab_from_records_enters_options_at_bottom() {
            let tmpdir = TempDir::new().unwrap();
            let mut menu = MainMenu::new(globals(&tmpdir));
            menu.select(Selection::RecordsButton, None);
            assert!(menu.handle_event(key(KeyCode::BackTab)).is_none());
            assert_eq!(menu.selection, Selection::Options);
            assert_eq!(menu.options.selection, Some(OptKey::max()));
        }
    }

    mod options_menu {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn roundtrip_defaults() {
            let opts = Options::default();
            let optmenu = OptionsMenu::new(opts);
            assert_eq!(optmenu.to_options(), opts);
        }

        #[test]
        fn roundtrip_custom() {
            let opts = Options {
                mode: Variant::Basic,
                level_size: LevelSize::Medium,
            };
            let optmenu = OptionsMenu::new(opts);
            assert_eq!(optmenu.to_options(), opts);
        }
    }
}
