use crate::consts;
use crate::engine::{GameConfig, Variant};
use crate::util::EnumExt;
use enum_dispatch::enum_dispatch;
use enum_map::Enum;
use ratatui::layout::Size;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gameplay options chosen on the main menu
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Options {
    pub(crate) mode: Variant,
    pub(crate) level_size: LevelSize,
}

impl Options {
    pub(crate) fn get(&self, key: OptKey) -> OptValue {
        match key {
            OptKey::Mode => self.mode.into(),
            OptKey::LevelSize => self.level_size.into(),
        }
    }

    pub(crate) fn set(&mut self, key: OptKey, value: OptValue) {
        match key {
            OptKey::Mode => {
                self.mode = value
                    .try_into()
                    .expect("Options::set(Mode, value) called with non-Variant value");
            }
            OptKey::LevelSize => {
                self.level_size = value
                    .try_into()
                    .expect("Options::set(LevelSize, value) called with non-LevelSize value");
            }
        }
    }

    /// The parameters for a game played with these options
    pub(crate) fn game_config(&self) -> GameConfig {
        let Size { width, height } = self.level_size.as_size();
        self.mode.config(width, height, consts::CELL_WIDTH)
    }
}

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(crate) enum OptKey {
    Mode,
    LevelSize,
}

impl OptKey {
    pub(crate) const DISPLAY_WIDTH: u16 = 10;

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            OptKey::Mode => "Mode",
            OptKey::LevelSize => "Level Size",
        }
    }
}

impl fmt::Display for OptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[enum_dispatch]
pub(crate) trait Adjustable {
    fn increase(&mut self);
    fn decrease(&mut self);
    fn toggle(&mut self);
    fn can_increase(&self) -> bool;
    fn can_decrease(&self) -> bool;
}

#[enum_dispatch(Adjustable)] // This also gives us From and TryInto
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum OptValue {
    Variant,
    LevelSize,
}

impl OptValue {
    pub(crate) const DISPLAY_WIDTH: u16 = 11;
}

// This is needed for EnumMap to be convenient to construct.
impl Default for OptValue {
    fn default() -> OptValue {
        OptValue::Variant(Variant::default())
    }
}

impl fmt::Display for OptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptValue::Variant(v) => write_adjustable(f, v),
            OptValue::LevelSize(sz) => write_adjustable(f, sz),
        }
    }
}

/// Write `value` between arrows showing which ways it can be adjusted
fn write_adjustable<T: Adjustable + fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    value: &T,
) -> fmt::Result {
    write!(
        f,
        "{left} {value:7} {right}",
        left = if value.can_decrease() { '◀' } else { '◁' },
        right = if value.can_increase() { '▶' } else { '▷' }
    )
}

impl Adjustable for Variant {
    fn increase(&mut self) {
        *self = Variant::Classic;
    }

    fn decrease(&mut self) {
        *self = Variant::Basic;
    }

    fn toggle(&mut self) {
        *self = match self {
            Variant::Basic => Variant::Classic,
            Variant::Classic => Variant::Basic,
        };
    }

    fn can_increase(&self) -> bool {
        *self != Variant::Classic
    }

    fn can_decrease(&self) -> bool {
        *self != Variant::Basic
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Enum, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum LevelSize {
    Small,
    Medium,
    #[default]
    Large,
}

impl LevelSize {
    /// The dimensions of the board, in cells
    pub(crate) fn as_size(self) -> Size {
        match self {
            LevelSize::Small => Size {
                width: 19,
                height: 8,
            },
            LevelSize::Medium => Size {
                width: 26,
                height: 12,
            },
            LevelSize::Large => Size {
                width: 38,
                height: 19,
            },
        }
    }
}

impl fmt::Display for LevelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LevelSize::Small => "Small",
            LevelSize::Medium => "Medium",
            LevelSize::Large => "Large",
        };
        f.pad(name)
    }
}

impl Adjustable for LevelSize {
    fn increase(&mut self) {
        if let Some(sz) = self.next() {
            *self = sz;
        }
    }

    fn decrease(&mut self) {
        if let Some(sz) = self.prev() {
            *self = sz;
        }
    }

    fn toggle(&mut self) {}

    fn can_increase(&self) -> bool {
        *self != Self::max()
    }

    fn can_decrease(&self) -> bool {
        *self != Self::min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    mod opt_key {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn display_width() {
            let actual_width = OptKey::iter()
                .map(|key| key.as_str().chars().count())
                .max()
                .unwrap();
            assert_eq!(actual_width, usize::from(OptKey::DISPLAY_WIDTH));
        }

        #[test]
        fn fmt_width() {
            assert_eq!(
                format!(
                    "{:width$}",
                    OptKey::Mode,
                    width = usize::from(OptKey::DISPLAY_WIDTH)
                ),
                "Mode      "
            );
        }
    }

    mod opt_value {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn display_width() {
            for value in [
                OptValue::Variant(Variant::Basic),
                OptValue::Variant(Variant::Classic),
                OptValue::LevelSize(LevelSize::Small),
                OptValue::LevelSize(LevelSize::Medium),
                OptValue::LevelSize(LevelSize::Large),
            ] {
                assert_eq!(
                    value.to_string().chars().count(),
                    usize::from(OptValue::DISPLAY_WIDTH),
                    "{value:?}"
                );
            }
        }

        #[test]
        fn display() {
            assert_eq!(
                OptValue::Variant(Variant::Classic).to_string(),
                "◀ Classic ▷"
            );
            assert_eq!(
                OptValue::LevelSize(LevelSize::Small).to_string(),
                "◁ Small   ▶"
            );
        }
    }

    mod variant {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn adjust() {
            let mut v = Variant::Classic;
            assert!(!v.can_increase());
            v.decrease();
            assert_eq!(v, Variant::Basic);
            assert!(!v.can_decrease());
            v.toggle();
            assert_eq!(v, Variant::Classic);
        }
    }

    mod level_size {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn fmt_width() {
            assert_eq!(format!("{:6}", LevelSize::Small), "Small ");
        }

        #[test]
        fn adjust() {
            let mut sz = LevelSize::Small;
            sz.increase();
            assert_eq!(sz, LevelSize::Medium);
            sz.increase();
            sz.increase();
            assert_eq!(sz, LevelSize::Large);
            assert!(!sz.can_increase());
            sz.decrease();
            assert_eq!(sz, LevelSize::Medium);
        }

        #[test]
        fn fits_on_screen() {
            for sz in LevelSize::iter() {
                let Size { width, height } = sz.as_size();
                // Board plus border, status bar, and two message lines
                assert!(width * consts::CELL_WIDTH + 2 <= consts::DISPLAY_SIZE.width);
                assert!(height + 5 <= consts::DISPLAY_SIZE.height);
            }
        }
    }

    #[test]
    fn game_config() {
        let opts = Options {
            mode: Variant::Basic,
            level_size: LevelSize::Small,
        };
        let config = opts.game_config();
        assert_eq!(config.board_width, 19);
        assert_eq!(config.board_height, 8);
        assert_eq!(config.cell_size, 2);
        assert_eq!(config.score_step, 10);
    }

    #[test]
    fn get_set() {
        let mut opts = Options::default();
        assert_eq!(opts.get(OptKey::Mode), OptValue::Variant(Variant::Classic));
        opts.set(OptKey::LevelSize, OptValue::LevelSize(LevelSize::Medium));
        assert_eq!(opts.level_size, LevelSize::Medium);
    }
}
