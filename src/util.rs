use crate::consts;
use enum_map::Enum;
use ratatui::layout::{Flex, Layout, Rect, Size};
use std::time::{Duration, Instant};

/// Return the area of the terminal in which everything is drawn
pub(crate) fn get_display_area(buffer_area: Rect) -> Rect {
    center_rect(buffer_area, consts::DISPLAY_SIZE)
}

/// Return a `Rect` of the given size centered within `area`, shrunk if
/// necessary to fit
pub(crate) fn center_rect(area: Rect, size: Size) -> Rect {
    let [area] = Layout::horizontal([size.width])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([size.height])
        .flex(Flex::Center)
        .areas(area);
    area
}

/// Stepping through the variants of a field-less enum in declaration order
pub(crate) trait EnumExt: Enum {
    fn min() -> Self {
        Self::from_usize(0)
    }

    fn max() -> Self {
        Self::from_usize(Self::LENGTH - 1)
    }

    fn next(self) -> Option<Self> {
        let i = self.into_usize() + 1;
        (i < Self::LENGTH).then(|| Self::from_usize(i))
    }

    fn prev(self) -> Option<Self> {
        self.into_usize().checked_sub(1).map(Self::from_usize)
    }

    fn iter() -> impl Iterator<Item = Self> {
        (0..Self::LENGTH).map(Self::from_usize)
    }
}

impl<T: Enum> EnumExt for T {}

/// A monotonic clock counting milliseconds since it was created.  Game
/// engines are handed times from one of these.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Clock {
    epoch: Instant,
}

impl Clock {
    pub(crate) fn new() -> Clock {
        Clock {
            epoch: Instant::now(),
        }
    }

    pub(crate) fn now_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// How long from now until the clock reads `ms`
    pub(crate) fn until(&self, ms: u64) -> Duration {
        (self.epoch + Duration::from_millis(ms)).saturating_duration_since(Instant::now())
    }
}

/// Given that a tick was due at `prev_due` and happened at `now`, return when
/// the next tick is due.  Ticks are kept on a fixed grid of `period`
/// milliseconds, except that if the previous tick ran more than a whole
/// period late, the grid is restarted from `now`.
pub(crate) fn next_deadline(prev_due: u64, period: u64, now: u64) -> u64 {
    if now.saturating_sub(prev_due) > period {
        now.saturating_add(period)
    } else {
        prev_due.saturating_add(period)
    }
}

/// Format a number of seconds as minutes and seconds, e.g. `2:05`
pub(crate) fn format_time(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
    enum Trio {
        One,
        Two,
        Three,
    }

    #[test]
    fn enum_ext() {
        assert_eq!(Trio::min(), Trio::One);
        assert_eq!(Trio::max(), Trio::Three);
        assert_eq!(Trio::One.next(), Some(Trio::Two));
        assert_eq!(Trio::Three.next(), None);
        assert_eq!(Trio::One.prev(), None);
        assert_eq!(Trio::Three.prev(), Some(Trio::Two));
        assert_eq!(
            Trio::iter().collect::<Vec<_>>(),
            [Trio::One, Trio::Two, Trio::Three]
        );
    }

    #[rstest]
    #[case(1000, 250, 1000, 1250)]
    #[case(1000, 250, 1010, 1250)]
    #[case(1000, 250, 1250, 1250)]
    #[case(1000, 250, 1251, 1501)]
    #[case(1000, 150, 5000, 5150)]
    fn test_next_deadline(
        #[case] prev_due: u64,
        #[case] period: u64,
        #[case] now: u64,
        #[case] next: u64,
    ) {
        assert_eq!(next_deadline(prev_due, period, now), next);
    }

    #[rstest]
    #[case(0, "0:00")]
    #[case(9, "0:09")]
    #[case(75, "1:15")]
    #[case(3600, "60:00")]
    fn test_format_time(#[case] secs: u64, #[case] s: &str) {
        assert_eq!(format_time(secs), s);
    }

    #[test]
    fn center() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(
            center_rect(
                area,
                Size {
                    width: 20,
                    height: 4
                }
            ),
            Rect::new(30, 10, 20, 4)
        );
        assert_eq!(get_display_area(area), area);
        assert_eq!(
            get_display_area(Rect::new(0, 0, 100, 30)),
            Rect::new(10, 3, 80, 24)
        );
    }

    #[test]
    fn clock_runs_forwards() {
        let clock = Clock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
        assert!(clock.until(0).is_zero());
    }
}
