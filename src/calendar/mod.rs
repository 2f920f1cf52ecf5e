//! A swipeable month/week calendar widget.
//!
//! [`CalendarState`] holds the current period, the selection and the
//! horizontal position of the paging container; the [`Calendar`] widget draws
//! it.  User interaction is fed to the state's methods, and whatever the host
//! needs to hear about comes back through a [`CalendarHandler`].
mod config;
mod day;
mod grid;
mod period;
mod state;
mod widget;
pub use self::config::{CalendarConfig, ConfigError};
pub use self::day::Day;
pub use self::grid::{DayCell, GridContext, PeriodGrid};
pub use self::period::{number_of_weeks, CalendarFormat, OutOfTimeError};
pub use self::state::{CalendarState, VIEW_INDEX};
pub use self::widget::Calendar;
use time::Date;

/// Number of columns per day of week
pub const DAY_WIDTH: u16 = 6;

/// Width of one page of the grid
pub const GRID_WIDTH: u16 = 7 * DAY_WIDTH;

/// Number of lines taken up by each week of the grid
pub const ROW_HEIGHT: u16 = 2;

/// Height of the grid in weekly format
pub const WEEKLY_HEIGHT: u16 = 2;

/// Lines above the grid: the title bar, the day headings, and a rule
pub const CHROME_LINES: u16 = 3;

/// Receives notifications from a [`CalendarState`].  Every method does
/// nothing by default.
pub trait CalendarHandler {
    /// A day cell was tapped
    fn on_date_select(&mut self, _date: Date) {}

    /// The user swiped to a later period starting on `_period_start`
    fn on_swipe_next(&mut self, _period_start: Date) {}

    /// The user swiped to an earlier period starting on `_period_start`
    fn on_swipe_prev(&mut self, _period_start: Date) {}

    /// The "next" control was pressed, making `_current` current
    fn on_touch_next(&mut self, _current: Date) {}

    /// The "previous" control was pressed, making `_current` current
    fn on_touch_prev(&mut self, _current: Date) {}

    fn on_title_press(&mut self) {}
}

impl CalendarHandler for () {}

impl<H: CalendarHandler + ?Sized> CalendarHandler for &mut H {
    fn on_date_select(&mut self, date: Date) {
        (**self).on_date_select(date);
    }

    fn on_swipe_next(&mut self, period_start: Date) {
        (**self).on_swipe_next(period_start);
    }

    fn on_swipe_prev(&mut self, period_start: Date) {
        (**self).on_swipe_prev(period_start);
    }

    fn on_touch_next(&mut self, current: Date) {
        (**self).on_touch_next(current);
    }

    fn on_touch_prev(&mut self, current: Date) {
        (**self).on_touch_prev(current);
    }

    fn on_title_press(&mut self) {
        (**self).on_title_press();
    }
}

/// A notification from a [`CalendarState`], as recorded by the
/// [`CalendarHandler`] impl for `Vec<CalendarEvent>`
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CalendarEvent {
    DateSelect(Date),
    SwipeNext(Date),
    SwipePrev(Date),
    TouchNext(Date),
    TouchPrev(Date),
    TitlePress,
}

impl CalendarHandler for Vec<CalendarEvent> {
    fn on_date_select(&mut self, date: Date) {
        self.push(CalendarEvent::DateSelect(date));
    }

    fn on_swipe_next(&mut self, period_start: Date) {
        self.push(CalendarEvent::SwipeNext(period_start));
    }

    fn on_swipe_prev(&mut self, period_start: Date) {
        self.push(CalendarEvent::SwipePrev(period_start));
    }

    fn on_touch_next(&mut self, current: Date) {
        self.push(CalendarEvent::TouchNext(current));
    }

    fn on_touch_prev(&mut self, current: Date) {
        self.push(CalendarEvent::TouchPrev(current));
    }

    fn on_title_press(&mut self) {
        self.push(CalendarEvent::TitlePress);
    }
}
