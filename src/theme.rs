use ratatui::style::{Color, Modifier, Style};

pub const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub const CONTROL_STYLE: Style = BASE_STYLE.fg(Color::LightCyan);

pub const HEADING_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub const WEEKEND_HEADING_STYLE: Style = HEADING_STYLE.fg(Color::Gray);

pub const WEEKEND_DAY_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub const TODAY_STYLE: Style = BASE_STYLE
    .fg(Color::LightRed)
    .add_modifier(Modifier::BOLD);

pub const SELECTED_DAY_STYLE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::White)
    .add_modifier(Modifier::BOLD);

pub const SELECTED_TODAY_STYLE: Style = Style::new()
    .fg(Color::White)
    .bg(Color::Red)
    .add_modifier(Modifier::BOLD);

pub const EVENT_INDICATOR_STYLE: Style = BASE_STYLE.fg(Color::LightYellow);

pub const STATUS_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub mod jumpto {
    use super::*;

    pub const UNFILLED_CELL_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub const READY_ENTER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}

/// Styles for every part of the calendar.
///
/// [`CalendarStyle::default()`] is the stock theme.  A host customises the
/// look by building a [`CalendarStyle::plain()`], setting only the parts it
/// cares about, and handing it to
/// [`CalendarConfig::custom_style()`](crate::calendar::CalendarConfig::custom_style);
/// each part is then [patched](Style::patch) over the stock theme.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CalendarStyle {
    pub calendar_container: Style,
    pub calendar_controls: Style,
    pub control_button: Style,
    pub title: Style,
    pub calendar_heading: Style,
    pub day_heading: Style,
    pub weekend_heading: Style,
    pub month_container: Style,
    pub week_row: Style,
    pub day_button: Style,
    pub day_button_filler: Style,
    pub day: Style,
    pub weekend_day: Style,
    pub current_day: Style,
    pub selected_day: Style,
    pub selected_current_day: Style,
    pub event_indicator: Style,
}

impl CalendarStyle {
    /// A style set that changes nothing
    pub const fn plain() -> CalendarStyle {
        CalendarStyle {
            calendar_container: Style::new(),
            calendar_controls: Style::new(),
            control_button: Style::new(),
            title: Style::new(),
            calendar_heading: Style::new(),
            day_heading: Style::new(),
            weekend_heading: Style::new(),
            month_container: Style::new(),
            week_row: Style::new(),
            day_button: Style::new(),
            day_button_filler: Style::new(),
            day: Style::new(),
            weekend_day: Style::new(),
            current_day: Style::new(),
            selected_day: Style::new(),
            selected_current_day: Style::new(),
            event_indicator: Style::new(),
        }
    }

    #[must_use]
    pub fn patch(self, other: &CalendarStyle) -> CalendarStyle {
        CalendarStyle {
            calendar_container: self.calendar_container.patch(other.calendar_container),
            calendar_controls: self.calendar_controls.patch(other.calendar_controls),
            control_button: self.control_button.patch(other.control_button),
            title: self.title.patch(other.title),
            calendar_heading: self.calendar_heading.patch(other.calendar_heading),
            day_heading: self.day_heading.patch(other.day_heading),
            weekend_heading: self.weekend_heading.patch(other.weekend_heading),
            month_container: self.month_container.patch(other.month_container),
            week_row: self.week_row.patch(other.week_row),
            day_button: self.day_button.patch(other.day_button),
            day_button_filler: self.day_button_filler.patch(other.day_button_filler),
            day: self.day.patch(other.day),
            weekend_day: self.weekend_day.patch(other.weekend_day),
            current_day: self.current_day.patch(other.current_day),
            selected_day: self.selected_day.patch(other.selected_day),
            selected_current_day: self.selected_current_day.patch(other.selected_current_day),
            event_indicator: self.event_indicator.patch(other.event_indicator),
        }
    }
}

impl Default for CalendarStyle {
    fn default() -> CalendarStyle {
        CalendarStyle {
            calendar_container: BASE_STYLE,
            calendar_controls: BASE_STYLE,
            control_button: CONTROL_STYLE,
            title: TITLE_STYLE,
            calendar_heading: BASE_STYLE,
            day_heading: HEADING_STYLE,
            weekend_heading: WEEKEND_HEADING_STYLE,
            month_container: BASE_STYLE,
            week_row: BASE_STYLE,
            day_button: BASE_STYLE,
            day_button_filler: BASE_STYLE,
            day: BASE_STYLE,
            weekend_day: WEEKEND_DAY_STYLE,
            current_day: TODAY_STYLE,
            selected_day: SELECTED_DAY_STYLE,
            selected_current_day: SELECTED_TODAY_STYLE,
            event_indicator: EVENT_INDICATOR_STYLE,
        }
    }
}
