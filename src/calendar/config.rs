use super::period::CalendarFormat;
use crate::events::{Event, EventMap};
use crate::theme::CalendarStyle;
use thiserror::Error;
use time::{
    error::InvalidFormatDescription,
    format_description::{self, FormatItem, OwnedFormatItem},
    macros::format_description,
    Date, Weekday,
};

static DEFAULT_TITLE_FMT: &[FormatItem<'_>] = format_description!("[month repr:long] [year]");

const DEFAULT_DAY_HEADINGS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

const DEFAULT_MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Everything a host can tell the calendar about how it should look and
/// behave.
///
/// Built with the consuming builder methods below, starting from
/// [`CalendarConfig::default()`]:
///
/// ```
/// use swipecal::calendar::{CalendarConfig, CalendarFormat};
///
/// let config = CalendarConfig::default()
///     .format(CalendarFormat::Weekly)
///     .week_start(0)?
///     .show_controls(true)
///     .scroll_enabled(true);
/// # Ok::<(), swipecal::calendar::ConfigError>(())
/// ```
#[derive(Clone, Debug)]
pub struct CalendarConfig {
    pub(crate) start_date: Option<Date>,
    pub(crate) selected_date: Option<Date>,
    pub(crate) format: CalendarFormat,
    pub(crate) week_start: Weekday,
    pub(crate) day_headings: [String; 7],
    pub(crate) month_names: [String; 12],
    pub(crate) events: EventMap,
    pub(crate) title_format: OwnedFormatItem,
    pub(crate) prev_button_text: String,
    pub(crate) next_button_text: String,
    pub(crate) show_controls: bool,
    pub(crate) custom_style: CalendarStyle,
    pub(crate) scroll_enabled: bool,
    pub(crate) show_event_indicators: bool,
}

impl Default for CalendarConfig {
    fn default() -> CalendarConfig {
        CalendarConfig {
            start_date: None,
            selected_date: None,
            format: CalendarFormat::Monthly,
            week_start: Weekday::Monday,
            day_headings: DEFAULT_DAY_HEADINGS.map(String::from),
            month_names: DEFAULT_MONTH_NAMES.map(String::from),
            events: EventMap::new(),
            title_format: OwnedFormatItem::from(DEFAULT_TITLE_FMT),
            prev_button_text: String::from("Prev"),
            next_button_text: String::from("Next"),
            show_controls: false,
            custom_style: CalendarStyle::plain(),
            scroll_enabled: false,
            show_event_indicators: false,
        }
    }
}

impl CalendarConfig {
    /// The date whose period is shown first.  Defaults to today.
    pub fn start_date(mut self, date: Date) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn selected_date(mut self, date: Date) -> Self {
        self.selected_date = Some(date);
        self
    }

    pub fn format(mut self, format: CalendarFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the first day of the week as a number of days from Sunday (0 =
    /// Sunday, 1 = Monday, … 6 = Saturday)
    pub fn week_start(mut self, index: u8) -> Result<Self, ConfigError> {
        if index >= 7 {
            return Err(ConfigError::WeekStart(index));
        }
        self.week_start = Weekday::Sunday.nth_next(index);
        Ok(self)
    }

    /// Seven headings, starting with Sunday regardless of the week start
    pub fn day_headings<I, S>(mut self, headings: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headings = headings.into_iter().map(Into::into).collect::<Vec<_>>();
        self.day_headings = <[String; 7]>::try_from(headings)
            .map_err(|v| ConfigError::DayHeadings(v.len()))?;
        Ok(self)
    }

    /// Twelve month names, starting with January
    pub fn month_names<I, S>(mut self, names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names.into_iter().map(Into::into).collect::<Vec<_>>();
        self.month_names =
            <[String; 12]>::try_from(names).map_err(|v| ConfigError::MonthNames(v.len()))?;
        Ok(self)
    }

    /// Mark each of the given dates (`YYYY-MM-DD` or `YYYYMMDD`) as having an
    /// event
    pub fn event_dates<I, S>(mut self, dates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events = EventMap::from_dates(dates);
        self
    }

    pub fn events<I: IntoIterator<Item = Event>>(mut self, events: I) -> Self {
        self.events = EventMap::from_events(events);
        self
    }

    pub fn event_map(mut self, events: EventMap) -> Self {
        self.events = events;
        self
    }

    /// Set the format of the title shown when the controls are hidden, as a
    /// [`time` format description](https://time-rs.github.io/book/api/format-description.html)
    pub fn title_format(mut self, fmt: &str) -> Result<Self, ConfigError> {
        self.title_format = format_description::parse_owned::<1>(fmt)?;
        Ok(self)
    }

    pub fn button_texts<P: Into<String>, N: Into<String>>(mut self, prev: P, next: N) -> Self {
        self.prev_button_text = prev.into();
        self.next_button_text = next.into();
        self
    }

    pub fn show_controls(mut self, yes: bool) -> Self {
        self.show_controls = yes;
        self
    }

    pub fn custom_style(mut self, style: CalendarStyle) -> Self {
        self.custom_style = style;
        self
    }

    pub fn scroll_enabled(mut self, yes: bool) -> Self {
        self.scroll_enabled = yes;
        self
    }

    pub fn show_event_indicators(mut self, yes: bool) -> Self {
        self.show_event_indicators = yes;
        self
    }

    pub fn week_start_day(&self) -> Weekday {
        self.week_start
    }

    pub fn is_scroll_enabled(&self) -> bool {
        self.scroll_enabled
    }

    pub fn events_map(&self) -> &EventMap {
        &self.events
    }

    /// The stock theme with the custom style patched over it
    pub fn style(&self) -> CalendarStyle {
        CalendarStyle::default().patch(&self.custom_style)
    }

    /// Heading for the given weekday
    pub(crate) fn day_heading(&self, wd: Weekday) -> &str {
        &self.day_headings[usize::from(wd.number_days_from_sunday())]
    }

    pub(crate) fn month_name(&self, date: Date) -> &str {
        &self.month_names[usize::from(u8::from(date.month()) - 1)]
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("week start must be from 0 (Sunday) to 6 (Saturday), got {0}")]
    WeekStart(u8),
    #[error("expected 7 day headings, got {0}")]
    DayHeadings(usize),
    #[error("expected 12 month names, got {0}")]
    MonthNames(usize),
    #[error("invalid title format")]
    TitleFormat(#[from] InvalidFormatDescription),
}
