use thiserror::Error;
use time::{Date, Duration, Month, Weekday};

pub(crate) const DAYS_IN_WEEK: u8 = 7;

/// Whether the calendar pages through whole months or single weeks
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum CalendarFormat {
    #[default]
    Monthly,
    Weekly,
}

impl CalendarFormat {
    pub fn toggled(self) -> CalendarFormat {
        match self {
            CalendarFormat::Monthly => CalendarFormat::Weekly,
            CalendarFormat::Weekly => CalendarFormat::Monthly,
        }
    }

    /// Move `date` by `n` periods (months or weeks).  Moving by months clamps
    /// the day of the month, so that January 31 plus one month is the last
    /// day of February.
    pub fn advance(self, date: Date, n: i32) -> Result<Date, OutOfTimeError> {
        match self {
            CalendarFormat::Monthly => add_months(date, n),
            CalendarFormat::Weekly => date.checked_add(Duration::weeks(n.into())),
        }
        .ok_or(OutOfTimeError)
    }

    /// Returns the first day of the period containing `date`: the first of
    /// the month, or the latest `week_start` on or before `date`.
    pub fn period_start(self, date: Date, week_start: Weekday) -> Result<Date, OutOfTimeError> {
        match self {
            CalendarFormat::Monthly => date.replace_day(1).ok(),
            CalendarFormat::Weekly => {
                date.checked_sub(Duration::days(days_since(date.weekday(), week_start).into()))
            }
        }
        .ok_or(OutOfTimeError)
    }

    /// Number of real (non-filler) days in the period containing `date`
    pub fn days_in_period(self, date: Date) -> u8 {
        match self {
            CalendarFormat::Monthly => date.month().length(date.year()),
            CalendarFormat::Weekly => DAYS_IN_WEEK,
        }
    }

    /// Number of filler cells in front of the first real day of the period
    pub fn leading_fillers(self, period_start: Date, week_start: Weekday) -> u8 {
        match self {
            CalendarFormat::Monthly => days_since(period_start.weekday(), week_start),
            CalendarFormat::Weekly => 0,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub struct OutOfTimeError;

/// Number of week rows needed to show the month containing `date`
pub fn number_of_weeks(date: Date, week_start: Weekday) -> u8 {
    let offset = days_since(date.replace_day(1).unwrap_or(date).weekday(), week_start);
    let days = date.month().length(date.year());
    (offset + days).div_ceil(DAYS_IN_WEEK)
}

/// `(weekday − week_start + 7) mod 7`
pub(crate) fn days_since(weekday: Weekday, week_start: Weekday) -> u8 {
    (weekday.number_days_from_sunday() + DAYS_IN_WEEK - week_start.number_days_from_sunday())
        % DAYS_IN_WEEK
}

pub(crate) fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Saturday | Weekday::Sunday)
}

fn add_months(date: Date, n: i32) -> Option<Date> {
    let index = date
        .year()
        .checked_mul(12)?
        .checked_add(i32::from(u8::from(date.month())) - 1)?
        .checked_add(n)?;
    let year = index.div_euclid(12);
    let month = Month::try_from(u8::try_from(index.rem_euclid(12) + 1).ok()?).ok()?;
    let day = date.day().min(month.length(year));
    Date::from_calendar_date(year, month, day).ok()
}
