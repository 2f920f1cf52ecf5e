use super::period::{is_weekend, CalendarFormat, OutOfTimeError, DAYS_IN_WEEK};
use crate::events::{Event, EventMap};
use std::slice::ChunksExact;
use time::{Date, Duration, Weekday};

/// Display data for a single cell of the grid, derived fresh for every
/// render
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DayCell<'a> {
    pub date: Date,
    /// The date lies outside the period and is only there to complete a week
    pub filler: bool,
    pub weekend: bool,
    pub today: bool,
    pub selected: bool,
    pub event: Option<&'a Event>,
}

impl DayCell<'_> {
    pub fn caption(&self) -> String {
        self.date.day().to_string()
    }
}

/// What a grid needs to know besides the period itself
#[derive(Clone, Copy, Debug)]
pub struct GridContext<'a> {
    pub week_start: Weekday,
    pub today: Date,
    pub selected: Option<Date>,
    pub events: &'a EventMap,
}

/// The cells of one month or week, padded with filler cells to whole weeks
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PeriodGrid<'a> {
    start: Date,
    cells: Vec<DayCell<'a>>,
}

impl<'a> PeriodGrid<'a> {
    pub fn new(
        format: CalendarFormat,
        reference: Date,
        ctx: &GridContext<'a>,
    ) -> Result<PeriodGrid<'a>, OutOfTimeError> {
        let start = format.period_start(reference, ctx.week_start)?;
        let days = i64::from(format.days_in_period(reference));
        let offset = i64::from(format.leading_fillers(start, ctx.week_start));
        let week_len = i64::from(DAYS_IN_WEEK);
        let mut cells = Vec::with_capacity(42);
        for render_index in 0i64.. {
            let day_index = render_index - offset;
            let date = start
                .checked_add(Duration::days(day_index))
                .ok_or(OutOfTimeError)?;
            cells.push(DayCell {
                date,
                filler: day_index < 0 || day_index >= days,
                weekend: is_weekend(date.weekday()),
                today: date == ctx.today,
                selected: ctx.selected == Some(date),
                event: ctx.events.get(date),
            });
            if render_index % week_len == week_len - 1 && day_index + 1 >= days {
                break;
            }
        }
        Ok(PeriodGrid { start, cells })
    }

    /// First real day of the period
    pub fn start(&self) -> Date {
        self.start
    }

    pub fn cells(&self) -> &[DayCell<'a>] {
        &self.cells
    }

    pub fn weeks(&self) -> ChunksExact<'_, DayCell<'a>> {
        self.cells.chunks_exact(DAYS_IN_WEEK.into())
    }

    pub fn week_count(&self) -> usize {
        self.cells.len() / usize::from(DAYS_IN_WEEK)
    }
}
