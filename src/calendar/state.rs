use super::config::CalendarConfig;
use super::period::{number_of_weeks, CalendarFormat, OutOfTimeError};
use super::{CalendarHandler, ROW_HEIGHT, WEEKLY_HEIGHT};
use ratatui::layout::Rect;
use time::Date;

/// Index of the centred page in the paging window
pub const VIEW_INDEX: usize = 2;

/// Number of pages kept in the paging window when scrolling is enabled
const STACK_SIZE: usize = 2 * VIEW_INDEX + 1;

/// The mutable half of the calendar: which period is shown, which date is
/// selected, and where the paging container is scrolled to.
#[derive(Clone, Debug)]
pub struct CalendarState {
    config: CalendarConfig,
    pub(super) today: Date,
    current: Date,
    selected: Option<Date>,
    // The selected date most recently supplied by the host, used to tell
    // whether a new one differs
    supplied_selected: Option<Date>,
    format: CalendarFormat,
    pub(super) scroll: Scroll,
    pub(super) hits: Vec<(Rect, Hit)>,
}

impl CalendarState {
    pub fn new(today: Date, config: CalendarConfig) -> CalendarState {
        let current = config.start_date.unwrap_or(today);
        CalendarState {
            today,
            current,
            selected: config.selected_date,
            supplied_selected: config.selected_date,
            format: config.format,
            scroll: Scroll::new(),
            hits: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut CalendarConfig {
        &mut self.config
    }

    pub fn today(&self) -> Date {
        self.today
    }

    pub fn set_today(&mut self, today: Date) {
        self.today = today;
    }

    /// The date whose period is currently centred
    pub fn current(&self) -> Date {
        self.current
    }

    pub fn selected(&self) -> Option<Date> {
        self.selected
    }

    pub fn format(&self) -> CalendarFormat {
        self.format
    }

    pub fn scroll_enabled(&self) -> bool {
        self.config.scroll_enabled
    }

    /// First day of the current period
    pub fn period_start(&self) -> Result<Date, OutOfTimeError> {
        self.format
            .period_start(self.current, self.config.week_start)
    }

    /// Number of lines the day grid needs: a single week row in weekly
    /// format, or one row per week of the current month
    pub fn calendar_height(&self) -> u16 {
        match self.format {
            CalendarFormat::Weekly => WEEKLY_HEIGHT,
            CalendarFormat::Monthly => {
                u16::from(number_of_weeks(self.current, self.config.week_start)) * ROW_HEIGHT
            }
        }
    }

    /// The reference dates of the pages in the paging window.  With
    /// scrolling enabled these are the periods from two before to two after
    /// the current one; otherwise only the current period.  A page beyond
    /// the representable range of dates is `None`.
    pub fn stack(&self) -> Vec<Option<Date>> {
        if self.config.scroll_enabled {
            (0..STACK_SIZE)
                .map(|i| {
                    let delta = page_delta(i);
                    self.format.advance(self.current, delta).ok()
                })
                .collect()
        } else {
            vec![Some(self.current)]
        }
    }

    /// Current horizontal scroll offset of the paging container, in columns
    pub fn scroll_offset(&self) -> u16 {
        self.scroll.offset
    }

    /// Scroll the paging container so that page `index` is in view.  Does
    /// nothing when scrolling is disabled.
    pub fn scroll_to_item(&mut self, index: usize) {
        if self.config.scroll_enabled {
            let index = u16::try_from(index).unwrap_or(u16::MAX);
            self.scroll.offset = index.saturating_mul(self.scroll.page_width);
        }
    }

    /// Tell the state how wide a page is, and bring the centre page back
    /// into view unless a drag is in progress.  Called on every render, so
    /// the initial scroll (which needs the width) happens on the first one
    /// and configuration changes are picked up on the next.
    pub(super) fn set_page_width(&mut self, width: u16) {
        self.scroll.page_width = width;
        if !(self.config.scroll_enabled && self.scroll.dragging) {
            self.scroll.dragging = false;
            self.scroll.offset = if self.config.scroll_enabled {
                u16::try_from(VIEW_INDEX)
                    .unwrap_or(0)
                    .saturating_mul(width)
            } else {
                0
            };
        }
    }

    /// The user has finished a swipe, leaving the paging container scrolled
    /// to `offset`.  The nearest page becomes the current period.
    ///
    /// The offset can only be turned into a page once the page width is
    /// known, so before the first render this does nothing.
    /// [`swipe_next()`](Self::swipe_next) and
    /// [`swipe_prev()`](Self::swipe_prev) move by whole pages and work
    /// regardless.
    pub fn scroll_ended<H: CalendarHandler>(
        &mut self,
        offset: u16,
        handler: &mut H,
    ) -> Result<(), OutOfTimeError> {
        let width = self.scroll.page_width;
        if !self.config.scroll_enabled || width == 0 {
            self.scroll.dragging = false;
            return Ok(());
        }
        let page = (offset.saturating_add(width / 2) / width).into();
        self.settle(page, handler)
    }

    /// Move the paging container by `columns` (positive to reveal later
    /// periods), as while the user is dragging it
    pub fn drag_by(&mut self, columns: i32) {
        if !self.config.scroll_enabled {
            return;
        }
        let max = i32::from(self.scroll.page_width) * (i32::try_from(STACK_SIZE).unwrap_or(0) - 1);
        let offset = i32::from(self.scroll.offset)
            .saturating_add(columns)
            .clamp(0, max.max(0));
        self.scroll.offset = u16::try_from(offset).unwrap_or(u16::MAX);
        self.scroll.dragging = true;
    }

    /// The user has let go of the paging container.  Like
    /// [`scroll_ended()`](Self::scroll_ended), this does nothing before the
    /// first render.
    pub fn drag_end<H: CalendarHandler>(&mut self, handler: &mut H) -> Result<(), OutOfTimeError> {
        self.scroll_ended(self.scroll.offset, handler)
    }

    /// Swipe a whole page forwards
    pub fn swipe_next<H: CalendarHandler>(&mut self, handler: &mut H) -> Result<(), OutOfTimeError> {
        if !self.config.scroll_enabled {
            return Ok(());
        }
        self.settle(VIEW_INDEX + 1, handler)
    }

    /// Swipe a whole page backwards
    pub fn swipe_prev<H: CalendarHandler>(&mut self, handler: &mut H) -> Result<(), OutOfTimeError> {
        if !self.config.scroll_enabled {
            return Ok(());
        }
        self.settle(VIEW_INDEX - 1, handler)
    }

    fn settle<H: CalendarHandler>(
        &mut self,
        page: usize,
        handler: &mut H,
    ) -> Result<(), OutOfTimeError> {
        let page = page.min(STACK_SIZE - 1);
        let delta = page_delta(page);
        let moved = self.format.advance(self.current, delta).and_then(|current| {
            let start = self.format.period_start(current, self.config.week_start)?;
            Ok((current, start))
        });
        let r = match moved {
            Ok((current, start)) => {
                self.current = current;
                log::debug!("Swiped {delta:+} page(s) to {current}");
                match page.cmp(&VIEW_INDEX) {
                    std::cmp::Ordering::Greater => handler.on_swipe_next(start),
                    std::cmp::Ordering::Less => handler.on_swipe_prev(start),
                    std::cmp::Ordering::Equal => (),
                }
                Ok(())
            }
            Err(e) => {
                log::warn!("Cannot swipe {delta:+} page(s) from {}: {e}", self.current);
                Err(e)
            }
        };
        self.scroll.dragging = false;
        self.scroll_to_item(VIEW_INDEX);
        r
    }

    /// The "next" control was pressed
    pub fn next<H: CalendarHandler>(&mut self, handler: &mut H) -> Result<(), OutOfTimeError> {
        self.current = self.format.advance(self.current, 1)?;
        log::debug!("Moved forwards to {}", self.current);
        handler.on_touch_next(self.current);
        self.scroll_to_item(VIEW_INDEX);
        Ok(())
    }

    /// The "previous" control was pressed
    pub fn prev<H: CalendarHandler>(&mut self, handler: &mut H) -> Result<(), OutOfTimeError> {
        self.current = self.format.advance(self.current, -1)?;
        log::debug!("Moved backwards to {}", self.current);
        handler.on_touch_prev(self.current);
        self.scroll_to_item(VIEW_INDEX);
        Ok(())
    }

    pub fn press_title<H: CalendarHandler>(&self, handler: &mut H) {
        handler.on_title_press();
    }

    /// A day cell was tapped
    pub fn select_date<H: CalendarHandler>(&mut self, date: Date, handler: &mut H) {
        self.selected = Some(date);
        self.current = date;
        log::debug!("Selected {date}");
        handler.on_date_select(date);
        self.scroll_to_item(VIEW_INDEX);
    }

    /// Dispatch a click at the given screen position to whatever was drawn
    /// there during the last render.  Returns `false` if nothing tappable was
    /// there.
    pub fn tap<H: CalendarHandler>(
        &mut self,
        column: u16,
        row: u16,
        handler: &mut H,
    ) -> Result<bool, OutOfTimeError> {
        let Some(hit) = self
            .hits
            .iter()
            .find(|(rect, _)| contains(*rect, column, row))
            .map(|&(_, hit)| hit)
        else {
            return Ok(false);
        };
        match hit {
            Hit::Day(date) => self.select_date(date, handler),
            Hit::Prev => self.prev(handler)?,
            Hit::Next => self.next(handler)?,
            Hit::Title => self.press_title(handler),
        }
        Ok(true)
    }

    /// The host supplied a (possibly new) selected date.  A date differing
    /// from the one supplied last time also becomes the current period.
    pub fn set_selected_date(&mut self, date: Option<Date>) {
        if let Some(d) = date {
            self.selected = Some(d);
        }
        if date != self.supplied_selected {
            self.supplied_selected = date;
            if let Some(d) = date {
                self.current = d;
                self.scroll_to_item(VIEW_INDEX);
            }
        }
    }

    pub fn set_format(&mut self, format: CalendarFormat) {
        if format != self.format {
            self.format = format;
            log::debug!(
                "Switched to {format:?} format; grid height is now {}",
                self.calendar_height()
            );
            self.scroll_to_item(VIEW_INDEX);
        }
    }

    pub fn jump_to_today(&mut self) {
        self.jump_to(self.today);
    }

    pub fn jump_to(&mut self, date: Date) {
        self.current = date;
        self.scroll_to_item(VIEW_INDEX);
    }
}

/// Horizontal position of the paging container
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Scroll {
    pub(super) offset: u16,
    pub(super) page_width: u16,
    // Set while the user is dragging, so that a redraw doesn't snap the
    // container back to the centre page
    dragging: bool,
}

impl Scroll {
    fn new() -> Scroll {
        Scroll {
            offset: 0,
            page_width: 0,
            dragging: false,
        }
    }
}

/// Something tappable drawn during the last render
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Hit {
    Day(Date),
    Prev,
    Next,
    Title,
}

fn page_delta(page: usize) -> i32 {
    let page = i32::try_from(page).unwrap_or(i32::MAX);
    page - i32::try_from(VIEW_INDEX).unwrap_or(0)
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    rect.x <= column && column < rect.right() && rect.y <= row && row < rect.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarEvent;
    use time::macros::date;

    fn state(config: CalendarConfig) -> CalendarState {
        CalendarState::new(date!(2025 - 01 - 22), config)
    }

    fn scrolling() -> CalendarConfig {
        CalendarConfig::default().scroll_enabled(true)
    }

    #[test]
    fn test_new_defaults_to_today() {
        let st = state(CalendarConfig::default());
        assert_eq!(st.current(), date!(2025 - 01 - 22));
        assert_eq!(st.selected(), None);
        assert_eq!(st.format(), CalendarFormat::Monthly);
    }

    #[test]
    fn test_new_with_start_and_selected() {
        let st = state(
            CalendarConfig::default()
                .start_date(date!(2024 - 06 - 01))
                .selected_date(date!(2024 - 06 - 03)),
        );
        assert_eq!(st.current(), date!(2024 - 06 - 01));
        assert_eq!(st.selected(), Some(date!(2024 - 06 - 03)));
    }

    #[test]
    fn test_select_date() {
        let mut st = state(CalendarConfig::default());
        let mut events = Vec::new();
        st.select_date(date!(2025 - 02 - 14), &mut events);
        assert_eq!(st.selected(), Some(date!(2025 - 02 - 14)));
        assert_eq!(st.current(), date!(2025 - 02 - 14));
        assert_eq!(events, [CalendarEvent::DateSelect(date!(2025 - 02 - 14))]);
    }

    #[test]
    fn test_stack_without_scrolling() {
        let st = state(CalendarConfig::default());
        assert_eq!(st.stack(), [Some(date!(2025 - 01 - 22))]);
    }

    #[test]
    fn test_stack_monthly() {
        let st = state(scrolling());
        assert_eq!(
            st.stack(),
            [
                Some(date!(2024 - 11 - 22)),
                Some(date!(2024 - 12 - 22)),
                Some(date!(2025 - 01 - 22)),
                Some(date!(2025 - 02 - 22)),
                Some(date!(2025 - 03 - 22)),
            ]
        );
    }

    #[test]
    fn test_stack_weekly() {
        let st = state(scrolling().format(CalendarFormat::Weekly));
        assert_eq!(
            st.stack(),
            [
                Some(date!(2025 - 01 - 08)),
                Some(date!(2025 - 01 - 15)),
                Some(date!(2025 - 01 - 22)),
                Some(date!(2025 - 01 - 29)),
                Some(date!(2025 - 02 - 05)),
            ]
        );
    }

    #[test]
    fn test_stack_at_end_of_time() {
        let st = CalendarState::new(Date::MAX, scrolling());
        let stack = st.stack();
        assert_eq!(stack.len(), 5);
        assert_eq!(stack[2], Some(Date::MAX));
        assert_eq!(stack[3], None);
        assert_eq!(stack[4], None);
    }

    #[test]
    fn test_initial_scroll_deferred_until_width_known() {
        let mut st = state(scrolling());
        assert_eq!(st.scroll_offset(), 0);
        st.set_page_width(42);
        assert_eq!(st.scroll_offset(), 84);
        st.drag_by(-10);
        st.set_page_width(42);
        assert_eq!(st.scroll_offset(), 74);
    }

    #[test]
    fn test_scroll_to_item_disabled() {
        let mut st = state(CalendarConfig::default());
        st.set_page_width(42);
        st.scroll_to_item(3);
        assert_eq!(st.scroll_offset(), 0);
    }

    #[test]
    fn test_swipe_next_monthly() {
        let mut st = state(scrolling());
        st.set_page_width(42);
        let mut events = Vec::new();
        st.scroll_ended(3 * 42, &mut events).unwrap();
        assert_eq!(st.current(), date!(2025 - 02 - 22));
        assert_eq!(events, [CalendarEvent::SwipeNext(date!(2025 - 02 - 01))]);
        assert_eq!(st.scroll_offset(), 84);
    }

    #[test]
    fn test_swipe_prev_weekly() {
        let mut st = state(scrolling().format(CalendarFormat::Weekly));
        st.set_page_width(42);
        let mut events = Vec::new();
        st.scroll_ended(42, &mut events).unwrap();
        assert_eq!(st.current(), date!(2025 - 01 - 15));
        // Weeks start on Monday by default
        assert_eq!(events, [CalendarEvent::SwipePrev(date!(2025 - 01 - 13))]);
    }

    #[test]
    fn test_swipe_two_pages() {
        let mut st = state(scrolling());
        st.set_page_width(42);
        let mut events = Vec::new();
        st.scroll_ended(4 * 42, &mut events).unwrap();
        assert_eq!(st.current(), date!(2025 - 03 - 22));
        assert_eq!(events, [CalendarEvent::SwipeNext(date!(2025 - 03 - 01))]);
    }

    #[test]
    fn test_scroll_ended_snaps_to_nearest_page() {
        let mut st = state(scrolling());
        st.set_page_width(42);
        let mut events = Vec::new();
        st.scroll_ended(84 + 20, &mut events).unwrap();
        assert_eq!(st.current(), date!(2025 - 01 - 22));
        assert!(events.is_empty());
        st.scroll_ended(84 + 21, &mut events).unwrap();
        assert_eq!(st.current(), date!(2025 - 02 - 22));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_drag() {
        let mut st = state(scrolling());
        st.set_page_width(42);
        let mut events = Vec::new();
        st.drag_by(-30);
        assert_eq!(st.scroll_offset(), 54);
        st.drag_end(&mut events).unwrap();
        assert_eq!(st.current(), date!(2024 - 12 - 22));
        assert_eq!(events, [CalendarEvent::SwipePrev(date!(2024 - 12 - 01))]);
        assert_eq!(st.scroll_offset(), 84);
        st.drag_by(1000);
        assert_eq!(st.scroll_offset(), 168);
        st.drag_by(-1000);
        assert_eq!(st.scroll_offset(), 0);
    }

    #[test]
    fn test_drag_by_extremes() {
        let mut st = state(scrolling());
        st.set_page_width(42);
        st.drag_by(i32::MAX);
        assert_eq!(st.scroll_offset(), 168);
        st.drag_by(i32::MIN);
        assert_eq!(st.scroll_offset(), 0);
        st.drag_by(i32::MAX);
        st.drag_by(i32::MAX);
        assert_eq!(st.scroll_offset(), 168);
    }

    #[test]
    fn test_recentred_when_scrolling_switched_on() {
        let mut st = state(CalendarConfig::default());
        st.set_page_width(42);
        assert_eq!(st.scroll_offset(), 0);
        *st.config_mut() = scrolling();
        st.set_page_width(42);
        assert_eq!(st.scroll_offset(), 84);
        *st.config_mut() = CalendarConfig::default();
        st.set_page_width(42);
        assert_eq!(st.scroll_offset(), 0);
    }

    #[test]
    fn test_recentred_after_drag_released() {
        let mut st = state(scrolling());
        st.set_page_width(42);
        st.drag_by(15);
        st.set_page_width(42);
        assert_eq!(st.scroll_offset(), 99);
        st.drag_end(&mut ()).unwrap();
        st.scroll_to_item(0);
        st.set_page_width(42);
        assert_eq!(st.scroll_offset(), 84);
    }

    #[test]
    fn test_scroll_ended_before_first_render() {
        let mut st = state(scrolling());
        let mut events = Vec::new();
        st.scroll_ended(3 * 42, &mut events).unwrap();
        assert_eq!(st.current(), date!(2025 - 01 - 22));
        assert!(events.is_empty());
        st.swipe_next(&mut events).unwrap();
        assert_eq!(st.current(), date!(2025 - 02 - 22));
        assert_eq!(events, [CalendarEvent::SwipeNext(date!(2025 - 02 - 01))]);
    }

    #[test]
    fn test_keyboard_swipes() {
        let mut st = state(scrolling().format(CalendarFormat::Weekly));
        let mut events = Vec::new();
        st.swipe_next(&mut events).unwrap();
        assert_eq!(st.current(), date!(2025 - 01 - 29));
        st.swipe_prev(&mut events).unwrap();
        st.swipe_prev(&mut events).unwrap();
        assert_eq!(st.current(), date!(2025 - 01 - 15));
        assert_eq!(
            events,
            [
                CalendarEvent::SwipeNext(date!(2025 - 01 - 27)),
                CalendarEvent::SwipePrev(date!(2025 - 01 - 20)),
                CalendarEvent::SwipePrev(date!(2025 - 01 - 13)),
            ]
        );
    }

    #[test]
    fn test_swipe_disabled() {
        let mut st = state(CalendarConfig::default());
        let mut events = Vec::new();
        st.swipe_next(&mut events).unwrap();
        st.drag_by(50);
        st.drag_end(&mut events).unwrap();
        assert_eq!(st.current(), date!(2025 - 01 - 22));
        assert!(events.is_empty());
    }

    #[test]
    fn test_swipe_past_end_of_time() {
        let mut st = CalendarState::new(Date::MAX, scrolling());
        let mut events = Vec::new();
        assert_eq!(st.swipe_next(&mut events), Err(OutOfTimeError));
        assert_eq!(st.current(), Date::MAX);
        assert!(events.is_empty());
    }

    #[test]
    fn test_controls() {
        let mut st = state(CalendarConfig::default());
        let mut events = Vec::new();
        st.next(&mut events).unwrap();
        assert_eq!(st.current(), date!(2025 - 02 - 22));
        st.prev(&mut events).unwrap();
        st.prev(&mut events).unwrap();
        assert_eq!(st.current(), date!(2024 - 12 - 22));
        assert_eq!(
            events,
            [
                CalendarEvent::TouchNext(date!(2025 - 02 - 22)),
                CalendarEvent::TouchPrev(date!(2025 - 01 - 22)),
                CalendarEvent::TouchPrev(date!(2024 - 12 - 22)),
            ]
        );
    }

    #[test]
    fn test_set_selected_date() {
        let mut st = state(CalendarConfig::default().selected_date(date!(2025 - 01 - 02)));
        st.jump_to(date!(2025 - 05 - 01));
        // Same as before: selection kept, period untouched
        st.set_selected_date(Some(date!(2025 - 01 - 02)));
        assert_eq!(st.current(), date!(2025 - 05 - 01));
        assert_eq!(st.selected(), Some(date!(2025 - 01 - 02)));
        st.set_selected_date(Some(date!(2025 - 03 - 09)));
        assert_eq!(st.current(), date!(2025 - 03 - 09));
        assert_eq!(st.selected(), Some(date!(2025 - 03 - 09)));
        st.set_selected_date(None);
        assert_eq!(st.current(), date!(2025 - 03 - 09));
        assert_eq!(st.selected(), Some(date!(2025 - 03 - 09)));
    }

    #[test]
    fn test_calendar_height() {
        // January 2025 needs five rows with weeks starting on Monday
        let mut st = state(CalendarConfig::default());
        assert_eq!(st.calendar_height(), 5 * ROW_HEIGHT);
        st.set_format(CalendarFormat::Weekly);
        assert_eq!(st.calendar_height(), WEEKLY_HEIGHT);
        st.jump_to(date!(2025 - 03 - 10));
        assert_eq!(st.calendar_height(), WEEKLY_HEIGHT);
        st.set_format(CalendarFormat::Monthly);
        assert_eq!(st.calendar_height(), 6 * ROW_HEIGHT);
    }

    #[test]
    fn test_tap() {
        let mut st = state(CalendarConfig::default());
        st.hits = vec![
            (Rect::new(0, 0, 4, 1), Hit::Prev),
            (Rect::new(10, 0, 10, 1), Hit::Title),
            (Rect::new(30, 0, 4, 1), Hit::Next),
            (Rect::new(6, 3, 6, 2), Hit::Day(date!(2025 - 01 - 07))),
        ];
        let mut events = Vec::new();
        assert_eq!(st.tap(8, 4, &mut events), Ok(true));
        assert_eq!(st.tap(12, 4, &mut events), Ok(false));
        assert_eq!(st.tap(31, 0, &mut events), Ok(true));
        assert_eq!(st.tap(15, 0, &mut events), Ok(true));
        assert_eq!(st.tap(0, 0, &mut events), Ok(true));
        assert_eq!(
            events,
            [
                CalendarEvent::DateSelect(date!(2025 - 01 - 07)),
                CalendarEvent::TouchNext(date!(2025 - 02 - 07)),
                CalendarEvent::TitlePress,
                CalendarEvent::TouchPrev(date!(2025 - 01 - 07)),
            ]
        );
    }

    #[test]
    fn test_jump_to_today() {
        let mut st = state(CalendarConfig::default());
        st.jump_to(date!(1999 - 12 - 31));
        assert_eq!(st.current(), date!(1999 - 12 - 31));
        st.jump_to_today();
        assert_eq!(st.current(), date!(2025 - 01 - 22));
    }
}
