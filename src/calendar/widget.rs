use super::day::Day;
use super::grid::{GridContext, PeriodGrid};
use super::period::is_weekend;
use super::state::{CalendarState, Hit};
use super::{CalendarFormat, CHROME_LINES, DAY_WIDTH, GRID_WIDTH, ROW_HEIGHT};
use crate::theme::CalendarStyle;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    text::Line,
    widgets::{StatefulWidget, Widget},
};

const ACS_HLINE: char = '─';

/// Draws a [`CalendarState`]:
///
/// ```text
/// Prev            January 2025            Next
///   M     T     W     T     F     S     S
/// ──────────────────────────────────────────
///                 1     2     3     4     5
///
///   6     7     8     9    10    11    12
/// ```
///
/// The grid is a horizontal viewport one page wide onto the pages of the
/// state's paging window, positioned by the state's scroll offset.  Every
/// tappable thing drawn is remembered in the state so that
/// [`CalendarState::tap()`] can find it.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Calendar;

impl Calendar {
    /// Number of lines needed to draw the calendar in its current state
    pub fn height(state: &CalendarState) -> u16 {
        CHROME_LINES + state.calendar_height()
    }
}

impl StatefulWidget for Calendar {
    type State = CalendarState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let style = state.config().style();
        buf.set_style(area, style.calendar_container);
        let [area] = Layout::horizontal([GRID_WIDTH.min(area.width)])
            .flex(Flex::Center)
            .areas(area);
        let [top_bar, heading, rule, grid] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);
        state.set_page_width(GRID_WIDTH);
        let mut hits = draw_top_bar(state, &style, top_bar, buf);
        draw_headings(state, &style, heading, buf);
        let rule_text = String::from(ACS_HLINE).repeat(rule.width.into());
        Line::styled(rule_text, style.calendar_heading).render(rule, buf);
        hits.extend(draw_pages(state, &style, grid, buf));
        state.hits = hits;
    }
}

fn draw_top_bar(
    state: &CalendarState,
    style: &CalendarStyle,
    area: Rect,
    buf: &mut Buffer,
) -> Vec<(Rect, Hit)> {
    buf.set_style(area, style.calendar_controls);
    let config = state.config();
    let current = state.current();
    if config.show_controls {
        let title = match state.format() {
            CalendarFormat::Monthly => {
                format!("{} {}", config.month_name(current), current.year())
            }
            CalendarFormat::Weekly => String::new(),
        };
        let prev = Line::styled(config.prev_button_text.as_str(), style.control_button);
        let next = Line::styled(config.next_button_text.as_str(), style.control_button);
        let [prev_area, title_area, next_area] = Layout::horizontal([
            Constraint::Length(line_width(&prev)),
            Constraint::Fill(1),
            Constraint::Length(line_width(&next)),
        ])
        .areas(area);
        prev.render(prev_area, buf);
        Line::styled(title, style.title)
            .centered()
            .render(title_area, buf);
        next.render(next_area, buf);
        vec![
            (prev_area, Hit::Prev),
            (title_area, Hit::Title),
            (next_area, Hit::Next),
        ]
    } else {
        // An unformattable date simply gets no title
        let title = current.format(&config.title_format).unwrap_or_default();
        Line::styled(title, style.title).centered().render(area, buf);
        Vec::new()
    }
}

fn draw_headings(state: &CalendarState, style: &CalendarStyle, area: Rect, buf: &mut Buffer) {
    buf.set_style(area, style.calendar_heading);
    let config = state.config();
    for i in 0..7 {
        let wd = config.week_start.nth_next(i);
        let heading_style = if is_weekend(wd) {
            style.weekend_heading
        } else {
            style.day_heading
        };
        let slot = Rect {
            x: area.x.saturating_add(DAY_WIDTH * u16::from(i)),
            width: DAY_WIDTH,
            ..area
        }
        .intersection(area);
        if !slot.is_empty() {
            Line::styled(config.day_heading(wd), heading_style)
                .centered()
                .render(slot, buf);
        }
    }
}

/// Draw every page of the paging window that is at least partly in view, and
/// return the areas of the fully visible day cells
fn draw_pages(
    state: &CalendarState,
    style: &CalendarStyle,
    area: Rect,
    buf: &mut Buffer,
) -> Vec<(Rect, Hit)> {
    let config = state.config();
    let ctx = GridContext {
        week_start: config.week_start,
        today: state.today,
        selected: state.selected(),
        events: &config.events,
    };
    let offset = i32::from(state.scroll_offset());
    let page_width = i32::from(GRID_WIDTH);
    let viewport_width = i32::from(area.width);
    let mut hits = Vec::new();
    for (i, reference) in (0i32..).zip(state.stack()) {
        let page_x = i * page_width - offset;
        if page_x >= viewport_width || page_x + page_width <= 0 {
            continue;
        }
        let Some(reference) = reference else {
            continue;
        };
        let grid = match PeriodGrid::new(state.format(), reference, &ctx) {
            Ok(grid) => grid,
            Err(e) => {
                log::warn!("Cannot lay out the period around {reference}: {e}");
                continue;
            }
        };
        let mut page = Buffer::empty(Rect::new(0, 0, GRID_WIDTH, area.height));
        page.set_style(page.area, style.month_container);
        for (row, week) in (0u16..).zip(grid.weeks()) {
            let y = row * ROW_HEIGHT;
            if y >= area.height {
                break;
            }
            let row_area = Rect::new(0, y, GRID_WIDTH, ROW_HEIGHT).intersection(page.area);
            page.set_style(row_area, style.week_row);
            for (col, cell) in (0u16..).zip(week) {
                let cell_area = Rect::new(col * DAY_WIDTH, y, DAY_WIDTH, ROW_HEIGHT)
                    .intersection(page.area);
                Day::new(cell, style)
                    .show_event_indicator(config.show_event_indicators)
                    .render(cell_area, &mut page);
                let cell_x = page_x + i32::from(col * DAY_WIDTH);
                if !cell.filler && cell_x >= 0 && cell_x + i32::from(DAY_WIDTH) <= viewport_width
                {
                    if let Ok(cell_x) = u16::try_from(cell_x) {
                        let screen = Rect {
                            x: area.x + cell_x,
                            y: area.y + cell_area.y,
                            ..cell_area
                        };
                        hits.push((screen, Hit::Day(cell.date)));
                    }
                }
            }
        }
        blit(&page, page_x, area, buf);
    }
    hits
}

/// Copy the columns of `page` that fall within `area` onto `buf`, with the
/// page's left edge at column `page_x` of `area`
fn blit(page: &Buffer, page_x: i32, area: Rect, buf: &mut Buffer) {
    for y in 0..page.area.height.min(area.height) {
        for x in 0..page.area.width {
            let Ok(col) = u16::try_from(page_x + i32::from(x)) else {
                continue;
            };
            if col >= area.width {
                break;
            }
            if let (Some(src), Some(dest)) =
                (page.cell((x, y)), buf.cell_mut((area.x + col, area.y + y)))
            {
                *dest = src.clone();
            }
        }
    }
}

fn line_width(line: &Line<'_>) -> u16 {
    u16::try_from(line.width()).unwrap_or(u16::MAX)
}
