use super::grid::DayCell;
use crate::theme::CalendarStyle;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

/// Columns taken up by a caption, brackets included
const CAPTION_WIDTH: u16 = 4;

const EVENT_INDICATOR: &str = "•";

/// A single day of the grid.  Filler cells are drawn blank.
///
/// The caption is bracketed when the day is selected and parenthesised when
/// it is today, so that both stay visible without colour:
///
/// ```text
///  [22]   (22)    22
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Day<'a, 'e> {
    cell: &'a DayCell<'e>,
    style: &'a CalendarStyle,
    show_event_indicator: bool,
}

impl<'a, 'e> Day<'a, 'e> {
    pub fn new(cell: &'a DayCell<'e>, style: &'a CalendarStyle) -> Self {
        Day {
            cell,
            style,
            show_event_indicator: false,
        }
    }

    pub fn show_event_indicator(mut self, yes: bool) -> Self {
        self.show_event_indicator = yes;
        self
    }

    fn caption(&self) -> String {
        let (open, close) = if self.cell.selected {
            ('[', ']')
        } else if self.cell.today {
            ('(', ')')
        } else {
            (' ', ' ')
        };
        format!("{open}{:>2}{close}", self.cell.date.day())
    }
}

impl Widget for Day<'_, '_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        if area.is_empty() {
            return;
        }
        if self.cell.filler {
            buf.set_style(area, self.style.day_button_filler);
            return;
        }
        buf.set_style(area, self.style.day_button);
        let text_style = match (self.cell.selected, self.cell.today) {
            (true, true) => self.style.selected_current_day,
            (true, false) => self.style.selected_day,
            (false, true) => self.style.current_day,
            (false, false) if self.cell.weekend => self.style.weekend_day,
            (false, false) => self.style.day,
        };
        let x = area.x + area.width.saturating_sub(CAPTION_WIDTH) / 2;
        buf.set_stringn(
            x,
            area.y,
            self.caption(),
            usize::from(area.right() - x),
            text_style,
        );
        if let Some(event) = self.cell.event.filter(|_| self.show_event_indicator) {
            if area.height > 1 {
                let style = event
                    .indicator_color()
                    .map_or(self.style.event_indicator, |c| {
                        self.style.event_indicator.fg(c)
                    });
                let x = area.x + area.width.saturating_sub(1) / 2;
                buf.set_stringn(x, area.y + 1, EVENT_INDICATOR, 1, style);
            }
        }
    }
}
