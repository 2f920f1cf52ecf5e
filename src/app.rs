use crate::help::Help;
use crate::jumpto::{JumpTo, JumpToInput, JumpToOutput, JumpToState};
use crossterm::event::{
    read, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use swipecal::calendar::{Calendar, CalendarEvent, CalendarFormat, CalendarState, OutOfTimeError};
use swipecal::theme::{BASE_STYLE, STATUS_STYLE};
use time::Duration;

#[derive(Clone, Debug)]
pub(crate) struct App {
    calendar: CalendarState,
    state: AppState,
    status: Option<CalendarEvent>,
    drag: Option<Drag>,
}

impl App {
    pub(crate) fn new(calendar: CalendarState) -> App {
        App {
            calendar,
            state: AppState::Calendar,
            status: None,
            drag: None,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            terminal.draw(|frame| frame.render_widget(&mut self, frame.area()))?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        let event = read()?;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = event.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        } else if let Event::Mouse(mouse) = event {
            if !self.handle_mouse(mouse) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => {
                    self.calendar.scroll_enabled()
                        && self.dispatch(|cal, events| cal.swipe_prev(events).map(|()| true))
                }
                KeyCode::Char('l') | KeyCode::Right => {
                    self.calendar.scroll_enabled()
                        && self.dispatch(|cal, events| cal.swipe_next(events).map(|()| true))
                }
                KeyCode::Char('p') => self.dispatch(|cal, events| cal.prev(events).map(|()| true)),
                KeyCode::Char('n') => self.dispatch(|cal, events| cal.next(events).map(|()| true)),
                KeyCode::Char('k') | KeyCode::Up => self.move_selection(-7),
                KeyCode::Char('j') | KeyCode::Down => self.move_selection(7),
                KeyCode::Char('b') => self.move_selection(-1),
                KeyCode::Char('f') => self.move_selection(1),
                KeyCode::Char('m') => {
                    self.calendar.set_format(CalendarFormat::Monthly);
                    true
                }
                KeyCode::Char('w') => {
                    self.calendar.set_format(CalendarFormat::Weekly);
                    true
                }
                KeyCode::Char('t') => self.dispatch(|cal, events| {
                    cal.press_title(events);
                    Ok(true)
                }),
                KeyCode::Char('0') | KeyCode::Home => {
                    self.calendar.jump_to_today();
                    true
                }
                KeyCode::Char('g') => {
                    self.state = AppState::Jumping(JumpToState::new());
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Jumping(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Calendar;
                    return true;
                }
                let output = match key {
                    KeyCode::Char(c) => match c.to_digit(10).map(u8::try_from) {
                        Some(Ok(d)) => state.handle_input(JumpToInput::Digit(d)),
                        _ => JumpToOutput::Invalid,
                    },
                    KeyCode::Backspace | KeyCode::Delete => {
                        state.handle_input(JumpToInput::Backspace)
                    }
                    KeyCode::Enter => state.handle_input(JumpToInput::Enter),
                    _ => JumpToOutput::Invalid,
                };
                match output {
                    JumpToOutput::Ok => true,
                    JumpToOutput::Invalid => false,
                    JumpToOutput::Jump(date) => {
                        self.state = AppState::Calendar;
                        log::info!("Jumping to {date}");
                        self.calendar.jump_to(date);
                        true
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    // Returns `false` if the gesture ran off the end of time
    fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        if self.state != AppState::Calendar {
            return true;
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag = Some(Drag {
                    last_column: mouse.column,
                    moved: false,
                });
                true
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                // Without scrolling a drag is just an unsteady click
                let scrolling = self.calendar.scroll_enabled();
                if let Some(drag) = self.drag.as_mut().filter(|_| scrolling) {
                    // Dragging the grid leftwards reveals later periods
                    let columns = i32::from(drag.last_column) - i32::from(mouse.column);
                    if columns != 0 {
                        drag.last_column = mouse.column;
                        drag.moved = true;
                        self.calendar.drag_by(columns);
                    }
                }
                true
            }
            MouseEventKind::Up(MouseButton::Left) => match self.drag.take() {
                Some(Drag { moved: true, .. }) => {
                    self.dispatch(|cal, events| cal.drag_end(events).map(|()| true))
                }
                _ => self.dispatch(|cal, events| {
                    // Clicking on nothing in particular is not an error
                    cal.tap(mouse.column, mouse.row, events).map(|_| true)
                }),
            },
            MouseEventKind::ScrollLeft => {
                self.dispatch(|cal, events| cal.swipe_prev(events).map(|()| true))
            }
            MouseEventKind::ScrollRight => {
                self.dispatch(|cal, events| cal.swipe_next(events).map(|()| true))
            }
            _ => true,
        }
    }

    fn move_selection(&mut self, days: i64) -> bool {
        let base = self
            .calendar
            .selected()
            .unwrap_or_else(|| self.calendar.current());
        let Some(date) = base.checked_add(Duration::days(days)) else {
            return false;
        };
        self.dispatch(|cal, events| {
            cal.select_date(date, events);
            Ok(true)
        })
    }

    /// Run an operation on the calendar and act on whatever it reported
    fn dispatch<F>(&mut self, func: F) -> bool
    where
        F: FnOnce(&mut CalendarState, &mut Vec<CalendarEvent>) -> Result<bool, OutOfTimeError>,
    {
        let mut events = Vec::new();
        let r = func(&mut self.calendar, &mut events);
        for ev in events {
            self.handle_event(ev);
        }
        r.unwrap_or(false)
    }

    fn handle_event(&mut self, ev: CalendarEvent) {
        log::info!("{}", describe(ev));
        if ev == CalendarEvent::TitlePress {
            self.calendar.set_format(self.calendar.format().toggled());
        }
        self.status = Some(ev);
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")?;
        io::stdout().flush()
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [cal_area, _, status_area] = Layout::vertical([
            Constraint::Length(Calendar::height(&self.calendar)),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);
        Calendar.render(cal_area, buf, &mut self.calendar);
        if let Some(ev) = self.status {
            Line::styled(describe(ev), STATUS_STYLE)
                .centered()
                .render(status_area, buf);
        }
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        } else if let AppState::Jumping(ref mut state) = self.state {
            JumpTo.render(area, buf, state);
        }
    }
}

fn describe(ev: CalendarEvent) -> String {
    match ev {
        CalendarEvent::DateSelect(date) => format!("Selected {date}"),
        CalendarEvent::SwipeNext(start) | CalendarEvent::SwipePrev(start) => {
            format!("Swiped to period starting {start}")
        }
        CalendarEvent::TouchNext(date) | CalendarEvent::TouchPrev(date) => {
            format!("Moved to {date}")
        }
        CalendarEvent::TitlePress => String::from("Title pressed"),
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Jumping(JumpToState),
    Quitting,
}

/// An in-progress left-button drag
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Drag {
    last_column: u16,
    moved: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use swipecal::calendar::CalendarConfig;
    use time::macros::date;

    fn app(config: CalendarConfig) -> App {
        App::new(CalendarState::new(date!(2025 - 01 - 22), config))
    }

    fn render(app: &mut App) -> Vec<String> {
        let area = Rect::new(0, 0, 42, 16);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        buf.content
            .chunks(42)
            .map(|row| row.iter().map(|c| c.symbol()).collect())
            .collect()
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_initial_screen() {
        let mut app = app(CalendarConfig::default());
        let lines = render(&mut app);
        assert_eq!(lines[0], "               January 2025               ");
        assert_eq!(lines[9], "  20    21   (22)   23    24    25    26  ");
        assert_eq!(lines[15].trim(), "");
    }

    #[test]
    fn test_swipe_keys() {
        let mut app = app(CalendarConfig::default().scroll_enabled(true));
        render(&mut app);
        assert!(app.handle_key(KeyCode::Char('l')));
        assert_eq!(app.calendar.current(), date!(2025 - 02 - 22));
        assert_eq!(
            app.status,
            Some(CalendarEvent::SwipeNext(date!(2025 - 02 - 01)))
        );
        let lines = render(&mut app);
        assert_eq!(lines[0], "              February 2025               ");
        assert_eq!(lines[15].trim(), "Swiped to period starting 2025-02-01");
        assert!(app.handle_key(KeyCode::Left));
        assert!(app.handle_key(KeyCode::Left));
        assert_eq!(app.calendar.current(), date!(2024 - 12 - 22));
        assert_eq!(
            app.status,
            Some(CalendarEvent::SwipePrev(date!(2024 - 12 - 01)))
        );
    }

    #[test]
    fn test_swipe_keys_without_scrolling() {
        let mut app = app(CalendarConfig::default());
        assert!(!app.handle_key(KeyCode::Char('l')));
        assert_eq!(app.calendar.current(), date!(2025 - 01 - 22));
        assert_eq!(app.status, None);
    }

    #[test]
    fn test_control_keys() {
        let mut app = app(CalendarConfig::default());
        assert!(app.handle_key(KeyCode::Char('n')));
        assert_eq!(app.status, Some(CalendarEvent::TouchNext(date!(2025 - 02 - 22))));
        assert!(app.handle_key(KeyCode::Char('p')));
        assert!(app.handle_key(KeyCode::Char('p')));
        assert_eq!(app.status, Some(CalendarEvent::TouchPrev(date!(2024 - 12 - 22))));
    }

    #[test]
    fn test_title_press_toggles_format() {
        let mut app = app(CalendarConfig::default());
        assert!(app.handle_key(KeyCode::Char('t')));
        assert_eq!(app.calendar.format(), CalendarFormat::Weekly);
        assert_eq!(app.status, Some(CalendarEvent::TitlePress));
        let lines = render(&mut app);
        assert_eq!(lines[3], "  20    21   (22)   23    24    25    26  ");
        assert_eq!(lines[5].trim(), "");
        assert!(app.handle_key(KeyCode::Char('t')));
        assert_eq!(app.calendar.format(), CalendarFormat::Monthly);
    }

    #[test]
    fn test_format_keys() {
        let mut app = app(CalendarConfig::default());
        assert!(app.handle_key(KeyCode::Char('w')));
        assert_eq!(app.calendar.calendar_height(), 2);
        assert!(app.handle_key(KeyCode::Char('m')));
        assert_eq!(app.calendar.calendar_height(), 10);
        assert_eq!(app.status, None);
    }

    #[test]
    fn test_move_selection() {
        let mut app = app(CalendarConfig::default());
        assert!(app.handle_key(KeyCode::Down));
        assert_eq!(app.calendar.selected(), Some(date!(2025 - 01 - 29)));
        assert!(app.handle_key(KeyCode::Char('f')));
        assert!(app.handle_key(KeyCode::Char('f')));
        assert!(app.handle_key(KeyCode::Char('f')));
        assert_eq!(app.calendar.selected(), Some(date!(2025 - 02 - 01)));
        assert_eq!(app.calendar.current(), date!(2025 - 02 - 01));
        assert_eq!(
            app.status,
            Some(CalendarEvent::DateSelect(date!(2025 - 02 - 01)))
        );
        let lines = render(&mut app);
        assert_eq!(lines[0], "              February 2025               ");
        assert_eq!(lines[15].trim(), "Selected 2025-02-01");
    }

    #[test]
    fn test_click_day() {
        let mut app = app(CalendarConfig::default());
        render(&mut app);
        assert!(app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 26, 5)));
        assert!(app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 26, 5)));
        assert_eq!(app.calendar.selected(), Some(date!(2025 - 01 - 10)));
        assert_eq!(
            app.status,
            Some(CalendarEvent::DateSelect(date!(2025 - 01 - 10)))
        );
    }

    #[test]
    fn test_click_nothing() {
        let mut app = app(CalendarConfig::default());
        render(&mut app);
        assert!(app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 2, 3)));
        assert!(app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 2, 3)));
        assert_eq!(app.calendar.selected(), None);
        assert_eq!(app.status, None);
    }

    #[test]
    fn test_jittery_click_without_scrolling() {
        let mut app = app(CalendarConfig::default());
        render(&mut app);
        assert!(app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 26, 5)));
        assert!(app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 27, 5)));
        assert!(app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 27, 5)));
        assert_eq!(app.calendar.selected(), Some(date!(2025 - 01 - 10)));
        assert_eq!(
            app.status,
            Some(CalendarEvent::DateSelect(date!(2025 - 01 - 10)))
        );
    }

    #[test]
    fn test_drag_to_next_page() {
        let mut app = app(CalendarConfig::default().scroll_enabled(true));
        render(&mut app);
        assert!(app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 30, 5)));
        assert!(app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 20, 5)));
        assert!(app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 5, 5)));
        assert_eq!(app.calendar.scroll_offset(), 84 + 25);
        assert!(app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 5, 5)));
        assert_eq!(app.calendar.current(), date!(2025 - 02 - 22));
        assert_eq!(app.calendar.scroll_offset(), 84);
        assert_eq!(app.calendar.selected(), None);
        assert_eq!(
            app.status,
            Some(CalendarEvent::SwipeNext(date!(2025 - 02 - 01)))
        );
    }

    #[test]
    fn test_short_drag_snaps_back() {
        let mut app = app(CalendarConfig::default().scroll_enabled(true));
        render(&mut app);
        assert!(app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 5)));
        assert!(app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 20, 5)));
        assert!(app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 20, 5)));
        assert_eq!(app.calendar.current(), date!(2025 - 01 - 22));
        assert_eq!(app.calendar.scroll_offset(), 84);
        assert_eq!(app.status, None);
    }

    #[test]
    fn test_help() {
        let mut app = app(CalendarConfig::default());
        assert!(app.handle_key(KeyCode::Char('?')));
        assert_eq!(app.state, AppState::Helping);
        assert!(app.handle_key(KeyCode::Char('x')));
        assert_eq!(app.state, AppState::Calendar);
    }

    #[test]
    fn test_jump_to() {
        let mut app = app(CalendarConfig::default());
        assert!(app.handle_key(KeyCode::Char('g')));
        for c in "20250314".chars() {
            assert!(app.handle_key(KeyCode::Char(c)));
        }
        assert!(!app.handle_key(KeyCode::Char('x')));
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Calendar);
        assert_eq!(app.calendar.current(), date!(2025 - 03 - 14));
        assert!(app.handle_key(KeyCode::Home));
        assert_eq!(app.calendar.current(), date!(2025 - 01 - 22));
    }

    #[test]
    fn test_invalid_key() {
        let mut app = app(CalendarConfig::default());
        assert!(!app.handle_key(KeyCode::Char('x')));
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.quitting());
    }
}
