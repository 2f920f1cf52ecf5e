use crate::YMD_FMT;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Clear, StatefulWidget, Widget},
};
use swipecal::theme::{
    jumpto::{READY_ENTER_STYLE, UNFILLED_CELL_STYLE},
    BASE_STYLE,
};
use time::Date;

const OUTER_WIDTH: u16 = 17;
const OUTER_HEIGHT: u16 = 8;

/// Number of digits in a `YYYYMMDD` date
const DIGITS: usize = 8;

/// Placeholder shown for each digit that hasn't been typed yet
const TEMPLATE: [char; DIGITS] = ['Y', 'Y', 'Y', 'Y', 'M', 'M', 'D', 'D'];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct JumpTo;

impl StatefulWidget for JumpTo {
    type State = JumpToState;

    /*
     * .................
     * .┌─ Jump To… ──┐.
     * .│             │.
     * .│ YYYY-MM-DD  │.
     * .│             │.
     * .│   [ENTER]   │.
     * .└─────────────┘.
     * .................
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(" Jump To… ")
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        let text_area = block_area.inner(Margin::new(1, 1));
        state.to_text().render(text_area, buf);
    }
}

/// Digits typed so far into the jump-to dialog
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct JumpToState {
    digits: [Option<u8>; DIGITS],
    filled: usize,
}

impl JumpToState {
    pub(crate) fn new() -> JumpToState {
        JumpToState::default()
    }

    fn complete(&self) -> bool {
        self.filled == DIGITS
    }

    fn to_text(self) -> Text<'static> {
        Text::from_iter([
            Line::styled("", BASE_STYLE),
            self.to_line(),
            Line::styled("", BASE_STYLE),
            // A styled span rather than a styled line, so that the centring
            // padding isn't underlined
            Line::from(Span::styled(
                "[ENTER]",
                if self.complete() {
                    READY_ENTER_STYLE
                } else {
                    BASE_STYLE
                },
            )),
        ])
        .centered()
    }

    fn to_line(self) -> Line<'static> {
        let mut spans = Vec::with_capacity(DIGITS + 2);
        for (i, (dg, placeholder)) in self.digits.into_iter().zip(TEMPLATE).enumerate() {
            if i == 4 || i == 6 {
                spans.push(Span::styled("-", BASE_STYLE));
            }
            spans.push(match dg {
                Some(d) => Span::styled(d.to_string(), BASE_STYLE),
                None => Span::styled(placeholder.to_string(), UNFILLED_CELL_STYLE),
            });
        }
        Line::from_iter(spans)
    }

    /// The typed digits as a `YYYY-MM-DD` string, if all have been entered
    fn ymd(&self) -> Option<String> {
        let mut s = String::with_capacity(DIGITS + 2);
        for (i, dg) in self.digits.into_iter().enumerate() {
            if i == 4 || i == 6 {
                s.push('-');
            }
            s.push(char::from(b'0' + dg?));
        }
        Some(s)
    }

    pub(crate) fn handle_input(&mut self, input: JumpToInput) -> JumpToOutput {
        match input {
            JumpToInput::Digit(d) if d < 10 && !self.complete() => {
                self.digits[self.filled] = Some(d);
                self.filled += 1;
                JumpToOutput::Ok
            }
            JumpToInput::Backspace if self.filled > 0 => {
                self.filled -= 1;
                self.digits[self.filled] = None;
                JumpToOutput::Ok
            }
            JumpToInput::Enter => match self.ymd().map(|s| Date::parse(&s, YMD_FMT)) {
                Some(Ok(date)) => JumpToOutput::Jump(date),
                Some(Err(e)) => {
                    log::debug!("Rejected jump-to input: {e}");
                    JumpToOutput::Invalid
                }
                None => JumpToOutput::Invalid,
            },
            _ => JumpToOutput::Invalid,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum JumpToInput {
    Digit(u8),
    Backspace,
    Enter,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum JumpToOutput {
    Ok,
    Invalid,
    Jump(Date),
}
