use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};

static TEXT: &[&str] = &[
    "h, LEFT         Swipe back one page",
    "l, RIGHT        Swipe forward one page",
    "p               Previous month/week",
    "n               Next month/week",
    "k, UP           Select one week earlier",
    "j, DOWN         Select one week later",
    "b               Select one day earlier",
    "f               Select one day later",
    "m / w           Monthly / weekly format",
    "t               Press the title",
    "0, HOME         Jump to today",
    "g               Input date to jump to",
    "?               Show this help",
    "q, ESC          Quit",
    "",
    "Click a day to select it; drag the",
    "days sideways to swipe.",
    "",
    "Press the Any Key to dismiss.",
];

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = Text::from_iter(TEXT.iter().map(|&s| Line::raw(s)));
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
            .min(area.height);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
            .min(area.width);
        let [help_area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [help_area] = Layout::vertical([height])
            .flex(Flex::Center)
            .areas(help_area);
        // Leave a column of padding on each side of the border
        let outer_area = Rect {
            x: help_area.x.saturating_sub(1),
            width: help_area.width.saturating_add(2),
            ..help_area
        }
        .intersection(area);
        Clear.render(outer_area, buf);
        Block::new().style(self.0).render(outer_area, buf);
        Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Keys ")
                    .title_alignment(Alignment::Center),
            )
            .style(self.0)
            .render(help_area, buf);
    }
}
