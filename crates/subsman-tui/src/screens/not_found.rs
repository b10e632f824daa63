//! Catch-all screen for paths outside the route table.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::component::Component;
use crate::theme;

pub struct NotFoundScreen;

impl Component for NotFoundScreen {
    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = theme::panel("Not Found", true);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [_, body, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(4),
            Constraint::Fill(1),
        ])
        .areas(inner);

        let text = vec![
            Line::from(Span::styled(
                "404",
                Style::default()
                    .fg(theme::WARN_YELLOW)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "There is no page at this address.",
                theme::table_row(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Esc go back   1 status   : open a path",
                theme::key_hint(),
            )),
        ];
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), body);
    }
}
