//! Single-line text field built on `tui-input`, with a label above a
//! rounded box.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tui_input::{Input, InputRequest};

use crate::theme;

/// Apply an editing key to `input`. Returns false for keys it ignores.
pub fn handle_key(input: &mut Input, key: KeyEvent) -> bool {
    let request = match key.code {
        KeyCode::Char(c) => InputRequest::InsertChar(c),
        KeyCode::Backspace => InputRequest::DeletePrevChar,
        KeyCode::Delete => InputRequest::DeleteNextChar,
        KeyCode::Left => InputRequest::GoToPrevChar,
        KeyCode::Right => InputRequest::GoToNextChar,
        KeyCode::Home => InputRequest::GoToStart,
        KeyCode::End => InputRequest::GoToEnd,
        _ => return false,
    };
    input.handle(request);
    true
}

/// Render a labelled field. Needs three rows: label, then a bordered box.
/// The cursor is placed only on the active field.
pub fn render(frame: &mut Frame, area: Rect, label: &str, input: &Input, active: bool) {
    if area.height < 3 {
        return;
    }

    let label_style = if active {
        Style::default().fg(theme::NEON_CYAN)
    } else {
        Style::default().fg(theme::DIM_WHITE)
    };
    frame.render_widget(
        Paragraph::new(Span::styled(label.to_owned(), label_style)),
        Rect::new(area.x, area.y, area.width, 1),
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if active {
            theme::border_focused()
        } else {
            theme::border_default()
        });
    let box_area = Rect::new(area.x, area.y + 1, area.width, 3.min(area.height - 1));
    let inner = block.inner(box_area);
    frame.render_widget(block, box_area);

    let width = usize::from(inner.width.max(1));
    let scroll = input.visual_scroll(width.saturating_sub(1));
    frame.render_widget(
        Paragraph::new(input.value().to_owned())
            .style(theme::table_row())
            .scroll((0, u16::try_from(scroll).unwrap_or(u16::MAX))),
        inner,
    );

    if active {
        let offset = input.visual_cursor().saturating_sub(scroll);
        let x = inner.x + u16::try_from(offset).unwrap_or(inner.width);
        frame.set_cursor_position(Position::new(x.min(inner.right().saturating_sub(1)), inner.y));
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn editing_keys_change_the_value() {
        let mut input = Input::default();
        for c in "4OO".chars() {
            assert!(handle_key(&mut input, key(KeyCode::Char(c))));
        }
        handle_key(&mut input, key(KeyCode::Backspace));
        handle_key(&mut input, key(KeyCode::Backspace));
        handle_key(&mut input, key(KeyCode::Char('0')));
        handle_key(&mut input, key(KeyCode::Char('0')));
        assert_eq!(input.value(), "400");
        assert!(!handle_key(&mut input, key(KeyCode::Enter)));
    }
}
