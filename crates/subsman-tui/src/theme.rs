//! Palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Palette ───────────────────────────────────────────────────────────

pub const ACCENT: Color = Color::Rgb(64, 158, 255); // #409eff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const WARN_YELLOW: Color = Color::Rgb(230, 162, 60); // #e6a23c
pub const SUCCESS_GREEN: Color = Color::Rgb(103, 194, 58); // #67c23a
pub const ERROR_RED: Color = Color::Rgb(245, 108, 108); // #f56c6c

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ACCENT)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(NEON_CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(ACCENT)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_active() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// Delay coloring: green under 200 ms, yellow under 500 ms, red above.
pub fn delay_style(delay: Option<u32>) -> Style {
    match delay {
        None => Style::default().fg(BORDER_GRAY),
        Some(0..200) => Style::default().fg(SUCCESS_GREEN),
        Some(200..500) => Style::default().fg(WARN_YELLOW),
        Some(_) => Style::default().fg(ERROR_RED),
    }
}

/// Standard rounded panel with a title.
pub fn panel(title: &str, focused: bool) -> ratatui::widgets::Block<'static> {
    use ratatui::widgets::{Block, BorderType, Borders};

    Block::default()
        .title(format!(" {title} "))
        .title_style(title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            border_focused()
        } else {
            border_default()
        })
}
