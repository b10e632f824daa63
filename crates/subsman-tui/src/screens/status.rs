//! Status screen: node health counts, served subscription URLs and the
//! generation history.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};
use tokio::sync::mpsc::UnboundedSender;

use subsman_core::{DashboardStore, SystemStatus};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

use super::step;

pub struct StatusScreen {
    status: Arc<Option<SystemStatus>>,
    history_table: TableState,
}

impl StatusScreen {
    pub fn new(store: &DashboardStore) -> Self {
        Self {
            status: store.system_status_snapshot(),
            history_table: TableState::default(),
        }
    }

    fn render_stat(frame: &mut Frame, area: Rect, label: &str, value: u32, color: Color) {
        let block = theme::panel(label, false);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new(Span::styled(
                value.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .centered(),
            inner,
        );
    }

    fn render_urls(&self, frame: &mut Frame, area: Rect) {
        let block = theme::panel("Current Subscriptions", false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let url = |s: &str| {
            if s.is_empty() {
                Span::styled("not generated yet", theme::key_hint())
            } else {
                Span::styled(s.to_owned(), Style::default().fg(theme::ACCENT))
            }
        };
        let (merged, final_sub) = self.status.as_ref().as_ref().map_or(("", ""), |s| {
            (
                s.current_status.merged_subscription.as_str(),
                s.current_status.final_subscription.as_str(),
            )
        });

        let lines = vec![
            Line::from(vec![Span::styled("Merged  ", theme::table_header()), url(merged)]),
            Line::from(vec![Span::styled("Final   ", theme::table_header()), url(final_sub)]),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_history(&self, frame: &mut Frame, area: Rect) {
        let history = self
            .status
            .as_ref()
            .as_ref()
            .map(|s| s.history.as_slice())
            .unwrap_or_default();

        let header = Row::new(vec![
            Cell::from("Generated").style(theme::table_header()),
            Cell::from("URL").style(theme::table_header()),
        ]);
        let rows: Vec<Row> = history
            .iter()
            .map(|h| Row::new(vec![h.time.clone(), h.url.clone()]).style(theme::table_row()))
            .collect();

        let table = Table::new(rows, [Constraint::Length(20), Constraint::Fill(1)])
            .header(header)
            .block(theme::panel("History", true))
            .row_highlight_style(theme::table_selected());

        let mut state = self.history_table;
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn history_len(&self) -> usize {
        self.status.as_ref().as_ref().map_or(0, |s| s.history.len())
    }
}

impl Component for StatusScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        action_tx.send(Action::RefreshStatus)?;
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('r') => return Ok(Some(Action::RefreshStatus)),
            KeyCode::Char('j') | KeyCode::Down => {
                let next = step(self.history_table.selected(), 1, self.history_len());
                self.history_table.select(next);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let next = step(self.history_table.selected(), -1, self.history_len());
                self.history_table.select(next);
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::StatusUpdated(status) = action {
            self.status = Arc::clone(status);
            if self.history_table.selected().is_some_and(|i| i >= self.history_len()) {
                self.history_table.select(None);
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [stats_area, urls_area, history_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(3),
        ])
        .areas(area);

        let stats = self
            .status
            .as_ref()
            .as_ref()
            .map(|s| s.node_stats)
            .unwrap_or_default();
        let cols: [Rect; 4] = Layout::horizontal([Constraint::Ratio(1, 4); 4]).areas(stats_area);
        Self::render_stat(frame, cols[0], "Total Nodes", stats.total, theme::ACCENT);
        Self::render_stat(frame, cols[1], "Healthy", stats.current, theme::SUCCESS_GREEN);
        Self::render_stat(frame, cols[2], "Slow", stats.slow, theme::WARN_YELLOW);
        Self::render_stat(frame, cols[3], "Failed", stats.failed, theme::ERROR_RED);

        self.render_urls(frame, urls_area);
        self.render_history(frame, history_area);
    }

    fn key_hints(&self) -> &'static str {
        "r refresh  j/k history"
    }
}
