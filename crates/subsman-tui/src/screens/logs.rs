//! Logs screen: paged operation log with a destructive clear.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::widgets::{Cell, Row, Table, TableState};
use tokio::sync::mpsc::UnboundedSender;

use subsman_core::{DashboardStore, Log};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

use super::step;

pub struct LogsScreen {
    logs: Arc<Vec<Log>>,
    page: u32,
    page_size: u32,
    total: u64,
    table: TableState,
}

/// Number of pages for `total` entries, never less than one.
fn page_count(total: u64, page_size: u32) -> u64 {
    total.div_ceil(u64::from(page_size.max(1))).max(1)
}

impl LogsScreen {
    pub fn new(store: &DashboardStore, page_size: u32) -> Self {
        Self {
            logs: store.logs_snapshot(),
            page: 1,
            page_size: page_size.max(1),
            total: 0,
            table: TableState::default(),
        }
    }

    fn fetch(&self, page: u32) -> Action {
        Action::FetchLogs {
            page,
            page_size: self.page_size,
        }
    }

    fn pages(&self) -> u64 {
        page_count(self.total, self.page_size)
    }
}

impl Component for LogsScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        action_tx.send(self.fetch(1))?;
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('n') | KeyCode::Right if u64::from(self.page) < self.pages() => {
                Some(self.fetch(self.page + 1))
            }
            KeyCode::Char('p') | KeyCode::Left if self.page > 1 => Some(self.fetch(self.page - 1)),
            KeyCode::Char('r') => Some(self.fetch(self.page)),
            KeyCode::Char('c') => Some(Action::RequestClearLogs),
            KeyCode::Char('j') | KeyCode::Down => {
                self.table.select(step(self.table.selected(), 1, self.logs.len()));
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.table.select(step(self.table.selected(), -1, self.logs.len()));
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::LogsUpdated(logs) => {
                self.logs = Arc::clone(logs);
                self.table.select(if self.logs.is_empty() { None } else { Some(0) });
            }
            Action::LogPageLoaded { page, total } => {
                self.page = (*page).max(1);
                self.total = *total;
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(vec![
            Cell::from("Time").style(theme::table_header()),
            Cell::from("Operation").style(theme::table_header()),
        ]);
        let rows: Vec<Row> = self
            .logs
            .iter()
            .map(|log| {
                Row::new(vec![log.time.clone(), log.operation.clone()]).style(theme::table_row())
            })
            .collect();

        let title = format!(
            "Logs · page {} of {} · {} total",
            self.page,
            self.pages(),
            self.total
        );
        let table = Table::new(rows, [Constraint::Length(20), Constraint::Fill(1)])
            .header(header)
            .block(theme::panel(&title, true))
            .row_highlight_style(theme::table_selected());

        let mut state = self.table;
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn key_hints(&self) -> &'static str {
        "n/p page  j/k scroll  r refresh  c clear"
    }
}
