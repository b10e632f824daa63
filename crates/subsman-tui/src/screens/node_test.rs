//! Node test screen: import nodes from the merged subscription and run
//! delay/speed tests.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc::UnboundedSender;

use subsman_core::{DashboardStore, Node};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;

use super::step;

/// Render a node table. Shared with the node selection screen.
pub(crate) fn node_table<'a>(nodes: &'a [Node], title: &str, focused: bool) -> Table<'a> {
    let header = Row::new(
        ["Alias", "Type", "Address", "Group", "Delay", "Speed"]
            .map(|h| Cell::from(h).style(theme::table_header())),
    );
    let rows: Vec<Row> = nodes
        .iter()
        .map(|n| {
            let delay = n.delay.map_or_else(|| "-".into(), |d| format!("{d} ms"));
            let speed = n.speed.map_or_else(|| "-".into(), |s| format!("{s:.2} MB/s"));
            Row::new(vec![
                Cell::from(n.alias.as_str()),
                Cell::from(n.kind.as_str()),
                Cell::from(format!("{}:{}", n.address, n.port)),
                Cell::from(n.group.as_str()),
                Cell::from(delay).style(theme::delay_style(n.delay)),
                Cell::from(speed),
            ])
            .style(theme::table_row())
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Length(8),
        Constraint::Fill(2),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(11),
    ];
    Table::new(rows, widths)
        .header(header)
        .block(theme::panel(title, focused))
        .row_highlight_style(theme::table_selected())
}

pub struct NodeTestScreen {
    nodes: Arc<Vec<Node>>,
    table: TableState,
    loading: bool,
    throbber_state: ThrobberState,
}

impl NodeTestScreen {
    pub fn new(store: &DashboardStore) -> Self {
        Self {
            nodes: store.nodes_snapshot(),
            table: TableState::default(),
            loading: store.is_loading(),
            throbber_state: ThrobberState::default(),
        }
    }

    fn tested(&self) -> usize {
        self.nodes.iter().filter(|n| n.delay.is_some()).count()
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect) {
        if self.loading {
            let throbber = Throbber::default()
                .label(format!(" Testing {} nodes...", self.nodes.len()))
                .style(Style::default().fg(theme::NEON_CYAN))
                .throbber_style(Style::default().fg(theme::ACCENT));
            frame.render_stateful_widget(throbber, area, &mut self.throbber_state.clone());
            return;
        }

        let line = Line::from(vec![
            Span::styled(format!(" {} nodes", self.nodes.len()), theme::table_row()),
            Span::styled(format!("   {} with results", self.tested()), theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

impl Component for NodeTestScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        action_tx.send(Action::FetchNodes)?;
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let len = self.nodes.len();
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.table.select(step(self.table.selected(), 1, len));
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.table.select(step(self.table.selected(), -1, len));
                None
            }
            KeyCode::Char('t') if self.loading => Some(Action::Notify(Notification::info(
                "A node test is already running",
            ))),
            KeyCode::Char('t') => Some(Action::TestNodes),
            KeyCode::Char('i') => Some(Action::ImportNodes),
            KeyCode::Char('r') => Some(Action::FetchNodes),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::NodesUpdated(nodes) => {
                self.nodes = Arc::clone(nodes);
                if self.table.selected().is_some_and(|i| i >= nodes.len()) {
                    self.table.select(nodes.len().checked_sub(1));
                }
            }
            Action::LoadingChanged(loading) => self.loading = *loading,
            Action::Tick if self.loading => self.throbber_state.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [summary_area, table_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).areas(area);
        self.render_summary(frame, summary_area);

        let table = node_table(&self.nodes, "Nodes", true);
        let mut state = self.table;
        frame.render_stateful_widget(table, table_area, &mut state);
    }

    fn key_hints(&self) -> &'static str {
        "i import  t test  r refresh"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_is_refused_while_a_test_runs() {
        let mut screen = NodeTestScreen::new(&DashboardStore::new());
        assert_eq!(
            screen.handle_key_event(key(KeyCode::Char('t'))).unwrap(),
            Some(Action::TestNodes)
        );

        screen.update(&Action::LoadingChanged(true)).unwrap();
        let refused = screen.handle_key_event(key(KeyCode::Char('t'))).unwrap();
        assert!(matches!(refused, Some(Action::Notify(_))));

        screen.update(&Action::LoadingChanged(false)).unwrap();
        assert_eq!(
            screen.handle_key_event(key(KeyCode::Char('t'))).unwrap(),
            Some(Action::TestNodes)
        );
    }
}
