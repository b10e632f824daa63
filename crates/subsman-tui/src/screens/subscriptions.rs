//! Subscriptions screen: list, import, merge and delete remote
//! subscriptions.

use std::collections::BTreeSet;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Cell, Clear, Row, Table, TableState};
use tokio::sync::mpsc::UnboundedSender;
use tui_input::Input;

use subsman_core::{DashboardStore, Subscription};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::text_field;

use super::step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Name,
    Url,
}

#[derive(Debug, Default)]
struct ImportForm {
    name: Input,
    url: Input,
    on_url: bool,
}

impl ImportForm {
    fn field(&self) -> FormField {
        if self.on_url {
            FormField::Url
        } else {
            FormField::Name
        }
    }

    fn active_input(&mut self) -> &mut Input {
        if self.on_url { &mut self.url } else { &mut self.name }
    }
}

pub struct SubscriptionsScreen {
    subscriptions: Arc<Vec<Subscription>>,
    table: TableState,
    marked: BTreeSet<String>,
    form: Option<ImportForm>,
}

impl SubscriptionsScreen {
    pub fn new(store: &DashboardStore) -> Self {
        Self {
            subscriptions: store.subscriptions_snapshot(),
            table: TableState::default(),
            marked: BTreeSet::new(),
            form: None,
        }
    }

    /// Marked ids, or the highlighted row when nothing is marked.
    fn target_ids(&self) -> Vec<String> {
        if !self.marked.is_empty() {
            return self.marked.iter().cloned().collect();
        }
        self.table
            .selected()
            .and_then(|i| self.subscriptions.get(i))
            .map(|s| vec![s.id.clone()])
            .unwrap_or_default()
    }

    fn toggle_mark(&mut self) {
        let Some(sub) = self.table.selected().and_then(|i| self.subscriptions.get(i)) else {
            return;
        };
        if !self.marked.remove(&sub.id) {
            self.marked.insert(sub.id.clone());
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        let form = self.form.as_mut()?;
        match key.code {
            KeyCode::Esc => self.form = None,
            KeyCode::Tab | KeyCode::Up | KeyCode::Down => form.on_url = !form.on_url,
            KeyCode::Enter if form.field() == FormField::Name => form.on_url = true,
            KeyCode::Enter => {
                let name = form.name.value().trim().to_owned();
                let url = form.url.value().trim().to_owned();
                if name.is_empty() || url.is_empty() {
                    return Some(Action::Notify(Notification::error(
                        "Name and URL are both required",
                    )));
                }
                self.form = None;
                return Some(Action::ImportSubscription { name, url });
            }
            _ => {
                text_field::handle_key(form.active_input(), key);
            }
        }
        None
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(
            ["", "Name", "Type", "Nodes", "Imported", "URL"]
                .map(|h| Cell::from(h).style(theme::table_header())),
        );

        let rows: Vec<Row> = self
            .subscriptions
            .iter()
            .map(|s| {
                let mark = if self.marked.contains(&s.id) { "●" } else { " " };
                Row::new(vec![
                    Cell::from(mark).style(Style::default().fg(theme::ACCENT)),
                    Cell::from(s.name.clone()),
                    Cell::from(s.kind.clone()),
                    Cell::from(s.node_count.to_string()),
                    Cell::from(s.import_time.clone()),
                    Cell::from(s.url.clone()).style(theme::key_hint()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(2),
            Constraint::Min(12),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Length(20),
            Constraint::Fill(2),
        ];
        let title = if self.marked.is_empty() {
            format!("Subscriptions ({})", self.subscriptions.len())
        } else {
            format!(
                "Subscriptions ({}, {} marked)",
                self.subscriptions.len(),
                self.marked.len()
            )
        };
        let table = Table::new(rows, widths)
            .header(header)
            .block(theme::panel(&title, self.form.is_none()))
            .row_highlight_style(theme::table_selected());

        let mut state = self.table;
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_form(form: &ImportForm, frame: &mut Frame, area: Rect) {
        let width = 64.min(area.width.saturating_sub(4));
        let height = 10.min(area.height);
        let popup = Rect::new(
            area.x + (area.width.saturating_sub(width)) / 2,
            area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        );
        frame.render_widget(Clear, popup);
        let block = theme::panel("Import Subscription", true);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let [name_area, url_area] =
            Layout::vertical([Constraint::Length(4), Constraint::Length(4)]).areas(inner);
        text_field::render(frame, name_area, "Name", &form.name, form.field() == FormField::Name);
        text_field::render(frame, url_area, "URL", &form.url, form.field() == FormField::Url);
    }
}

impl Component for SubscriptionsScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        action_tx.send(Action::FetchSubscriptions)?;
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.form.is_some() {
            return Ok(self.handle_form_key(key));
        }

        let len = self.subscriptions.len();
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.table.select(step(self.table.selected(), 1, len));
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.table.select(step(self.table.selected(), -1, len));
                None
            }
            KeyCode::Char(' ') => {
                self.toggle_mark();
                None
            }
            KeyCode::Char('a') => {
                self.form = Some(ImportForm::default());
                None
            }
            KeyCode::Char('m') => {
                let ids = self.target_ids();
                if ids.is_empty() {
                    Some(Action::Notify(Notification::info("Select subscriptions to merge")))
                } else {
                    Some(Action::MergeSubscriptions(ids))
                }
            }
            KeyCode::Char('d') => {
                let ids = self.target_ids();
                (!ids.is_empty()).then_some(Action::RequestDeleteSubscriptions(ids))
            }
            KeyCode::Char('r') => Some(Action::FetchSubscriptions),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SubscriptionsUpdated(subs) = action {
            self.subscriptions = Arc::clone(subs);
            self.marked
                .retain(|id| self.subscriptions.iter().any(|s| &s.id == id));
            if self.table.selected().is_some_and(|i| i >= subs.len()) {
                self.table.select(subs.len().checked_sub(1));
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        self.render_table(frame, area);
        if let Some(form) = &self.form {
            Self::render_form(form, frame, area);
        }
    }

    fn captures_input(&self) -> bool {
        self.form.is_some()
    }

    fn key_hints(&self) -> &'static str {
        if self.form.is_some() {
            "Tab switch field  Enter import  Esc cancel"
        } else {
            "a import  Space mark  m merge  d delete  r refresh"
        }
    }
}
