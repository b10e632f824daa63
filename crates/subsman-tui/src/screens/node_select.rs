//! Node selection screen: filter tested nodes by delay and speed, then
//! publish the survivors as the final subscription.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, TableState};
use tui_input::Input;

use subsman_config::Defaults;
use subsman_core::{FilteredNodes, GeneratedSubscription};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::text_field;

use super::node_test::node_table;
use super::step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    MaxDelay,
    MinSpeed,
}

pub struct NodeSelectScreen {
    max_delay: Input,
    min_speed: Input,
    editing: Option<Field>,
    result: Option<FilteredNodes>,
    generated: Option<GeneratedSubscription>,
    table: TableState,
}

impl NodeSelectScreen {
    pub fn new(defaults: &Defaults) -> Self {
        Self {
            max_delay: Input::new(defaults.max_delay.to_string()),
            min_speed: Input::new(defaults.min_speed.to_string()),
            editing: None,
            result: None,
            generated: None,
            table: TableState::default(),
        }
    }

    /// Parse both thresholds into a filter request.
    fn filter_action(&self) -> Action {
        let max_delay = self.max_delay.value().trim().parse::<u32>();
        let min_speed = self.min_speed.value().trim().parse::<f64>();
        match (max_delay, min_speed) {
            (Ok(max_delay), Ok(min_speed)) if min_speed.is_finite() && min_speed >= 0.0 => {
                Action::FilterNodes { max_delay, min_speed }
            }
            (Err(_), _) => Action::Notify(Notification::error(
                "Max delay must be a whole number of milliseconds",
            )),
            _ => Action::Notify(Notification::error(
                "Min speed must be a non-negative number",
            )),
        }
    }

    fn result_len(&self) -> usize {
        self.result.as_ref().map_or(0, |r| r.nodes.len())
    }

    fn handle_edit_key(&mut self, field: Field, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => self.editing = None,
            KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
                self.editing = Some(match field {
                    Field::MaxDelay => Field::MinSpeed,
                    Field::MinSpeed => Field::MaxDelay,
                });
            }
            KeyCode::Enter => {
                self.editing = None;
                return Some(self.filter_action());
            }
            _ => {
                let input = match field {
                    Field::MaxDelay => &mut self.max_delay,
                    Field::MinSpeed => &mut self.min_speed,
                };
                text_field::handle_key(input, key);
            }
        }
        None
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::new();
        match &self.result {
            Some(r) => lines.push(Line::from(Span::styled(
                format!("{} of {} nodes pass", r.nodes.len(), r.total_nodes),
                theme::table_row(),
            ))),
            None => lines.push(Line::from(Span::styled(
                "No filter run yet",
                theme::key_hint(),
            ))),
        }
        if let Some(g) = &self.generated {
            lines.push(Line::from(vec![
                Span::styled("Subscription  ", theme::table_header()),
                Span::styled(g.url.clone(), Style::default().fg(theme::ACCENT)),
                Span::styled(format!("  ({} nodes)", g.node_count), theme::key_hint()),
            ]));
        }
        frame.render_widget(Paragraph::new(lines), area);
    }
}

impl Component for NodeSelectScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(field) = self.editing {
            return Ok(self.handle_edit_key(field, key));
        }

        let len = self.result_len();
        let action = match key.code {
            KeyCode::Char('e') => {
                self.editing = Some(Field::MaxDelay);
                None
            }
            KeyCode::Char('f') | KeyCode::Enter => Some(self.filter_action()),
            KeyCode::Char('g') if self.result.is_none() => Some(Action::Notify(
                Notification::info("Run a filter before generating"),
            )),
            KeyCode::Char('g') => Some(Action::GenerateSubscription),
            KeyCode::Char('j') | KeyCode::Down => {
                self.table.select(step(self.table.selected(), 1, len));
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.table.select(step(self.table.selected(), -1, len));
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::NodesFiltered(result) => {
                self.result = Some(result.clone());
                self.generated = None;
                self.table.select(None);
            }
            Action::SubscriptionGenerated(generated) => self.generated = Some(generated.clone()),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [form_area, summary_area, table_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(2),
            Constraint::Min(3),
        ])
        .areas(area);

        let [delay_area, speed_area] =
            Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).areas(form_area);
        text_field::render(
            frame,
            delay_area,
            "Max delay (ms)",
            &self.max_delay,
            self.editing == Some(Field::MaxDelay),
        );
        text_field::render(
            frame,
            speed_area,
            "Min speed (MB/s)",
            &self.min_speed,
            self.editing == Some(Field::MinSpeed),
        );

        self.render_summary(frame, summary_area);

        let nodes = self.result.as_ref().map_or(&[][..], |r| r.nodes.as_slice());
        let table = node_table(nodes, "Selected Nodes", self.editing.is_none());
        let mut state = self.table;
        frame.render_stateful_widget(table, table_area, &mut state);
    }

    fn captures_input(&self) -> bool {
        self.editing.is_some()
    }

    fn key_hints(&self) -> &'static str {
        if self.editing.is_some() {
            "Tab switch  Enter filter  Esc done"
        } else {
            "e edit thresholds  f filter  g generate"
        }
    }
}
