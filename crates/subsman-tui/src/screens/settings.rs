//! Settings screen: edit the scheduled subscription update and node check.
//!
//! Edits go to a local draft; nothing is sent until `s` is pressed. Range
//! checks happen in the dashboard before the request goes out.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc::UnboundedSender;
use tui_input::Input;

use subsman_core::settings::weekday_name;
use subsman_core::{DashboardStore, SystemSettings, TimeOfDay, UpdateSchedule};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::text_field;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Enabled,
    Schedule,
    Weekday,
    Time,
    Interval,
}

const FIELDS: [Field; 5] = [
    Field::Enabled,
    Field::Schedule,
    Field::Weekday,
    Field::Time,
    Field::Interval,
];

pub struct SettingsScreen {
    draft: SystemSettings,
    loaded: bool,
    dirty: bool,
    time: Input,
    interval: Input,
    selected: usize,
    editing: bool,
}

fn parse_time(text: &str) -> Result<Option<TimeOfDay>, &'static str> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let (hour, minute) = text.split_once(':').ok_or("Time must look like HH:MM")?;
    let hour = hour.trim().parse().map_err(|_| "Hour must be a number")?;
    let minute = minute.trim().parse().map_err(|_| "Minute must be a number")?;
    Ok(Some(TimeOfDay { hour, minute }))
}

impl SettingsScreen {
    pub fn new(store: &DashboardStore) -> Self {
        let mut screen = Self {
            draft: SystemSettings::default(),
            loaded: false,
            dirty: false,
            time: Input::default(),
            interval: Input::default(),
            selected: 0,
            editing: false,
        };
        screen.load(&store.settings_snapshot());
        screen
    }

    fn load(&mut self, settings: &Option<SystemSettings>) {
        let Some(settings) = settings else {
            return;
        };
        self.draft = settings.clone();
        self.loaded = true;
        self.dirty = false;
        let update = &settings.scheduled_tasks.subscription_update;
        self.time = Input::new(update.time.map(|t| t.to_string()).unwrap_or_default());
        self.interval = Input::new(settings.scheduled_tasks.node_check.interval.to_string());
    }

    fn field(&self) -> Field {
        FIELDS.get(self.selected).copied().unwrap_or(Field::Enabled)
    }

    fn is_weekly(&self) -> bool {
        self.draft.scheduled_tasks.subscription_update.schedule == UpdateSchedule::Weekly
    }

    fn move_selection(&mut self, down: bool) {
        let mut next = self.selected;
        loop {
            next = if down {
                (next + 1).min(FIELDS.len() - 1)
            } else {
                next.saturating_sub(1)
            };
            // Weekday is only reachable on weekly schedules
            if FIELDS.get(next) != Some(&Field::Weekday) || self.is_weekly() {
                break;
            }
            if next == 0 || next == FIELDS.len() - 1 {
                break;
            }
        }
        self.selected = next;
    }

    fn cycle_weekday(&mut self, forward: bool) {
        let update = &mut self.draft.scheduled_tasks.subscription_update;
        let day = update.weekday.unwrap_or(0);
        update.weekday = Some(if forward { (day + 1) % 7 } else { (day + 6) % 7 });
        self.dirty = true;
    }

    /// Toggle a switch field, or start editing a text field.
    fn activate(&mut self) {
        let field = self.field();
        let tasks = &mut self.draft.scheduled_tasks;
        match field {
            Field::Enabled => tasks.enabled = !tasks.enabled,
            Field::Schedule => {
                let update = &mut tasks.subscription_update;
                update.schedule = match update.schedule {
                    UpdateSchedule::Daily => UpdateSchedule::Weekly,
                    UpdateSchedule::Weekly => UpdateSchedule::Daily,
                };
                if update.schedule == UpdateSchedule::Weekly && update.weekday.is_none() {
                    update.weekday = Some(0);
                }
            }
            Field::Weekday => {
                self.cycle_weekday(true);
                return;
            }
            Field::Time | Field::Interval => {
                self.editing = true;
                return;
            }
        }
        self.dirty = true;
    }

    /// Build the settings to send from the draft and the text fields.
    fn build(&self) -> Result<SystemSettings, &'static str> {
        let mut settings = self.draft.clone();
        let tasks = &mut settings.scheduled_tasks;
        tasks.subscription_update.time = parse_time(self.time.value())?;
        tasks.node_check.interval = self
            .interval
            .value()
            .trim()
            .parse()
            .map_err(|_| "Check interval must be a whole number of minutes")?;
        if tasks.subscription_update.schedule == UpdateSchedule::Daily {
            tasks.subscription_update.weekday = None;
        }
        Ok(settings)
    }

    fn save(&mut self) -> Action {
        match self.build() {
            Ok(settings) => {
                self.dirty = false;
                Action::SaveSettings(Box::new(settings))
            }
            Err(msg) => Action::Notify(Notification::error(msg)),
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => self.editing = false,
            _ => {
                let input = if self.field() == Field::Time {
                    &mut self.time
                } else {
                    &mut self.interval
                };
                if text_field::handle_key(input, key) {
                    self.dirty = true;
                }
            }
        }
    }

    fn render_row(&self, field: Field, value: String) -> Line<'static> {
        let selected = self.field() == field;
        let label = match field {
            Field::Enabled => "Scheduled tasks",
            Field::Schedule => "Update schedule",
            Field::Weekday => "Weekday",
            Field::Time => "Update time",
            Field::Interval => "Node check (min)",
        };
        let marker = if selected { "▸ " } else { "  " };
        let value_style = if selected {
            theme::table_selected()
        } else {
            theme::table_row()
        };
        Line::from(vec![
            Span::styled(marker, Style::default().fg(theme::ACCENT)),
            Span::styled(format!("{label:<18}"), theme::table_header()),
            Span::styled(value, value_style),
        ])
    }
}

impl Component for SettingsScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        action_tx.send(Action::FetchSettings)?;
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.editing {
            self.handle_edit_key(key);
            return Ok(None);
        }

        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(true);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(false);
                None
            }
            KeyCode::Left | KeyCode::Char('h') if self.field() == Field::Weekday => {
                self.cycle_weekday(false);
                None
            }
            KeyCode::Right | KeyCode::Char('l') if self.field() == Field::Weekday => {
                self.cycle_weekday(true);
                None
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.activate();
                None
            }
            KeyCode::Char('s') if self.loaded => Some(self.save()),
            KeyCode::Char('r') => {
                self.dirty = false;
                Some(Action::FetchSettings)
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SettingsUpdated(settings) = action {
            // Keep unsaved edits over background refreshes
            if !self.dirty {
                self.load(settings);
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = if self.dirty { "Settings (unsaved)" } else { "Settings" };
        let block = theme::panel(title, true);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if !self.loaded {
            frame.render_widget(
                Paragraph::new(Span::styled("Loading settings...", theme::key_hint())),
                inner,
            );
            return;
        }

        let tasks = &self.draft.scheduled_tasks;
        let update = &tasks.subscription_update;
        let mut lines = vec![
            self.render_row(
                Field::Enabled,
                if tasks.enabled { "[x] enabled" } else { "[ ] disabled" }.into(),
            ),
            self.render_row(Field::Schedule, update.schedule.to_string()),
        ];
        if self.is_weekly() {
            let day = update.weekday.and_then(weekday_name).unwrap_or("-");
            lines.push(self.render_row(Field::Weekday, format!("◂ {day} ▸")));
        }

        let [switches, time_area, interval_area, _] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .areas(inner);
        frame.render_widget(Paragraph::new(lines), switches);

        let time_active = self.field() == Field::Time;
        let interval_active = self.field() == Field::Interval;
        text_field::render(
            frame,
            time_area,
            if time_active { "▸ Update time (HH:MM)" } else { "  Update time (HH:MM)" },
            &self.time,
            self.editing && time_active,
        );
        text_field::render(
            frame,
            interval_area,
            if interval_active { "▸ Node check interval (minutes)" } else { "  Node check interval (minutes)" },
            &self.interval,
            self.editing && interval_active,
        );

        if !tasks.enabled {
            let note = Line::from(Span::styled(
                "  Scheduled tasks are off; nothing runs until they are enabled.",
                Style::default()
                    .fg(theme::WARN_YELLOW)
                    .add_modifier(Modifier::ITALIC),
            ));
            let y = interval_area.bottom();
            if y < inner.bottom() {
                frame.render_widget(Paragraph::new(note), Rect::new(inner.x, y, inner.width, 1));
            }
        }
    }

    fn captures_input(&self) -> bool {
        self.editing
    }

    fn key_hints(&self) -> &'static str {
        if self.editing {
            "Enter/Esc done"
        } else {
            "j/k move  Space toggle/edit  ◂/▸ weekday  s save  r reload"
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use subsman_core::{NodeCheck, ScheduledTasks, SubscriptionUpdate};

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded(settings: SystemSettings) -> SettingsScreen {
        let mut screen = SettingsScreen::new(&DashboardStore::new());
        screen
            .update(&Action::SettingsUpdated(Arc::new(Some(settings))))
            .unwrap();
        screen
    }

    fn daily() -> SystemSettings {
        SystemSettings {
            scheduled_tasks: ScheduledTasks {
                enabled: true,
                subscription_update: SubscriptionUpdate {
                    schedule: UpdateSchedule::Daily,
                    weekday: None,
                    time: Some(TimeOfDay { hour: 3, minute: 0 }),
                },
                node_check: NodeCheck { interval: 240 },
            },
        }
    }

    #[test]
    fn parse_time_accepts_blank_and_hh_mm() {
        assert_eq!(parse_time(""), Ok(None));
        assert_eq!(
            parse_time("04:30"),
            Ok(Some(TimeOfDay { hour: 4, minute: 30 }))
        );
        assert!(parse_time("noon").is_err());
    }

    #[test]
    fn save_sends_the_unchanged_settings() {
        let mut screen = loaded(daily());
        let action = screen.handle_key_event(key(KeyCode::Char('s'))).unwrap();
        assert_eq!(action, Some(Action::SaveSettings(Box::new(daily()))));
    }

    #[test]
    fn switching_to_weekly_exposes_weekday() {
        let mut screen = loaded(daily());
        screen.handle_key_event(key(KeyCode::Down)).unwrap();
        screen.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        assert!(screen.is_weekly());
        assert!(screen.dirty);

        screen.handle_key_event(key(KeyCode::Down)).unwrap();
        assert_eq!(screen.field(), Field::Weekday);
        screen.handle_key_event(key(KeyCode::Right)).unwrap();

        let Some(Action::SaveSettings(sent)) =
            screen.handle_key_event(key(KeyCode::Char('s'))).unwrap()
        else {
            panic!("expected a save");
        };
        let update = &sent.scheduled_tasks.subscription_update;
        assert_eq!(update.schedule, UpdateSchedule::Weekly);
        assert_eq!(update.weekday, Some(1));
    }

    #[test]
    fn daily_schedule_skips_weekday_row() {
        let mut screen = loaded(daily());
        screen.handle_key_event(key(KeyCode::Down)).unwrap();
        screen.handle_key_event(key(KeyCode::Down)).unwrap();
        assert_eq!(screen.field(), Field::Time);
    }

    #[test]
    fn unsaved_edits_survive_background_refresh() {
        let mut screen = loaded(daily());
        screen.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        assert!(!screen.draft.scheduled_tasks.enabled);

        screen
            .update(&Action::SettingsUpdated(Arc::new(Some(daily()))))
            .unwrap();
        assert!(!screen.draft.scheduled_tasks.enabled);
    }

    #[test]
    fn bad_interval_is_reported_not_sent() {
        let mut screen = loaded(daily());
        screen.interval = Input::new("often".into());
        let action = screen.handle_key_event(key(KeyCode::Char('s'))).unwrap();
        assert!(matches!(action, Some(Action::Notify(_))));
    }
}
