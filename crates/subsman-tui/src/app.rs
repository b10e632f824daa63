//! Application core: event loop, routing, action dispatch and the chrome
//! drawn around the active screen.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tui_input::Input;

use subsman_config::Defaults;
use subsman_core::{CoreError, Dashboard, Navigation, Router, View};

use crate::action::{Action, ConfirmAction, Notification, NotificationLevel};
use crate::component::Component;
use crate::data_bridge::{StoreFeeds, spawn_data_bridge};
use crate::event::{Event, EventReader, Rates};
use crate::screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::text_field;

/// How long a notification toast stays up.
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    dashboard: Dashboard,
    /// Route table state plus the screens it has built.
    router: Router<Box<dyn Component>>,
    running: bool,
    /// Mirror of the store's loading flag.
    loading: bool,
    help_visible: bool,
    /// Open `:` prompt for typing a path.
    path_prompt: Option<Input>,
    /// Pending confirmation dialog (blocks other input while active).
    pending_confirm: Option<ConfirmAction>,
    notification: Option<(Notification, Instant)>,
    /// Window title set by the last navigation, applied on the next frame.
    pending_title: Option<String>,
    last_refresh: Option<DateTime<Local>>,
    refresh_interval: Option<Duration>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Cancellation token for the data bridge task.
    data_cancel: CancellationToken,
}

impl App {
    /// Create the app. Screens are built lazily on first visit.
    pub fn new(dashboard: Dashboard, defaults: Defaults, refresh_interval: Option<Duration>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let store = Arc::clone(dashboard.store());
        let router = Router::new(move |route| screens::create(route.view, &store, &defaults));

        Self {
            dashboard,
            router,
            running: true,
            loading: false,
            help_visible: false,
            path_prompt: None,
            pending_confirm: None,
            notification: None,
            pending_title: None,
            last_refresh: None,
            refresh_interval,
            action_tx,
            action_rx,
            data_cancel: CancellationToken::new(),
        }
    }

    /// Run the main event loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        // Subscribe before the first screen can trigger a fetch
        let feeds = StoreFeeds::subscribe(self.dashboard.store());
        self.navigate("/")?;

        tokio::spawn(spawn_data_bridge(
            feeds,
            self.action_tx.clone(),
            self.data_cancel.clone(),
        ));

        let mut events = EventReader::new(Rates {
            tick: Duration::from_millis(250),
            render: Duration::from_millis(33),
            refresh: self.refresh_interval,
        });

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
                Event::Refresh => {
                    if self.active_view() == Some(View::Status) {
                        self.action_tx.send(Action::RefreshStatus)?;
                    }
                }
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    if let Some(title) = self.pending_title.take() {
                        tui.set_title(&title)?;
                    }
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    fn active_view(&self) -> Option<View> {
        self.router.current().map(|route| route.view)
    }

    // ── Navigation ───────────────────────────────────────────────────

    fn navigate(&mut self, path: &str) -> Result<()> {
        let nav = self.router.navigate(path);
        self.arrive(nav)
    }

    fn go_back(&mut self) -> Result<()> {
        match self.router.back() {
            Some(nav) => self.arrive(nav),
            None => Ok(()),
        }
    }

    /// Finish a navigation: initialise a freshly built screen and queue the title.
    fn arrive(&mut self, nav: Navigation) -> Result<()> {
        debug!(path = %nav.path, route = ?nav.route.name, created = nav.created, "navigated");
        if nav.created {
            if let Some(view) = self.router.view_mut() {
                view.init(self.action_tx.clone())?;
            }
        }
        self.pending_title = Some(nav.title);
        Ok(())
    }

    /// Path of the navigable view `offset` steps from the active one.
    fn cycle_path(&self, offset: isize) -> String {
        let views: Vec<View> = View::navigable().collect();
        let current = self
            .active_view()
            .and_then(|v| views.iter().position(|&x| x == v));
        let next = match current {
            Some(i) => i.checked_add_signed(offset).unwrap_or(views.len() - 1) % views.len(),
            None => 0,
        };
        views.get(next).map_or("/", |v| v.route().path).to_owned()
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Map a key event to an action. Overlays and text fields get the key
    /// first, then global keys, then the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if let Some(input) = self.path_prompt.as_mut() {
            return Ok(match key.code {
                KeyCode::Enter => {
                    let typed = input.value().trim();
                    let path = if typed.starts_with('/') {
                        typed.to_owned()
                    } else {
                        format!("/{typed}")
                    };
                    self.path_prompt = None;
                    Some(Action::Navigate(path))
                }
                KeyCode::Esc => Some(Action::ClosePathPrompt),
                _ => {
                    text_field::handle_key(input, key);
                    None
                }
            });
        }

        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        if self.router.view().is_some_and(|v| v.captures_input()) {
            return self.delegate_key(key);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (_, KeyCode::Char(':')) => return Ok(Some(Action::OpenPathPrompt)),

            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let index = usize::from(c as u8 - b'1');
                if let Some(view) = View::navigable().nth(index) {
                    return Ok(Some(Action::Navigate(view.route().path.to_owned())));
                }
            }

            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::Navigate(self.cycle_path(1))));
            }
            (_, KeyCode::BackTab) => {
                return Ok(Some(Action::Navigate(self.cycle_path(-1))));
            }

            (KeyModifiers::NONE, KeyCode::Esc) => return Ok(Some(Action::GoBack)),

            _ => {}
        }

        self.delegate_key(key)
    }

    fn delegate_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.router.view_mut() {
            Some(view) => view.handle_key_event(key),
            None => Ok(None),
        }
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// Process a single action: update app state, run backend requests and
    /// propagate to screens.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Resize(..) | Action::Render => {}

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() > NOTIFICATION_TTL)
                {
                    self.notification = None;
                }
                self.update_active(action)?;
            }

            // ── Navigation ──
            Action::Navigate(path) => self.navigate(path)?,
            Action::GoBack => self.go_back()?,
            Action::OpenPathPrompt => self.path_prompt = Some(Input::default()),
            Action::ClosePathPrompt => self.path_prompt = None,
            Action::ToggleHelp => self.help_visible = !self.help_visible,

            // ── Store updates go to every live screen ──
            Action::LoadingChanged(loading) => {
                self.loading = *loading;
                self.broadcast(action)?;
            }
            Action::StatusUpdated(_) => {
                self.last_refresh = Some(Local::now());
                self.broadcast(action)?;
            }
            Action::SubscriptionsUpdated(_)
            | Action::NodesUpdated(_)
            | Action::SettingsUpdated(_)
            | Action::LogsUpdated(_)
            | Action::NodesFiltered(_)
            | Action::SubscriptionGenerated(_)
            | Action::LogPageLoaded { .. } => self.broadcast(action)?,

            // ── Requests ──
            Action::RefreshStatus => self.request("Status refresh", |d| async move {
                d.fetch_system_status().await?;
                Ok(vec![])
            }),
            Action::FetchSubscriptions => self.request("Loading subscriptions", |d| async move {
                d.fetch_subscriptions().await?;
                Ok(vec![])
            }),
            Action::ImportSubscription { name, url } => {
                let (name, url) = (name.clone(), url.clone());
                self.request("Import", |d| async move {
                    d.import_subscription(&name, &url).await?;
                    Ok(vec![Action::Notify(Notification::success(format!(
                        "Imported {name}"
                    )))])
                });
            }
            Action::MergeSubscriptions(ids) => {
                let ids = ids.clone();
                self.request("Merge", |d| async move {
                    d.merge_subscriptions(&ids).await?;
                    Ok(vec![Action::Notify(Notification::success(format!(
                        "Merged {} subscription(s)",
                        ids.len()
                    )))])
                });
            }
            Action::RequestDeleteSubscriptions(ids) => {
                self.action_tx.send(Action::ShowConfirm(
                    ConfirmAction::DeleteSubscriptions(ids.clone()),
                ))?;
            }
            Action::FetchNodes => self.request("Loading nodes", |d| async move {
                d.fetch_nodes().await?;
                Ok(vec![])
            }),
            Action::ImportNodes => self.request("Node import", |d| async move {
                d.import_nodes().await?;
                Ok(vec![Action::Notify(Notification::success("Nodes imported"))])
            }),
            Action::TestNodes => {
                if self.loading {
                    self.action_tx.send(Action::Notify(Notification::info(
                        "A node test is already running",
                    )))?;
                } else {
                    // Raised locally so a second press lands before the store echoes it
                    self.loading = true;
                    self.request("Node test", |d| async move {
                        d.test_nodes().await?;
                        Ok(vec![Action::Notify(Notification::success("Node test finished"))])
                    });
                }
            }
            Action::FilterNodes {
                max_delay,
                min_speed,
            } => {
                let (max_delay, min_speed) = (*max_delay, *min_speed);
                self.request("Filter", move |d| async move {
                    let filtered = d.filter_nodes(max_delay, min_speed).await?;
                    let message = format!("{} node(s) passed", filtered.total_nodes);
                    Ok(vec![
                        Action::NodesFiltered(filtered),
                        Action::Notify(Notification::success(message)),
                    ])
                });
            }
            Action::GenerateSubscription => self.request("Generate", |d| async move {
                let generated = d.generate_subscription().await?;
                Ok(vec![
                    Action::SubscriptionGenerated(generated),
                    Action::Notify(Notification::success("Subscription generated")),
                ])
            }),
            Action::FetchSettings => self.request("Loading settings", |d| async move {
                d.fetch_settings().await?;
                Ok(vec![])
            }),
            Action::SaveSettings(settings) => {
                let settings = settings.as_ref().clone();
                self.request("Saving settings", |d| async move {
                    d.update_settings(settings).await?;
                    Ok(vec![Action::Notify(Notification::success("Settings saved"))])
                });
            }
            Action::FetchLogs { page, page_size } => {
                let (page, page_size) = (*page, *page_size);
                self.request("Loading logs", move |d| async move {
                    let loaded = d.fetch_logs(page, page_size).await?;
                    Ok(vec![Action::LogPageLoaded {
                        page,
                        total: loaded.total,
                    }])
                });
            }
            Action::RequestClearLogs => {
                self.action_tx
                    .send(Action::ShowConfirm(ConfirmAction::ClearLogs))?;
            }

            // ── Confirmation ──
            Action::ShowConfirm(confirm) => self.pending_confirm = Some(confirm.clone()),
            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.execute_confirm(confirm);
                }
            }
            Action::ConfirmNo => self.pending_confirm = None,

            Action::Notify(n) => self.notification = Some((n.clone(), Instant::now())),
        }

        Ok(())
    }

    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for view in self.router.views_mut() {
            if let Some(follow_up) = view.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    fn update_active(&mut self, action: &Action) -> Result<()> {
        if let Some(view) = self.router.view_mut() {
            if let Some(follow_up) = view.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    /// Run a dashboard call in the background. Its follow-up actions go back
    /// through the action channel; a failure becomes an error toast.
    fn request<F, Fut>(&self, label: &'static str, call: F)
    where
        F: FnOnce(Dashboard) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<Action>, CoreError>> + Send + 'static,
    {
        let dashboard = self.dashboard.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let actions = match call(dashboard).await {
                Ok(actions) => actions,
                Err(e) => vec![Action::Notify(Notification::error(format!(
                    "{label} failed: {e}"
                )))],
            };
            for action in actions {
                if tx.send(action).is_err() {
                    break;
                }
            }
        });
    }

    fn execute_confirm(&self, confirm: ConfirmAction) {
        match confirm {
            ConfirmAction::DeleteSubscriptions(ids) => self.request("Delete", |d| async move {
                d.delete_subscriptions(&ids).await?;
                Ok(vec![Action::Notify(Notification::success(format!(
                    "Deleted {} subscription(s)",
                    ids.len()
                )))])
            }),
            ConfirmAction::ClearLogs => self.request("Clearing logs", |d| async move {
                d.clear_logs().await?;
                Ok(vec![
                    Action::LogPageLoaded { page: 1, total: 0 },
                    Action::Notify(Notification::success("Logs cleared")),
                ])
            }),
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let [content_area, tab_area, status_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        if let Some(view) = self.router.view() {
            view.render(frame, content_area);
        }

        self.render_tab_bar(frame, tab_area);
        self.render_status_bar(frame, status_area);

        // Overlays, last is topmost
        if let Some((notif, _)) = &self.notification {
            Self::render_notification(frame, area, notif);
        }
        if let Some(confirm) = &self.pending_confirm {
            Self::render_confirm_dialog(frame, area, confirm);
        }
        if self.help_visible {
            self.render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let active = self.active_view();
        let titles: Vec<Line> = View::navigable()
            .enumerate()
            .map(|(i, view)| {
                let style = if Some(view) == active {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(format!(" {} {} ", i + 1, view.route()), style))
            })
            .collect();

        // Styles are applied per title; not-found leaves every tab inactive
        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .highlight_style(Style::default());

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if let Some(input) = &self.path_prompt {
            let width = usize::from(area.width.saturating_sub(3));
            let scroll = input.visual_scroll(width);
            let line = Line::from(vec![
                Span::styled(" : ", Style::default().fg(theme::ACCENT)),
                Span::styled(
                    input.value().chars().skip(scroll).collect::<String>(),
                    Style::default().fg(theme::NEON_CYAN),
                ),
                Span::styled("  Enter go  Esc cancel", theme::key_hint()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            let cursor = input.visual_cursor().saturating_sub(scroll);
            let offset = u16::try_from(cursor).unwrap_or(u16::MAX);
            frame.set_cursor_position((area.x.saturating_add(3).saturating_add(offset), area.y));
            return;
        }

        let path = self.router.current_path().unwrap_or("/");
        let loading = if self.loading {
            Span::styled("◐ testing", Style::default().fg(theme::WARN_YELLOW))
        } else {
            Span::styled("● idle", Style::default().fg(theme::SUCCESS_GREEN))
        };
        let refreshed = self.last_refresh.map_or_else(
            || "never refreshed".to_owned(),
            |t| format!("refreshed {}", t.format("%H:%M:%S")),
        );
        let hints = self.router.view().map_or("", |v| v.key_hints());

        let line = Line::from(vec![
            Span::styled(format!(" {path} "), Style::default().fg(theme::ACCENT)),
            loading,
            Span::styled(format!(" │ {refreshed}"), theme::key_hint()),
            Span::styled(format!(" │ {hints}"), theme::key_hint()),
            Span::styled(" │ ? help  : path  q quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    /// Render the help overlay centered on screen.
    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let width = 60u16.min(area.width.saturating_sub(4));
        let height = 18u16.min(area.height.saturating_sub(4));
        let help_area = centered(area, width, height);

        frame.render_widget(Clear, help_area);
        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let key = |k: &'static str, desc: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {k:<12}"), theme::key_hint_key()),
                Span::styled(desc, theme::key_hint()),
            ])
        };
        let section = |name: &'static str| {
            Line::from(Span::styled(
                format!("  {name}"),
                Style::default().fg(theme::NEON_CYAN),
            ))
        };

        let mut lines = vec![
            section("Navigation"),
            key("1-6", "Jump to a page"),
            key("Tab/S-Tab", "Next / previous page"),
            key(":", "Open a path"),
            key("Esc", "Back to the previous page"),
            Line::from(""),
            section("Global"),
            key("?", "This help"),
            key("q / Ctrl+c", "Quit"),
            Line::from(""),
            section("This page"),
        ];
        let hints = self.router.view().map_or("", |v| v.key_hints());
        lines.push(Line::from(Span::styled(format!("  {hints}"), theme::key_hint())));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "                     Esc or ? to close",
            theme::key_hint(),
        )));

        frame.render_widget(Paragraph::new(lines), inner);
    }

    /// Render a centered confirmation dialog.
    fn render_confirm_dialog(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
        let width = 50u16.min(area.width.saturating_sub(4));
        let dialog_area = centered(area, width, 5);

        frame.render_widget(Clear, dialog_area);
        let block = Block::default()
            .title(" Confirm ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::WARN_YELLOW))
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let text = vec![
            Line::from(Span::styled(
                format!("  {confirm}"),
                Style::default().fg(theme::DIM_WHITE),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  y ", theme::key_hint_key()),
                Span::styled("confirm    ", theme::key_hint()),
                Span::styled("n ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }

    /// Render a notification toast in the bottom-right corner.
    fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
        let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
        let width = msg_len
            .saturating_add(6)
            .clamp(20, 60)
            .min(area.width.saturating_sub(2));
        let height = 3u16;

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2); // above the status bar
        let toast_area = Rect::new(area.x + x, area.y + y, width, height);

        let (border_color, icon) = match notif.level {
            NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
            NotificationLevel::Error => (theme::ERROR_RED, "✗"),
            NotificationLevel::Info => (theme::NEON_CYAN, "·"),
        };

        frame.render_widget(Clear, toast_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
            Span::styled(notif.message.as_str(), Style::default().fg(theme::DIM_WHITE)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}

/// A `width` x `height` rect centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    Rect::new(area.x + x, area.y + y, width, height.min(area.height))
}
