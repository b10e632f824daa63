//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;
use std::sync::Arc;

use subsman_core::{
    FilteredNodes, GeneratedSubscription, Log, Node, Subscription, SystemSettings, SystemStatus,
};

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Destructive operations that need a y/n confirmation first.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmAction {
    DeleteSubscriptions(Vec<String>),
    ClearLogs,
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteSubscriptions(ids) => {
                write!(f, "Delete {} subscription(s)?", ids.len())
            }
            Self::ClearLogs => f.write_str("Delete every log entry?"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ──
    /// Go to a path from the route table (or anywhere, for not-found).
    Navigate(String),
    GoBack,
    OpenPathPrompt,
    ClosePathPrompt,
    ToggleHelp,

    // ── Store updates (data bridge → screens) ──
    StatusUpdated(Arc<Option<SystemStatus>>),
    SubscriptionsUpdated(Arc<Vec<Subscription>>),
    NodesUpdated(Arc<Vec<Node>>),
    SettingsUpdated(Arc<Option<SystemSettings>>),
    LogsUpdated(Arc<Vec<Log>>),
    LoadingChanged(bool),

    // ── Requests (screens → app → dashboard) ──
    RefreshStatus,
    FetchSubscriptions,
    ImportSubscription { name: String, url: String },
    MergeSubscriptions(Vec<String>),
    RequestDeleteSubscriptions(Vec<String>),
    FetchNodes,
    ImportNodes,
    TestNodes,
    FilterNodes { max_delay: u32, min_speed: f64 },
    GenerateSubscription,
    FetchSettings,
    SaveSettings(Box<SystemSettings>),
    FetchLogs { page: u32, page_size: u32 },
    RequestClearLogs,

    // ── Results that don't live in the store ──
    NodesFiltered(FilteredNodes),
    SubscriptionGenerated(GeneratedSubscription),
    LogPageLoaded { page: u32, total: u64 },

    // ── Confirmation dialog ──
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,

    // ── Notifications ──
    Notify(Notification),
}
