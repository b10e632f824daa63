// subsman-core: Reactive dashboard layer between subsman-api and consumers (CLI/TUI).

pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod route;
pub mod settings;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, DEFAULT_BACKEND_URL};
pub use dashboard::Dashboard;
pub use error::CoreError;
pub use route::{Navigation, Route, RouteName, Router, View};
pub use store::DashboardStore;
pub use stream::SliceStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    CurrentStatus, FilteredNodes, GeneratedSubscription, HistoryEntry, Log, LogPage, Node,
    NodeCheck, NodeStats, ScheduledTasks, Subscription, SubscriptionUpdate, SystemSettings,
    SystemStatus, TimeOfDay, UpdateSchedule,
};
