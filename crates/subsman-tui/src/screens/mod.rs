//! Screen implementations. Each screen is a top-level Component built
//! lazily by the router.

pub mod logs;
pub mod node_select;
pub mod node_test;
pub mod not_found;
pub mod settings;
pub mod status;
pub mod subscriptions;

use subsman_config::Defaults;
use subsman_core::{DashboardStore, View};

use crate::component::Component;

/// Build the screen for `view`, seeded from the store's current snapshots.
pub fn create(view: View, store: &DashboardStore, defaults: &Defaults) -> Box<dyn Component> {
    match view {
        View::Status => Box::new(status::StatusScreen::new(store)),
        View::Subscriptions => Box::new(subscriptions::SubscriptionsScreen::new(store)),
        View::NodeTest => Box::new(node_test::NodeTestScreen::new(store)),
        View::NodeSelect => Box::new(node_select::NodeSelectScreen::new(defaults)),
        View::Settings => Box::new(settings::SettingsScreen::new(store)),
        View::Logs => Box::new(logs::LogsScreen::new(store, defaults.page_size)),
        View::NotFound => Box::new(not_found::NotFoundScreen),
    }
}

/// Move a table selection by `delta`, clamped to `len`.
pub(crate) fn step(selected: Option<usize>, delta: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let current = selected.unwrap_or(0);
    Some(current.saturating_add_signed(delta).min(len - 1))
}
