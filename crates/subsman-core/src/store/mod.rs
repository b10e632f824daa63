// ── Reactive dashboard store ──
//
// Replace-only slices with push-based change notification.

mod dashboard_store;
mod slice;

pub use dashboard_store::DashboardStore;
