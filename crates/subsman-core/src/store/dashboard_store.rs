// ── Central dashboard store ──
//
// Latest copy of every backend slice the dashboard shows. Mutations are
// broadcast to subscribers via `watch` channels; the only writer is
// `Dashboard`.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::watch;

use super::slice::Slice;
use crate::model::{Log, Node, Subscription, SystemSettings, SystemStatus};
use crate::stream::SliceStream;

/// Shared reactive state for one dashboard session.
///
/// Every slice starts empty (`None` / empty list) and is only ever
/// replaced wholesale, so a failed fetch never leaves it half-written.
pub struct DashboardStore {
    pub(crate) system_status: Slice<Option<SystemStatus>>,
    pub(crate) subscriptions: Slice<Vec<Subscription>>,
    pub(crate) nodes: Slice<Vec<Node>>,
    pub(crate) settings: Slice<Option<SystemSettings>>,
    pub(crate) logs: Slice<Vec<Log>>,
    pub(crate) loading: watch::Sender<bool>,
    /// Calls currently holding a [`LoadingGuard`]. Only touched while the
    /// `loading` channel is locked.
    in_flight: AtomicUsize,
}

impl DashboardStore {
    pub fn new() -> Self {
        let (loading, _) = watch::channel(false);

        Self {
            system_status: Slice::new(None),
            subscriptions: Slice::new(Vec::new()),
            nodes: Slice::new(Vec::new()),
            settings: Slice::new(None),
            logs: Slice::new(Vec::new()),
            loading,
            in_flight: AtomicUsize::new(0),
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn system_status_snapshot(&self) -> Arc<Option<SystemStatus>> {
        self.system_status.snapshot()
    }

    pub fn subscriptions_snapshot(&self) -> Arc<Vec<Subscription>> {
        self.subscriptions.snapshot()
    }

    pub fn nodes_snapshot(&self) -> Arc<Vec<Node>> {
        self.nodes.snapshot()
    }

    pub fn settings_snapshot(&self) -> Arc<Option<SystemSettings>> {
        self.settings.snapshot()
    }

    pub fn logs_snapshot(&self) -> Arc<Vec<Log>> {
        self.logs.snapshot()
    }

    /// `true` while a node test is running.
    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_system_status(&self) -> SliceStream<Option<SystemStatus>> {
        self.system_status.subscribe()
    }

    pub fn subscribe_subscriptions(&self) -> SliceStream<Vec<Subscription>> {
        self.subscriptions.subscribe()
    }

    pub fn subscribe_nodes(&self) -> SliceStream<Vec<Node>> {
        self.nodes.subscribe()
    }

    pub fn subscribe_settings(&self) -> SliceStream<Option<SystemSettings>> {
        self.settings.subscribe()
    }

    pub fn subscribe_logs(&self) -> SliceStream<Vec<Log>> {
        self.logs.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub(crate) fn set_system_status(&self, status: SystemStatus) {
        self.system_status.replace(Some(status));
    }

    pub(crate) fn set_subscriptions(&self, subscriptions: Vec<Subscription>) {
        self.subscriptions.replace(subscriptions);
    }

    pub(crate) fn set_nodes(&self, nodes: Vec<Node>) {
        self.nodes.replace(nodes);
    }

    pub(crate) fn set_settings(&self, settings: SystemSettings) {
        self.settings.replace(Some(settings));
    }

    pub(crate) fn set_logs(&self, logs: Vec<Log>) {
        self.logs.replace(logs);
    }

    pub(crate) fn clear_logs(&self) {
        self.logs.clear();
    }

    /// Raise `loading` until the returned guard is dropped.
    ///
    /// Guards nest: the flag drops back only when the last one goes.
    pub(crate) fn begin_loading(&self) -> LoadingGuard<'_> {
        self.loading.send_if_modified(|loading| {
            self.in_flight.fetch_add(1, Ordering::Relaxed);
            !std::mem::replace(loading, true)
        });
        LoadingGuard { store: self }
    }
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Resets `loading` on drop, including when the owning future is cancelled.
pub(crate) struct LoadingGuard<'a> {
    store: &'a DashboardStore,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let store = self.store;
        store.loading.send_if_modified(|loading| {
            let remaining = store.in_flight.fetch_sub(1, Ordering::Relaxed) - 1;
            remaining == 0 && std::mem::replace(loading, false)
        });
    }
}
