// ── Reactive store slice ──
//
// One latest value per slice, published through a `watch` channel.
// Writers replace the whole value; readers get cheap `Arc` snapshots.

use std::sync::Arc;

use tokio::sync::watch;

use crate::stream::SliceStream;

/// A single replace-only slot of store state.
pub(crate) struct Slice<T: Send + Sync + 'static> {
    tx: watch::Sender<Arc<T>>,
}

impl<T: Send + Sync + 'static> Slice<T> {
    pub(crate) fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(Arc::new(initial));
        Self { tx }
    }

    /// Current value. Never blocks writers.
    pub(crate) fn snapshot(&self) -> Arc<T> {
        self.tx.borrow().clone()
    }

    /// Replace the value and wake every subscriber.
    pub(crate) fn replace(&self, value: T) {
        self.tx.send_replace(Arc::new(value));
    }

    pub(crate) fn subscribe(&self) -> SliceStream<T> {
        SliceStream::new(self.tx.subscribe())
    }
}

impl<T: Default + Send + Sync + 'static> Slice<T> {
    /// Reset to the empty value, notifying only if something was there.
    pub(crate) fn clear(&self)
    where
        T: PartialEq,
    {
        self.tx.send_if_modified(|current| {
            if **current == T::default() {
                false
            } else {
                *current = Arc::new(T::default());
                true
            }
        });
    }
}
