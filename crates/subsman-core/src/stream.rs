// ── Reactive slice streams ──
//
// Subscription types for consuming store changes.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// A subscription to one slice of dashboard state.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via the `changed()` method or by converting to a `Stream`.
pub struct SliceStream<T: Send + Sync + 'static> {
    current: Arc<T>,
    receiver: watch::Receiver<Arc<T>>,
}

impl<T: Send + Sync + 'static> SliceStream<T> {
    pub(crate) fn new(receiver: watch::Receiver<Arc<T>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Get the snapshot captured at creation time (or at the last `changed()`).
    pub fn current(&self) -> &Arc<T> {
        &self.current
    }

    /// Get the latest snapshot (may have changed since creation).
    pub fn latest(&self) -> Arc<T> {
        self.receiver.borrow().clone()
    }

    /// Whether the slice was written since this stream last observed it.
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` if the store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<T>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> SliceWatchStream<T> {
        SliceWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields the current snapshot first, then a new one each time the slice
/// is replaced.
pub struct SliceWatchStream<T: Send + Sync + 'static> {
    inner: WatchStream<Arc<T>>,
}

impl<T: Send + Sync + 'static> Stream for SliceWatchStream<T> {
    type Item = Arc<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;

    #[tokio::test]
    async fn stream_yields_current_then_replacements() {
        let (tx, rx) = watch::channel(Arc::new(1_u32));
        let mut stream = SliceStream::new(rx).into_stream();

        assert_eq!(stream.next().await.as_deref(), Some(&1));
        tx.send_replace(Arc::new(2));
        assert_eq!(stream.next().await.as_deref(), Some(&2));

        drop(tx);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn changed_updates_current() {
        let (tx, rx) = watch::channel(Arc::new("a"));
        let mut slice = SliceStream::new(rx);
        tx.send_replace(Arc::new("b"));

        assert_eq!(slice.changed().await.as_deref(), Some(&"b"));
        assert_eq!(**slice.current(), "b");
    }
}
