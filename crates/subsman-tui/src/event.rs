//! Event system: crossterm event reader running in a background tokio task.
//!
//! Produces key and resize events plus tick/render/refresh events at fixed
//! intervals via `tokio::sync::mpsc`.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Events produced by the terminal event reader.
#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    /// Terminal was resized to (cols, rows).
    Resize(u16, u16),
    /// Animation tick (4 Hz).
    Tick,
    /// Render tick (~30 FPS).
    Render,
    /// Periodic status poll.
    Refresh,
}

/// Interval settings for [`EventReader`].
#[derive(Debug, Clone, Copy)]
pub struct Rates {
    pub tick: Duration,
    pub render: Duration,
    /// `None` disables the periodic refresh.
    pub refresh: Option<Duration>,
}

/// Reads terminal events in a background task and sends them over a channel.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    pub fn new(rates: Rates) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            let mut event_stream = EventStream::new();
            let mut tick_interval = tokio::time::interval(rates.tick);
            let mut render_interval = tokio::time::interval(rates.render);
            // Screens fetch on mount, so the first refresh is one period out.
            // The branch is disabled without a period; the placeholder is never polled.
            let refresh_period = rates.refresh.unwrap_or(Duration::from_secs(3600));
            let mut refresh_interval = tokio::time::interval_at(
                tokio::time::Instant::now() + refresh_period,
                refresh_period,
            );

            tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            render_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            refresh_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                let event = tokio::select! {
                    () = task_cancel.cancelled() => break,

                    _ = tick_interval.tick() => Event::Tick,

                    _ = render_interval.tick() => Event::Render,

                    _ = refresh_interval.tick(), if rates.refresh.is_some() => Event::Refresh,

                    Some(Ok(crossterm_event)) = event_stream.next() => {
                        match crossterm_event {
                            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                                Event::Key(key)
                            }
                            CrosstermEvent::Resize(w, h) => Event::Resize(w, h),
                            _ => continue,
                        }
                    }
                };

                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, cancel }
    }

    /// Receive the next event. Returns `None` if the reader has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
