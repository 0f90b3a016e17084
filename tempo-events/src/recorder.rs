use std::sync::Arc;

use time::{Duration, OffsetDateTime};
use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};

use crate::{
    domain::{NewUserEvent, UserEvent},
    EventGateway, EventStore, RecorderError,
};

/// Title given to entries created by stopping the recorder.
pub const DEFAULT_TITLE: &str = "No title";

/// The single active timer: idle, or running since `date_start`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecorderState {
    date_start: Option<OffsetDateTime>,
}

impl RecorderState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn running_since(date_start: OffsetDateTime) -> Self {
        Self {
            date_start: Some(date_start),
        }
    }

    pub fn date_start(&self) -> Option<OffsetDateTime> {
        self.date_start
    }

    pub fn is_running(&self) -> bool {
        self.date_start.is_some()
    }

    /// Time since the recorder started, zero when idle or if `now` is earlier.
    pub fn elapsed_at(&self, now: OffsetDateTime) -> Duration {
        match self.date_start {
            Some(start) if now > start => now - start,
            _ => Duration::ZERO,
        }
    }
}

/// `HH:MM:SS`, zero padded. Hours keep counting past a day.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.whole_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Start/stop timer. Stopping records the interval as a new entry through the
/// event store.
pub struct Recorder<G> {
    store: Arc<EventStore<G>>,
    title: String,
    state: watch::Sender<RecorderState>,
}

impl<G: EventGateway> Recorder<G> {
    pub fn new(store: Arc<EventStore<G>>) -> Self {
        let (state, _) = watch::channel(RecorderState::idle());
        Self {
            store,
            title: DEFAULT_TITLE.to_string(),
            state,
        }
    }

    /// Use `title` for entries created on stop.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn store(&self) -> &Arc<EventStore<G>> {
        &self.store
    }

    pub fn state(&self) -> RecorderState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<RecorderState> {
        self.state.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.state().is_running()
    }

    pub fn elapsed(&self) -> Duration {
        self.state().elapsed_at(OffsetDateTime::now_utc())
    }

    pub fn start(&self) -> Result<OffsetDateTime, RecorderError> {
        self.start_at(OffsetDateTime::now_utc())
    }

    /// Start recording from `now`. Does nothing if already running.
    pub fn start_at(&self, now: OffsetDateTime) -> Result<OffsetDateTime, RecorderError> {
        let mut started = false;
        self.state.send_if_modified(|s| {
            if s.is_running() {
                return false;
            }
            s.date_start = Some(now);
            started = true;
            true
        });

        if !started {
            tracing::debug!("recorder already running");
            return Err(RecorderError::AlreadyRunning);
        }

        tracing::debug!(date_start = %now, "recorder started");
        Ok(now)
    }

    /// Resume a recording that was started elsewhere, e.g. by an earlier
    /// process. Overwrites any current start time.
    pub fn restore(&self, date_start: OffsetDateTime) {
        self.state
            .send_replace(RecorderState::running_since(date_start));
    }

    pub async fn stop(&self) -> Result<UserEvent, RecorderError> {
        self.stop_at(OffsetDateTime::now_utc()).await
    }

    /// Stop recording and create an entry spanning the recorded interval.
    ///
    /// The recorder is idle afterwards whether or not the entry could be
    /// created. Does nothing if idle.
    pub async fn stop_at(&self, now: OffsetDateTime) -> Result<UserEvent, RecorderError> {
        let mut taken = None;
        self.state.send_if_modified(|s| {
            taken = s.date_start.take();
            taken.is_some()
        });

        let Some(date_start) = taken else {
            tracing::debug!("recorder not running");
            return Err(RecorderError::NotRunning);
        };

        tracing::debug!(%date_start, date_end = %now, "recorder stopped");
        let event = NewUserEvent::new(self.title.clone(), date_start, now);
        Ok(self.store.create(event).await?)
    }

    /// Call `on_tick` with the elapsed time every `period` while running.
    pub fn ticker<F>(&self, period: std::time::Duration, on_tick: F) -> Ticker
    where
        F: FnMut(Duration) + Send + 'static,
    {
        Ticker::spawn(period, self.subscribe(), on_tick)
    }
}

/// Periodic elapsed-time callback for a running recorder.
///
/// The task ends by itself when the recorder goes idle, and is aborted when
/// the ticker is dropped or cancelled.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    pub fn spawn<F>(
        period: std::time::Duration,
        state: watch::Receiver<RecorderState>,
        mut on_tick: F,
    ) -> Self
    where
        F: FnMut(Duration) + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let current = *state.borrow();
                if !current.is_running() {
                    break;
                }
                on_tick(current.elapsed_at(OffsetDateTime::now_utc()));
            }
        });

        Self { handle }
    }

    pub fn cancel(self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
