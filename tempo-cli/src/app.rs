use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use tempo_events::{
    domain::{EventPatch, UserEvent, UserEventId},
    CalendarView, EventGateway, EventStore, Recorder, RecorderError, SortOrder,
};
use time::OffsetDateTime;

use crate::{recorder_store, ui};

/// Store, recorder and settings for one invocation.
pub struct App<G> {
    store: Arc<EventStore<G>>,
    recorder: Recorder<G>,
    sort_order: SortOrder,
    recorder_file: PathBuf,
}

impl<G: EventGateway> App<G> {
    pub fn new(
        gateway: Arc<G>,
        default_title: &str,
        sort_order: SortOrder,
        recorder_file: PathBuf,
    ) -> Self {
        let store = Arc::new(EventStore::new(gateway));
        let recorder = Recorder::new(store.clone()).with_title(default_title);
        Self {
            store,
            recorder,
            sort_order,
            recorder_file,
        }
    }

    #[allow(dead_code)]
    pub fn store(&self) -> &EventStore<G> {
        &self.store
    }

    #[allow(dead_code)]
    pub fn recorder(&self) -> &Recorder<G> {
        &self.recorder
    }

    /// The store keeps the readable message; surface that one.
    fn store_failure(&self, fallback: &str) -> anyhow::Error {
        match self.store.snapshot().error() {
            Some(message) => anyhow!("{}", message),
            None => anyhow!("{}", fallback),
        }
    }

    async fn load(&self) -> Result<()> {
        self.store
            .load()
            .await
            .map_err(|_| self.store_failure("Failed to load events."))
    }

    /// Pick up a recording started by an earlier invocation.
    fn restore_recorder(&self) -> Result<()> {
        if let Some(date_start) = recorder_store::load(&self.recorder_file)? {
            self.recorder.restore(date_start);
        }
        Ok(())
    }

    pub async fn list(&self) -> Result<String> {
        self.load().await?;
        let view = CalendarView::from_state(&self.store.snapshot(), self.sort_order);
        Ok(ui::render_calendar(&view))
    }

    /// Start recording. Returns `None` if a recording is already running.
    pub fn start(&self) -> Result<Option<OffsetDateTime>> {
        self.restore_recorder()?;
        match self.recorder.start() {
            Ok(date_start) => {
                recorder_store::save(&self.recorder_file, date_start)?;
                Ok(Some(date_start))
            }
            Err(RecorderError::AlreadyRunning) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Stop recording. Returns `None` if nothing was running.
    pub async fn stop(&self) -> Result<Option<UserEvent>> {
        self.restore_recorder()?;
        if !self.recorder.is_running() {
            return Ok(None);
        }

        let result = self.recorder.stop().await;
        // The recorder is idle now whether or not the entry was saved.
        recorder_store::clear(&self.recorder_file)?;

        match result {
            Ok(created) => Ok(Some(created)),
            Err(RecorderError::NotRunning) => Ok(None),
            Err(_) => Err(self.store_failure("Failed to create event.")),
        }
    }

    pub fn status(&self) -> Result<String> {
        self.restore_recorder()?;
        Ok(ui::render_status(
            &self.recorder.state(),
            OffsetDateTime::now_utc(),
        ))
    }

    /// Record until Ctrl-C, redrawing the elapsed time every second.
    pub async fn record(&self) -> Result<Option<UserEvent>> {
        self.start()?;

        let ticker = self
            .recorder
            .ticker(std::time::Duration::from_secs(1), |elapsed| {
                use std::io::Write;
                let mut stdout = std::io::stdout();
                let _ = write!(stdout, "{}", ui::render_elapsed(elapsed));
                let _ = stdout.flush();
            });

        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl-C")?;
        ticker.cancel();
        println!();

        self.stop().await
    }

    pub async fn rename(&self, id: UserEventId, title: String) -> Result<UserEvent> {
        self.load().await?;
        self.store
            .edit(id, EventPatch::new().title(title))
            .await
            .map_err(|e| match self.store.get(id) {
                None => anyhow!("No entry with id {}", id),
                Some(_) => self.store_failure(&e.to_string()),
            })
    }

    pub async fn delete(&self, id: UserEventId) -> Result<()> {
        self.load().await?;
        if self.store.get(id).is_none() {
            return Err(anyhow!("No entry with id {}", id));
        }
        self.store
            .delete(id)
            .await
            .map_err(|e| self.store_failure(&e.to_string()))
    }
}
