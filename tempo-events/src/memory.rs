//! In-process events backend, used for dev mode and tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::{
    domain::{NewUserEvent, UserEvent, UserEventId},
    EventGateway, GatewayError,
};

/// Events backend backed by a `Vec`, assigning increasing ids like the REST
/// backend does.
///
/// Clones share the same data, so a test can keep a handle while the store
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGateway {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    events: Vec<UserEvent>,
    next_id: i64,
    failures: VecDeque<GatewayError>,
    calls: usize,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the backend. Ids keep counting from the highest seeded id.
    pub fn with_events(self, events: Vec<UserEvent>) -> Self {
        {
            let mut inner = self.lock();
            inner.next_id = events
                .iter()
                .map(|e| e.id.as_i64())
                .max()
                .unwrap_or(0)
                .max(inner.next_id);
            inner.events = events;
        }
        self
    }

    /// Make the next call fail with `error`. Queued failures are consumed in
    /// order, one per call.
    pub fn fail_next(&self, error: GatewayError) {
        self.lock().failures.push_back(error);
    }

    /// Snapshot of the backend's data (for test assertions).
    pub fn events(&self) -> Vec<UserEvent> {
        self.lock().events.clone()
    }

    /// Number of calls received, failed ones included.
    pub fn calls(&self) -> usize {
        self.lock().calls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("in-memory gateway lock poisoned")
    }

    fn begin_call(&self) -> Result<std::sync::MutexGuard<'_, Inner>, GatewayError> {
        let mut inner = self.lock();
        inner.calls += 1;
        let failure = inner.failures.pop_front();
        match failure {
            Some(error) => Err(error),
            None => Ok(inner),
        }
    }
}

#[async_trait]
impl EventGateway for InMemoryGateway {
    async fn list_events(&self) -> Result<Vec<UserEvent>, GatewayError> {
        let inner = self.begin_call()?;
        Ok(inner.events.clone())
    }

    async fn create_event(&self, event: &NewUserEvent) -> Result<UserEvent, GatewayError> {
        let mut inner = self.begin_call()?;
        inner.next_id += 1;
        let created = event.clone().with_id(UserEventId::new(inner.next_id));
        inner.events.push(created.clone());
        Ok(created)
    }

    async fn update_event(
        &self,
        id: UserEventId,
        event: &NewUserEvent,
    ) -> Result<UserEvent, GatewayError> {
        let mut inner = self.begin_call()?;
        let Some(stored) = inner.events.iter_mut().find(|e| e.id == id) else {
            return Err(GatewayError::Server { status: 404 });
        };
        *stored = event.clone().with_id(id);
        Ok(stored.clone())
    }

    async fn delete_event(&self, id: UserEventId) -> Result<(), GatewayError> {
        let mut inner = self.begin_call()?;
        let before = inner.events.len();
        inner.events.retain(|e| e.id != id);
        if inner.events.len() == before {
            return Err(GatewayError::Server { status: 404 });
        }
        Ok(())
    }
}
