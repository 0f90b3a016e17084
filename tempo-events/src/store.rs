use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    domain::{EventPatch, NewUserEvent, UserEvent, UserEventId},
    EventGateway, StoreError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded,
}

/// Normalized snapshot of the time entries.
///
/// `order` and `by_id` always hold the same set of ids; `order` has no
/// duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventsState {
    by_id: HashMap<UserEventId, UserEvent>,
    order: Vec<UserEventId>,
    loaded: bool,
    loads_in_flight: usize,
    pending: usize,
    error: Option<String>,
}

impl EventsState {
    pub fn by_id(&self) -> &HashMap<UserEventId, UserEvent> {
        &self.by_id
    }

    pub fn order(&self) -> &[UserEventId] {
        &self.order
    }

    pub fn get(&self, id: UserEventId) -> Option<&UserEvent> {
        self.by_id.get(&id)
    }

    /// Entries in store order.
    pub fn events(&self) -> Vec<&UserEvent> {
        self.order.iter().filter_map(|id| self.by_id.get(id)).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn load_state(&self) -> LoadState {
        if self.loads_in_flight > 0 {
            LoadState::Loading
        } else if self.loaded {
            LoadState::Loaded
        } else {
            LoadState::NotLoaded
        }
    }

    /// True once any load has succeeded.
    pub fn has_loaded(&self) -> bool {
        self.loaded
    }

    /// Number of verb calls waiting on the backend.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Message from the most recent failed call, cleared by the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// `order` and `by_id` hold the same ids, each once.
    pub fn check_invariants(&self) -> bool {
        let unique: HashSet<_> = self.order.iter().collect();
        unique.len() == self.order.len()
            && self.order.len() == self.by_id.len()
            && self
                .by_id
                .iter()
                .all(|(id, event)| *id == event.id && unique.contains(id))
    }

    fn replace_all(&mut self, events: Vec<UserEvent>) {
        self.by_id.clear();
        self.order.clear();
        for event in events {
            self.upsert(event);
        }
    }

    /// Insert a new entry at the end, or overwrite the body of an existing id
    /// in place.
    fn upsert(&mut self, event: UserEvent) {
        if self.by_id.insert(event.id, event.clone()).is_none() {
            self.order.push(event.id);
        }
    }

    /// Overwrite an existing entry. Unknown ids are ignored.
    fn replace(&mut self, event: UserEvent) -> bool {
        match self.by_id.get_mut(&event.id) {
            Some(stored) => {
                *stored = event;
                true
            }
            None => false,
        }
    }

    fn remove(&mut self, id: UserEventId) -> Option<UserEvent> {
        let removed = self.by_id.remove(&id)?;
        self.order.retain(|stored| *stored != id);
        Some(removed)
    }

    fn begin_request(&mut self) {
        self.pending += 1;
    }

    fn finish_ok(&mut self) {
        self.pending = self.pending.saturating_sub(1);
        self.error = None;
    }

    fn finish_err(&mut self, message: String) {
        self.pending = self.pending.saturating_sub(1);
        self.error = Some(message);
    }
}

/// State container for time entries.
///
/// Entries change only through [`load`](Self::load), [`create`](Self::create),
/// [`edit`](Self::edit) and [`delete`](Self::delete). Each change is applied in
/// one step after the backend answers, and every subscriber is notified.
pub struct EventStore<G> {
    gateway: Arc<G>,
    state: watch::Sender<EventsState>,
}

impl<G: EventGateway> EventStore<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        let (state, _) = watch::channel(EventsState::default());
        Self { gateway, state }
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    pub fn subscribe(&self) -> watch::Receiver<EventsState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> EventsState {
        self.state.borrow().clone()
    }

    pub fn get(&self, id: UserEventId) -> Option<UserEvent> {
        self.state.borrow().get(id).cloned()
    }

    /// Entries in store order.
    pub fn events(&self) -> Vec<UserEvent> {
        self.state.borrow().events().into_iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }

    /// Replace all entries with the backend's collection, keeping its order.
    pub async fn load(&self) -> Result<(), StoreError> {
        self.state.send_modify(|s| {
            s.begin_request();
            s.loads_in_flight += 1;
        });
        tracing::debug!("loading events");

        match self.gateway.list_events().await {
            Ok(events) => {
                tracing::debug!("loaded {} events", events.len());
                self.state.send_modify(|s| {
                    s.replace_all(events);
                    s.loaded = true;
                    s.loads_in_flight = s.loads_in_flight.saturating_sub(1);
                    s.finish_ok();
                });
                Ok(())
            }
            Err(e) => {
                let message = format!("Failed to load events. {}", e);
                tracing::error!("{}", message);
                self.state.send_modify(|s| {
                    s.loads_in_flight = s.loads_in_flight.saturating_sub(1);
                    s.finish_err(message);
                });
                Err(e.into())
            }
        }
    }

    /// Create an entry and append the backend's copy (with its id).
    pub async fn create(&self, event: NewUserEvent) -> Result<UserEvent, StoreError> {
        self.state.send_modify(EventsState::begin_request);
        tracing::debug!(title = %event.title, "creating event");

        match self.gateway.create_event(&event).await {
            Ok(created) => {
                tracing::debug!(id = %created.id, "created event");
                self.state.send_modify(|s| {
                    s.upsert(created.clone());
                    s.finish_ok();
                });
                Ok(created)
            }
            Err(e) => {
                let message = format!("Failed to create event. {}", e);
                tracing::error!("{}", message);
                self.state.send_modify(|s| s.finish_err(message));
                Err(e.into())
            }
        }
    }

    /// Apply `patch` to a stored entry and send the result to the backend.
    ///
    /// A patch that changes nothing is not sent. The stored entry is replaced
    /// by the backend's answer; `order` is untouched.
    pub async fn edit(&self, id: UserEventId, patch: EventPatch) -> Result<UserEvent, StoreError> {
        let Some(current) = self.get(id) else {
            tracing::warn!(%id, "edit requested for an event that is not in the store");
            return Err(StoreError::UnknownEvent(id));
        };

        if patch.is_noop_for(&current) {
            return Ok(current);
        }

        let body = patch.apply_to(&current);
        self.state.send_modify(EventsState::begin_request);
        tracing::debug!(%id, "editing event");

        match self.gateway.update_event(id, &body).await {
            Ok(updated) => {
                self.state.send_modify(|s| {
                    if !s.replace(updated.clone()) {
                        tracing::debug!(id = %updated.id, "edited event no longer in store");
                    }
                    s.finish_ok();
                });
                Ok(updated)
            }
            Err(e) => {
                let message = format!("Failed to edit event {}. {}", id, e);
                tracing::error!("{}", message);
                self.state.send_modify(|s| s.finish_err(message));
                Err(e.into())
            }
        }
    }

    /// Delete an entry. The store only changes if the backend confirms.
    pub async fn delete(&self, id: UserEventId) -> Result<(), StoreError> {
        self.state.send_modify(EventsState::begin_request);
        tracing::debug!(%id, "deleting event");

        match self.gateway.delete_event(id).await {
            Ok(()) => {
                self.state.send_modify(|s| {
                    s.remove(id);
                    s.finish_ok();
                });
                Ok(())
            }
            Err(e) => {
                let message = format!("Failed to delete event {}. {}", id, e);
                tracing::error!("{}", message);
                self.state.send_modify(|s| s.finish_err(message));
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GatewayError, InMemoryGateway};
    use time::macros::datetime;

    fn event(id: i64, title: &str) -> UserEvent {
        UserEvent {
            id: UserEventId::new(id),
            title: title.to_string(),
            date_start: datetime!(2023-01-01 10:00 UTC),
            date_end: datetime!(2023-01-01 11:00 UTC),
        }
    }

    fn store_with(events: Vec<UserEvent>) -> (EventStore<InMemoryGateway>, InMemoryGateway) {
        let gateway = InMemoryGateway::new().with_events(events);
        (EventStore::new(Arc::new(gateway.clone())), gateway)
    }

    fn ids(store: &EventStore<InMemoryGateway>) -> Vec<i64> {
        store
            .snapshot()
            .order()
            .iter()
            .map(|id| id.as_i64())
            .collect()
    }

    #[tokio::test]
    async fn load_keeps_backend_order() {
        let (store, _) = store_with(vec![event(3, "C"), event(1, "A"), event(2, "B")]);

        store.load().await.unwrap();

        assert_eq!(ids(&store), vec![3, 1, 2]);
        let state = store.snapshot();
        assert!(state.check_invariants());
        assert_eq!(state.load_state(), LoadState::Loaded);
        assert_eq!(state.pending(), 0);
    }

    #[tokio::test]
    async fn load_replaces_previous_entries() {
        let (store, gateway) = store_with(vec![event(1, "A"), event(2, "B")]);
        store.load().await.unwrap();

        gateway.delete_event(UserEventId::new(1)).await.unwrap();
        store.load().await.unwrap();

        assert_eq!(ids(&store), vec![2]);
        assert!(store.get(UserEventId::new(1)).is_none());
        assert!(store.snapshot().check_invariants());
    }

    #[tokio::test]
    async fn load_with_duplicate_ids_stays_consistent() {
        let (store, _) = store_with(vec![event(1, "first"), event(2, "B"), event(1, "second")]);

        store.load().await.unwrap();

        assert_eq!(ids(&store), vec![1, 2]);
        assert_eq!(store.get(UserEventId::new(1)).unwrap().title, "second");
        assert!(store.snapshot().check_invariants());
    }

    #[tokio::test]
    async fn failed_load_keeps_entries_and_records_error() {
        let (store, gateway) = store_with(vec![event(1, "A")]);
        store.load().await.unwrap();

        gateway.fail_next(GatewayError::network("connection refused"));
        let result = store.load().await;

        assert!(matches!(
            result,
            Err(StoreError::Gateway(GatewayError::Network(_)))
        ));
        let state = store.snapshot();
        assert_eq!(ids(&store), vec![1]);
        assert!(state.error().unwrap().starts_with("Failed to load events."));
        assert_eq!(state.load_state(), LoadState::Loaded);
        assert_eq!(state.pending(), 0);
    }

    #[tokio::test]
    async fn failed_first_load_is_not_loaded() {
        let (store, gateway) = store_with(vec![]);
        gateway.fail_next(GatewayError::Server { status: 500 });

        assert!(store.load().await.is_err());

        let state = store.snapshot();
        assert_eq!(state.load_state(), LoadState::NotLoaded);
        assert!(!state.has_loaded());
    }

    #[tokio::test]
    async fn create_appends_server_entry() {
        let (store, _) = store_with(vec![event(1, "A")]);
        store.load().await.unwrap();

        let created = store
            .create(NewUserEvent::new(
                "B",
                datetime!(2023-01-02 08:00 UTC),
                datetime!(2023-01-02 09:00 UTC),
            ))
            .await
            .unwrap();

        assert_eq!(created.id, UserEventId::new(2));
        assert_eq!(ids(&store), vec![1, 2]);
        assert_eq!(store.get(created.id), Some(created));
    }

    #[tokio::test]
    async fn create_then_delete_restores_entries() {
        let (store, _) = store_with(vec![event(1, "A"), event(2, "B")]);
        store.load().await.unwrap();
        let before = store.snapshot();

        let created = store.create(event(0, "C").to_new()).await.unwrap();
        store.delete(created.id).await.unwrap();

        let after = store.snapshot();
        assert_eq!(after.order(), before.order());
        assert_eq!(after.by_id(), before.by_id());
    }

    #[tokio::test]
    async fn failed_create_changes_nothing() {
        let (store, gateway) = store_with(vec![event(1, "A")]);
        store.load().await.unwrap();
        gateway.fail_next(GatewayError::parsing("unexpected end of input"));

        assert!(store.create(event(0, "B").to_new()).await.is_err());

        assert_eq!(ids(&store), vec![1]);
        assert!(store
            .snapshot()
            .error()
            .unwrap()
            .starts_with("Failed to create event."));
    }

    #[tokio::test]
    async fn edit_replaces_entry_in_place() {
        let (store, _) = store_with(vec![event(1, "A"), event(2, "B"), event(3, "C")]);
        store.load().await.unwrap();

        let updated = store
            .edit(UserEventId::new(2), EventPatch::new().title("Renamed"))
            .await
            .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.date_start, datetime!(2023-01-01 10:00 UTC));
        assert_eq!(ids(&store), vec![1, 2, 3]);
        assert_eq!(store.get(UserEventId::new(2)).unwrap().title, "Renamed");
    }

    #[tokio::test]
    async fn edit_of_unknown_id_leaves_store_unchanged() {
        let (store, gateway) = store_with(vec![event(1, "A")]);
        store.load().await.unwrap();
        let before = store.snapshot();
        let calls = gateway.calls();

        let result = store
            .edit(UserEventId::new(9), EventPatch::new().title("X"))
            .await;

        assert_eq!(result, Err(StoreError::UnknownEvent(UserEventId::new(9))));
        assert_eq!(store.snapshot(), before);
        assert_eq!(gateway.calls(), calls);
    }

    #[tokio::test]
    async fn edit_without_changes_is_not_sent() {
        let (store, gateway) = store_with(vec![event(1, "A")]);
        store.load().await.unwrap();
        let calls = gateway.calls();

        let result = store
            .edit(UserEventId::new(1), EventPatch::new().title("A"))
            .await
            .unwrap();

        assert_eq!(result, event(1, "A"));
        assert_eq!(gateway.calls(), calls);
    }

    #[test]
    fn replace_of_unknown_id_is_ignored() {
        let mut state = EventsState::default();
        state.replace_all(vec![event(1, "A")]);
        let before = state.clone();

        assert!(!state.replace(event(2, "B")));
        assert_eq!(state, before);
        assert!(state.check_invariants());
    }

    #[tokio::test]
    async fn failed_edit_keeps_old_entry() {
        let (store, gateway) = store_with(vec![event(1, "A")]);
        store.load().await.unwrap();
        gateway.fail_next(GatewayError::Server { status: 500 });

        assert!(store
            .edit(UserEventId::new(1), EventPatch::new().title("B"))
            .await
            .is_err());

        assert_eq!(store.get(UserEventId::new(1)).unwrap().title, "A");
    }

    #[tokio::test]
    async fn delete_rejected_by_server_keeps_entry() {
        let (store, gateway) = store_with(vec![event(1, "A")]);
        store.load().await.unwrap();
        gateway.fail_next(GatewayError::Server { status: 500 });

        let result = store.delete(UserEventId::new(1)).await;

        assert_eq!(
            result,
            Err(StoreError::Gateway(GatewayError::Server { status: 500 }))
        );
        assert_eq!(ids(&store), vec![1]);
        assert!(store
            .snapshot()
            .error()
            .unwrap()
            .starts_with("Failed to delete event 1."));
    }

    #[tokio::test]
    async fn success_clears_previous_error() {
        let (store, gateway) = store_with(vec![event(1, "A")]);
        gateway.fail_next(GatewayError::network("offline"));
        assert!(store.load().await.is_err());
        assert!(store.snapshot().error().is_some());

        store.load().await.unwrap();

        assert!(store.snapshot().error().is_none());
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let (store, _) = store_with(vec![event(1, "A")]);
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.load().await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
    }

    /// Holds `list_events` until released, so the request phase is observable.
    struct GatedGateway {
        inner: InMemoryGateway,
        release: tokio::sync::Notify,
    }

    #[async_trait::async_trait]
    impl EventGateway for GatedGateway {
        async fn list_events(&self) -> Result<Vec<UserEvent>, GatewayError> {
            self.release.notified().await;
            self.inner.list_events().await
        }

        async fn create_event(&self, event: &NewUserEvent) -> Result<UserEvent, GatewayError> {
            self.inner.create_event(event).await
        }

        async fn update_event(
            &self,
            id: UserEventId,
            event: &NewUserEvent,
        ) -> Result<UserEvent, GatewayError> {
            self.inner.update_event(id, event).await
        }

        async fn delete_event(&self, id: UserEventId) -> Result<(), GatewayError> {
            self.inner.delete_event(id).await
        }
    }

    #[tokio::test]
    async fn load_is_pending_while_in_flight() {
        let gateway = Arc::new(GatedGateway {
            inner: InMemoryGateway::new().with_events(vec![event(1, "A")]),
            release: tokio::sync::Notify::new(),
        });
        let store = Arc::new(EventStore::new(gateway.clone()));

        let task = tokio::spawn({
            let store = store.clone();
            async move { store.load().await }
        });
        tokio::task::yield_now().await;

        let state = store.snapshot();
        assert_eq!(state.load_state(), LoadState::Loading);
        assert_eq!(state.pending(), 1);
        assert!(state.is_empty());

        gateway.release.notify_one();
        task.await.unwrap().unwrap();

        let state = store.snapshot();
        assert_eq!(state.load_state(), LoadState::Loaded);
        assert_eq!(state.pending(), 0);
        assert_eq!(state.len(), 1);
    }
}
