use async_trait::async_trait;

use crate::{
    domain::{NewUserEvent, UserEvent, UserEventId},
    GatewayError,
};

/// Outbound port for the events backend.
///
/// The store's verbs are the only callers; anything that can list, create,
/// update and delete time entries can back an [`EventStore`](crate::EventStore).
#[async_trait]
pub trait EventGateway: Send + Sync + 'static {
    /// Fetch the full collection, in backend order.
    async fn list_events(&self) -> Result<Vec<UserEvent>, GatewayError>;

    /// Create an entry. The backend assigns the id.
    async fn create_event(&self, event: &NewUserEvent) -> Result<UserEvent, GatewayError>;

    /// Replace title and dates of an existing entry.
    async fn update_event(
        &self,
        id: UserEventId,
        event: &NewUserEvent,
    ) -> Result<UserEvent, GatewayError>;

    async fn delete_event(&self, id: UserEventId) -> Result<(), GatewayError>;
}
