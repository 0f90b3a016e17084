use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::{
    domain::{NewUserEvent, UserEvent, UserEventId},
    EventGateway, EventsURL, GatewayError,
};

/// REST adapter for the events backend.
#[derive(Debug, Clone)]
pub struct HttpEventGateway {
    client: reqwest::Client,
    base_url: EventsURL,
}

impl Default for HttpEventGateway {
    fn default() -> Self {
        Self::new(EventsURL::default())
    }
}

impl HttpEventGateway {
    pub fn new(base_url: EventsURL) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: EventsURL) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &EventsURL {
        &self.base_url
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, GatewayError> {
        let resp = request
            .send()
            .await
            .map_err(|e| GatewayError::network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(GatewayError::Server {
                status: resp.status().as_u16(),
            });
        }

        Ok(resp)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        let resp = self.send(request).await?;

        resp.json::<T>().await.map_err(|e| {
            GatewayError::parsing(format!("Failed to parse response as JSON: {}", e))
        })
    }
}

#[async_trait]
impl EventGateway for HttpEventGateway {
    #[tracing::instrument(skip(self))]
    async fn list_events(&self) -> Result<Vec<UserEvent>, GatewayError> {
        let url = self.base_url.events();
        self.fetch(self.client.get(url.as_ref())).await
    }

    #[tracing::instrument(skip(self))]
    async fn create_event(&self, event: &NewUserEvent) -> Result<UserEvent, GatewayError> {
        let url = self.base_url.events();
        self.fetch(self.client.post(url.as_ref()).json(event)).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_event(
        &self,
        id: UserEventId,
        event: &NewUserEvent,
    ) -> Result<UserEvent, GatewayError> {
        let url = self.base_url.event(id);
        self.fetch(self.client.put(url.as_ref()).json(event)).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_event(&self, id: UserEventId) -> Result<(), GatewayError> {
        let url = self.base_url.event(id);
        let resp = self.send(self.client.delete(url.as_ref())).await?;
        // Body is ignored; a 2xx status is the whole answer.
        if let Err(e) = resp.bytes().await {
            tracing::debug!(error = %e, "failed to read delete response body");
        }
        Ok(())
    }
}
