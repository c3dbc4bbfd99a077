//! Events noticeboard service.

use crate::errors::{ClientError, ClientResult};
use crate::http::{ApiClient, FormData, RequestDescriptor, Upload};
use crate::models::{Event, EventComment, EventFilter, EventRegistration, ListResponse, NewEvent};
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

const EVENTS_PATH: &str = "api/noticeboard/events/";

/// Service layer for the public side of the noticeboard.
pub struct NoticeboardService<'a> {
    client: &'a ApiClient,
}

impl<'a> NoticeboardService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_events(&self, filter: &EventFilter) -> ClientResult<Vec<Event>> {
        let response: ListResponse<Event> = self
            .client
            .send_json(&RequestDescriptor::get(EVENTS_PATH).query(filter)?)
            .await?;
        Ok(response.into_items())
    }

    pub async fn get_event(&self, id: Uuid) -> ClientResult<Event> {
        self.client.send_json(&RequestDescriptor::get(event_path(id))).await
    }

    /// Creates an event. Staff-created events are approved by the backend.
    pub async fn create_event(
        &self,
        event: NewEvent,
        image: Option<Upload>,
    ) -> ClientResult<Event> {
        event.validate()?;

        let mut form = FormData::from_fields(&event)?;
        if let Some(image) = image {
            form = form.file("image", image);
        }

        let created: Event = self
            .client
            .send_json(&RequestDescriptor::post(EVENTS_PATH).form(form))
            .await?;
        info!("Created event {}", created.id);
        Ok(created)
    }

    /// Replaces every field of the event.
    pub async fn update_event(&self, id: Uuid, event: NewEvent) -> ClientResult<Event> {
        event.validate()?;
        self.client
            .send_json(&RequestDescriptor::put(event_path(id)).json(&event)?)
            .await
    }

    pub async fn delete_event(&self, id: Uuid) -> ClientResult<()> {
        self.client.send(&RequestDescriptor::delete(event_path(id))).await?;
        info!("Deleted event {}", id);
        Ok(())
    }

    /// Registers the current user. Registering twice returns the existing
    /// registration.
    pub async fn register(&self, id: Uuid) -> ClientResult<EventRegistration> {
        let path = format!("{}register/", event_path(id));
        self.client.send_json(&RequestDescriptor::post(path)).await
    }

    pub async fn comments(&self, id: Uuid) -> ClientResult<Vec<EventComment>> {
        let path = format!("{}comments/", event_path(id));
        let response: ListResponse<EventComment> =
            self.client.send_json(&RequestDescriptor::get(path)).await?;
        Ok(response.into_items())
    }

    pub async fn add_comment(&self, id: Uuid, content: &str) -> ClientResult<EventComment> {
        if content.trim().is_empty() {
            return Err(ClientError::invalid_input("Content: Comment cannot be empty"));
        }

        let path = format!("{}comments/", event_path(id));
        self.client
            .send_json(&RequestDescriptor::post(path).json(&json!({ "content": content }))?)
            .await
    }
}

fn event_path(id: Uuid) -> String {
    format!("{}{}/", EVENTS_PATH, id)
}
