//! Staff moderation of the noticeboard.

use crate::errors::ClientResult;
use crate::http::{ApiClient, RequestDescriptor};
use crate::models::{
    AdminEventFilter, Event, EventRegistration, EventStatistics, ListResponse, StatusMessage,
};
use tracing::info;
use uuid::Uuid;

const ADMIN_EVENTS_PATH: &str = "api/noticeboard/admin/events/";
const ADMIN_REGISTRATIONS_PATH: &str = "api/noticeboard/admin/registrations/";
const ADMIN_COMMENTS_PATH: &str = "api/noticeboard/admin/comments/";

/// Service layer for the admin noticeboard screens.
///
/// Every endpoint requires a staff account; other users get `Forbidden`.
pub struct AdminNoticeboardService<'a> {
    client: &'a ApiClient,
}

impl<'a> AdminNoticeboardService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// All events, approved or not.
    pub async fn list_events(&self, filter: &AdminEventFilter) -> ClientResult<Vec<Event>> {
        let response: ListResponse<Event> = self
            .client
            .send_json(&RequestDescriptor::get(ADMIN_EVENTS_PATH).query(filter)?)
            .await?;
        Ok(response.into_items())
    }

    pub async fn approve(&self, id: Uuid) -> ClientResult<StatusMessage> {
        let status = self.event_action(id, "approve").await?;
        info!("Approved event {}", id);
        Ok(status)
    }

    pub async fn reject(&self, id: Uuid) -> ClientResult<StatusMessage> {
        let status = self.event_action(id, "reject").await?;
        info!("Rejected event {}", id);
        Ok(status)
    }

    pub async fn statistics(&self, id: Uuid) -> ClientResult<EventStatistics> {
        let path = format!("{}{}/statistics/", ADMIN_EVENTS_PATH, id);
        self.client.send_json(&RequestDescriptor::get(path)).await
    }

    pub async fn registrations(&self) -> ClientResult<Vec<EventRegistration>> {
        let response: ListResponse<EventRegistration> = self
            .client
            .send_json(&RequestDescriptor::get(ADMIN_REGISTRATIONS_PATH))
            .await?;
        Ok(response.into_items())
    }

    pub async fn mark_attended(&self, registration_id: Uuid) -> ClientResult<StatusMessage> {
        let path = format!("{}{}/mark_attended/", ADMIN_REGISTRATIONS_PATH, registration_id);
        self.client.send_json(&RequestDescriptor::post(path)).await
    }

    pub async fn delete_comment(&self, id: Uuid) -> ClientResult<()> {
        let path = format!("{}{}/", ADMIN_COMMENTS_PATH, id);
        self.client.send(&RequestDescriptor::delete(path)).await?;
        info!("Deleted comment {}", id);
        Ok(())
    }

    async fn event_action(&self, id: Uuid, action: &str) -> ClientResult<StatusMessage> {
        let path = format!("{}{}/{}/", ADMIN_EVENTS_PATH, id, action);
        self.client.send_json(&RequestDescriptor::post(path)).await
    }
}
