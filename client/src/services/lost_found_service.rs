//! Lost-and-found service.

use crate::errors::ClientResult;
use crate::http::{ApiClient, FormData, RequestDescriptor, Upload};
use crate::models::{
    ListResponse, LostFoundFilter, LostFoundItem, LostFoundUpdate, NewLostFoundItem,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

const ITEMS_PATH: &str = "api/lostfound/items/";

/// Service layer for lost and found reports.
pub struct LostFoundService<'a> {
    client: &'a ApiClient,
}

impl<'a> LostFoundService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Accepts both the bare array and the paginated list shape.
    pub async fn list_items(&self, filter: &LostFoundFilter) -> ClientResult<Vec<LostFoundItem>> {
        let response: ListResponse<LostFoundItem> = self
            .client
            .send_json(&RequestDescriptor::get(ITEMS_PATH).query(filter)?)
            .await?;
        Ok(response.into_items())
    }

    pub async fn get_item(&self, id: Uuid) -> ClientResult<LostFoundItem> {
        self.client.send_json(&RequestDescriptor::get(item_path(id))).await
    }

    pub async fn create_item(
        &self,
        item: NewLostFoundItem,
        image: Option<Upload>,
    ) -> ClientResult<LostFoundItem> {
        item.validate()?;

        let mut form = FormData::from_fields(&item)?;
        if let Some(image) = image {
            form = form.file("image", image);
        }

        let created: LostFoundItem = self
            .client
            .send_json(&RequestDescriptor::post(ITEMS_PATH).form(form))
            .await?;
        info!("Reported {:?} item {}", created.status, created.id);
        Ok(created)
    }

    /// Partial update. `date_occurred` is pinned to noon UTC of its date.
    pub async fn update_item(
        &self,
        id: Uuid,
        update: LostFoundUpdate,
        image: Option<Upload>,
    ) -> ClientResult<LostFoundItem> {
        let mut form = FormData::from_fields(&update.normalized())?;
        if let Some(image) = image {
            form = form.file("image", image);
        }

        self.client
            .send_json(&RequestDescriptor::patch(item_path(id)).form(form))
            .await
    }

    pub async fn delete_item(&self, id: Uuid) -> ClientResult<()> {
        self.client.send(&RequestDescriptor::delete(item_path(id))).await?;
        info!("Deleted item {}", id);
        Ok(())
    }

    pub async fn claim(&self, id: Uuid) -> ClientResult<LostFoundItem> {
        self.action(id, "claim").await
    }

    pub async fn unclaim(&self, id: Uuid) -> ClientResult<LostFoundItem> {
        self.action(id, "unclaim").await
    }

    pub async fn mark_found(&self, id: Uuid) -> ClientResult<LostFoundItem> {
        self.action(id, "mark_found").await
    }

    async fn action(&self, id: Uuid, action: &str) -> ClientResult<LostFoundItem> {
        let path = format!("{}{}/", item_path(id), action);
        self.client.send_json(&RequestDescriptor::post(path)).await
    }
}

fn item_path(id: Uuid) -> String {
    format!("{}{}/", ITEMS_PATH, id)
}
