//! Roommate listing service.

use crate::errors::ClientResult;
use crate::http::{ApiClient, FormData, RequestDescriptor, Upload};
use crate::models::{ListResponse, NewRoommatePost, RoommateFilter, RoommatePost, RoommateUpdate};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

const POSTS_PATH: &str = "api/roommate/posts/";

pub struct RoommateService<'a> {
    client: &'a ApiClient,
}

impl<'a> RoommateService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_posts(&self, filter: &RoommateFilter) -> ClientResult<Vec<RoommatePost>> {
        let response: ListResponse<RoommatePost> = self
            .client
            .send_json(&RequestDescriptor::get(POSTS_PATH).query(filter)?)
            .await?;
        Ok(response.into_items())
    }

    pub async fn get_post(&self, id: Uuid) -> ClientResult<RoommatePost> {
        self.client.send_json(&RequestDescriptor::get(post_path(id))).await
    }

    /// Publishes a listing; sent as JSON unless images are attached.
    pub async fn create_post(
        &self,
        post: NewRoommatePost,
        images: Vec<Upload>,
    ) -> ClientResult<RoommatePost> {
        post.validate()?;

        let request = with_body(RequestDescriptor::post(POSTS_PATH), &post, images)?;
        let created: RoommatePost = self.client.send_json(&request).await?;
        info!("Published roommate post {}", created.id);
        Ok(created)
    }

    pub async fn update_post(
        &self,
        id: Uuid,
        update: RoommateUpdate,
        images: Vec<Upload>,
    ) -> ClientResult<RoommatePost> {
        let request = with_body(RequestDescriptor::patch(post_path(id)), &update, images)?;
        self.client.send_json(&request).await
    }

    pub async fn delete_post(&self, id: Uuid) -> ClientResult<()> {
        self.client.send(&RequestDescriptor::delete(post_path(id))).await?;
        info!("Deleted roommate post {}", id);
        Ok(())
    }
}

fn post_path(id: Uuid) -> String {
    format!("{}{}/", POSTS_PATH, id)
}

fn with_body<T: Serialize>(
    request: RequestDescriptor,
    fields: &T,
    images: Vec<Upload>,
) -> ClientResult<RequestDescriptor> {
    if images.is_empty() {
        return request.json(fields);
    }

    let form = images
        .into_iter()
        .fold(FormData::from_fields(fields)?, |form, image| form.file("image", image));
    Ok(request.form(form))
}
