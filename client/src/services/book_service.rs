//! Book bank service.
//!
//! Handles book listings and the requests students make for them.

use crate::errors::ClientResult;
use crate::http::{ApiClient, FormData, RequestDescriptor, Upload};
use crate::models::{
    Book, BookFilter, BookRequest, BookRequestStatus, BookUpdate, ListResponse, NewBook,
    StatusMessage,
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

const BOOKS_PATH: &str = "api/bookbank/books/";
const REQUESTS_PATH: &str = "api/bookbank/book-requests/";

/// Service layer for book bank operations.
pub struct BookService<'a> {
    client: &'a ApiClient,
}

impl<'a> BookService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_books(&self, filter: &BookFilter) -> ClientResult<Vec<Book>> {
        let response: ListResponse<Book> = self
            .client
            .send_json(&RequestDescriptor::get(BOOKS_PATH).query(filter)?)
            .await?;
        Ok(response.into_items())
    }

    pub async fn get_book(&self, id: Uuid) -> ClientResult<Book> {
        self.client
            .send_json(&RequestDescriptor::get(format!("{}{}/", BOOKS_PATH, id)))
            .await
    }

    /// Lists a book, optionally with a cover image.
    pub async fn create_book(&self, book: NewBook, image: Option<Upload>) -> ClientResult<Book> {
        book.validate()?;

        let mut form = FormData::from_fields(&book)?;
        if let Some(image) = image {
            form = form.file("image", image);
        }

        let created: Book = self
            .client
            .send_json(&RequestDescriptor::post(BOOKS_PATH).form(form))
            .await?;
        info!("Listed book {}", created.id);
        Ok(created)
    }

    /// Sends only the fields present in `update`.
    pub async fn update_book(&self, id: Uuid, update: BookUpdate) -> ClientResult<Book> {
        let form = FormData::from_fields(&update)?;
        self.client
            .send_json(&RequestDescriptor::patch(format!("{}{}/", BOOKS_PATH, id)).form(form))
            .await
    }

    pub async fn delete_book(&self, id: Uuid) -> ClientResult<()> {
        self.client
            .send(&RequestDescriptor::delete(format!("{}{}/", BOOKS_PATH, id)))
            .await?;
        info!("Deleted book {}", id);
        Ok(())
    }

    pub async fn request_book(&self, book_id: Uuid, message: &str) -> ClientResult<BookRequest> {
        let form = FormData::new().text("message", message);
        let request =
            RequestDescriptor::post(format!("{}{}/request_book/", BOOKS_PATH, book_id)).form(form);
        self.client.send_json(&request).await
    }

    /// Requests the user made or received.
    pub async fn my_requests(&self) -> ClientResult<Vec<BookRequest>> {
        let response: ListResponse<BookRequest> = self
            .client
            .send_json(&RequestDescriptor::get(REQUESTS_PATH))
            .await?;
        Ok(response.into_items())
    }

    pub async fn update_request_status(
        &self,
        request_id: Uuid,
        status: BookRequestStatus,
    ) -> ClientResult<BookRequest> {
        let form = FormData::from_fields(&json!({ "status": status }))?;
        let request =
            RequestDescriptor::patch(format!("{}{}/", REQUESTS_PATH, request_id)).form(form);
        self.client.send_json(&request).await
    }

    pub async fn approve_request(&self, request_id: Uuid) -> ClientResult<StatusMessage> {
        self.client
            .send_json(&RequestDescriptor::post(format!(
                "{}{}/approve/",
                REQUESTS_PATH, request_id
            )))
            .await
    }

    pub async fn reject_request(&self, request_id: Uuid) -> ClientResult<StatusMessage> {
        self.client
            .send_json(&RequestDescriptor::post(format!("{}{}/reject/", REQUESTS_PATH, request_id)))
            .await
    }
}
