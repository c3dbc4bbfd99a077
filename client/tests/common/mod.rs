#![allow(dead_code)]

use campusconnect::http::{Navigator, Route};
use campusconnect::{ApiClient, Config, MemorySessionStore, SessionState};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use wiremock::MockServer;

/// Remembers every navigation request.
#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

pub struct TestContext {
    pub server: MockServer,
    pub store: Arc<MemorySessionStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub client: ApiClient,
}

pub async fn anonymous() -> TestContext {
    setup(MemorySessionStore::new()).await
}

/// A client whose session holds access token `a1` and refresh token `r1`.
pub async fn logged_in() -> TestContext {
    setup(MemorySessionStore::with_tokens("a1", "r1")).await
}

pub async fn setup(store: MemorySessionStore) -> TestContext {
    let server = MockServer::start().await;
    let store = Arc::new(store);
    let navigator = Arc::new(RecordingNavigator::default());

    let config = Config::new(&server.uri()).unwrap();
    let session = SessionState::restore(store.clone()).await.unwrap();
    let client = ApiClient::new(&config, session)
        .unwrap()
        .with_navigator(navigator.clone());

    TestContext {
        server,
        store,
        navigator,
        client,
    }
}

pub fn user_json() -> Value {
    json!({
        "id": 1,
        "email": "a@b.com",
        "name": "Asha Rao",
        "mobile": "9876543210",
        "is_staff": false,
        "is_superuser": false,
        "profile": {"department": "CSE", "student_id": "21CS042"}
    })
}

pub fn book_json(id: &str) -> Value {
    json!({
        "id": id,
        "title": "Introduction to Algorithms",
        "author": "Cormen",
        "isbn": "9780262033848",
        "condition": "good",
        "price": "499.00",
        "transaction_type": "sell",
        "department": "CSE",
        "course_code": "CS201",
        "contact_email": "seller@campus.edu",
        "is_available": true,
        "images": [],
        "created_at": "2025-01-10T08:30:00Z",
        "updated_at": "2025-01-10T08:30:00Z"
    })
}

pub fn item_json(id: &str) -> Value {
    json!({
        "id": id,
        "item_name": "Black umbrella",
        "status": "found",
        "location": "Canteen",
        "date_reported": "2025-02-03T09:15:00Z",
        "date_occurred": "2025-02-02T12:00:00Z",
        "reporter": 3,
        "claimed_by": null,
        "is_resolved": false
    })
}

pub fn roommate_json(id: &str) -> Value {
    json!({
        "id": id,
        "title": "Room near north gate",
        "description": "Quiet flat",
        "location": "North Gate",
        "rent": 6500,
        "available_from": "2025-07-01",
        "lease_duration": 11,
        "room_type": "shared",
        "preferred_gender": "A",
        "current_occupants": 1,
        "total_occupants": 3,
        "occupation": "student",
        "contact_number": "9876543210",
        "contact_email": "host@campus.edu",
        "is_active": true,
        "created_at": "2025-06-01T12:00:00Z"
    })
}

pub fn event_json(id: &str) -> Value {
    json!({
        "id": id,
        "title": "Rust Workshop",
        "description": "Ownership from first principles",
        "event_type": "workshop",
        "start_datetime": "2025-09-10T10:00:00Z",
        "end_datetime": "2025-09-10T13:00:00Z",
        "location": "Seminar Hall B",
        "is_free": true,
        "price": "0.00",
        "is_approved": false
    })
}
