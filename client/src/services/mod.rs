//! Module for the domain services.
//!
//! Each service is a thin typed wrapper over one area of the backend's REST
//! API. Services borrow the shared `ApiClient` and propagate every error.

pub mod admin_noticeboard_service;
pub mod book_service;
pub mod lost_found_service;
pub mod noticeboard_service;
pub mod roommate_service;

pub use admin_noticeboard_service::AdminNoticeboardService;
pub use book_service::BookService;
pub use lost_found_service::LostFoundService;
pub use noticeboard_service::NoticeboardService;
pub use roommate_service::RoommateService;
