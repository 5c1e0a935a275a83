//! Repository implementations for all StudyHub entities.

pub mod bookmark;
pub mod category;
pub mod resource;
pub mod tag;
pub mod user;

pub use bookmark::{BookmarkActivity, BookmarkRepository, BookmarkStats};
pub use category::CategoryRepository;
pub use resource::{ResourceFilter, ResourceRepository};
pub use tag::TagRepository;
pub use user::UserRepository;
