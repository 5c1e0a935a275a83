//! Bookmark services — save, toggle, check, and count bookmarks.

pub mod service;

pub use service::{
    BookmarkCheck, BookmarkDetail, BookmarkService, BookmarkStatsView, BookmarkToggle,
};
