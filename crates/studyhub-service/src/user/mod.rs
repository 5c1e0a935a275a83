//! User self-service — profile, password, statistics, and activity feed.

pub mod service;

pub use service::{ActivityEntry, UserService, UserStats};
