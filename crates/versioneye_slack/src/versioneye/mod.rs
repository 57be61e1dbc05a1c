//! VersionEye API gateway: notifications and projects.

mod client;
mod models;

pub use client::{ApiError, VersionEye};
pub use models::{
    parse_timestamp, Notification, NotificationList, Product, ProjectDetail, ProjectId, ProjectRef,
};
