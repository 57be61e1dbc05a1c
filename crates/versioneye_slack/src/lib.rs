//! versioneye_slack — post VersionEye notifications and project summaries to Slack.
//!
//! One fetch-and-post round per call; no retries, no state between runs.

pub mod config;
pub mod report;
pub mod slack;
pub mod versioneye;

pub use config::{Config, ConfigError};
pub use report::{ReportError, VersionEyeSlack, NO_NOTIFICATIONS};
pub use slack::{Attachment, Color, OutboundMessage, SinkError, SlackWebhook};
pub use versioneye::{ApiError, Notification, ProjectDetail, ProjectId, ProjectRef, VersionEye};
