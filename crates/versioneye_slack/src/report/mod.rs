//! Reporters: fetch from VersionEye, render, deliver to Slack.

mod notifications;
mod project;

pub use notifications::{
    is_new, notification_attachment, notification_link, notifications_message, NOTIFICATIONS_TITLE,
    NO_NOTIFICATIONS,
};
pub use project::{find_project, project_link, summary_attachments, summary_message};

use crate::config::{Config, ConfigError};
use crate::slack::{SinkError, SlackWebhook};
use crate::versioneye::{ApiError, VersionEye};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Gateway(#[from] ApiError),
    #[error("project not found: {0}")]
    ProjectNotFound(String),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Both reporters over one VersionEye client and one Slack webhook.
pub struct VersionEyeSlack {
    host: String,
    versioneye: VersionEye,
    slack: SlackWebhook,
}

impl VersionEyeSlack {
    pub fn new(config: &Config) -> Result<Self, ReportError> {
        config.validate()?;
        Ok(Self {
            host: config.host().to_string(),
            versioneye: VersionEye::new(config)?,
            slack: SlackWebhook::new(config)?,
        })
    }
}
