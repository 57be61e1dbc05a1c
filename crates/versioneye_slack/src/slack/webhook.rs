//! Slack incoming webhook delivery.

use crate::config::Config;
use crate::slack::message::{Attachment, OutboundMessage};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("slack request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("slack webhook error: status {status} body {body}")]
    Status { status: u16, body: String },
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    icon_url: &'a str,
    attachments: &'a [Attachment],
}

/// Posts messages to one Slack incoming webhook.
pub struct SlackWebhook {
    url: String,
    channel: Option<String>,
    username: Option<String>,
    icon_url: String,
    client: reqwest::Client,
}

impl SlackWebhook {
    pub fn new(config: &Config) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            url: config.slack_webhook_url.clone(),
            channel: config.slack_channel.clone(),
            username: config.slack_username.clone(),
            icon_url: config.slack_icon_url.clone(),
            client,
        })
    }

    /// Post `message` and return Slack's acknowledgement body (normally `ok`).
    pub async fn deliver(&self, message: &OutboundMessage) -> Result<String, SinkError> {
        let payload = WebhookPayload {
            text: &message.title,
            channel: self.channel.as_deref(),
            username: self.username.as_deref(),
            icon_url: &self.icon_url,
            attachments: &message.attachments,
        };
        let res = self.client.post(&self.url).json(&payload).send().await?;
        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "slack webhook rejected message");
            return Err(SinkError::Status {
                status: status.as_u16(),
                body,
            });
        }
        info!(attachments = message.attachments.len(), "posted to slack");
        Ok(body)
    }
}
