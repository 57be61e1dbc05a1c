//! Notification reporter.

use crate::report::{ReportError, VersionEyeSlack};
use crate::slack::{Attachment, OutboundMessage};
use crate::versioneye::{Notification, Product};
use time::OffsetDateTime;
use tracing::info;

pub const NOTIFICATIONS_TITLE: &str = "There are notifications for new releases!";
/// Returned instead of a Slack acknowledgement when nothing was posted.
pub const NO_NOTIFICATIONS: &str = "no notifications";

/// `{host}/{language}/{prod_key}`
pub fn notification_link(host: &str, product: &Product) -> String {
    format!("{}/{}/{}", host, product.language, product.prod_key)
}

pub fn notification_attachment(host: &str, notification: &Notification) -> Attachment {
    let url = notification_link(host, &notification.product);
    Attachment::plain(format!(
        "<{}|{}> ({})",
        url, notification.product.name, notification.version
    ))
}

/// Strictly after the cutoff; a notification created exactly at `since` was already seen.
/// Without a readable `created_at` there is nothing to compare, so it is kept.
pub fn is_new(notification: &Notification, since: Option<OffsetDateTime>) -> bool {
    match (since, notification.created_at) {
        (Some(cutoff), Some(created_at)) => created_at > cutoff,
        _ => true,
    }
}

/// One message for every notification newer than `since`, or None when there are none.
pub fn notifications_message(
    host: &str,
    notifications: &[Notification],
    since: Option<OffsetDateTime>,
) -> Option<OutboundMessage> {
    let attachments: Vec<Attachment> = notifications
        .iter()
        .filter(|n| is_new(n, since))
        .map(|n| notification_attachment(host, n))
        .collect();
    if attachments.is_empty() {
        return None;
    }
    Some(OutboundMessage {
        title: NOTIFICATIONS_TITLE.to_string(),
        attachments,
    })
}

impl VersionEyeSlack {
    /// Post notifications created after `since` (all of them when None).
    /// Returns Slack's acknowledgement, or [`NO_NOTIFICATIONS`] without posting.
    pub async fn report_notifications(
        &self,
        since: Option<OffsetDateTime>,
    ) -> Result<String, ReportError> {
        let list = self.versioneye.list_notifications().await?;
        let Some(message) = notifications_message(&self.host, &list.notifications, since) else {
            info!(total = list.notifications.len(), "no new notifications");
            return Ok(NO_NOTIFICATIONS.to_string());
        };
        info!(
            total = list.notifications.len(),
            kept = message.attachments.len(),
            "posting notifications"
        );
        Ok(self.slack.deliver(&message).await?)
    }
}
