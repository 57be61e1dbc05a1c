//! Slack message model and webhook sink.

mod message;
mod webhook;

pub use message::{Attachment, Color, OutboundMessage};
pub use webhook::{SinkError, SlackWebhook};
