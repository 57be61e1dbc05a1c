//! Immutable run configuration shared by the VersionEye client and the Slack webhook.

use std::fmt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_VERSIONEYE_HOST: &str = "https://www.versioneye.com";
pub const DEFAULT_ICON_URL: &str =
    "https://raw.githubusercontent.com/miyajan/versioneye-slack/master/image/versioneye.png";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid versioneye host {0:?}: {1}")]
    InvalidHost(String, url::ParseError),
    #[error("invalid slack webhook url {0:?}: {1}")]
    InvalidWebhookUrl(String, url::ParseError),
}

#[derive(Clone)]
pub struct Config {
    pub versioneye_api_key: String,
    pub slack_webhook_url: String,
    /// Scheme and authority of the VersionEye site, without trailing slash.
    pub versioneye_host: String,
    pub slack_channel: Option<String>,
    pub slack_username: Option<String>,
    pub slack_icon_url: String,
    pub timeout: Duration,
}

impl Config {
    pub fn new(versioneye_api_key: impl Into<String>, slack_webhook_url: impl Into<String>) -> Self {
        Self {
            versioneye_api_key: versioneye_api_key.into(),
            slack_webhook_url: slack_webhook_url.into(),
            versioneye_host: DEFAULT_VERSIONEYE_HOST.to_string(),
            slack_channel: None,
            slack_username: None,
            slack_icon_url: DEFAULT_ICON_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.versioneye_host = host.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.slack_channel = Some(channel.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.slack_username = Some(username.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Host used for links and the API base, trailing slashes removed.
    pub fn host(&self) -> &str {
        self.versioneye_host.trim_end_matches('/')
    }

    /// Check that the host and webhook are absolute URLs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(self.host())
            .map_err(|e| ConfigError::InvalidHost(self.versioneye_host.clone(), e))?;
        Url::parse(&self.slack_webhook_url)
            .map_err(|e| ConfigError::InvalidWebhookUrl(self.slack_webhook_url.clone(), e))?;
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("versioneye_api_key", &"<redacted>")
            .field("slack_webhook_url", &self.slack_webhook_url)
            .field("versioneye_host", &self.versioneye_host)
            .field("slack_channel", &self.slack_channel)
            .field("slack_username", &self.slack_username)
            .field("slack_icon_url", &self.slack_icon_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
