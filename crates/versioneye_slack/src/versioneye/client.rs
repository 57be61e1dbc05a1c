//! VersionEye API v2 client. One request per call; no retries, no cache.

use crate::config::Config;
use crate::versioneye::models::{NotificationList, ProjectDetail, ProjectId, ProjectRef};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

const API_PATH: &str = "/api/v2";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("versioneye request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("versioneye api error: status {status} body {body}")]
    Status { status: u16, body: String },
    #[error("versioneye response {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only VersionEye client authenticated with an API key.
pub struct VersionEye {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl VersionEye {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            base_url: format!("{}{}", config.host(), API_PATH),
            api_key: config.versioneye_api_key.clone(),
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%path, "versioneye request");
        let res = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;
        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// All current notifications of the account, in API order.
    pub async fn list_notifications(&self) -> Result<NotificationList, ApiError> {
        let list: NotificationList = self.get_json("/me/notifications", &[]).await?;
        info!(count = list.notifications.len(), "list_notifications");
        Ok(list)
    }

    /// Projects visible to the key. `org_name` scopes the listing to an organisation.
    pub async fn list_projects(&self, org_name: Option<&str>) -> Result<Vec<ProjectRef>, ApiError> {
        let query: Vec<(&str, &str)> = org_name.map(|o| ("orga_name", o)).into_iter().collect();
        let projects: Vec<ProjectRef> = self.get_json("/projects", &query).await?;
        info!(count = projects.len(), "list_projects");
        Ok(projects)
    }

    pub async fn show_project(&self, id: &ProjectId) -> Result<ProjectDetail, ApiError> {
        let path = format!("/projects/{}", urlencoding::encode(id.as_str()));
        self.get_json(&path, &[]).await
    }
}
