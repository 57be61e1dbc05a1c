//! Project summary reporter.

use crate::report::{ReportError, VersionEyeSlack};
use crate::slack::{Attachment, Color, OutboundMessage};
use crate::versioneye::{ProjectDetail, ProjectId, ProjectRef};
use tracing::{info, warn};

/// `{host}/user/projects/{id}`
pub fn project_link(host: &str, id: &ProjectId) -> String {
    format!("{}/user/projects/{}", host, id)
}

/// First project whose name matches exactly.
pub fn find_project<'a>(projects: &'a [ProjectRef], name: &str) -> Option<&'a ProjectRef> {
    projects.iter().find(|p| p.name == name)
}

/// Outdated, licenses, security; in that order.
pub fn summary_attachments(detail: &ProjectDetail) -> Vec<Attachment> {
    let license_color = if detail.licenses_red > 0 {
        Color::Danger
    } else if detail.licenses_unknown > 0 {
        Color::Warning
    } else {
        Color::Good
    };
    vec![
        Attachment::colored(
            format!("Outdated: {}", detail.outdated),
            Color::for_count(detail.outdated),
        ),
        Attachment::colored(
            format!(
                "Licenses: {} : {}",
                detail.licenses_red, detail.licenses_unknown
            ),
            license_color,
        ),
        Attachment::colored(
            format!("Security: {}", detail.security),
            Color::for_count(detail.security),
        ),
    ]
}

pub fn summary_message(
    host: &str,
    project_name: &str,
    id: &ProjectId,
    detail: &ProjectDetail,
) -> OutboundMessage {
    OutboundMessage {
        title: format!(
            "Project summary for <{}|{}>",
            project_link(host, id),
            project_name
        ),
        attachments: summary_attachments(detail),
    }
}

impl VersionEyeSlack {
    /// Post the health summary of the project named `project_name`.
    pub async fn report_project_summary(
        &self,
        project_name: &str,
        org_name: Option<&str>,
    ) -> Result<String, ReportError> {
        let projects = self.versioneye.list_projects(org_name).await?;
        let Some(project) = find_project(&projects, project_name) else {
            warn!(project = %project_name, "project not found");
            return Err(ReportError::ProjectNotFound(project_name.to_string()));
        };
        let detail = self.versioneye.show_project(&project.id).await?;
        info!(
            project = %project_name,
            outdated = detail.outdated,
            licenses_red = detail.licenses_red,
            licenses_unknown = detail.licenses_unknown,
            security = detail.security,
            "posting project summary"
        );
        let message = summary_message(&self.host, project_name, &project.id, &detail);
        Ok(self.slack.deliver(&message).await?)
    }
}
