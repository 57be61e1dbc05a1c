//! End-to-end reporter runs against mock VersionEye and Slack servers.

use serde_json::json;
use std::path::Path;
use time::macros::datetime;
use versioneye_slack::{ApiError, Config, ReportError, SinkError, VersionEyeSlack, NO_NOTIFICATIONS};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-versioneye-api-key";
const HOOK_PATH: &str = "/services/T000/B000/XXXX";

fn load_fixture(name: &str) -> String {
    let full = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../testdata")
        .join(name);
    std::fs::read_to_string(&full).unwrap_or_else(|e| panic!("read {}: {}", full.display(), e))
}

struct Servers {
    versioneye: MockServer,
    slack: MockServer,
}

impl Servers {
    async fn start() -> Self {
        Self {
            versioneye: MockServer::start().await,
            slack: MockServer::start().await,
        }
    }

    fn config(&self) -> Config {
        Config::new(API_KEY, format!("{}{}", self.slack.uri(), HOOK_PATH))
            .with_host(self.versioneye.uri())
    }

    fn bridge(&self) -> VersionEyeSlack {
        VersionEyeSlack::new(&self.config()).unwrap()
    }

    async fn mock_api(&self, api_path: &str, body: String, calls: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/api/v2{api_path}")))
            .and(query_param("api_key", API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(calls)
            .mount(&self.versioneye)
            .await;
    }

    async fn mock_slack_ok(&self, calls: u64) {
        Mock::given(method("POST"))
            .and(path(HOOK_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(calls)
            .mount(&self.slack)
            .await;
    }

    async fn slack_bodies(&self) -> Vec<serde_json::Value> {
        self.slack
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| r.body_json().unwrap())
            .collect()
    }
}

#[tokio::test]
async fn notifications_without_cutoff_posts_all() {
    let s = Servers::start().await;
    s.mock_api("/me/notifications", load_fixture("notifications.json"), 1)
        .await;
    s.mock_slack_ok(1).await;

    let res = s.bridge().report_notifications(None).await.unwrap();
    assert_eq!(res, "ok");

    let host = s.versioneye.uri();
    let bodies = s.slack_bodies().await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["text"], "There are notifications for new releases!");
    assert_eq!(
        bodies[0]["attachments"],
        json!([
            { "text": format!("<{host}/read_language/read_prod_key|read_name> (2.0.0)") },
            { "text": format!("<{host}/unread_language/unread_prod_key|unread_name> (1.0.0)") },
        ])
    );
}

#[tokio::test]
async fn notifications_after_cutoff_only() {
    let s = Servers::start().await;
    s.mock_api("/me/notifications", load_fixture("notifications.json"), 1)
        .await;
    s.mock_slack_ok(1).await;

    let since = datetime!(2016-04-01 09:00:00 UTC);
    let res = s.bridge().report_notifications(Some(since)).await.unwrap();
    assert_eq!(res, "ok");

    let host = s.versioneye.uri();
    let bodies = s.slack_bodies().await;
    assert_eq!(
        bodies[0]["attachments"],
        json!([
            { "text": format!("<{host}/unread_language/unread_prod_key|unread_name> (1.0.0)") },
        ])
    );
}

#[tokio::test]
async fn notifications_nothing_new_skips_slack() {
    let s = Servers::start().await;
    s.mock_api("/me/notifications", load_fixture("notifications.json"), 1)
        .await;
    s.mock_slack_ok(0).await;

    let since = datetime!(2016-04-02 09:00:00 UTC);
    let res = s.bridge().report_notifications(Some(since)).await.unwrap();
    assert_eq!(res, NO_NOTIFICATIONS);
}

#[tokio::test]
async fn notifications_odd_timestamp_still_posted() {
    let s = Servers::start().await;
    let body = json!({
        "notifications": [
            {
                "created_at": "2016-04-02 09:00:00 UTC",
                "product": { "prod_key": "a_key", "language": "php", "name": "a_name" },
                "version": "1.0.0"
            },
            {
                "created_at": "not a time",
                "product": { "prod_key": "b_key", "language": "php", "name": "b_name" },
                "version": "2.0.0"
            },
            {
                "created_at": "2016-03-01T09:00:00.000Z",
                "product": { "prod_key": "c_key", "language": "php", "name": "c_name" },
                "version": "3.0.0"
            }
        ]
    });
    s.mock_api("/me/notifications", body.to_string(), 1).await;
    s.mock_slack_ok(1).await;

    let since = datetime!(2016-04-01 00:00:00 UTC);
    let res = s.bridge().report_notifications(Some(since)).await.unwrap();
    assert_eq!(res, "ok");

    let host = s.versioneye.uri();
    let bodies = s.slack_bodies().await;
    assert_eq!(
        bodies[0]["attachments"],
        json!([
            { "text": format!("<{host}/php/a_key|a_name> (1.0.0)") },
            { "text": format!("<{host}/php/b_key|b_name> (2.0.0)") },
        ])
    );
}

#[tokio::test]
async fn notifications_gateway_error_propagates() {
    let s = Servers::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/me/notifications"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"error":"API Key not valid"}"#))
        .expect(1)
        .mount(&s.versioneye)
        .await;
    s.mock_slack_ok(0).await;

    let err = s.bridge().report_notifications(None).await.unwrap_err();
    match err {
        ReportError::Gateway(ApiError::Status { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("API Key not valid"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn notifications_malformed_body_is_gateway_error() {
    let s = Servers::start().await;
    s.mock_api("/me/notifications", "<html>maintenance</html>".to_string(), 1)
        .await;
    s.mock_slack_ok(0).await;

    let err = s.bridge().report_notifications(None).await.unwrap_err();
    assert!(matches!(err, ReportError::Gateway(ApiError::Decode { .. })));
}

#[tokio::test]
async fn project_summary_all_good() {
    let s = Servers::start().await;
    s.mock_api("/projects", load_fixture("projects.json"), 1).await;
    s.mock_api("/projects/project1-id", load_fixture("project1.json"), 1)
        .await;
    let host = s.versioneye.uri();
    Mock::given(method("POST"))
        .and(path(HOOK_PATH))
        .and(body_json(json!({
            "text": format!("Project summary for <{host}/user/projects/project1-id|project1>"),
            "icon_url": versioneye_slack::config::DEFAULT_ICON_URL,
            "attachments": [
                { "color": "good", "text": "Outdated: 0" },
                { "color": "good", "text": "Licenses: 0 : 0" },
                { "color": "good", "text": "Security: 0" },
            ],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&s.slack)
        .await;

    let res = s
        .bridge()
        .report_project_summary("project1", None)
        .await
        .unwrap();
    assert_eq!(res, "ok");
}

#[tokio::test]
async fn project_summary_colors_by_counter() {
    let s = Servers::start().await;
    s.mock_api("/projects", load_fixture("projects.json"), 1).await;
    s.mock_api("/projects/project2-id", load_fixture("project2.json"), 1)
        .await;
    s.mock_slack_ok(1).await;

    s.bridge()
        .report_project_summary("project2", None)
        .await
        .unwrap();

    let bodies = s.slack_bodies().await;
    assert_eq!(
        bodies[0]["attachments"],
        json!([
            { "color": "danger", "text": "Outdated: 7" },
            { "color": "warning", "text": "Licenses: 0 : 3" },
            { "color": "danger", "text": "Security: 2" },
        ])
    );
}

#[tokio::test]
async fn project_summary_unknown_name() {
    let s = Servers::start().await;
    s.mock_api("/projects", load_fixture("projects.json"), 1).await;
    s.mock_api("/projects/project1-id", load_fixture("project1.json"), 0)
        .await;
    s.mock_slack_ok(0).await;

    let err = s
        .bridge()
        .report_project_summary("project3", None)
        .await
        .unwrap_err();
    match err {
        ReportError::ProjectNotFound(name) => assert_eq!(name, "project3"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn project_summary_forwards_org_name() {
    let s = Servers::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/projects"))
        .and(query_param("api_key", API_KEY))
        .and(query_param("orga_name", "my-org"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("projects.json")))
        .expect(1)
        .mount(&s.versioneye)
        .await;
    s.mock_api("/projects/project1-id", load_fixture("project1.json"), 1)
        .await;
    s.mock_slack_ok(1).await;

    let res = s
        .bridge()
        .report_project_summary("project1", Some("my-org"))
        .await
        .unwrap();
    assert_eq!(res, "ok");
}

#[tokio::test]
async fn slack_rejection_is_sink_error() {
    let s = Servers::start().await;
    s.mock_api("/me/notifications", load_fixture("notifications.json"), 1)
        .await;
    Mock::given(method("POST"))
        .and(path(HOOK_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string("no_service"))
        .expect(1)
        .mount(&s.slack)
        .await;

    let err = s.bridge().report_notifications(None).await.unwrap_err();
    match err {
        ReportError::Sink(SinkError::Status { status, body }) => {
            assert_eq!(status, 404);
            assert_eq!(body, "no_service");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn webhook_payload_carries_channel_and_username() {
    let s = Servers::start().await;
    s.mock_api("/me/notifications", load_fixture("notifications.json"), 1)
        .await;
    s.mock_slack_ok(1).await;

    let config = s
        .config()
        .with_channel("#deps")
        .with_username("versioneye");
    VersionEyeSlack::new(&config)
        .unwrap()
        .report_notifications(None)
        .await
        .unwrap();

    let bodies = s.slack_bodies().await;
    assert_eq!(bodies[0]["channel"], "#deps");
    assert_eq!(bodies[0]["username"], "versioneye");
    assert_eq!(
        bodies[0]["icon_url"],
        versioneye_slack::config::DEFAULT_ICON_URL
    );
}

#[test]
fn invalid_webhook_url_is_config_error() {
    let config = Config::new(API_KEY, "slack-webhook-url-dummy");
    assert!(matches!(
        VersionEyeSlack::new(&config),
        Err(ReportError::Config(_))
    ));
}
