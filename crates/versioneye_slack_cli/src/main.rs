//! versioneye-slack CLI: post notifications or a project summary, then exit.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use std::process::ExitCode;
use std::time::Duration;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::debug;
use versioneye_slack::config::DEFAULT_VERSIONEYE_HOST;
use versioneye_slack::{Config, VersionEyeSlack};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let config = cli.config().unwrap_or_else(|e| e.exit());
    match run(cli.command, &config) {
        Ok(response) => {
            println!("{}", response);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[derive(Parser)]
#[command(name = "versioneye-slack")]
#[command(version)]
#[command(about = "Post VersionEye notifications and project summaries to Slack")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
struct GlobalArgs {
    /// API key for VersionEye.
    #[arg(long, env = "VERSIONEYE_API_KEY", global = true, hide_env_values = true)]
    versioneye_api_key: Option<String>,
    /// Webhook URL for Slack.
    #[arg(long, env = "SLACK_WEBHOOK_URL", global = true, hide_env_values = true)]
    slack_webhook_url: Option<String>,
    /// Host for VersionEye.
    #[arg(long, env = "VERSIONEYE_HOST", global = true, default_value = DEFAULT_VERSIONEYE_HOST)]
    versioneye_host: String,
    /// Channel name for Slack (defaults to the webhook's channel).
    #[arg(long, env = "SLACK_CHANNEL", global = true)]
    slack_channel: Option<String>,
    /// User name shown on the Slack message.
    #[arg(long, env = "SLACK_USERNAME", global = true)]
    slack_username: Option<String>,
    /// HTTP timeout in seconds.
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,
}

#[derive(Subcommand)]
enum Command {
    /// Post notifications of VersionEye to Slack.
    Notifications(NotificationsArgs),
    /// Post a project summary of VersionEye to Slack.
    Project(ProjectArgs),
}

#[derive(Parser)]
struct NotificationsArgs {
    /// Only post notifications created after this RFC 3339 time.
    #[arg(long, value_parser = parse_rfc3339)]
    since: Option<OffsetDateTime>,
}

#[derive(Parser)]
struct ProjectArgs {
    project_name: String,
    /// Organization the project is assigned to (required with a personal API key).
    #[arg(short, long)]
    org_name: Option<String>,
}

fn parse_rfc3339(s: &str) -> Result<OffsetDateTime, String> {
    OffsetDateTime::parse(s.trim(), &Rfc3339).map_err(|e| format!("invalid RFC 3339 time: {}", e))
}

impl Cli {
    fn config(&self) -> Result<Config, clap::Error> {
        let g = &self.global;
        let api_key = g
            .versioneye_api_key
            .clone()
            .ok_or_else(|| missing("--versioneye-api-key <KEY> (or VERSIONEYE_API_KEY)"))?;
        let webhook = g
            .slack_webhook_url
            .clone()
            .ok_or_else(|| missing("--slack-webhook-url <URL> (or SLACK_WEBHOOK_URL)"))?;
        let mut config = Config::new(api_key, webhook)
            .with_host(g.versioneye_host.clone())
            .with_timeout(Duration::from_secs(g.timeout));
        if let Some(channel) = &g.slack_channel {
            config = config.with_channel(channel.clone());
        }
        if let Some(username) = &g.slack_username {
            config = config.with_username(username.clone());
        }
        Ok(config)
    }
}

fn missing(what: &str) -> clap::Error {
    Cli::command().error(
        ErrorKind::MissingRequiredArgument,
        format!("the following required argument was not provided: {}", what),
    )
}

fn run(command: Command, config: &Config) -> Result<String, Box<dyn std::error::Error>> {
    debug!(?config, "starting");
    let bridge = VersionEyeSlack::new(config)?;
    let rt = tokio::runtime::Runtime::new()?;
    let response = match command {
        Command::Notifications(args) => rt.block_on(bridge.report_notifications(args.since))?,
        Command::Project(args) => rt.block_on(
            bridge.report_project_summary(&args.project_name, args.org_name.as_deref()),
        )?,
    };
    Ok(response)
}
