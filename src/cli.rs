use std::time::Duration;

use anyhow::{bail, Result};
use clap::{ArgAction, Parser};

use crate::csv_report::DEFAULT_ACTIVITY_REPORT;
use crate::error::ReportError;
use crate::gitlab::api::Credentials;
use crate::gitlab::listing::ListingFailurePolicy;
use crate::window::{resolve_window, WindowSpec};

#[derive(Parser, Debug)]
#[command(
    name = "gitlab-activity-report",
    version,
    about = "Export merged GitLab merge request activity to a CSV report",
    long_about = None
)]
pub struct Cli {
  /// Developer label written in the first column of every row
  #[arg(long, env = "GAR_DEVELOPER")]
  pub developer: Option<String>,

  /// GitLab username whose merged merge requests are reported
  #[arg(long, env = "GITLAB_USER")]
  pub user: Option<String>,

  /// GitLab group id (or URL-encoded path) to search
  #[arg(long, env = "GITLAB_GROUP")]
  pub group: Option<String>,

  /// GitLab base URL
  #[arg(long = "gitlab-url", env = "GITLAB_URL", default_value = "https://gitlab.com")]
  pub gitlab_url: String,

  /// Personal access token sent as Private-Token
  #[arg(long, env = "GITLAB_PRIVATE_TOKEN", hide_env_values = true)]
  pub token: Option<String>,

  /// Calendar month, e.g. 2021-12
  #[arg(long)]
  pub month: Option<String>,

  /// Window start: YYYY-MM-DD or RFC 3339; must be paired with --until
  #[arg(long, alias = "start")]
  pub since: Option<String>,

  /// Window end: YYYY-MM-DD (inclusive day) or RFC 3339; must be paired with --since
  #[arg(long, alias = "end")]
  pub until: Option<String>,

  /// CSV output path (overwritten on each run)
  #[arg(long, default_value = DEFAULT_ACTIVITY_REPORT)]
  pub out: String,

  /// Per-request HTTP timeout in seconds
  #[arg(long, default_value_t = 30)]
  pub timeout_secs: u64,

  /// What to do when a listing page cannot be fetched
  #[arg(long, value_enum, default_value_t = ListingFailurePolicy::KeepPartial)]
  pub on_listing_failure: ListingFailurePolicy,

  /// More logging (-v debug, -vv trace); RUST_LOG wins when set
  #[arg(short, long, action = ArgAction::Count)]
  pub verbose: u8,

  /// Only log warnings and errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,
}

#[derive(Debug, Clone)]
pub struct EffectiveConfig {
  pub developer: String,
  pub user: String,
  pub group: String,
  pub credentials: Credentials,
  pub since: String,
  pub until: String,
  pub out: String,
  pub timeout: Duration,
  pub on_listing_failure: ListingFailurePolicy,
}

fn required(value: Option<String>, flag: &str, env: &str) -> Result<String> {
  match value.map(|v| v.trim().to_string()) {
    Some(v) if !v.is_empty() => Ok(v),
    _ => bail!("missing {flag} (or set {env})"),
  }
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  // Validate window selection
  let window = match (&cli.month, &cli.since, &cli.until) {
    (Some(ym), None, None) => WindowSpec::Month { ym: ym.clone() },
    (None, Some(s), Some(u)) => WindowSpec::SinceUntil {
      since: s.clone(),
      until: u.clone(),
    },
    (None, None, None) => bail!("Provide one of --month or (--since AND --until)"),
    (None, _, _) => bail!("--since and --until must be given together"),
    _ => bail!("Ambiguous time selection: choose only one of --month | --since/--until"),
  };
  let (since, until) = resolve_window(&window)?;

  let developer = required(cli.developer, "--developer", "GAR_DEVELOPER")?;
  let user = required(cli.user, "--user", "GITLAB_USER")?;
  let group = required(cli.group, "--group", "GITLAB_GROUP")?;
  let token = required(cli.token, "--token", "GITLAB_PRIVATE_TOKEN")?;

  let base_url = cli.gitlab_url.trim().trim_end_matches('/').to_string();

  if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
    return Err(ReportError::Config(format!("--gitlab-url must start with http:// or https:// (got {:?})", cli.gitlab_url)).into());
  }

  if cli.timeout_secs == 0 {
    return Err(ReportError::Config("--timeout-secs must be at least 1".into()).into());
  }

  Ok(EffectiveConfig {
    developer,
    user,
    group,
    credentials: Credentials { base_url, token },
    since,
    until,
    out: cli.out,
    timeout: Duration::from_secs(cli.timeout_secs),
    on_listing_failure: cli.on_listing_failure,
  })
}
