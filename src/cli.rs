use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::error::FatalError;
use crate::github::{self, transport::DEFAULT_API_URL};
use crate::model::{OwnerKind, Visibility};
use crate::util;

#[derive(Parser, Debug)]
#[command(
    name = "github-ruleset-auditor",
    version,
    about = "Audit and enforce default-branch protection rulesets on GitHub repositories",
    long_about = None
)]
#[command(group(ArgGroup::new("target").multiple(false).args(["username", "org", "from_csv"])))]
pub struct Cli {
  /// Audit repositories owned by this user
  #[arg(short = 'u', long)]
  pub username: Option<String>,

  /// Audit repositories of this organization
  #[arg(short = 'o', long)]
  pub org: Option<String>,

  /// Apply protection to rows marked YES in a previously written manifest CSV
  #[arg(short = 'f', long = "from-csv", value_name = "CSV_FILE")]
  pub from_csv: Option<PathBuf>,

  /// Create the default ruleset on repositories that have none
  #[arg(short = 'a', long)]
  pub apply: bool,

  /// Report what would be created without sending any creation request
  #[arg(short = 'd', long = "dry-run")]
  pub dry_run: bool,

  /// Directory for ruleset_manifest_<stamp>.{json,csv}
  #[arg(long, default_value = ".")]
  pub output_dir: PathBuf,

  /// API token (default: $GITHUB_TOKEN)
  #[arg(short = 't', long)]
  pub token: Option<String>,

  /// Inspect (and with --apply, protect) a single repository; needs --username or --org
  #[arg(short = 'r', long, value_name = "NAME")]
  pub repo: Option<String>,

  /// Which repositories to include
  #[arg(short = 'v', long, value_enum, default_value_t = Visibility::Public)]
  pub visibility: Visibility,

  /// REST API base URL (GitHub Enterprise Server: https://HOST/api/v3)
  #[arg(long, default_value = DEFAULT_API_URL)]
  pub api_url: String,

  /// Raise log verbosity (repeatable)
  #[arg(long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant used for timestamps (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Scan { owner: String, kind: OwnerKind },
  Single { owner: String, kind: OwnerKind, repo: String },
  Replay { csv: PathBuf },
}

#[derive(Debug)]
pub struct EffectiveConfig {
  pub mode: Mode,
  pub token: String,
  pub api_url: String,
  pub output_dir: PathBuf,
  pub visibility: Visibility,
  pub apply: bool,
  pub dry_run: bool,
  pub now_override: Option<DateTime<Utc>>,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let owner = match (&cli.username, &cli.org) {
    (Some(u), None) => Some((u.clone(), OwnerKind::User)),
    (None, Some(o)) => Some((o.clone(), OwnerKind::Organization)),
    (None, None) => None,
    _ => bail!("Choose only one of --username | --org | --from-csv"),
  };

  let mode = match (owner, cli.from_csv, cli.repo) {
    (Some(_), Some(_), _) => bail!("Choose only one of --username | --org | --from-csv"),
    (None, Some(_), Some(_)) => bail!("--repo cannot be combined with --from-csv"),
    (None, Some(csv), None) => Mode::Replay { csv },
    (Some((owner, kind)), None, Some(repo)) => Mode::Single { owner, kind, repo },
    (Some((owner, kind)), None, None) => Mode::Scan { owner, kind },
    (None, None, _) => bail!("Provide one of --username, --org, or --from-csv"),
  };

  let token = github::resolve_token(cli.token.as_deref()).ok_or(FatalError::MissingToken)?;

  let now_override = cli.now_override.as_deref().map(util::parse_now).transpose()?;

  Ok(EffectiveConfig {
    mode,
    token,
    api_url: cli.api_url,
    output_dir: cli.output_dir,
    visibility: cli.visibility,
    apply: cli.apply,
    dry_run: cli.dry_run,
    now_override,
  })
}
