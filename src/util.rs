// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for timestamps, output directories and man page rendering
// role: utilities/helpers
// inputs: Optional "now" override; output directory path; clap CommandFactory
// outputs: UTC instants, RFC 3339 / file-stamp strings, ensured directories, man page text
// side_effects: ensure_out_dir creates directories
// invariants:
// - effective_now returns the override verbatim when present
// - file_stamp pattern (%Y%m%d_%H%M%S) is stable and locale-independent
// errors: IO errors bubble with the directory path as context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use clap::CommandFactory;

/// Returns the effective "now" given an optional override.
///
/// Keeps test determinism in one place instead of sprinkling `Utc::now()` around.
pub fn effective_now(override_now: Option<DateTime<Utc>>) -> DateTime<Utc> {
  override_now.unwrap_or_else(Utc::now)
}

/// Parse a `--now-override` value: RFC 3339, or a naive `%Y-%m-%dT%H:%M:%S` taken as UTC.
pub fn parse_now(s: &str) -> Result<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }

  let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
    .with_context(|| format!("invalid --now-override value: {}", s))?;
  Ok(naive.and_utc())
}

pub fn iso_utc(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Timestamp fragment used in manifest file names.
pub fn file_stamp(dt: DateTime<Utc>) -> String {
  dt.format("%Y%m%d_%H%M%S").to_string()
}

pub fn ensure_out_dir(dir: &Path) -> Result<()> {
  std::fs::create_dir_all(dir).with_context(|| format!("creating output directory {}", dir.display()))
}

pub fn render_man_page<T: CommandFactory>() -> Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
