// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Manifest entries, summary counts and their JSON + CSV projections
// role: persistence/manifest
// inputs: RunContext, scan parameters, ManifestEntry[], generation instant, output directory
// outputs: ruleset_manifest_<stamp>.json and ruleset_manifest_<stamp>.csv under the output directory
// side_effects: Writes two files
// invariants:
// - Entries keep the order they were audited in
// - with_ruleset / without_ruleset / errors count has_ruleset == true / false / null
// - listing_complete is false exactly when listing_error is set
// - CSV has_ruleset is "True" / "False" / ""; apply_protection is "NO" only when has_ruleset is true
// errors: IO and serialization errors surfaced with the file path as context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::RunContext;
use crate::creator::RULESET_NAME;
use crate::error::ApiError;
use crate::model::{ActionTaken, OwnerKind, ProtectionStatus, RepositoryRef, RulesetDetail, Visibility};
use crate::util;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ManifestEntry {
  pub repo_name: String,
  pub full_name: String,
  pub default_branch: String,
  pub html_url: String,
  pub private: bool,
  pub has_ruleset: Option<bool>,
  pub ruleset_name: Option<String>,
  pub ruleset_id: Option<u64>,
  pub enforcement: Option<String>,
  pub bypass_actors_count: usize,
  pub error: Option<String>,
  pub action_taken: Option<ActionTaken>,
  pub checked_at: String,
}

impl ManifestEntry {
  pub fn from_status(repo: &RepositoryRef, status: &ProtectionStatus, checked_at: String) -> Self {
    let mut entry = Self {
      repo_name: repo.name.clone(),
      full_name: repo.full_name.clone(),
      default_branch: repo.default_branch().to_string(),
      html_url: repo.html_url.clone(),
      private: repo.private,
      has_ruleset: status.has_ruleset(),
      ruleset_name: None,
      ruleset_id: None,
      enforcement: None,
      bypass_actors_count: 0,
      error: None,
      action_taken: None,
      checked_at,
    };

    match status {
      ProtectionStatus::Protected(detail) => {
        entry.ruleset_name = Some(detail.name.clone());
        entry.ruleset_id = Some(detail.id);
        entry.enforcement = Some(detail.enforcement.clone());
        entry.bypass_actors_count = detail.bypass_actors.len();
      }
      ProtectionStatus::Unknown { error } => entry.error = Some(error.clone()),
      ProtectionStatus::Unprotected => {}
    }

    entry
  }

  pub fn record_dry_run(&mut self) {
    self.action_taken = Some(ActionTaken::DryRunWouldCreate);
  }

  /// `created` is `None` when the host accepted the ruleset without a readable reply.
  pub fn record_created(&mut self, created: Option<&RulesetDetail>) {
    self.action_taken = Some(ActionTaken::RulesetCreated);
    self.has_ruleset = Some(true);

    let Some(created) = created else {
      self.ruleset_name = Some(RULESET_NAME.to_string());
      return;
    };

    self.ruleset_name = Some(created.name.clone());
    self.ruleset_id = Some(created.id);
    if !created.enforcement.is_empty() {
      self.enforcement = Some(created.enforcement.clone());
    }
    self.bypass_actors_count = created.bypass_actors.len();
  }

  pub fn record_creation_failure(&mut self, err: &ApiError) {
    self.action_taken = Some(ActionTaken::CreationFailed);
    self.error = Some(err.to_string());
  }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ManifestCounts {
  pub with_ruleset: usize,
  pub without_ruleset: usize,
  pub errors: usize,
}

impl ManifestCounts {
  pub fn tally(entries: &[ManifestEntry]) -> Self {
    entries.iter().fold(Self::default(), |mut acc, e| {
      match e.has_ruleset {
        Some(true) => acc.with_ruleset += 1,
        Some(false) => acc.without_ruleset += 1,
        None => acc.errors += 1,
      }
      acc
    })
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Manifest {
  pub generated_at: String,
  pub authenticated_user: String,
  pub authenticated_user_id: u64,
  pub owner: String,
  pub owner_kind: OwnerKind,
  pub visibility: Visibility,
  /// False when a listing page failed and later pages were never fetched.
  pub listing_complete: bool,
  pub listing_error: Option<String>,
  pub total_repos: usize,
  pub with_ruleset: usize,
  pub without_ruleset: usize,
  pub errors: usize,
  pub repositories: Vec<ManifestEntry>,
}

impl Manifest {
  pub fn assemble(
    ctx: &RunContext,
    owner: &str,
    owner_kind: OwnerKind,
    visibility: Visibility,
    entries: Vec<ManifestEntry>,
    generated_at: DateTime<Utc>,
  ) -> Self {
    let counts = ManifestCounts::tally(&entries);

    Self {
      generated_at: util::iso_utc(generated_at),
      authenticated_user: ctx.identity.login.clone(),
      authenticated_user_id: ctx.identity.id,
      owner: owner.to_string(),
      owner_kind,
      visibility,
      listing_complete: true,
      listing_error: None,
      total_repos: entries.len(),
      with_ruleset: counts.with_ruleset,
      without_ruleset: counts.without_ruleset,
      errors: counts.errors,
      repositories: entries,
    }
  }

  pub fn record_listing_interruption(&mut self, err: &ApiError) {
    self.listing_complete = false;
    self.listing_error = Some(err.to_string());
  }

  pub fn counts(&self) -> ManifestCounts {
    ManifestCounts {
      with_ruleset: self.with_ruleset,
      without_ruleset: self.without_ruleset,
      errors: self.errors,
    }
  }
}

/// One row of the editable decision file; shared by the writer and the replay reader.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct DecisionRow {
  pub repo_name: String,
  pub full_name: String,
  pub default_branch: String,
  pub html_url: String,
  pub has_ruleset: String,
  pub ruleset_name: String,
  pub enforcement: String,
  pub action_taken: String,
  pub error: String,
  pub apply_protection: String,
}

pub fn has_ruleset_cell(v: Option<bool>) -> &'static str {
  match v {
    Some(true) => "True",
    Some(false) => "False",
    None => "",
  }
}

/// Unknown status is recommended for enforcement, same as a confirmed absence.
pub fn default_decision(has_ruleset: Option<bool>) -> &'static str {
  if has_ruleset == Some(true) {
    "NO"
  } else {
    "YES"
  }
}

impl From<&ManifestEntry> for DecisionRow {
  fn from(e: &ManifestEntry) -> Self {
    Self {
      repo_name: e.repo_name.clone(),
      full_name: e.full_name.clone(),
      default_branch: e.default_branch.clone(),
      html_url: e.html_url.clone(),
      has_ruleset: has_ruleset_cell(e.has_ruleset).to_string(),
      ruleset_name: e.ruleset_name.clone().unwrap_or_default(),
      enforcement: e.enforcement.clone().unwrap_or_default(),
      action_taken: e.action_taken.map(|a| a.as_str().to_string()).unwrap_or_default(),
      error: e.error.clone().unwrap_or_default(),
      apply_protection: default_decision(e.has_ruleset).to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestPaths {
  pub json: PathBuf,
  pub csv: PathBuf,
}

impl ManifestPaths {
  pub fn for_stamp(out_dir: &Path, stamp: DateTime<Utc>) -> Self {
    let base = format!("ruleset_manifest_{}", util::file_stamp(stamp));
    Self {
      json: out_dir.join(format!("{}.json", base)),
      csv: out_dir.join(format!("{}.csv", base)),
    }
  }
}

pub fn write_json(manifest: &Manifest, path: &Path) -> Result<()> {
  let buf = serde_json::to_vec_pretty(manifest)?;
  std::fs::write(path, buf).with_context(|| format!("writing {}", path.display()))
}

pub fn write_csv(entries: &[ManifestEntry], path: &Path) -> Result<()> {
  let mut wtr = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;

  for entry in entries {
    wtr
      .serialize(DecisionRow::from(entry))
      .with_context(|| format!("writing row for {} to {}", entry.full_name, path.display()))?;
  }

  // Header row even when there are no entries.
  if entries.is_empty() {
    wtr.write_record(CSV_HEADER)?;
  }

  wtr.flush().with_context(|| format!("flushing {}", path.display()))?;
  Ok(())
}

pub const CSV_HEADER: [&str; 10] = [
  "repo_name",
  "full_name",
  "default_branch",
  "html_url",
  "has_ruleset",
  "ruleset_name",
  "enforcement",
  "action_taken",
  "error",
  "apply_protection",
];

/// Write both files into `out_dir`, named after `stamp`.
pub fn write_manifest(manifest: &Manifest, out_dir: &Path, stamp: DateTime<Utc>) -> Result<ManifestPaths> {
  let paths = ManifestPaths::for_stamp(out_dir, stamp);

  write_json(manifest, &paths.json)?;
  write_csv(&manifest.repositories, &paths.csv)?;

  tracing::info!(json = %paths.json.display(), csv = %paths.csv.display(), "manifest saved");
  Ok(paths)
}
