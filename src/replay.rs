// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Re-apply operator decisions from an edited manifest CSV
// role: enforce/replay
// inputs: HostApi, RunContext, CSV path (writer's column schema), dry_run
// outputs: ApplyTally { applied, skipped, already_protected, failed }
// side_effects: One creation call per row marked YES that is not already protected (none in dry run)
// invariants:
// - Rows are processed in file order
// - apply_protection matches "YES" after trimming, case-insensitively; anything else is skipped
// - has_ruleset == "True" (literal) is never sent a creation request
// - The input file is never rewritten
// errors: Unreadable or malformed CSV aborts before any creation call
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::context::RunContext;
use crate::creator::create_default_ruleset;
use crate::github::HostApi;
use crate::manifest::DecisionRow;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApplyTally {
  pub applied: usize,
  pub skipped: usize,
  pub already_protected: usize,
  pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
  Skipped,
  AlreadyProtected,
  WouldApply,
  Applied,
  Failed(String),
}

pub fn wants_protection(cell: &str) -> bool {
  cell.trim().eq_ignore_ascii_case("YES")
}

impl DecisionRow {
  /// Owner and repository name; the name falls back to the `full_name` segment when `repo_name` is blank.
  pub fn owner_and_name(&self) -> (&str, &str) {
    let (owner, tail) = self.full_name.split_once('/').unwrap_or((self.full_name.as_str(), ""));
    let name = if self.repo_name.trim().is_empty() { tail } else { self.repo_name.as_str() };
    (owner, name)
  }
}

/// Rows may be shorter or longer than the header; absent cells read as empty.
pub fn read_decisions(path: &Path) -> Result<Vec<DecisionRow>> {
  let mut rdr = csv::ReaderBuilder::new()
    .flexible(true)
    .from_path(path)
    .with_context(|| format!("opening {}", path.display()))?;
  let mut rows = Vec::new();

  for (i, record) in rdr.deserialize::<DecisionRow>().enumerate() {
    let row = record.with_context(|| format!("reading row {} of {}", i + 1, path.display()))?;
    rows.push(row);
  }

  Ok(rows)
}

pub fn apply_row(api: &dyn HostApi, ctx: &RunContext, row: &DecisionRow, dry_run: bool) -> RowOutcome {
  if !wants_protection(&row.apply_protection) {
    return RowOutcome::Skipped;
  }

  if row.has_ruleset == "True" {
    return RowOutcome::AlreadyProtected;
  }

  if dry_run {
    return RowOutcome::WouldApply;
  }

  let (owner, name) = row.owner_and_name();
  let is_org = ctx.is_foreign_owner(owner);

  match create_default_ruleset(api, ctx, owner, name, is_org) {
    Ok(_) => RowOutcome::Applied,
    Err(e) => RowOutcome::Failed(e.to_string()),
  }
}

pub fn apply_rows(api: &dyn HostApi, ctx: &RunContext, rows: &[DecisionRow], dry_run: bool) -> ApplyTally {
  let total = rows.len();
  let marked = rows.iter().filter(|r| wants_protection(&r.apply_protection)).count();
  tracing::info!(total, marked, "decisions loaded");

  let mut tally = ApplyTally::default();

  for (i, row) in rows.iter().enumerate() {
    let outcome = apply_row(api, ctx, row, dry_run);
    let label = format!("[{}/{}] {}", i + 1, total, row.full_name);

    match outcome {
      RowOutcome::Skipped => {
        tracing::info!("{} - SKIP (not marked YES)", label);
        tally.skipped += 1;
      }
      RowOutcome::AlreadyProtected => {
        tracing::info!("{} - SKIP (already protected)", label);
        tally.already_protected += 1;
      }
      RowOutcome::WouldApply => {
        tracing::info!("{} - [DRY RUN] Would apply ruleset", label);
        tally.applied += 1;
      }
      RowOutcome::Applied => {
        tracing::info!("{} - SUCCESS", label);
        tally.applied += 1;
      }
      RowOutcome::Failed(error) => {
        tracing::warn!(%error, "{} - FAILED", label);
        tally.failed += 1;
      }
    }
  }

  tally
}

pub fn apply_from_csv(api: &dyn HostApi, ctx: &RunContext, path: &Path, dry_run: bool) -> Result<ApplyTally> {
  tracing::info!(path = %path.display(), "reading decisions");
  let rows = read_decisions(path)?;
  Ok(apply_rows(api, ctx, &rows, dry_run))
}
