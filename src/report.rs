// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Render human-readable summaries for stdout
// role: rendering/console
// inputs: Manifest + ManifestPaths, ApplyTally, SingleOutcome, RunContext
// outputs: Plain-text blocks (no trailing newline handling beyond println!)
// side_effects: None; callers print
// invariants:
// - "Without ruleset" list excludes unknown entries and entries created this run
// - Counts are read from the manifest, never recomputed differently
// - An interrupted listing is always called out
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt::Write as _;

use crate::audit::{SingleAction, SingleOutcome};
use crate::context::RunContext;
use crate::creator::REQUIRED_APPROVALS;
use crate::manifest::{Manifest, ManifestPaths};
use crate::model::{ActionTaken, ProtectionStatus};
use crate::replay::ApplyTally;

const RULE: &str = "======================================================================";

fn banner(out: &mut String, title: &str) {
  let _ = writeln!(out, "{}", RULE);
  let _ = writeln!(out, "{}", title);
  let _ = writeln!(out, "{}", RULE);
}

pub fn created_this_run(manifest: &Manifest) -> usize {
  manifest
    .repositories
    .iter()
    .filter(|e| e.action_taken == Some(ActionTaken::RulesetCreated))
    .count()
}

/// Full names still lacking a ruleset after this run.
pub fn still_unprotected(manifest: &Manifest) -> Vec<&str> {
  manifest
    .repositories
    .iter()
    .filter(|e| e.has_ruleset == Some(false) && e.action_taken != Some(ActionTaken::RulesetCreated))
    .map(|e| e.full_name.as_str())
    .collect()
}

pub fn policy_description(ctx: &RunContext) -> String {
  let mut out = String::new();
  banner(&mut out, "RULESET CONFIGURATION");
  let _ = writeln!(out, "Bypass actor: {} (you can push/merge freely)", ctx.identity.login);
  let _ = writeln!(out, "Rules applied to others:");
  let _ = writeln!(out, "  - Cannot delete default branch");
  let _ = writeln!(out, "  - Cannot force push");
  let _ = writeln!(out, "  - Must open PR with {} approval", REQUIRED_APPROVALS);
  out
}

pub fn audit_summary(ctx: &RunContext, manifest: &Manifest, paths: &ManifestPaths) -> String {
  let counts = manifest.counts();
  let mut out = String::new();

  let _ = writeln!(out, "Manifest saved:");
  let _ = writeln!(out, "  JSON: {}", paths.json.display());
  let _ = writeln!(out, "  CSV:  {}", paths.csv.display());
  let _ = writeln!(out);

  banner(&mut out, "SUMMARY");
  let _ = writeln!(out, "Authenticated as: {} (ID: {})", ctx.identity.login, ctx.identity.id);
  let _ = writeln!(out);
  let _ = writeln!(out, "Total repositories scanned: {}", manifest.total_repos);
  let _ = writeln!(out, "  With ruleset:    {}", counts.with_ruleset);
  let _ = writeln!(out, "  Without ruleset: {}", counts.without_ruleset);
  let _ = writeln!(out, "  Errors:          {}", counts.errors);

  if let Some(err) = &manifest.listing_error {
    let _ = writeln!(out);
    let _ = writeln!(out, "Listing incomplete: {}", err);
    let _ = writeln!(out, "  Only repositories from pages fetched before the failure were checked.");
  }

  let created = created_this_run(manifest);
  if created > 0 {
    let _ = writeln!(out);
    let _ = writeln!(out, "  Rulesets created this run: {}", created);
  }

  let pending = still_unprotected(manifest);
  if !pending.is_empty() {
    let _ = writeln!(out);
    let _ = writeln!(out, "Repositories without rulesets:");
    for name in pending {
      let _ = writeln!(out, "  - {}", name);
    }
  }

  let _ = writeln!(out);
  out.push_str(&policy_description(ctx));
  out
}

pub fn replay_summary(tally: &ApplyTally) -> String {
  let mut out = String::new();
  banner(&mut out, "APPLY FROM CSV SUMMARY");
  let _ = writeln!(out, "Applied:           {}", tally.applied);
  let _ = writeln!(out, "Skipped (NO):      {}", tally.skipped);
  let _ = writeln!(out, "Already protected: {}", tally.already_protected);
  let _ = writeln!(out, "Failed:            {}", tally.failed);
  out
}

pub fn single_summary(outcome: &SingleOutcome) -> String {
  let mut out = String::new();
  let repo = &outcome.repository;

  let _ = writeln!(out, "Repository: {}", repo.full_name);
  let _ = writeln!(out, "Default branch: {}", repo.default_branch());

  match &outcome.status {
    ProtectionStatus::Protected(d) => {
      let _ = writeln!(out, "Status: Already has ruleset '{}'", d.name);
    }
    ProtectionStatus::Unprotected => {
      let _ = writeln!(out, "Status: No ruleset");
    }
    ProtectionStatus::Unknown { error } => {
      let _ = writeln!(out, "Status: Unknown ({})", error);
    }
  }

  let action = match &outcome.action {
    SingleAction::NotRequested => None,
    SingleAction::AlreadyProtected => Some("Skipping - ruleset already exists".to_string()),
    SingleAction::StatusUnknown => Some("Skipping - ruleset status could not be determined".to_string()),
    SingleAction::WouldCreate => Some("[DRY RUN] Would create ruleset".to_string()),
    SingleAction::Created(Some(d)) => Some(format!("SUCCESS: Ruleset created (id {})", d.id)),
    SingleAction::Created(None) => Some("SUCCESS: Ruleset created".to_string()),
    SingleAction::Failed(e) => Some(format!("FAILED: {}", e)),
  };

  if let Some(line) = action {
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", line);
  }

  out
}
