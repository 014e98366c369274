// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Drive lister -> inspector -> (optional) creator over an owner's repositories; single-repo diagnostic
// role: processing/orchestrator
// inputs: HostApi, RunContext, AuditOptions
// outputs: Manifest (scan) or SingleOutcome (one repository)
// side_effects: Network calls; creation calls only when apply is on and dry_run is off
// invariants:
// - Entries follow listing order; one entry per eligible repository
// - Creation is attempted only for ProtectionStatus::Unprotected (never for Unknown)
// - A per-repository failure never aborts the loop
// errors: A failed listing page truncates the scan and is recorded on the manifest; FatalError::RepositoryLookup in single mode
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};

use crate::context::RunContext;
use crate::creator::create_default_ruleset;
use crate::error::{ApiError, FatalError};
use crate::github::HostApi;
use crate::inspector::inspect_default_branch;
use crate::lister::list_eligible_repositories;
use crate::manifest::{Manifest, ManifestEntry};
use crate::model::{OwnerKind, ProtectionStatus, RepositoryRef, RulesetDetail, Visibility};
use crate::util;

#[derive(Debug, Clone)]
pub struct AuditOptions {
  pub owner: String,
  pub kind: OwnerKind,
  pub visibility: Visibility,
  pub apply: bool,
  pub dry_run: bool,
  pub now_override: Option<DateTime<Utc>>,
}

pub fn run_audit(api: &dyn HostApi, ctx: &RunContext, opts: &AuditOptions) -> Manifest {
  let listing = list_eligible_repositories(api, &opts.owner, opts.kind, opts.visibility);
  let entries = audit_repositories(api, ctx, &listing.repositories, opts);

  let mut manifest = Manifest::assemble(
    ctx,
    &opts.owner,
    opts.kind,
    opts.visibility,
    entries,
    util::effective_now(opts.now_override),
  );
  if let Some(err) = &listing.interrupted {
    manifest.record_listing_interruption(err);
  }
  manifest
}

pub fn audit_repositories(
  api: &dyn HostApi,
  ctx: &RunContext,
  repos: &[RepositoryRef],
  opts: &AuditOptions,
) -> Vec<ManifestEntry> {
  let total = repos.len();
  tracing::info!(total, "checking ruleset status");

  repos
    .iter()
    .enumerate()
    .map(|(i, repo)| {
      tracing::info!(
        "[{}/{}] {} (branch: {})",
        i + 1,
        total,
        repo.full_name,
        repo.default_branch()
      );
      audit_repository(api, ctx, repo, opts)
    })
    .collect()
}

pub fn audit_repository(
  api: &dyn HostApi,
  ctx: &RunContext,
  repo: &RepositoryRef,
  opts: &AuditOptions,
) -> ManifestEntry {
  let owner = repo.owner.login.as_str();
  let status = inspect_default_branch(api, owner, &repo.name, repo.default_branch());
  let checked_at = util::iso_utc(util::effective_now(opts.now_override));
  let mut entry = ManifestEntry::from_status(repo, &status, checked_at);

  match &status {
    ProtectionStatus::Unprotected if opts.apply => {
      if opts.dry_run {
        tracing::info!(repo = %repo.full_name, "[DRY RUN] would create ruleset");
        entry.record_dry_run();
      } else {
        match create_default_ruleset(api, ctx, owner, &repo.name, opts.kind.is_org()) {
          Ok(created) => {
            tracing::info!(repo = %repo.full_name, ruleset_id = ?created.as_ref().map(|d| d.id), "ruleset created");
            entry.record_created(created.as_ref());
          }
          Err(e) => {
            tracing::warn!(repo = %repo.full_name, status = ?e.status(), error = %e, "ruleset creation failed");
            entry.record_creation_failure(&e);
          }
        }
      }
    }
    ProtectionStatus::Unprotected => tracing::info!(repo = %repo.full_name, "no ruleset"),
    ProtectionStatus::Protected(d) => {
      tracing::info!(repo = %repo.full_name, ruleset = %d.name, enforcement = %d.enforcement, "has ruleset")
    }
    ProtectionStatus::Unknown { error } => {
      tracing::warn!(repo = %repo.full_name, %error, "ruleset check failed")
    }
  }

  entry
}

/// What the single-repository diagnostic did after inspecting.
#[derive(Debug, Clone, PartialEq)]
pub enum SingleAction {
  NotRequested,
  AlreadyProtected,
  StatusUnknown,
  WouldCreate,
  /// Holds the host's copy of the ruleset when its response could be read.
  Created(Option<RulesetDetail>),
  Failed(ApiError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SingleOutcome {
  pub repository: RepositoryRef,
  pub status: ProtectionStatus,
  pub action: SingleAction,
}

pub fn audit_single(
  api: &dyn HostApi,
  ctx: &RunContext,
  name: &str,
  opts: &AuditOptions,
) -> Result<SingleOutcome, FatalError> {
  let repository = api.get_repository(&opts.owner, name).map_err(|source| FatalError::RepositoryLookup {
    full_name: format!("{}/{}", opts.owner, name),
    source,
  })?;

  // Transferred or renamed repositories resolve to where they live now.
  let owner = repository.owner.login.as_str();
  let status = inspect_default_branch(api, owner, &repository.name, repository.default_branch());

  let action = match (&status, opts.apply) {
    (_, false) => SingleAction::NotRequested,
    (ProtectionStatus::Protected(_), true) => SingleAction::AlreadyProtected,
    (ProtectionStatus::Unknown { .. }, true) => SingleAction::StatusUnknown,
    (ProtectionStatus::Unprotected, true) if opts.dry_run => SingleAction::WouldCreate,
    (ProtectionStatus::Unprotected, true) => {
      match create_default_ruleset(api, ctx, owner, &repository.name, opts.kind.is_org()) {
        Ok(created) => SingleAction::Created(created),
        Err(e) => SingleAction::Failed(e),
      }
    }
  };

  Ok(SingleOutcome { repository, status, action })
}
