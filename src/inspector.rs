// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Decide whether a repository has a ruleset governing its default branch
// role: scan/inspector
// inputs: HostApi, owner, repository name, default branch
// outputs: ProtectionStatus
// side_effects: One list call plus one detail call per ruleset until the first match
// invariants:
// - Scan order is the listing order; the first matching detail wins
// - A failed list call yields Unknown, never Unprotected
// - A failed detail call is skipped without surfacing (may under-report protection)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::github::HostApi;
use crate::model::ProtectionStatus;

pub fn inspect_default_branch(api: &dyn HostApi, owner: &str, repo: &str, default_branch: &str) -> ProtectionStatus {
  let summaries = match api.list_rulesets(owner, repo) {
    Ok(s) => s,
    Err(e) => return ProtectionStatus::Unknown { error: e.to_string() },
  };

  // The list endpoint omits conditions; only the detail carries ref_name.include.
  for summary in summaries {
    let detail = match api.get_ruleset(owner, repo, summary.id) {
      Ok(d) => d,
      Err(e) => {
        tracing::debug!(owner, repo, ruleset_id = summary.id, error = %e, "skipping unreadable ruleset");
        continue;
      }
    };

    if detail.targets_default_branch(default_branch) {
      return ProtectionStatus::Protected(detail);
    }
  }

  ProtectionStatus::Unprotected
}
