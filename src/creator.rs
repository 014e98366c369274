// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Build and submit the fixed default-branch protection ruleset
// role: enforce/creator
// inputs: HostApi, RunContext (identity id for org bypass), owner, repository, is_org
// outputs: Created RulesetDetail or ApiError
// side_effects: One POST per call
// invariants:
// - The document always carries exactly one bypass actor
// - is_org => User actor with the authenticated id; otherwise RepositoryRole 5 (Maintain)
// - No existence check here; callers only invoke it for unprotected repositories
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde_json::json;

use crate::context::RunContext;
use crate::error::ApiError;
use crate::github::HostApi;
use crate::model::{
  ActorKind, BypassActor, BypassMode, NewRuleset, RefNameCondition, Rule, RulesetConditions, RulesetDetail,
  DEFAULT_BRANCH_SENTINEL,
};

pub const RULESET_NAME: &str = "default-branch-protection";

/// Repository role id GitHub assigns to "Maintain" (1 Read, 2 Triage, 4 Write, 5 Maintain).
pub const MAINTAIN_ROLE_ID: u64 = 5;

pub const REQUIRED_APPROVALS: u32 = 1;

pub fn bypass_actor_for(ctx: &RunContext, is_org: bool) -> BypassActor {
  if is_org {
    BypassActor {
      actor_id: Some(ctx.identity.id),
      actor_type: ActorKind::User,
      bypass_mode: BypassMode::Always,
    }
  } else {
    BypassActor {
      actor_id: Some(MAINTAIN_ROLE_ID),
      actor_type: ActorKind::RepositoryRole,
      bypass_mode: BypassMode::Always,
    }
  }
}

pub fn default_policy(ctx: &RunContext, is_org: bool) -> NewRuleset {
  NewRuleset {
    name: RULESET_NAME.to_string(),
    target: "branch".to_string(),
    enforcement: "active".to_string(),
    conditions: RulesetConditions {
      ref_name: RefNameCondition {
        include: vec![DEFAULT_BRANCH_SENTINEL.to_string()],
        exclude: Vec::new(),
      },
    },
    rules: vec![
      Rule { kind: "deletion".into(), parameters: None },
      Rule { kind: "non_fast_forward".into(), parameters: None },
      Rule {
        kind: "pull_request".into(),
        parameters: Some(json!({
          "required_approving_review_count": REQUIRED_APPROVALS,
          "dismiss_stale_reviews_on_push": true,
          "require_code_owner_review": false,
          "require_last_push_approval": false,
          "required_review_thread_resolution": false
        })),
      },
    ],
    bypass_actors: vec![bypass_actor_for(ctx, is_org)],
  }
}

pub fn create_default_ruleset(
  api: &dyn HostApi,
  ctx: &RunContext,
  owner: &str,
  repo: &str,
  is_org: bool,
) -> Result<Option<RulesetDetail>, ApiError> {
  let document = default_policy(ctx, is_org);
  api.create_ruleset(owner, repo, &document)
}
