// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the host API payloads (identity, repositories, rulesets) and the per-repository audit types
// role: model/types
// outputs: Serde structs with the host's field names; ProtectionStatus and ActionTaken enums
// invariants:
// - Unknown fields in host payloads are ignored; optional host fields default rather than fail
// - ProtectionStatus::Unknown is never folded into Unprotected by the model itself
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::{Deserialize, Serialize};

/// Include pattern GitHub resolves to whatever the repository's default branch is.
pub const DEFAULT_BRANCH_SENTINEL: &str = "~DEFAULT_BRANCH";

/// Branch name assumed when the host reports none (e.g. empty repositories).
pub const FALLBACK_DEFAULT_BRANCH: &str = "main";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Identity {
  pub login: String,
  pub id: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OwnerRef {
  pub login: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
  pub name: String,
  pub full_name: String,
  pub owner: OwnerRef,
  #[serde(default)]
  pub default_branch: Option<String>,
  #[serde(default)]
  pub html_url: String,
  #[serde(default)]
  pub private: bool,
  #[serde(default)]
  pub archived: bool,
  #[serde(default)]
  pub fork: bool,
}

impl RepositoryRef {
  pub fn default_branch(&self) -> &str {
    self.default_branch.as_deref().unwrap_or(FALLBACK_DEFAULT_BRANCH)
  }
}

/// Whose repositories are listed; selects the listing endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
  User,
  Organization,
}

impl OwnerKind {
  pub fn is_org(self) -> bool {
    matches!(self, OwnerKind::Organization)
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
  #[default]
  Public,
  Private,
  All,
}

impl Visibility {
  pub fn as_str(self) -> &'static str {
    match self {
      Visibility::Public => "public",
      Visibility::Private => "private",
      Visibility::All => "all",
    }
  }

  pub fn admits(self, private: bool) -> bool {
    match self {
      Visibility::Public => !private,
      Visibility::Private => private,
      Visibility::All => true,
    }
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RulesetSummary {
  pub id: u64,
  #[serde(default)]
  pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Rule {
  #[serde(rename = "type")]
  pub kind: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub parameters: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
  User,
  RepositoryRole,
  Team,
  Integration,
  OrganizationAdmin,
  DeployKey,
  #[serde(other)]
  Other,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BypassMode {
  Always,
  PullRequest,
  Exempt,
  #[serde(other)]
  Other,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BypassActor {
  #[serde(default)]
  pub actor_id: Option<u64>,
  pub actor_type: ActorKind,
  pub bypass_mode: BypassMode,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct RefNameCondition {
  #[serde(default)]
  pub include: Vec<String>,
  #[serde(default)]
  pub exclude: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct RulesetConditions {
  #[serde(default)]
  pub ref_name: RefNameCondition,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RulesetDetail {
  pub id: u64,
  pub name: String,
  #[serde(default)]
  pub enforcement: String,
  #[serde(default)]
  pub rules: Vec<Rule>,
  #[serde(default)]
  pub bypass_actors: Vec<BypassActor>,
  #[serde(default)]
  pub conditions: Option<RulesetConditions>,
}

impl RulesetDetail {
  pub fn includes(&self) -> &[String] {
    self.conditions.as_ref().map(|c| c.ref_name.include.as_slice()).unwrap_or(&[])
  }

  /// True when the include set names the sentinel, `refs/heads/<branch>` or the bare branch.
  pub fn targets_default_branch(&self, default_branch: &str) -> bool {
    let qualified = format!("refs/heads/{}", default_branch);

    self
      .includes()
      .iter()
      .any(|inc| inc == DEFAULT_BRANCH_SENTINEL || *inc == qualified || inc == default_branch)
  }
}

/// Body of a create-ruleset request.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NewRuleset {
  pub name: String,
  pub target: String,
  pub enforcement: String,
  pub conditions: RulesetConditions,
  pub rules: Vec<Rule>,
  pub bypass_actors: Vec<BypassActor>,
}

/// Outcome of inspecting one repository.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtectionStatus {
  Protected(RulesetDetail),
  Unprotected,
  /// The check itself failed; says nothing about the repository's protection.
  Unknown { error: String },
}

impl ProtectionStatus {
  pub fn has_ruleset(&self) -> Option<bool> {
    match self {
      ProtectionStatus::Protected(_) => Some(true),
      ProtectionStatus::Unprotected => Some(false),
      ProtectionStatus::Unknown { .. } => None,
    }
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionTaken {
  DryRunWouldCreate,
  RulesetCreated,
  CreationFailed,
}

impl ActionTaken {
  pub fn as_str(self) -> &'static str {
    match self {
      ActionTaken::DryRunWouldCreate => "dry_run_would_create",
      ActionTaken::RulesetCreated => "ruleset_created",
      ActionTaken::CreationFailed => "creation_failed",
    }
  }
}
