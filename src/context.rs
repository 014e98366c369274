// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Hold the authenticated identity for the lifetime of a run
// role: context/run
// inputs: HostApi
// outputs: RunContext (immutable once established)
// invariants: No operation that needs the identity runs before establish() succeeds
// errors: FatalError::Identity when the identity call fails
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::error::FatalError;
use crate::github::HostApi;
use crate::model::Identity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
  pub identity: Identity,
}

impl RunContext {
  pub fn establish(api: &dyn HostApi) -> Result<Self, FatalError> {
    let identity = api.get_authenticated_identity().map_err(FatalError::Identity)?;
    tracing::info!(login = %identity.login, id = identity.id, "authenticated");

    Ok(Self { identity })
  }

  /// A repository counts as organization-owned when its owner is not the authenticated account.
  pub fn is_foreign_owner(&self, owner: &str) -> bool {
    owner != self.identity.login
  }
}
