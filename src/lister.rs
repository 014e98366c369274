// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Page through an owner's repositories and keep the ones eligible for auditing
// role: scan/lister
// inputs: HostApi, owner, OwnerKind, Visibility
// outputs: Listing { repositories in API order, interrupting error if a page failed }
// side_effects: Network calls (one per page, sequential); info logs per page
// invariants:
// - Archived and forked repositories are dropped before the visibility filter, for every visibility
// - Paging starts at 1 and stops at the first empty page
// errors: The first page error stops paging; earlier pages are kept
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::error::ApiError;
use crate::github::HostApi;
use crate::model::{OwnerKind, RepositoryRef, Visibility};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct PageOutcome {
  pub kept: Vec<RepositoryRef>,
  pub archived: usize,
  pub forked: usize,
}

/// Apply the lifecycle and visibility filters to one page.
pub fn filter_page(page: Vec<RepositoryRef>, visibility: Visibility) -> PageOutcome {
  let archived = page.iter().filter(|r| r.archived).count();
  let forked = page.iter().filter(|r| r.fork).count();

  let kept = page
    .into_iter()
    .filter(|r| !r.archived && !r.fork)
    .filter(|r| visibility.admits(r.private))
    .collect();

  PageOutcome { kept, archived, forked }
}

#[derive(Debug, Default)]
pub struct Listing {
  pub repositories: Vec<RepositoryRef>,
  /// Set when a page request failed; `repositories` then holds the pages before it.
  pub interrupted: Option<ApiError>,
}

pub fn list_eligible_repositories(
  api: &dyn HostApi,
  owner: &str,
  kind: OwnerKind,
  visibility: Visibility,
) -> Listing {
  tracing::info!(owner, ?kind, visibility = visibility.as_str(), "fetching repositories");

  let mut repos = Vec::new();
  let mut interrupted = None;
  let mut page = 1;

  loop {
    let batch = match api.list_repositories(owner, kind, visibility, page) {
      Ok(b) => b,
      Err(e) => {
        tracing::warn!(page, "Error fetching repos: {}", e);
        interrupted = Some(e);
        break;
      }
    };
    if batch.is_empty() {
      break;
    }

    let outcome = filter_page(batch, visibility);
    tracing::info!(
      page,
      kept = outcome.kept.len(),
      archived = outcome.archived,
      forked = outcome.forked,
      "repository page"
    );

    repos.extend(outcome.kept);
    page += 1;
  }

  tracing::info!(total = repos.len(), "eligible repositories");
  Listing { repositories: repos, interrupted }
}
