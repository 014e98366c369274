// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: GitHub REST operations used by the auditor (identity, repositories, rulesets) behind a trait seam
// role: github/api
// inputs: Transport implementation (HTTP or fixture); owner/repo identifiers; ruleset documents
// outputs: Typed payloads from crate::model or ApiError
// side_effects: Whatever the transport does (network for HttpTransport)
// invariants:
// - list_rulesets maps 404 to an empty list (rulesets unavailable is not an error)
// - create_ruleset accepts 200 and 201; every other operation accepts 200 only
// - An accepted create whose body cannot be decoded is still a creation (Ok(None)), never an error
// - Token discovery prefers an explicit value, then GITHUB_TOKEN; blanks count as absent
// errors: ApiError::{Status, Transport, Decode}; callers decide whether they are fatal
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod fixture;
pub mod transport;

use std::path::PathBuf;

use anyhow::Result;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::model::{Identity, NewRuleset, OwnerKind, RepositoryRef, RulesetDetail, RulesetSummary, Visibility};
use fixture::{FixtureTransport, FIXTURE_ENV};
use transport::{HttpTransport, Method, RawResponse, Transport};

pub const PER_PAGE: u32 = 100;

// --- Trait seam for the host API ---
pub trait HostApi {
  fn get_authenticated_identity(&self) -> Result<Identity, ApiError>;
  fn list_repositories(
    &self,
    owner: &str,
    kind: OwnerKind,
    visibility: Visibility,
    page: u32,
  ) -> Result<Vec<RepositoryRef>, ApiError>;
  fn get_repository(&self, owner: &str, name: &str) -> Result<RepositoryRef, ApiError>;
  fn list_rulesets(&self, owner: &str, repo: &str) -> Result<Vec<RulesetSummary>, ApiError>;
  fn get_ruleset(&self, owner: &str, repo: &str, id: u64) -> Result<RulesetDetail, ApiError>;
  /// `Ok(None)` means the host accepted the ruleset but its response body was unreadable.
  fn create_ruleset(&self, owner: &str, repo: &str, document: &NewRuleset)
    -> Result<Option<RulesetDetail>, ApiError>;
}

/// Path (with query) of one page of an owner's repository listing.
///
/// The users endpoint only understands `all|owner|member`, so user listings ask for
/// `owner` and leave visibility to the client-side filter.
pub fn repositories_path(owner: &str, kind: OwnerKind, visibility: Visibility, page: u32) -> String {
  match kind {
    OwnerKind::Organization => format!(
      "/orgs/{}/repos?type={}&per_page={}&page={}",
      owner,
      visibility.as_str(),
      PER_PAGE,
      page
    ),
    OwnerKind::User => format!("/users/{}/repos?type=owner&per_page={}&page={}", owner, PER_PAGE, page),
  }
}

pub fn rulesets_path(owner: &str, repo: &str) -> String {
  format!("/repos/{}/{}/rulesets", owner, repo)
}

fn expect_status(resp: RawResponse, accepted: &[u16]) -> Result<RawResponse, ApiError> {
  if resp.is_success() && accepted.contains(&resp.status) {
    Ok(resp)
  } else {
    Err(ApiError::Status { status: resp.status, body: resp.body })
  }
}

fn decode<T: DeserializeOwned>(resp: &RawResponse) -> Result<T, ApiError> {
  serde_json::from_str(&resp.body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// REST semantics over any transport.
pub struct GithubApi<T: Transport> {
  transport: T,
}

impl<T: Transport> GithubApi<T> {
  pub fn new(transport: T) -> Self {
    Self { transport }
  }

  #[cfg(test)]
  pub fn transport(&self) -> &T {
    &self.transport
  }

  fn get<D: DeserializeOwned>(&self, path: &str) -> Result<D, ApiError> {
    let resp = expect_status(self.transport.send(Method::Get, path, None)?, &[200])?;
    decode(&resp)
  }
}

impl<T: Transport> HostApi for GithubApi<T> {
  fn get_authenticated_identity(&self) -> Result<Identity, ApiError> {
    self.get("/user")
  }

  fn list_repositories(
    &self,
    owner: &str,
    kind: OwnerKind,
    visibility: Visibility,
    page: u32,
  ) -> Result<Vec<RepositoryRef>, ApiError> {
    self.get(&repositories_path(owner, kind, visibility, page))
  }

  fn get_repository(&self, owner: &str, name: &str) -> Result<RepositoryRef, ApiError> {
    self.get(&format!("/repos/{}/{}", owner, name))
  }

  fn list_rulesets(&self, owner: &str, repo: &str) -> Result<Vec<RulesetSummary>, ApiError> {
    let resp = self.transport.send(Method::Get, &rulesets_path(owner, repo), None)?;

    if resp.status == 404 {
      return Ok(Vec::new());
    }

    decode(&expect_status(resp, &[200])?)
  }

  fn get_ruleset(&self, owner: &str, repo: &str, id: u64) -> Result<RulesetDetail, ApiError> {
    self.get(&format!("{}/{}", rulesets_path(owner, repo), id))
  }

  fn create_ruleset(
    &self,
    owner: &str,
    repo: &str,
    document: &NewRuleset,
  ) -> Result<Option<RulesetDetail>, ApiError> {
    let body = serde_json::to_value(document).map_err(|e| ApiError::Decode(e.to_string()))?;
    let resp = self.transport.send(Method::Post, &rulesets_path(owner, repo), Some(&body))?;
    let resp = expect_status(resp, &[200, 201])?;

    match decode(&resp) {
      Ok(created) => Ok(Some(created)),
      Err(e) => {
        tracing::warn!(owner, repo, status = resp.status, error = %e, "ruleset created but response body was unreadable");
        Ok(None)
      }
    }
  }
}

/// Resolve the credential: explicit value first, then `GITHUB_TOKEN`.
pub fn resolve_token(explicit: Option<&str>) -> Option<String> {
  if let Some(t) = explicit {
    if !t.trim().is_empty() {
      return Some(t.to_string());
    }
  }

  match std::env::var("GITHUB_TOKEN") {
    Ok(t) if !t.trim().is_empty() => Some(t),
    _ => None,
  }
}

pub fn fixture_from_env() -> Option<PathBuf> {
  std::env::var_os(FIXTURE_ENV).filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Select the backend: a fixture file when `GRA_TEST_FIXTURE` is set, HTTP otherwise.
pub fn build_api(api_url: &str, token: String) -> Result<Box<dyn HostApi>> {
  if let Some(path) = fixture_from_env() {
    tracing::debug!(fixture = %path.display(), "using fixture transport");
    return Ok(Box::new(GithubApi::new(FixtureTransport::from_path(&path)?)));
  }

  Ok(Box::new(GithubApi::new(HttpTransport::new(api_url, token))))
}
