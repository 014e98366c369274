// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed error values for API calls and the fatal preconditions of a run
// role: errors/types
// outputs: ApiError (per-call, recoverable), FatalError (run-ending)
// invariants:
// - ApiError::Status renders as "<status>: <body>" so manifests carry the raw host response
// - FatalError is only produced before or outside the per-repository loop
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single call against the host API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
  /// The host answered with a status the operation does not accept.
  #[error("{status}: {body}")]
  Status { status: u16, body: String },

  /// The request never produced an HTTP response (DNS, TLS, connection reset, ...).
  #[error("transport error: {0}")]
  Transport(String),

  /// A 2xx response whose body did not match the expected shape.
  #[error("unexpected response payload: {0}")]
  Decode(String),
}

impl ApiError {
  pub fn status(&self) -> Option<u16> {
    match self {
      ApiError::Status { status, .. } => Some(*status),
      _ => None,
    }
  }
}

/// Conditions under which no further work is meaningful; `main` maps these to exit code 1.
#[derive(Error, Debug)]
pub enum FatalError {
  #[error(
    "GitHub token required.\n\nSet GITHUB_TOKEN environment variable or use --token\n\n\
     Token needs these scopes:\n  - repo (for private repos)\n  - public_repo (for public repos only)\n\n\
     Create token at: https://github.com/settings/tokens"
  )]
  MissingToken,

  #[error("Error getting authenticated user: {0}")]
  Identity(ApiError),

  #[error("Could not find repo {full_name}: {source}")]
  RepositoryLookup { full_name: String, source: ApiError },

  #[error("CSV file not found: {}", .0.display())]
  MissingInput(PathBuf),
}
