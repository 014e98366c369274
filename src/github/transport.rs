// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: One-request-at-a-time HTTP transport for the GitHub REST API
// role: github/transport
// inputs: base URL, bearer token, method + path (+ optional JSON body)
// outputs: RawResponse { status, body } for every HTTP answer, including non-2xx
// side_effects: Network calls to the configured API host
// invariants:
// - Every request carries Authorization, Accept, X-GitHub-Api-Version and User-Agent headers
// - Non-2xx statuses are returned as data, never as transport errors
// - No timeout, retry or backoff is layered on top of ureq's defaults
// errors: Connection-level failures become ApiError::Transport
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::error::ApiError;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("github-ruleset-auditor/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
  Get,
  Post,
}

impl Method {
  pub fn as_str(self) -> &'static str {
    match self {
      Method::Get => "GET",
      Method::Post => "POST",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
  pub status: u16,
  pub body: String,
}

impl RawResponse {
  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }
}

/// Sends a single request and hands back whatever the host answered.
pub trait Transport {
  fn send(&self, method: Method, path: &str, body: Option<&serde_json::Value>) -> Result<RawResponse, ApiError>;
}

pub struct HttpTransport {
  agent: ureq::Agent,
  base_url: String,
  token: String,
}

impl HttpTransport {
  pub fn new(base_url: &str, token: String) -> Self {
    Self {
      agent: ureq::AgentBuilder::new().build(),
      base_url: base_url.trim_end_matches('/').to_string(),
      token,
    }
  }
}

impl Transport for HttpTransport {
  fn send(&self, method: Method, path: &str, body: Option<&serde_json::Value>) -> Result<RawResponse, ApiError> {
    let url = format!("{}{}", self.base_url, path);
    tracing::debug!(method = method.as_str(), %url, "github request");

    let req = self
      .agent
      .request(method.as_str(), &url)
      .set("Accept", "application/vnd.github+json")
      .set("X-GitHub-Api-Version", API_VERSION)
      .set("User-Agent", USER_AGENT)
      .set("Authorization", &format!("Bearer {}", self.token));

    let result = match body {
      Some(json) => req.send_json(json),
      None => req.call(),
    };

    match result {
      Ok(resp) => {
        let status = resp.status();
        let body = resp.into_string().map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(RawResponse { status, body })
      }
      Err(ureq::Error::Status(status, resp)) => Ok(RawResponse {
        status,
        body: resp.into_string().unwrap_or_default(),
      }),
      Err(ureq::Error::Transport(t)) => Err(ApiError::Transport(t.to_string())),
    }
  }
}
