// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Canned-response transport so the real API semantics run without a network
// role: github/fixture-transport
// inputs: JSON object mapping "<METHOD> <path>" to { status, body }; env GRA_TEST_FIXTURE names such a file
// outputs: RawResponse per route; a log of every request seen
// side_effects: None beyond reading the fixture file
// invariants:
// - Unknown routes answer 404 {"message": "Not Found"}
// - String bodies are returned verbatim; any other JSON body is serialized
// - Requests are recorded in arrival order, including their JSON bodies
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::transport::{Method, RawResponse, Transport};
use crate::error::ApiError;

/// Environment variable that switches the CLI onto a fixture file.
pub const FIXTURE_ENV: &str = "GRA_TEST_FIXTURE";

fn default_status() -> u16 {
  200
}

#[derive(Debug, Clone, Deserialize)]
struct CannedResponse {
  #[serde(default = "default_status")]
  status: u16,
  #[serde(default)]
  body: serde_json::Value,
}

/// Only read back by tests; the binary records without inspecting.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(not(test), allow(dead_code))]
pub struct RecordedRequest {
  pub method: Method,
  pub path: String,
  pub body: Option<serde_json::Value>,
}

pub struct FixtureTransport {
  routes: HashMap<String, CannedResponse>,
  requests: RefCell<Vec<RecordedRequest>>,
}

impl FixtureTransport {
  pub fn from_value(routes: serde_json::Value) -> Result<Self> {
    let routes: HashMap<String, CannedResponse> =
      serde_json::from_value(routes).context("fixture must map \"METHOD /path\" to {status, body}")?;
    Ok(Self { routes, requests: RefCell::new(Vec::new()) })
  }

  pub fn from_path(path: &Path) -> Result<Self> {
    let buf = std::fs::read(path).with_context(|| format!("reading fixture {}", path.display()))?;
    let v: serde_json::Value =
      serde_json::from_slice(&buf).with_context(|| format!("parsing fixture {}", path.display()))?;
    Self::from_value(v)
  }

  #[cfg(test)]
  pub fn requests(&self) -> Vec<RecordedRequest> {
    self.requests.borrow().clone()
  }

  #[cfg(test)]
  pub fn count(&self, method: Method, path_prefix: &str) -> usize {
    self
      .requests
      .borrow()
      .iter()
      .filter(|r| r.method == method && r.path.starts_with(path_prefix))
      .count()
  }
}

impl Transport for FixtureTransport {
  fn send(&self, method: Method, path: &str, body: Option<&serde_json::Value>) -> Result<RawResponse, ApiError> {
    self.requests.borrow_mut().push(RecordedRequest {
      method,
      path: path.to_string(),
      body: body.cloned(),
    });

    let key = format!("{} {}", method.as_str(), path);
    let Some(canned) = self.routes.get(&key) else {
      return Ok(RawResponse {
        status: 404,
        body: r#"{"message":"Not Found"}"#.to_string(),
      });
    };

    let body = match &canned.body {
      serde_json::Value::String(s) => s.clone(),
      other => other.to_string(),
    };

    Ok(RawResponse { status: canned.status, body })
  }
}
