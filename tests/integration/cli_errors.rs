use predicates::prelude::*;
use serde_json::json;
use test_support;

#[test]
fn missing_token_exits_one_with_guidance() {
  let mut cmd = test_support::cmd_bin(test_support::BIN);
  cmd
    .args(["--username", "octo"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("GitHub token required"))
    .stderr(predicate::str::contains("https://github.com/settings/tokens"));
}

#[test]
fn blank_env_token_counts_as_missing() {
  let mut cmd = test_support::cmd_bin(test_support::BIN);
  cmd.env("GITHUB_TOKEN", "  ").args(["--org", "acme"]).assert().code(1);
}

#[test]
fn missing_csv_exits_one() {
  let td = test_support::tempdir();
  let fixture = test_support::fixture_path("user_scan.json");
  test_support::fixture_cmd(&fixture)
    .arg("--from-csv")
    .arg(td.path().join("nope.csv"))
    .assert()
    .code(1)
    .stderr(predicate::str::contains("CSV file not found"));
}

#[test]
fn identity_failure_exits_one() {
  let td = test_support::tempdir();
  let fixture = test_support::write_routes(td.path(), &json!({"GET /user": {"status": 401, "body": "Bad credentials"}}));
  test_support::fixture_cmd(&fixture)
    .args(["--username", "octo"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("Error getting authenticated user: 401: Bad credentials"));
}

#[test]
fn listing_failure_is_logged_and_still_writes_a_manifest() {
  let td = test_support::tempdir();
  let fixture = test_support::write_routes(td.path(), &json!({"GET /user": {"body": {"login": "octo", "id": 1}}}));
  let out = td.path().join("out");
  test_support::fixture_cmd(&fixture)
    .args(["--org", "ghost-org", "--output-dir"])
    .arg(&out)
    .assert()
    .success()
    .stderr(predicate::str::contains("Error fetching repos: 404"))
    .stdout(predicate::str::contains("Total repositories scanned: 0"))
    .stdout(predicate::str::contains("Listing incomplete: 404"));

  let json = test_support::manifest_file(&out, "json");
  let v: serde_json::Value = serde_json::from_slice(&std::fs::read(json).unwrap()).unwrap();
  assert_eq!(v["repositories"], json!([]));
  assert_eq!(v["listing_complete"], false);
  assert!(v["listing_error"].as_str().unwrap().starts_with("404: "));
}

#[test]
fn per_repository_failures_still_exit_zero() {
  let td = test_support::tempdir();
  let fixture = test_support::write_routes(
    td.path(),
    &json!({
      "GET /user": {"body": {"login": "octo", "id": 1}},
      "GET /users/octo/repos?type=owner&per_page=100&page=1": {"body": [
        {"name": "app", "full_name": "octo/app", "owner": {"login": "octo"}, "html_url": "", "private": false}
      ]},
      "GET /users/octo/repos?type=owner&per_page=100&page=2": {"body": []},
      "GET /repos/octo/app/rulesets": {"status": 500, "body": "Internal Server Error"}
    }),
  );
  test_support::fixture_cmd(&fixture)
    .args(["--username", "octo", "--apply", "--output-dir"])
    .arg(td.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("Errors:          1"));
}

#[test]
fn repo_with_csv_is_rejected() {
  let mut cmd = test_support::cmd_bin(test_support::BIN);
  cmd
    .args(["--from-csv", "d.csv", "--repo", "app", "--token", "t"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("--repo cannot be combined with --from-csv"));
}
