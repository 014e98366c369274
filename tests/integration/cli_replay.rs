use predicates::prelude::*;
use serde_json::json;
use test_support;

const HEADER: &str =
  "repo_name,full_name,default_branch,html_url,has_ruleset,ruleset_name,enforcement,action_taken,error,apply_protection";

fn routes() -> serde_json::Value {
  json!({
    "GET /user": {"body": {"login": "octo", "id": 12345}},
    "POST /repos/octo/app/rulesets": {"status": 201, "body": {"id": 1, "name": "default-branch-protection"}},
    "POST /repos/acme/svc/rulesets": {"status": 403, "body": "Resource not accessible by integration"}
  })
}

fn write_decisions(dir: &std::path::Path, rows: &[&str]) -> std::path::PathBuf {
  let path = dir.join("decisions.csv");
  let mut text = format!("{HEADER}\n");
  for r in rows {
    text.push_str(r);
    text.push('\n');
  }
  std::fs::write(&path, text).unwrap();
  path
}

#[test]
fn replay_applies_yes_rows_only() {
  let td = test_support::tempdir();
  let fixture = test_support::write_routes(td.path(), &routes());
  let csv = write_decisions(
    td.path(),
    &[
      "app,octo/app,main,https://github.com/octo/app,False,,,,,YES",
      "lib,octo/lib,main,https://github.com/octo/lib,False,,,,,NO",
    ],
  );
  let before = std::fs::read_to_string(&csv).unwrap();

  test_support::fixture_cmd(&fixture)
    .arg("--from-csv")
    .arg(&csv)
    .assert()
    .success()
    .stdout(predicate::str::contains("Applied:           1"))
    .stdout(predicate::str::contains("Skipped (NO):      1"))
    .stdout(predicate::str::contains("Already protected: 0"))
    .stdout(predicate::str::contains("Failed:            0"));

  assert_eq!(std::fs::read_to_string(&csv).unwrap(), before, "decision file is never rewritten");
}

#[test]
fn replay_counts_protected_and_failures() {
  let td = test_support::tempdir();
  let fixture = test_support::write_routes(td.path(), &routes());
  let csv = write_decisions(
    td.path(),
    &[
      "app,octo/app,main,https://github.com/octo/app,True,guard,active,,, yes ",
      "svc,acme/svc,main,https://github.com/acme/svc,,,,,500: boom,Yes",
    ],
  );

  test_support::fixture_cmd(&fixture)
    .args(["-f"])
    .arg(&csv)
    .assert()
    .success()
    .stdout(predicate::str::contains("Already protected: 1"))
    .stdout(predicate::str::contains("Failed:            1"));
}

#[test]
fn replay_dry_run_sends_nothing() {
  let td = test_support::tempdir();
  // No POST routes: any creation request would come back 404 and count as failed.
  let fixture = test_support::write_routes(td.path(), &json!({"GET /user": {"body": {"login": "octo", "id": 1}}}));
  let csv = write_decisions(td.path(), &["app,octo/app,main,,False,,,,,YES"]);

  test_support::fixture_cmd(&fixture)
    .arg("--from-csv")
    .arg(&csv)
    .arg("--dry-run")
    .assert()
    .success()
    .stdout(predicate::str::contains("Applied:           1"))
    .stdout(predicate::str::contains("Failed:            0"));
}

#[test]
fn scan_output_feeds_replay() {
  let td = test_support::tempdir();
  let fixture = test_support::fixture_path("user_scan.json");

  test_support::fixture_cmd(&fixture)
    .args(["--username", "octo", "-v", "all", "--output-dir"])
    .arg(td.path())
    .assert()
    .success();

  let csv = test_support::manifest_file(td.path(), "csv");
  test_support::fixture_cmd(&fixture)
    .arg("--from-csv")
    .arg(&csv)
    .assert()
    .success()
    .stdout(predicate::str::contains("Applied:           1"))
    .stdout(predicate::str::contains("Skipped (NO):      1"));
}
