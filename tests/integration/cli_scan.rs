use predicates::prelude::*;
use test_support;

fn scan(out_dir: &std::path::Path, extra: &[&str]) -> assert_cmd::assert::Assert {
  let fixture = test_support::fixture_path("user_scan.json");
  let mut cmd = test_support::fixture_cmd(&fixture);
  cmd
    .args(["--username", "octo", "--output-dir"])
    .arg(out_dir)
    .args(extra)
    .assert()
}

fn read_manifest(dir: &std::path::Path) -> serde_json::Value {
  let path = test_support::manifest_file(dir, "json");
  serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

#[test]
fn public_scan_skips_archived_forks_and_private() {
  let td = test_support::tempdir();
  let out = td.path().join("reports").join("today");

  scan(&out, &[])
    .success()
    .stdout(predicate::str::contains("Authenticated as: octo (ID: 12345)"))
    .stdout(predicate::str::contains("Total repositories scanned: 1"))
    .stdout(predicate::str::contains("Repositories without rulesets:\n  - octo/app"));

  let json = out.join("ruleset_manifest_20250815_120000.json");
  assert!(json.is_file(), "manifest named after the fixed clock");

  let v = read_manifest(&out);
  let repos = v["repositories"].as_array().unwrap();
  assert_eq!(repos.len(), 1);
  assert_eq!(repos[0]["full_name"], "octo/app");
  assert_eq!(repos[0]["has_ruleset"], false);
  assert!(repos[0]["action_taken"].is_null());
}

#[test]
fn dry_run_apply_records_intent_only() {
  let td = test_support::tempdir();

  scan(td.path(), &["--apply", "--dry-run"])
    .success()
    .stdout(predicate::str::contains("Rulesets created this run").not());

  let v = read_manifest(td.path());
  assert_eq!(v["repositories"][0]["action_taken"], "dry_run_would_create");
  assert_eq!(v["without_ruleset"], 1);

  let csv = std::fs::read_to_string(test_support::manifest_file(td.path(), "csv")).unwrap();
  assert!(csv.lines().nth(1).unwrap().ends_with(",dry_run_would_create,,YES"));
}

#[test]
fn apply_over_all_visibilities() {
  let td = test_support::tempdir();

  scan(td.path(), &["--apply", "-v", "all"])
    .success()
    .stdout(predicate::str::contains("Rulesets created this run: 1"))
    .stdout(predicate::str::contains("Repositories without rulesets").not());

  let v = read_manifest(td.path());
  assert_eq!(v["total_repos"], 2);
  assert_eq!(v["with_ruleset"], 2);

  let repos = v["repositories"].as_array().unwrap();
  assert_eq!(repos[0]["action_taken"], "ruleset_created");
  assert_eq!(repos[0]["ruleset_id"], 501);
  assert_eq!(repos[1]["full_name"], "octo/vault");
  assert_eq!(repos[1]["ruleset_name"], "trunk-guard");
  assert_eq!(repos[1]["default_branch"], "trunk");
  assert!(repos[1]["action_taken"].is_null());

  let csv = std::fs::read_to_string(test_support::manifest_file(td.path(), "csv")).unwrap();
  let vault = csv.lines().find(|l| l.starts_with("vault,")).unwrap();
  assert!(vault.ends_with(",NO"), "protected rows default to NO: {vault}");
}

#[test]
fn private_scan_keeps_only_private() {
  let td = test_support::tempdir();
  scan(td.path(), &["--visibility", "private"]).success();

  let v = read_manifest(td.path());
  assert_eq!(v["visibility"], "private");
  let names: Vec<&str> = v["repositories"].as_array().unwrap().iter().map(|r| r["repo_name"].as_str().unwrap()).collect();
  assert_eq!(names, vec!["vault"]);
}
