use test_support;

#[test]
fn all_visibility_manifest_snapshot() {
  test_support::init_tracing();
  test_support::init_insta();
  let td = test_support::tempdir();
  let fixture = test_support::fixture_path("user_scan.json");

  test_support::fixture_cmd(&fixture)
    .args(["--username", "octo", "--visibility", "all", "--output-dir"])
    .arg(td.path())
    .assert()
    .success();

  let path = test_support::manifest_file(td.path(), "json");
  let v: serde_json::Value = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();

  insta::with_settings!({ sort_maps => true }, {
    insta::assert_json_snapshot!(v, { ".repositories[].checked_at" => "[checked_at]" }, @r###"
    {
      "authenticated_user": "octo",
      "authenticated_user_id": 12345,
      "errors": 0,
      "generated_at": "2025-08-15T12:00:00+00:00",
      "listing_complete": true,
      "listing_error": null,
      "owner": "octo",
      "owner_kind": "user",
      "repositories": [
        {
          "action_taken": null,
          "bypass_actors_count": 0,
          "checked_at": "[checked_at]",
          "default_branch": "main",
          "enforcement": null,
          "error": null,
          "full_name": "octo/app",
          "has_ruleset": false,
          "html_url": "https://github.com/octo/app",
          "private": false,
          "repo_name": "app",
          "ruleset_id": null,
          "ruleset_name": null
        },
        {
          "action_taken": null,
          "bypass_actors_count": 0,
          "checked_at": "[checked_at]",
          "default_branch": "trunk",
          "enforcement": "active",
          "error": null,
          "full_name": "octo/vault",
          "has_ruleset": true,
          "html_url": "https://github.com/octo/vault",
          "private": true,
          "repo_name": "vault",
          "ruleset_id": 7,
          "ruleset_name": "trunk-guard"
        }
      ],
      "total_repos": 2,
      "visibility": "all",
      "with_ruleset": 1,
      "without_ruleset": 1
    }
    "###);
  });
}
