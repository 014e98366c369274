use jsonschema::validator_for;
use test_support;

fn compile_schema(name: &str) -> jsonschema::Validator {
  let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
  let path = manifest_dir.join("tests").join("schemas").join(name);
  let data = std::fs::read(&path).expect("schema file");
  let schema: serde_json::Value = serde_json::from_slice(&data).expect("valid schema JSON");
  validator_for(&schema).expect("compile schema")
}

fn scan_manifest(extra: &[&str]) -> serde_json::Value {
  let td = test_support::tempdir();
  let fixture = test_support::fixture_path("user_scan.json");
  test_support::fixture_cmd(&fixture)
    .args(["--username", "octo", "--output-dir"])
    .arg(td.path())
    .args(extra)
    .assert()
    .success();
  let path = test_support::manifest_file(td.path(), "json");
  serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

#[test]
fn scan_manifest_conforms_to_schema() {
  let compiled = compile_schema("ruleset-manifest.schema.json");
  for extra in [&[][..], &["-v", "all"][..], &["-v", "all", "--apply"][..], &["--apply", "--dry-run"][..]] {
    let v = scan_manifest(extra);
    if let Err(e) = compiled.validate(&v) {
      panic!("schema validation failed for {extra:?}: {e}");
    }
  }
}

#[test]
fn schema_rejects_unknown_action() {
  let compiled = compile_schema("ruleset-manifest.schema.json");
  let mut v = scan_manifest(&[]);
  v["repositories"][0]["action_taken"] = serde_json::json!("created");
  assert!(!compiled.is_valid(&v));
}
