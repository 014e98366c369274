use test_support;

#[test]
fn gen_man_outputs_troff() {
  test_support::init_tracing();
  let mut cmd = test_support::cmd_bin(test_support::BIN);
  let out = cmd.args(["--gen-man"]).output().unwrap();
  assert!(out.status.success());
  let text = String::from_utf8_lossy(&out.stdout);
  assert!(text.starts_with(".TH"), "expected troff man header");
  assert!(text.contains("from\\-csv"), "expected the replay flag in the page");
}

#[test]
fn gen_man_needs_no_token() {
  let mut cmd = test_support::cmd_bin(test_support::BIN);
  cmd.args(["--gen-man", "--username", "octo"]).assert().success();
}
