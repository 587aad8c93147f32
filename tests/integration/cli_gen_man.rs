use predicates::prelude::*;

#[test]
fn gen_man_prints_troff_without_other_flags() {
  let mut cmd = test_support::cmd_bin(crate::BIN);
  cmd
    .arg("--gen-man")
    .assert()
    .success()
    .stdout(predicate::str::contains(".TH"))
    .stdout(predicate::str::contains("gitlab-activity-report"));
}
