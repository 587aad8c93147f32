use predicates::prelude::*;

#[test]
fn missing_window_is_rejected_before_any_request() {
  let td = test_support::tempdir();
  let out = td.path().join("report.csv");

  test_support::cmd_bin(crate::BIN)
    .args(crate::base_args())
    .args(["--out", out.to_str().unwrap()])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Provide one of --month"));

  assert!(!out.exists(), "no report file for an invalid configuration");
}

#[test]
fn missing_token_mentions_env_fallback() {
  test_support::cmd_bin(crate::BIN)
    .args(["--developer", "Jane", "--user", "jdoe", "--group", "1", "--month", "2021-12"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("GITLAB_PRIVATE_TOKEN"));
}

#[test]
fn reversed_window_is_rejected() {
  test_support::cmd_bin(crate::BIN)
    .args(crate::base_args())
    .args(["--since", "2021-12-29", "--until", "2021-12-01"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("must be before"));
}

#[test]
fn config_can_come_from_environment() {
  let td = test_support::tempdir();
  let out = td.path().join("env.csv");

  test_support::cmd_bin(crate::BIN)
    .envs(test_support::gitlab_fixture_env("listing_pages.json", "changes.json"))
    .env("GAR_DEVELOPER", "Env Dev")
    .env("GITLAB_USER", "jdoe")
    .env("GITLAB_GROUP", "9970")
    .env("GITLAB_PRIVATE_TOKEN", "glpat-env")
    .args(["--month", "2021-12", "--out", out.to_str().unwrap()])
    .assert()
    .success();

  let text = std::fs::read_to_string(&out).unwrap();
  assert!(text.contains("\r\nEnv Dev;feature/SHOP-12;"));
}
