use predicates::prelude::*;

fn run(policy: &str, out: &std::path::Path) -> assert_cmd::assert::Assert {
  test_support::cmd_bin(crate::BIN)
    .envs(test_support::gitlab_fixture_env("listing_pages_broken_cursor.json", "changes.json"))
    .args(crate::base_args())
    .args(["--month", "2021-12", "--on-listing-failure", policy, "--out", out.to_str().unwrap()])
    .assert()
}

#[test]
fn keep_partial_reports_pages_fetched_before_the_failure() {
  let td = test_support::tempdir();
  let out = td.path().join("partial.csv");

  run("keep-partial", &out)
    .success()
    .stderr(predicate::str::contains("listing failed"));

  let text = std::fs::read_to_string(&out).unwrap();
  let records: Vec<&str> = text.split("\r\n").filter(|l| l.starts_with("Jane Doe;")).collect();
  assert_eq!(records.len(), 1);
  assert!(records[0].starts_with("Jane Doe;feature/SHOP-12;"));
}

#[test]
fn abort_fails_but_leaves_a_header_only_report() {
  let td = test_support::tempdir();
  let out = td.path().join("aborted.csv");

  run("abort", &out)
    .failure()
    .stderr(predicate::str::contains("status 404"));

  let text = std::fs::read_to_string(&out).unwrap();
  assert!(text.starts_with("developer;ticket;task;subtask;"));
  assert_eq!(text.matches("\r\n").count(), 1);
}
