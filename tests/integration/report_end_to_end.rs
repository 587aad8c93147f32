const EXPECTED: &str = concat!(
  "developer;ticket;task;subtask;obm_c;obm_m;acv_c;acv_m;flx_c;flx_m;doc_c;doc_m;",
  "dao_c;dao_m;pgm_c;pgm_m;int_c;int_m;req_c;req_m;project;branch;deliverable\r\n",
  "Jane Doe;feature/SHOP-12;Add order export;;;;;;;;;;1;0;1;1;1;0;;;orders-api;9f1c2ab;",
  "\"src/main/java/shop/OrderResource.java\n",
  "src/main/java/shop/OrderService.java\n",
  "src/test/java/shop/OrderServiceTest.java\n",
  "src/main/java/shop/OrderMapper.java\"\r\n",
  "Jane Doe;SHOP-3;Bump front deps;;;;;;;;;;0;0;0;1;0;0;;;front;;front/package.json\r\n",
);

#[test]
fn fixture_run_writes_expected_csv() {
  let td = test_support::tempdir();
  let out = td.path().join("activity.csv");

  let output = test_support::cmd_bin(crate::BIN)
    .envs(test_support::gitlab_fixture_env("listing_pages.json", "changes.json"))
    .args(crate::base_args())
    .args(["--since", "2021-12-01", "--until", "2021-12-29", "--out", out.to_str().unwrap()])
    .output()
    .unwrap();

  assert!(output.status.success(), "cli run failed: {}", String::from_utf8_lossy(&output.stderr));
  assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), out.to_str().unwrap());

  let text = std::fs::read_to_string(&out).unwrap();
  assert_eq!(text, EXPECTED);
}

#[test]
fn default_output_is_overwritten_each_run() {
  let td = test_support::tempdir();
  let default_path = td.path().join("activity-report.csv");
  std::fs::write(&default_path, "previous run\n".repeat(200)).unwrap();

  let run = || {
    test_support::cmd_bin(crate::BIN)
      .current_dir(td.path())
      .envs(test_support::gitlab_fixture_env("listing_pages.json", "changes.json"))
      .args(crate::base_args())
      .args(["--month", "2021-12"])
      .assert()
      .success();
    std::fs::read(&default_path).unwrap()
  };

  let first = run();
  let second = run();

  assert_eq!(String::from_utf8(first.clone()).unwrap(), EXPECTED);
  assert_eq!(first, second, "identical inputs give byte-identical reports");
}

#[test]
fn dropped_merge_request_is_logged() {
  let td = test_support::tempdir();
  let out = td.path().join("activity.csv");

  let output = test_support::cmd_bin(crate::BIN)
    .envs(test_support::gitlab_fixture_env("listing_pages.json", "changes.json"))
    .args(crate::base_args())
    .args(["--month", "2021-12", "--out", out.to_str().unwrap()])
    .output()
    .unwrap();

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("dropping merge request"), "stderr: {stderr}");
  assert!(!stderr.contains("glpat-test"), "token must never be logged");
}
