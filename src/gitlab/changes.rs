// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Retrieve the file-level change set of one merge request
// role: gitlab/changes
// inputs: &dyn GitlabApi, Credentials, project id + iid
// outputs: Some(MergeRequestDetail), or None when the body does not match the schema
// invariants: A schema mismatch is a soft failure (logged, None); transport failures surface as Err
// errors: ReportError::Retrieval
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use tracing::{debug, info, warn};

use crate::error::{ReportError, Result};
use crate::gitlab::api::{Credentials, GitlabApi};
use crate::model::MergeRequestDetail;

pub fn fetch_changes(
  api: &dyn GitlabApi,
  credentials: &Credentials,
  project_id: u64,
  iid: u64,
) -> Result<Option<MergeRequestDetail>> {
  info!(project_id, iid, "fetching merge request changes");

  let body = api.fetch_merge_request_changes(credentials, project_id, iid)?;
  debug!(project_id, iid, body = %body, "merge request changes");

  Ok(parse_detail(&body, project_id, iid))
}

pub fn parse_detail(body: &str, project_id: u64, iid: u64) -> Option<MergeRequestDetail> {
  match serde_json::from_str::<MergeRequestDetail>(body) {
    Ok(detail) => Some(detail),
    Err(source) => {
      let err = ReportError::Parse { what: format!("changes of merge request {}!{}", project_id, iid), source };
      warn!(error = %err, "dropping merge request");
      None
    }
  }
}
