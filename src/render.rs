// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Turn one merge request change set into a report row
// role: rendering/rows
// inputs: MergeRequestDetail
// outputs: ReportRow (ticket=source branch, task=title, branch=merge SHA, project from web_url)
// invariants:
// - project is the 4th `/`-segment from the end of web_url (trailing empty segments dropped)
// - counters come from classify::classify, never recomputed here
// errors: ReportError::MalformedUrl when web_url has fewer than 4 segments
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::classify::classify;
use crate::error::{ReportError, Result};
use crate::model::{MergeRequestDetail, ReportRow};

const PROJECT_SEGMENT_FROM_END: usize = 4;

/// Extract the project path segment from a merge request web URL.
///
/// `https://host/group/project/-/merge_requests/42` yields `project`.
pub fn project_from_url(web_url: &str) -> Result<String> {
  let mut segments: Vec<&str> = web_url.split('/').collect();

  while segments.last().is_some_and(|s| s.is_empty()) {
    segments.pop();
  }

  if segments.len() < PROJECT_SEGMENT_FROM_END {
    return Err(ReportError::MalformedUrl { url: web_url.to_string() });
  }

  Ok(segments[segments.len() - PROJECT_SEGMENT_FROM_END].to_string())
}

pub fn build_row(detail: &MergeRequestDetail) -> Result<ReportRow> {
  let project = project_from_url(&detail.web_url)?;
  let classified = classify(&detail.changes);

  Ok(ReportRow {
    ticket: detail.source_branch.clone(),
    task: detail.title.clone(),
    subtask: String::new(),
    project,
    branch: detail.merge_commit_sha.clone().unwrap_or_default(),
    created: classified.created,
    modified: classified.modified,
    deliverable: classified.deliverable,
  })
}
