// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Drive paginated listing of merged merge requests to completion and decode pages into summaries
// role: gitlab/listing
// inputs: &dyn GitlabApi, MergeRequestQuery (cursor advanced in place), ListingFailurePolicy
// outputs: Raw page bodies in fetch order; MergeRequestSummary items in listing order
// invariants:
// - At least one fetch happens, even for an empty window
// - The loop stops exactly when the cursor comes back empty/absent after a fetch
// - A cursor is never fetched twice
// - KeepPartial returns pages collected before a failure; Abort propagates it
// errors: ReportError::Retrieval (Abort only); undecodable pages are logged and yield nothing
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::HashSet;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{ReportError, Result};
use crate::gitlab::api::{GitlabApi, MergeRequestQuery};
use crate::model::MergeRequestSummary;

/// What to do when a listing page cannot be retrieved.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum ListingFailurePolicy {
  /// Log the failure and report on the pages already collected.
  #[default]
  KeepPartial,
  /// Stop the run with the retrieval error.
  Abort,
}

pub fn list_merged_requests(
  api: &dyn GitlabApi,
  query: &mut MergeRequestQuery,
  policy: ListingFailurePolicy,
) -> Result<Vec<String>> {
  info!(
    user = %query.user,
    group = %query.group,
    url = %query.credentials.base_url,
    "listing merged merge requests"
  );

  let mut pages: Vec<String> = Vec::new();
  let mut seen: HashSet<Option<String>> = HashSet::new();

  loop {
    seen.insert(query.page_cursor.clone());

    let page = match api.fetch_merge_request_page(query) {
      Ok(p) => p,
      Err(e) => return on_failure(e, pages, policy),
    };

    debug!(cursor = ?query.page_cursor, body = %page.body, "listing page");
    pages.push(page.body);

    let next = page.next_page.filter(|c| !c.is_empty());

    let Some(cursor) = next else {
      break;
    };

    if seen.contains(&Some(cursor.clone())) {
      warn!(cursor = %cursor, "GitLab returned an already fetched page cursor; stopping pagination");
      break;
    }

    query.page_cursor = Some(cursor);
  }

  info!(pages = pages.len(), "listing complete");
  Ok(pages)
}

fn on_failure(err: ReportError, pages: Vec<String>, policy: ListingFailurePolicy) -> Result<Vec<String>> {
  match policy {
    ListingFailurePolicy::KeepPartial => {
      error!(error = %err, kept_pages = pages.len(), "listing failed; continuing with collected pages");
      Ok(pages)
    }
    ListingFailurePolicy::Abort => Err(err),
  }
}

/// Decode one listing page; a page that does not decode contributes nothing.
pub fn parse_listing_page(body: &str) -> Vec<MergeRequestSummary> {
  match serde_json::from_str::<Vec<MergeRequestSummary>>(body) {
    Ok(items) => items,
    Err(source) => {
      let err = ReportError::Parse { what: "merge request listing page".into(), source };
      error!(error = %err, "dropping listing page");
      Vec::new()
    }
  }
}

pub fn summaries_from_pages(pages: &[String]) -> Vec<MergeRequestSummary> {
  pages.iter().flat_map(|p| parse_listing_page(p)).collect()
}
