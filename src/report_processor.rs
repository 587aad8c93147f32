// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate one report run: list merged MRs, fetch and classify changes, build rows, write the CSV
// role: processing/orchestrator
// inputs: EffectiveConfig; injected GitlabApi; ReportWriter
// outputs: CSV file on disk; RunSummary counts
// side_effects: Network calls (via GitlabApi); creates/truncates the output file
// invariants:
// - Rows follow listing order; never re-sorted
// - Failures are isolated to one page, one merge request, or one row
// - The output file is flushed exactly once, even when the listing aborts
// errors: Io/Config end the run; Abort policy surfaces the listing failure after the flush
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::cli::EffectiveConfig;
use crate::csv_report::ReportWriter;
use crate::gitlab::api::{build_api, GitlabApi, MergeRequestQuery};
use crate::gitlab::changes::fetch_changes;
use crate::gitlab::listing::{list_merged_requests, summaries_from_pages, ListingFailurePolicy};
use crate::model::ReportRow;
use crate::render::build_row;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
  pub pages: usize,
  pub listed: usize,
  pub rows_written: usize,
  pub rows_skipped: usize,
  /// Merge requests that produced no row (retrieval, parse or URL failure).
  pub dropped: usize,
}

/// List, fetch and classify; returns rows in listing order plus partial counts.
pub fn collect_rows(
  api: &dyn GitlabApi,
  query: &mut MergeRequestQuery,
  policy: ListingFailurePolicy,
) -> crate::error::Result<(Vec<ReportRow>, RunSummary)> {
  let pages = list_merged_requests(api, query, policy)?;
  let summaries = summaries_from_pages(&pages);

  let mut summary = RunSummary { pages: pages.len(), listed: summaries.len(), ..RunSummary::default() };
  let mut rows: Vec<ReportRow> = Vec::with_capacity(summaries.len());

  for mr in summaries {
    let detail = match fetch_changes(api, &query.credentials, mr.project_id, mr.iid) {
      Ok(Some(d)) => d,
      Ok(None) => {
        summary.dropped += 1;
        continue;
      }
      Err(e) if e.is_fatal() => return Err(e),
      Err(e) => {
        error!(project_id = mr.project_id, iid = mr.iid, error = %e, "dropping merge request");
        summary.dropped += 1;
        continue;
      }
    };

    match build_row(&detail) {
      Ok(row) => {
        debug!(
          ticket = %row.ticket,
          created = row.created.total(),
          modified = row.modified.total(),
          "classified merge request"
        );
        rows.push(row);
      }
      Err(e) => {
        warn!(project_id = mr.project_id, iid = mr.iid, error = %e, "dropping merge request");
        summary.dropped += 1;
      }
    }
  }

  Ok((rows, summary))
}

/// Run the pipeline into an already-open writer. The caller owns the final flush.
pub fn generate_report<W: Write>(
  api: &dyn GitlabApi,
  query: &mut MergeRequestQuery,
  policy: ListingFailurePolicy,
  writer: &mut ReportWriter<W>,
) -> crate::error::Result<RunSummary> {
  let (rows, mut summary) = collect_rows(api, query, policy)?;

  writer.write_rows(&rows);
  summary.rows_written = writer.rows_written();
  summary.rows_skipped = writer.rows_skipped();

  Ok(summary)
}

pub fn build_query(cfg: &EffectiveConfig) -> MergeRequestQuery {
  MergeRequestQuery {
    user: cfg.user.clone(),
    group: cfg.group.clone(),
    credentials: cfg.credentials.clone(),
    start_date: cfg.since.clone(),
    end_date: cfg.until.clone(),
    page_cursor: None,
  }
}

pub fn process_run(cfg: &EffectiveConfig) -> Result<(PathBuf, RunSummary)> {
  let api = build_api(cfg.timeout);
  process_run_with_api(cfg, api.as_ref())
}

pub fn process_run_with_api(cfg: &EffectiveConfig, api: &dyn GitlabApi) -> Result<(PathBuf, RunSummary)> {
  let path = PathBuf::from(&cfg.out);

  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
  }

  info!(developer = %cfg.developer, path = %path.display(), "generating csv report");
  let mut writer = ReportWriter::create(&path, &cfg.developer)?;

  let mut query = build_query(cfg);
  let outcome = generate_report(api, &mut query, cfg.on_listing_failure, &mut writer);

  writer.finish().with_context(|| format!("flushing {}", path.display()))?;

  let summary = outcome.context("listing merged merge requests")?;

  info!(
    pages = summary.pages,
    listed = summary.listed,
    rows_written = summary.rows_written,
    rows_skipped = summary.rows_skipped,
    dropped = summary.dropped,
    "report complete"
  );

  Ok((path, summary))
}
