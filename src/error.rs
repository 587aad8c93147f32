// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed failures of the report pipeline, scoped to the smallest unit they affect
// role: errors/types
// outputs: ReportError and the crate Result alias
// invariants: Retrieval/Parse/MalformedUrl/Write are recoverable per item; Io/Config end the run
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
  /// Transport failure or non-success status from GitLab.
  #[error("request to {url} failed: {reason}")]
  Retrieval { url: String, reason: String },

  /// A payload did not match the expected schema.
  #[error("could not parse {what}: {source}")]
  Parse {
    what: String,
    #[source]
    source: serde_json::Error,
  },

  /// The project name cannot be derived from a merge request URL.
  #[error("cannot derive project name from web_url {url:?}")]
  MalformedUrl { url: String },

  /// One CSV record could not be serialized.
  #[error("could not write report row {what}: {source}")]
  Write {
    what: String,
    #[source]
    source: csv::Error,
  },

  #[error("I/O error on {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("configuration error: {0}")]
  Config(String),
}

impl ReportError {
  pub fn is_fatal(&self) -> bool {
    matches!(self, ReportError::Io { .. } | ReportError::Config(_))
  }
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn per_item_failures_are_not_fatal() {
    let e = ReportError::MalformedUrl { url: "a/b".into() };
    assert!(!e.is_fatal());
    assert!(e.to_string().contains("a/b"));

    let e = ReportError::Retrieval { url: "https://x".into(), reason: "status 500".into() };
    assert!(!e.is_fatal());
  }

  #[test]
  fn io_failure_is_fatal_and_names_path() {
    let e = ReportError::Io {
      path: PathBuf::from("/nope/report.csv"),
      source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
    };
    assert!(e.is_fatal());
    assert!(e.to_string().contains("/nope/report.csv"));
  }
}
