// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the GitLab payload model (listing summaries, change sets) and the report row shared by classification and rendering
// role: model/types
// outputs: Deserializable GitLab structs (unknown fields ignored); fixed-key category counters; ReportRow
// invariants: CategoryCounters always carries dao/pgm/int (zero-initialized); payload structs tolerate unknown fields
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::Deserialize;

/// One entry of a `/groups/:id/merge_requests` page; only the ids needed to fetch changes.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct MergeRequestSummary {
  pub project_id: u64,
  pub iid: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct FileChange {
  pub new_path: String,
  #[serde(default)]
  pub new_file: bool,
}

/// Payload of `/projects/:id/merge_requests/:iid/changes`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct MergeRequestDetail {
  pub source_branch: String,
  pub title: String,
  pub web_url: String,
  // null for squash merges and fast-forward merges
  #[serde(default)]
  pub merge_commit_sha: Option<String>,
  #[serde(default)]
  pub changes: Vec<FileChange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
  Dao,
  Pgm,
  Int,
}

impl Category {
  pub const ALL: [Category; 3] = [Category::Dao, Category::Pgm, Category::Int];

  pub fn as_str(&self) -> &'static str {
    match self {
      Category::Dao => "dao",
      Category::Pgm => "pgm",
      Category::Int => "int",
    }
  }
}

impl std::fmt::Display for Category {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Per-category file counts. Every category exists from construction on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CategoryCounters {
  pub dao: u32,
  pub pgm: u32,
  pub int: u32,
}

impl CategoryCounters {
  pub fn get(&self, category: Category) -> u32 {
    match category {
      Category::Dao => self.dao,
      Category::Pgm => self.pgm,
      Category::Int => self.int,
    }
  }

  pub fn increment(&mut self, category: Category) {
    match category {
      Category::Dao => self.dao += 1,
      Category::Pgm => self.pgm += 1,
      Category::Int => self.int += 1,
    }
  }

  pub fn total(&self) -> u32 {
    Category::ALL.iter().map(|c| self.get(*c)).sum()
  }
}

/// One CSV line: a merged merge request with its classified file counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
  /// Source branch; carries the ticket key by team convention.
  pub ticket: String,
  pub task: String,
  pub subtask: String,
  pub project: String,
  /// Merge commit SHA (empty when GitLab reports none).
  pub branch: String,
  pub created: CategoryCounters,
  pub modified: CategoryCounters,
  pub deliverable: String,
}
