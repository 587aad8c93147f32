// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Map each changed file of a merge request to a work category and created/modified bucket
// role: classification/rules
// inputs: Ordered FileChange slice from a merge request
// outputs: Classification { created, modified, deliverable }
// invariants:
// - Ignored paths touch no counter and never reach the deliverable
// - Rules are evaluated in table order; the first match wins
// - Deliverable keeps input order (newline-joined, original casing)
// - created.total() + modified.total() + ignored == changes.len()
// errors: None; classification is total
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Category, CategoryCounters, FileChange};

/// Paths that are not work product: changelogs, generated API clients, VCS ignores, lockfiles.
static IGNORED: Lazy<Vec<Regex>> = Lazy::new(|| {
  [r"changelog\.md", r"generated/api", r"gitignore", r"package-lock\.json"]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Priority table; patterns match against the lower-cased path.
static RULES: Lazy<Vec<(Regex, Category)>> = Lazy::new(|| {
  vec![
    (Regex::new(r"test").unwrap(), Category::Pgm),
    (Regex::new(r"dao|dto|service").unwrap(), Category::Dao),
    (Regex::new(r"resource.*java$").unwrap(), Category::Int),
  ]
});

const DEFAULT_CATEGORY: Category = Category::Pgm;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Classification {
  pub created: CategoryCounters,
  pub modified: CategoryCounters,
  pub deliverable: String,
}

pub fn is_ignored(path: &str) -> bool {
  let lower = path.to_lowercase();
  IGNORED.iter().any(|re| re.is_match(&lower))
}

pub fn category_for(path: &str) -> Category {
  let lower = path.to_lowercase();
  RULES
    .iter()
    .find(|(re, _)| re.is_match(&lower))
    .map(|(_, cat)| *cat)
    .unwrap_or(DEFAULT_CATEGORY)
}

pub fn classify(changes: &[FileChange]) -> Classification {
  let mut out = Classification::default();
  let mut kept: Vec<&str> = Vec::with_capacity(changes.len());

  for change in changes {
    if is_ignored(&change.new_path) {
      tracing::debug!(path = %change.new_path, "ignoring file");
      continue;
    }

    let category = category_for(&change.new_path);
    let bucket = if change.new_file { &mut out.created } else { &mut out.modified };
    bucket.increment(category);

    kept.push(&change.new_path);
  }

  out.deliverable = kept.join("\n");
  out
}
