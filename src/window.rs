// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Resolve the reporting window (calendar month or since/until bounds) into GitLab-ready ISO-8601 strings
// role: config/window
// inputs: WindowSpec from the CLI
// outputs: (created_after, created_before) as RFC 3339 UTC strings with a `Z` suffix
// invariants:
// - Plain dates expand to 00:00:00Z (since) and 23:59:59Z (until)
// - Offsets are normalized to UTC so no `+` ever reaches a query string
// - since < until
// errors: anyhow with the offending flag named
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum WindowSpec {
  Month { ym: String },
  SinceUntil { since: String, until: String },
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Bound {
  Since,
  Until,
}

pub fn month_bounds(year_month: &str) -> Result<(String, String)> {
  let parts: Vec<&str> = year_month.split('-').collect();

  if parts.len() != 2 {
    bail!("invalid --month, expected YYYY-MM");
  }
  let y: i32 = parts[0].parse().context("parsing year in --month")?;
  let m: u32 = parts[1].parse().context("parsing month in --month")?;

  if !(1..=12).contains(&m) {
    bail!("invalid month in --month");
  }
  let next_y = if m == 12 { y + 1 } else { y };
  let next_m = if m == 12 { 1 } else { m + 1 };

  Ok((
    format!("{y:04}-{m:02}-01T00:00:00Z"),
    format!("{next_y:04}-{next_m:02}-01T00:00:00Z"),
  ))
}

/// Accept `YYYY-MM-DD` or RFC 3339 and return an RFC 3339 UTC instant.
pub fn normalize_bound(input: &str, bound: Bound) -> Result<String> {
  let s = input.trim();

  if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
    let time = match bound {
      Bound::Since => "00:00:00",
      Bound::Until => "23:59:59",
    };
    return Ok(format!("{}T{}Z", date.format("%Y-%m-%d"), time));
  }

  let flag = match bound {
    Bound::Since => "--since",
    Bound::Until => "--until",
  };

  let dt = DateTime::parse_from_rfc3339(s).with_context(|| format!("invalid {flag} {s:?}: expected YYYY-MM-DD or RFC 3339"))?;

  Ok(dt.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Secs, true))
}

pub fn resolve_window(window: &WindowSpec) -> Result<(String, String)> {
  let (since, until) = match window {
    WindowSpec::Month { ym } => month_bounds(ym)?,
    WindowSpec::SinceUntil { since, until } => (
      normalize_bound(since, Bound::Since)?,
      normalize_bound(until, Bound::Until)?,
    ),
  };

  let start = DateTime::parse_from_rfc3339(&since).context("parsing resolved since")?;
  let end = DateTime::parse_from_rfc3339(&until).context("parsing resolved until")?;

  if start >= end {
    bail!("empty window: since ({since}) must be before until ({until})");
  }

  Ok((since, until))
}
