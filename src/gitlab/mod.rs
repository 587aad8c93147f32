// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Namespace for GitLab REST integration (transport seam, paginated listing, change retrieval)
// role: gitlab/namespace
// outputs: Public submodules isolating every network call behind the GitlabApi trait
// invariants: Nothing outside this namespace talks HTTP; all calls are sequential and blocking
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod api;
pub mod changes;
pub mod listing;
