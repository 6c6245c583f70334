//! Patch resolution and coverage tracking for fork-diff reports.
//!
//! Given a base and a target snapshot of a git repository and a user-authored
//! tree of named sections, forkdiff-core computes the changed files, assigns
//! them to sections by glob and reports which changed files no section claims.
//!
//! The pipeline, leaves first:
//!
//! 1. [`snapshot::compute_diff`] diffs two trees into owned [`types::FileChange`]s.
//! 2. [`patch_index::PatchIndex`] keys them by canonical path.
//! 3. [`coverage::CoverageTracker`] holds the set of paths not yet claimed.
//! 4. [`resolver::SectionResolver`] walks the [`section::SectionNode`] tree,
//!    claiming matched paths in the tracker.
//!
//! Rendering the result is left to the caller.

pub mod coverage;
pub mod error;
pub mod logging;
pub mod patch_index;
pub mod resolver;
pub mod section;
pub mod snapshot;
pub mod types;

pub use error::{ForkDiffError, Result};
