//! Report rendering.
//!
//! Renderers only read a finished [`Resolution`]; coverage is never touched
//! here, so rendering a file's diff twice (once per claiming section) has no
//! effect on what is reported as unclaimed.

pub mod html;
pub mod markdown;
pub mod patch;

use forkdiff_core::patch_index::PatchIndex;
use forkdiff_core::resolver::Resolution;
use forkdiff_core::section::Page;
use forkdiff_core::types::FileChange;

/// Everything a renderer needs to produce the final document.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    pub page: &'a Page,
    pub resolution: &'a Resolution<'a>,
    pub index: &'a PatchIndex,
    /// Revision names used as diff path prefixes.
    pub base: &'a str,
    pub target: &'a str,
}

impl<'a> Report<'a> {
    /// Unclaimed changes in sorted path order.
    pub fn unclaimed(&self) -> impl Iterator<Item = (&'a str, &'a FileChange)> + 'a {
        let index = self.index;
        self.resolution
            .remaining
            .iter()
            .filter_map(move |path| index.lookup_entry(path))
    }

    /// Share of changed files claimed by at least one section, in percent.
    pub fn coverage_percent(&self) -> f64 {
        let total = self.resolution.total;
        if total == 0 {
            return 100.0;
        }
        self.resolution.claimed_count() as f64 * 100.0 / total as f64
    }

    pub fn summary_line(&self) -> String {
        format!(
            "{} of {} changed files are covered by a section ({:.1}%), {} unclaimed.",
            self.resolution.claimed_count(),
            self.resolution.total,
            self.coverage_percent(),
            self.resolution.remaining.len(),
        )
    }

    pub fn diff_text(&self, change: &FileChange) -> String {
        patch::unified_diff(change, self.base, self.target)
    }
}

/// `(+added -removed)` suffix shown next to a file name.
pub fn diffstat(change: &FileChange) -> String {
    if change.binary {
        return format!("({}, binary)", change.status.code());
    }
    format!(
        "({}, +{} -{})",
        change.status.code(),
        change.added_lines(),
        change.removed_lines()
    )
}
