//! Tracks which changed files have been claimed by a section.

use std::collections::BTreeSet;

use tracing::trace;

/// The set of changed paths not yet claimed by any section.
///
/// Seeded with every canonical path of a [`crate::patch_index::PatchIndex`]
/// and only ever shrinks. Owned by a single resolution pass and threaded
/// through it by `&mut`.
#[derive(Debug, Clone, Default)]
pub struct CoverageTracker {
    remaining: BTreeSet<String>,
    total: usize,
}

impl CoverageTracker {
    pub fn new(all_paths: impl IntoIterator<Item = String>) -> Self {
        let remaining: BTreeSet<String> = all_paths.into_iter().collect();
        let total = remaining.len();
        Self { remaining, total }
    }

    /// Marks `path` as claimed.
    ///
    /// Claiming a path that was already claimed, or that was never tracked,
    /// is a no-op. Returns whether this call removed the path.
    pub fn claim(&mut self, path: &str) -> bool {
        let removed = self.remaining.remove(path);
        if !removed {
            trace!(path, "path already claimed or untracked");
        }
        removed
    }

    /// The unclaimed paths, sorted lexicographically.
    pub fn remaining(&self) -> Vec<String> {
        self.remaining.iter().cloned().collect()
    }

    pub fn is_remaining(&self, path: &str) -> bool {
        self.remaining.contains(path)
    }

    /// Number of paths the tracker was seeded with.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of seeded paths claimed so far.
    pub fn claimed_count(&self) -> usize {
        self.total - self.remaining.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.remaining.len()
    }
}
