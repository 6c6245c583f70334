//! Resolves a section tree against the changed files of a fork.
//!
//! The walk is a plain pre-order recursive descent. Each node expands its
//! globs against the target snapshot's entry listing, keeps the matches that
//! actually have a diff, and marks them claimed in the [`CoverageTracker`]
//! that is threaded through the whole walk. A path may be claimed by any
//! number of sections; coverage only records that somebody claimed it.

use std::collections::HashSet;

use glob::{MatchOptions, Pattern};
use tracing::{debug, debug_span, trace};

use crate::coverage::CoverageTracker;
use crate::error::{ForkDiffError, Result};
use crate::patch_index::PatchIndex;
use crate::section::SectionNode;
use crate::types::{FileChange, TreeEntryInfo};

/// `*` and `?` never cross a `/`, matching shell and `filepath.Match`
/// semantics. Only relevant for recursive listings; top-level names never
/// contain a separator.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A changed file claimed by a section.
#[derive(Debug, Clone, Copy)]
pub struct ClaimedPatch<'a> {
    pub path: &'a str,
    pub change: &'a FileChange,
}

/// A section node paired with the files it claimed.
#[derive(Debug, Clone)]
pub struct ResolvedSection<'a> {
    pub node: &'a SectionNode,
    /// 0 for the root, 1 for its declared children, and so on.
    pub depth: usize,
    /// Claimed files in the order the globs matched them, without repeats.
    pub claimed: Vec<ClaimedPatch<'a>>,
    pub children: Vec<ResolvedSection<'a>>,
}

impl<'a> ResolvedSection<'a> {
    pub fn title(&self) -> &'a str {
        &self.node.title
    }

    pub fn description(&self) -> &'a str {
        &self.node.description
    }

    /// This section and all descendants, pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedSection<'a>> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.iter().rev());
            Some(next)
        })
    }

    /// Every distinct path claimed anywhere in this subtree.
    pub fn claimed_paths(&self) -> HashSet<&'a str> {
        self.iter()
            .flat_map(|s| s.claimed.iter().map(|c| c.path))
            .collect()
    }
}

/// Result of resolving a whole section tree.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    pub root: ResolvedSection<'a>,
    /// Changed files no section claimed, sorted.
    pub remaining: Vec<String>,
    /// Number of changed files in the patch index.
    pub total: usize,
}

impl Resolution<'_> {
    pub fn claimed_count(&self) -> usize {
        self.total - self.remaining.len()
    }
}

/// Expands section globs against a fixed entry listing and patch index.
///
/// Both inputs are read-only and shared by every node of the walk; the only
/// mutable state is the [`CoverageTracker`] passed into [`Self::resolve`].
#[derive(Debug, Clone, Copy)]
pub struct SectionResolver<'a> {
    entries: &'a [TreeEntryInfo],
    index: &'a PatchIndex,
}

impl<'a> SectionResolver<'a> {
    pub fn new(entries: &'a [TreeEntryInfo], index: &'a PatchIndex) -> Self {
        Self { entries, index }
    }

    /// Resolves the whole tree under `root` with a fresh tracker seeded from
    /// the patch index, and returns the tree together with the remainder.
    ///
    /// # Errors
    ///
    /// Returns [`ForkDiffError::InvalidGlobPattern`] for the first malformed
    /// pattern encountered; nothing partial is returned.
    pub fn resolve_tree(&self, root: &'a SectionNode) -> Result<Resolution<'a>> {
        let mut coverage = CoverageTracker::new(self.index.keys());
        let root = self.resolve(root, 0, &mut coverage)?;
        debug!(
            total = coverage.total(),
            claimed = coverage.claimed_count(),
            remaining = coverage.remaining_count(),
            "resolved section tree"
        );
        Ok(Resolution {
            root,
            remaining: coverage.remaining(),
            total: coverage.total(),
        })
    }

    /// Resolves `node` at `depth`, then its children at `depth + 1`, in
    /// declared order. There is no depth limit.
    ///
    /// # Errors
    ///
    /// Returns [`ForkDiffError::InvalidGlobPattern`] if `node` or any
    /// descendant declares a malformed pattern.
    pub fn resolve(
        &self,
        node: &'a SectionNode,
        depth: usize,
        coverage: &mut CoverageTracker,
    ) -> Result<ResolvedSection<'a>> {
        let span = debug_span!("section", title = %node.title, depth);
        let _enter = span.enter();

        let mut claimed = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for pattern in &node.globs {
            for name in self.expand_glob(pattern, &node.title)? {
                let Some((path, change)) = self.index.lookup_entry(name) else {
                    trace!(path = name, pattern = %pattern, "matched entry has no diff");
                    continue;
                };
                coverage.claim(path);
                if seen.insert(path) {
                    claimed.push(ClaimedPatch { path, change });
                }
            }
        }
        debug!(claimed = claimed.len(), "section claimed files");

        let mut children = Vec::with_capacity(node.children.len());
        for child in &node.children {
            children.push(self.resolve(child, depth + 1, coverage)?);
        }

        Ok(ResolvedSection { node, depth, claimed, children })
    }

    /// Returns the names of listing entries matching `pattern`, in listing order.
    ///
    /// # Errors
    ///
    /// Returns [`ForkDiffError::InvalidGlobPattern`] naming `pattern` and
    /// `section` if the pattern does not compile.
    pub fn expand_glob(&self, pattern: &str, section: &str) -> Result<Vec<&'a str>> {
        let compiled = Pattern::new(pattern).map_err(|source| ForkDiffError::InvalidGlobPattern {
            pattern: pattern.to_owned(),
            section: section.to_owned(),
            source,
        })?;
        let entries: &'a [TreeEntryInfo] = self.entries;
        Ok(entries
            .iter()
            .filter(|e| compiled.matches_with(&e.name, MATCH_OPTIONS))
            .map(|e| e.name.as_str())
            .collect())
    }
}
