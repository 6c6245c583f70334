//! Snapshot access on top of `git2`.
//!
//! Resolves revision expressions to trees, diffs two trees into owned
//! [`FileChange`] values and lists the entries of a tree for glob expansion.
//! Nothing returned from here borrows from the `git2::Repository`.

use std::cell::RefCell;
use std::path::Path;

use git2::{
    Delta, Diff, DiffDelta, DiffFile, DiffFindOptions, DiffOptions, ObjectType, Repository, Tree,
    TreeWalkMode, TreeWalkResult,
};
use tracing::debug;

use crate::error::{ForkDiffError, Result};
use crate::types::{
    ChangeStatus, DiffHunk, DiffLine, EntryKind, FileChange, LineOrigin, TreeEntryInfo,
};

/// Knobs for the tree-to-tree diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffSettings {
    /// Unchanged lines shown around each change.
    pub context_lines: u32,
    /// Run rename and copy detection over the raw diff.
    pub find_renames: bool,
}

impl Default for DiffSettings {
    fn default() -> Self {
        Self { context_lines: 3, find_renames: true }
    }
}

/// Which target-tree listing glob patterns are matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingMode {
    /// Names of the root tree's direct entries only.
    #[default]
    TopLevel,
    /// Full repository-relative paths of every file and submodule link.
    Recursive,
}

/// Opens the repository at `path`.
///
/// # Errors
///
/// Returns [`ForkDiffError::RepositoryUnavailable`] if no repository is found.
pub fn open_repository(path: &Path) -> Result<Repository> {
    Repository::open(path).map_err(|source| ForkDiffError::RepositoryUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves a revision expression (`main`, `refs/heads/main`, `HEAD~1`, an
/// object id) and peels it to a tree.
///
/// # Errors
///
/// Returns [`ForkDiffError::SnapshotUnresolvable`] naming `reference` if it
/// does not exist or does not peel to a tree.
pub fn resolve_tree<'r>(repo: &'r Repository, reference: &str) -> Result<Tree<'r>> {
    let unresolvable = |source: git2::Error| ForkDiffError::SnapshotUnresolvable {
        reference: reference.to_owned(),
        source,
    };
    let object = repo.revparse_single(reference).map_err(unresolvable)?;
    object.peel_to_tree().map_err(unresolvable)
}

/// Computes every per-file change from `base` to `target`.
///
/// The order of the returned changes follows libgit2's delta order, which
/// callers must not rely on.
///
/// # Errors
///
/// Returns [`ForkDiffError::DiffFailed`] if libgit2 fails to diff or to walk
/// the diff.
pub fn compute_diff(
    repo: &Repository,
    base: &Tree<'_>,
    target: &Tree<'_>,
    settings: &DiffSettings,
) -> Result<Vec<FileChange>> {
    let failed = |source: git2::Error| ForkDiffError::DiffFailed { source };

    let mut opts = DiffOptions::new();
    opts.context_lines(settings.context_lines);
    let mut diff = repo
        .diff_tree_to_tree(Some(base), Some(target), Some(&mut opts))
        .map_err(failed)?;

    if settings.find_renames {
        let mut find = DiffFindOptions::new();
        find.renames(true).copies(true);
        diff.find_similar(Some(&mut find)).map_err(failed)?;
    }

    let changes = extract_changes(&diff).map_err(failed)?;
    debug!(files = changes.len(), "computed snapshot diff");
    Ok(changes)
}

/// Walks deltas, hunks and lines, converting them to owned types.
///
/// The file callback fires once per delta before that delta's hunks and
/// lines, so `last_mut()` in the later callbacks always refers to the file
/// currently being walked.
fn extract_changes(diff: &Diff<'_>) -> std::result::Result<Vec<FileChange>, git2::Error> {
    let changes: RefCell<Vec<FileChange>> = RefCell::new(Vec::new());

    diff.foreach(
        &mut |delta, _progress| {
            changes.borrow_mut().push(file_change_from_delta(&delta));
            true
        },
        Some(&mut |_delta, _binary| {
            if let Some(change) = changes.borrow_mut().last_mut() {
                change.binary = true;
            }
            true
        }),
        Some(&mut |_delta, hunk| {
            if let Some(change) = changes.borrow_mut().last_mut() {
                change.hunks.push(DiffHunk {
                    header: String::from_utf8_lossy(hunk.header()).into_owned(),
                    old_start: hunk.old_start(),
                    new_start: hunk.new_start(),
                    lines: Vec::new(),
                });
            }
            true
        }),
        Some(&mut |_delta, _hunk, line| {
            let Some(origin) = LineOrigin::from_git_origin(line.origin()) else {
                return true;
            };
            let mut changes = changes.borrow_mut();
            if let Some(hunk) = changes.last_mut().and_then(|c| c.hunks.last_mut()) {
                hunk.lines.push(DiffLine {
                    origin,
                    content: String::from_utf8_lossy(line.content()).into_owned(),
                    old_lineno: line.old_lineno(),
                    new_lineno: line.new_lineno(),
                });
            }
            true
        }),
    )?;

    Ok(changes.into_inner())
}

fn file_change_from_delta(delta: &DiffDelta<'_>) -> FileChange {
    let status = match delta.status() {
        Delta::Added => ChangeStatus::Added,
        Delta::Deleted => ChangeStatus::Deleted,
        Delta::Modified => ChangeStatus::Modified,
        Delta::Renamed => ChangeStatus::Renamed,
        Delta::Copied => ChangeStatus::Copied,
        Delta::Typechange => ChangeStatus::TypeChange,
        _ => ChangeStatus::Other,
    };
    // libgit2 mirrors the existing side's path onto the missing one.
    let old_path = match status {
        ChangeStatus::Added => None,
        _ => file_path(&delta.old_file()),
    };
    let new_path = match status {
        ChangeStatus::Deleted => None,
        _ => file_path(&delta.new_file()),
    };
    FileChange {
        old_path,
        new_path,
        status,
        binary: delta.flags().is_binary(),
        hunks: Vec::new(),
    }
}

fn file_path(file: &DiffFile<'_>) -> Option<String> {
    file.path().map(|p| p.to_string_lossy().into_owned())
}

/// Lists the direct entries of `tree`, in tree order.
pub fn top_level_entries(tree: &Tree<'_>) -> Vec<TreeEntryInfo> {
    tree.iter()
        .map(|entry| TreeEntryInfo {
            name: String::from_utf8_lossy(entry.name_bytes()).into_owned(),
            kind: entry_kind(entry.kind()),
        })
        .collect()
}

/// Lists the full relative path of every file and submodule link reachable
/// from `tree`, pre-order. Submodule links are listed as [`EntryKind::Other`].
///
/// # Errors
///
/// Returns [`ForkDiffError::ListingFailed`] if libgit2 fails mid-walk.
pub fn recursive_entries(tree: &Tree<'_>) -> Result<Vec<TreeEntryInfo>> {
    let mut entries = Vec::new();
    tree.walk(TreeWalkMode::PreOrder, |root, entry| {
        let kind = match entry.kind() {
            Some(ObjectType::Blob) => EntryKind::File,
            Some(ObjectType::Commit) => EntryKind::Other,
            _ => return TreeWalkResult::Ok,
        };
        let name = String::from_utf8_lossy(entry.name_bytes());
        entries.push(TreeEntryInfo { name: format!("{root}{name}"), kind });
        TreeWalkResult::Ok
    })
    .map_err(|source| ForkDiffError::ListingFailed { source })?;
    Ok(entries)
}

/// Lists `tree` according to `mode`.
///
/// # Errors
///
/// See [`recursive_entries`].
pub fn list_entries(tree: &Tree<'_>, mode: ListingMode) -> Result<Vec<TreeEntryInfo>> {
    match mode {
        ListingMode::TopLevel => Ok(top_level_entries(tree)),
        ListingMode::Recursive => recursive_entries(tree),
    }
}

fn entry_kind(kind: Option<ObjectType>) -> EntryKind {
    match kind {
        Some(ObjectType::Blob) => EntryKind::File,
        Some(ObjectType::Tree) => EntryKind::Subtree,
        _ => EntryKind::Other,
    }
}
