//! Owned data types describing the changes between two snapshots.
//!
//! Every type here is fully owned (no borrowed lifetimes into `git2` objects)
//! so a diff can outlive the `git2::Repository` it was computed from and be
//! handed to the renderer after the repository is dropped.

/// How a file changed between the base and target snapshots.
///
/// Mirrors the subset of `git2::Delta` that a tree-to-tree diff can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    /// Present only in the target snapshot.
    Added,
    /// Present only in the base snapshot.
    Deleted,
    /// Present in both with different content or mode.
    Modified,
    /// Moved to a new path (rename detection enabled).
    Renamed,
    /// Copied from another path (rename detection enabled).
    Copied,
    /// Changed kind, e.g. file to symlink.
    TypeChange,
    /// Anything else libgit2 reports.
    Other,
}

impl ChangeStatus {
    /// Single-character status code, as printed by `git diff --name-status`.
    pub fn code(self) -> char {
        match self {
            ChangeStatus::Added => 'A',
            ChangeStatus::Deleted => 'D',
            ChangeStatus::Modified => 'M',
            ChangeStatus::Renamed => 'R',
            ChangeStatus::Copied => 'C',
            ChangeStatus::TypeChange => 'T',
            ChangeStatus::Other => 'X',
        }
    }
}

/// Origin of a single diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOrigin {
    Added,
    Removed,
    Context,
    /// The preceding line has no trailing newline in one or both sides.
    NoNewlineAtEof,
}

impl LineOrigin {
    /// Maps a `git2::DiffLine::origin()` character to a line origin.
    ///
    /// Returns `None` for file and hunk header origins, which are carried
    /// separately on [`FileChange`] and [`DiffHunk`].
    pub fn from_git_origin(origin: char) -> Option<Self> {
        match origin {
            '+' => Some(LineOrigin::Added),
            '-' => Some(LineOrigin::Removed),
            ' ' => Some(LineOrigin::Context),
            '=' | '>' | '<' => Some(LineOrigin::NoNewlineAtEof),
            _ => None,
        }
    }
}

/// A single line of diff output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub origin: LineOrigin,
    /// Line content without the origin prefix, trailing newline included
    /// when the source line had one.
    pub content: String,
    pub old_lineno: Option<u32>,
    pub new_lineno: Option<u32>,
}

/// One `@@` hunk block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffHunk {
    /// The raw `@@ -old_start,old_lines +new_start,new_lines @@` header.
    pub header: String,
    pub old_start: u32,
    pub new_start: u32,
    pub lines: Vec<DiffLine>,
}

/// One file-level diff unit between two snapshots.
///
/// At least one of `old_path` / `new_path` is always present: additions have
/// no `old_path`, deletions have no `new_path`. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub old_path: Option<String>,
    pub new_path: Option<String>,
    pub status: ChangeStatus,
    /// Set when libgit2 classified either side as binary; `hunks` is empty then.
    pub binary: bool,
    pub hunks: Vec<DiffHunk>,
}

impl FileChange {
    /// The path this change is keyed under: the post-change path when the
    /// file exists in the target snapshot, the pre-change path otherwise.
    pub fn canonical_path(&self) -> &str {
        self.new_path
            .as_deref()
            .or(self.old_path.as_deref())
            .unwrap_or_default()
    }

    /// Number of added lines across all hunks.
    pub fn added_lines(&self) -> usize {
        self.count_lines(LineOrigin::Added)
    }

    /// Number of removed lines across all hunks.
    pub fn removed_lines(&self) -> usize {
        self.count_lines(LineOrigin::Removed)
    }

    fn count_lines(&self, origin: LineOrigin) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| h.lines.iter())
            .filter(|l| l.origin == origin)
            .count()
    }
}

/// Kind of a tree entry in a snapshot listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Subtree,
    /// Submodule commits and anything else that is neither blob nor tree.
    Other,
}

/// One entry of a snapshot's tree listing, used only for glob expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntryInfo {
    /// Entry name for the flat top-level listing, or the full
    /// repository-relative path for the recursive listing.
    pub name: String,
    pub kind: EntryKind,
}

impl TreeEntryInfo {
    pub fn file(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: EntryKind::File }
    }

    pub fn subtree(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: EntryKind::Subtree }
    }
}
