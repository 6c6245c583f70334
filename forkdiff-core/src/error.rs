//! Error taxonomy for forkdiff.
//!
//! Every variant is fatal: the run aborts and no report is written. Expected
//! non-fatal outcomes (a glob matching a file with no diff, several sections
//! claiming the same file) are not represented here.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`ForkDiffError`].
pub type Result<T> = std::result::Result<T, ForkDiffError>;

#[derive(Debug, Error)]
pub enum ForkDiffError {
    /// The repository could not be opened.
    #[error("failed to open git repository {path:?}")]
    RepositoryUnavailable {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    /// A base or target reference could not be dereferenced to a tree.
    #[error("failed to resolve {reference:?} to a tree")]
    SnapshotUnresolvable {
        reference: String,
        #[source]
        source: git2::Error,
    },

    /// libgit2 failed while computing or walking the tree-to-tree diff.
    #[error("failed to compute diff between base and target")]
    DiffFailed {
        #[source]
        source: git2::Error,
    },

    /// libgit2 failed while walking the target tree for its entry listing.
    #[error("failed to list entries of the target tree")]
    ListingFailed {
        #[source]
        source: git2::Error,
    },

    /// A section declares a syntactically invalid glob pattern.
    #[error("invalid glob pattern {pattern:?} in section {section:?}")]
    InvalidGlobPattern {
        pattern: String,
        section: String,
        #[source]
        source: glob::PatternError,
    },

    /// The page definition has unknown, missing or malformed fields.
    #[error("invalid page definition {path:?}: {message}")]
    SchemaViolation { path: PathBuf, message: String },

    /// The page definition file could not be read.
    #[error("failed to read page definition {path:?}")]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
