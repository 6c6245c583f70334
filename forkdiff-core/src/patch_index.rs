//! Changed files keyed by canonical path.

use std::collections::{BTreeSet, HashMap};

use tracing::warn;

use crate::types::FileChange;

/// Read-only mapping from canonical path to the [`FileChange`] for that path.
///
/// Built once from a snapshot diff. Keys are unique; see [`PatchIndex::build`]
/// for how colliding canonical paths are handled.
#[derive(Debug, Default)]
pub struct PatchIndex {
    by_path: HashMap<String, FileChange>,
    collisions: usize,
}

impl PatchIndex {
    /// Indexes `changes` by [`FileChange::canonical_path`].
    ///
    /// A well-formed diff never yields two changes with the same canonical
    /// path. If it does anyway, the later change in iteration order replaces
    /// the earlier one and the collision is logged at `warn`.
    pub fn build(changes: impl IntoIterator<Item = FileChange>) -> Self {
        let mut by_path: HashMap<String, FileChange> = HashMap::new();
        let mut collisions = 0;
        for change in changes {
            let path = change.canonical_path().to_owned();
            if let Some(previous) = by_path.insert(path.clone(), change) {
                collisions += 1;
                warn!(
                    path = %path,
                    previous_old_path = ?previous.old_path,
                    previous_new_path = ?previous.new_path,
                    "canonical path collision in patch index; keeping the later change"
                );
            }
        }
        Self { by_path, collisions }
    }

    /// Returns the change keyed under `path`, or `None` if the path has no diff.
    pub fn lookup(&self, path: &str) -> Option<&FileChange> {
        self.by_path.get(path)
    }

    /// Returns the change keyed under `path` together with the key itself.
    pub fn lookup_entry(&self, path: &str) -> Option<(&str, &FileChange)> {
        self.by_path.get_key_value(path).map(|(k, v)| (k.as_str(), v))
    }

    /// All canonical paths, used to seed a [`crate::coverage::CoverageTracker`].
    pub fn keys(&self) -> BTreeSet<String> {
        self.by_path.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Number of changes that were replaced by a later change with the same
    /// canonical path while building.
    pub fn collisions(&self) -> usize {
        self.collisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChangeStatus;

    fn change(old: Option<&str>, new: Option<&str>, status: ChangeStatus) -> FileChange {
        FileChange {
            old_path: old.map(str::to_owned),
            new_path: new.map(str::to_owned),
            status,
            binary: false,
            hunks: Vec::new(),
        }
    }

    #[test]
    fn keys_use_canonical_paths() {
        let index = PatchIndex::build(vec![
            change(Some("a.go"), Some("a.go"), ChangeStatus::Modified),
            change(Some("old.go"), Some("new.go"), ChangeStatus::Renamed),
            change(Some("gone.go"), None, ChangeStatus::Deleted),
            change(None, Some("fresh.go"), ChangeStatus::Added),
        ]);
        let keys: Vec<String> = index.keys().into_iter().collect();
        assert_eq!(keys, ["a.go", "fresh.go", "gone.go", "new.go"]);
        assert!(index.lookup("old.go").is_none());
        assert_eq!(index.lookup("new.go").map(|c| c.status), Some(ChangeStatus::Renamed));
        assert_eq!(index.collisions(), 0);
    }

    #[test]
    fn later_change_wins_on_collision() {
        let index = PatchIndex::build(vec![
            change(Some("x.rs"), None, ChangeStatus::Deleted),
            change(None, Some("x.rs"), ChangeStatus::Added),
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.collisions(), 1);
        assert_eq!(index.lookup("x.rs").map(|c| c.status), Some(ChangeStatus::Added));
    }

    #[test]
    fn missing_path_is_not_found() {
        let index = PatchIndex::build(Vec::new());
        assert!(index.is_empty());
        assert!(index.lookup("README.md").is_none());
        assert!(index.lookup_entry("README.md").is_none());
    }
}
