//! Temporary git repositories for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;

use git2::{IndexAddOption, Oid, Repository, Signature};

/// A scratch repository whose commits are built from explicit file lists.
pub struct Fixture {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Replaces the work tree with exactly `files` and commits it as the
    /// parentless tip of `refs/heads/<branch>`.
    pub fn commit_snapshot<C: AsRef<[u8]>>(&self, branch: &str, files: &[(&str, C)]) -> Oid {
        self.clear_worktree();
        for (path, content) in files {
            let full = self.path().join(path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(full, content.as_ref()).unwrap();
        }

        let mut index = self.repo.index().unwrap();
        index.clear().unwrap();
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();

        let sig = Signature::now("forkdiff", "forkdiff@example.com").unwrap();
        let refname = format!("refs/heads/{branch}");
        self.repo
            .commit(Some(&refname), &sig, &sig, branch, &tree, &[])
            .unwrap()
    }

    /// Commits `files` plus submodule links (path, pinned commit) as the
    /// parentless tip of `refs/heads/<branch>`, writing trees directly.
    pub fn commit_tree(&self, branch: &str, files: &[(&str, &str)], links: &[(&str, Oid)]) -> Oid {
        let mut leaves = Vec::new();
        for (path, content) in files {
            leaves.push((*path, self.repo.blob(content.as_bytes()).unwrap(), 0o100644));
        }
        for (path, commit) in links {
            leaves.push((*path, *commit, 0o160000));
        }
        let tree = self.repo.find_tree(self.write_tree(&leaves)).unwrap();

        let sig = Signature::now("forkdiff", "forkdiff@example.com").unwrap();
        let refname = format!("refs/heads/{branch}");
        self.repo
            .commit(Some(&refname), &sig, &sig, branch, &tree, &[])
            .unwrap()
    }

    fn write_tree(&self, leaves: &[(&str, Oid, i32)]) -> Oid {
        let mut builder = self.repo.treebuilder(None).unwrap();
        let mut subdirs: BTreeMap<&str, Vec<(&str, Oid, i32)>> = BTreeMap::new();
        for &(path, oid, mode) in leaves {
            match path.split_once('/') {
                Some((dir, rest)) => subdirs.entry(dir).or_default().push((rest, oid, mode)),
                None => {
                    builder.insert(path, oid, mode).unwrap();
                }
            }
        }
        for (dir, nested) in subdirs {
            let subtree = self.write_tree(&nested);
            builder.insert(dir, subtree, 0o040000).unwrap();
        }
        builder.write().unwrap()
    }

    fn clear_worktree(&self) {
        for entry in std::fs::read_dir(self.path()).unwrap() {
            let entry = entry.unwrap();
            if entry.file_name() == ".git" {
                continue;
            }
            let path = entry.path();
            if path.is_dir() {
                std::fs::remove_dir_all(path).unwrap();
            } else {
                std::fs::remove_file(path).unwrap();
            }
        }
    }
}
