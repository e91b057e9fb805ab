//! Real git repositories in temporary directories, built through git2 so
//! commit times and authors are fixed.

#![allow(dead_code)]

use std::path::Path;

use git2::{IndexAddOption, Oid, Repository, RepositoryInitOptions, Signature, Time};
use tempfile::TempDir;

/// Base timestamp for test commits (2014-05-13).
pub const T0: i64 = 1_400_000_000;
pub const DAY: i64 = 86_400;

pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// An empty non-bare repository whose HEAD points at `refs/heads/master`.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("master");
        let repo = Repository::init_opts(dir.path(), &opts).expect("failed to init repo");
        Self { dir, repo }
    }

    /// A repository with four files on disk, none of them staged.
    pub fn with_files() -> Self {
        let repo = Self::new();
        repo.write("balde.txt", "balde");
        repo.write("chunda.txt", "chunda");
        repo.write("bola/moises.txt", "bola moises");
        repo.write("bola/guda/arcoiro.txt", "bola guda arcoiro");
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, path: &str, content: impl AsRef<[u8]>) {
        let full = self.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
    }

    pub fn remove(&self, path: &str) {
        std::fs::remove_file(self.path().join(path)).unwrap();
    }

    /// Stage everything in the working directory, including deletions.
    pub fn stage_all(&self) {
        let mut index = self.repo.index().unwrap();
        index.add_all(["*"], IndexAddOption::DEFAULT, None).unwrap();
        index.update_all(["*"], None).unwrap();
        index.write().unwrap();
    }

    /// Stage everything and commit it on the current branch.
    pub fn commit(&self, message: &str, secs: i64, author: &str) -> Oid {
        self.stage_all();
        let parents: Vec<git2::Commit> = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok())
            .into_iter()
            .collect();
        self.commit_with_parents(message, secs, author, &parents)
    }

    /// Stage everything and commit a merge of HEAD and `other`.
    pub fn merge(&self, message: &str, secs: i64, author: &str, other: Oid) -> Oid {
        self.stage_all();
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        let other = self.repo.find_commit(other).unwrap();
        self.commit_with_parents(message, secs, author, &[head, other])
    }

    fn commit_with_parents(&self, message: &str, secs: i64, author: &str, parents: &[git2::Commit]) -> Oid {
        let tree_id = self.repo.index().unwrap().write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let email = format!("{}@example.com", author.to_lowercase());
        let sig = Signature::new(author, &email, &Time::new(secs, 0)).unwrap();
        let parents: Vec<&git2::Commit> = parents.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    /// Create `name` at HEAD and switch HEAD to it.
    pub fn branch(&self, name: &str) {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        self.repo.branch(name, &head, false).unwrap();
        self.checkout(name);
    }

    /// Point HEAD at `name` and reset index and working directory to it.
    pub fn checkout(&self, name: &str) {
        let refname = format!("refs/heads/{name}");
        self.repo.set_head(&refname).unwrap();
        let mut opts = git2::build::CheckoutBuilder::new();
        opts.force();
        self.repo.checkout_head(Some(&mut opts)).unwrap();
    }
}

/// Timestamp `days` after [`T0`].
pub fn day(days: i64) -> i64 {
    T0 + days * DAY
}
