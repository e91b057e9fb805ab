// src/history.rs

//! Per-path provenance from commit ancestry.
//!
//! The walk starts at a commit and moves backward, children before parents.
//! The first commit seen touching a path is its newest change and fixes
//! `mdate` and `author`; every later sighting moves `date` back when its
//! time is earlier, so `date` ends at the commit that introduced the path.

use crate::error::{Git2ResultExt, Result};
use crate::gateway;
use crate::model::{Ancestry, ObjectId, Provenance, ProvenanceMap};
use git2::{Commit, Delta, DiffOptions, FileMode, Repository, Sort, Tree};
use indicatif::ProgressBar;
use std::collections::btree_map::Entry;
use std::collections::BTreeSet;

/// Walk ancestry from `start` following first parents.
pub fn walk(repo: &Repository, start: ObjectId) -> Result<ProvenanceMap> {
    HistoryWalker::new(repo).walk(start)
}

pub struct HistoryWalker<'r> {
    repo: &'r Repository,
    ancestry: Ancestry,
    progress: ProgressBar,
}

impl<'r> HistoryWalker<'r> {
    pub fn new(repo: &'r Repository) -> Self {
        Self {
            repo,
            ancestry: Ancestry::default(),
            progress: ProgressBar::hidden(),
        }
    }

    pub fn ancestry(mut self, ancestry: Ancestry) -> Self {
        self.ancestry = ancestry;
        self
    }

    /// Report one tick per visited commit on `bar`.
    pub fn progress(mut self, bar: ProgressBar) -> Self {
        self.progress = bar;
        self
    }

    /// Provenance of every path added or changed in the ancestry of `start`.
    ///
    /// Any object that fails to load aborts the walk; nothing collected so
    /// far is returned.
    pub fn walk(&self, start: ObjectId) -> Result<ProvenanceMap> {
        let mut revwalk = self.repo.revwalk().store_op("Create revision walker")?;
        // The walker keeps its own seen-set, so a commit reachable along
        // several paths of a diamond is still yielded once.
        revwalk
            .set_sorting(Sort::TOPOLOGICAL | Sort::TIME)
            .store_op("Sort revision walker")?;
        revwalk.push(start).store_op("Push start commit")?;
        if self.ancestry == Ancestry::FirstParent {
            revwalk.simplify_first_parent().store_op("Simplify first parent")?;
        }

        self.progress.set_message("Walking history");
        let mut provenance = ProvenanceMap::new();
        let mut visited = 0usize;

        for oid in revwalk {
            let oid = oid.store_op("Walk history")?;
            let commit = self.repo.find_commit(oid).store_op("Commit lookup")?;
            let touched = self.touched_paths(&commit)?;
            visited += 1;
            self.progress.inc(1);

            if touched.is_empty() {
                continue;
            }
            let time = gateway::commit_time(&commit)?;

            for path in touched {
                match provenance.entry(path) {
                    Entry::Vacant(slot) => {
                        slot.insert(Provenance {
                            date: time,
                            mdate: time,
                            author: gateway::commit_author(&commit),
                        });
                    }
                    Entry::Occupied(mut slot) => {
                        // Only ever older, so a skewed parent clock cannot
                        // push `date` past `mdate`.
                        let seen = slot.get_mut();
                        if time < seen.date {
                            seen.date = time;
                        }
                    }
                }
            }

            if visited % 100 == 0 {
                tracing::debug!("Walked {} commits, {} paths so far", visited, provenance.len());
            }
        }

        self.progress.finish_with_message("History walk complete");
        tracing::debug!("Walked {} commits from {}, {} paths", visited, start, provenance.len());
        Ok(provenance)
    }

    /// Paths whose blob in `commit` differs from the same path in its parents.
    ///
    /// A root commit introduces everything in its tree. With several parents,
    /// a path only counts when it differs from every one of them.
    fn touched_paths(&self, commit: &Commit) -> Result<BTreeSet<String>> {
        let tree = commit.tree().store_op("Tree lookup")?;

        let parent_count = match self.ancestry {
            Ancestry::FirstParent => commit.parent_count().min(1),
            Ancestry::AllParents => commit.parent_count(),
        };
        if parent_count == 0 {
            return self.changed_paths(None, &tree);
        }

        let mut touched: Option<BTreeSet<String>> = None;
        for i in 0..parent_count {
            let parent = commit.parent(i).store_op("Parent lookup")?;
            let parent_tree = parent.tree().store_op("Tree lookup")?;
            let changed = self.changed_paths(Some(&parent_tree), &tree)?;
            touched = Some(match touched {
                None => changed,
                Some(acc) => acc.intersection(&changed).cloned().collect(),
            });
        }
        Ok(touched.unwrap_or_default())
    }

    fn changed_paths(&self, old: Option<&Tree>, new: &Tree) -> Result<BTreeSet<String>> {
        let mut diff_opts = DiffOptions::new();
        diff_opts.ignore_filemode(true);
        diff_opts.ignore_submodules(true);

        let diff = self
            .repo
            .diff_tree_to_tree(old, Some(new), Some(&mut diff_opts))
            .store_op("Diff trees")?;

        let mut paths = BTreeSet::new();
        for delta in diff.deltas() {
            if !matches!(delta.status(), Delta::Added | Delta::Modified | Delta::Typechange) {
                continue;
            }
            let file = delta.new_file();
            if file.mode() == FileMode::Commit || file.id() == delta.old_file().id() {
                continue;
            }
            if let Some(path) = file.path_bytes() {
                paths.insert(String::from_utf8_lossy(path).into_owned());
            }
        }
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Signature, Time};
    use tempfile::TempDir;

    fn commit(repo: &Repository, files: &[(&str, &str)], secs: i64, parents: &[&Commit]) -> ObjectId {
        let mut builder = repo.treebuilder(None).unwrap();
        for (name, content) in files {
            let blob = repo.blob(content.as_bytes()).unwrap();
            builder.insert(*name, blob, 0o100644).unwrap();
        }
        let tree = repo.find_tree(builder.write().unwrap()).unwrap();
        let sig = Signature::new("Walker", "walker@example.com", &Time::new(secs, 0)).unwrap();
        repo.commit(None, &sig, &sig, "msg", &tree, parents).unwrap()
    }

    #[test]
    fn root_commit_introduces_everything() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let root = commit(&repo, &[("a.md", "a"), ("b.md", "b")], 1_000, &[]);

        let map = walk(&repo, root).unwrap();
        assert_eq!(map.keys().cloned().collect::<Vec<_>>(), vec!["a.md", "b.md"]);
        let a = &map["a.md"];
        assert_eq!(a.date, a.mdate);
        assert_eq!(a.date.timestamp(), 1_000);
        assert_eq!(a.author, "Walker <walker@example.com>");
    }

    #[test]
    fn unchanged_paths_keep_older_mdate() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let c1 = commit(&repo, &[("a.md", "a"), ("b.md", "b")], 1_000, &[]);
        let c1 = repo.find_commit(c1).unwrap();
        let c2 = commit(&repo, &[("a.md", "a"), ("b.md", "b2")], 2_000, &[&c1]);

        let map = walk(&repo, c2).unwrap();
        assert_eq!(map["a.md"].mdate.timestamp(), 1_000);
        assert_eq!(map["b.md"].mdate.timestamp(), 2_000);
        assert_eq!(map["b.md"].date.timestamp(), 1_000);
    }

    #[test]
    fn deleted_paths_are_not_touched() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let c1 = commit(&repo, &[("a.md", "a"), ("gone.md", "x")], 1_000, &[]);
        let c1 = repo.find_commit(c1).unwrap();
        let c2 = commit(&repo, &[("a.md", "a")], 2_000, &[&c1]);
        let c2 = repo.find_commit(c2).unwrap();

        let touched = HistoryWalker::new(&repo).touched_paths(&c2).unwrap();
        assert!(touched.is_empty());
    }

    #[test]
    fn missing_start_commit_fails() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let missing = ObjectId::from_str("0123456789abcdef0123456789abcdef01234567").unwrap();
        assert!(walk(&repo, missing).is_err());
    }
}
