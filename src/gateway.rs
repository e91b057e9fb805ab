// src/gateway.rs

//! Object-store access: opening repositories and loading objects.
//!
//! Nothing here keeps a live object handle past the call that loaded it;
//! callers pass [`ObjectId`]s around and come back here for content.

use crate::error::{Git2ResultExt, GitError, Result};
use crate::model::ObjectId;
use chrono::{DateTime, Utc};
use git2::{Commit, ObjectType, Repository, RepositoryOpenFlags, TreeWalkMode, TreeWalkResult};
use std::ffi::OsStr;
use std::path::Path;

/// Open the repository containing `path`, searching upward like `git` does.
pub fn open(path: &Path) -> Result<Repository> {
    let repo = Repository::open_ext(path, RepositoryOpenFlags::empty(), std::iter::empty::<&OsStr>())
        .store_op("Open repository")?;
    tracing::info!("Opened git repository at: {}", repo.path().display());
    Ok(repo)
}

/// Raw bytes of a blob, unchanged.
pub fn read_blob(repo: &Repository, id: ObjectId) -> Result<Vec<u8>> {
    let blob = repo.find_blob(id).store_op("Object lookup")?;
    Ok(blob.content().to_vec())
}

/// Every blob reachable from the tree of `commit_id`, as `(path, content)`.
///
/// Paths are repository-relative with `/` separators. Submodule links are
/// not files in this repository and are left out.
pub fn tree_blobs(repo: &Repository, commit_id: ObjectId) -> Result<Vec<(String, Vec<u8>)>> {
    let commit = repo.find_commit(commit_id).store_op("Commit lookup")?;
    let tree = commit.tree().store_op("Tree lookup")?;

    let mut entries = Vec::new();
    tree.walk(TreeWalkMode::PreOrder, |root, entry| {
        match entry.kind() {
            Some(ObjectType::Blob) => {
                let name = String::from_utf8_lossy(entry.name_bytes());
                entries.push((format!("{root}{name}"), entry.id()));
            }
            Some(ObjectType::Commit) => {
                tracing::debug!("Skipping submodule link {}{}", root, String::from_utf8_lossy(entry.name_bytes()));
            }
            _ => {}
        }
        TreeWalkResult::Ok
    })
    .store_op("Tree walk")?;

    let mut blobs = Vec::with_capacity(entries.len());
    for (path, id) in entries {
        blobs.push((path, read_blob(repo, id)?));
    }
    Ok(blobs)
}

/// Committer time of `commit` in UTC.
pub fn commit_time(commit: &Commit) -> Result<DateTime<Utc>> {
    let seconds = commit.time().seconds();
    DateTime::from_timestamp(seconds, 0).ok_or_else(|| GitError::Store {
        op: Some("Commit time".to_string()),
        message: format!("timestamp {seconds} of commit {} is out of range", commit.id()),
    })
}

/// Author identity of `commit` as `Name <email>`.
pub fn commit_author(commit: &Commit) -> String {
    commit.author().to_string()
}
