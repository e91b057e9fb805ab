// src/model.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Identifies a commit, tree or blob by its hash
pub type ObjectId = git2::Oid;

/// Which content a change context is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The staging area, with no history
    Staged,
    /// A resolved branch or the default pointer
    Revision,
}

/// How the history walker treats merge commits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ancestry {
    #[default]
    FirstParent,
    AllParents,
}

/// History of a single path as seen from the walk's starting commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provenance {
    /// Oldest commit that touched the path
    pub date: DateTime<Utc>,
    /// Newest commit that touched the path
    pub mdate: DateTime<Utc>,
    /// Author of the newest touching commit
    pub author: String,
}

/// Maps a repository-relative path to its provenance
pub type ProvenanceMap = BTreeMap<String, Provenance>;

/// One file and its history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileContext {
    pub path: String,
    #[serde(skip)]
    pub content: Vec<u8>,
    pub date: Option<DateTime<Utc>>,
    pub mdate: Option<DateTime<Utc>>,
    pub author: Option<String>,
}

impl FileContext {
    /// A file that has never been committed.
    pub fn uncommitted(path: String, content: Vec<u8>) -> Self {
        Self {
            path,
            content,
            date: None,
            mdate: None,
            author: None,
        }
    }

    pub fn content_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }
}

/// Content as of a commit, or as of the staging area when `revision` is `None`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeContext {
    #[serde(serialize_with = "serialize_revision")]
    pub revision: Option<ObjectId>,
    pub refname: Option<String>,
    pub files: Vec<FileContext>,
}

impl ChangeContext {
    pub fn staged(files: Vec<FileContext>) -> Self {
        Self {
            revision: None,
            refname: None,
            files,
        }
    }

    pub fn file(&self, path: &str) -> Option<&FileContext> {
        self.files.iter().find(|f| f.path == path)
    }
}

fn serialize_revision<S>(revision: &Option<ObjectId>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match revision {
        Some(oid) => serializer.serialize_some(&oid.to_string()),
        None => serializer.serialize_none(),
    }
}
