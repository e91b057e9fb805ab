// src/error.rs

//! Error taxonomy for content extraction.
//!
//! Every failure from the object store is translated into one of three
//! variants at the call site that produced it. The `Display` form is the
//! description handed to the serving layer when it aborts a request.

use thiserror::Error;

/// Status code the serving layer uses for every extraction failure.
pub const INTERNAL_FAILURE: u16 = 500;

pub type Result<T> = std::result::Result<T, GitError>;

#[derive(Debug, Error)]
pub enum GitError {
    /// The store could not be opened, or an object could not be loaded.
    #[error("Git: {}", labelled(.op.as_deref(), .message))]
    Store {
        op: Option<String>,
        message: String,
    },

    /// A branch, or the default pointer of an empty repository, does not resolve.
    #[error("Git: Reference '{refname}' not found")]
    ReferenceNotFound { refname: String },

    /// The staging area could not be loaded.
    #[error("Git: {op} - {message}")]
    IndexRead { op: String, message: String },
}

fn labelled(op: Option<&str>, message: &str) -> String {
    match op {
        Some(op) => format!("{op} - {message}"),
        None => message.to_string(),
    }
}

fn diagnostic(err: &git2::Error) -> String {
    let message = err.message();
    if message.is_empty() {
        "Unknown error".to_string()
    } else {
        message.to_string()
    }
}

impl GitError {
    pub fn store(op: &str, err: &git2::Error) -> Self {
        GitError::Store {
            op: Some(op.to_string()),
            message: diagnostic(err),
        }
    }

    pub fn index_read(op: &str, err: &git2::Error) -> Self {
        GitError::IndexRead {
            op: op.to_string(),
            message: diagnostic(err),
        }
    }

    pub fn reference_not_found(refname: impl Into<String>) -> Self {
        GitError::ReferenceNotFound {
            refname: refname.into(),
        }
    }

    /// Status the serving layer should abort with.
    pub fn status(&self) -> u16 {
        INTERNAL_FAILURE
    }

    /// Description string the serving layer should abort with.
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Store {
            op: None,
            message: diagnostic(&err),
        }
    }
}

/// Labels a raw `git2` result with the operation that produced it.
pub trait Git2ResultExt<T> {
    fn store_op(self, op: &str) -> Result<T>;
    fn index_op(self, op: &str) -> Result<T>;
}

impl<T> Git2ResultExt<T> for std::result::Result<T, git2::Error> {
    fn store_op(self, op: &str) -> Result<T> {
        self.map_err(|e| GitError::store(op, &e))
    }

    fn index_op(self, op: &str) -> Result<T> {
        self.map_err(|e| GitError::index_read(op, &e))
    }
}
