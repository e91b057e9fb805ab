// src/refs.rs

use crate::error::{Git2ResultExt, GitError, Result};
use crate::model::ObjectId;
use git2::{ErrorCode, Repository};

/// A reference and the commit it points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRef {
    /// Fully qualified name, e.g. `refs/heads/master`
    pub name: String,
    pub commit: ObjectId,
}

/// Resolve `refs/heads/<branch>`, or the repository's current pointer when
/// `branch` is `None`. A single lookup; no history is read.
pub fn resolve(repo: &Repository, branch: Option<&str>) -> Result<ResolvedRef> {
    let reference = match branch {
        None => match repo.head() {
            Ok(reference) => reference,
            Err(e) if is_missing(&e) => return Err(GitError::reference_not_found(unborn_head_name(repo)?)),
            Err(e) => return Err(GitError::store("Resolve HEAD", &e)),
        },
        Some(branch) => {
            let refname = format!("refs/heads/{branch}");
            match repo.find_reference(&refname) {
                Ok(reference) => reference,
                Err(e) if is_missing(&e) => return Err(GitError::reference_not_found(refname)),
                Err(e) => return Err(GitError::store("Lookup reference", &e)),
            }
        }
    };

    let name = String::from_utf8_lossy(reference.name_bytes()).into_owned();
    let commit = reference.peel_to_commit().store_op("Peel reference")?;
    tracing::debug!("Resolved {} to {}", name, commit.id());
    Ok(ResolvedRef {
        name,
        commit: commit.id(),
    })
}

fn is_missing(err: &git2::Error) -> bool {
    matches!(err.code(), ErrorCode::NotFound | ErrorCode::UnbornBranch)
}

/// Name HEAD points at even when that branch has no commits yet.
fn unborn_head_name(repo: &Repository) -> Result<String> {
    let head = repo.find_reference("HEAD").store_op("Read HEAD")?;
    Ok(head.symbolic_target().unwrap_or("HEAD").to_string())
}
