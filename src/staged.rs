// src/staged.rs

use crate::error::{Git2ResultExt, Result};
use crate::gateway;
use crate::model::FileContext;
use git2::{IndexEntry, Repository};

const STAGE_MASK: u16 = 0x3000;
const STAGE_SHIFT: u16 = 12;
const GITLINK_MODE: u32 = 0o160000;

/// Files recorded in the staging area, in index order.
///
/// Only staged content is served. Files that exist in the working directory
/// but were never added are not listed, and none of the returned files carry
/// history.
pub fn list_staged(repo: &Repository) -> Result<Vec<FileContext>> {
    let mut index = repo.index().index_op("Get repository index")?;
    index.read(false).index_op("Read repository index")?;

    let mut files = Vec::with_capacity(index.len());
    for entry in index.iter() {
        let path = String::from_utf8_lossy(&entry.path).into_owned();
        if let Some(reason) = skip_reason(&entry) {
            tracing::warn!("Skipping index entry {}: {}", path, reason);
            continue;
        }
        let content = gateway::read_blob(repo, entry.id)?;
        files.push(FileContext::uncommitted(path, content));
    }

    tracing::debug!("Loaded {} staged files", files.len());
    Ok(files)
}

fn skip_reason(entry: &IndexEntry) -> Option<&'static str> {
    if (entry.flags & STAGE_MASK) >> STAGE_SHIFT != 0 {
        Some("unresolved conflict stage")
    } else if entry.mode == GITLINK_MODE {
        Some("submodule link")
    } else {
        None
    }
}
