// src/assemble.rs

use crate::model::{FileContext, ProvenanceMap};

/// Join file content with its provenance, sorted by path.
///
/// Content is moved in as-is. A path with no provenance entry gets none of
/// `date`, `mdate` or `author`.
pub fn assemble(blobs: Vec<(String, Vec<u8>)>, provenance: &ProvenanceMap) -> Vec<FileContext> {
    let mut files: Vec<FileContext> = blobs
        .into_iter()
        .map(|(path, content)| match provenance.get(&path) {
            Some(p) => FileContext {
                date: Some(p.date),
                mdate: Some(p.mdate),
                author: Some(p.author.clone()),
                path,
                content,
            },
            None => FileContext::uncommitted(path, content),
        })
        .collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}
