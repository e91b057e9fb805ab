// src/repo.rs

use crate::assemble::assemble;
use crate::error::Result;
use crate::gateway;
use crate::history::HistoryWalker;
use crate::model::{Ancestry, ChangeContext, Mode};
use crate::refs::{self, ResolvedRef};
use crate::staged;
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};

/// One extraction request against one repository.
///
/// The underlying store is closed when the handle is dropped, whichever way
/// the request ends.
pub struct Repository {
    path: PathBuf,
    branch: Option<String>,
    ancestry: Ancestry,
    progress: ProgressBar,
    store: git2::Repository,
    changectx: Option<ChangeContext>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.path)
            .field("branch", &self.branch)
            .field("ancestry", &self.ancestry)
            .finish()
    }
}

impl Repository {
    pub fn open(path: impl AsRef<Path>, branch: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        let store = gateway::open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            branch: branch.map(str::to_string),
            ancestry: Ancestry::default(),
            progress: ProgressBar::hidden(),
            store,
            changectx: None,
        })
    }

    pub fn with_ancestry(mut self, ancestry: Ancestry) -> Self {
        self.ancestry = ancestry;
        self
    }

    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = bar;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// The change context loaded by the last successful [`Repository::load`].
    pub fn changectx(&self) -> Option<&ChangeContext> {
        self.changectx.as_ref()
    }

    pub fn resolve(&self) -> Result<ResolvedRef> {
        refs::resolve(&self.store, self.branch.as_deref())
    }

    /// Load content for `mode`, replacing any previously loaded context.
    ///
    /// On failure the previous context is dropped as well, so a handle never
    /// holds content from a request that errored.
    pub fn load(&mut self, mode: Mode) -> Result<&ChangeContext> {
        self.changectx = None;
        let changectx = self.build(mode)?;
        Ok(&*self.changectx.insert(changectx))
    }

    fn build(&self, mode: Mode) -> Result<ChangeContext> {
        let changectx = match mode {
            Mode::Staged => ChangeContext::staged(staged::list_staged(&self.store)?),
            Mode::Revision => self.load_revision()?,
        };
        tracing::info!(
            "Loaded {} files from {}",
            changectx.files.len(),
            changectx.refname.as_deref().unwrap_or("index")
        );
        Ok(changectx)
    }

    fn load_revision(&self) -> Result<ChangeContext> {
        let resolved = self.resolve()?;
        let provenance = HistoryWalker::new(&self.store)
            .ancestry(self.ancestry)
            .progress(self.progress.clone())
            .walk(resolved.commit)?;
        let blobs = gateway::tree_blobs(&self.store, resolved.commit)?;
        Ok(ChangeContext {
            revision: Some(resolved.commit),
            refname: Some(resolved.name),
            files: assemble(blobs, &provenance),
        })
    }

    pub fn into_changectx(self) -> Option<ChangeContext> {
        self.changectx
    }
}

/// Open `path`, load `mode` content and release the store.
pub fn extract(path: impl AsRef<Path>, branch: Option<&str>, mode: Mode) -> Result<ChangeContext> {
    Repository::open(path, branch)?.build(mode)
}
