// src/lib.rs

//! Dated, attributed file content extracted from a git repository.
//!
//! A [`Repository`] is opened per request. It serves either the staging
//! area ([`Mode::Staged`], no history) or the tree of a branch
//! ([`Mode::Revision`]) where each file carries the date it was introduced,
//! the date it was last changed and the author of that change.
//!
//! ```no_run
//! use gitfolio::{extract, Mode};
//!
//! let ctx = extract("/srv/blog", Some("master"), Mode::Revision)?;
//! for file in &ctx.files {
//!     println!("{} {:?}", file.path, file.mdate);
//! }
//! # Ok::<(), gitfolio::GitError>(())
//! ```

pub mod assemble;
pub mod error;
pub mod gateway;
pub mod history;
pub mod model;
pub mod refs;
pub mod repo;
pub mod staged;

pub use error::{GitError, Result, INTERNAL_FAILURE};
pub use model::{Ancestry, ChangeContext, FileContext, Mode, ObjectId, Provenance, ProvenanceMap};
pub use refs::ResolvedRef;
pub use repo::{extract, Repository};
