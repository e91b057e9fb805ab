// src/cli.rs

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path inside the git repository to read
    #[arg(short, long, env = "GITFOLIO_REPO", default_value = ".")]
    pub repo: PathBuf,

    /// Branch to read; the current HEAD when omitted
    #[arg(short, long, env = "GITFOLIO_BRANCH")]
    pub branch: Option<String>,

    /// Read the staging area instead of a branch; any branch is ignored
    #[arg(long)]
    pub staged: bool,

    /// How merge commits are followed when dating files
    #[arg(long, value_enum, default_value_t = Ancestry::FirstParent)]
    pub ancestry: Ancestry,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Summary)]
    pub format: Format,

    /// Include UTF-8 file content in JSON output
    #[arg(long)]
    pub content: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable logging
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug, Copy)]
pub enum Ancestry {
    /// Follow only the first parent of merges
    FirstParent,
    /// Follow every parent of merges
    AllParents,
}

impl From<Ancestry> for gitfolio::Ancestry {
    fn from(value: Ancestry) -> Self {
        match value {
            Ancestry::FirstParent => gitfolio::Ancestry::FirstParent,
            Ancestry::AllParents => gitfolio::Ancestry::AllParents,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum Format {
    /// One line per file
    Summary,
    /// The change context as JSON
    Json,
}

impl Args {
    pub fn mode(&self) -> gitfolio::Mode {
        if self.staged {
            gitfolio::Mode::Staged
        } else {
            gitfolio::Mode::Revision
        }
    }
}
