mod filter;
mod git;
mod svn;

pub use filter::{apply_filter, parse_filter_expr, FilterRule};
pub use git::GitRepo;
pub use svn::SvnRepo;

use serde::Serialize;
use std::path::Path;
use std::process::Command;

use crate::error::{ReviewError, ReviewResult};

/// File change status in a commit or revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed(String), // old path
    Copied(String),  // source path
    Unknown,
}

impl FileStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FileStatus::Added => "Added",
            FileStatus::Modified => "Modified",
            FileStatus::Deleted => "Deleted",
            FileStatus::Renamed(_) => "Renamed",
            FileStatus::Copied(_) => "Copied",
            FileStatus::Unknown => "Unknown",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            FileStatus::Added => "added",
            FileStatus::Modified => "modified",
            FileStatus::Deleted => "deleted",
            FileStatus::Renamed(_) => "renamed",
            FileStatus::Copied(_) => "copied",
            FileStatus::Unknown => "unknown",
        }
    }
}

/// Metadata of one commit / revision
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeInfo {
    pub id: String,
    pub short_id: String,
    pub author: String,
    pub email: String,
    pub date: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangedFile {
    /// Repository-relative path shown on the page and used to read content
    pub path: String,
    /// Path as the VCS reports it (SVN: the full repository path)
    pub source_path: String,
    pub status: FileStatus,
}

/// A version-control backend that can describe and diff one change at a time.
pub trait Vcs {
    fn name(&self) -> &'static str;

    /// Working-copy root; full file contents are read relative to it
    fn root(&self) -> &Path;

    /// Most recent change ids, newest first
    fn recent_changes(&self, count: usize) -> ReviewResult<Vec<String>>;

    fn change_info(&self, id: &str) -> ReviewResult<ChangeInfo>;

    fn changed_files(&self, id: &str) -> ReviewResult<Vec<ChangedFile>>;

    /// Unified diff of a single file in the change
    fn file_diff(&self, id: &str, file: &ChangedFile) -> ReviewResult<String>;

    /// File name of the generated review page for this change
    fn page_name(&self, info: &ChangeInfo) -> String;
}

/// Run `program args` in `dir` and return stdout. A non-zero exit becomes
/// `CommandFailed` carrying stderr.
pub(crate) fn run_command(program: &str, args: &[&str], dir: &Path) -> ReviewResult<String> {
    log::debug!("running {} {} in {}", program, args.join(" "), dir.display());
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|source| ReviewError::CommandSpawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(ReviewError::CommandFailed {
            program: program.to_string(),
            args: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
