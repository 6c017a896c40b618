mod align;
mod finding;
mod loader;
mod path;

pub use align::{synthetic_hunks, SyntheticHunk};
pub use finding::{anchor_id, merge_issues, Finding, RawIssue, Severity};
pub use loader::load_scan_dir;
pub use path::{basename, match_changed_file, normalize_scan_path};

use std::collections::BTreeMap;

/// Findings split by the changed file they belong to.
#[derive(Debug, Default)]
pub struct AssignedFindings {
    /// Keyed by changed-file path; each list sorted by line
    pub by_file: BTreeMap<String, Vec<Finding>>,
    /// Findings that matched no changed file (still listed in the panel)
    pub unmatched: Vec<Finding>,
}

impl AssignedFindings {
    pub fn for_file(&self, path: &str) -> &[Finding] {
        self.by_file.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every finding, matched ones first in file order
    pub fn all(&self) -> impl Iterator<Item = (&Finding, bool)> {
        self.by_file
            .values()
            .flatten()
            .map(|f| (f, true))
            .chain(self.unmatched.iter().map(|f| (f, false)))
    }

    pub fn total(&self) -> usize {
        self.by_file.values().map(Vec::len).sum::<usize>() + self.unmatched.len()
    }
}

/// Attach raw issues to changed files and merge them per line.
///
/// Issues are re-keyed to the changed file's own path before merging so two
/// spellings of the same file collapse together and anchor ids match the diff.
pub fn assign_findings(raw: Vec<RawIssue>, changed: &[String]) -> AssignedFindings {
    let mut matched = Vec::new();
    let mut unmatched = Vec::new();
    for mut issue in raw {
        match match_changed_file(&issue.file, changed) {
            Some(path) => {
                issue.file = path.to_string();
                matched.push(issue);
            }
            None => unmatched.push(issue),
        }
    }

    if !unmatched.is_empty() {
        log::info!("{} scan issues match no changed file", unmatched.len());
    }

    let mut by_file: BTreeMap<String, Vec<Finding>> = BTreeMap::new();
    for finding in merge_issues(matched) {
        by_file.entry(finding.file.clone()).or_default().push(finding);
    }

    AssignedFindings {
        by_file,
        unmatched: merge_issues(unmatched),
    }
}
