use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Analyzer severity. Ordered so that `max()` picks the worst one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    General,
    Severe,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::General => "general",
            Severity::Severe => "severe",
        }
    }

    /// CSS class used on panel items and annotation rows
    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::General => "",
            Severity::Severe => "severe",
        }
    }
}

/// One issue as reported by the analyzer, before merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIssue {
    pub file: String,
    pub line: usize,
    pub severity: Severity,
    pub description: String,
    pub suggestion: String,
}

/// A line-level finding: every raw issue on the same (file, line) folded into one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub file: String,
    pub line: usize,
    pub severity: Severity,
    pub description: String,
    pub suggestion: String,
    pub occurrence_count: usize,
}

impl Finding {
    pub fn anchor_id(&self) -> String {
        anchor_id(&self.file, self.line)
    }
}

const ISSUE_SEPARATOR: &str = "\n============\n";

/// Merge raw issues so there is exactly one `Finding` per (file, line).
///
/// The merged severity is the worst of the group. A lone issue keeps its text
/// verbatim; a group gets a numbered description listing every issue and a
/// suggestion pointing at it. Output is sorted by file, then line.
pub fn merge_issues(raw: Vec<RawIssue>) -> Vec<Finding> {
    let mut grouped: BTreeMap<(String, usize), Vec<RawIssue>> = BTreeMap::new();
    for issue in raw {
        let line = issue.line.max(1);
        grouped
            .entry((issue.file.clone(), line))
            .or_default()
            .push(issue);
    }

    grouped
        .into_iter()
        .map(|((file, line), issues)| {
            let severity = issues
                .iter()
                .map(|i| i.severity)
                .max()
                .unwrap_or(Severity::General);
            let occurrence_count = issues.len();

            let (description, suggestion) = if let [only] = issues.as_slice() {
                (only.description.clone(), only.suggestion.clone())
            } else {
                let parts: Vec<String> = issues
                    .iter()
                    .enumerate()
                    .map(|(i, issue)| {
                        format!(
                            "Issue {} ({})\nDescription: {}\nSuggestion: {}",
                            i + 1,
                            issue.severity.label(),
                            issue.description,
                            issue.suggestion
                        )
                    })
                    .collect();
                (
                    parts.join(ISSUE_SEPARATOR),
                    format!("{occurrence_count} issues on this line, see the description for each"),
                )
            };

            Finding {
                file,
                line,
                severity,
                description,
                suggestion,
                occurrence_count,
            }
        })
        .collect()
}

/// Stable DOM id for the annotation row of a finding.
/// The findings panel links to it, so it must only depend on (file, line).
pub fn anchor_id(file: &str, line: usize) -> String {
    let safe: String = file
        .chars()
        .map(|c| match c {
            '/' | '\\' | '.' => '-',
            c => c,
        })
        .collect();
    format!("scanresult-{safe}-{line}")
}
