use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::finding::{RawIssue, Severity};
use super::path::normalize_scan_path;
use crate::error::{ReviewError, ReviewResult};

// ── Analyzer JSON ──

/// One analyzer report: a single source file and its issues.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanReport {
    pub file: Option<String>,
    /// Excerpt of the scanned source, used to recover line numbers when an
    /// issue carries no usable range
    #[serde(rename = "源码", default)]
    pub source: String,
    #[serde(rename = "可能存在的问题", default)]
    pub possible: Vec<ScanIssue>,
    #[serde(rename = "肯定存在的问题", default)]
    pub definite: Vec<ScanIssue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanIssue {
    #[serde(rename = "行号范围", default)]
    pub line_range: Option<LineRange>,
    #[serde(rename = "问题描述", default)]
    pub description: String,
    #[serde(rename = "修改意见", default)]
    pub suggestion: String,
}

/// `行号范围` shows up both as `"3345-3348"` and as a bare number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LineRange {
    Number(u64),
    Text(String),
}

impl ScanReport {
    /// Flatten into raw issues against the normalized file path.
    pub fn into_issues(self, markers: &[String]) -> ReviewResult<Vec<RawIssue>> {
        let raw_file = self.file.as_deref().unwrap_or_default();
        if raw_file.trim().is_empty() {
            return Err(ReviewError::ScanResult {
                path: PathBuf::new(),
                reason: "missing 'file' field".into(),
            });
        }
        let file = normalize_scan_path(raw_file, markers);

        let general = self.possible.into_iter().map(|i| (i, Severity::General));
        let severe = self.definite.into_iter().map(|i| (i, Severity::Severe));

        Ok(general
            .chain(severe)
            .map(|(issue, severity)| RawIssue {
                file: file.clone(),
                line: resolve_line(issue.line_range.as_ref(), &self.source),
                severity,
                description: issue.description,
                suggestion: issue.suggestion,
            })
            .collect())
    }
}

/// Starting line of a range. `"a-b"` → a, digits → the number; otherwise the
/// first line number that opens a line of the source excerpt, else 1.
pub fn resolve_line(range: Option<&LineRange>, source: &str) -> usize {
    let parsed = match range {
        Some(LineRange::Number(n)) => usize::try_from(*n).ok(),
        Some(LineRange::Text(text)) => {
            let text = text.trim();
            match text.split_once('-') {
                Some((start, _)) => start.trim().parse().ok(),
                None => text.parse().ok(),
            }
        }
        None => Some(1),
    };

    parsed
        .filter(|n| *n > 0)
        .or_else(|| first_numbered_line(source))
        .unwrap_or(1)
}

fn first_numbered_line(source: &str) -> Option<usize> {
    source.lines().skip(1).find_map(|line| {
        let digits: String = line.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok().filter(|n: &usize| *n > 0)
    })
}

// ── Directory loading ──

/// Load every `*.json` report in `dir`. Unreadable or malformed reports are
/// skipped with a warning so that one bad file doesn't hide the rest.
pub fn load_scan_dir(dir: &Path, markers: &[String]) -> Vec<RawIssue> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Scan results directory {} unreadable: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();
    files.sort();
    log::info!("Found {} scan result files in {}", files.len(), dir.display());

    let mut issues = Vec::new();
    for path in files {
        match load_scan_file(&path, markers) {
            Ok(found) => {
                log::debug!("Loaded {} issues from {}", found.len(), path.display());
                issues.extend(found);
            }
            Err(e) => log::warn!("{e}"),
        }
    }
    issues
}

fn load_scan_file(path: &Path, markers: &[String]) -> ReviewResult<Vec<RawIssue>> {
    let content = std::fs::read_to_string(path).map_err(|e| ReviewError::ScanResult {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let report: ScanReport =
        serde_json::from_str(&content).map_err(|e| ReviewError::ScanResult {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    report.into_issues(markers).map_err(|e| match e {
        ReviewError::ScanResult { reason, .. } => ReviewError::ScanResult {
            path: path.to_path_buf(),
            reason,
        },
        other => other,
    })
}
