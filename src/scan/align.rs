use serde::Serialize;
use std::collections::BTreeSet;

use super::finding::Finding;

/// A diff-free block of file lines fabricated to show a finding that no real
/// hunk covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyntheticHunk {
    pub start: usize,
    pub end: usize,
    /// Line of the finding this block was created for
    pub triggering_line: usize,
}

impl SyntheticHunk {
    pub fn contains(&self, line: usize) -> bool {
        (self.start..=self.end).contains(&line)
    }
}

/// Compute the synthetic context hunks needed to surface uncovered findings.
///
/// For each finding at L that real hunks don't render, the window
/// `[L - context, L + context]` (clamped to the file, but always reaching L) is
/// cut wherever it crosses covered lines, and each remaining run becomes one
/// hunk. Hunks from different findings are kept separate even when they
/// touch or overlap; the renderer handles repeated lines. Findings further
/// than `context` lines past `last_line` get no hunk.
pub fn synthetic_hunks(
    findings: &[Finding],
    covered: &BTreeSet<usize>,
    last_line: usize,
    context: usize,
) -> Vec<SyntheticHunk> {
    let mut lines: Vec<usize> = findings.iter().map(|f| f.line.max(1)).collect();
    lines.sort_unstable();
    lines.dedup();

    // A finding more than one window past the end of the file points at
    // nothing we could show.
    let limit = last_line.saturating_add(context);

    let mut hunks = Vec::new();
    for line in lines {
        if covered.contains(&line) {
            continue;
        }
        if line > limit {
            log::warn!("finding at line {line} is past the end of the file ({last_line} lines), not shown inline");
            continue;
        }

        let upper = last_line.max(line);
        let start = line.saturating_sub(context).max(1);
        let end = line.saturating_add(context).min(upper);

        let mut run_start: Option<usize> = None;
        for n in start..=end {
            if covered.contains(&n) {
                if let Some(s) = run_start.take() {
                    hunks.push(SyntheticHunk { start: s, end: n - 1, triggering_line: line });
                }
            } else if run_start.is_none() {
                run_start = Some(n);
            }
        }
        if let Some(s) = run_start {
            hunks.push(SyntheticHunk { start: s, end, triggering_line: line });
        }
    }

    log::debug!("{} synthetic hunks for {} findings", hunks.len(), findings.len());
    hunks
}
