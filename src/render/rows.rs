use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::content::FileContent;
use super::units::{ordered_units, RenderUnit};
use crate::diff::{covered_lines, DiffHunk, FileDiff, LineKind};
use crate::scan::{synthetic_hunks, Finding, Severity, SyntheticHunk};

// ── Row model ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    HunkHeader,
    SyntheticHeader,
    Added,
    Removed,
    Context,
    Other,
    /// Context row of a synthetic hunk
    SyntheticContext,
    /// Context row revealed by an expand control
    ExpandedContext,
    Annotation,
    Expand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpandDirection {
    Above,
    Below,
}

/// An on-demand affordance revealing the unrendered lines `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExpandControl {
    pub direction: ExpandDirection,
    pub start: usize,
    pub end: usize,
}

impl ExpandControl {
    pub fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A line of code in the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeRow {
    pub kind: RowKind,
    pub old_num: Option<usize>,
    pub new_num: Option<usize>,
    pub content: String,
}

/// A finding shown inline, right after the line it concerns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub anchor: String,
    pub line: usize,
    pub severity: Severity,
    pub description: String,
    pub suggestion: String,
    pub occurrence_count: usize,
}

impl From<&Finding> for Annotation {
    fn from(f: &Finding) -> Self {
        Annotation {
            anchor: f.anchor_id(),
            line: f.line,
            severity: f.severity,
            description: f.description.clone(),
            suggestion: f.suggestion.clone(),
            occurrence_count: f.occurrence_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "row", rename_all = "snake_case")]
pub enum Row {
    HunkHeader { text: String },
    SyntheticHeader(SyntheticHunk),
    Code(CodeRow),
    Annotation(Annotation),
    Expand(ExpandControl),
}

impl Row {
    pub fn kind(&self) -> RowKind {
        match self {
            Row::HunkHeader { .. } => RowKind::HunkHeader,
            Row::SyntheticHeader(_) => RowKind::SyntheticHeader,
            Row::Code(code) => code.kind,
            Row::Annotation(_) => RowKind::Annotation,
            Row::Expand(_) => RowKind::Expand,
        }
    }

    pub fn sign(&self) -> &'static str {
        match self.kind() {
            RowKind::Added => "+",
            RowKind::Removed => "-",
            RowKind::Annotation => "!",
            _ => " ",
        }
    }

    pub fn old_num(&self) -> Option<usize> {
        match self {
            Row::Code(code) => code.old_num,
            _ => None,
        }
    }

    pub fn new_num(&self) -> Option<usize> {
        match self {
            Row::Code(code) => code.new_num,
            _ => None,
        }
    }

    /// Text of the row: code, header, or the annotation's description
    pub fn content(&self) -> String {
        match self {
            Row::HunkHeader { text } => text.clone(),
            Row::SyntheticHeader(s) => synthetic_header_label(s),
            Row::Code(code) => code.content.clone(),
            Row::Annotation(a) => a.description.clone(),
            Row::Expand(c) => format!("{} hidden lines ({}-{})", c.len(), c.start, c.end),
        }
    }
}

pub fn synthetic_header_label(s: &SyntheticHunk) -> String {
    format!(
        "@@ context {},{} @@ finding at line {}",
        s.start,
        s.end + 1 - s.start,
        s.triggering_line
    )
}

// ── Rendering ──

/// Everything needed to draw one file's table.
#[derive(Debug, Clone, Serialize)]
pub struct FileRendering {
    pub path: String,
    pub rows: Vec<Row>,
    pub last_line: usize,
    /// Empty diff and nothing to annotate
    pub no_changes: bool,
    /// Set when the full file couldn't be read and context lines are blank
    pub content_missing: Option<String>,
}

impl FileRendering {
    pub fn expand_controls(&self) -> impl Iterator<Item = &ExpandControl> {
        self.rows.iter().filter_map(|r| match r {
            Row::Expand(c) => Some(c),
            _ => None,
        })
    }

    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.rows.iter().filter_map(|r| match r {
            Row::Annotation(a) => Some(a),
            _ => None,
        })
    }
}

/// Render one file: real hunks plus synthetic context for uncovered findings,
/// with expand controls over every gap in `[1, last_line]`.
///
/// `findings` must belong to this file. Annotations are emitted once per line
/// for the whole file, right after the first row that carries that line.
pub fn render_file(
    path: &str,
    diff: &FileDiff,
    content: &FileContent,
    findings: &[Finding],
    context: usize,
) -> FileRendering {
    let content_missing = content.missing_reason().map(str::to_string);

    if diff.is_empty() && findings.is_empty() {
        return FileRendering {
            path: path.to_string(),
            rows: Vec::new(),
            last_line: content.len(),
            no_changes: true,
            content_missing,
        };
    }

    let covered = covered_lines(&diff.hunks);
    let hunk_end = diff.hunks.iter().map(|h| h.new_end()).max().unwrap_or(0);
    let last_line = content.len().max(hunk_end);
    let synthetic = synthetic_hunks(findings, &covered, last_line, context);
    let units = ordered_units(&diff.hunks, &synthetic);

    let mut writer = RowWriter {
        rows: Vec::new(),
        by_line: findings.iter().map(|f| (f.line, f)).collect(),
        annotated: HashSet::new(),
    };

    let mut prev_end = 0;
    for unit in &units {
        if unit.start() > prev_end + 1 {
            writer.rows.push(Row::Expand(ExpandControl {
                direction: ExpandDirection::Above,
                start: prev_end + 1,
                end: unit.start() - 1,
            }));
        }

        match unit {
            RenderUnit::Real(hunk) => writer.real_hunk(hunk),
            RenderUnit::Synthetic(s) => writer.synthetic_hunk(s, content, prev_end),
        }
        prev_end = prev_end.max(unit.end());
    }

    if prev_end < last_line {
        writer.rows.push(Row::Expand(ExpandControl {
            direction: ExpandDirection::Below,
            start: prev_end + 1,
            end: last_line,
        }));
    }

    FileRendering {
        path: path.to_string(),
        rows: writer.rows,
        last_line,
        no_changes: false,
        content_missing,
    }
}

struct RowWriter<'f> {
    rows: Vec<Row>,
    by_line: HashMap<usize, &'f Finding>,
    annotated: HashSet<usize>,
}

impl RowWriter<'_> {
    fn real_hunk(&mut self, hunk: &DiffHunk) {
        self.rows.push(Row::HunkHeader {
            text: hunk.header.clone(),
        });

        let mut old_line = hunk.old_start;
        let mut new_line = hunk.new_start;
        for line in &hunk.lines {
            let (kind, old_num, new_num) = match line.kind {
                LineKind::Added => {
                    new_line += 1;
                    (RowKind::Added, None, Some(new_line - 1))
                }
                LineKind::Removed => {
                    old_line += 1;
                    (RowKind::Removed, Some(old_line - 1), None)
                }
                LineKind::Context => {
                    old_line += 1;
                    new_line += 1;
                    (RowKind::Context, Some(old_line - 1), Some(new_line - 1))
                }
                LineKind::Other => (RowKind::Other, None, None),
            };
            self.rows.push(Row::Code(CodeRow {
                kind,
                old_num,
                new_num,
                content: line.text.clone(),
            }));
            // Findings are reported against the new file; a removed line has no
            // new number and never carries one.
            if let Some(n) = new_num {
                self.annotate(n);
            }
        }
    }

    /// Lines up to `printed_through` were already rendered by an earlier unit
    /// and are not repeated; the header is always kept.
    fn synthetic_hunk(&mut self, hunk: &SyntheticHunk, content: &FileContent, printed_through: usize) {
        self.rows.push(Row::SyntheticHeader(*hunk));
        for n in hunk.start.max(printed_through + 1)..=hunk.end {
            self.rows.push(Row::Code(CodeRow {
                kind: RowKind::SyntheticContext,
                old_num: None,
                new_num: Some(n),
                content: content.line(n).to_string(),
            }));
            self.annotate(n);
        }
    }

    fn annotate(&mut self, line: usize) {
        if let Some(finding) = self.by_line.get(&line) {
            if self.annotated.insert(line) {
                self.rows.push(Row::Annotation(Annotation::from(*finding)));
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::diff::parse_file_diff;

    pub(crate) fn numbered_file(n: usize) -> FileContent {
        FileContent::Available((1..=n).map(|i| format!("line {i}")).collect())
    }

    pub(crate) fn finding(line: usize) -> Finding {
        Finding {
            file: "src/a.c".to_string(),
            line,
            severity: Severity::General,
            description: format!("issue at {line}"),
            suggestion: "fix".to_string(),
            occurrence_count: 1,
        }
    }

    fn hunk_10_12() -> FileDiff {
        parse_file_diff("@@ -10,3 +10,3 @@\n line 10\n-old 11\n+line 11\n line 12\n")
    }

    /// Every line of [1, last] is either rendered with a new number or inside
    /// exactly one expand control, and no two rows render the same line.
    pub(crate) fn assert_gap_free(r: &FileRendering) {
        let mut seen = vec![0usize; r.last_line + 1];
        for row in &r.rows {
            if let Some(n) = row.new_num() {
                if n <= r.last_line {
                    seen[n] += 1;
                }
            }
            if let Row::Expand(c) = row {
                for n in c.start..=c.end {
                    seen[n] += 1;
                }
            }
        }
        for n in 1..=r.last_line {
            assert_eq!(seen[n], 1, "line {n} reachable {} times", seen[n]);
        }
    }

    fn new_numbers(r: &FileRendering) -> Vec<usize> {
        r.rows.iter().filter_map(Row::new_num).collect()
    }

    #[test]
    fn empty_diff_without_findings_is_no_changes() {
        let r = render_file("a.c", &FileDiff::default(), &numbered_file(5), &[], 10);
        assert!(r.no_changes);
        assert!(r.rows.is_empty());
    }

    #[test]
    fn real_hunk_with_gaps_on_both_sides() {
        let r = render_file("a.c", &hunk_10_12(), &numbered_file(100), &[], 10);
        assert!(!r.no_changes);
        assert_eq!(r.last_line, 100);
        let controls: Vec<_> = r.expand_controls().copied().collect();
        assert_eq!(
            controls,
            vec![
                ExpandControl { direction: ExpandDirection::Above, start: 1, end: 9 },
                ExpandControl { direction: ExpandDirection::Below, start: 13, end: 100 },
            ]
        );
        assert_eq!(r.rows[1], Row::HunkHeader { text: "@@ -10,3 +10,3 @@".into() });
        assert_gap_free(&r);
    }

    #[test]
    fn removed_rows_carry_old_numbers_only() {
        let r = render_file("a.c", &hunk_10_12(), &numbered_file(20), &[], 10);
        let removed = r.rows.iter().find(|row| row.kind() == RowKind::Removed).unwrap();
        assert_eq!(removed.old_num(), Some(11));
        assert_eq!(removed.new_num(), None);
        assert_eq!(removed.sign(), "-");
        assert_eq!(removed.content(), "old 11");
    }

    #[test]
    fn finding_outside_hunk_gets_one_synthetic_hunk() {
        let findings = vec![finding(50)];
        let r = render_file("src/a.c", &hunk_10_12(), &numbered_file(100), &findings, 10);

        let headers: Vec<SyntheticHunk> = r
            .rows
            .iter()
            .filter_map(|row| match row {
                Row::SyntheticHeader(s) => Some(*s),
                _ => None,
            })
            .collect();
        assert_eq!(headers, vec![SyntheticHunk { start: 40, end: 60, triggering_line: 50 }]);

        let idx = r.rows.iter().position(|row| row.new_num() == Some(50)).unwrap();
        assert_eq!(r.rows[idx].content(), "line 50");
        assert_eq!(r.rows[idx].kind(), RowKind::SyntheticContext);
        match &r.rows[idx + 1] {
            Row::Annotation(a) => {
                assert_eq!(a.line, 50);
                assert_eq!(a.anchor, "scanresult-src-a-c-50");
            }
            other => panic!("expected annotation, got {other:?}"),
        }

        let controls: Vec<_> = r.expand_controls().map(|c| (c.start, c.end)).collect();
        assert_eq!(controls, vec![(1, 9), (13, 39), (61, 100)]);
        assert_gap_free(&r);
    }

    #[test]
    fn covered_finding_is_inlined_after_its_row() {
        let findings = vec![finding(11)];
        let r = render_file("src/a.c", &hunk_10_12(), &numbered_file(100), &findings, 10);
        assert!(!r.rows.iter().any(|row| row.kind() == RowKind::SyntheticHeader));
        let idx = r
            .rows
            .iter()
            .position(|row| row.kind() == RowKind::Added && row.new_num() == Some(11))
            .unwrap();
        assert_eq!(r.rows[idx + 1].kind(), RowKind::Annotation);
        assert_eq!(r.annotations().count(), 1);
    }

    #[test]
    fn overlapping_synthetic_hunks_do_not_repeat_lines() {
        let findings = vec![finding(5), finding(8)];
        let r = render_file("src/a.c", &FileDiff::default(), &numbered_file(15), &findings, 10);

        let headers = r.rows.iter().filter(|row| row.kind() == RowKind::SyntheticHeader).count();
        assert_eq!(headers, 2);
        assert_eq!(new_numbers(&r), (1..=15).collect::<Vec<_>>());
        assert_eq!(r.annotations().count(), 2);
        assert_eq!(r.expand_controls().count(), 0);
        assert_gap_free(&r);
    }

    #[test]
    fn adjacent_synthetic_hunk_continues_where_the_last_stopped() {
        let findings = vec![finding(5), finding(20)];
        let r = render_file("src/a.c", &FileDiff::default(), &numbered_file(40), &findings, 10);
        assert_eq!(new_numbers(&r), (1..=30).collect::<Vec<_>>());
        let controls: Vec<_> = r.expand_controls().map(|c| (c.start, c.end)).collect();
        assert_eq!(controls, vec![(31, 40)]);
        assert_gap_free(&r);
    }

    #[test]
    fn unparseable_diff_is_all_gap() {
        let diff = parse_file_diff("garbage\n@@ broken\n");
        let r = render_file("a.c", &diff, &numbered_file(30), &[], 10);
        let controls: Vec<_> = r.expand_controls().copied().collect();
        assert_eq!(
            controls,
            vec![ExpandControl { direction: ExpandDirection::Below, start: 1, end: 30 }]
        );
    }

    #[test]
    fn findings_survive_an_unusable_diff() {
        let diff = parse_file_diff("not a diff\n");
        let r = render_file("src/a.c", &diff, &numbered_file(30), &[finding(25)], 10);
        assert_eq!(r.annotations().count(), 1);
        assert_gap_free(&r);
    }

    #[test]
    fn missing_content_renders_blank_lines() {
        let content = FileContent::Missing { reason: "gone".into() };
        let r = render_file("src/a.c", &FileDiff::default(), &content, &[finding(3)], 10);
        assert_eq!(r.content_missing.as_deref(), Some("gone"));
        let code: Vec<&Row> = r.rows.iter().filter(|row| row.new_num().is_some()).collect();
        assert_eq!(code.len(), 3);
        assert!(code.iter().all(|row| row.content().is_empty()));
        assert_eq!(r.annotations().count(), 1);
    }

    #[test]
    fn finding_past_end_renders_empty_line() {
        let r = render_file("src/a.c", &FileDiff::default(), &numbered_file(10), &[finding(14)], 10);
        let row = r.rows.iter().find(|row| row.new_num() == Some(14)).unwrap();
        assert_eq!(row.content(), "");
        assert_eq!(r.annotations().count(), 1);
    }

    #[test]
    fn row_numbers_never_go_backwards() {
        let diff = parse_file_diff(
            "@@ -20,2 +20,3 @@\n a\n+b\n c\n@@ -70,2 +71,2 @@\n x\n-y\n+z\n",
        );
        let findings = vec![finding(3), finding(30), finding(50), finding(95)];
        let r = render_file("src/a.c", &diff, &numbered_file(100), &findings, 10);
        let nums = new_numbers(&r);
        assert!(nums.windows(2).all(|w| w[0] < w[1]), "{nums:?}");
        assert_eq!(r.annotations().count(), 4);
        assert_gap_free(&r);
    }

    #[test]
    fn annotation_emitted_once_even_if_line_repeats() {
        // malformed hunk whose counters revisit new line 5
        let diff = parse_file_diff("@@ -5,1 +5,1 @@\n a\n@@ -5,1 +5,1 @@\n b\n");
        let r = render_file("src/a.c", &diff, &numbered_file(10), &[finding(5)], 10);
        assert_eq!(r.annotations().count(), 1);
    }

    #[test]
    fn finding_on_replaced_line_follows_the_added_row() {
        let r = render_file("src/a.c", &hunk_10_12(), &numbered_file(100), &[finding(11)], 10);
        let kinds: Vec<RowKind> = r.rows.iter().map(Row::kind).collect();
        let added = kinds.iter().position(|k| *k == RowKind::Added).unwrap();
        assert_eq!(kinds[added - 1], RowKind::Removed);
        assert_eq!(kinds[added + 1], RowKind::Annotation);
        assert_eq!(r.annotations().count(), 1);
    }

    #[test]
    fn removed_row_never_takes_the_annotation() {
        // old line 30 deleted; new line 30 is the context row that follows
        let diff = parse_file_diff("@@ -30,2 +30,1 @@\n-gone\n kept\n");
        let r = render_file("src/a.c", &diff, &numbered_file(40), &[finding(30)], 10);
        assert_eq!(r.annotations().count(), 1);
        let idx = r.rows.iter().position(|row| row.kind() == RowKind::Annotation).unwrap();
        assert_eq!(r.rows[idx - 1].kind(), RowKind::Context);
        assert_eq!(r.rows[idx - 1].new_num(), Some(30));
    }

    #[test]
    fn uncovered_finding_at_a_removed_old_number_stays_in_its_synthetic_hunk() {
        // old line 50 removed, new numbering stops at 49 inside the hunk
        let diff = parse_file_diff("@@ -48,3 +48,2 @@\n line 48\n line 49\n-gone\n");
        let r = render_file("src/a.c", &diff, &numbered_file(100), &[finding(50)], 10);
        assert_eq!(r.annotations().count(), 1);
        let idx = r.rows.iter().position(|row| row.kind() == RowKind::Annotation).unwrap();
        assert_eq!(r.rows[idx - 1].kind(), RowKind::SyntheticContext);
        assert_eq!(r.rows[idx - 1].new_num(), Some(50));
        assert_gap_free(&r);
    }

    #[test]
    fn absurd_finding_line_does_not_overflow() {
        let r = render_file("src/a.c", &hunk_10_12(), &numbered_file(20), &[finding(usize::MAX)], 10);
        assert_eq!(r.annotations().count(), 0);
        assert_eq!(r.last_line, 20);
        assert_gap_free(&r);
    }
}
