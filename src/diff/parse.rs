use serde::Serialize;

/// How a line inside a hunk affects the old/new line counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// `+`: consumes a new-file line number only
    Added,
    /// `-`: consumes an old-file line number only
    Removed,
    /// ` `: consumes both
    Context,
    /// Anything else (`\ No newline at end of file`, stray text); consumes nothing
    Other,
}

impl LineKind {
    pub fn sign(&self) -> &'static str {
        match self {
            LineKind::Added => "+",
            LineKind::Removed => "-",
            LineKind::Context | LineKind::Other => " ",
        }
    }
}

/// A single line in a diff hunk. `text` has the leading marker stripped,
/// except for `Other` lines which are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: LineKind,
    pub text: String,
}

/// A diff hunk with its header and raw lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffHunk {
    pub header: String,
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    pub lines: Vec<DiffLine>,
}

impl DiffHunk {
    /// Last new-file line number the header claims. For an empty new side
    /// (`+4,0`) this is the line *before* the insertion point.
    pub fn new_end(&self) -> usize {
        (self.new_start + self.new_count).saturating_sub(1)
    }
}

/// One file's diff: the header lines preceding the first hunk, then the hunks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDiff {
    pub preamble: Vec<String>,
    pub hunks: Vec<DiffHunk>,
}

impl FileDiff {
    pub fn is_empty(&self) -> bool {
        self.preamble.is_empty() && self.hunks.is_empty()
    }
}

/// Parse the unified diff of a single file.
///
/// Never fails: an `@@` line that doesn't match
/// `@@ -<old>[,<count>] +<new>[,<count>] @@` is skipped, and the lines after it
/// are dropped until the next valid header since they can't be numbered.
/// A diff with no valid header at all yields zero hunks.
pub fn parse_file_diff(raw: &str) -> FileDiff {
    let mut diff = FileDiff::default();
    let mut current: Option<DiffHunk> = None;
    let mut orphaned = false;

    for line in raw.lines() {
        if line.starts_with("@@") {
            if let Some(hunk) = current.take() {
                diff.hunks.push(hunk);
            }
            match parse_hunk_header(line) {
                Some(hunk) => {
                    current = Some(hunk);
                    orphaned = false;
                }
                None => {
                    log::debug!("skipping malformed hunk header: {line}");
                    orphaned = true;
                }
            }
            continue;
        }

        if let Some(ref mut hunk) = current {
            hunk.lines.push(classify_line(line));
        } else if orphaned {
            continue;
        } else {
            diff.preamble.push(line.to_string());
        }
    }

    if let Some(hunk) = current {
        diff.hunks.push(hunk);
    }

    diff
}

fn classify_line(line: &str) -> DiffLine {
    let (kind, text) = if let Some(rest) = line.strip_prefix('+') {
        (LineKind::Added, rest)
    } else if let Some(rest) = line.strip_prefix('-') {
        (LineKind::Removed, rest)
    } else if let Some(rest) = line.strip_prefix(' ') {
        (LineKind::Context, rest)
    } else {
        (LineKind::Other, line)
    };
    DiffLine {
        kind,
        text: text.to_string(),
    }
}

/// Parse a hunk header like "@@ -10,4 +10,15 @@ fn foo()"
fn parse_hunk_header(line: &str) -> Option<DiffHunk> {
    let after_first = line.strip_prefix("@@ ")?;
    let end_idx = after_first.find(" @@")?;
    let range_str = &after_first[..end_idx];

    let mut parts = range_str.split_whitespace();
    let old_part = parts.next()?.strip_prefix('-')?;
    let new_part = parts.next()?.strip_prefix('+')?;
    if parts.next().is_some() {
        return None;
    }

    let (old_start, old_count) = parse_range(old_part)?;
    let (new_start, new_count) = parse_range(new_part)?;

    Some(DiffHunk {
        header: line.to_string(),
        old_start,
        old_count,
        new_start,
        new_count,
        lines: Vec::new(),
    })
}

/// Parse "start,count" or just "start" (count defaults to 1)
fn parse_range(s: &str) -> Option<(usize, usize)> {
    if let Some((start, count)) = s.split_once(',') {
        Some((start.parse().ok()?, count.parse().ok()?))
    } else {
        Some((s.parse().ok()?, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = "Index: src/main.c
===================================================================
--- src/main.c\t(revision 41)
+++ src/main.c\t(revision 42)
@@ -10,3 +10,4 @@ int main()
 int a = 1;
-int b = 2;
+int b = 3;
+int c = 4;
 return 0;
";

    #[test]
    fn empty_diff_has_no_hunks() {
        let diff = parse_file_diff("");
        assert!(diff.is_empty());
        assert!(diff.hunks.is_empty());
    }

    #[test]
    fn preamble_and_single_hunk() {
        let diff = parse_file_diff(SIMPLE);
        assert_eq!(diff.preamble.len(), 4);
        assert!(diff.preamble[0].starts_with("Index:"));
        assert_eq!(diff.hunks.len(), 1);

        let hunk = &diff.hunks[0];
        assert_eq!(hunk.header, "@@ -10,3 +10,4 @@ int main()");
        assert_eq!((hunk.old_start, hunk.old_count), (10, 3));
        assert_eq!((hunk.new_start, hunk.new_count), (10, 4));
        assert_eq!(hunk.new_end(), 13);

        let kinds: Vec<LineKind> = hunk.lines.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LineKind::Context,
                LineKind::Removed,
                LineKind::Added,
                LineKind::Added,
                LineKind::Context
            ]
        );
        assert_eq!(hunk.lines[1].text, "int b = 2;");
    }

    #[test]
    fn omitted_counts_default_to_one() {
        let diff = parse_file_diff("@@ -5 +7 @@\n-old\n+new\n");
        let hunk = &diff.hunks[0];
        assert_eq!((hunk.old_start, hunk.old_count), (5, 1));
        assert_eq!((hunk.new_start, hunk.new_count), (7, 1));
        assert_eq!(hunk.new_end(), 7);
    }

    #[test]
    fn zero_count_new_side() {
        let diff = parse_file_diff("@@ -5,2 +4,0 @@\n-gone\n-also gone\n");
        let hunk = &diff.hunks[0];
        assert_eq!(hunk.new_count, 0);
        assert_eq!(hunk.new_end(), 3);
    }

    #[test]
    fn multiple_hunks_split_on_headers() {
        let raw = "@@ -1,2 +1,2 @@\n-a\n+b\n c\n@@ -20,1 +20,2 @@\n x\n+y\n";
        let diff = parse_file_diff(raw);
        assert_eq!(diff.hunks.len(), 2);
        assert_eq!(diff.hunks[0].lines.len(), 3);
        assert_eq!(diff.hunks[1].new_start, 20);
        assert_eq!(diff.hunks[1].lines.len(), 2);
    }

    #[test]
    fn untagged_lines_pass_through() {
        let raw = "@@ -1 +1 @@\n-a\n+b\n\\ No newline at end of file\n";
        let diff = parse_file_diff(raw);
        let last = diff.hunks[0].lines.last().unwrap();
        assert_eq!(last.kind, LineKind::Other);
        assert_eq!(last.text, "\\ No newline at end of file");
    }

    #[test]
    fn malformed_header_is_skipped_with_its_lines() {
        let raw = "@@ -1,2 +1,2 @@\n a\n+b\n@@ garbage @@\n+lost\n@@ -9 +9 @@\n+kept\n";
        let diff = parse_file_diff(raw);
        assert_eq!(diff.hunks.len(), 2);
        assert_eq!(diff.hunks[0].lines.len(), 2);
        assert_eq!(diff.hunks[1].lines[0].text, "kept");
    }

    #[test]
    fn completely_unparseable_diff_yields_no_hunks() {
        let diff = parse_file_diff("this is not\na diff at all\n@@ nope\n");
        assert!(diff.hunks.is_empty());
        assert_eq!(diff.preamble.len(), 2);
    }

    #[test]
    fn header_without_section_text() {
        let hunk = parse_hunk_header("@@ -10,4 +10,15 @@").unwrap();
        assert_eq!(hunk.old_start, 10);
        assert_eq!(hunk.old_count, 4);
        assert_eq!(hunk.new_start, 10);
        assert_eq!(hunk.new_count, 15);
        assert!(parse_hunk_header("@@ -a,b +c,d @@").is_none());
        assert!(parse_hunk_header("@@ +1,2 -1,2 @@").is_none());
    }
}
