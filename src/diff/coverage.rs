use std::collections::BTreeSet;

use super::parse::{DiffHunk, LineKind};

/// New-file line numbers that real hunks render.
///
/// Walks each hunk exactly the way the renderer replays it: the counter starts
/// at `new_start`, added and context lines claim the current number and
/// advance it, removed and untagged lines do neither.
pub fn covered_lines(hunks: &[DiffHunk]) -> BTreeSet<usize> {
    let mut covered = BTreeSet::new();
    for hunk in hunks {
        let mut new_line = hunk.new_start;
        for line in &hunk.lines {
            match line.kind {
                LineKind::Added | LineKind::Context => {
                    covered.insert(new_line);
                    new_line += 1;
                }
                LineKind::Removed | LineKind::Other => {}
            }
        }
    }
    covered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::parse_file_diff;

    #[test]
    fn context_and_added_lines_are_covered() {
        let diff = parse_file_diff("@@ -10,3 +10,3 @@\n a\n-b\n+B\n c\n");
        let covered = covered_lines(&diff.hunks);
        assert_eq!(covered.into_iter().collect::<Vec<_>>(), vec![10, 11, 12]);
    }

    #[test]
    fn removed_lines_do_not_advance() {
        let diff = parse_file_diff("@@ -1,4 +1,1 @@\n-a\n-b\n-c\n d\n");
        let covered = covered_lines(&diff.hunks);
        assert_eq!(covered.into_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn pure_deletion_covers_nothing() {
        let diff = parse_file_diff("@@ -5,2 +4,0 @@\n-a\n-b\n");
        assert!(covered_lines(&diff.hunks).is_empty());
    }

    #[test]
    fn multiple_hunks_accumulate() {
        let diff = parse_file_diff("@@ -1,1 +1,2 @@\n a\n+b\n@@ -30,1 +31,1 @@\n z\n");
        let covered = covered_lines(&diff.hunks);
        assert_eq!(covered.into_iter().collect::<Vec<_>>(), vec![1, 2, 31]);
    }

    #[test]
    fn no_hunks_no_coverage() {
        assert!(covered_lines(&[]).is_empty());
    }
}
