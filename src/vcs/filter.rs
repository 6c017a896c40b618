use super::{ChangedFile, FileStatus};
use glob::{MatchOptions, Pattern};

// ── Types ──

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusKind {
    Added,
    Modified,
    Deleted,
    Renamed,
}

#[derive(Debug, Clone)]
pub enum FilterRule {
    Glob { include: bool, pattern: Pattern },
    Status { include: bool, status: StatusKind },
}

impl FilterRule {
    fn is_include(&self) -> bool {
        match self {
            FilterRule::Glob { include, .. } => *include,
            FilterRule::Status { include, .. } => *include,
        }
    }
}

// ── Parser ──

/// Parse a comma-separated filter expression such as `+*.c,-*.lock,-deleted`.
/// Invalid globs are skipped with a warning.
pub fn parse_filter_expr(expr: &str) -> Vec<FilterRule> {
    let mut rules = Vec::new();
    for segment in expr.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let (include, body) = if let Some(rest) = segment.strip_prefix('-') {
            (false, rest.trim())
        } else if let Some(rest) = segment.strip_prefix('+') {
            (true, rest.trim())
        } else {
            (true, segment)
        };

        if body.is_empty() {
            continue;
        }

        if let Some(status) = parse_status(body) {
            rules.push(FilterRule::Status { include, status });
            continue;
        }

        match Pattern::new(body) {
            Ok(pattern) => rules.push(FilterRule::Glob { include, pattern }),
            Err(e) => log::warn!("ignoring filter {body:?}: {e}"),
        }
    }
    rules
}

fn parse_status(body: &str) -> Option<StatusKind> {
    match body.to_lowercase().as_str() {
        "added" => Some(StatusKind::Added),
        "modified" => Some(StatusKind::Modified),
        "deleted" => Some(StatusKind::Deleted),
        "renamed" => Some(StatusKind::Renamed),
        _ => None,
    }
}

// ── Evaluator ──

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Whether a changed file makes it onto the page. With any include rule the
/// file must match one of them; any matching exclude rule drops it.
pub fn apply_filter(rules: &[FilterRule], file: &ChangedFile) -> bool {
    if rules.is_empty() {
        return true;
    }

    let has_includes = rules.iter().any(|r| r.is_include());
    let included = !has_includes || rules.iter().any(|r| r.is_include() && matches_rule(r, file));
    if !included {
        return false;
    }

    !rules.iter().any(|r| !r.is_include() && matches_rule(r, file))
}

fn matches_rule(rule: &FilterRule, file: &ChangedFile) -> bool {
    match rule {
        FilterRule::Glob { pattern, .. } => pattern.matches_with(&file.path, MATCH_OPTIONS),
        FilterRule::Status { status, .. } => matches!(
            (status, &file.status),
            (StatusKind::Added, FileStatus::Added)
                | (StatusKind::Modified, FileStatus::Modified)
                | (StatusKind::Deleted, FileStatus::Deleted)
                | (StatusKind::Renamed, FileStatus::Renamed(_))
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, status: FileStatus) -> ChangedFile {
        ChangedFile {
            path: path.to_string(),
            source_path: format!("/trunk/{path}"),
            status,
        }
    }

    #[test]
    fn blank_segments_are_ignored() {
        assert!(parse_filter_expr("").is_empty());
        assert!(parse_filter_expr("  , +, - ").is_empty());
    }

    #[test]
    fn prefixes_and_keywords() {
        let rules = parse_filter_expr("*.c, -*.lock, +DELETED");
        assert_eq!(rules.len(), 3);
        assert!(matches!(&rules[0], FilterRule::Glob { include: true, .. }));
        assert!(matches!(&rules[1], FilterRule::Glob { include: false, .. }));
        assert!(matches!(
            &rules[2],
            FilterRule::Status { include: true, status: StatusKind::Deleted }
        ));
    }

    #[test]
    fn invalid_glob_is_skipped() {
        let rules = parse_filter_expr("[oops, *.h");
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn no_rules_keeps_everything() {
        assert!(apply_filter(&[], &file("a.c", FileStatus::Modified)));
    }

    #[test]
    fn includes_are_or_and_excludes_win() {
        let rules = parse_filter_expr("+*.c, +*.h, -vendor/*");
        assert!(apply_filter(&rules, &file("src/deep/a.c", FileStatus::Modified)));
        assert!(apply_filter(&rules, &file("inc/a.h", FileStatus::Added)));
        assert!(!apply_filter(&rules, &file("build.py", FileStatus::Modified)));
        assert!(!apply_filter(&rules, &file("vendor/z.c", FileStatus::Modified)));
    }

    #[test]
    fn status_rules() {
        let rules = parse_filter_expr("-deleted");
        assert!(!apply_filter(&rules, &file("gone.c", FileStatus::Deleted)));
        assert!(apply_filter(&rules, &file("kept.c", FileStatus::Modified)));

        let renamed = parse_filter_expr("+renamed");
        assert!(apply_filter(&renamed, &file("new.c", FileStatus::Renamed("old.c".into()))));
        assert!(!apply_filter(&renamed, &file("new.c", FileStatus::Copied("old.c".into()))));
    }
}
