/// Normalize a path reported by the analyzer into a repo-relative, `/`-separated path.
///
/// Windows separators become `/`. Absolute paths carrying a drive letter are
/// cut at the first component named in `markers` (e.g. `D:\work\proj\src\a.c`
/// with marker `src` becomes `src/a.c`). A leading `./` or `/` is dropped.
pub fn normalize_scan_path(raw: &str, markers: &[String]) -> String {
    let mut path = raw.trim().replace('\\', "/");

    if has_drive_letter(&path) {
        let parts: Vec<&str> = path.split('/').collect();
        if let Some(pos) = parts.iter().position(|p| markers.iter().any(|m| m == p)) {
            path = parts[pos..].join("/");
        }
    }

    let trimmed = path.trim_start_matches("./").trim_start_matches('/');
    trimmed.to_string()
}

fn has_drive_letter(path: &str) -> bool {
    let mut chars = path.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(c), Some(':')) if c.is_ascii_alphabetic()
    )
}

/// Resolve a normalized finding path to one of the changed files.
///
/// Tries, in order: exact match, a component-boundary suffix match in either
/// direction, then a basename match when exactly one changed file has that
/// basename.
pub fn match_changed_file<'a>(finding_path: &str, changed: &'a [String]) -> Option<&'a str> {
    if let Some(exact) = changed.iter().find(|c| c.as_str() == finding_path) {
        return Some(exact);
    }

    if let Some(suffix) = changed
        .iter()
        .find(|c| ends_with_components(c, finding_path) || ends_with_components(finding_path, c))
    {
        return Some(suffix);
    }

    let base = basename(finding_path);
    let mut by_base = changed.iter().filter(|c| basename(c) == base);
    match (by_base.next(), by_base.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

fn ends_with_components(path: &str, suffix: &str) -> bool {
    if suffix.is_empty() || !path.ends_with(suffix) {
        return false;
    }
    let cut = path.len() - suffix.len();
    cut == 0 || path[..cut].ends_with('/')
}

/// Final path component
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> Vec<String> {
        ["Server", "src", "source", "code"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn windows_absolute_path_is_cut_at_marker() {
        assert_eq!(
            normalize_scan_path(r"D:\work\game\Server\logic\bag.cpp", &markers()),
            "Server/logic/bag.cpp"
        );
    }

    #[test]
    fn absolute_path_without_marker_keeps_everything() {
        assert_eq!(
            normalize_scan_path(r"C:\tmp\a.c", &markers()),
            "C:/tmp/a.c"
        );
    }

    #[test]
    fn relative_paths_lose_leading_dot_slash() {
        assert_eq!(normalize_scan_path("./lib/x.rs", &markers()), "lib/x.rs");
        assert_eq!(normalize_scan_path("/lib/x.rs", &markers()), "lib/x.rs");
        assert_eq!(normalize_scan_path("lib\\x.rs", &markers()), "lib/x.rs");
    }

    #[test]
    fn marker_only_applies_to_drive_paths() {
        assert_eq!(
            normalize_scan_path("vendor/src/a.c", &markers()),
            "vendor/src/a.c"
        );
    }

    #[test]
    fn exact_match_wins() {
        let changed = vec!["src/a.c".to_string(), "lib/src/a.c".to_string()];
        assert_eq!(match_changed_file("src/a.c", &changed), Some("src/a.c"));
    }

    #[test]
    fn suffix_match_respects_component_boundaries() {
        let changed = vec!["trunk/Server/bag.cpp".to_string()];
        assert_eq!(
            match_changed_file("Server/bag.cpp", &changed),
            Some("trunk/Server/bag.cpp")
        );
        let changed = vec!["myServer/bag.cpp".to_string(), "other/bag.cpp".to_string()];
        assert_eq!(match_changed_file("Server/bag.cpp", &changed), None);
    }

    #[test]
    fn unique_basename_fallback() {
        let changed = vec!["a/b/unique.h".to_string(), "a/c/other.h".to_string()];
        assert_eq!(
            match_changed_file("elsewhere/unique.h", &changed),
            Some("a/b/unique.h")
        );
    }

    #[test]
    fn ambiguous_basename_is_unmatched() {
        let changed = vec!["a/util.h".to_string(), "b/util.h".to_string()];
        assert_eq!(match_changed_file("c/util.h", &changed), None);
    }
}
