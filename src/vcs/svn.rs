use std::path::{Path, PathBuf};

use super::{run_command, ChangeInfo, ChangedFile, FileStatus, Vcs};
use crate::error::{ReviewError, ReviewResult};

const SEPARATOR: &str = "------------------------------------------------------------------------";

pub struct SvnRepo {
    root: PathBuf,
    /// Leading repository path components dropped from displayed paths
    strip_prefixes: Vec<String>,
}

impl SvnRepo {
    pub fn open(dir: &Path, strip_prefixes: Vec<String>) -> ReviewResult<Self> {
        let out = run_command("svn", &["info", "--show-item", "wc-root"], dir)?;
        let root = match out.trim() {
            "" => dir.to_path_buf(),
            wc_root => PathBuf::from(wc_root),
        };
        Ok(SvnRepo { root, strip_prefixes })
    }

    fn svn(&self, args: &[&str]) -> ReviewResult<String> {
        run_command("svn", args, &self.root)
    }

    fn log_entry(&self, id: &str) -> ReviewResult<LogEntry> {
        let rev = format!("-r{id}");
        let out = self.svn(&["log", "-v", &rev])?;
        parse_log(&out)
            .into_iter()
            .next()
            .ok_or_else(|| ReviewError::UnexpectedOutput {
                program: "svn".into(),
                detail: format!("no log entry for revision {id}"),
            })
    }
}

impl Vcs for SvnRepo {
    fn name(&self) -> &'static str {
        "svn"
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn recent_changes(&self, count: usize) -> ReviewResult<Vec<String>> {
        let limit = format!("-l{count}");
        let out = self.svn(&["log", &limit])?;
        Ok(parse_log(&out).into_iter().map(|e| e.revision).collect())
    }

    fn change_info(&self, id: &str) -> ReviewResult<ChangeInfo> {
        let entry = self.log_entry(id)?;
        let subject = entry
            .message
            .lines()
            .next()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Revision {}", entry.revision));
        Ok(ChangeInfo {
            id: entry.revision.clone(),
            short_id: entry.revision.clone(),
            // svn doesn't record emails
            email: String::new(),
            author: entry.author,
            date: entry.date,
            subject,
            body: entry.message,
        })
    }

    fn changed_files(&self, id: &str) -> ReviewResult<Vec<ChangedFile>> {
        let entry = self.log_entry(id)?;
        Ok(entry
            .paths
            .into_iter()
            .map(|(action, repo_path, copied_from)| ChangedFile {
                path: strip_repo_prefix(&repo_path, &self.strip_prefixes),
                status: match action {
                    'A' => match copied_from {
                        Some(from) => FileStatus::Copied(from),
                        None => FileStatus::Added,
                    },
                    'M' => FileStatus::Modified,
                    'D' => FileStatus::Deleted,
                    'R' => FileStatus::Renamed(copied_from.unwrap_or_default()),
                    _ => FileStatus::Unknown,
                },
                source_path: repo_path,
            })
            .collect())
    }

    fn file_diff(&self, id: &str, file: &ChangedFile) -> ReviewResult<String> {
        let rev: u64 = id.trim().parse().map_err(|_| ReviewError::UnexpectedOutput {
            program: "svn".into(),
            detail: format!("revision {id:?} is not a number"),
        })?;
        let repo_root = self.svn(&["info", "--show-item", "repos-root-url"])?;
        let url = format!("{}{}", repo_root.trim().trim_end_matches('/'), file.source_path);
        let range = format!("-r{}:{}", rev.saturating_sub(1), rev);
        self.svn(&["diff", &range, &url])
    }

    fn page_name(&self, info: &ChangeInfo) -> String {
        format!("review-r{}.html", info.id)
    }
}

// ── Log parsing ──

/// One `svn log [-v]` entry. `paths` holds (action, repository path, copy source).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct LogEntry {
    revision: String,
    author: String,
    date: String,
    message: String,
    paths: Vec<(char, String, Option<String>)>,
}

/// Parse plain-text `svn log` output:
///
/// ```text
/// ------------------------------------------------------------------------
/// r42 | alice | 2024-01-01 12:00:00 +0800 (Mon, 01 Jan 2024) | 2 lines
/// Changed paths:
///    M /trunk/src/main.c
///    A /trunk/src/new.c (from /trunk/src/old.c:41)
///
/// Subject
/// Body
/// ```
fn parse_log(out: &str) -> Vec<LogEntry> {
    let mut entries = Vec::new();
    for block in out.split(SEPARATOR) {
        let mut lines = block.lines().skip_while(|l| l.trim().is_empty());
        let Some(header) = lines.next() else {
            continue;
        };
        let fields: Vec<&str> = header.split(" | ").collect();
        let Some(revision) = fields.first().and_then(|r| r.trim().strip_prefix('r')) else {
            continue;
        };
        if revision.is_empty() || !revision.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }

        let mut entry = LogEntry {
            revision: revision.to_string(),
            author: fields.get(1).map(|s| s.trim().to_string()).unwrap_or_default(),
            date: fields
                .get(2)
                .map(|s| s.trim().chars().take(19).collect())
                .unwrap_or_default(),
            ..Default::default()
        };

        let rest: Vec<&str> = lines.collect();
        let mut idx = 0;
        if rest.first().is_some_and(|l| l.starts_with("Changed paths:")) {
            idx = 1;
            while let Some(line) = rest.get(idx) {
                match parse_changed_path(line) {
                    Some(path) => entry.paths.push(path),
                    None => break,
                }
                idx += 1;
            }
        }

        entry.message = rest[idx.min(rest.len())..].join("\n").trim().to_string();
        entries.push(entry);
    }
    entries
}

fn parse_changed_path(line: &str) -> Option<(char, String, Option<String>)> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.len() == line.len() {
        return None;
    }
    let mut chars = trimmed.chars();
    let action = chars.next()?;
    let rest = chars.as_str().trim();
    if !rest.starts_with('/') {
        return None;
    }

    match rest.split_once(" (from ") {
        Some((path, from)) => {
            let from = from.trim_end_matches(')');
            let from = from.rsplit_once(':').map(|(p, _)| p).unwrap_or(from);
            Some((action, path.to_string(), Some(from.to_string())))
        }
        None => Some((action, rest.to_string(), None)),
    }
}

/// `/trunk/src/a.c` → `src/a.c` for the default prefixes.
fn strip_repo_prefix(repo_path: &str, prefixes: &[String]) -> String {
    let path = repo_path.trim_start_matches('/');
    prefixes
        .iter()
        .find_map(|p| path.strip_prefix(p.as_str()))
        .unwrap_or(path)
        .to_string()
}
