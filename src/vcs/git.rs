use std::path::{Path, PathBuf};

use super::{run_command, ChangeInfo, ChangedFile, FileStatus, Vcs};
use crate::error::{ReviewError, ReviewResult};

/// Hash of git's empty tree, the parent side for root commits
const EMPTY_TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

const SHOW_FORMAT: &str = "--format=%H%n%an%n%ae%n%ad%n%s%n%b";

pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    /// Resolve the repository root containing `dir`.
    pub fn open(dir: &Path) -> ReviewResult<Self> {
        let out = run_command("git", &["rev-parse", "--show-toplevel"], dir)?;
        Ok(GitRepo {
            root: PathBuf::from(out.trim()),
        })
    }

    fn git(&self, args: &[&str]) -> ReviewResult<String> {
        run_command("git", args, &self.root)
    }

    /// First parent of `id`, or the empty tree for a root commit.
    fn parent_of(&self, id: &str) -> String {
        let spec = format!("{id}^");
        match self.git(&["rev-parse", "--verify", "--quiet", &spec]) {
            Ok(out) if !out.trim().is_empty() => out.trim().to_string(),
            _ => EMPTY_TREE.to_string(),
        }
    }
}

impl Vcs for GitRepo {
    fn name(&self) -> &'static str {
        "git"
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn recent_changes(&self, count: usize) -> ReviewResult<Vec<String>> {
        let limit = format!("-{count}");
        let out = self.git(&["log", &limit, "--pretty=format:%H"])?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn change_info(&self, id: &str) -> ReviewResult<ChangeInfo> {
        let out = self.git(&[
            "show",
            "--no-patch",
            SHOW_FORMAT,
            "--date=format:%Y-%m-%d %H:%M:%S",
            id,
        ])?;
        parse_show_output(&out)
    }

    fn changed_files(&self, id: &str) -> ReviewResult<Vec<ChangedFile>> {
        let out = self.git(&["diff-tree", "--no-commit-id", "--name-status", "-r", "-M", "--root", id])?;
        Ok(parse_name_status(&out))
    }

    fn file_diff(&self, id: &str, file: &ChangedFile) -> ReviewResult<String> {
        let parent = self.parent_of(id);
        let mut args = vec!["diff", "-M", parent.as_str(), id, "--", file.path.as_str()];
        if let FileStatus::Renamed(old) | FileStatus::Copied(old) = &file.status {
            args.push(old.as_str());
        }
        self.git(&args)
    }

    fn page_name(&self, info: &ChangeInfo) -> String {
        format!("review-{}.html", info.short_id)
    }
}

/// Parse `git show --no-patch` output in `SHOW_FORMAT`.
fn parse_show_output(out: &str) -> ReviewResult<ChangeInfo> {
    let mut lines = out.lines();
    let mut next = |field: &str| {
        lines.next().map(str::to_string).ok_or_else(|| ReviewError::UnexpectedOutput {
            program: "git".into(),
            detail: format!("show output has no {field} line"),
        })
    };

    let id = next("hash")?;
    let author = next("author")?;
    let email = next("email")?;
    let date = next("date")?;
    let subject = next("subject")?;
    let body = lines.collect::<Vec<_>>().join("\n").trim().to_string();

    Ok(ChangeInfo {
        short_id: id.chars().take(8).collect(),
        id,
        author,
        email,
        date,
        subject,
        body,
    })
}

/// Parse `git diff-tree --name-status -M` lines like `M\tsrc/a.rs` or
/// `R087\told.rs\tnew.rs`.
fn parse_name_status(out: &str) -> Vec<ChangedFile> {
    let mut files = Vec::new();
    for line in out.lines() {
        let mut parts = line.split('\t');
        let (Some(code), Some(first)) = (parts.next(), parts.next()) else {
            continue;
        };
        let second = parts.next();

        let (path, status) = match (code.chars().next(), second) {
            (Some('A'), _) => (first, FileStatus::Added),
            (Some('M'), _) => (first, FileStatus::Modified),
            (Some('D'), _) => (first, FileStatus::Deleted),
            (Some('R'), Some(new)) => (new, FileStatus::Renamed(first.to_string())),
            (Some('C'), Some(new)) => (new, FileStatus::Copied(first.to_string())),
            _ => (first, FileStatus::Unknown),
        };
        files.push(ChangedFile {
            path: path.to_string(),
            source_path: path.to_string(),
            status,
        });
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn show_output_splits_fields() {
        let out = "0123456789abcdef\nAda\nada@example.com\n2024-05-01 10:00:00\nFix parser\nLonger\n\nexplanation\n";
        let info = parse_show_output(out).unwrap();
        assert_eq!(info.short_id, "01234567");
        assert_eq!(info.author, "Ada");
        assert_eq!(info.email, "ada@example.com");
        assert_eq!(info.subject, "Fix parser");
        assert_eq!(info.body, "Longer\n\nexplanation");
    }

    #[test]
    fn truncated_show_output_is_an_error() {
        let err = parse_show_output("abc\nAda\n").unwrap_err();
        assert!(matches!(err, ReviewError::UnexpectedOutput { .. }));
    }

    #[test]
    fn name_status_lines() {
        let out = "M\tsrc/a.rs\nA\tnew.rs\nD\tgone.rs\nR087\told/x.rs\tnew/x.rs\nbogus\n";
        let files = parse_name_status(out);
        assert_eq!(files.len(), 4);
        assert_eq!(files[0].status, FileStatus::Modified);
        assert_eq!(files[2].status, FileStatus::Deleted);
        assert_eq!(files[3].path, "new/x.rs");
        assert_eq!(files[3].status, FileStatus::Renamed("old/x.rs".into()));
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .env("GIT_AUTHOR_NAME", "Test")
            .env("GIT_AUTHOR_EMAIL", "test@example.com")
            .env("GIT_COMMITTER_NAME", "Test")
            .env("GIT_COMMITTER_EMAIL", "test@example.com")
            .status()
            .unwrap();
        assert!(status.success(), "git {args:?}");
    }

    #[test]
    fn reads_commits_from_a_real_repository() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        git(root, &["init", "-q"]);
        std::fs::write(root.join("a.txt"), "one\ntwo\n").unwrap();
        git(root, &["add", "."]);
        git(root, &["commit", "-q", "-m", "first"]);
        std::fs::write(root.join("a.txt"), "one\nTWO\n").unwrap();
        git(root, &["commit", "-q", "-am", "second"]);

        let repo = GitRepo::open(root).unwrap();
        let ids = repo.recent_changes(5).unwrap();
        assert_eq!(ids.len(), 2);

        let info = repo.change_info(&ids[0]).unwrap();
        assert_eq!(info.subject, "second");
        assert_eq!(repo.page_name(&info), format!("review-{}.html", &ids[0][..8]));

        let files = repo.changed_files(&ids[0]).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "a.txt");
        let diff = repo.file_diff(&ids[0], &files[0]).unwrap();
        assert!(diff.contains("+TWO"));

        // root commit diffs against the empty tree
        let root_files = repo.changed_files(&ids[1]).unwrap();
        assert_eq!(root_files[0].status, FileStatus::Added);
        let root_diff = repo.file_diff(&ids[1], &root_files[0]).unwrap();
        assert!(root_diff.contains("+one"));
    }
}
