mod coverage;
mod parse;

pub use coverage::covered_lines;
pub use parse::{parse_file_diff, DiffHunk, DiffLine, FileDiff, LineKind};

use sha2::{Digest, Sha256};

/// SHA-256 of a file's raw diff text, a stable key for its table
pub fn diff_hash(raw_diff: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_diff.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_hex() {
        let a = diff_hash("@@ -1 +1 @@\n-a\n+b\n");
        assert_eq!(a.len(), 64);
        assert_eq!(a, diff_hash("@@ -1 +1 @@\n-a\n+b\n"));
        assert_ne!(a, diff_hash(""));
    }
}
