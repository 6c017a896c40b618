use std::path::Path;

use crate::error::{ReviewError, ReviewResult};

/// Post-change content of a file, the source for every line that isn't
/// literally in the diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Available(Vec<String>),
    /// Content couldn't be read; every line renders empty.
    Missing { reason: String },
}

impl FileContent {
    pub fn from_text(text: &str) -> Self {
        FileContent::Available(text.lines().map(str::to_string).collect())
    }

    /// Read `root/rel`, keeping the failure as a `MissingFileContent` error.
    pub fn read(root: &Path, rel: &str) -> ReviewResult<Self> {
        let path = root.join(rel);
        let bytes = std::fs::read(&path).map_err(|source| ReviewError::MissingFileContent {
            path: path.clone(),
            source,
        })?;
        Ok(Self::from_text(&String::from_utf8_lossy(&bytes)))
    }

    /// 1-based line lookup; out of range or missing content gives `""`.
    pub fn line(&self, n: usize) -> &str {
        match self {
            FileContent::Available(lines) if n >= 1 => {
                lines.get(n - 1).map(String::as_str).unwrap_or("")
            }
            _ => "",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FileContent::Available(lines) => lines.len(),
            FileContent::Missing { .. } => 0,
        }
    }

    pub fn lines(&self) -> &[String] {
        match self {
            FileContent::Available(lines) => lines,
            FileContent::Missing { .. } => &[],
        }
    }

    pub fn missing_reason(&self) -> Option<&str> {
        match self {
            FileContent::Missing { reason } => Some(reason),
            FileContent::Available(_) => None,
        }
    }
}

impl From<ReviewResult<FileContent>> for FileContent {
    fn from(result: ReviewResult<FileContent>) -> Self {
        result.unwrap_or_else(|e| FileContent::Missing {
            reason: e.to_string(),
        })
    }
}
