use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CheckError, Result};

/// Repository for the candidate list file
#[derive(Debug, Clone)]
pub struct CandidateRepository {
    path: PathBuf,
}

impl CandidateRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every candidate, one per line
    ///
    /// A missing file is reported as [`CheckError::InputNotFound`], any other
    /// read failure as [`CheckError::InputUnreadable`].
    pub async fn load(&self) -> Result<Vec<String>> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => CheckError::InputNotFound {
                    path: self.path.display().to_string(),
                },
                _ => CheckError::InputUnreadable {
                    path: self.path.display().to_string(),
                    source: e,
                },
            })?;

        let candidates = parse_candidates(&contents);
        debug!(
            "Loaded {} candidates from {}",
            candidates.len(),
            self.path.display()
        );

        Ok(candidates)
    }
}

/// Split file contents into trimmed, non-empty candidate lines
pub fn parse_candidates(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
