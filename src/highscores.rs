//! High score persistence
//!
//! A single integer in a plain text file. A missing or blank file counts as 0.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HighScoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("High score file {path} does not contain an integer: {contents:?}")]
    Malformed { path: PathBuf, contents: String },
}

/// Location of the high score file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScoreFile {
    path: PathBuf,
}

impl HighScoreFile {
    /// Default file name, relative to the working directory
    pub const DEFAULT_PATH: &'static str = "high_score.txt";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored high score
    pub fn load(&self) -> Result<u32, HighScoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high score at {}, starting fresh", self.path.display());
                return Ok(0);
            }
            Err(source) => {
                return Err(HighScoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let trimmed = contents.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }
        trimmed.parse().map_err(|_| HighScoreError::Malformed {
            path: self.path.clone(),
            contents: trimmed.to_string(),
        })
    }

    /// Store `score` if it beats the current high score. Returns true on a new record.
    pub fn record(&self, score: u32) -> Result<bool, HighScoreError> {
        let best = self.load()?;
        if score <= best {
            return Ok(false);
        }
        std::fs::write(&self.path, score.to_string()).map_err(|source| HighScoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        log::info!("New high score {} (was {})", score, best);
        Ok(true)
    }
}

impl Default for HighScoreFile {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> HighScoreFile {
        let path = std::env::temp_dir().join(format!(
            "flappy_sim_{}_{}.txt",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        HighScoreFile::new(path)
    }

    #[test]
    fn test_missing_file_is_zero() {
        let file = temp_file("missing");
        assert_eq!(file.load().unwrap(), 0);
    }

    #[test]
    fn test_blank_file_is_zero() {
        let file = temp_file("blank");
        std::fs::write(file.path(), "  \n").unwrap();
        assert_eq!(file.load().unwrap(), 0);
        std::fs::remove_file(file.path()).unwrap();
    }

    #[test]
    fn test_record_only_improvements() {
        let file = temp_file("record");
        assert!(file.record(5).unwrap());
        assert_eq!(file.load().unwrap(), 5);
        assert!(!file.record(3).unwrap());
        assert!(!file.record(5).unwrap());
        assert_eq!(file.load().unwrap(), 5);
        assert!(file.record(8).unwrap());
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "8");
        std::fs::remove_file(file.path()).unwrap();
    }

    #[test]
    fn test_zero_never_recorded() {
        let file = temp_file("zero");
        assert!(!file.record(0).unwrap());
        assert!(!file.path().exists());
    }

    #[test]
    fn test_malformed_file() {
        let file = temp_file("malformed");
        std::fs::write(file.path(), "twelve").unwrap();
        assert!(matches!(file.load(), Err(HighScoreError::Malformed { .. })));
        std::fs::remove_file(file.path()).unwrap();
    }

    #[test]
    fn test_tolerates_trailing_newline() {
        let file = temp_file("newline");
        std::fs::write(file.path(), "17\n").unwrap();
        assert_eq!(file.load().unwrap(), 17);
        std::fs::remove_file(file.path()).unwrap();
    }
}
