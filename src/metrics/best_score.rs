//! Best score persisted across runs as a single integer in a plain-text file.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File-backed best score
#[derive(Debug, Clone)]
pub struct BestScoreStore {
    path: PathBuf,
    best: u32,
}

impl BestScoreStore {
    /// Default file name, relative to the working directory
    pub const DEFAULT_FILE: &'static str = "best_score.txt";

    /// Open the store at `path`, reading the stored score.
    ///
    /// A missing file counts as a best score of 0; a file that does not hold
    /// a single non-negative integer is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let best = read_score(&path)?;
        debug!(path = %path.display(), best, "loaded best score");
        Ok(Self { path, best })
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a finished game's score, writing the file only for a new best.
    ///
    /// Returns whether the score was a new best.
    pub fn record(&mut self, score: u32) -> Result<bool> {
        if score <= self.best {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        std::fs::write(&self.path, score.to_string())
            .with_context(|| format!("Failed to write best score to {:?}", self.path))?;

        info!(previous = self.best, best = score, "new best score");
        self.best = score;
        Ok(true)
    }
}

fn read_score(path: &Path) -> Result<u32> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read best score from {:?}", path))
        }
    };

    text.trim()
        .parse()
        .with_context(|| format!("Malformed best score in {:?}: {:?}", path, text.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_starts_at_zero() {
        let temp_dir = TempDir::new().unwrap();
        let store = BestScoreStore::load(temp_dir.path().join("best.txt")).unwrap();
        assert_eq!(store.best(), 0);
    }

    #[test]
    fn test_record_only_writes_improvements() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scores").join("best.txt");
        let mut store = BestScoreStore::load(&path).unwrap();

        assert!(store.record(30).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "30");

        assert!(!store.record(20).unwrap());
        assert!(!store.record(30).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "30");

        assert!(store.record(40).unwrap());
        assert_eq!(store.best(), 40);
    }

    #[test]
    fn test_reload_sees_saved_score() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("best.txt");
        BestScoreStore::load(&path).unwrap().record(120).unwrap();

        let reloaded = BestScoreStore::load(&path).unwrap();
        assert_eq!(reloaded.best(), 120);
    }

    #[test]
    fn test_tolerates_trailing_newline() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("best.txt");
        std::fs::write(&path, "70\n").unwrap();
        assert_eq!(BestScoreStore::load(&path).unwrap().best(), 70);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("best.txt");
        std::fs::write(&path, "lots").unwrap();
        assert!(BestScoreStore::load(&path).is_err());
    }
}
