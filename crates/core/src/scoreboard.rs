//! High-score table
//!
//! Entries are kept sorted by descending score and truncated to a fixed capacity.
//! The on-disk format is one entry per line, `<user> <score>`: the score is the
//! trailing run of digits and the user is everything before the last whitespace,
//! so user names may contain spaces. Lines that don't fit are skipped.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ScoreboardError {
    #[error("failed to read scores from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write scores to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HighScore {
    pub user: String,
    pub score: u64,
}

impl HighScore {
    /// Parse one `<user> <score>` line
    ///
    /// The score is the trailing run of digits, the user everything before the last
    /// whitespace. Both must be present.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim();
        let digits = line.len() - line.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return None;
        }
        let score = line[line.len() - digits..].parse().ok()?;
        let (user, _) = line.rsplit_once(char::is_whitespace)?;
        Some(Self {
            user: user.trim_end().to_string(),
            score,
        })
    }
}

impl fmt::Display for HighScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.user, self.score)
    }
}

/// Names are stored one per line, so line breaks and tabs become spaces
fn sanitize_user(user: &str) -> String {
    user.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreTable {
    capacity: usize,
    entries: Vec<HighScore>,
}

impl HighScoreTable {
    /// An empty table keeping at most `capacity` entries (at least 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            warn!("scoreboard capacity must be greater than 0, using 1");
            1
        } else {
            capacity
        };
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[HighScore] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn best(&self) -> Option<&HighScore> {
        self.entries.first()
    }

    /// Position `score` would take; ties rank below existing entries
    fn rank(&self, score: u64) -> usize {
        self.entries.partition_point(|e| e.score >= score)
    }

    /// Whether `score` would make it onto the table
    pub fn qualifies(&self, score: u64) -> bool {
        self.rank(score) < self.capacity
    }

    /// Insert an entry; returns its 0-based position, or `None` if it didn't make the cut
    pub fn add(&mut self, user: &str, score: u64) -> Option<usize> {
        let position = self.rank(score);
        if position >= self.capacity {
            return None;
        }
        self.entries.insert(
            position,
            HighScore {
                user: sanitize_user(user),
                score,
            },
        );
        self.entries.truncate(self.capacity);
        Some(position)
    }

    /// Build a table from the line format, skipping lines that don't parse
    pub fn parse(text: &str, capacity: usize) -> Self {
        let mut table = Self::new(capacity);
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            match HighScore::parse_line(line) {
                Some(entry) => {
                    table.add(&entry.user, entry.score);
                }
                None => debug!(line, "skipping malformed score line"),
            }
        }
        table
    }

    /// Load from `path`; a missing file is an empty table
    pub fn load(path: impl AsRef<Path>, capacity: usize) -> Result<Self, ScoreboardError> {
        Self::load_or(path, capacity, "")
    }

    /// Load from `path`, seeding the table from `defaults` (same line format) when the
    /// file doesn't exist yet
    pub fn load_or(
        path: impl AsRef<Path>,
        capacity: usize,
        defaults: &str,
    ) -> Result<Self, ScoreboardError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Self::parse(&text, capacity)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no score file, using defaults");
                Ok(Self::parse(defaults, capacity))
            }
            Err(source) => Err(ScoreboardError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Write to `path`, creating parent directories as needed
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ScoreboardError> {
        let path = path.as_ref();
        let write_err = |source| ScoreboardError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, self.to_string()).map_err(write_err)
    }
}

impl Default for HighScoreTable {
    fn default() -> Self {
        Self::new(crate::types::DEFAULT_SCOREBOARD_CAPACITY)
    }
}

impl fmt::Display for HighScoreTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(
            HighScore::parse_line("alice 1200"),
            Some(HighScore {
                user: "alice".into(),
                score: 1200
            })
        );
        assert_eq!(
            HighScore::parse_line("Jane  Doe\t77\r"),
            Some(HighScore {
                user: "Jane  Doe".into(),
                score: 77
            })
        );
        assert_eq!(HighScore::parse_line("nobody"), None);
        assert_eq!(HighScore::parse_line("bob 12x"), None);
        assert_eq!(HighScore::parse_line("1200"), None);
    }

    #[test]
    fn test_parse_line_takes_trailing_digits() {
        assert_eq!(
            HighScore::parse_line("bob -5"),
            Some(HighScore {
                user: "bob".into(),
                score: 5
            })
        );
        assert_eq!(
            HighScore::parse_line("alice x12"),
            Some(HighScore {
                user: "alice".into(),
                score: 12
            })
        );
        // Too large for a u64
        assert_eq!(HighScore::parse_line("big 99999999999999999999999"), None);
    }

    #[test]
    fn test_add_keeps_descending_order() {
        let mut table = HighScoreTable::new(5);
        assert_eq!(table.add("a", 100), Some(0));
        assert_eq!(table.add("b", 300), Some(0));
        assert_eq!(table.add("c", 200), Some(1));
        // Tie goes after the existing entry
        assert_eq!(table.add("d", 200), Some(2));

        let scores: Vec<u64> = table.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![300, 200, 200, 100]);
        assert_eq!(table.entries()[1].user, "c");
        assert_eq!(table.best().map(|e| e.score), Some(300));
    }

    #[test]
    fn test_add_truncates_to_capacity() {
        let mut table = HighScoreTable::new(2);
        table.add("a", 10);
        table.add("b", 20);
        assert!(!table.qualifies(5));
        assert_eq!(table.add("c", 5), None);
        assert_eq!(table.add("d", 15), Some(1));
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[1].user, "d");
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let table = HighScoreTable::new(0);
        assert_eq!(table.capacity(), 1);
    }

    #[test]
    fn test_user_names_sanitized() {
        let mut table = HighScoreTable::new(3);
        table.add("evil\nname", 5);
        assert_eq!(table.entries()[0].user, "evil name");
        assert_eq!(table.to_string(), "evil name 5\n");
    }

    #[test]
    fn test_parse_skips_garbage_and_sorts() {
        let text = "low 5\n\nnot a score\nhigh 500\nmid 50\n";
        let table = HighScoreTable::parse(text, 10);
        let users: Vec<&str> = table.entries().iter().map(|e| e.user.as_str()).collect();
        assert_eq!(users, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_missing_file_is_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let table = HighScoreTable::load(dir.path().join("scores.txt"), 20).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.capacity(), 20);
    }

    #[test]
    fn test_missing_file_seeds_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        let defaults = "dev 300\nbot 900\nnot a line\n";

        let table = HighScoreTable::load_or(&path, 5, defaults).unwrap();
        let users: Vec<&str> = table.entries().iter().map(|e| e.user.as_str()).collect();
        assert_eq!(users, vec!["bot", "dev"]);

        // An existing file wins over the defaults
        let mut saved = HighScoreTable::new(5);
        saved.add("ann", 10);
        saved.save(&path).unwrap();
        let table = HighScoreTable::load_or(&path, 5, defaults).unwrap();
        assert_eq!(table, saved);
    }

    #[test]
    fn test_save_creates_directories_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scores.txt");

        let mut table = HighScoreTable::new(4);
        table.add("ann", 900);
        table.add("bo b", 1200);
        table.save(&path).unwrap();

        let loaded = HighScoreTable::load(&path, 4).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_unreadable_path_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory can't be read as a file
        let err = HighScoreTable::load(dir.path(), 4).unwrap_err();
        assert!(matches!(err, ScoreboardError::Read { .. }));
    }
}
