//! JSONL (JSON Lines) storage.
//!
//! Used for the flattened match export: each line is one `Match`.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::StorageError;
use crate::models::Match;

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Ensure the parent directory exists.
    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    /// Write entities, replacing the entire file.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        let mut count = 0;

        for entity in entities {
            let json = serde_json::to_string(entity)?;
            writeln!(writer, "{}", json)?;
            count += 1;
        }

        writer.flush()?;
        info!("Wrote {} entities to {:?}", count, self.path);

        Ok(count)
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Read all entities, skipping lines that fail to parse.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Err(StorageError::PathNotFound(self.path.clone()));
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!("Failed to parse line {} in {:?}: {}", idx + 1, self.path, e);
                }
            }
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }
}

/// Write matches to a JSONL file, one per line.
pub fn write_matches(path: &Path, matches: &[Match]) -> Result<usize, StorageError> {
    JsonlWriter::new(path.to_path_buf()).write_all(matches)
}

/// Read matches from a JSONL export.
pub fn read_matches(path: &Path) -> Result<Vec<Match>, StorageError> {
    JsonlReader::new(path.to_path_buf()).read_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Goal, Team};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_matches() -> Vec<Match> {
        vec![
            Match::new(
                Team::new("Uruguay", "URU"),
                Team::new("Argentina", "ARG"),
                (4, 2),
                1930,
                "World Cup",
            )
            .with_num(18)
            .with_goals(vec![Goal::new("Dorado", 12), Goal::new("Peucelle", 20)]),
            Match::new(
                Team::new("Italy", "ITA"),
                Team::new("Czechoslovakia", "TCH"),
                (2, 1),
                1934,
                "World Cup",
            ),
        ]
    }

    #[test]
    fn test_write_and_read_matches() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("export").join("matches.jsonl");

        let count = write_matches(&path, &sample_matches()).unwrap();
        assert_eq!(count, 2);

        let read = read_matches(&path).unwrap();
        assert_eq!(read, sample_matches());
    }

    #[test]
    fn test_read_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.jsonl");

        match read_matches(&path) {
            Err(StorageError::PathNotFound(missing)) => assert_eq!(missing, path),
            other => panic!("expected PathNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_read_all_skips_bad_and_empty_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad_lines.jsonl");

        let good = serde_json::to_string(&sample_matches()[1]).unwrap();
        std::fs::write(&path, format!("{}\nnot-valid-json\n\n{}\n", good, good)).unwrap();

        let read = read_matches(&path).unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[0].team_a_code, "ITA");
    }

    #[test]
    fn test_write_all_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("overwrite.jsonl");

        write_matches(&path, &sample_matches()).unwrap();
        write_matches(&path, &sample_matches()[..1]).unwrap();

        assert_eq!(read_matches(&path).unwrap().len(), 1);
    }
}
