//! Match dataset storage.
//!
//! Handles the on-disk dataset layout and the read-only match store:
//! - Per-year tournament files (`datasets/<year>/worldcup.json`)
//! - Optional per-year group files (`datasets/<year>/worldcup.groups.json`)
//! - openfootball text sources (`datasets/<year>/cup.txt`, `cup_finals.txt`)
//!   and their conversion to the JSON layout
//! - Flattened JSONL match exports

pub mod convert;
pub mod jsonl;
pub mod store;
pub mod teams;
pub mod text;
pub mod worldcup;

pub use convert::{convert_year, convertible_years, save_conversion, Conversion};
pub use jsonl::{read_matches, write_matches, JsonlReader, JsonlWriter};
pub use store::{InMemoryMatchStore, MatchStore};
pub use worldcup::{available_years, load_matches, load_year, read_tournament};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Configuration for dataset paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn datasets_dir(&self) -> PathBuf {
        self.data_dir.join("datasets")
    }

    pub fn year_dir(&self, year: u16) -> PathBuf {
        self.datasets_dir().join(year.to_string())
    }

    pub fn worldcup_path(&self, year: u16) -> PathBuf {
        self.year_dir(year).join(worldcup::WORLDCUP_FILE)
    }

    pub fn groups_path(&self, year: u16) -> PathBuf {
        self.year_dir(year).join(worldcup::GROUPS_FILE)
    }

    /// Group-stage text source.
    pub fn cup_text_path(&self, year: u16) -> PathBuf {
        self.year_dir(year).join(text::CUP_FILE)
    }

    /// Knockout-stage text source.
    pub fn cup_finals_path(&self, year: u16) -> PathBuf {
        self.year_dir(year).join(text::CUP_FINALS_FILE)
    }

    /// Default location of the flattened JSONL export.
    pub fn matches_path(&self) -> PathBuf {
        self.data_dir.join("matches.jsonl")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(config.datasets_dir(), PathBuf::from("/data/datasets"));
        assert_eq!(
            config.worldcup_path(2014),
            PathBuf::from("/data/datasets/2014/worldcup.json")
        );
        assert_eq!(
            config.groups_path(1998),
            PathBuf::from("/data/datasets/1998/worldcup.groups.json")
        );
        assert_eq!(
            config.cup_finals_path(1930),
            PathBuf::from("/data/datasets/1930/cup_finals.txt")
        );
        assert_eq!(config.matches_path(), PathBuf::from("/data/matches.jsonl"));
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }
}
