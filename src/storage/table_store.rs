use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::ai::QTable;
use crate::error::TableError;
use crate::game::Player;
use crate::storage::metadata::TableMetadata;

/// Where tables and audit records live.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub table_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            table_dir: PathBuf::from("models"),
            output_dir: PathBuf::from("training_output"),
        }
    }
}

/// Loads and saves one Q-table file per color.
#[derive(Debug, Clone)]
pub struct TableStore {
    config: StorageConfig,
}

impl TableStore {
    pub fn new(config: StorageConfig) -> Self {
        TableStore { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn table_path(&self, color: Player) -> PathBuf {
        self.config
            .table_dir
            .join(format!("{}_ai_model.json", color.name()))
    }

    pub fn metadata_path(&self, color: Player) -> PathBuf {
        self.config
            .table_dir
            .join(format!("{}_ai_model.meta.json", color.name()))
    }

    /// Load the table for `color`. A missing file is `TableError::Missing`; a
    /// file that does not parse is `TableError::Corrupt`.
    pub fn load(&self, color: Player) -> Result<QTable, TableError> {
        let path = self.table_path(color);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(TableError::Missing(path)),
            Err(e) => return Err(TableError::Io(e)),
        };
        QTable::from_json(&json).map_err(|source| TableError::Corrupt { path, source })
    }

    /// Like `load`, but a missing table is `Ok(None)`. Corrupt tables still fail.
    pub fn load_optional(&self, color: Player) -> Result<Option<QTable>, TableError> {
        match self.load(color) {
            Ok(table) => Ok(Some(table)),
            Err(TableError::Missing(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Save the table and its metadata sidecar. Each file is written to a
    /// temporary sibling first and renamed into place.
    pub fn save(
        &self,
        color: Player,
        table: &QTable,
        metadata: &TableMetadata,
    ) -> Result<PathBuf, TableError> {
        fs::create_dir_all(&self.config.table_dir)?;

        let json = table.to_json().map_err(TableError::Serialize)?;
        let path = self.table_path(color);
        write_atomic(&path, json.as_bytes())?;

        let meta_json = serde_json::to_string_pretty(metadata).map_err(TableError::Serialize)?;
        write_atomic(&self.metadata_path(color), meta_json.as_bytes())?;

        Ok(path)
    }

    /// Read the metadata sidecar for `color`.
    pub fn load_metadata(&self, color: Player) -> Result<TableMetadata, TableError> {
        let path = self.metadata_path(color);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(TableError::Missing(path)),
            Err(e) => return Err(TableError::Io(e)),
        };
        serde_json::from_str(&json).map_err(|source| TableError::Corrupt { path, source })
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{key_of, AgentConfig};
    use crate::game::{Board, Move};

    fn store_in(dir: &Path) -> TableStore {
        TableStore::new(StorageConfig {
            table_dir: dir.join("models"),
            output_dir: dir.join("training_output"),
        })
    }

    fn test_metadata(color: Player, table: &QTable) -> TableMetadata {
        TableMetadata {
            color,
            timestamp: 1_700_000_000,
            games_played: 1,
            total_score: 1,
            board_size: 5,
            states: table.len(),
            entries: table.entry_count(),
            hyperparameters: AgentConfig::default(),
        }
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let mut table = QTable::new();
        table.set_value(key_of(&Board::new(5)), Move::new(2, 2), 0.1);
        table.set_value(key_of(&Board::new(5)), Move::new(0, 4), -0.2);

        let path = store
            .save(Player::Black, &table, &test_metadata(Player::Black, &table))
            .unwrap();
        assert_eq!(path, dir.path().join("models/black_ai_model.json"));
        assert!(path.exists());
        assert!(store.metadata_path(Player::Black).exists());
        assert!(!dir.path().join("models/black_ai_model.json.tmp").exists());

        let loaded = store.load(Player::Black).unwrap();
        assert_eq!(loaded, table);

        let meta = store.load_metadata(Player::Black).unwrap();
        assert_eq!(meta.entries, 2);
    }

    #[test]
    fn test_empty_table_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let table = QTable::new();
        store
            .save(Player::White, &table, &test_metadata(Player::White, &table))
            .unwrap();
        assert!(store.load(Player::White).unwrap().is_empty());
    }

    #[test]
    fn test_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let err = store.load(Player::White).unwrap_err();
        assert!(
            matches!(err, TableError::Missing(_)),
            "expected Missing, got: {err}"
        );
        assert!(store.load_optional(Player::White).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_table_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        fs::create_dir_all(dir.path().join("models")).unwrap();
        fs::write(store.table_path(Player::Black), "{\"states\": [").unwrap();

        let err = store.load_optional(Player::Black).unwrap_err();
        assert!(
            matches!(err, TableError::Corrupt { .. }),
            "expected Corrupt, got: {err}"
        );
    }

    #[test]
    fn test_tables_are_per_color() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let mut black = QTable::new();
        black.set_value(key_of(&Board::new(5)), Move::new(0, 0), 1.0);
        let white = QTable::new();

        store
            .save(Player::Black, &black, &test_metadata(Player::Black, &black))
            .unwrap();
        store
            .save(Player::White, &white, &test_metadata(Player::White, &white))
            .unwrap();

        assert_eq!(store.load(Player::Black).unwrap().entry_count(), 1);
        assert!(store.load(Player::White).unwrap().is_empty());
    }
}
