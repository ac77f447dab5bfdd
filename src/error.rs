use std::path::PathBuf;

use crate::game::{MoveError, Player};

/// Errors that can occur while loading or saving Q-tables.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("no table found at {0}")]
    Missing(PathBuf),

    #[error("table at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize table: {0}")]
    Serialize(serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors in an externally supplied board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardInputError {
    #[error("board missing")]
    Missing,

    #[error("board has {found} rows, expected {expected}")]
    WrongRowCount { expected: usize, found: usize },

    #[error("board row {row} has {found} cells, expected {expected}")]
    WrongRowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("board is not a valid grid: {0}")]
    Parse(String),
}

/// Errors that can occur during training.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("{player} agent played an illegal move: {source}")]
    InvalidMove { player: Player, source: MoveError },

    #[error("{0} agent had no legal move on a non-terminal board")]
    NoLegalMoves(Player),

    #[error("table error: {0}")]
    Table(#[from] TableError),

    #[error("failed to write audit record: {0}")]
    Audit(std::io::Error),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors surfaced to callers of the service facade.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("model/table not found for {color}")]
    TableNotFound { color: Player },

    #[error(transparent)]
    BoardInput(#[from] BoardInputError),

    #[error("training not complete ({percent_complete:.0}%)")]
    TrainingNotComplete { percent_complete: f64 },

    #[error("no legal moves left on the board")]
    NoLegalMoves,

    #[error("training failed: {0}")]
    Training(#[from] TrainingError),

    #[error("table error: {0}")]
    Table(#[from] TableError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Move;

    #[test]
    fn test_table_error_display() {
        let err = TableError::Missing(PathBuf::from("models/black_ai_model.json"));
        assert_eq!(err.to_string(), "no table found at models/black_ai_model.json");
    }

    #[test]
    fn test_training_error_display() {
        let err = TrainingError::InvalidMove {
            player: Player::White,
            source: MoveError::Occupied(Move::new(3, 4)),
        };
        assert_eq!(
            err.to_string(),
            "white agent played an illegal move: cell (3, 4) is already occupied"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("agent.learning_rate must be in (0, 1]".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: agent.learning_rate must be in (0, 1]"
        );
    }

    #[test]
    fn test_service_error_display() {
        let err = ServiceError::TableNotFound {
            color: Player::Black,
        };
        assert_eq!(err.to_string(), "model/table not found for black");

        let err = ServiceError::from(BoardInputError::Missing);
        assert_eq!(err.to_string(), "board missing");

        let err = ServiceError::TrainingNotComplete {
            percent_complete: 50.0,
        };
        assert_eq!(err.to_string(), "training not complete (50%)");
    }
}
