use serde::{Deserialize, Serialize};

use crate::ai::AgentConfig;
use crate::game::Player;

/// Sidecar written next to each saved table, describing the run that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMetadata {
    pub color: Player,
    pub timestamp: u64,
    pub games_played: usize,
    pub total_score: i64,
    pub board_size: usize,
    pub states: usize,
    pub entries: usize,
    pub hyperparameters: AgentConfig,
}
