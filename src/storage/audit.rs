//! Plain-text record of the last game of a training run.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::game::{Board, GameOutcome};

pub struct AuditRecord<'a> {
    pub board: &'a Board,
    pub outcome: GameOutcome,
    pub games_played: usize,
    pub total_score: i64,
}

impl AuditRecord<'_> {
    /// Winner line, score line, then the board with `.` for empty cells.
    pub fn render(&self) -> String {
        format!(
            "Winner: {}\nTotal Score: {}\n{}",
            self.outcome.label(),
            self.total_score,
            self.board
        )
    }
}

/// Write `record` into `dir` under a name that no earlier record uses.
pub fn write_audit_record(dir: &Path, record: &AuditRecord<'_>) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let stem = format!(
        "board_iteration_{}_total_score_{}_time_{}",
        record.games_played, record.total_score, millis
    );

    let contents = record.render();
    for attempt in 0u32.. {
        let name = if attempt == 0 {
            format!("{stem}.txt")
        } else {
            format!("{stem}_{attempt}.txt")
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(contents.as_bytes())?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
    unreachable!("audit file name attempts exhausted")
}
