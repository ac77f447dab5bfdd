use std::collections::VecDeque;

use crate::game::Player;

/// Result of a single self-play game.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeResult {
    pub winner: Option<Player>,
    pub game_length: usize,
}

/// Training metrics tracker with rolling window computations.
pub struct TrainingMetrics {
    episode_results: VecDeque<EpisodeResult>,
    capacity: usize,
    total_episodes: usize, // lifetime count, never capped
}

impl TrainingMetrics {
    pub fn with_capacity(capacity: usize) -> Self {
        TrainingMetrics {
            episode_results: VecDeque::with_capacity(capacity),
            capacity,
            total_episodes: 0,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn record_episode(&mut self, result: EpisodeResult) {
        self.total_episodes += 1;
        self.episode_results.push_back(result);
        if self.episode_results.len() > self.capacity {
            self.episode_results.pop_front();
        }
    }

    fn recent(&self, last_n: usize) -> impl Iterator<Item = &EpisodeResult> {
        let n = self.episode_results.len().min(last_n);
        self.episode_results.iter().rev().take(n)
    }

    fn window(&self, last_n: usize) -> usize {
        self.episode_results.len().min(last_n)
    }

    /// Win rate for `player` in the last N games.
    pub fn win_rate(&self, player: Player, last_n: usize) -> f32 {
        let n = self.window(last_n);
        if n == 0 {
            return 0.0;
        }
        let wins = self
            .recent(last_n)
            .filter(|r| r.winner == Some(player))
            .count();
        wins as f32 / n as f32
    }

    /// Draw rate in the last N games.
    pub fn draw_rate(&self, last_n: usize) -> f32 {
        let n = self.window(last_n);
        if n == 0 {
            return 0.0;
        }
        let draws = self.recent(last_n).filter(|r| r.winner.is_none()).count();
        draws as f32 / n as f32
    }

    /// Average game length over the last N games.
    pub fn average_game_length(&self, last_n: usize) -> f32 {
        let n = self.window(last_n);
        if n == 0 {
            return 0.0;
        }
        let total: usize = self.recent(last_n).map(|r| r.game_length).sum();
        total as f32 / n as f32
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }
}

impl Default for TrainingMetrics {
    fn default() -> Self {
        Self::new()
    }
}
