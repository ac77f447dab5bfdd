use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use super::agent::Agent;
use crate::game::{Board, Move};

/// An agent that selects uniformly at random from legal moves.
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_move(&mut self, board: &Board) -> Option<Move> {
        board.legal_moves().choose(&mut self.rng).copied()
    }

    fn name(&self) -> &str {
        "Random"
    }
}
