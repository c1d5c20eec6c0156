//! Deterministic scenario RNG.
//!
//! Wraps `ChaCha8Rng` so every peer drawing the same sequence of values from
//! the same seed reaches the same state. The generator lives inside
//! [`GameState`](crate::state::GameState) and is serialised as a snapshot of
//! its seed, stream and word position.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

const DEFAULT_SEED: u64 = 0x5041_524b;

/// Serialisable capture of the full `ChaCha8Rng` state.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RngSnapshot {
    seed: [u8; 32],
    word_pos: u128,
    stream: u64,
}

impl From<ScenarioRng> for RngSnapshot {
    fn from(rng: ScenarioRng) -> Self {
        Self {
            seed: rng.0.get_seed(),
            word_pos: rng.0.get_word_pos(),
            stream: rng.0.get_stream(),
        }
    }
}

impl From<RngSnapshot> for ScenarioRng {
    fn from(snapshot: RngSnapshot) -> Self {
        let mut rng = ChaCha8Rng::from_seed(snapshot.seed);
        rng.set_stream(snapshot.stream);
        rng.set_word_pos(snapshot.word_pos);
        Self(rng)
    }
}

/// Process-wide random source for simulation draws.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RngSnapshot", into = "RngSnapshot")]
pub struct ScenarioRng(ChaCha8Rng);

impl ScenarioRng {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Next raw 32-bit value.
    pub fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    /// Uniform value in `0..max`; `max == 0` yields 0 without drawing.
    pub fn next_below(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.0.gen_range(0..max)
    }

    /// Uniform index into a slice of `len` items, drawing only when non-empty.
    pub fn next_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        // Drawn as u32 so 32- and 64-bit peers agree
        let len = u32::try_from(len).unwrap_or(u32::MAX);
        Some(self.0.gen_range(0..len) as usize)
    }
}

impl Default for ScenarioRng {
    fn default() -> Self {
        Self::from_seed_u64(DEFAULT_SEED)
    }
}

impl PartialEq for ScenarioRng {
    fn eq(&self, other: &Self) -> bool {
        self.0.get_seed() == other.0.get_seed()
            && self.0.get_stream() == other.0.get_stream()
            && self.0.get_word_pos() == other.0.get_word_pos()
    }
}

impl Eq for ScenarioRng {}

impl Hash for ScenarioRng {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.get_seed().hash(state);
        self.0.get_stream().hash(state);
        self.0.get_word_pos().hash(state);
    }
}
