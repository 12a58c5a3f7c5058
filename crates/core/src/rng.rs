//! RNG module - piece generation
//!
//! Implements the "7-bag" randomization algorithm used in modern Tetris.
//! Each bag contains one of each shape, shuffled; pieces are drawn until the
//! bag is empty, then a new bag is shuffled. A uniform selector is available
//! as an alternative.
//!
//! Tile values for each cell are drawn from the configured weighted spawn
//! bias. All randomness comes from one seeded PCG stream, so a seed fully
//! determines the piece sequence.

use arrayvec::ArrayVec;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tetris_2048_types::{ShapeKind, Tile, PIECE_CELLS, SHAPE_COUNT};

use crate::config::{GameConfig, Randomizer, SpawnWeight};
use crate::error::{Error, Result};
use crate::pieces::Piece;

/// Anything that can hand the controller its next piece
pub trait PieceSource {
    fn next_piece(&mut self) -> Piece;
}

/// Seeded random piece factory
///
/// Serializes with its generator state, so a restored factory continues the
/// exact piece sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "FactoryState", into = "FactoryState")]
pub struct PieceFactory {
    /// Remaining shapes of the current bag, drawn from the back
    bag: ArrayVec<ShapeKind, SHAPE_COUNT>,
    randomizer: Randomizer,
    spawn_bias: Vec<SpawnWeight>,
    tile_values: Vec<Tile>,
    tile_weights: WeightedIndex<u32>,
    rng: Pcg32,
    seed: u64,
}

/// Stored form of a [`PieceFactory`]; the weight table is rebuilt on load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactoryState {
    seed: u64,
    randomizer: Randomizer,
    spawn_bias: Vec<SpawnWeight>,
    bag: Vec<ShapeKind>,
    rng: Pcg32,
}

impl PieceFactory {
    /// Create a factory from a seed and the spawn settings of `config`
    pub fn new(seed: u64, config: &GameConfig) -> Result<Self> {
        config.validate()?;
        Self::from_parts(
            seed,
            config.randomizer,
            config.spawn_bias.clone(),
            ArrayVec::new(),
            Pcg32::seed_from_u64(seed),
        )
    }

    fn from_parts(
        seed: u64,
        randomizer: Randomizer,
        spawn_bias: Vec<SpawnWeight>,
        bag: ArrayVec<ShapeKind, SHAPE_COUNT>,
        rng: Pcg32,
    ) -> Result<Self> {
        let tile_values = spawn_bias
            .iter()
            .map(|w| {
                Tile::new(w.value).ok_or_else(|| {
                    Error::InvalidConfig(format!("spawn_bias value {} is not a tile", w.value))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let tile_weights = WeightedIndex::new(spawn_bias.iter().map(|w| w.weight))
            .map_err(|e| Error::InvalidConfig(format!("spawn_bias: {e}")))?;

        Ok(Self {
            bag,
            randomizer,
            spawn_bias,
            tile_values,
            tile_weights,
            rng,
            seed,
        })
    }

    /// Generate a new shuffled bag
    fn refill_bag(&mut self) {
        self.bag.clear();
        self.bag.extend(ShapeKind::ALL);
        self.bag.shuffle(&mut self.rng);
    }

    /// Draw the next shape according to the randomizer
    pub fn draw_kind(&mut self) -> ShapeKind {
        match self.randomizer {
            Randomizer::Uniform => ShapeKind::ALL[self.rng.random_range(0..SHAPE_COUNT)],
            Randomizer::Bag => {
                if self.bag.is_empty() {
                    self.refill_bag();
                }
                self.bag.pop().unwrap_or(ShapeKind::I)
            }
        }
    }

    /// Draw one tile value from the spawn bias
    pub fn draw_tile(&mut self) -> Tile {
        let idx = self.tile_weights.sample(&mut self.rng);
        self.tile_values[idx]
    }

    /// Shapes left in the current bag (for testing/debugging)
    pub fn remaining_in_bag(&self) -> &[ShapeKind] {
        &self.bag
    }

    /// Seed this factory was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl PieceSource for PieceFactory {
    fn next_piece(&mut self) -> Piece {
        let kind = self.draw_kind();
        let tiles: [Tile; PIECE_CELLS] = std::array::from_fn(|_| self.draw_tile());
        Piece::new(kind, tiles)
    }
}

impl From<PieceFactory> for FactoryState {
    fn from(factory: PieceFactory) -> Self {
        Self {
            seed: factory.seed,
            randomizer: factory.randomizer,
            spawn_bias: factory.spawn_bias,
            bag: factory.bag.to_vec(),
            rng: factory.rng,
        }
    }
}

impl TryFrom<FactoryState> for PieceFactory {
    type Error = Error;

    fn try_from(state: FactoryState) -> Result<Self> {
        let bag = ArrayVec::try_from(state.bag.as_slice())
            .map_err(|_| Error::InvalidSave(format!("bag holds {} shapes", state.bag.len())))?;
        Self::from_parts(state.seed, state.randomizer, state.spawn_bias, bag, state.rng)
    }
}

/// Fixed piece sequence that repeats once exhausted.
///
/// Used for replays and deterministic scenarios.
#[derive(Debug, Clone)]
pub struct ScriptedPieces {
    pieces: Vec<Piece>,
    next: usize,
}

impl ScriptedPieces {
    /// `pieces` must not be empty
    pub fn new(pieces: Vec<Piece>) -> Result<Self> {
        if pieces.is_empty() {
            return Err(Error::InvalidConfig("scripted piece list is empty".into()));
        }
        Ok(Self { pieces, next: 0 })
    }
}

impl PieceSource for ScriptedPieces {
    fn next_piece(&mut self) -> Piece {
        let piece = self.pieces[self.next % self.pieces.len()];
        self.next = (self.next + 1) % self.pieces.len();
        piece
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_deterministic() {
        let config = GameConfig::default();
        let mut a = PieceFactory::new(12345, &config).unwrap();
        let mut b = PieceFactory::new(12345, &config).unwrap();

        for _ in 0..100 {
            assert_eq!(a.next_piece(), b.next_piece());
        }
    }

    #[test]
    fn test_bag_draws_all_seven() {
        let mut factory = PieceFactory::new(1, &GameConfig::default()).unwrap();

        for _ in 0..3 {
            let mut drawn: Vec<ShapeKind> = (0..7).map(|_| factory.draw_kind()).collect();
            assert!(factory.remaining_in_bag().is_empty());
            drawn.sort_by_key(|k| *k as usize);
            assert_eq!(drawn, ShapeKind::ALL.to_vec());
        }
    }

    #[test]
    fn test_tiles_follow_spawn_bias() {
        let config = GameConfig {
            spawn_bias: vec![SpawnWeight::new(8, 1), SpawnWeight::new(16, 0)],
            ..GameConfig::default()
        };
        let mut factory = PieceFactory::new(7, &config).unwrap();
        for _ in 0..50 {
            assert_eq!(factory.draw_tile().value(), 8);
        }
    }

    #[test]
    fn test_default_bias_favours_twos() {
        let mut factory = PieceFactory::new(99, &GameConfig::default()).unwrap();
        let twos = (0..1000)
            .filter(|_| factory.draw_tile() == Tile::TWO)
            .count();
        assert!(twos > 800, "expected mostly twos, got {twos}");
    }

    #[test]
    fn test_uniform_randomizer_stays_in_range() {
        let config = GameConfig {
            randomizer: Randomizer::Uniform,
            ..GameConfig::default()
        };
        let mut factory = PieceFactory::new(3, &config).unwrap();
        for _ in 0..50 {
            factory.draw_kind();
            assert!(factory.remaining_in_bag().is_empty());
        }
    }

    #[test]
    fn test_restored_factory_continues_sequence() {
        let mut factory = PieceFactory::new(2024, &GameConfig::default()).unwrap();
        for _ in 0..3 {
            factory.next_piece();
        }

        let json = serde_json::to_string(&factory).unwrap();
        let mut restored: PieceFactory = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.seed(), 2024);
        assert_eq!(restored.remaining_in_bag(), factory.remaining_in_bag());
        for _ in 0..30 {
            assert_eq!(restored.next_piece(), factory.next_piece());
        }
    }

    #[test]
    fn test_restore_rejects_overfull_bag() {
        let factory = PieceFactory::new(5, &GameConfig::default()).unwrap();
        let mut value = serde_json::to_value(&factory).unwrap();
        value["bag"] = serde_json::json!(["I", "O", "T", "S", "Z", "J", "L", "I"]);
        assert!(serde_json::from_value::<PieceFactory>(value).is_err());
    }

    #[test]
    fn test_scripted_pieces_cycle() {
        let o = Piece::new(ShapeKind::O, [Tile::TWO; 4]);
        let i = Piece::new(ShapeKind::I, [Tile::TWO; 4]);
        let mut script = ScriptedPieces::new(vec![o, i]).unwrap();
        assert_eq!(script.next_piece(), o);
        assert_eq!(script.next_piece(), i);
        assert_eq!(script.next_piece(), o);
        assert!(ScriptedPieces::new(Vec::new()).is_err());
    }
}
