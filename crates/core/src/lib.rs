//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the Tetris-2048 board simulation: falling pieces whose
//! cells carry 2048-style numbers, collision against settled tiles, lock-in,
//! merging of equal neighbours, row clearing and scoring.
//!
//! It has **no dependencies** on rendering, input devices, or I/O:
//!
//! - **Deterministic**: the same seed and inputs produce identical games
//! - **Synchronous**: one `step` per input event or gravity tick, never blocks
//! - **Owned**: every session is an independent [`GameController`] value
//!
//! # Module Structure
//!
//! - [`grid`]: the settled tile matrix with bounds-checked access
//! - [`pieces`]: shapes, rotation tables and wall kicks
//! - [`collision`]: placement validity checks
//! - [`rng`]: seeded 7-bag piece factory with weighted tile values
//! - [`merge`]: merge engine, run to a fixpoint after every lock
//! - [`clear`]: full-row removal
//! - [`scoring`]: point rules and running totals
//! - [`config`]: session configuration and level timing policy
//! - [`controller`]: the state machine tying everything together
//! - [`snapshot`]: read-only views for presentation layers
//!
//! # Example
//!
//! ```
//! use tetris_2048_core::{GameConfig, GameController};
//! use tetris_2048_types::{GameStatus, Input};
//!
//! let mut game = GameController::new(10, 20, 12345, GameConfig::default()).unwrap();
//!
//! game.step(Input::Left);
//! game.step(Input::Rotate);
//! let view = game.step(Input::HardDrop);
//!
//! assert_eq!(view.status, GameStatus::Running);
//! assert!(view.active.is_some());
//! ```

pub mod clear;
pub mod collision;
pub mod config;
pub mod controller;
pub mod error;
pub mod grid;
pub mod merge;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tetris_2048_types as types;

// Re-export commonly used types for convenience
pub use config::{GameConfig, LevelPolicy, Randomizer, SpawnWeight};
pub use controller::{GameController, SavedGame};
pub use error::{Error, Result};
pub use grid::Grid;
pub use merge::{settle, MergeReport};
pub use pieces::{get_shape, try_rotate, Piece};
pub use rng::{FactoryState, PieceFactory, PieceSource, ScriptedPieces};
pub use snapshot::{ActiveSnapshot, PlacedTile, PreviewSnapshot, SnapshotView};
