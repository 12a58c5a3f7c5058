//! Game controller - the state machine that owns a session
//!
//! This module ties together all core components: grid, pieces, collision,
//! piece source, merge engine and row clearer. Phases run
//! `Spawning → Falling → Locking → Merging → Clearing → Spawning` until a
//! spawn collides, which is terminal (`GameOver`).
//!
//! `step` applies one input (or one gravity tick) to the falling piece and
//! then runs the transient phases (lock, merge, clear, spawn) until the
//! machine rests in `Falling` or `GameOver`. Nothing blocks and nothing is
//! timed here; the presentation layer decides when to call `step`.

use serde::{Deserialize, Serialize};
use tetris_2048_types::{Cell, GamePhase, GameStatus, Input, LockEvent};

use crate::clear::clear_rows;
use crate::collision::{drop_distance, fits, is_valid};
use crate::config::GameConfig;
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::merge::{has_equal_neighbours, settle};
use crate::pieces::{try_rotate, Piece};
use crate::rng::{PieceFactory, PieceSource};
use crate::scoring::Scoreboard;
use crate::snapshot::SnapshotView;

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameController<S: PieceSource = PieceFactory> {
    grid: Grid,
    config: GameConfig,
    source: S,
    phase: GamePhase,
    active: Option<Piece>,
    next: Piece,
    hold: Option<Piece>,
    can_hold: bool,
    scoreboard: Scoreboard,
    level: u32,
    /// Pieces taken from the queue into play. A first hold draws one;
    /// swapping with an already held piece does not.
    pieces_spawned: u32,
    /// Event being built while the lock resolves
    pending: LockEvent,
    last_event: Option<LockEvent>,
}

/// Everything needed to continue a session later.
///
/// Produced by [`GameController::save`] and accepted by
/// [`GameController::resume`]. Sessions are only saved while waiting for
/// input, so the phase is always `Falling` or `GameOver`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedGame<S = PieceFactory> {
    pub width: u16,
    pub height: u16,
    /// Settled cells, row-major, top row first
    pub cells: Vec<Cell>,
    pub config: GameConfig,
    pub source: S,
    pub phase: GamePhase,
    pub active: Option<Piece>,
    pub next: Piece,
    pub hold: Option<Piece>,
    pub can_hold: bool,
    pub score: u64,
    pub lines: u32,
    pub pieces_spawned: u32,
    pub last_event: Option<LockEvent>,
}

impl GameController<PieceFactory> {
    /// Start a session on an empty `width x height` grid with a seeded
    /// random piece factory. The first piece is spawned immediately.
    pub fn new(width: u16, height: u16, seed: u64, config: GameConfig) -> Result<Self> {
        let grid = Grid::new(width, height)?;
        let source = PieceFactory::new(seed, &config)?;
        Self::with_source(grid, source, config)
    }
}

impl<S: PieceSource> GameController<S> {
    /// Start a session on an existing grid with any piece source
    pub fn with_source(grid: Grid, mut source: S, config: GameConfig) -> Result<Self> {
        config.validate()?;
        let next = source.next_piece();
        let mut controller = Self {
            grid,
            config,
            source,
            phase: GamePhase::Spawning,
            active: None,
            next,
            hold: None,
            can_hold: true,
            scoreboard: Scoreboard::default(),
            level: 1,
            pieces_spawned: 0,
            pending: LockEvent::default(),
            last_event: None,
        };
        controller.run_transient_phases();
        Ok(controller)
    }

    /// Continue a saved session. The level is recomputed from the cleared
    /// lines; inconsistent saves are rejected with `InvalidSave`.
    pub fn resume(saved: SavedGame<S>) -> Result<Self> {
        saved.config.validate()?;
        let grid = Grid::from_cells(saved.width, saved.height, saved.cells)?;

        match (saved.phase, saved.active) {
            (GamePhase::Falling, Some(active)) if fits(&grid, &active) => {}
            (GamePhase::GameOver, None) => {}
            (phase, active) => {
                return Err(Error::InvalidSave(format!(
                    "{phase:?} with active piece {:?} cannot be resumed",
                    active.map(|piece| (piece.kind, piece.x, piece.y))
                )))
            }
        }

        let mut scoreboard = Scoreboard::default();
        scoreboard.award(saved.score);
        scoreboard.add_lines(saved.lines);
        let level = saved.config.level_for_lines(saved.lines);
        log::debug!(
            "resuming {:?} session at score {} level {}",
            saved.phase,
            saved.score,
            level
        );

        Ok(Self {
            grid,
            config: saved.config,
            source: saved.source,
            phase: saved.phase,
            active: saved.active,
            next: saved.next,
            hold: saved.hold,
            can_hold: saved.can_hold,
            scoreboard,
            level,
            pieces_spawned: saved.pieces_spawned,
            pending: LockEvent::default(),
            last_event: saved.last_event,
        })
    }

    /// Capture the session for [`GameController::resume`]
    pub fn save(&self) -> SavedGame<S>
    where
        S: Clone,
    {
        SavedGame {
            width: self.grid.width(),
            height: self.grid.height(),
            cells: self.grid.cells().to_vec(),
            config: self.config.clone(),
            source: self.source.clone(),
            phase: self.phase,
            active: self.active,
            next: self.next,
            hold: self.hold,
            can_hold: self.can_hold,
            score: self.score(),
            lines: self.lines(),
            pieces_spawned: self.pieces_spawned,
            last_event: self.last_event,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn status(&self) -> GameStatus {
        self.phase.into()
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn next_piece(&self) -> Piece {
        self.next
    }

    pub fn held_piece(&self) -> Option<Piece> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn score(&self) -> u64 {
        self.scoreboard.score()
    }

    pub fn lines(&self) -> u32 {
        self.scoreboard.lines()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn last_event(&self) -> Option<LockEvent> {
        self.last_event
    }

    /// Gravity interval the presentation layer should tick at
    pub fn tick_interval_ms(&self) -> u32 {
        self.config.tick_interval_for_level(self.level)
    }

    /// Row the active piece's anchor would land on
    pub fn ghost_y(&self) -> Option<i32> {
        let active = self.active?;
        Some(active.y + drop_distance(&self.grid, &active))
    }

    /// Apply one input (or a gravity tick for `Input::None`) and return the
    /// resulting view.
    ///
    /// Rejected moves leave the state unchanged. After game over every call
    /// returns the same frozen snapshot.
    pub fn step(&mut self, input: Input) -> SnapshotView {
        if self.is_game_over() {
            log::trace!("ignoring {:?} after game over", input);
            return self.snapshot();
        }

        if self.phase == GamePhase::Falling {
            self.apply_input(input);
        }
        self.run_transient_phases();
        self.snapshot()
    }

    pub fn snapshot(&self) -> SnapshotView {
        SnapshotView {
            width: self.grid.width(),
            height: self.grid.height(),
            cells: self.grid.cells().to_vec(),
            active: self.active.map(Into::into),
            ghost_y: self.ghost_y(),
            next: (!self.is_game_over()).then(|| self.next.into()),
            hold: self.hold.map(Into::into),
            can_hold: self.can_hold,
            phase: self.phase,
            status: self.status(),
            score: self.score(),
            lines: self.lines(),
            level: self.level,
            tick_interval_ms: self.tick_interval_ms(),
            pieces_spawned: self.pieces_spawned,
            last_event: self.last_event,
        }
    }

    fn apply_input(&mut self, input: Input) {
        match input {
            Input::None | Input::SoftDrop => self.fall(),
            Input::Left => self.try_shift(-1),
            Input::Right => self.try_shift(1),
            Input::Rotate => self.rotate(true),
            Input::RotateCcw => self.rotate(false),
            Input::HardDrop => self.hard_drop(),
            Input::Hold => self.hold(),
        }
    }

    /// Drive the machine until it waits for input or is over
    fn run_transient_phases(&mut self) {
        // Spawning → Falling is at most four transitions away from any phase.
        for _ in 0..8 {
            match self.phase {
                GamePhase::Falling | GamePhase::GameOver => return,
                GamePhase::Spawning => self.spawn(),
                GamePhase::Locking => self.lock(),
                GamePhase::Merging => self.merge(),
                GamePhase::Clearing => self.clear(),
            }
        }
    }

    /// Spawning → Falling, or GameOver if the spawn placement collides
    fn spawn(&mut self) {
        let incoming = std::mem::replace(&mut self.next, self.source.next_piece());
        let piece = incoming.at_spawn(self.grid.width());

        if !fits(&self.grid, &piece) {
            log::debug!(
                "spawn of {:?} blocked, game over with score {}",
                piece.kind,
                self.score()
            );
            self.active = None;
            self.phase = GamePhase::GameOver;
            return;
        }

        self.active = Some(piece);
        self.can_hold = true;
        self.pieces_spawned = self.pieces_spawned.wrapping_add(1);
        self.phase = GamePhase::Falling;
    }

    fn fall(&mut self) {
        let Some(active) = self.active else {
            return;
        };
        if is_valid(&self.grid, &active, (0, 1)) {
            self.active = Some(active.shifted(0, 1));
        } else {
            self.phase = GamePhase::Locking;
        }
    }

    fn try_shift(&mut self, dx: i32) {
        let Some(active) = self.active else {
            return;
        };
        if is_valid(&self.grid, &active, (dx, 0)) {
            self.active = Some(active.shifted(dx, 0));
        } else {
            log::trace!("shift by {} rejected", dx);
        }
    }

    fn rotate(&mut self, clockwise: bool) {
        let Some(active) = self.active else {
            return;
        };
        match try_rotate(&active, clockwise, |candidate| fits(&self.grid, candidate)) {
            Some(rotated) => self.active = Some(rotated),
            None => log::trace!("rotation of {:?} rejected", active.kind),
        }
    }

    fn hard_drop(&mut self) {
        let Some(active) = self.active else {
            return;
        };
        let distance = drop_distance(&self.grid, &active);
        self.active = Some(active.shifted(0, distance));
        self.phase = GamePhase::Locking;
    }

    /// Swap the falling piece into the hold slot, once per spawned piece
    fn hold(&mut self) {
        let Some(active) = self.active else {
            return;
        };
        if !self.can_hold {
            log::trace!("hold rejected, already used for this piece");
            return;
        }

        let held = self.hold.replace(active);
        match held {
            Some(piece) => {
                let piece = piece.at_spawn(self.grid.width());
                if fits(&self.grid, &piece) {
                    self.active = Some(piece);
                } else {
                    log::debug!("held {:?} cannot enter, game over", piece.kind);
                    self.active = None;
                    self.phase = GamePhase::GameOver;
                    return;
                }
            }
            None => {
                self.spawn();
                if self.is_game_over() {
                    return;
                }
            }
        }
        log::debug!("holding {:?}", active.kind);
        self.can_hold = false;
    }

    /// Locking → Merging: the piece's cells become permanent tiles
    fn lock(&mut self) {
        self.phase = GamePhase::Merging;
        self.pending = LockEvent::default();
        let Some(piece) = self.active.take() else {
            return;
        };
        for (x, y, tile) in piece.cells() {
            if let Err(err) = self.grid.set(x, y, Some(tile)) {
                log::warn!("dropping tile while locking {:?}: {}", piece.kind, err);
            }
        }
        log::debug!("locked {:?} at ({}, {})", piece.kind, piece.x, piece.y);
    }

    /// Merging → Clearing: run the merge engine to its fixpoint
    fn merge(&mut self) {
        let report = settle(&mut self.grid);
        self.scoreboard.award(report.score);
        self.pending.merges = report.merges;
        self.pending.merge_score = report.score;
        if report.merges > 0 {
            log::debug!(
                "{} merges over {} passes for {} points",
                report.merges,
                report.passes,
                report.score
            );
        }
        self.phase = GamePhase::Clearing;
    }

    /// Clearing → Spawning: remove full rows once and update progression
    fn clear(&mut self) {
        let report = clear_rows(&mut self.grid, self.config.row_clear_bonus_multiplier);
        self.scoreboard.award(report.bonus);
        self.scoreboard.add_lines(report.count());

        let level = self.config.level_for_lines(self.lines());
        if level != self.level {
            log::debug!(
                "level {} -> {}, tick interval {}ms",
                self.level,
                level,
                self.config.tick_interval_for_level(level)
            );
            self.level = level;
        }

        self.pending.rows_cleared = report.count();
        self.pending.clear_bonus = report.bonus;
        self.pending.max_tile = self.grid.max_tile();
        // Full rows only ever form a bottom block after settling, so
        // removing them cannot bring equal tiles together.
        debug_assert!(!has_equal_neighbours(&self.grid));
        if self.pending.score() > 0 {
            log::debug!("lock scored {} points", self.pending.score());
        }
        self.last_event = Some(self.pending);
        self.phase = GamePhase::Spawning;
    }
}
