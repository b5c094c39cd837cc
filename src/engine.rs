#![warn(clippy::all, clippy::pedantic)]

//! The game engine: one explicit session state plus the rules that move it.
//!
//! Every operation checks its precondition first and silently does nothing
//! when the session is not in a state that allows it. Candidate poses are
//! validated against the board before they replace the current piece, so no
//! operation leaves the session half-updated.

use bevy_ecs::prelude::*;
use log::{debug, error, info, trace, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::components::{ActivePiece, BestStats, Board, RenderCell, Status};
use crate::game::{
    BOARD_HEIGHT, BOARD_WIDTH, LEVEL_UP_NOTICE_MS, LOCK_WINDOW_MS, STARTING_LEVEL,
    drop_interval_ms, level_for_lines, line_clear_points,
};
use crate::shapes::PieceKind;
use crate::spawner::Spawner;
use crate::storage::BestStore;
use crate::{Clock, SystemClock};

/// Everything that describes one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub current: ActivePiece,
    pub next: PieceKind,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub status: Status,
    pub drop_interval_ms: u64,
}

/// Snapshot handed to the presentation layer. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderState {
    pub board: [[RenderCell; BOARD_WIDTH]; BOARD_HEIGHT],
    pub next: PieceKind,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub status: Status,
    pub new_record: bool,
    pub best: BestStats,
    /// Level just reached, while its banner is still showing.
    pub level_up: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
struct LevelUpNotice {
    level: u32,
    until: Instant,
}

#[derive(Resource)]
pub struct GameEngine {
    state: GameState,
    spawner: Spawner,
    clock: Arc<dyn Clock>,
    store: Box<dyn BestStore>,
    best: BestStats,
    // Best stats were loaded for a session that has not started yet
    best_pending: bool,
    new_record: bool,
    // Last successful move or rotation of the current piece
    last_shift_at: Option<Instant>,
    // Deadline of the pending automatic drop
    next_drop_at: Option<Instant>,
    paused_at: Option<Instant>,
    level_up: Option<LevelUpNotice>,
}

impl GameEngine {
    /// Engine on the system clock with a randomly seeded spawner.
    #[must_use]
    pub fn new(store: Box<dyn BestStore>) -> Self {
        Self::with_parts(store, Arc::new(SystemClock), Spawner::new())
    }

    /// Idle engine built from explicit collaborators.
    #[must_use]
    pub fn with_parts(
        store: Box<dyn BestStore>,
        clock: Arc<dyn Clock>,
        mut spawner: Spawner,
    ) -> Self {
        let state = fresh_state(&mut spawner, Status::Idle);
        let best = load_best(store.as_ref());
        Self {
            state,
            spawner,
            clock,
            store,
            best,
            best_pending: true,
            new_record: false,
            last_shift_at: None,
            next_drop_at: None,
            paused_at: None,
            level_up: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.state.status
    }

    #[must_use]
    pub fn best(&self) -> BestStats {
        self.best
    }

    /// Whether the session that just ended beat the stored best score.
    #[must_use]
    pub fn new_record(&self) -> bool {
        self.new_record
    }

    /// Starts a new running session, whatever the current one was doing.
    /// Best stats are read at most once per session.
    pub fn start_game(&mut self) {
        if !std::mem::take(&mut self.best_pending) {
            self.best = load_best(self.store.as_ref());
        }
        self.initialize(Status::Running);
        info!(
            "Game started: current {:?}, next {:?}",
            self.state.current.kind, self.state.next
        );
    }

    /// Replaces the session with a fresh idle one; `start_game` runs it.
    pub fn reset_game(&mut self) {
        self.initialize(Status::Idle);
        info!("Game reset");
    }

    /// Resets and immediately runs a new session. Same as `start_game`, which
    /// always begins from a fresh board.
    pub fn restart_game(&mut self) {
        self.start_game();
    }

    pub fn toggle_pause(&mut self) {
        let now = self.clock.now();
        match self.state.status {
            Status::Running => {
                self.state.status = Status::Paused;
                self.paused_at = Some(now);
                info!("Game paused");
            }
            Status::Paused => {
                // Time spent paused must not eat into the grace window or the pending drop
                if let Some(paused_at) = self.paused_at.take() {
                    let paused_for = now.duration_since(paused_at);
                    self.last_shift_at = self.last_shift_at.map(|at| at + paused_for);
                    self.next_drop_at = self.next_drop_at.map(|at| at + paused_for);
                }
                self.state.status = Status::Running;
                info!("Game resumed");
            }
            Status::Idle | Status::Over => {}
        }
    }

    /// Shifts the current piece one column; `direction` is -1 (left) or +1 (right).
    pub fn move_horizontal(&mut self, direction: i32) {
        if !self.is_running() || !matches!(direction, -1 | 1) {
            return;
        }
        let candidate = self.state.current.shifted(direction, 0);
        if self.state.board.is_valid_position(&candidate) {
            self.state.current = candidate;
            self.last_shift_at = Some(self.clock.now());
        }
    }

    pub fn rotate(&mut self) {
        if !self.is_running() {
            return;
        }
        let candidate = Spawner::rotate(self.state.current);
        if self.state.board.is_valid_position(&candidate) {
            self.state.current = candidate;
            self.last_shift_at = Some(self.clock.now());
        }
    }

    /// One row down, or the lock sequence when the piece is resting.
    pub fn soft_drop(&mut self) {
        if !self.is_running() {
            return;
        }

        let candidate = self.state.current.shifted(0, 1);
        if self.state.board.is_valid_position(&candidate) {
            self.state.current = candidate;
            return;
        }

        if self.within_lock_window() {
            debug!("Lock deferred: piece moved within the last {LOCK_WINDOW_MS}ms");
            return;
        }

        self.lock_current();
    }

    /// Drops straight to the lowest valid row and locks there, in one step.
    /// The pending automatic drop is absorbed.
    pub fn hard_drop(&mut self) {
        if !self.is_running() {
            return;
        }

        let mut landed = self.state.current;
        loop {
            let below = landed.shifted(0, 1);
            if !self.state.board.is_valid_position(&below) {
                break;
            }
            landed = below;
        }
        debug!("Hard drop: {} rows", landed.y - self.state.current.y);
        self.state.current = landed;
        self.lock_current();

        if self.is_running() {
            self.schedule_next_drop();
        }
    }

    /// Delivers the automatic drop when its deadline has passed. Returns whether it fired.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }

        let now = self.clock.now();
        let interval = Duration::from_millis(self.state.drop_interval_ms);
        let due = *self.next_drop_at.get_or_insert(now + interval);
        if now < due {
            return false;
        }

        trace!("Drop tick at interval {}ms", self.state.drop_interval_ms);
        self.soft_drop();
        // Subsequent ticks use whatever interval the drop left behind
        self.schedule_next_drop();
        true
    }

    /// Forgets the stored best; the current session keeps its own numbers.
    pub fn clear_best(&mut self) {
        if let Err(err) = self.store.clear() {
            error!("Failed to clear best stats: {err}");
        }
        self.best = BestStats::default();
        info!("Best stats cleared");
    }

    /// Board with the current piece overlaid, plus the numbers shown beside it.
    #[must_use]
    pub fn render_state(&self) -> RenderState {
        let mut board = [[RenderCell::Empty; BOARD_WIDTH]; BOARD_HEIGHT];
        for (row, cells) in board.iter_mut().zip(self.state.board.rows()) {
            for (cell, settled) in row.iter_mut().zip(cells) {
                if let Some(kind) = settled {
                    *cell = RenderCell::Settled(*kind);
                }
            }
        }

        let current = self.state.current;
        for (x, y) in current.blocks() {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            if let Some(cell) = board.get_mut(y).and_then(|row| row.get_mut(x)) {
                *cell = RenderCell::Current(current.kind);
            }
        }

        let now = self.clock.now();
        RenderState {
            board,
            next: self.state.next,
            score: self.state.score,
            level: self.state.level,
            lines: self.state.lines,
            status: self.state.status,
            new_record: self.new_record,
            best: self.best,
            level_up: self
                .level_up
                .filter(|notice| now < notice.until)
                .map(|notice| notice.level),
        }
    }

    fn is_running(&self) -> bool {
        self.state.status == Status::Running
    }

    fn initialize(&mut self, status: Status) {
        self.state = fresh_state(&mut self.spawner, status);
        self.new_record = false;
        self.last_shift_at = None;
        self.paused_at = None;
        self.level_up = None;
        self.next_drop_at = None;
        if status == Status::Running {
            self.schedule_next_drop();
        }
    }

    fn schedule_next_drop(&mut self) {
        self.next_drop_at =
            Some(self.clock.now() + Duration::from_millis(self.state.drop_interval_ms));
    }

    fn within_lock_window(&self) -> bool {
        self.last_shift_at.is_some_and(|at| {
            self.clock.now().saturating_duration_since(at) < Duration::from_millis(LOCK_WINDOW_MS)
        })
    }

    fn lock_current(&mut self) {
        let piece = self.state.current;
        self.state.board.place(&piece);
        debug!("Locked {:?} at ({}, {})", piece.kind, piece.x, piece.y);

        let cleared = self.state.board.clear_lines();
        if cleared > 0 {
            let points = line_clear_points(cleared, self.state.level);
            self.state.score += points;
            self.state.lines += cleared;
            info!(
                "Cleared {cleared} lines for {points} points (total lines: {})",
                self.state.lines
            );
        }

        let level = level_for_lines(self.state.lines);
        if level > self.state.level {
            self.state.level = level;
            self.state.drop_interval_ms = drop_interval_ms(level);
            self.level_up = Some(LevelUpNotice {
                level,
                until: self.clock.now() + Duration::from_millis(LEVEL_UP_NOTICE_MS),
            });
            info!(
                "Level up: {level}, drop interval {}ms",
                self.state.drop_interval_ms
            );
        }

        if piece.y <= 0 {
            self.finish();
            return;
        }

        self.spawn_next();
    }

    fn spawn_next(&mut self) {
        let piece = Spawner::spawn(self.state.next);
        self.state.next = self.spawner.random_kind();
        self.state.current = piece;
        self.last_shift_at = None;
        debug!("Spawned {:?}, next {:?}", piece.kind, self.state.next);

        if !self.state.board.is_valid_position(&piece) {
            info!("Spawn blocked by settled cells");
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.state.status = Status::Over;
        self.next_drop_at = None;
        self.new_record = self.state.score > self.best.score;
        info!(
            "Game over: score {}, level {}, lines {}",
            self.state.score, self.state.level, self.state.lines
        );

        if self.new_record {
            self.best = BestStats {
                score: self.state.score,
                level: self.state.level,
                lines: self.state.lines,
            };
            info!("New best score: {}", self.best.score);
            if let Err(err) = self.store.save(&self.best) {
                error!("Failed to save best stats: {err}");
            }
        }
    }
}

fn fresh_state(spawner: &mut Spawner, status: Status) -> GameState {
    let current = Spawner::spawn(spawner.random_kind());
    let next = spawner.random_kind();
    GameState {
        board: Board::new(),
        current,
        next,
        score: 0,
        level: STARTING_LEVEL,
        lines: 0,
        status,
        drop_interval_ms: drop_interval_ms(STARTING_LEVEL),
    }
}

fn load_best(store: &dyn BestStore) -> BestStats {
    match store.load() {
        Ok(best) => best,
        Err(err) => {
            warn!("Could not load best stats, starting from defaults: {err}");
            BestStats::default()
        }
    }
}
