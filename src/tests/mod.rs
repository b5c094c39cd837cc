#![warn(clippy::all, clippy::pedantic)]

pub mod config_loader_tests;
pub mod game_tests;
pub mod spawner_tests;
pub mod systems_tests;

// Import test utilities
#[cfg(test)]
pub mod test_utils {
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    use crate::Clock;
    use crate::components::{ActivePiece, BestStats};
    use crate::engine::GameEngine;
    use crate::shapes::PieceKind;
    use crate::spawner::Spawner;
    use crate::storage::{BestStore, MemoryBestStore};

    pub const TEST_SEED: u64 = 42;

    // Clock that only moves when a test tells it to
    pub struct ManualClock {
        start: Instant,
        elapsed: Mutex<Duration>,
    }

    impl ManualClock {
        #[must_use]
        pub fn new() -> Self {
            Self {
                start: Instant::now(),
                elapsed: Mutex::new(Duration::ZERO),
            }
        }

        pub fn advance_ms(&self, ms: u64) {
            *self.elapsed.lock().unwrap() += Duration::from_millis(ms);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.start + *self.elapsed.lock().unwrap()
        }
    }

    // Engine on a manual clock with an empty in-memory store
    #[must_use]
    pub fn create_test_engine() -> (GameEngine, Arc<ManualClock>) {
        create_test_engine_with_store(Box::new(MemoryBestStore::new()))
    }

    #[must_use]
    pub fn create_test_engine_with_store(
        store: Box<dyn BestStore>,
    ) -> (GameEngine, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let engine = GameEngine::with_parts(store, clock.clone(), Spawner::with_seed(TEST_SEED));
        (engine, clock)
    }

    // Engine sharing its store with the test, so saves can be inspected
    #[must_use]
    pub fn create_engine_with_best(
        best: BestStats,
    ) -> (GameEngine, Arc<ManualClock>, Arc<MemoryBestStore>) {
        let store = Arc::new(MemoryBestStore::with_stats(best));
        let (engine, clock) = create_test_engine_with_store(Box::new(store.clone()));
        (engine, clock, store)
    }

    #[must_use]
    pub fn piece(kind: PieceKind, rotation: usize, x: i32, y: i32) -> ActivePiece {
        ActivePiece {
            kind,
            rotation,
            x,
            y,
        }
    }

    // Fills `row` with settled cells, leaving the listed columns empty
    pub fn fill_row_except(engine: &mut GameEngine, row: usize, gaps: &[usize]) {
        let board = &mut engine.state_mut().board;
        for x in 0..crate::game::BOARD_WIDTH {
            if !gaps.contains(&x) {
                board.set(x, row, Some(PieceKind::T));
            }
        }
    }
}
