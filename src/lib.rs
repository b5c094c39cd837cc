pub mod app;
pub mod components;
pub mod config;
pub mod engine;
pub mod game;
pub mod shapes;
pub mod spawner;
pub mod storage;
pub mod systems;
pub mod ui;

#[cfg(test)]
mod tests;

use std::time::Instant;

/// Monotonic time source for the engine's drop schedule and lock grace window.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
