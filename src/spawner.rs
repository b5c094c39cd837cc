#![warn(clippy::all, clippy::pedantic)]

use crate::components::ActivePiece;
use crate::game::SPAWN_X;
use crate::shapes::PieceKind;

/// Draws piece kinds and builds spawn and rotation poses.
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: fastrand::Rng,
}

impl Spawner {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    /// Spawner with a fixed sequence of kinds, for replays and tests.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Uniform over all kinds; every draw is independent, so repeats happen.
    pub fn random_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.usize(..PieceKind::ALL.len())]
    }

    /// Spawn pose: first rotation, horizontally centred, topmost filled cell on row 0.
    #[must_use]
    pub fn spawn(kind: PieceKind) -> ActivePiece {
        ActivePiece {
            kind,
            rotation: 0,
            x: SPAWN_X,
            y: -kind.top_row(0),
        }
    }

    /// Next rotation in place, without kicks. The caller checks it fits.
    #[must_use]
    pub fn rotate(piece: ActivePiece) -> ActivePiece {
        ActivePiece {
            rotation: (piece.rotation + 1) % 4,
            ..piece
        }
    }
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new()
    }
}
