#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since board dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow sign loss when going from signed to unsigned types since we validate values are non-negative before casting
    clippy::cast_sign_loss,
    // Allow potential wrapping when casting between types of same size as we validate values are in range
    clippy::cast_possible_wrap
)]

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::game::{BOARD_HEIGHT, BOARD_WIDTH, STARTING_LEVEL};
use crate::shapes::PieceKind;

/// A board cell: empty, or settled with the kind (and so the color) of the piece that left it.
pub type Cell = Option<PieceKind>;

/// The falling piece's pose. Every transition builds a new value so it can be
/// validated before it replaces the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub rotation: usize,
    pub x: i32,
    pub y: i32,
}

impl ActivePiece {
    #[must_use]
    pub fn shifted(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Absolute `(column, row)` of every filled cell; rows may be negative while entering.
    pub fn blocks(self) -> impl Iterator<Item = (i32, i32)> {
        self.kind
            .cells(self.rotation)
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; BOARD_WIDTH]; BOARD_HEIGHT],
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: [[None; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        BOARD_WIDTH
    }

    #[must_use]
    pub fn height(&self) -> usize {
        BOARD_HEIGHT
    }

    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(None);
        }
    }

    /// Cell at `(x, y)`, `None` when out of bounds.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 {
            return None;
        }
        self.cells
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
    }

    /// Rows, top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[[Cell; BOARD_WIDTH]; BOARD_HEIGHT] {
        &self.cells
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_none)
    }

    /// Whether `piece` fits: every filled cell inside the side walls and above
    /// the floor, and on an empty cell when it is on the board. Cells above
    /// row 0 are allowed so pieces can enter from the top.
    #[must_use]
    pub fn is_valid_position(&self, piece: &ActivePiece) -> bool {
        piece.blocks().all(|(x, y)| {
            if x < 0 || x >= BOARD_WIDTH as i32 || y >= BOARD_HEIGHT as i32 {
                return false;
            }
            y < 0 || self.cells[y as usize][x as usize].is_none()
        })
    }

    /// Stamps the piece onto the board. Cells above row 0 are dropped.
    pub fn place(&mut self, piece: &ActivePiece) {
        for (x, y) in piece.blocks() {
            if x >= 0 && x < BOARD_WIDTH as i32 && y >= 0 && y < BOARD_HEIGHT as i32 {
                self.cells[y as usize][x as usize] = Some(piece.kind);
            }
        }
    }

    /// Removes every full row, keeps the others in order at the bottom and
    /// refills the top with empty rows. Returns the number of rows removed.
    pub fn clear_lines(&mut self) -> u32 {
        let mut kept: Vec<[Cell; BOARD_WIDTH]> = self
            .cells
            .iter()
            .filter(|row| row.iter().any(Option::is_none))
            .copied()
            .collect();
        let cleared = BOARD_HEIGHT - kept.len();
        if cleared == 0 {
            return 0;
        }

        let mut rebuilt = vec![[None; BOARD_WIDTH]; cleared];
        rebuilt.append(&mut kept);
        for (dst, src) in self.cells.iter_mut().zip(rebuilt) {
            *dst = src;
        }

        cleared as u32
    }

    #[cfg(test)]
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        self.cells[y][x] = cell;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Running,
    Paused,
    Over,
}

/// Best finished session, kept by a [`crate::storage::BestStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BestStats {
    pub score: u32,
    pub level: u32,
    pub lines: u32,
}

impl Default for BestStats {
    fn default() -> Self {
        Self {
            score: 0,
            level: STARTING_LEVEL,
            lines: 0,
        }
    }
}

/// One cell of the render projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderCell {
    Empty,
    Settled(PieceKind),
    Current(PieceKind),
}

impl RenderCell {
    #[must_use]
    pub fn kind(self) -> Option<PieceKind> {
        match self {
            RenderCell::Empty => None,
            RenderCell::Settled(kind) | RenderCell::Current(kind) => Some(kind),
        }
    }
}

// Logical actions collected from the keyboard, consumed once per frame by the input system
#[derive(Resource, Debug, Clone, Default)]
pub struct Input {
    pub left: bool,
    pub right: bool,
    pub soft_drop: bool,
    pub rotate: bool,
    pub hard_drop: bool,
    pub pause: bool,
    pub start: bool,
    pub reset: bool,
    pub clear_best: bool,
}

impl Input {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// Throttles auto-repeated horizontal moves while a direction key is held
#[derive(Resource, Debug, Clone, Default)]
pub struct HorizontalRepeat {
    pub direction: i32,
    pub last_fired: Option<Instant>,
}

impl HorizontalRepeat {
    /// Whether a horizontal key event should become a move. A fresh press or a
    /// new direction always fires; a key repeat in the same direction fires
    /// again once `interval` has passed.
    pub fn accept(
        &mut self,
        direction: i32,
        repeat: bool,
        now: Instant,
        interval: Duration,
    ) -> bool {
        let due = match self.last_fired {
            Some(last) if repeat && self.direction == direction => {
                now.duration_since(last) >= interval
            }
            _ => true,
        };
        if due {
            self.direction = direction;
            self.last_fired = Some(now);
        }
        due
    }

    pub fn release(&mut self) {
        *self = Self::default();
    }
}
