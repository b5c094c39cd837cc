#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Bitmap offsets are always 0..4
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap
)]

use ratatui::style::Color;

/// One rotation of a piece: a 4x4 grid, 1 marks a filled cell. Indexed `[row][column]`.
pub type Bitmap = [[u8; 4]; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Bitmap for `rotation`; indices wrap modulo 4.
    #[must_use]
    pub fn bitmap(self, rotation: usize) -> &'static Bitmap {
        &self.rotations()[rotation % 4]
    }

    #[must_use]
    pub fn rotations(self) -> &'static [Bitmap; 4] {
        match self {
            PieceKind::I => &I_ROTATIONS,
            PieceKind::O => &O_ROTATIONS,
            PieceKind::T => &T_ROTATIONS,
            PieceKind::S => &S_ROTATIONS,
            PieceKind::Z => &Z_ROTATIONS,
            PieceKind::J => &J_ROTATIONS,
            PieceKind::L => &L_ROTATIONS,
        }
    }

    /// Filled `(column, row)` offsets of one rotation, row-major order.
    pub fn cells(self, rotation: usize) -> impl Iterator<Item = (i32, i32)> {
        let bitmap = self.bitmap(rotation);
        (0..4).flat_map(move |row| {
            (0..4).filter_map(move |col| {
                (bitmap[row][col] != 0).then_some((col as i32, row as i32))
            })
        })
    }

    /// Row of the topmost filled cell in `rotation`.
    #[must_use]
    pub fn top_row(self, rotation: usize) -> i32 {
        self.cells(rotation).map(|(_, row)| row).min().unwrap_or(0)
    }

    #[must_use]
    pub fn color(self) -> Color {
        match self {
            PieceKind::I => Color::Cyan,
            PieceKind::O => Color::Yellow,
            PieceKind::T => Color::Magenta,
            PieceKind::S => Color::Green,
            PieceKind::Z => Color::Red,
            PieceKind::J => Color::Blue,
            PieceKind::L => Color::LightRed,
        }
    }
}

const I_ROTATIONS: [Bitmap; 4] = [
    [[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]],
    [[0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0]],
    [[0, 0, 0, 0], [0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0]],
    [[0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0]],
];

// Identical in every rotation, so turning an O never shifts it.
const O_ROTATIONS: [Bitmap; 4] = [
    [[0, 0, 0, 0], [0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
];

const T_ROTATIONS: [Bitmap; 4] = [
    [[0, 0, 0, 0], [0, 1, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [0, 1, 0, 0], [0, 1, 1, 0], [0, 1, 0, 0]],
    [[0, 0, 0, 0], [0, 0, 0, 0], [1, 1, 1, 0], [0, 1, 0, 0]],
    [[0, 0, 0, 0], [0, 1, 0, 0], [1, 1, 0, 0], [0, 1, 0, 0]],
];

const S_ROTATIONS: [Bitmap; 4] = [
    [[0, 0, 0, 0], [0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [0, 1, 0, 0], [0, 1, 1, 0], [0, 0, 1, 0]],
    [[0, 0, 0, 0], [0, 0, 0, 0], [0, 1, 1, 0], [1, 1, 0, 0]],
    [[0, 0, 0, 0], [1, 0, 0, 0], [1, 1, 0, 0], [0, 1, 0, 0]],
];

const Z_ROTATIONS: [Bitmap; 4] = [
    [[0, 0, 0, 0], [1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [0, 0, 1, 0], [0, 1, 1, 0], [0, 1, 0, 0]],
    [[0, 0, 0, 0], [0, 0, 0, 0], [1, 1, 0, 0], [0, 1, 1, 0]],
    [[0, 0, 0, 0], [0, 1, 0, 0], [1, 1, 0, 0], [1, 0, 0, 0]],
];

const J_ROTATIONS: [Bitmap; 4] = [
    [[0, 0, 0, 0], [1, 0, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [0, 1, 1, 0], [0, 1, 0, 0], [0, 1, 0, 0]],
    [[0, 0, 0, 0], [0, 0, 0, 0], [1, 1, 1, 0], [0, 0, 1, 0]],
    [[0, 0, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0], [1, 1, 0, 0]],
];

const L_ROTATIONS: [Bitmap; 4] = [
    [[0, 0, 0, 0], [0, 0, 1, 0], [1, 1, 1, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 1, 0]],
    [[0, 0, 0, 0], [0, 0, 0, 0], [1, 1, 1, 0], [1, 0, 0, 0]],
    [[0, 0, 0, 0], [1, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0]],
];
