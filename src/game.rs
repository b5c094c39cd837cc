#![warn(clippy::all, clippy::pedantic)]

// Game board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

// Spawn column for the 4-wide bounding box, centred on a 10-wide board
pub const SPAWN_X: i32 = 3;

// Game timing
pub const LOCK_WINDOW_MS: u64 = 300; // Grace after a successful move/rotate before a grounded piece locks
pub const LEVEL_UP_NOTICE_MS: u64 = 2_500; // How long the "level up" banner stays visible

// Line clear scoring (multiplied by cleared rows and by the current level)
pub const POINTS_PER_LINE: u32 = 100;

// Level progression
pub const STARTING_LEVEL: u32 = 1;

// Cumulative line totals at which levels 2..=6 are reached
pub const LEVEL_LINE_THRESHOLDS: &[(u32, u32)] = &[
    (10, 2),  // 10 lines for level 2
    (25, 3),  // 25 lines for level 3
    (45, 4),  // etc.
    (70, 5),
    (100, 6),
];

// Past the last threshold every this many lines adds a level
pub const LINES_PER_LATE_LEVEL: u32 = 35;

// Drop interval in milliseconds for levels 1..=10
pub const DROP_INTERVALS_MS: &[u64] = &[800, 650, 500, 420, 340, 260, 220, 180, 140, 100];

// Drop interval for every level past the table
pub const MIN_DROP_INTERVAL_MS: u64 = 50;

/// Level reached after clearing `lines` rows in total.
#[must_use]
pub fn level_for_lines(lines: u32) -> u32 {
    let Some(&(last_threshold, last_level)) = LEVEL_LINE_THRESHOLDS.last() else {
        return STARTING_LEVEL;
    };

    if lines > last_threshold {
        return last_level + (lines - last_threshold) / LINES_PER_LATE_LEVEL;
    }

    let mut level = STARTING_LEVEL;
    for &(threshold, threshold_level) in LEVEL_LINE_THRESHOLDS {
        if lines >= threshold {
            level = threshold_level;
        } else {
            break;
        }
    }
    level
}

/// Automatic drop interval for `level`.
#[must_use]
pub fn drop_interval_ms(level: u32) -> u64 {
    let index = level.max(STARTING_LEVEL) - STARTING_LEVEL;
    DROP_INTERVALS_MS
        .get(index as usize)
        .copied()
        .unwrap_or(MIN_DROP_INTERVAL_MS)
}

/// Points for clearing `lines` rows at once while playing `level`.
#[must_use]
pub fn line_clear_points(lines: u32, level: u32) -> u32 {
    lines * POINTS_PER_LINE * level
}

/// Cumulative line total needed to leave `level`.
#[must_use]
pub fn lines_for_next_level(level: u32) -> u32 {
    for &(threshold, threshold_level) in LEVEL_LINE_THRESHOLDS {
        if threshold_level > level {
            return threshold;
        }
    }
    let (last_threshold, last_level) = LEVEL_LINE_THRESHOLDS
        .last()
        .copied()
        .unwrap_or((0, STARTING_LEVEL));
    last_threshold + (level + 1 - last_level) * LINES_PER_LATE_LEVEL
}

/// End-of-game message tier, chosen by final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreRank {
    Master,
    Excellent,
    VeryGood,
    GoodJob,
    NotBad,
    KeepPracticing,
}

impl ScoreRank {
    #[must_use]
    pub fn for_score(score: u32) -> Self {
        match score {
            50_000.. => ScoreRank::Master,
            20_000.. => ScoreRank::Excellent,
            10_000.. => ScoreRank::VeryGood,
            5_000.. => ScoreRank::GoodJob,
            1_000.. => ScoreRank::NotBad,
            _ => ScoreRank::KeepPracticing,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ScoreRank::Master => "BLOCK MASTER!",
            ScoreRank::Excellent => "EXCELLENT PLAYER!",
            ScoreRank::VeryGood => "VERY GOOD!",
            ScoreRank::GoodJob => "GOOD JOB!",
            ScoreRank::NotBad => "NOT BAD!",
            ScoreRank::KeepPracticing => "KEEP PRACTICING!",
        }
    }
}
