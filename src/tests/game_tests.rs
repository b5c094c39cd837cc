#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::game::{
        MIN_DROP_INTERVAL_MS, ScoreRank, drop_interval_ms, level_for_lines, line_clear_points,
        lines_for_next_level,
    };

    #[test]
    fn test_level_thresholds() {
        let cases = [
            (0, 1),
            (9, 1),
            (10, 2),
            (24, 2),
            (25, 3),
            (44, 3),
            (45, 4),
            (70, 5),
            (99, 5),
            (100, 6),
            (134, 6),
            (135, 7),
            (170, 8),
        ];
        for (lines, level) in cases {
            assert_eq!(level_for_lines(lines), level, "{lines} lines");
        }
    }

    #[test]
    fn test_level_never_decreases_with_lines() {
        let mut previous = level_for_lines(0);
        for lines in 1..500 {
            let level = level_for_lines(lines);
            assert!(level >= previous);
            previous = level;
        }
    }

    #[test]
    fn test_drop_intervals() {
        assert_eq!(drop_interval_ms(1), 800);
        assert_eq!(drop_interval_ms(2), 650);
        assert_eq!(drop_interval_ms(6), 260);
        assert_eq!(drop_interval_ms(10), 100);
        assert_eq!(drop_interval_ms(11), MIN_DROP_INTERVAL_MS);
        assert_eq!(drop_interval_ms(40), MIN_DROP_INTERVAL_MS);
    }

    #[test]
    fn test_line_clear_points() {
        assert_eq!(line_clear_points(1, 1), 100);
        assert_eq!(line_clear_points(2, 3), 600);
        assert_eq!(line_clear_points(4, 5), 2000);
        assert_eq!(line_clear_points(0, 9), 0);
    }

    #[test]
    fn test_lines_for_next_level() {
        assert_eq!(lines_for_next_level(1), 10);
        assert_eq!(lines_for_next_level(2), 25);
        assert_eq!(lines_for_next_level(5), 100);
        assert_eq!(lines_for_next_level(6), 135);
        assert_eq!(lines_for_next_level(7), 170);

        for level in 1..20 {
            assert_eq!(level_for_lines(lines_for_next_level(level)), level + 1);
            assert_eq!(level_for_lines(lines_for_next_level(level) - 1), level);
        }
    }

    #[test]
    fn test_score_rank() {
        assert_eq!(ScoreRank::for_score(0), ScoreRank::KeepPracticing);
        assert_eq!(ScoreRank::for_score(999), ScoreRank::KeepPracticing);
        assert_eq!(ScoreRank::for_score(1_000), ScoreRank::NotBad);
        assert_eq!(ScoreRank::for_score(5_000), ScoreRank::GoodJob);
        assert_eq!(ScoreRank::for_score(10_000), ScoreRank::VeryGood);
        assert_eq!(ScoreRank::for_score(20_000), ScoreRank::Excellent);
        assert_eq!(ScoreRank::for_score(50_000), ScoreRank::Master);
        assert_eq!(ScoreRank::Master.message(), "BLOCK MASTER!");
    }
}
