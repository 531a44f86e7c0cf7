use serde::Serialize;

/// Fixed ascending (level, minimum balance) table. Balances past the
/// last entry synthesize the next threshold as 1.5x the current one,
/// so progression keeps going but decelerates.
pub const LEVEL_THRESHOLDS: [(u32, i64); 10] = [
    (1, 0),
    (2, 100),
    (3, 250),
    (4, 500),
    (5, 1000),
    (6, 2000),
    (7, 3500),
    (8, 5000),
    (9, 7500),
    (10, 10000),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelInfo {
    pub level: u32,
    pub next_level: u32,
    pub current_threshold: i64,
    pub next_threshold: i64,
    /// Percentage toward the next level, floored, capped at 100.
    pub progress: u8,
}

/// Map a signed balance to its level. Negative balances clamp to the
/// first level.
pub fn level_for_balance(balance: i64) -> LevelInfo {
    let mut idx = 0;
    for (i, (_, threshold)) in LEVEL_THRESHOLDS.iter().enumerate() {
        if balance >= *threshold {
            idx = i;
        } else {
            break;
        }
    }

    let (level, current_threshold) = LEVEL_THRESHOLDS[idx];

    let (next_level, next_threshold) = if idx + 1 < LEVEL_THRESHOLDS.len() {
        LEVEL_THRESHOLDS[idx + 1]
    } else {
        (level + 1, current_threshold * 3 / 2)
    };

    let span = next_threshold - current_threshold;
    let gained = (balance - current_threshold).max(0);

    // Guard against a degenerate zero-width span.
    let progress = if span <= 0 {
        100
    } else {
        ((gained * 100 / span).min(100)) as u8
    };

    LevelInfo {
        level,
        next_level,
        current_threshold,
        next_threshold,
        progress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_balance_is_level_one() {
        let info = level_for_balance(0);
        assert_eq!(info.level, 1);
        assert_eq!(info.next_level, 2);
        assert_eq!(info.next_threshold, 100);
        assert_eq!(info.progress, 0);
    }

    #[test]
    fn hundred_balance_is_level_two() {
        let info = level_for_balance(100);
        assert_eq!(info.level, 2);
        assert_eq!(info.next_level, 3);
    }

    #[test]
    fn boundary_just_below_threshold() {
        let info = level_for_balance(99);
        assert_eq!(info.level, 1);
        assert_eq!(info.progress, 99);
    }

    #[test]
    fn top_table_level() {
        let info = level_for_balance(10000);
        assert_eq!(info.level, 10);
        assert_eq!(info.next_level, 11);
        // Synthesized next threshold is 1.5x the last table entry.
        assert_eq!(info.next_threshold, 15000);
        assert_eq!(info.progress, 0);
    }

    #[test]
    fn beyond_table_progress_is_capped() {
        let info = level_for_balance(15000);
        assert_eq!(info.level, 10);
        assert_eq!(info.next_threshold, 15000);
        assert_eq!(info.progress, 100);

        let info = level_for_balance(20000);
        assert_eq!(info.progress, 100);
    }

    #[test]
    fn negative_balance_clamps_to_level_one() {
        let info = level_for_balance(-250);
        assert_eq!(info.level, 1);
        assert_eq!(info.progress, 0);
    }

    #[test]
    fn midpoint_progress() {
        // Level 2 spans 100..250, so 175 is 50%.
        let info = level_for_balance(175);
        assert_eq!(info.level, 2);
        assert_eq!(info.progress, 50);
    }
}
