/// Difficulty curve: pure functions of level and config, no hidden state.
///
/// Two independent levers:
///   - Box count: a hand-tuned lookup table. Levels beyond the table reuse
///     its last entry, so there is never an out-of-range fault.
///   - Color deviation: linear decay per level, floored at the configured
///     minimum so the target never becomes indistinguishable.

use crate::config::RulesConfig;

/// Number of boxes shown at `level`. Always ≥ 1.
pub fn box_count(rules: &RulesConfig, level: u32) -> usize {
    let table = &rules.boxes_per_level;
    match table.get(level as usize) {
        Some(&n) => n.max(1),
        None => table.last().copied().unwrap_or(rules.default_box_count).max(1),
    }
}

/// Color deviation for `level`: `default − level·factor`, floored at the
/// configured minimum.
pub fn deviation(rules: &RulesConfig, level: u32) -> u8 {
    let decayed = rules.default_deviation as i64
        - level as i64 * rules.deviation_factor as i64;
    decayed.max(rules.min_deviation as i64) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> RulesConfig {
        RulesConfig {
            highscore_key: "TEST".into(),
            default_deviation: 60,
            default_box_count: 3,
            min_deviation: 3,
            deviation_factor: 2,
            boxes_per_level: vec![
                3, 4, 6, 9, 9, 9, 12, 15, 16, 16, 20, 24, 25, 30, 36, 36, 36, 49,
            ],
        }
    }

    #[test]
    fn table_lookup_within_range() {
        let r = rules();
        assert_eq!(box_count(&r, 0), 3);
        assert_eq!(box_count(&r, 1), 4);
        assert_eq!(box_count(&r, 6), 12);
        assert_eq!(box_count(&r, 17), 49);
    }

    #[test]
    fn levels_beyond_table_clamp_to_last_entry() {
        let r = rules();
        assert_eq!(box_count(&r, 18), 49);
        assert_eq!(box_count(&r, 29), 49);
        assert_eq!(box_count(&r, 1_000_000), 49);
    }

    #[test]
    fn lookup_matches_min_of_level_and_table_end() {
        let r = rules();
        let len = r.boxes_per_level.len();
        for level in 0..64u32 {
            let idx = (level as usize).min(len - 1);
            assert_eq!(box_count(&r, level), r.boxes_per_level[idx]);
        }
    }

    #[test]
    fn deviation_decays_linearly() {
        let r = rules();
        assert_eq!(deviation(&r, 0), 60);
        assert_eq!(deviation(&r, 1), 58);
        assert_eq!(deviation(&r, 10), 40);
    }

    #[test]
    fn deviation_never_drops_below_minimum() {
        let r = rules();
        // 60 − 29·2 = 2, floored at 3.
        assert_eq!(deviation(&r, 29), 3);
        for level in 0..200u32 {
            assert!(deviation(&r, level) >= r.min_deviation);
        }
    }

    /// The worked example: 29 consecutive hits starting from level 0.
    #[test]
    fn example_progression() {
        let r = rules();
        assert_eq!((box_count(&r, 0), deviation(&r, 0)), (3, 60));
        assert_eq!((box_count(&r, 1), deviation(&r, 1)), (4, 58));
        assert_eq!((box_count(&r, 29), deviation(&r, 29)), (49, 3));
    }
}
