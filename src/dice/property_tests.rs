//! Property tests for dice module
//!
//! Property 1: Die rolls stay on the die
//! Property 2: Drop-lowest rolls stay in 3..=18 and average about 12.24
//! Property 3: Stat scaling is monotonic and bounded

use proptest::prelude::*;

use crate::dice::{
    classify_d20, d6x4_drop_lowest, scale_to_stat_range, GameRng, Natural, Roller,
};

// ═══════════════════════════════════════════════════════════════════════════
// Property 1: Die rolls stay on the die
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_roll_within_sides(seed in any::<u64>(), sides in 1u32..=100) {
        let mut rng = GameRng::new(seed);
        for _ in 0..50 {
            let value = rng.roll(sides);
            prop_assert!(value >= 1 && value <= sides);
        }
    }

    #[test]
    fn prop_unit_in_half_open_range(seed in any::<u64>()) {
        let mut rng = GameRng::new(seed);
        for _ in 0..50 {
            let value = rng.unit();
            prop_assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn prop_pick_in_bounds(seed in any::<u64>(), len in 1usize..=12) {
        let mut rng = GameRng::new(seed);
        for _ in 0..50 {
            prop_assert!(rng.pick(len) < len);
        }
    }

    #[test]
    fn prop_natural_one_never_crits(threshold in 1u32..=20) {
        prop_assert_eq!(classify_d20(1, threshold), Natural::CriticalFailure);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Property 2: Drop-lowest rolls
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_drop_lowest_in_range(seed in any::<u64>()) {
        let mut rng = GameRng::new(seed);
        for _ in 0..50 {
            let value = d6x4_drop_lowest(&mut rng);
            prop_assert!((3..=18).contains(&value));
        }
    }
}

#[test]
fn test_drop_lowest_mean() {
    let mut rng = GameRng::new(7);
    let trials = 100_000;
    let total: i64 = (0..trials).map(|_| d6x4_drop_lowest(&mut rng) as i64).sum();
    let mean = total as f64 / trials as f64;
    assert!((mean - 12.24).abs() < 0.1, "mean was {}", mean);
}

// ═══════════════════════════════════════════════════════════════════════════
// Property 3: Stat scaling
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn prop_scale_bounded(roll in -10i32..=40) {
        let scaled = scale_to_stat_range(roll);
        prop_assert!((1..=20).contains(&scaled));
    }

    #[test]
    fn prop_scale_monotonic(roll in 3i32..18) {
        prop_assert!(scale_to_stat_range(roll) <= scale_to_stat_range(roll + 1));
    }
}
