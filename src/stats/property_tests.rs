//! Property tests for stats module
//!
//! Property 1: Ability bonus formula
//! Property 2: Difficulty scaling floors

use proptest::prelude::*;

use crate::config::Difficulty;
use crate::stats::{apply_difficulty, bonus_for, half_bonus, CombatStats, MIN_SCALED_AC};

fn difficulty_strategy() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Normal),
        Just(Difficulty::Hard),
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
// Property 1: Ability bonus formula
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn prop_bonus_matches_floor(score in 1i32..=20) {
        let expected = ((score - 10) as f64 / 2.0).floor() as i32;
        prop_assert_eq!(bonus_for(score), expected);
    }

    #[test]
    fn prop_half_bonus_never_exceeds_bonus_magnitude(bonus in -10i32..=10) {
        let half = half_bonus(bonus);
        prop_assert_eq!(half, (bonus as f64 * 0.5).floor() as i32);
        prop_assert!(half.abs() <= bonus.abs().max(1));
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Property 2: Difficulty scaling floors
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn prop_scaled_stats_respect_floors(
        hp in 1i32..=100,
        damage in 1i32..=20,
        ac in 1i32..=25,
        reduction in 0i32..=6,
        difficulty in difficulty_strategy(),
    ) {
        let scaled = apply_difficulty(CombatStats { hp, damage, ac }, &difficulty.boss(), reduction);
        prop_assert!(scaled.hp >= 1);
        prop_assert!(scaled.damage >= 1);
        prop_assert!(scaled.ac >= MIN_SCALED_AC);
    }

    #[test]
    fn prop_normal_difficulty_is_identity(hp in 1i32..=100, damage in 1i32..=20, ac in 5i32..=25) {
        let base = CombatStats { hp, damage, ac };
        prop_assert_eq!(apply_difficulty(base, &Difficulty::Normal.boss(), 0), base);
    }
}
