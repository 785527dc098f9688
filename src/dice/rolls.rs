//! Stat generation rolls

use super::Roller;
use crate::stats::{StatScores, MAX_SCORE, MIN_SCORE};

/// Roll four d6, drop the lowest, sum the other three
pub fn d6x4_drop_lowest<R: Roller + ?Sized>(roller: &mut R) -> i32 {
    let mut dice = [0u32; 4];
    for die in dice.iter_mut() {
        *die = roller.roll(6);
    }
    let lowest = dice.iter().copied().min().unwrap_or(0);
    (dice.iter().sum::<u32>() - lowest) as i32
}

/// Map a 3..=18 roll linearly onto 1..=20
pub fn scale_to_stat_range(roll: i32) -> i32 {
    let scaled = ((roll - 3) as f64 / 15.0 * 19.0 + 0.5).floor() as i32 + 1;
    scaled.clamp(MIN_SCORE, MAX_SCORE)
}

/// Roll a full set of six ability scores
pub fn roll_stats<R: Roller + ?Sized>(roller: &mut R) -> StatScores {
    let mut roll = || scale_to_stat_range(d6x4_drop_lowest(&mut *roller));
    StatScores {
        str_: roll(),
        wis: roll(),
        cha: roll(),
        sta: roll(),
        agi: roll(),
        int: roll(),
    }
}

/// Natural-roll classification of a d20
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Natural {
    CriticalFailure,
    Normal,
    CriticalSuccess,
}

/// Classify a d20 against a crit threshold (20 unless widened)
///
/// A natural 1 is a critical failure even when the threshold would say
/// otherwise.
#[inline]
pub fn classify_d20(roll: u32, crit_threshold: u32) -> Natural {
    if roll <= 1 {
        Natural::CriticalFailure
    } else if roll >= crit_threshold {
        Natural::CriticalSuccess
    } else {
        Natural::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedRoller;

    #[test]
    fn test_drop_lowest() {
        let mut roller = ScriptedRoller::rolls([1, 6, 5, 4]);
        assert_eq!(d6x4_drop_lowest(&mut roller), 15);
    }

    #[test]
    fn test_scale_anchors() {
        assert_eq!(scale_to_stat_range(3), 1);
        assert_eq!(scale_to_stat_range(18), 20);
        assert_eq!(scale_to_stat_range(10), 10);
        assert_eq!(scale_to_stat_range(11), 11);
    }

    #[test]
    fn test_roll_stats_in_range() {
        let mut roller = ScriptedRoller::rolls([6; 24]);
        let scores = roll_stats(&mut roller);
        assert_eq!(scores, StatScores::uniform(20));
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify_d20(1, 18), Natural::CriticalFailure);
        assert_eq!(classify_d20(18, 18), Natural::CriticalSuccess);
        assert_eq!(classify_d20(19, 20), Natural::Normal);
        assert_eq!(classify_d20(20, 20), Natural::CriticalSuccess);
    }
}
