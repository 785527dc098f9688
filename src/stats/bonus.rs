//! Ability scores and the bonuses derived from them

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::BossDifficulty;

/// Lowest ability score a character can have
pub const MIN_SCORE: i32 = 1;
/// Highest ability score a character can have
pub const MAX_SCORE: i32 = 20;
/// Floor applied to any difficulty-scaled armor class
pub const MIN_SCALED_AC: i32 = 5;

/// The six abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Strength,
    Wisdom,
    Charisma,
    Stamina,
    Agility,
    Intelligence,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Stat::Strength,
        Stat::Wisdom,
        Stat::Charisma,
        Stat::Stamina,
        Stat::Agility,
        Stat::Intelligence,
    ];

    pub fn short_name(&self) -> &'static str {
        match self {
            Stat::Strength => "str",
            Stat::Wisdom => "wis",
            Stat::Charisma => "cha",
            Stat::Stamina => "sta",
            Stat::Agility => "agi",
            Stat::Intelligence => "int",
        }
    }

    pub fn long_name(&self) -> &'static str {
        match self {
            Stat::Strength => "strength",
            Stat::Wisdom => "wisdom",
            Stat::Charisma => "charisma",
            Stat::Stamina => "stamina",
            Stat::Agility => "agility",
            Stat::Intelligence => "intelligence",
        }
    }

    /// Look up a stat by short or long name, ignoring case
    pub fn from_name(name: &str) -> Option<Stat> {
        let name = name.trim().to_ascii_lowercase();
        Stat::ALL
            .into_iter()
            .find(|stat| stat.short_name() == name || stat.long_name() == name)
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name().to_ascii_uppercase())
    }
}

/// Raw ability scores in 1..=20
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatScores {
    #[serde(rename = "str")]
    pub str_: i32,
    pub wis: i32,
    pub cha: i32,
    pub sta: i32,
    pub agi: i32,
    pub int: i32,
}

impl Default for StatScores {
    fn default() -> Self {
        Self::uniform(10)
    }
}

impl StatScores {
    pub fn uniform(score: i32) -> Self {
        Self {
            str_: score,
            wis: score,
            cha: score,
            sta: score,
            agi: score,
            int: score,
        }
    }

    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Strength => self.str_,
            Stat::Wisdom => self.wis,
            Stat::Charisma => self.cha,
            Stat::Stamina => self.sta,
            Stat::Agility => self.agi,
            Stat::Intelligence => self.int,
        }
    }

    pub fn set(&mut self, stat: Stat, value: i32) {
        let slot = match stat {
            Stat::Strength => &mut self.str_,
            Stat::Wisdom => &mut self.wis,
            Stat::Charisma => &mut self.cha,
            Stat::Stamina => &mut self.sta,
            Stat::Agility => &mut self.agi,
            Stat::Intelligence => &mut self.int,
        };
        *slot = value;
    }

    /// Add `delta` to a score, keeping it inside 1..=20
    pub fn adjust(&mut self, stat: Stat, delta: i32) {
        let value = (self.get(stat) + delta).clamp(MIN_SCORE, MAX_SCORE);
        self.set(stat, value);
    }

    pub fn bonuses(&self) -> StatBonuses {
        StatBonuses::from_scores(self)
    }
}

/// Per-stat integer modifiers
///
/// Used both for ability bonuses (`floor((score - 10) / 2)`) and for the
/// flat race/class skill bonuses applied to skill checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatBonuses {
    #[serde(rename = "str")]
    pub str_: i32,
    pub wis: i32,
    pub cha: i32,
    pub sta: i32,
    pub agi: i32,
    pub int: i32,
}

impl StatBonuses {
    pub fn from_scores(scores: &StatScores) -> Self {
        Self {
            str_: bonus_for(scores.str_),
            wis: bonus_for(scores.wis),
            cha: bonus_for(scores.cha),
            sta: bonus_for(scores.sta),
            agi: bonus_for(scores.agi),
            int: bonus_for(scores.int),
        }
    }

    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Strength => self.str_,
            Stat::Wisdom => self.wis,
            Stat::Charisma => self.cha,
            Stat::Stamina => self.sta,
            Stat::Agility => self.agi,
            Stat::Intelligence => self.int,
        }
    }

    /// Bonus for a stat given by name; unknown names contribute 0
    pub fn get_by_name(&self, name: &str) -> i32 {
        match Stat::from_name(name) {
            Some(stat) => self.get(stat),
            None => {
                tracing::warn!(stat = name, "unknown stat name, using 0");
                0
            }
        }
    }

    /// The damped half-weight bonus for a stat
    #[inline]
    pub fn half(&self, stat: Stat) -> i32 {
        half_bonus(self.get(stat))
    }

    pub fn with(mut self, stat: Stat, value: i32) -> Self {
        match stat {
            Stat::Strength => self.str_ = value,
            Stat::Wisdom => self.wis = value,
            Stat::Charisma => self.cha = value,
            Stat::Stamina => self.sta = value,
            Stat::Agility => self.agi = value,
            Stat::Intelligence => self.int = value,
        }
        self
    }
}

/// `floor((score - 10) / 2)`
#[inline]
pub fn bonus_for(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Half-weight bonus, floored toward negative infinity
///
/// Every combat number that reads a stat bonus goes through this.
#[inline]
pub fn half_bonus(bonus: i32) -> i32 {
    bonus.div_euclid(2)
}

/// Round half away from zero for positives and half up for negatives
/// (`Math.round` semantics: `floor(x + 0.5)`)
#[inline]
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Scale an HP or damage figure, never below 1
#[inline]
pub fn scale_stat(base: i32, mult: f64) -> i32 {
    round_half_up(base as f64 * mult).max(1)
}

/// Armor class after an AC reduction and a difficulty modifier, never below 5
#[inline]
pub fn scaled_ac(base: i32, reduction: i32, ac_mod: i32) -> i32 {
    (base - reduction + ac_mod).max(MIN_SCALED_AC)
}

/// `ceil(value * pct / 100)` in integer arithmetic
#[inline]
pub fn percent_ceil(value: i32, pct: u32) -> i32 {
    (value * pct as i32 + 99).div_euclid(100)
}

/// `floor(value * pct / 100)` in integer arithmetic
#[inline]
pub fn percent_floor(value: i32, pct: u32) -> i32 {
    (value * pct as i32).div_euclid(100)
}

/// A stat block before or after difficulty scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatStats {
    pub hp: i32,
    pub damage: i32,
    pub ac: i32,
}

/// Scale a boss stat block for an encounter
///
/// `ac_reduction` is the attacker's INT-derived armor penetration.
pub fn apply_difficulty(base: CombatStats, settings: &BossDifficulty, ac_reduction: i32) -> CombatStats {
    CombatStats {
        hp: scale_stat(base.hp, settings.hp_mult),
        damage: scale_stat(base.damage, settings.damage_mult),
        ac: scaled_ac(base.ac, ac_reduction, settings.ac_mod),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;

    #[test]
    fn test_bonus_for_anchors() {
        assert_eq!(bonus_for(10), 0);
        assert_eq!(bonus_for(11), 0);
        assert_eq!(bonus_for(20), 5);
        // floor(-4.5)
        assert_eq!(bonus_for(1), -5);
        assert_eq!(bonus_for(9), -1);
    }

    #[test]
    fn test_half_bonus_floors_negatives() {
        assert_eq!(half_bonus(4), 2);
        assert_eq!(half_bonus(5), 2);
        assert_eq!(half_bonus(-1), -1);
        assert_eq!(half_bonus(-3), -2);
        assert_eq!(half_bonus(0), 0);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(-2.5), -2);
    }

    #[test]
    fn test_percent_helpers() {
        // 10 * 1.10 must be 11, not 12
        assert_eq!(percent_ceil(10, 110), 11);
        assert_eq!(percent_ceil(7, 110), 8);
        assert_eq!(percent_ceil(1, 115), 2);
        assert_eq!(percent_floor(7, 150), 10);
        assert_eq!(percent_floor(5, 100), 5);
    }

    #[test]
    fn test_stat_from_name() {
        assert_eq!(Stat::from_name("AGI"), Some(Stat::Agility));
        assert_eq!(Stat::from_name("Intelligence"), Some(Stat::Intelligence));
        assert_eq!(Stat::from_name("luck"), None);
    }

    #[test]
    fn test_unknown_stat_contributes_zero() {
        let bonuses = StatBonuses::default().with(Stat::Charisma, 3);
        assert_eq!(bonuses.get_by_name("cha"), 3);
        assert_eq!(bonuses.get_by_name("luck"), 0);
    }

    #[test]
    fn test_apply_difficulty_easy() {
        let base = CombatStats { hp: 25, damage: 4, ac: 10 };
        let scaled = apply_difficulty(base, &Difficulty::Easy.boss(), 0);
        // 25 * 0.7 = 17.5 rounds up, 4 * 0.7 = 2.8
        assert_eq!(scaled, CombatStats { hp: 18, damage: 3, ac: 8 });
    }

    #[test]
    fn test_apply_difficulty_clamps() {
        let base = CombatStats { hp: 1, damage: 1, ac: 6 };
        let scaled = apply_difficulty(base, &Difficulty::Easy.boss(), 4);
        assert_eq!(scaled.hp, 1);
        assert_eq!(scaled.damage, 1);
        assert_eq!(scaled.ac, MIN_SCALED_AC);
    }

    #[test]
    fn test_scores_adjust_clamps() {
        let mut scores = StatScores::uniform(19);
        scores.adjust(Stat::Agility, 3);
        assert_eq!(scores.agi, 20);
        scores.adjust(Stat::Stamina, -30);
        assert_eq!(scores.sta, 1);
    }
}
