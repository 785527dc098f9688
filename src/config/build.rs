//! Character build handed to every engine at start

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::Difficulty;
use crate::dice::DiceSpec;
use crate::error::SiteRpgError;
use crate::stats::{
    effect_flags, skill_bonuses, CharacterClass, EffectFlags, Race, StatBonuses, StatScores,
};

/// Boss Rush combat class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombatClass {
    #[default]
    Warrior,
    Mage,
    Rogue,
}

/// Base numbers of a combat class before stat bonuses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassProfile {
    pub name: &'static str,
    pub attack_bonus: i32,
    pub damage: DiceSpec,
    pub hp: i32,
    pub ac: i32,
    /// Lowest natural roll that crits
    pub crit_threshold: u32,
    /// Extra crit damage in percent, applied before the crit doubling
    pub crit_bonus_pct: u32,
    /// Boss AC ignored by every attack
    pub ac_ignore: i32,
}

impl CombatClass {
    pub fn profile(&self) -> ClassProfile {
        match self {
            CombatClass::Warrior => ClassProfile {
                name: "Warrior",
                attack_bonus: 2,
                damage: DiceSpec::new(1, 10),
                hp: 22,
                ac: 15,
                crit_threshold: 20,
                crit_bonus_pct: 150,
                ac_ignore: 0,
            },
            CombatClass::Mage => ClassProfile {
                name: "Mage",
                attack_bonus: 0,
                damage: DiceSpec::new(2, 6),
                hp: 14,
                ac: 11,
                crit_threshold: 20,
                crit_bonus_pct: 100,
                ac_ignore: 2,
            },
            CombatClass::Rogue => ClassProfile {
                name: "Rogue",
                attack_bonus: 3,
                damage: DiceSpec::new(1, 6),
                hp: 16,
                ac: 13,
                crit_threshold: 19,
                crit_bonus_pct: 100,
                ac_ignore: 0,
            },
        }
    }
}

impl FromStr for CombatClass {
    type Err = SiteRpgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warrior" => Ok(CombatClass::Warrior),
            "mage" => Ok(CombatClass::Mage),
            "rogue" => Ok(CombatClass::Rogue),
            _ => Err(SiteRpgError::UnknownCombatClass(s.to_string())),
        }
    }
}

/// Immutable character build
///
/// Supplied once per session; engines never read ambient state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CharacterBuild {
    pub bonuses: StatBonuses,
    pub effects: EffectFlags,
    /// Flat race/class bonuses added to skill checks
    pub skill_bonuses: StatBonuses,
    pub difficulty: Difficulty,
    pub combat_class: CombatClass,
}

impl CharacterBuild {
    pub fn new(bonuses: StatBonuses, effects: EffectFlags) -> Self {
        Self {
            bonuses,
            effects,
            ..Self::default()
        }
    }

    /// Build from final ability scores and a race/class pick
    pub fn from_character(scores: &StatScores, race: Race, class: CharacterClass) -> Self {
        Self {
            bonuses: scores.bonuses(),
            effects: effect_flags(race, class),
            skill_bonuses: skill_bonuses(race, class),
            ..Self::default()
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_class(mut self, combat_class: CombatClass) -> Self {
        self.combat_class = combat_class;
        self
    }

    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
