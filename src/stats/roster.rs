//! Race and class roster
//!
//! Character creation lives outside the engines. These helpers turn a race
//! and class pick into the score adjustments, capability flags and skill
//! bonuses the engines consume.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{EffectFlags, Stat, StatBonuses, StatScores, MAX_SCORE};
use crate::error::SiteRpgError;

/// Points a human distributes freely at creation
pub const HUMAN_FLEXIBLE_POINTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Race {
    Human,
    Pixelkin,
    Ironforge,
    Arcanet,
    Trickster,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterClass {
    Knight,
    Wizard,
    Scout,
    Bard,
    Ranger,
}

impl Race {
    /// Fixed score modifiers (humans pick theirs instead)
    pub fn stat_modifiers(&self) -> &'static [(Stat, i32)] {
        match self {
            Race::Human => &[],
            Race::Pixelkin => &[(Stat::Agility, 2), (Stat::Intelligence, 1), (Stat::Stamina, -1)],
            Race::Ironforge => &[(Stat::Stamina, 2), (Stat::Strength, 1), (Stat::Agility, -1)],
            Race::Arcanet => &[(Stat::Intelligence, 2), (Stat::Wisdom, 1), (Stat::Strength, -1)],
            Race::Trickster => &[(Stat::Charisma, 2), (Stat::Agility, 1), (Stat::Wisdom, -1)],
        }
    }
}

impl FromStr for Race {
    type Err = SiteRpgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Race::Human),
            "pixelkin" => Ok(Race::Pixelkin),
            "ironforge" => Ok(Race::Ironforge),
            "arcanet" => Ok(Race::Arcanet),
            "trickster" => Ok(Race::Trickster),
            other => Err(SiteRpgError::DeserializationError(format!("unknown race: {}", other))),
        }
    }
}

impl CharacterClass {
    pub fn primary_stats(&self) -> [Stat; 2] {
        match self {
            CharacterClass::Knight => [Stat::Strength, Stat::Stamina],
            CharacterClass::Wizard => [Stat::Intelligence, Stat::Wisdom],
            CharacterClass::Scout => [Stat::Agility, Stat::Intelligence],
            CharacterClass::Bard => [Stat::Charisma, Stat::Wisdom],
            CharacterClass::Ranger => [Stat::Strength, Stat::Agility],
        }
    }
}

impl FromStr for CharacterClass {
    type Err = SiteRpgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "knight" => Ok(CharacterClass::Knight),
            "wizard" => Ok(CharacterClass::Wizard),
            "scout" => Ok(CharacterClass::Scout),
            "bard" => Ok(CharacterClass::Bard),
            "ranger" => Ok(CharacterClass::Ranger),
            other => Err(SiteRpgError::DeserializationError(format!("unknown class: {}", other))),
        }
    }
}

/// Apply race modifiers to rolled scores, clamped to 1..=20
///
/// Humans get [`HUMAN_FLEXIBLE_POINTS`] +1 points on the stats in
/// `human_choices`; extra choices are ignored and other races ignore them.
pub fn apply_race_modifiers(scores: &StatScores, race: Race, human_choices: &[Stat]) -> StatScores {
    let mut adjusted = *scores;
    for &(stat, delta) in race.stat_modifiers() {
        adjusted.adjust(stat, delta);
    }
    if race == Race::Human {
        for &stat in human_choices.iter().take(HUMAN_FLEXIBLE_POINTS) {
            adjusted.adjust(stat, 1);
        }
    }
    adjusted
}

/// +1 to each of the class's primary stats, capped at 20
pub fn apply_class_bonuses(scores: &StatScores, class: CharacterClass) -> StatScores {
    let mut adjusted = *scores;
    for stat in class.primary_stats() {
        let value = (adjusted.get(stat) + 1).min(MAX_SCORE);
        adjusted.set(stat, value);
    }
    adjusted
}

/// Capability flags for a race passive plus class abilities
pub fn effect_flags(race: Race, class: CharacterClass) -> EffectFlags {
    let mut flags = EffectFlags::default();
    match race {
        Race::Human => flags.adaptable = true,
        Race::Pixelkin => flags.cache_spirit = true,
        Race::Ironforge => flags.firewall = true,
        Race::Arcanet => flags.script_mastery = true,
        // social engineering only affects passive site XP
        Race::Trickster => {}
    }
    match class {
        CharacterClass::Knight => {
            flags.shield_wall = true;
            flags.power_strike = true;
        }
        CharacterClass::Wizard => {
            flags.arcane_knowledge = true;
            flags.penetrating_spell = true;
        }
        CharacterClass::Scout => {
            flags.quick_reflexes = true;
            flags.swift_movement = true;
        }
        CharacterClass::Ranger => {
            flags.precision_strike = true;
            flags.giant_slayer = true;
        }
        CharacterClass::Bard => {}
    }
    flags
}

/// Flat skill-check bonuses granted by race and class
pub fn skill_bonuses(race: Race, class: CharacterClass) -> StatBonuses {
    let mut bonuses = StatBonuses::default();
    if race == Race::Trickster {
        bonuses = bonuses.with(Stat::Charisma, 2);
    }
    let (stat, bonus) = match class {
        CharacterClass::Ranger => (Stat::Wisdom, 1),
        CharacterClass::Wizard => (Stat::Intelligence, 1),
        CharacterClass::Scout => (Stat::Agility, 1),
        CharacterClass::Knight => (Stat::Strength, 1),
        CharacterClass::Bard => return bonuses,
    };
    bonuses.with(stat, bonuses.get(stat) + bonus)
}
