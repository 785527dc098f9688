//! Difficulty presets for each game family

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SiteRpgError;

/// Chance per boss turn that the boss uses an ability
pub const DEFAULT_ABILITY_CHANCE: f64 = 0.4;
/// Combat log lines kept per encounter
pub const DEFAULT_LOG_CAPACITY: usize = 50;

/// Session difficulty, fixed at game start
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Boss Rush scaling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossDifficulty {
    pub hp_mult: f64,
    pub damage_mult: f64,
    pub ac_mod: i32,
    pub ability_chance: f64,
}

/// Hack & Slash and Runner scaling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcadeDifficulty {
    pub enemy_speed_mult: f64,
    pub enemy_hp_mult: f64,
    pub spawn_rate_mult: f64,
    pub player_health: i32,
}

/// Text Quest scaling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestDifficulty {
    pub health_bonus: i32,
    pub dc_mod: i32,
    pub xp_mult: f64,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn boss(&self) -> BossDifficulty {
        match self {
            Difficulty::Easy => BossDifficulty {
                hp_mult: 0.7,
                damage_mult: 0.7,
                ac_mod: -2,
                ability_chance: 0.2,
            },
            Difficulty::Normal => BossDifficulty {
                hp_mult: 1.0,
                damage_mult: 1.0,
                ac_mod: 0,
                ability_chance: 0.35,
            },
            Difficulty::Hard => BossDifficulty {
                hp_mult: 1.3,
                damage_mult: 1.3,
                ac_mod: 2,
                ability_chance: 0.5,
            },
        }
    }

    pub fn arcade(&self) -> ArcadeDifficulty {
        match self {
            Difficulty::Easy => ArcadeDifficulty {
                enemy_speed_mult: 0.7,
                enemy_hp_mult: 0.8,
                spawn_rate_mult: 1.3,
                player_health: 5,
            },
            Difficulty::Normal => ArcadeDifficulty {
                enemy_speed_mult: 1.0,
                enemy_hp_mult: 1.0,
                spawn_rate_mult: 1.0,
                player_health: 3,
            },
            Difficulty::Hard => ArcadeDifficulty {
                enemy_speed_mult: 1.3,
                enemy_hp_mult: 1.2,
                spawn_rate_mult: 0.7,
                player_health: 2,
            },
        }
    }

    pub fn quest(&self) -> QuestDifficulty {
        match self {
            Difficulty::Easy => QuestDifficulty {
                health_bonus: 2,
                dc_mod: -2,
                xp_mult: 0.8,
            },
            Difficulty::Normal => QuestDifficulty {
                health_bonus: 0,
                dc_mod: 0,
                xp_mult: 1.0,
            },
            Difficulty::Hard => QuestDifficulty {
                health_bonus: -1,
                dc_mod: 2,
                xp_mult: 1.3,
            },
        }
    }
}

impl FromStr for Difficulty {
    type Err = SiteRpgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(SiteRpgError::UnknownDifficulty(s.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boss Rush turn-loop knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EncounterRules {
    pub ability_chance: f64,
    pub log_capacity: usize,
}

impl Default for EncounterRules {
    fn default() -> Self {
        Self {
            ability_chance: DEFAULT_ABILITY_CHANCE,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

impl EncounterRules {
    /// Use the difficulty's ability chance instead of the fixed default
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            ability_chance: difficulty.boss().ability_chance,
            ..Self::default()
        }
    }
}
