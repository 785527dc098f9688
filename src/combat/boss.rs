//! Boss templates, abilities and the default roster

use serde::{Deserialize, Serialize};

use crate::config::BossDifficulty;
use crate::error::{Result, SiteRpgError};
use crate::stats::{apply_difficulty, CombatStats};
use crate::status::{DebuffStat, LockedAction};

fn default_attacks() -> u32 {
    2
}

fn default_damage_mod() -> f64 {
    0.5
}

fn default_heavy_mult() -> f64 {
    1.5
}

fn default_phase_duration() -> u32 {
    2
}

/// What a boss ability does
///
/// Unrecognised `type` tags deserialize to [`AbilityKind::Unknown`], which
/// the engine resolves as a normal attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AbilityKind {
    /// Several rolled attacks at reduced damage
    #[serde(rename_all = "camelCase")]
    MultiAttack {
        #[serde(default = "default_attacks")]
        attacks: u32,
        #[serde(default = "default_damage_mod")]
        damage_mod: f64,
    },
    Debuff {
        stat: DebuffStat,
        value: i32,
        duration: u32,
    },
    /// Miss chance (percent) on the player's next hits, applied to the boss
    #[serde(rename_all = "camelCase")]
    Phase {
        miss_chance: u32,
        #[serde(default = "default_phase_duration")]
        duration: u32,
    },
    /// Auto-hit, no roll
    #[serde(rename = "ignoreAC")]
    IgnoreAc,
    Heal {
        amount: i32,
    },
    Stun {
        duration: u32,
    },
    Dot {
        damage: i32,
        duration: u32,
    },
    LockAction {
        action: LockedAction,
        duration: u32,
    },
    #[serde(rename_all = "camelCase")]
    HeavyAttack {
        #[serde(default = "default_heavy_mult")]
        damage_mult: f64,
    },
    #[serde(other)]
    Unknown,
}

/// A named ability on a boss template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossAbility {
    pub name: String,
    #[serde(flatten)]
    pub kind: AbilityKind,
}

impl BossAbility {
    pub fn new(name: impl Into<String>, kind: AbilityKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Static boss definition, scaled once per spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossTemplate {
    pub name: String,
    pub base_ac: i32,
    pub base_hp: i32,
    /// Size of the boss's damage die
    pub base_damage: i32,
    pub attack_bonus: i32,
    #[serde(default)]
    pub abilities: Vec<BossAbility>,
}

impl BossTemplate {
    pub fn scaled(&self, difficulty: &BossDifficulty, ac_reduction: i32) -> CombatStats {
        apply_difficulty(
            CombatStats {
                hp: self.base_hp,
                damage: self.base_damage,
                ac: self.base_ac,
            },
            difficulty,
            ac_reduction,
        )
    }
}

/// Parse a roster from JSON (a list of templates)
pub fn roster_from_json(json: &str) -> Result<Vec<BossTemplate>> {
    let roster: Vec<BossTemplate> = serde_json::from_str(json)?;
    if roster.is_empty() {
        return Err(SiteRpgError::EmptyRoster);
    }
    Ok(roster)
}

/// The five Boss Rush bosses, weakest first
///
/// Phase Shift and Lag Spike last two turns so they outlive the post-turn
/// tick of the boss turn that applies them.
pub fn default_roster() -> Vec<BossTemplate> {
    vec![
        BossTemplate {
            name: "Spam Golem".to_string(),
            base_ac: 10,
            base_hp: 25,
            base_damage: 4,
            attack_bonus: 2,
            abilities: vec![
                BossAbility::new(
                    "Spam Barrage",
                    AbilityKind::MultiAttack { attacks: 2, damage_mod: 0.5 },
                ),
                BossAbility::new(
                    "Email Flood",
                    AbilityKind::Debuff { stat: DebuffStat::Accuracy, value: -2, duration: 2 },
                ),
            ],
        },
        BossTemplate {
            name: "404 Wraith".to_string(),
            base_ac: 12,
            base_hp: 30,
            base_damage: 5,
            attack_bonus: 3,
            abilities: vec![
                BossAbility::new("Phase Shift", AbilityKind::Phase { miss_chance: 50, duration: 2 }),
                BossAbility::new("Ghost Touch", AbilityKind::IgnoreAc),
            ],
        },
        BossTemplate {
            name: "Slow Load Snail".to_string(),
            base_ac: 8,
            base_hp: 40,
            base_damage: 3,
            attack_bonus: 1,
            abilities: vec![
                BossAbility::new("Buffer Overflow", AbilityKind::Heal { amount: 10 }),
                BossAbility::new("Lag Spike", AbilityKind::Stun { duration: 2 }),
            ],
        },
        BossTemplate {
            name: "Malware Dragon".to_string(),
            base_ac: 14,
            base_hp: 45,
            base_damage: 7,
            attack_bonus: 4,
            abilities: vec![
                BossAbility::new("Virus Injection", AbilityKind::Dot { damage: 3, duration: 3 }),
                BossAbility::new(
                    "Ransomware",
                    AbilityKind::LockAction { action: LockedAction::Defend, duration: 2 },
                ),
            ],
        },
        BossTemplate {
            name: "DDoS Titan".to_string(),
            base_ac: 16,
            base_hp: 60,
            base_damage: 10,
            attack_bonus: 5,
            abilities: vec![
                BossAbility::new("Server Overload", AbilityKind::HeavyAttack { damage_mult: 1.5 }),
                BossAbility::new(
                    "Bandwidth Drain",
                    AbilityKind::Debuff { stat: DebuffStat::Damage, value: -2, duration: 2 },
                ),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;

    #[test]
    fn test_default_roster_order() {
        let roster = default_roster();
        let names: Vec<&str> = roster.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Spam Golem", "404 Wraith", "Slow Load Snail", "Malware Dragon", "DDoS Titan"]
        );
        assert!(roster.iter().all(|b| b.abilities.len() == 2));
    }

    #[test]
    fn test_scaling_hard_with_penetration() {
        let titan = &default_roster()[4];
        let stats = titan.scaled(&Difficulty::Hard.boss(), 3);
        assert_eq!(stats.hp, 78);
        assert_eq!(stats.damage, 13);
        assert_eq!(stats.ac, 15);
    }

    #[test]
    fn test_ability_json_uses_type_tag() {
        let ability: BossAbility = serde_json::from_str(
            r#"{"name": "Spam Barrage", "type": "multiAttack", "attacks": 3, "damageMod": 0.25}"#,
        )
        .unwrap();
        assert_eq!(ability.kind, AbilityKind::MultiAttack { attacks: 3, damage_mod: 0.25 });

        let ghost: BossAbility =
            serde_json::from_str(r#"{"name": "Ghost Touch", "type": "ignoreAC"}"#).unwrap();
        assert_eq!(ghost.kind, AbilityKind::IgnoreAc);
    }

    #[test]
    fn test_phase_duration_defaults() {
        let phase: BossAbility =
            serde_json::from_str(r#"{"name": "Phase Shift", "type": "phase", "missChance": 50}"#)
                .unwrap();
        assert_eq!(phase.kind, AbilityKind::Phase { miss_chance: 50, duration: 2 });
    }

    #[test]
    fn test_unknown_ability_type() {
        let ability: BossAbility =
            serde_json::from_str(r#"{"name": "Blue Screen", "type": "crash"}"#).unwrap();
        assert_eq!(ability.kind, AbilityKind::Unknown);
    }

    #[test]
    fn test_roster_from_json() {
        let json = r#"[{"name": "Test Boss", "baseAc": 11, "baseHp": 20, "baseDamage": 4, "attackBonus": 1}]"#;
        let roster = roster_from_json(json).unwrap();
        assert_eq!(roster[0].base_ac, 11);
        assert!(roster[0].abilities.is_empty());
        assert!(matches!(
            roster_from_json("[]"),
            Err(SiteRpgError::EmptyRoster)
        ));
    }
}
