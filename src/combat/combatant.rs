//! Player and boss combatants for one encounter

use super::{BossAbility, BossTemplate};
use crate::config::{BossDifficulty, CharacterBuild, ClassProfile};
use crate::dice::DiceSpec;
use crate::stats::{half_bonus, Stat};
use crate::status::{EffectList, LockedAction};

/// Minimum player hit points after all adjustments
pub const MIN_PLAYER_HP: i32 = 5;
/// Base AC bonus while defending
pub const DEFEND_BASE_BONUS: i32 = 4;
/// HP granted per health flag (firewall, shield wall)
pub const HEALTH_FLAG_HP: i32 = 2;

/// State shared by both sides of a fight
#[derive(Debug, Clone, PartialEq)]
pub struct Combatant {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub armor_class: i32,
    pub attack_bonus: i32,
    pub damage: DiceSpec,
    pub effects: EffectList,
}

impl Combatant {
    pub fn new(name: impl Into<String>, hp: i32, armor_class: i32, attack_bonus: i32, damage: DiceSpec) -> Self {
        Self {
            name: name.into(),
            hp,
            max_hp: hp,
            armor_class,
            attack_bonus,
            damage,
            effects: EffectList::new(),
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.hp -= amount;
    }

    /// Heal up to max HP, returning the amount actually healed
    pub fn heal(&mut self, amount: i32) -> i32 {
        let healed = amount.min(self.max_hp - self.hp).max(0);
        self.hp += healed;
        healed
    }
}

/// The player side, derived once from the build
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub combatant: Combatant,
    pub crit_threshold: u32,
    pub crit_bonus_pct: u32,
    /// Temporary AC granted by defending
    pub defend_bonus: i32,
    pub is_defending: bool,
    pub temp_ac: i32,
}

impl Player {
    pub fn from_build(build: &CharacterBuild) -> Self {
        let profile: ClassProfile = build.combat_class.profile();
        let bonuses = &build.bonuses;
        let effects = &build.effects;

        let attack_bonus = profile.attack_bonus + bonuses.half(Stat::Wisdom);
        let hp = (profile.hp + bonuses.sta + HEALTH_FLAG_HP * effects.health_flags()).max(MIN_PLAYER_HP);
        let armor_class = profile.ac + bonuses.half(Stat::Agility);
        let defend_bonus = DEFEND_BASE_BONUS + bonuses.half(Stat::Agility).max(0);

        let crit_threshold = if effects.precision_strike {
            profile.crit_threshold.min(18)
        } else {
            profile.crit_threshold
        };

        Self {
            combatant: Combatant::new(profile.name, hp, armor_class, attack_bonus, profile.damage),
            crit_threshold,
            crit_bonus_pct: profile.crit_bonus_pct,
            defend_bonus,
            is_defending: false,
            temp_ac: 0,
        }
    }

    #[inline]
    pub fn effective_ac(&self) -> i32 {
        self.combatant.armor_class + self.temp_ac
    }

    pub fn start_defending(&mut self) {
        self.is_defending = true;
        self.temp_ac = self.defend_bonus;
    }

    pub fn stop_defending(&mut self) {
        self.is_defending = false;
        self.temp_ac = 0;
    }

    /// Halve (floor, min 1) damage taken while defending
    #[inline]
    pub fn mitigate(&self, damage: i32) -> i32 {
        if self.is_defending {
            (damage / 2).max(1)
        } else {
            damage
        }
    }

    pub fn is_stunned(&self) -> bool {
        self.combatant.effects.is_stunned()
    }

    pub fn is_locked(&self, action: LockedAction) -> bool {
        self.combatant.effects.is_locked(action)
    }
}

/// Armor penetration from INT and the penetrating spell flag, plus the
/// class's AC ignore
pub fn ac_reduction(build: &CharacterBuild) -> i32 {
    half_bonus(build.bonuses.int)
        + build.effects.penetrating_spell as i32
        + build.combat_class.profile().ac_ignore
}

/// A spawned, difficulty-scaled boss
#[derive(Debug, Clone, PartialEq)]
pub struct Boss {
    pub combatant: Combatant,
    /// Position in the roster
    pub index: usize,
    pub abilities: Vec<BossAbility>,
}

impl Boss {
    pub fn spawn(template: &BossTemplate, index: usize, difficulty: &BossDifficulty, ac_reduction: i32) -> Self {
        let stats = template.scaled(difficulty, ac_reduction);
        Self {
            combatant: Combatant::new(
                template.name.clone(),
                stats.hp,
                stats.ac,
                template.attack_bonus,
                DiceSpec::new(1, stats.damage as u32),
            ),
            index,
            abilities: template.abilities.clone(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.combatant.name
    }
}
