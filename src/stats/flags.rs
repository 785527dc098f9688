//! Capability flags granted by a character's race passive and class abilities

use serde::{Deserialize, Serialize};

/// Opaque toggles read by the combat formulas
///
/// Engines never derive these from race or class names; callers build them
/// once (see [`effect_flags`](super::effect_flags)) and hand them in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EffectFlags {
    /// +5% XP from games
    pub adaptable: bool,
    /// 10% chance to dodge a runner collision
    pub cache_spirit: bool,
    /// Extra starting health
    pub firewall: bool,
    /// 15% ability cooldown reduction
    pub script_mastery: bool,
    /// Extra starting health
    pub shield_wall: bool,
    /// +15% melee damage in Hack & Slash
    pub power_strike: bool,
    /// +10% XP from games
    pub arcane_knowledge: bool,
    /// Ignore 1 boss AC
    pub penetrating_spell: bool,
    /// +20% double-jump window
    pub quick_reflexes: bool,
    /// +1 movement speed
    pub swift_movement: bool,
    /// Crit on 18-20
    pub precision_strike: bool,
    /// +10% damage against bosses
    pub giant_slayer: bool,
}

impl EffectFlags {
    /// Additive XP multiplier from race and class
    pub fn xp_bonus(&self) -> f64 {
        let mut bonus = 0.0;
        if self.adaptable {
            bonus += 0.05;
        }
        if self.arcane_knowledge {
            bonus += 0.10;
        }
        bonus
    }

    /// Number of health-granting flags (firewall, shield wall)
    pub fn health_flags(&self) -> i32 {
        self.firewall as i32 + self.shield_wall as i32
    }
}

/// XP multiplier `max(0.5, 1 + stat_bonus * 0.05 + race/class bonus)`
///
/// Boss Rush feeds it CHA, the action games feed it WIS.
#[inline]
pub fn xp_multiplier(stat_bonus: i32, flags: &EffectFlags) -> f64 {
    (1.0 + stat_bonus as f64 * 0.05 + flags.xp_bonus()).max(0.5)
}
