//! Status effect variants

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a debuff lowers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebuffStat {
    /// Added to the player's attack total
    Accuracy,
    /// Added to the player's damage before multipliers
    Damage,
}

/// Player action that a lock can disable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockedAction {
    Attack,
    Defend,
}

/// Discriminant of [`EffectKind`], used for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectType {
    Debuff,
    Dot,
    Stun,
    LockAction,
    Phase,
}

/// Effect payload
#[derive(Debug, Clone, PartialEq)]
pub enum EffectKind {
    Debuff { stat: DebuffStat, amount: i32 },
    Dot { damage: i32 },
    Stun,
    LockAction { action: LockedAction },
    /// Percent chance that an otherwise-successful hit misses
    Phase { miss_chance: u32 },
}

impl EffectKind {
    pub fn effect_type(&self) -> EffectType {
        match self {
            EffectKind::Debuff { .. } => EffectType::Debuff,
            EffectKind::Dot { .. } => EffectType::Dot,
            EffectKind::Stun => EffectType::Stun,
            EffectKind::LockAction { .. } => EffectType::LockAction,
            EffectKind::Phase { .. } => EffectType::Phase,
        }
    }
}

/// A timed effect owned by one combatant
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEffect {
    pub name: String,
    pub kind: EffectKind,
    /// Turns remaining; the tracker never holds an effect at 0
    pub remaining: u32,
}

impl StatusEffect {
    pub fn new(name: impl Into<String>, kind: EffectKind, duration: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            remaining: duration,
        }
    }

    #[inline]
    pub fn effect_type(&self) -> EffectType {
        self.kind.effect_type()
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }
}

impl fmt::Display for StatusEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} turn", self.name, self.remaining)?;
        if self.remaining != 1 {
            f.write_str("s")?;
        }
        f.write_str(")")
    }
}
