//! Per-combatant effect list with tick and decay

use smallvec::SmallVec;

use super::{DebuffStat, EffectKind, EffectType, LockedAction, StatusEffect};

/// Active effects on one combatant
///
/// Duplicates coexist: applying the same effect twice yields two entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectList {
    effects: SmallVec<[StatusEffect; 4]>,
}

impl EffectList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an effect. Zero-duration effects are dropped immediately and
    /// `false` is returned.
    pub fn apply(&mut self, effect: StatusEffect) -> bool {
        if effect.is_expired() {
            return false;
        }
        self.effects.push(effect);
        true
    }

    /// Decrement every effect by one turn and remove the ones that reach 0,
    /// calling `on_expire` for each removed effect in attachment order.
    pub fn tick_post_turn<F>(&mut self, mut on_expire: F)
    where
        F: FnMut(&StatusEffect),
    {
        for effect in self.effects.iter_mut() {
            effect.remaining = effect.remaining.saturating_sub(1);
        }
        for effect in self.effects.iter().filter(|e| e.is_expired()) {
            on_expire(effect);
        }
        self.effects.retain(|e| !e.is_expired());
    }

    /// Effects of one type
    pub fn collect(&self, effect_type: EffectType) -> impl Iterator<Item = &StatusEffect> + '_ {
        self.effects
            .iter()
            .filter(move |e| e.effect_type() == effect_type)
    }

    /// Subtract every active DoT from `hp`, reporting each tick
    ///
    /// Runs before the duration tick, so a DoT on its last turn still hits.
    /// Returns the total damage dealt.
    pub fn apply_damage_over_time<F>(&self, hp: &mut i32, mut on_tick: F) -> i32
    where
        F: FnMut(&StatusEffect, i32),
    {
        let mut total = 0;
        for effect in self.effects.iter().filter(|e| e.remaining > 0) {
            if let EffectKind::Dot { damage } = effect.kind {
                *hp -= damage;
                total += damage;
                on_tick(effect, damage);
            }
        }
        total
    }

    pub fn has(&self, effect_type: EffectType) -> bool {
        self.collect(effect_type).next().is_some()
    }

    pub fn is_stunned(&self) -> bool {
        self.has(EffectType::Stun)
    }

    pub fn is_locked(&self, action: LockedAction) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e.kind, EffectKind::LockAction { action: locked } if locked == action))
    }

    /// Highest active phase miss chance, if any
    pub fn phase_miss_chance(&self) -> Option<u32> {
        self.effects
            .iter()
            .filter_map(|e| match e.kind {
                EffectKind::Phase { miss_chance } => Some(miss_chance),
                _ => None,
            })
            .max()
    }

    /// Sum of all debuffs on `stat`
    pub fn debuff_total(&self, stat: DebuffStat) -> i32 {
        self.effects
            .iter()
            .filter_map(|e| match e.kind {
                EffectKind::Debuff { stat: s, amount } if s == stat => Some(amount),
                _ => None,
            })
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> + '_ {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}
