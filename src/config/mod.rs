//! Configuration: difficulty tables, character builds and cached content
//!
//! Also converts builds handed over from Python (dicts or attribute objects).

mod build;
mod content;
mod difficulty;

pub use build::*;
pub use content::*;
pub use difficulty::*;

use crate::stats::{EffectFlags, StatBonuses};
use pyo3::types::{PyAnyMethods, PyDict, PyDictMethods};
use pyo3::Bound;

/// Helper to get optional attribute from either dict or object
fn get_attr_opt<'py>(obj: &Bound<'py, pyo3::PyAny>, name: &str) -> Option<Bound<'py, pyo3::PyAny>> {
    let value = if let Ok(dict) = obj.downcast::<PyDict>() {
        dict.get_item(name).ok().flatten()
    } else {
        obj.getattr(name).ok()
    };
    value.filter(|v| !v.is_none())
}

/// First present attribute among snake_case and camelCase spellings
fn get_attr_any<'py>(obj: &Bound<'py, pyo3::PyAny>, names: &[&str]) -> Option<Bound<'py, pyo3::PyAny>> {
    names.iter().find_map(|name| get_attr_opt(obj, name))
}

fn extract_i32(obj: &Bound<'_, pyo3::PyAny>, names: &[&str]) -> pyo3::PyResult<i32> {
    match get_attr_any(obj, names) {
        Some(value) => value.extract(),
        None => Ok(0),
    }
}

fn extract_flag(obj: &Bound<'_, pyo3::PyAny>, names: &[&str]) -> pyo3::PyResult<bool> {
    match get_attr_any(obj, names) {
        Some(value) => value.is_truthy(),
        None => Ok(false),
    }
}

/// Read `{str, wis, cha, sta, agi, int}`; missing keys are 0
pub fn extract_stat_bonuses(obj: &Bound<'_, pyo3::PyAny>) -> pyo3::PyResult<StatBonuses> {
    Ok(StatBonuses {
        str_: extract_i32(obj, &["str", "STR"])?,
        wis: extract_i32(obj, &["wis", "WIS"])?,
        cha: extract_i32(obj, &["cha", "CHA"])?,
        sta: extract_i32(obj, &["sta", "STA"])?,
        agi: extract_i32(obj, &["agi", "AGI"])?,
        int: extract_i32(obj, &["int", "INT"])?,
    })
}

/// Read the effect toggles; missing keys are off
pub fn extract_effect_flags(obj: &Bound<'_, pyo3::PyAny>) -> pyo3::PyResult<EffectFlags> {
    Ok(EffectFlags {
        adaptable: extract_flag(obj, &["adaptable"])?,
        cache_spirit: extract_flag(obj, &["cache_spirit", "cacheSpirit"])?,
        firewall: extract_flag(obj, &["firewall"])?,
        script_mastery: extract_flag(obj, &["script_mastery", "scriptMastery"])?,
        shield_wall: extract_flag(obj, &["shield_wall", "shieldWall"])?,
        power_strike: extract_flag(obj, &["power_strike", "powerStrike"])?,
        arcane_knowledge: extract_flag(obj, &["arcane_knowledge", "arcaneKnowledge"])?,
        penetrating_spell: extract_flag(obj, &["penetrating_spell", "penetratingSpell"])?,
        quick_reflexes: extract_flag(obj, &["quick_reflexes", "quickReflexes"])?,
        swift_movement: extract_flag(obj, &["swift_movement", "swiftMovement"])?,
        precision_strike: extract_flag(obj, &["precision_strike", "precisionStrike"])?,
        giant_slayer: extract_flag(obj, &["giant_slayer", "giantSlayer"])?,
    })
}

/// Build a [`CharacterBuild`] from a Python dict or object
///
/// Expected shape:
/// `{"bonuses": {...}, "effects": {...}, "skill_bonuses": {...},
///   "difficulty": "normal", "combat_class": "warrior"}`.
/// Every key is optional.
pub fn extract_build(obj: &Bound<'_, pyo3::PyAny>) -> pyo3::PyResult<CharacterBuild> {
    let mut build = CharacterBuild::default();

    if let Some(bonuses) = get_attr_opt(obj, "bonuses") {
        build.bonuses = extract_stat_bonuses(&bonuses)?;
    }
    if let Some(effects) = get_attr_opt(obj, "effects") {
        build.effects = extract_effect_flags(&effects)?;
    }
    if let Some(skill) = get_attr_any(obj, &["skill_bonuses", "skillBonuses"]) {
        build.skill_bonuses = extract_stat_bonuses(&skill)?;
    }
    if let Some(difficulty) = get_attr_opt(obj, "difficulty") {
        let name: String = difficulty.extract()?;
        build.difficulty = name.parse::<Difficulty>()?;
    }
    if let Some(class) = get_attr_any(obj, &["combat_class", "combatClass"]) {
        let name: String = class.extract()?;
        build.combat_class = name.parse::<CombatClass>()?;
    }

    tracing::debug!(
        difficulty = build.difficulty.as_str(),
        class = ?build.combat_class,
        "build extracted"
    );
    Ok(build)
}

