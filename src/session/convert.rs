//! Engine results to Python dicts

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::arcade::ArcadeEvent;
use crate::combat::{CombatEvent, SimulationReport, TurnAction, TurnResult};
use crate::outcome::EncounterEnd;
use crate::quest::{Choice, ChoiceOutcome};
use crate::skill::SkillCheckResult;

pub fn encounter_end_to_dict<'py>(py: Python<'py>, end: &EncounterEnd) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("outcome", end.outcome.as_str())?;
    dict.set_item("total_xp", end.total_xp)?;
    dict.set_item("enemies_defeated", end.enemies_defeated)?;
    Ok(dict)
}

fn combat_event_to_dict<'py>(py: Python<'py>, event: &CombatEvent) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    match event {
        CombatEvent::Phased => {
            dict.set_item("event", "phased")?;
        }
        CombatEvent::EffectApplied { target, name } => {
            dict.set_item("event", "effect_applied")?;
            dict.set_item("target", target.as_str())?;
            dict.set_item("name", name)?;
        }
        CombatEvent::EffectExpired { target, name } => {
            dict.set_item("event", "effect_expired")?;
            dict.set_item("target", target.as_str())?;
            dict.set_item("name", name)?;
        }
        CombatEvent::DamageOverTime { name, damage } => {
            dict.set_item("event", "damage_over_time")?;
            dict.set_item("name", name)?;
            dict.set_item("damage", *damage)?;
        }
        CombatEvent::BossHealed { amount } => {
            dict.set_item("event", "boss_healed")?;
            dict.set_item("amount", *amount)?;
        }
        CombatEvent::BossDefeated { index, name, xp } => {
            dict.set_item("event", "boss_defeated")?;
            dict.set_item("index", *index)?;
            dict.set_item("name", name)?;
            dict.set_item("xp", *xp)?;
        }
        CombatEvent::BossSpawned { index, name } => {
            dict.set_item("event", "boss_spawned")?;
            dict.set_item("index", *index)?;
            dict.set_item("name", name)?;
        }
        CombatEvent::PlayerDefeated => {
            dict.set_item("event", "player_defeated")?;
        }
        CombatEvent::Victory => {
            dict.set_item("event", "victory")?;
        }
    }
    Ok(dict)
}

pub fn turn_result_to_dict<'py>(py: Python<'py>, turn: &TurnResult) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    match &turn.action {
        TurnAction::Attack => dict.set_item("action", "attack")?,
        TurnAction::Defend => dict.set_item("action", "defend")?,
        TurnAction::Pass => dict.set_item("action", "pass")?,
        TurnAction::BossAttack => dict.set_item("action", "boss_attack")?,
        TurnAction::BossAbility { name } => {
            dict.set_item("action", "boss_ability")?;
            dict.set_item("ability", name)?;
        }
    }
    dict.set_item("roll", turn.roll)?;
    dict.set_item("modifier", turn.modifier)?;
    dict.set_item("total", turn.total)?;
    dict.set_item("hit", turn.hit)?;
    dict.set_item("critical", turn.critical)?;
    dict.set_item("damage_dealt", turn.damage_dealt)?;
    dict.set_item("dot_damage", turn.dot_damage)?;
    dict.set_item("log_lines", &turn.log_lines)?;

    let events = PyList::empty(py);
    for event in &turn.events {
        events.append(combat_event_to_dict(py, event)?)?;
    }
    dict.set_item("events", events)?;

    let phases: Vec<&str> = turn.phases.iter().map(|p| p.as_str()).collect();
    dict.set_item("phases", phases)?;
    dict.set_item("new_state", turn.new_state.as_str())?;
    Ok(dict)
}

pub fn skill_check_to_dict<'py>(py: Python<'py>, result: &SkillCheckResult) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("roll", result.roll)?;
    dict.set_item("modifier", result.modifier)?;
    dict.set_item("total", result.total)?;
    dict.set_item("dc", result.dc)?;
    dict.set_item("outcome", result.outcome.as_str())?;
    dict.set_item("success", result.outcome.is_success())?;
    dict.set_item("next_scene", &result.next_scene)?;
    dict.set_item("text", result.to_string())?;
    Ok(dict)
}

pub fn choice_outcome_to_dict<'py>(py: Python<'py>, outcome: &ChoiceOutcome) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    match &outcome.skill_check_result {
        Some(result) => dict.set_item("skill_check", skill_check_to_dict(py, result)?)?,
        None => dict.set_item("skill_check", py.None())?,
    }
    dict.set_item("new_scene", &outcome.new_scene)?;
    dict.set_item("log_lines", &outcome.log_lines)?;
    dict.set_item("xp_gained", outcome.xp_gained)?;
    dict.set_item("state", outcome.state.as_str())?;
    Ok(dict)
}

pub fn choice_to_dict<'py>(py: Python<'py>, index: usize, choice: &Choice) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("index", index)?;
    dict.set_item("text", &choice.text)?;
    match &choice.skill_check {
        Some(check) => {
            dict.set_item("stat", &check.stat)?;
            dict.set_item("dc", check.dc)?;
        }
        None => {
            dict.set_item("stat", py.None())?;
            dict.set_item("dc", py.None())?;
        }
    }
    Ok(dict)
}

pub fn arcade_event_to_dict<'py>(py: Python<'py>, event: &ArcadeEvent) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    match event {
        ArcadeEvent::WaveStarted { wave, enemies } => {
            dict.set_item("event", "wave_started")?;
            dict.set_item("wave", *wave)?;
            dict.set_item("enemies", *enemies)?;
        }
        ArcadeEvent::EnemySpawned { kind } => {
            dict.set_item("event", "enemy_spawned")?;
            dict.set_item("kind", *kind)?;
        }
        ArcadeEvent::EnemyHit { kind, damage } => {
            dict.set_item("event", "enemy_hit")?;
            dict.set_item("kind", *kind)?;
            dict.set_item("damage", *damage)?;
        }
        ArcadeEvent::EnemyKilled { kind, xp } => {
            dict.set_item("event", "enemy_killed")?;
            dict.set_item("kind", *kind)?;
            dict.set_item("xp", *xp)?;
        }
        ArcadeEvent::EnemyEscaped { kind } => {
            dict.set_item("event", "enemy_escaped")?;
            dict.set_item("kind", *kind)?;
        }
        ArcadeEvent::PlayerHit { health } => {
            dict.set_item("event", "player_hit")?;
            dict.set_item("health", *health)?;
        }
        ArcadeEvent::WaveCleared { wave, bonus } => {
            dict.set_item("event", "wave_cleared")?;
            dict.set_item("wave", *wave)?;
            dict.set_item("bonus", *bonus)?;
        }
        ArcadeEvent::Collected { points } => {
            dict.set_item("event", "collected")?;
            dict.set_item("points", *points)?;
        }
        ArcadeEvent::ShieldAbsorbed { remaining } => {
            dict.set_item("event", "shield_absorbed")?;
            dict.set_item("remaining", *remaining)?;
        }
        ArcadeEvent::Dodged => {
            dict.set_item("event", "dodged")?;
        }
        ArcadeEvent::GameOver { outcome } => {
            dict.set_item("event", "game_over")?;
            dict.set_item("outcome", outcome.as_str())?;
        }
    }
    Ok(dict)
}

pub fn report_to_dict<'py>(py: Python<'py>, report: &SimulationReport) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("runs", report.runs)?;
    dict.set_item("victories", report.victories)?;
    dict.set_item("win_rate", report.win_rate)?;
    dict.set_item("mean_xp", report.mean_xp)?;
    dict.set_item("mean_bosses_defeated", report.mean_bosses_defeated)?;
    dict.set_item("mean_rounds", report.mean_rounds)?;
    Ok(dict)
}
