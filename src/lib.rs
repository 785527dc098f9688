//! Site RPG Core - combat and skill-check engine for the site RPG mini-games
//!
//! This crate provides the Boss Rush turn engine, the Text Quest scene
//! engine and the frame-stepped action games, with Python bindings via PyO3.

use pyo3::prelude::*;

pub mod arcade;
pub mod combat;
pub mod config;
pub mod dice;
pub mod error;
pub mod logging;
pub mod outcome;
pub mod quest;
pub mod session;
pub mod skill;
pub mod stats;
pub mod status;

use crate::arcade::{HackSlash, Runner};
use crate::combat::{simulate_boss_rush as run_simulation, AutoplayPolicy, BossRush, BossTemplate, SimulationReport};
use crate::config::{extract_build, CharacterBuild, EncounterRules};
use crate::dice::GameRng;
use crate::logging::{init_tracing, LogLevel, TracingConfig};
use crate::quest::QuestEngine;
use crate::session::{report_to_dict, ArcadeSession, EncounterSession, QuestSession};
use pyo3::types::PyDict;
use std::sync::Arc;

// ============================================================================
// Helper Functions
// ============================================================================

/// Cached roster, or the built-in one when content was never initialized
fn current_roster() -> Arc<Vec<BossTemplate>> {
    config::roster().unwrap_or_else(|_| Arc::new(combat::default_roster()))
}

fn simulate(build: &CharacterBuild, roster: &[BossTemplate], runs: u32, seed: Option<u64>) -> error::Result<SimulationReport> {
    let seed = seed.unwrap_or_else(rand::random);
    run_simulation(
        build,
        roster,
        EncounterRules::default(),
        runs,
        seed,
        &AutoplayPolicy::default(),
    )
}

// ============================================================================
// Python Functions
// ============================================================================

/// Install the tracing subscriber (first call wins)
///
/// # Arguments
/// * `level` - Optional global level ("trace" .. "error"); per-module
///   defaults are used when omitted
#[pyfunction]
#[pyo3(signature = (level=None))]
fn init_logging(level: Option<&str>) -> PyResult<()> {
    let config = match level {
        Some(name) => TracingConfig::with_level(name.parse::<LogLevel>()?),
        None => TracingConfig::default(),
    };
    init_tracing(&config);
    Ok(())
}

/// Load adventures and the boss roster (call once at startup)
///
/// # Arguments
/// * `adventures_json` - Optional JSON list of adventures; built-ins when omitted
/// * `bosses_json` - Optional JSON list of boss templates; built-ins when omitted
#[pyfunction]
#[pyo3(signature = (adventures_json=None, bosses_json=None))]
fn init_content(adventures_json: Option<&str>, bosses_json: Option<&str>) -> PyResult<()> {
    config::init_content(adventures_json, bosses_json)?;
    Ok(())
}

/// Check if content is initialized
#[pyfunction]
fn is_content_initialized() -> bool {
    config::is_content_initialized()
}

/// Ids of the cached adventures (built-ins before `init_content`), sorted
#[pyfunction]
fn adventure_ids() -> PyResult<Vec<String>> {
    Ok(config::adventure_ids()?)
}

/// `floor((score - 10) / 2)`
#[pyfunction]
fn stat_bonus(score: i32) -> i32 {
    stats::bonus_for(score)
}

/// Roll six ability scores (4d6 drop lowest, scaled into 1..=20)
#[pyfunction]
#[pyo3(signature = (seed=None))]
fn roll_stats<'py>(py: Python<'py>, seed: Option<u64>) -> PyResult<Bound<'py, PyDict>> {
    let mut rng = GameRng::from_seed_opt(seed);
    let scores = dice::roll_stats(&mut rng);
    let dict = PyDict::new(py);
    for stat in stats::Stat::ALL {
        dict.set_item(stat.short_name(), scores.get(stat))?;
    }
    Ok(dict)
}

/// Start a Boss Rush encounter against the cached roster
///
/// # Arguments
/// * `build` - Character build dict or object (see `extract_build`)
/// * `seed` - Optional RNG seed for a reproducible fight
#[pyfunction]
#[pyo3(signature = (build, seed=None))]
fn start_encounter(build: &Bound<'_, PyAny>, seed: Option<u64>) -> PyResult<EncounterSession> {
    let build = extract_build(build)?;
    let roster = current_roster();
    let encounter = BossRush::new(
        build,
        roster.to_vec(),
        EncounterRules::default(),
        GameRng::from_seed_opt(seed),
    )?;
    Ok(EncounterSession::new(encounter))
}

/// Start a Text Quest
///
/// Uses the built-in adventures when `init_content` was never called.
///
/// # Raises
/// KeyError if the adventure does not exist
#[pyfunction]
#[pyo3(signature = (adventure_id, build, seed=None))]
fn start_quest(adventure_id: &str, build: &Bound<'_, PyAny>, seed: Option<u64>) -> PyResult<QuestSession> {
    let build = extract_build(build)?;
    let adventure = config::get_adventure(adventure_id)?;
    let engine = QuestEngine::with_seed(adventure, build, seed)?;
    Ok(QuestSession::new(engine))
}

#[pyfunction]
#[pyo3(signature = (build, seed=None))]
fn start_hack_slash(build: &Bound<'_, PyAny>, seed: Option<u64>) -> PyResult<ArcadeSession> {
    let build = extract_build(build)?;
    Ok(ArcadeSession::hack_slash(HackSlash::with_seed(build, seed)))
}

#[pyfunction]
#[pyo3(signature = (build, seed=None))]
fn start_runner(build: &Bound<'_, PyAny>, seed: Option<u64>) -> PyResult<ArcadeSession> {
    let build = extract_build(build)?;
    Ok(ArcadeSession::runner(Runner::with_seed(build, seed)))
}

/// Autoplay `runs` Boss Rush encounters and report aggregates
#[pyfunction]
#[pyo3(signature = (build, runs, seed=None))]
fn simulate_boss_rush<'py>(
    py: Python<'py>,
    build: &Bound<'py, PyAny>,
    runs: u32,
    seed: Option<u64>,
) -> PyResult<Bound<'py, PyDict>> {
    let build = extract_build(build)?;
    let roster = current_roster();
    let report = simulate(&build, &roster, runs, seed)?;
    report_to_dict(py, &report)
}

/// Autoplay Boss Rush encounters asynchronously
///
/// The runs execute on Tokio's blocking pool, so Python's asyncio event loop
/// stays responsive.
///
/// # Returns
/// A Python awaitable that resolves to the report dict
///
/// # Example (Python)
/// ```python
/// report = await simulate_boss_rush_async({"bonuses": {"str": 2}}, 500)
/// print(report["win_rate"])
/// ```
#[pyfunction]
#[pyo3(signature = (build, runs, seed=None))]
fn simulate_boss_rush_async<'py>(
    py: Python<'py>,
    build: &Bound<'py, PyAny>,
    runs: u32,
    seed: Option<u64>,
) -> PyResult<Bound<'py, PyAny>> {
    // Extract while holding the GIL
    let build = extract_build(build)?;
    let roster = current_roster();

    pyo3_async_runtimes::tokio::future_into_py(py, async move {
        let report = tokio::task::spawn_blocking(move || simulate(&build, &roster, runs, seed))
            .await
            .map_err(|e| {
                PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!(
                    "Simulation task panicked: {}",
                    e
                ))
            })??;

        Python::attach(|py| report_to_dict(py, &report).map(|dict| dict.unbind()))
    })
}

// ============================================================================
// Python Module Definition
// ============================================================================

/// Python module definition
#[pymodule]
fn site_rpg_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;
    m.add_function(wrap_pyfunction!(init_content, m)?)?;
    m.add_function(wrap_pyfunction!(is_content_initialized, m)?)?;
    m.add_function(wrap_pyfunction!(adventure_ids, m)?)?;
    m.add_function(wrap_pyfunction!(stat_bonus, m)?)?;
    m.add_function(wrap_pyfunction!(roll_stats, m)?)?;
    m.add_function(wrap_pyfunction!(start_encounter, m)?)?;
    m.add_function(wrap_pyfunction!(start_quest, m)?)?;
    m.add_function(wrap_pyfunction!(start_hack_slash, m)?)?;
    m.add_function(wrap_pyfunction!(start_runner, m)?)?;
    m.add_function(wrap_pyfunction!(simulate_boss_rush, m)?)?;
    m.add_function(wrap_pyfunction!(simulate_boss_rush_async, m)?)?;
    m.add_class::<EncounterSession>()?;
    m.add_class::<QuestSession>()?;
    m.add_class::<ArcadeSession>()?;
    Ok(())
}
