//! EncounterSession - Boss Rush handle held by Python

use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::convert::{encounter_end_to_dict, turn_result_to_dict};
use crate::combat::{autoplay, AutoplayPolicy, BossRush, PlayerAction};

/// Stateful Boss Rush encounter
///
/// Every action returns the step's result as a dict; an illegal action raises
/// `RuntimeError` and leaves the encounter untouched.
#[pyclass]
pub struct EncounterSession {
    inner: BossRush,
}

impl EncounterSession {
    pub fn new(inner: BossRush) -> Self {
        Self { inner }
    }

    fn act<'py>(&mut self, py: Python<'py>, action: PlayerAction) -> PyResult<Bound<'py, PyDict>> {
        let turn = self.inner.act(action)?;
        turn_result_to_dict(py, &turn)
    }
}

#[pymethods]
impl EncounterSession {
    // ------------------------------------------------------------------------
    // Getter Properties
    // ------------------------------------------------------------------------

    #[getter]
    fn state(&self) -> &'static str {
        self.inner.state().as_str()
    }

    #[getter]
    fn can_act(&self) -> bool {
        self.inner.can_act()
    }

    #[getter]
    fn is_stunned(&self) -> bool {
        self.inner.is_stunned()
    }

    #[getter]
    fn defend_locked(&self) -> bool {
        self.inner.defend_locked()
    }

    #[getter]
    fn attack_locked(&self) -> bool {
        self.inner.attack_locked()
    }

    #[getter]
    fn is_over(&self) -> bool {
        self.inner.is_over()
    }

    #[getter]
    fn score(&self) -> i32 {
        self.inner.score()
    }

    #[getter]
    fn bosses_defeated(&self) -> u32 {
        self.inner.bosses_defeated()
    }

    #[getter]
    fn boss_count(&self) -> usize {
        self.inner.boss_count()
    }

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    fn attack<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        self.act(py, PlayerAction::Attack)
    }

    fn defend<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        self.act(py, PlayerAction::Defend)
    }

    fn pass_turn<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        self.act(py, PlayerAction::Pass)
    }

    fn boss_turn<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let turn = self.inner.boss_turn()?;
        turn_result_to_dict(py, &turn)
    }

    /// Play the rest of the encounter with the default policy
    fn autoplay<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let end = autoplay(&mut self.inner, &AutoplayPolicy::default())?;
        encounter_end_to_dict(py, &end)
    }

    // ------------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------------

    /// Both combatants' current numbers
    fn status<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let player = &self.inner.player().combatant;
        let boss = self.inner.boss();

        let player_dict = PyDict::new(py);
        player_dict.set_item("name", &player.name)?;
        player_dict.set_item("hp", player.hp)?;
        player_dict.set_item("max_hp", player.max_hp)?;
        player_dict.set_item("ac", self.inner.player().effective_ac())?;
        player_dict.set_item("is_defending", self.inner.player().is_defending)?;
        let effects: Vec<&str> = player.effects.iter().map(|e| e.name.as_str()).collect();
        player_dict.set_item("effects", effects)?;

        let boss_dict = PyDict::new(py);
        boss_dict.set_item("name", boss.name())?;
        boss_dict.set_item("index", boss.index)?;
        boss_dict.set_item("hp", boss.combatant.hp)?;
        boss_dict.set_item("max_hp", boss.combatant.max_hp)?;
        boss_dict.set_item("ac", boss.combatant.armor_class)?;
        let effects: Vec<&str> = boss.combatant.effects.iter().map(|e| e.name.as_str()).collect();
        boss_dict.set_item("effects", effects)?;

        let dict = PyDict::new(py);
        dict.set_item("player", player_dict)?;
        dict.set_item("boss", boss_dict)?;
        dict.set_item("round", self.inner.rounds())?;
        Ok(dict)
    }

    /// Combat log, oldest line first
    fn log(&self) -> Vec<String> {
        self.inner.log().iter().map(str::to_string).collect()
    }

    /// Final payload, or None while the fight is on
    fn encounter_end<'py>(&self, py: Python<'py>) -> PyResult<Option<Bound<'py, PyDict>>> {
        self.inner
            .encounter_end()
            .map(|end| encounter_end_to_dict(py, &end))
            .transpose()
    }

    /// Outcome payload; an unfinished encounter reports `abandoned`
    fn summary<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        encounter_end_to_dict(py, &self.inner.summary())
    }

    fn __repr__(&self) -> String {
        format!(
            "EncounterSession(state={}, boss={}/{}, score={})",
            self.inner.state().as_str(),
            self.inner.boss().index + 1,
            self.inner.boss_count(),
            self.inner.score()
        )
    }
}
