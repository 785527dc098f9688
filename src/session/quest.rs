//! QuestSession - Text Quest handle held by Python

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use super::convert::{choice_outcome_to_dict, choice_to_dict, encounter_end_to_dict};
use crate::quest::QuestEngine;

#[pyclass]
pub struct QuestSession {
    inner: QuestEngine,
}

impl QuestSession {
    pub fn new(inner: QuestEngine) -> Self {
        Self { inner }
    }
}

#[pymethods]
impl QuestSession {
    #[getter]
    fn state(&self) -> &'static str {
        self.inner.state().as_str()
    }

    #[getter]
    fn scene_id(&self) -> &str {
        self.inner.scene_id()
    }

    #[getter]
    fn health(&self) -> i32 {
        self.inner.health()
    }

    #[getter]
    fn max_health(&self) -> i32 {
        self.inner.max_health()
    }

    #[getter]
    fn xp(&self) -> i32 {
        self.inner.xp()
    }

    #[getter]
    fn inventory(&self) -> Vec<String> {
        self.inner.inventory().to_vec()
    }

    #[getter]
    fn is_over(&self) -> bool {
        self.inner.is_over()
    }

    /// True when no choice is left and no verdict was reached
    #[getter]
    fn is_ending(&self) -> bool {
        self.inner.is_ending()
    }

    /// Current scene as a dict
    fn scene<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let scene = self.inner.scene()?;
        let dict = PyDict::new(py);
        dict.set_item("id", &scene.id)?;
        dict.set_item("title", &scene.title)?;
        dict.set_item("icon", scene.icon.as_deref())?;
        dict.set_item("text", &scene.text)?;
        dict.set_item("is_death", scene.is_death)?;
        dict.set_item("is_victory", scene.is_victory)?;
        Ok(dict)
    }

    /// Choices visible right now; `select_choice` indexes into this list
    fn available_choices<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyList>> {
        let list = PyList::empty(py);
        for (index, choice) in self.inner.available_choices().into_iter().enumerate() {
            list.append(choice_to_dict(py, index, choice)?)?;
        }
        Ok(list)
    }

    fn select_choice<'py>(&mut self, py: Python<'py>, index: usize) -> PyResult<Bound<'py, PyDict>> {
        let outcome = self.inner.select_choice(index)?;
        choice_outcome_to_dict(py, &outcome)
    }

    fn has_flag(&self, name: &str) -> bool {
        self.inner.flag(name)
    }

    fn log(&self) -> Vec<String> {
        self.inner.log().to_vec()
    }

    /// End the quest; unfinished quests count as abandoned
    fn finish<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let end = self.inner.finish();
        encounter_end_to_dict(py, &end)
    }

    fn summary<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        encounter_end_to_dict(py, &self.inner.summary())
    }

    fn __repr__(&self) -> String {
        format!(
            "QuestSession(adventure={}, scene={}, state={}, health={}/{})",
            self.inner.adventure().id,
            self.inner.scene_id(),
            self.inner.state().as_str(),
            self.inner.health(),
            self.inner.max_health()
        )
    }
}
