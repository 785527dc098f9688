//! ArcadeSession - frame-stepped action game handle held by Python

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use super::convert::{arcade_event_to_dict, encounter_end_to_dict};
use crate::arcade::{ArcadeEvent, ArcadeState, FrameInput, HackSlash, Runner};
use crate::error::Result;
use crate::outcome::EncounterEnd;

enum ArcadeGame {
    HackSlash(HackSlash),
    Runner(Runner),
}

impl ArcadeGame {
    fn step(&mut self, input: FrameInput) -> Result<Vec<ArcadeEvent>> {
        match self {
            ArcadeGame::HackSlash(game) => game.step(input),
            ArcadeGame::Runner(game) => game.step(input),
        }
    }

    fn state(&self) -> ArcadeState {
        match self {
            ArcadeGame::HackSlash(game) => game.state(),
            ArcadeGame::Runner(game) => game.state(),
        }
    }

    fn score(&self) -> i32 {
        match self {
            ArcadeGame::HackSlash(game) => game.score(),
            ArcadeGame::Runner(game) => game.score(),
        }
    }

    fn frame(&self) -> u64 {
        match self {
            ArcadeGame::HackSlash(game) => game.frame(),
            ArcadeGame::Runner(game) => game.frame(),
        }
    }

    fn abandon(&mut self) -> EncounterEnd {
        match self {
            ArcadeGame::HackSlash(game) => game.abandon(),
            ArcadeGame::Runner(game) => game.abandon(),
        }
    }

    fn summary(&self) -> EncounterEnd {
        match self {
            ArcadeGame::HackSlash(game) => game.summary(),
            ArcadeGame::Runner(game) => game.summary(),
        }
    }
}

/// Hack & Slash or Runner, advanced one frame per `step`
#[pyclass]
pub struct ArcadeSession {
    game: ArcadeGame,
}

impl ArcadeSession {
    pub fn hack_slash(game: HackSlash) -> Self {
        Self {
            game: ArcadeGame::HackSlash(game),
        }
    }

    pub fn runner(game: Runner) -> Self {
        Self {
            game: ArcadeGame::Runner(game),
        }
    }
}

#[pymethods]
impl ArcadeSession {
    #[getter]
    fn kind(&self) -> &'static str {
        match self.game {
            ArcadeGame::HackSlash(_) => "hack_slash",
            ArcadeGame::Runner(_) => "runner",
        }
    }

    #[getter]
    fn state(&self) -> &'static str {
        match self.game.state() {
            ArcadeState::Running => "running",
            ArcadeState::Victory => "victory",
            ArcadeState::Defeat => "defeat",
            ArcadeState::Abandoned => "abandoned",
        }
    }

    #[getter]
    fn score(&self) -> i32 {
        self.game.score()
    }

    #[getter]
    fn frame(&self) -> u64 {
        self.game.frame()
    }

    #[getter]
    fn is_over(&self) -> bool {
        self.game.state().is_over()
    }

    /// Advance one frame with the given buttons held
    ///
    /// Returns the frame's events as a list of dicts.
    #[allow(clippy::too_many_arguments)]
    #[pyo3(signature = (up=false, down=false, left=false, right=false, attack=false, jump=false))]
    fn step<'py>(
        &mut self,
        py: Python<'py>,
        up: bool,
        down: bool,
        left: bool,
        right: bool,
        attack: bool,
        jump: bool,
    ) -> PyResult<Bound<'py, PyList>> {
        let input = FrameInput {
            up,
            down,
            left,
            right,
            attack,
            jump,
        };
        let events = self.game.step(input)?;
        let list = PyList::empty(py);
        for event in &events {
            list.append(arcade_event_to_dict(py, event)?)?;
        }
        Ok(list)
    }

    /// Quit; a running game ends as abandoned
    fn abandon<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let end = self.game.abandon();
        encounter_end_to_dict(py, &end)
    }

    fn summary<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        encounter_end_to_dict(py, &self.game.summary())
    }

    fn __repr__(&self) -> String {
        format!(
            "ArcadeSession(kind={}, state={}, frame={}, score={})",
            self.kind(),
            self.state(),
            self.game.frame(),
            self.game.score()
        )
    }
}
