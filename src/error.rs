//! Error types for the site RPG core engine

use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyValueError};
use pyo3::PyErr;
use thiserror::Error;

/// Actions rejected by an engine because of whose turn it is or what the
/// player is currently prevented from doing. A rejected action never mutates
/// engine state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalAction {
    #[error("it is not the player's turn")]
    NotPlayerTurn,

    #[error("it is not the boss's turn")]
    NotBossTurn,

    #[error("the player is stunned")]
    Stunned,

    #[error("defend is locked")]
    DefendLocked,

    #[error("attack is locked")]
    AttackLocked,

    #[error("the player can still act")]
    PlayerCanAct,

    #[error("the encounter is over")]
    EncounterOver,

    #[error("the quest is over")]
    QuestOver,
}

/// Main error type for the site RPG core engine
#[derive(Error, Debug)]
pub enum SiteRpgError {
    #[error("Illegal action: {0}")]
    IllegalAction(#[from] IllegalAction),

    #[error("Scene not found: {0}")]
    SceneNotFound(String),

    #[error("Adventure not found: {0}")]
    AdventureNotFound(String),

    #[error("Choice {index} out of range ({available} available)")]
    ChoiceOutOfRange { index: usize, available: usize },

    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("Unknown combat class: {0}")]
    UnknownCombatClass(String),

    #[error("Invalid dice notation: {0}")]
    InvalidDiceNotation(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Boss roster is empty")]
    EmptyRoster,

    #[error("Content not initialized")]
    ContentNotInitialized,
}

impl From<serde_json::Error> for SiteRpgError {
    fn from(err: serde_json::Error) -> Self {
        SiteRpgError::DeserializationError(err.to_string())
    }
}

impl From<SiteRpgError> for PyErr {
    fn from(err: SiteRpgError) -> PyErr {
        match err {
            SiteRpgError::IllegalAction(action) => {
                PyRuntimeError::new_err(format!("Illegal action: {}", action))
            }
            SiteRpgError::SceneNotFound(id) => {
                PyKeyError::new_err(format!("Scene not found: {}", id))
            }
            SiteRpgError::AdventureNotFound(id) => {
                PyKeyError::new_err(format!("Adventure not found: {}", id))
            }
            err @ SiteRpgError::ChoiceOutOfRange { .. } => PyValueError::new_err(err.to_string()),
            SiteRpgError::UnknownDifficulty(name) => {
                PyValueError::new_err(format!("Unknown difficulty: {}", name))
            }
            SiteRpgError::UnknownCombatClass(name) => {
                PyValueError::new_err(format!("Unknown combat class: {}", name))
            }
            SiteRpgError::InvalidDiceNotation(spec) => {
                PyValueError::new_err(format!("Invalid dice notation: {}", spec))
            }
            SiteRpgError::DeserializationError(msg) => {
                PyValueError::new_err(format!("Deserialization error: {}", msg))
            }
            SiteRpgError::EmptyRoster => PyValueError::new_err("Boss roster is empty"),
            SiteRpgError::ContentNotInitialized => PyRuntimeError::new_err(
                "Content not initialized. Call init_content() first.",
            ),
        }
    }
}

/// Result type alias for the site RPG core engine
pub type Result<T> = std::result::Result<T, SiteRpgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illegal_action_converts() {
        let err: SiteRpgError = IllegalAction::Stunned.into();
        assert!(matches!(err, SiteRpgError::IllegalAction(IllegalAction::Stunned)));
        assert_eq!(err.to_string(), "Illegal action: the player is stunned");
    }

    #[test]
    fn test_choice_out_of_range_message() {
        let err = SiteRpgError::ChoiceOutOfRange { index: 4, available: 2 };
        assert_eq!(err.to_string(), "Choice 4 out of range (2 available)");
    }

    #[test]
    fn test_json_error_maps_to_deserialization() {
        let bad = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: SiteRpgError = bad.into();
        assert!(matches!(err, SiteRpgError::DeserializationError(_)));
    }
}
