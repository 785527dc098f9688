//! Terminal payload handed to the external XP/leveling layer

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Victory,
    Defeat,
    /// The player quit or reached an ending without a verdict
    Abandoned,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Victory => "victory",
            Outcome::Defeat => "defeat",
            Outcome::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the persistence layer needs from a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterEnd {
    pub outcome: Outcome,
    pub total_xp: i32,
    pub enemies_defeated: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_camel_case() {
        let end = EncounterEnd {
            outcome: Outcome::Victory,
            total_xp: 412,
            enemies_defeated: 5,
        };
        let json = serde_json::to_string(&end).unwrap();
        assert_eq!(json, r#"{"outcome":"victory","totalXp":412,"enemiesDefeated":5}"#);
    }
}
