//! Pieces shared by the frame-stepped action games

use serde::Serialize;

use crate::outcome::Outcome;

/// Logical playfield width
pub const ARENA_WIDTH: f64 = 800.0;
/// Logical playfield height
pub const ARENA_HEIGHT: f64 = 280.0;

/// Buttons held during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub attack: bool,
    pub jump: bool,
}

impl FrameInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn attack() -> Self {
        Self {
            attack: true,
            ..Self::default()
        }
    }

    pub fn jump() -> Self {
        Self {
            jump: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcadeState {
    Running,
    Victory,
    Defeat,
    Abandoned,
}

impl ArcadeState {
    #[inline]
    pub fn is_over(&self) -> bool {
        !matches!(self, ArcadeState::Running)
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            ArcadeState::Victory => Outcome::Victory,
            ArcadeState::Defeat => Outcome::Defeat,
            ArcadeState::Running | ArcadeState::Abandoned => Outcome::Abandoned,
        }
    }
}

/// Things that happened during a frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ArcadeEvent {
    WaveStarted { wave: u32, enemies: usize },
    EnemySpawned { kind: &'static str },
    EnemyHit { kind: &'static str, damage: i32 },
    EnemyKilled { kind: &'static str, xp: i32 },
    EnemyEscaped { kind: &'static str },
    PlayerHit { health: i32 },
    WaveCleared { wave: u32, bonus: i32 },
    Collected { points: i32 },
    ShieldAbsorbed { remaining: u32 },
    Dodged,
    GameOver { outcome: Outcome },
}
