//! Headless Boss Rush runs for balance checks and benchmarks

use serde::Serialize;

use super::{BossRush, BossTemplate, CombatState, PlayerAction};
use crate::config::{CharacterBuild, EncounterRules};
use crate::dice::{GameRng, Roller};
use crate::error::Result;
use crate::outcome::{EncounterEnd, Outcome};

/// Upper bound on engine steps for one autoplayed encounter
pub const MAX_AUTOPLAY_STEPS: u32 = 5_000;

/// Golden-ratio stride between per-run seeds
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// How the autoplayer picks its action
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoplayPolicy {
    /// Defend instead of attacking when HP falls below this fraction of max
    pub defend_below_hp_pct: f64,
}

impl Default for AutoplayPolicy {
    fn default() -> Self {
        Self {
            defend_below_hp_pct: 0.3,
        }
    }
}

impl AutoplayPolicy {
    pub fn choose<R: Roller>(&self, encounter: &BossRush<R>) -> PlayerAction {
        if !encounter.can_act() {
            return PlayerAction::Pass;
        }
        let player = &encounter.player().combatant;
        let low = (player.hp as f64) < player.max_hp as f64 * self.defend_below_hp_pct;
        if encounter.attack_locked() || (low && !encounter.defend_locked()) {
            PlayerAction::Defend
        } else {
            PlayerAction::Attack
        }
    }
}

/// Drive an encounter to the end, alternating player and boss turns
///
/// Returns `Abandoned` if the step cap is reached first.
pub fn autoplay<R: Roller>(encounter: &mut BossRush<R>, policy: &AutoplayPolicy) -> Result<EncounterEnd> {
    for _ in 0..MAX_AUTOPLAY_STEPS {
        if encounter.is_over() {
            break;
        }
        if encounter.state() == CombatState::BossTurn {
            encounter.boss_turn()?;
        } else {
            let action = policy.choose(encounter);
            encounter.act(action)?;
        }
    }
    Ok(encounter.summary())
}

/// Aggregate over many autoplayed encounters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub runs: u32,
    pub victories: u32,
    pub win_rate: f64,
    pub mean_xp: f64,
    pub mean_bosses_defeated: f64,
    pub mean_rounds: f64,
}

/// Run `runs` seeded encounters with the same build and roster
pub fn simulate_boss_rush(
    build: &CharacterBuild,
    roster: &[BossTemplate],
    rules: EncounterRules,
    runs: u32,
    seed: u64,
    policy: &AutoplayPolicy,
) -> Result<SimulationReport> {
    let mut victories = 0u32;
    let mut total_xp = 0i64;
    let mut total_defeated = 0u64;
    let mut total_rounds = 0u64;

    for i in 0..runs {
        let run_seed = seed.wrapping_add((i as u64).wrapping_mul(SEED_STRIDE));
        let mut encounter = BossRush::new(build.clone(), roster.to_vec(), rules, GameRng::new(run_seed))?;
        let end = autoplay(&mut encounter, policy)?;

        if end.outcome == Outcome::Victory {
            victories += 1;
        }
        total_xp += end.total_xp as i64;
        total_defeated += end.enemies_defeated as u64;
        total_rounds += encounter.rounds() as u64;
    }

    let n = runs.max(1) as f64;
    let report = SimulationReport {
        runs,
        victories,
        win_rate: victories as f64 / n,
        mean_xp: total_xp as f64 / n,
        mean_bosses_defeated: total_defeated as f64 / n,
        mean_rounds: total_rounds as f64 / n,
    };
    tracing::info!(
        runs,
        win_rate = report.win_rate,
        mean_xp = report.mean_xp,
        "boss rush simulation finished"
    );
    Ok(report)
}
