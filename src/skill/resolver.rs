//! Skill check resolution

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::CharacterBuild;
use crate::dice::{classify_d20, Natural, Roller};
use crate::stats::{half_bonus, Stat, StatBonuses};

/// A declarative check on a scene-graph edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCheck {
    /// Stat name, short or long form
    pub stat: String,
    pub dc: i32,
    /// Scene on success
    pub success: String,
    /// Scene on failure
    pub failure: String,
    /// Scene on a natural 20, falls back to `success`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crit_success: Option<String>,
    /// Scene on a natural 1, falls back to `failure`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crit_fail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    CriticalFailure,
    Failure,
    Success,
    CriticalSuccess,
}

impl CheckOutcome {
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, CheckOutcome::Success | CheckOutcome::CriticalSuccess)
    }

    #[inline]
    pub fn is_critical(&self) -> bool {
        matches!(self, CheckOutcome::CriticalSuccess | CheckOutcome::CriticalFailure)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckOutcome::CriticalFailure => "critical_failure",
            CheckOutcome::Failure => "failure",
            CheckOutcome::Success => "success",
            CheckOutcome::CriticalSuccess => "critical_success",
        }
    }
}

/// Result of one check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillCheckResult {
    pub roll: u32,
    pub modifier: i32,
    pub total: i32,
    pub dc: i32,
    pub outcome: CheckOutcome,
    /// Scene the check leads to
    pub next_scene: String,
}

impl fmt::Display for SkillCheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.modifier >= 0 { "+" } else { "" };
        let verdict = match self.outcome {
            CheckOutcome::CriticalSuccess => "CRITICAL SUCCESS!",
            CheckOutcome::CriticalFailure => "CRITICAL FAIL!",
            CheckOutcome::Success => "Success!",
            CheckOutcome::Failure => "Failure",
        };
        write!(
            f,
            "Rolled {} {}{} = {} vs DC {}: {}",
            self.roll, sign, self.modifier, self.total, self.dc, verdict
        )
    }
}

/// Resolves checks for one character
///
/// Pure apart from the single d20 draw; the caller applies XP, damage and
/// the scene transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillCheckResolver {
    bonuses: StatBonuses,
    skill_bonuses: StatBonuses,
    dc_mod: i32,
}

impl SkillCheckResolver {
    pub fn new(bonuses: StatBonuses, skill_bonuses: StatBonuses, dc_mod: i32) -> Self {
        Self {
            bonuses,
            skill_bonuses,
            dc_mod,
        }
    }

    pub fn for_build(build: &CharacterBuild) -> Self {
        Self::new(build.bonuses, build.skill_bonuses, build.difficulty.quest().dc_mod)
    }

    /// `half_bonus(stat) + race/class bonus - dc_mod`
    ///
    /// An unrecognised stat name yields a modifier of 0.
    pub fn modifier(&self, stat_name: &str) -> i32 {
        match Stat::from_name(stat_name) {
            Some(stat) => half_bonus(self.bonuses.get(stat)) + self.skill_bonuses.get(stat) - self.dc_mod,
            None => {
                tracing::warn!(stat = stat_name, "unknown skill check stat, modifier is 0");
                0
            }
        }
    }

    pub fn resolve<R: Roller + ?Sized>(&self, check: &SkillCheck, roller: &mut R) -> SkillCheckResult {
        self.resolve_roll(check, roller.d20())
    }

    /// Resolve against an already rolled d20
    pub fn resolve_roll(&self, check: &SkillCheck, roll: u32) -> SkillCheckResult {
        let modifier = self.modifier(&check.stat);
        let total = roll as i32 + modifier;

        let (outcome, next_scene) = match classify_d20(roll, 20) {
            Natural::CriticalFailure => (
                CheckOutcome::CriticalFailure,
                check.crit_fail.as_ref().unwrap_or(&check.failure),
            ),
            Natural::CriticalSuccess => (
                CheckOutcome::CriticalSuccess,
                check.crit_success.as_ref().unwrap_or(&check.success),
            ),
            Natural::Normal if total >= check.dc => (CheckOutcome::Success, &check.success),
            Natural::Normal => (CheckOutcome::Failure, &check.failure),
        };

        tracing::debug!(
            stat = %check.stat,
            roll,
            modifier,
            total,
            dc = check.dc,
            outcome = outcome.as_str(),
            "skill check resolved"
        );

        SkillCheckResult {
            roll,
            modifier,
            total,
            dc: check.dc,
            outcome,
            next_scene: next_scene.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedRoller;

    fn check(stat: &str, dc: i32) -> SkillCheck {
        SkillCheck {
            stat: stat.to_string(),
            dc,
            success: "win".to_string(),
            failure: "lose".to_string(),
            crit_success: None,
            crit_fail: None,
        }
    }

    #[test]
    fn test_agility_scenario() {
        let bonuses = StatBonuses::default().with(Stat::Agility, 6);
        let skill = StatBonuses::default().with(Stat::Agility, 1);
        let resolver = SkillCheckResolver::new(bonuses, skill, 2);

        let result = resolver.resolve_roll(&check("agility", 13), 11);
        assert_eq!(result.modifier, 2);
        assert_eq!(result.total, 13);
        assert_eq!(result.outcome, CheckOutcome::Success);
        assert_eq!(result.next_scene, "win");
    }

    #[test]
    fn test_natural_twenty_overrides() {
        let resolver = SkillCheckResolver::new(StatBonuses::default(), StatBonuses::default(), 10);
        let result = resolver.resolve_roll(&check("str", 20), 20);
        assert_eq!(result.modifier, -10);
        assert_eq!(result.outcome, CheckOutcome::CriticalSuccess);
        assert_eq!(result.next_scene, "win");
    }

    #[test]
    fn test_natural_one_overrides() {
        let resolver = SkillCheckResolver::new(StatBonuses::default(), StatBonuses::default(), -10);
        let mut c = check("wis", 1);
        c.crit_fail = Some("trap".to_string());
        let result = resolver.resolve_roll(&c, 1);
        assert_eq!(result.modifier, 10);
        assert_eq!(result.outcome, CheckOutcome::CriticalFailure);
        assert_eq!(result.next_scene, "trap");
    }

    #[test]
    fn test_crit_success_edge() {
        let resolver = SkillCheckResolver::new(StatBonuses::default(), StatBonuses::default(), 0);
        let mut c = check("cha", 12);
        c.crit_success = Some("jackpot".to_string());
        let mut roller = ScriptedRoller::rolls([20]);
        let result = resolver.resolve(&c, &mut roller);
        assert_eq!(result.next_scene, "jackpot");
        assert!(result.outcome.is_success() && result.outcome.is_critical());
    }

    #[test]
    fn test_unknown_stat_modifier_zero() {
        let bonuses = StatBonuses::default().with(Stat::Charisma, 4);
        let resolver = SkillCheckResolver::new(bonuses, StatBonuses::default(), 1);
        assert_eq!(resolver.modifier("CHA"), 1);
        assert_eq!(resolver.modifier("charisma"), 1);
        // the difficulty modifier is not applied either
        assert_eq!(resolver.modifier("luck"), 0);
    }

    #[test]
    fn test_display() {
        let resolver = SkillCheckResolver::new(StatBonuses::default(), StatBonuses::default(), 1);
        let result = resolver.resolve_roll(&check("int", 10), 9);
        assert_eq!(result.to_string(), "Rolled 9 -1 = 8 vs DC 10: Failure");
    }

    #[test]
    fn test_deserialize_original_field_names() {
        let c: SkillCheck = serde_json::from_str(
            r#"{"stat": "strength", "dc": 12, "success": "a", "failure": "b", "critFail": "c"}"#,
        )
        .unwrap();
        assert_eq!(c.crit_fail.as_deref(), Some("c"));
        assert_eq!(c.crit_success, None);
    }
}
