//! Text Quest scene engine
//!
//! Walks an [`Adventure`] one choice at a time. The engine owns the mutable
//! quest state (health, inventory, flags, XP); the scene graph itself is
//! shared read-only.

use ahash::AHashMap;
use serde::Serialize;
use std::sync::Arc;

use super::{Adventure, Choice, Scene};
use crate::config::{CharacterBuild, QuestDifficulty};
use crate::dice::{GameRng, Roller};
use crate::error::{IllegalAction, Result, SiteRpgError};
use crate::outcome::{EncounterEnd, Outcome};
use crate::skill::{SkillCheckResolver, SkillCheckResult};
use crate::stats::{half_bonus, round_half_up};

/// Base starting health before bonuses
pub const BASE_QUEST_HEALTH: i32 = 3;
/// XP for passing a skill check
pub const CHECK_PASS_XP: i32 = 10;
/// XP for passing a skill check on a natural 20
pub const CHECK_CRIT_XP: i32 = 15;
/// XP for reaching a victory scene
pub const COMPLETION_XP: i32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestState {
    InProgress,
    Victory,
    Defeat,
    /// Finished without a verdict, or aborted by a broken scene graph
    Abandoned,
}

impl QuestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestState::InProgress => "in_progress",
            QuestState::Victory => "victory",
            QuestState::Defeat => "defeat",
            QuestState::Abandoned => "abandoned",
        }
    }
}

/// Result of one `select_choice`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceOutcome {
    pub skill_check_result: Option<SkillCheckResult>,
    pub new_scene: String,
    pub log_lines: Vec<String>,
    pub xp_gained: i32,
    pub state: QuestState,
}

/// Starting health: `max(1, 3 + health_bonus + half(sta) + health flags)`
pub fn starting_health(build: &CharacterBuild, difficulty: &QuestDifficulty) -> i32 {
    (BASE_QUEST_HEALTH
        + difficulty.health_bonus
        + half_bonus(build.bonuses.sta)
        + build.effects.health_flags())
    .max(1)
}

/// One playthrough of an adventure
#[derive(Debug, Clone)]
pub struct QuestEngine<R: Roller = GameRng> {
    adventure: Arc<Adventure>,
    build: CharacterBuild,
    resolver: SkillCheckResolver,
    difficulty: QuestDifficulty,
    current_scene: String,
    health: i32,
    max_health: i32,
    inventory: Vec<String>,
    flags: AHashMap<String, bool>,
    xp: i32,
    checks_passed: u32,
    state: QuestState,
    log: Vec<String>,
    roller: R,
}

impl QuestEngine<GameRng> {
    pub fn with_seed(adventure: Arc<Adventure>, build: CharacterBuild, seed: Option<u64>) -> Result<Self> {
        Self::new(adventure, build, GameRng::from_seed_opt(seed))
    }
}

impl<R: Roller> QuestEngine<R> {
    /// Start the adventure at its starting scene
    pub fn new(adventure: Arc<Adventure>, build: CharacterBuild, roller: R) -> Result<Self> {
        let difficulty = build.difficulty.quest();
        let health = starting_health(&build, &difficulty);
        let start = adventure.starting_scene.clone();

        let mut engine = Self {
            resolver: SkillCheckResolver::for_build(&build),
            adventure,
            build,
            difficulty,
            current_scene: start.clone(),
            health,
            max_health: health,
            inventory: Vec::new(),
            flags: AHashMap::new(),
            xp: 0,
            checks_passed: 0,
            state: QuestState::InProgress,
            log: Vec::new(),
            roller,
        };

        tracing::info!(
            adventure = %engine.adventure.id,
            difficulty = %engine.build.difficulty,
            health,
            "quest started"
        );
        let title = engine.adventure.title.clone();
        engine.log.push(format!("Starting: {}", title));

        let mut lines = Vec::new();
        engine.enter_scene(&start, &mut lines)?;
        Ok(engine)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn adventure(&self) -> &Adventure {
        &self.adventure
    }

    pub fn scene(&self) -> Result<&Scene> {
        self.adventure.scene(&self.current_scene)
    }

    pub fn scene_id(&self) -> &str {
        &self.current_scene
    }

    pub fn state(&self) -> QuestState {
        self.state
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn xp(&self) -> i32 {
        self.xp
    }

    pub fn checks_passed(&self) -> u32 {
        self.checks_passed
    }

    pub fn inventory(&self) -> &[String] {
        &self.inventory
    }

    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn is_over(&self) -> bool {
        self.state != QuestState::InProgress
    }

    /// Choices visible right now; recomputed on every call
    pub fn available_choices(&self) -> Vec<&Choice> {
        if self.is_over() {
            return Vec::new();
        }
        match self.adventure.scenes.get(&self.current_scene) {
            Some(scene) => scene
                .choices
                .iter()
                .filter(|c| c.is_available(&self.flags, &self.inventory))
                .collect(),
            None => Vec::new(),
        }
    }

    /// In progress with nothing left to choose
    pub fn is_ending(&self) -> bool {
        !self.is_over() && self.available_choices().is_empty()
    }

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    /// Pick the `index`-th *available* choice
    pub fn select_choice(&mut self, index: usize) -> Result<ChoiceOutcome> {
        if self.is_over() {
            return Err(IllegalAction::QuestOver.into());
        }
        let choice = {
            let choices = self.available_choices();
            let available = choices.len();
            choices
                .get(index)
                .map(|c| (*c).clone())
                .ok_or(SiteRpgError::ChoiceOutOfRange { index, available })?
        };

        let xp_before = self.xp;
        let mut lines = Vec::new();
        self.push_log(&mut lines, format!("> {}", choice.text));

        let mut check_result = None;
        let next = match &choice.skill_check {
            Some(check) => {
                let result = self.resolver.resolve(check, &mut self.roller);
                self.push_log(&mut lines, result.to_string());

                if result.outcome.is_success() {
                    self.checks_passed += 1;
                    let amount = if result.outcome.is_critical() {
                        CHECK_CRIT_XP
                    } else {
                        CHECK_PASS_XP
                    };
                    self.award_xp(amount, "Skill check passed", &mut lines);
                }
                let next = result.next_scene.clone();
                check_result = Some(result);
                Some(next)
            }
            None => choice.next_scene.clone(),
        };

        if let Some(next) = next {
            self.enter_scene(&next, &mut lines)?;
        }

        Ok(ChoiceOutcome {
            skill_check_result: check_result,
            new_scene: self.current_scene.clone(),
            log_lines: lines,
            xp_gained: self.xp - xp_before,
            state: self.state,
        })
    }

    /// End the quest; an unfinished quest counts as abandoned
    pub fn finish(&mut self) -> EncounterEnd {
        if self.state == QuestState::InProgress {
            self.state = QuestState::Abandoned;
            self.log.push("You leave the adventure.".to_string());
            tracing::info!(adventure = %self.adventure.id, xp = self.xp, "quest abandoned");
        }
        self.summary()
    }

    /// Outcome payload; an in-progress quest reports `Abandoned`
    pub fn summary(&self) -> EncounterEnd {
        let outcome = match self.state {
            QuestState::Victory => Outcome::Victory,
            QuestState::Defeat => Outcome::Defeat,
            QuestState::InProgress | QuestState::Abandoned => Outcome::Abandoned,
        };
        EncounterEnd {
            outcome,
            total_xp: self.xp,
            enemies_defeated: 0,
        }
    }

    // ------------------------------------------------------------------------
    // Scene entry
    // ------------------------------------------------------------------------

    /// Apply the scene's arrival effects: XP, damage, healing, item, flags,
    /// then the terminal flags
    fn enter_scene(&mut self, id: &str, lines: &mut Vec<String>) -> Result<()> {
        let adventure = Arc::clone(&self.adventure);
        let scene = match adventure.scenes.get(id) {
            Some(scene) => scene,
            None => {
                tracing::error!(adventure = %adventure.id, scene = id, "scene not found, aborting quest");
                self.state = QuestState::Abandoned;
                return Err(SiteRpgError::SceneNotFound(id.to_string()));
            }
        };

        self.current_scene = id.to_string();
        tracing::debug!(scene = id, health = self.health, xp = self.xp, "entered scene");

        if scene.xp_reward != 0 {
            self.award_xp(scene.xp_reward, &format!("Reached: {}", scene.title), lines);
        }
        if scene.damage > 0 {
            self.health = (self.health - scene.damage).max(0);
            let message = scene.damage_message.as_deref().unwrap_or("You take damage!");
            self.push_log(lines, format!("{} (-{} HP)", message, scene.damage));
        }
        if scene.healing > 0 {
            let healed = scene.healing.min(self.max_health - self.health).max(0);
            self.health += healed;
            if healed > 0 {
                self.push_log(lines, format!("You heal {} HP", healed));
            }
        }
        if let Some(item) = &scene.give_item {
            self.inventory.push(item.clone());
            self.push_log(lines, format!("Obtained: {}", item));
        }
        for (flag, value) in &scene.set_flags {
            self.flags.insert(flag.clone(), *value);
        }

        if scene.is_death {
            self.state = QuestState::Defeat;
            self.push_log(lines, "GAME OVER - You have been defeated.".to_string());
            tracing::info!(adventure = %adventure.id, xp = self.xp, "quest lost");
        } else if scene.is_victory {
            self.state = QuestState::Victory;
            self.push_log(lines, "VICTORY! You completed the adventure!".to_string());
            self.award_xp(COMPLETION_XP, "Adventure completed", lines);
            tracing::info!(adventure = %adventure.id, xp = self.xp, "quest won");
        }
        Ok(())
    }

    /// `round(amount * (xp_mult + race/class xp bonus))`
    fn award_xp(&mut self, amount: i32, reason: &str, lines: &mut Vec<String>) {
        let multiplier = self.difficulty.xp_mult + self.build.effects.xp_bonus();
        let gained = round_half_up(amount as f64 * multiplier);
        self.xp += gained;
        self.push_log(lines, format!("+{} XP ({})", gained, reason));
    }

    fn push_log(&mut self, lines: &mut Vec<String>, line: String) {
        self.log.push(line.clone());
        lines.push(line);
    }
}
