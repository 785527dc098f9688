//! Boss Rush turn engine
//!
//! One call advances exactly one step: a player action or a boss turn.
//! Rolls are drawn synchronously inside the call, so any presentation delay
//! happens after the result is already fixed.

use serde::Serialize;
use std::collections::VecDeque;

use super::{ac_reduction, default_roster, AbilityKind, Boss, BossAbility, BossTemplate, Player};
use crate::config::{BossDifficulty, CharacterBuild, EncounterRules};
use crate::dice::{classify_d20, GameRng, Natural, Roller};
use crate::error::{IllegalAction, Result, SiteRpgError};
use crate::outcome::{EncounterEnd, Outcome};
use crate::stats::{percent_ceil, percent_floor, round_half_up, xp_multiplier, Stat};
use crate::status::{DebuffStat, EffectKind, LockedAction, StatusEffect};

/// XP for the first boss
pub const BOSS_BASE_XP: i32 = 50;
/// Extra XP per roster position
pub const BOSS_XP_STEP: i32 = 25;
/// Giant slayer damage, in percent
pub const GIANT_SLAYER_PCT: u32 = 110;
/// Score earned per point of damage dealt
pub const SCORE_PER_DAMAGE: i32 = 2;

// ============================================================================
// States, actions and results
// ============================================================================

/// Turn-machine states
///
/// Between calls the engine rests in `PlayerTurn`, `BossTurn`, `Victory` or
/// `Defeat`. `Rolling`, `Resolving` and `EffectTick` only appear in a
/// [`TurnResult`]'s phase trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatState {
    PlayerTurn,
    Rolling,
    Resolving,
    BossTurn,
    EffectTick,
    Victory,
    Defeat,
}

impl CombatState {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, CombatState::Victory | CombatState::Defeat)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CombatState::PlayerTurn => "player_turn",
            CombatState::Rolling => "rolling",
            CombatState::Resolving => "resolving",
            CombatState::BossTurn => "boss_turn",
            CombatState::EffectTick => "effect_tick",
            CombatState::Victory => "victory",
            CombatState::Defeat => "defeat",
        }
    }
}

/// Actions the player can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    Attack,
    Defend,
    /// Forfeit the turn; only legal while the player cannot act
    Pass,
}

/// What happened in a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnAction {
    Attack,
    Defend,
    Pass,
    BossAttack,
    BossAbility { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Boss,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Player => "player",
            Side::Boss => "boss",
        }
    }
}

/// Notable things a step produced, for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CombatEvent {
    /// A hit was turned into a miss by a phase effect
    Phased,
    EffectApplied { target: Side, name: String },
    EffectExpired { target: Side, name: String },
    DamageOverTime { name: String, damage: i32 },
    BossHealed { amount: i32 },
    BossDefeated { index: usize, name: String, xp: i32 },
    BossSpawned { index: usize, name: String },
    PlayerDefeated,
    Victory,
}

/// Result of one engine step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnResult {
    pub action: TurnAction,
    /// First d20 of the step, if any was rolled
    pub roll: Option<u32>,
    pub modifier: i32,
    pub total: Option<i32>,
    pub hit: bool,
    pub critical: bool,
    /// Damage dealt by the acting side's action
    pub damage_dealt: i32,
    /// Damage-over-time taken by the player at the end of a boss turn
    pub dot_damage: i32,
    pub log_lines: Vec<String>,
    pub events: Vec<CombatEvent>,
    /// States traversed, starting with the one the step began in
    pub phases: Vec<CombatState>,
    pub new_state: CombatState,
}

impl TurnResult {
    fn new(action: TurnAction, start: CombatState) -> Self {
        Self {
            action,
            roll: None,
            modifier: 0,
            total: None,
            hit: false,
            critical: false,
            damage_dealt: 0,
            dot_damage: 0,
            log_lines: Vec::new(),
            events: Vec::new(),
            phases: vec![start],
            new_state: start,
        }
    }

    fn enter(&mut self, state: CombatState) {
        if self.phases.last() != Some(&state) {
            self.phases.push(state);
        }
    }

    fn record_roll(&mut self, roll: u32, modifier: i32) {
        if self.roll.is_none() {
            self.roll = Some(roll);
            self.modifier = modifier;
            self.total = Some(roll as i32 + modifier);
        }
    }
}

// ============================================================================
// Combat log
// ============================================================================

/// Bounded combat log; the oldest line is dropped when full
#[derive(Debug, Clone, PartialEq)]
pub struct CombatLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl CombatLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// ============================================================================
// Engine
// ============================================================================

/// A Boss Rush encounter: one player against a roster of bosses in order
#[derive(Debug, Clone)]
pub struct BossRush<R: Roller = GameRng> {
    build: CharacterBuild,
    rules: EncounterRules,
    difficulty: BossDifficulty,
    roster: Vec<BossTemplate>,
    ac_reduction: i32,
    player: Player,
    boss: Boss,
    state: CombatState,
    score: i32,
    bosses_defeated: u32,
    rounds: u32,
    log: CombatLog,
    roller: R,
}

impl BossRush<GameRng> {
    /// Default roster and rules with a seeded (or random) RNG
    pub fn with_seed(build: CharacterBuild, seed: Option<u64>) -> Result<Self> {
        Self::new(
            build,
            default_roster(),
            EncounterRules::default(),
            GameRng::from_seed_opt(seed),
        )
    }
}

impl<R: Roller> BossRush<R> {
    /// Start an encounter; the first boss is spawned and it is the
    /// player's turn
    pub fn new(
        build: CharacterBuild,
        roster: Vec<BossTemplate>,
        rules: EncounterRules,
        roller: R,
    ) -> Result<Self> {
        let difficulty = build.difficulty.boss();
        let ac_reduction = ac_reduction(&build);
        let first = roster.first().ok_or(SiteRpgError::EmptyRoster)?;
        let boss = Boss::spawn(first, 0, &difficulty, ac_reduction);
        let player = Player::from_build(&build);

        let mut log = CombatLog::new(rules.log_capacity);
        log.push(format!("A wild {} appears!", boss.name()));
        log.push(format!(
            "You are a {}. Roll to attack!",
            player.combatant.name
        ));

        tracing::info!(
            class = %player.combatant.name,
            difficulty = %build.difficulty,
            bosses = roster.len(),
            "boss rush started"
        );

        Ok(Self {
            build,
            rules,
            difficulty,
            roster,
            ac_reduction,
            player,
            boss,
            state: CombatState::PlayerTurn,
            score: 0,
            bosses_defeated: 0,
            rounds: 0,
            log,
            roller,
        })
    }

    // ------------------------------------------------------------------------
    // Accessors and predicates
    // ------------------------------------------------------------------------

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn boss(&self) -> &Boss {
        &self.boss
    }

    pub fn boss_count(&self) -> usize {
        self.roster.len()
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn bosses_defeated(&self) -> u32 {
        self.bosses_defeated
    }

    /// Boss turns resolved so far
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn build(&self) -> &CharacterBuild {
        &self.build
    }

    pub fn log(&self) -> &CombatLog {
        &self.log
    }

    pub fn is_over(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn is_stunned(&self) -> bool {
        self.player.is_stunned()
    }

    pub fn defend_locked(&self) -> bool {
        self.player.is_locked(LockedAction::Defend)
    }

    pub fn attack_locked(&self) -> bool {
        self.player.is_locked(LockedAction::Attack)
    }

    /// True when it is the player's turn and attack or defend is allowed
    pub fn can_act(&self) -> bool {
        self.state == CombatState::PlayerTurn
            && !self.is_stunned()
            && !(self.attack_locked() && self.defend_locked())
    }

    pub fn is_legal(&self, action: PlayerAction) -> bool {
        self.check_action(action).is_ok()
    }

    fn check_action(&self, action: PlayerAction) -> std::result::Result<(), IllegalAction> {
        if self.state.is_terminal() {
            return Err(IllegalAction::EncounterOver);
        }
        if self.state != CombatState::PlayerTurn {
            return Err(IllegalAction::NotPlayerTurn);
        }
        match action {
            PlayerAction::Attack | PlayerAction::Defend if self.is_stunned() => {
                Err(IllegalAction::Stunned)
            }
            PlayerAction::Attack if self.attack_locked() => Err(IllegalAction::AttackLocked),
            PlayerAction::Defend if self.defend_locked() => Err(IllegalAction::DefendLocked),
            PlayerAction::Pass if self.can_act() => Err(IllegalAction::PlayerCanAct),
            _ => Ok(()),
        }
    }

    /// Outcome payload once the encounter has ended
    pub fn encounter_end(&self) -> Option<EncounterEnd> {
        let outcome = match self.state {
            CombatState::Victory => Outcome::Victory,
            CombatState::Defeat => Outcome::Defeat,
            _ => return None,
        };
        Some(EncounterEnd {
            outcome,
            total_xp: self.score,
            enemies_defeated: self.bosses_defeated,
        })
    }

    /// Outcome payload now, treating an unfinished encounter as abandoned
    pub fn summary(&self) -> EncounterEnd {
        self.encounter_end().unwrap_or(EncounterEnd {
            outcome: Outcome::Abandoned,
            total_xp: self.score,
            enemies_defeated: self.bosses_defeated,
        })
    }

    // ------------------------------------------------------------------------
    // Player actions
    // ------------------------------------------------------------------------

    pub fn act(&mut self, action: PlayerAction) -> Result<TurnResult> {
        match action {
            PlayerAction::Attack => self.player_attack(),
            PlayerAction::Defend => self.player_defend(),
            PlayerAction::Pass => self.pass_turn(),
        }
    }

    pub fn player_attack(&mut self) -> Result<TurnResult> {
        self.check_action(PlayerAction::Attack)?;
        let mut turn = TurnResult::new(TurnAction::Attack, self.state);

        turn.enter(CombatState::Rolling);
        let roll = self.roller.d20();
        let modifier = self.player.combatant.attack_bonus
            + self.player.combatant.effects.debuff_total(DebuffStat::Accuracy);
        let total = roll as i32 + modifier;
        let boss_ac = self.boss.combatant.armor_class;
        turn.record_roll(roll, modifier);

        turn.enter(CombatState::Resolving);
        let natural = classify_d20(roll, self.player.crit_threshold);
        let crit = natural == Natural::CriticalSuccess;
        let mut hit = natural != Natural::CriticalFailure && (crit || total >= boss_ac);
        self.say(
            &mut turn,
            format!("Rolled {} {:+} = {} vs AC {}", roll, modifier, total, boss_ac),
        );

        if hit {
            if let Some(miss_chance) = self.boss.combatant.effects.phase_miss_chance() {
                if self.roller.chance(miss_chance as f64 / 100.0) {
                    hit = false;
                    turn.events.push(CombatEvent::Phased);
                    let line = format!("Your attack passes through {}!", self.boss.name());
                    self.say(&mut turn, line);
                }
            }
        }

        turn.hit = hit;
        turn.critical = hit && crit;

        if hit {
            let damage = self.roll_player_damage(turn.critical);
            self.boss.combatant.take_damage(damage);
            self.score += damage * SCORE_PER_DAMAGE;
            turn.damage_dealt = damage;

            let line = if turn.critical {
                format!("CRITICAL HIT! You deal {} damage!", damage)
            } else {
                format!("Hit! You deal {} damage to {}.", damage, self.boss.name())
            };
            self.say(&mut turn, line);

            if !self.boss.combatant.is_alive() {
                self.defeat_boss(&mut turn);
                return Ok(self.finish(turn));
            }
        } else if natural == Natural::CriticalFailure {
            self.say(&mut turn, "Critical miss! You stumble!".to_string());
        } else if !turn.events.contains(&CombatEvent::Phased) {
            self.say(&mut turn, "Miss! Your attack fails to connect.".to_string());
        }

        self.state = CombatState::BossTurn;
        Ok(self.finish(turn))
    }

    /// Raise the guard for the next boss action: temporary AC and halved damage
    pub fn player_defend(&mut self) -> Result<TurnResult> {
        self.check_action(PlayerAction::Defend)?;
        let mut turn = TurnResult::new(TurnAction::Defend, self.state);
        turn.enter(CombatState::Resolving);

        self.player.start_defending();
        turn.modifier = self.player.temp_ac;
        let line = format!(
            "You raise your guard! (AC +{}, damage halved)",
            self.player.temp_ac
        );
        self.say(&mut turn, line);

        self.state = CombatState::BossTurn;
        Ok(self.finish(turn))
    }

    /// Hand the turn to the boss while stunned or fully locked
    pub fn pass_turn(&mut self) -> Result<TurnResult> {
        self.check_action(PlayerAction::Pass)?;
        let mut turn = TurnResult::new(TurnAction::Pass, self.state);

        let line = if self.is_stunned() {
            "You are stunned and lose your turn!"
        } else {
            "You cannot act and lose your turn!"
        };
        self.say(&mut turn, line.to_string());

        self.state = CombatState::BossTurn;
        Ok(self.finish(turn))
    }

    fn roll_player_damage(&mut self, critical: bool) -> i32 {
        let dice = self.player.combatant.damage;
        let rolled = dice.roll(&mut self.roller) as i32;
        let debuff = self.player.combatant.effects.debuff_total(DebuffStat::Damage);
        let mut damage = (rolled + self.build.bonuses.half(Stat::Strength) + debuff).max(1);

        if self.build.effects.giant_slayer {
            damage = percent_ceil(damage, GIANT_SLAYER_PCT);
        }
        if critical {
            damage = percent_floor(damage, self.player.crit_bonus_pct) * 2;
        }
        damage
    }

    fn defeat_boss(&mut self, turn: &mut TurnResult) {
        self.boss.combatant.hp = 0;
        let index = self.boss.index;
        let name = self.boss.name().to_string();

        let base_xp = BOSS_BASE_XP + BOSS_XP_STEP * index as i32;
        let multiplier = xp_multiplier(self.build.bonuses.cha, &self.build.effects);
        let xp = round_half_up(base_xp as f64 * multiplier);
        self.score += xp;
        self.bosses_defeated += 1;

        self.say(turn, format!("{} has been defeated!", name));
        turn.events.push(CombatEvent::BossDefeated {
            index,
            name: name.clone(),
            xp,
        });
        tracing::info!(boss = %name, index, xp, score = self.score, "boss defeated");

        let next = index + 1;
        if next >= self.roster.len() {
            self.state = CombatState::Victory;
            self.say(turn, "Victory! You defeated all the bosses!".to_string());
            turn.events.push(CombatEvent::Victory);
            tracing::info!(score = self.score, "boss rush won");
            return;
        }

        self.boss = Boss::spawn(&self.roster[next], next, &self.difficulty, self.ac_reduction);
        self.player.stop_defending();
        self.state = CombatState::PlayerTurn;
        let name = self.boss.name().to_string();
        self.say(turn, format!("{} appears!", name));
        turn.events.push(CombatEvent::BossSpawned { index: next, name });
    }

    // ------------------------------------------------------------------------
    // Boss turn
    // ------------------------------------------------------------------------

    /// Resolve the boss's action and the end-of-round effect tick
    pub fn boss_turn(&mut self) -> Result<TurnResult> {
        match self.state {
            CombatState::BossTurn => {}
            state if state.is_terminal() => return Err(IllegalAction::EncounterOver.into()),
            _ => return Err(IllegalAction::NotBossTurn.into()),
        }
        let mut turn = TurnResult::new(TurnAction::BossAttack, self.state);
        self.rounds += 1;

        let use_ability =
            self.roller.chance(self.rules.ability_chance) && !self.boss.abilities.is_empty();
        if use_ability {
            let pick = self.roller.pick(self.boss.abilities.len());
            let ability = self.boss.abilities[pick].clone();
            turn.action = TurnAction::BossAbility {
                name: ability.name.clone(),
            };
            let line = format!("{} uses {}!", self.boss.name(), ability.name);
            self.say(&mut turn, line);
            self.execute_ability(&ability, &mut turn);
        } else {
            self.boss_normal_attack(&mut turn);
        }

        self.end_of_round(&mut turn);
        Ok(self.finish(turn))
    }

    /// d20 + boss attack bonus against the player's effective AC
    fn boss_attack_roll(&mut self, turn: &mut TurnResult) -> (Natural, bool) {
        turn.enter(CombatState::Rolling);
        let roll = self.roller.d20();
        let attack_bonus = self.boss.combatant.attack_bonus;
        turn.record_roll(roll, attack_bonus);
        turn.enter(CombatState::Resolving);

        let natural = classify_d20(roll, 20);
        let hit = match natural {
            Natural::CriticalFailure => false,
            Natural::CriticalSuccess => true,
            Natural::Normal => roll as i32 + attack_bonus >= self.player.effective_ac(),
        };
        (natural, hit)
    }

    fn roll_boss_die(&mut self) -> i32 {
        let die = self.boss.combatant.damage;
        die.roll(&mut self.roller) as i32
    }

    fn hit_player(&mut self, damage: i32, turn: &mut TurnResult) {
        self.player.combatant.take_damage(damage);
        turn.damage_dealt += damage;
        turn.hit = true;
    }

    fn boss_normal_attack(&mut self, turn: &mut TurnResult) {
        let (natural, hit) = self.boss_attack_roll(turn);
        let boss_name = self.boss.name().to_string();

        if !hit {
            let line = if natural == Natural::CriticalFailure {
                format!("{} critically misses!", boss_name)
            } else {
                format!("{} misses you.", boss_name)
            };
            self.say(turn, line);
            return;
        }

        let critical = natural == Natural::CriticalSuccess;
        let mut damage = self.roll_boss_die();
        if critical {
            damage *= 2;
        }
        let mitigated = self.player.mitigate(damage);
        if mitigated != damage {
            self.say(
                turn,
                format!("Your defense reduces damage from {} to {}!", damage, mitigated),
            );
        }
        self.hit_player(mitigated, turn);
        turn.critical = critical;

        let line = if critical {
            format!("CRITICAL! {} deals {} damage!", boss_name, mitigated)
        } else {
            format!("{} hits you for {} damage.", boss_name, mitigated)
        };
        self.say(turn, line);
    }

    fn execute_ability(&mut self, ability: &BossAbility, turn: &mut TurnResult) {
        match ability.kind {
            AbilityKind::MultiAttack { attacks, damage_mod } => {
                let mut total = 0;
                for _ in 0..attacks {
                    let (_, hit) = self.boss_attack_roll(turn);
                    if hit {
                        let die = self.roll_boss_die();
                        let damage = ((die as f64 * damage_mod).floor() as i32).max(1);
                        total += self.player.mitigate(damage);
                    }
                }
                if total > 0 {
                    self.hit_player(total, turn);
                    self.say(turn, format!("{} hits deal {} total damage!", attacks, total));
                } else {
                    self.say(turn, "All attacks missed!".to_string());
                }
            }
            AbilityKind::Debuff { stat, value, duration } => {
                let effect = StatusEffect::new(
                    ability.name.clone(),
                    EffectKind::Debuff { stat, amount: value },
                    duration,
                );
                self.apply_effect(Side::Player, effect, turn);
                let stat_name = match stat {
                    DebuffStat::Accuracy => "Accuracy",
                    DebuffStat::Damage => "Damage",
                };
                self.say(
                    turn,
                    format!("{} reduced by {} for {} turns!", stat_name, value.abs(), duration),
                );
            }
            AbilityKind::Phase { miss_chance, duration } => {
                let effect =
                    StatusEffect::new(ability.name.clone(), EffectKind::Phase { miss_chance }, duration);
                self.apply_effect(Side::Boss, effect, turn);
                let line = format!("{} phases out of existence!", self.boss.name());
                self.say(turn, line);
            }
            AbilityKind::IgnoreAc => {
                let damage = self.roll_boss_die();
                let mitigated = self.player.mitigate(damage);
                self.hit_player(mitigated, turn);
                self.say(
                    turn,
                    format!("{} ignores armor! {} damage!", ability.name, mitigated),
                );
            }
            AbilityKind::Heal { amount } => {
                let healed = self.boss.combatant.heal(amount);
                turn.events.push(CombatEvent::BossHealed { amount: healed });
                let line = format!("{} heals for {} HP!", self.boss.name(), healed);
                self.say(turn, line);
            }
            AbilityKind::Stun { duration } => {
                let effect = StatusEffect::new(ability.name.clone(), EffectKind::Stun, duration);
                self.apply_effect(Side::Player, effect, turn);
                self.say(turn, format!("You are stunned for {} turn(s)!", duration));
            }
            AbilityKind::Dot { damage, duration } => {
                let effect =
                    StatusEffect::new(ability.name.clone(), EffectKind::Dot { damage }, duration);
                self.apply_effect(Side::Player, effect, turn);
                self.say(
                    turn,
                    format!(
                        "{} will deal {} damage per turn for {} turns!",
                        ability.name, damage, duration
                    ),
                );
            }
            AbilityKind::LockAction { action, duration } => {
                let effect =
                    StatusEffect::new(ability.name.clone(), EffectKind::LockAction { action }, duration);
                self.apply_effect(Side::Player, effect, turn);
                self.say(
                    turn,
                    format!("{} is locked for {} turns!", action_label(action), duration),
                );
            }
            AbilityKind::HeavyAttack { damage_mult } => {
                let (_, hit) = self.boss_attack_roll(turn);
                if hit {
                    let die = self.roll_boss_die();
                    let damage = ((die as f64 * damage_mult).floor() as i32).max(1);
                    let mitigated = self.player.mitigate(damage);
                    self.hit_player(mitigated, turn);
                    self.say(turn, format!("Heavy attack deals {} damage!", mitigated));
                } else {
                    self.say(turn, "Heavy attack misses!".to_string());
                }
            }
            AbilityKind::Unknown => {
                tracing::warn!(ability = %ability.name, "unknown ability type, falling back to a normal attack");
                self.boss_normal_attack(turn);
            }
        }
    }

    fn apply_effect(&mut self, target: Side, effect: StatusEffect, turn: &mut TurnResult) {
        let name = effect.name.clone();
        let effects = match target {
            Side::Player => &mut self.player.combatant.effects,
            Side::Boss => &mut self.boss.combatant.effects,
        };
        if effects.apply(effect) {
            turn.events.push(CombatEvent::EffectApplied { target, name });
        }
    }

    /// DoT, death check, effect tick, defend reset, in that order
    fn end_of_round(&mut self, turn: &mut TurnResult) {
        turn.enter(CombatState::EffectTick);

        let mut ticks = Vec::new();
        turn.dot_damage = self
            .player
            .combatant
            .effects
            .apply_damage_over_time(&mut self.player.combatant.hp, |effect, damage| {
                ticks.push((effect.name.clone(), damage))
            });
        for (name, damage) in ticks {
            self.say(turn, format!("{} deals {} damage!", name, damage));
            turn.events.push(CombatEvent::DamageOverTime { name, damage });
        }

        if !self.player.combatant.is_alive() {
            self.player.combatant.hp = 0;
            self.state = CombatState::Defeat;
            self.say(turn, "You have been defeated!".to_string());
            turn.events.push(CombatEvent::PlayerDefeated);
            tracing::info!(
                score = self.score,
                bosses_defeated = self.bosses_defeated,
                "boss rush lost"
            );
            return;
        }

        let mut expired = Vec::new();
        self.player
            .combatant
            .effects
            .tick_post_turn(|effect| expired.push((Side::Player, effect.clone())));
        self.boss
            .combatant
            .effects
            .tick_post_turn(|effect| expired.push((Side::Boss, effect.clone())));
        for (side, effect) in expired {
            let line = match &effect.kind {
                EffectKind::Stun => "You are no longer stunned!".to_string(),
                EffectKind::LockAction { action } => {
                    format!("{} is no longer locked!", action_label(*action))
                }
                EffectKind::Phase { .. } => format!("{} becomes solid again.", self.boss.name()),
                EffectKind::Dot { .. } => format!("{} fades.", effect.name),
                EffectKind::Debuff { .. } => format!("{} wears off.", effect.name),
            };
            self.say(turn, line);
            turn.events.push(CombatEvent::EffectExpired {
                target: side,
                name: effect.name,
            });
        }

        self.player.stop_defending();
        self.state = CombatState::PlayerTurn;
    }

    // ------------------------------------------------------------------------
    // Bookkeeping
    // ------------------------------------------------------------------------

    fn say(&mut self, turn: &mut TurnResult, line: String) {
        self.log.push(line.clone());
        turn.log_lines.push(line);
    }

    fn finish(&self, mut turn: TurnResult) -> TurnResult {
        turn.enter(self.state);
        turn.new_state = self.state;
        tracing::debug!(
            action = ?turn.action,
            roll = ?turn.roll,
            hit = turn.hit,
            damage = turn.damage_dealt,
            player_hp = self.player.combatant.hp,
            boss_hp = self.boss.combatant.hp,
            state = self.state.as_str(),
            "turn resolved"
        );
        turn
    }
}

fn action_label(action: LockedAction) -> &'static str {
    match action {
        LockedAction::Attack => "Attack",
        LockedAction::Defend => "Defend",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedRoller;
    use crate::stats::{EffectFlags, StatBonuses};

    fn target(name: &str, ac: i32, hp: i32, damage: i32, abilities: Vec<BossAbility>) -> BossTemplate {
        BossTemplate {
            name: name.to_string(),
            base_ac: ac,
            base_hp: hp,
            base_damage: damage,
            attack_bonus: 0,
            abilities,
        }
    }

    fn rush(
        build: CharacterBuild,
        roster: Vec<BossTemplate>,
        rolls: Vec<u32>,
        units: Vec<f64>,
    ) -> BossRush<ScriptedRoller> {
        BossRush::new(build, roster, EncounterRules::default(), ScriptedRoller::new(rolls, units)).unwrap()
    }

    fn strong_build() -> CharacterBuild {
        CharacterBuild::new(StatBonuses { str_: 4, ..Default::default() }, EffectFlags::default())
    }

    #[test]
    fn test_attack_hit_applies_strength() {
        let mut game = rush(strong_build(), vec![target("Wall", 15, 100, 4, vec![])], vec![15, 7], vec![]);

        let turn = game.player_attack().unwrap();
        assert_eq!(turn.roll, Some(15));
        assert_eq!(turn.total, Some(17));
        assert!(turn.hit);
        assert!(!turn.critical);
        assert_eq!(turn.damage_dealt, 9);
        assert!((3..=12).contains(&turn.damage_dealt));
        assert_eq!(game.boss().combatant.hp, 91);
        assert_eq!(game.score(), 18);
        assert_eq!(
            turn.phases,
            vec![
                CombatState::PlayerTurn,
                CombatState::Rolling,
                CombatState::Resolving,
                CombatState::BossTurn
            ]
        );
        assert_eq!(game.state(), CombatState::BossTurn);
    }

    #[test]
    fn test_natural_one_always_misses() {
        let mut game = rush(strong_build(), vec![target("Wall", 5, 100, 4, vec![])], vec![1], vec![]);
        let turn = game.player_attack().unwrap();
        assert!(!turn.hit);
        assert_eq!(game.boss().combatant.hp, 100);
        assert_eq!(game.state(), CombatState::BossTurn);
    }

    #[test]
    fn test_warrior_critical_damage() {
        // 6 * 150% = 9, doubled
        let mut game = rush(
            CharacterBuild::default(),
            vec![target("Fortress", 30, 100, 4, vec![])],
            vec![20, 6],
            vec![],
        );
        let turn = game.player_attack().unwrap();
        assert!(turn.critical);
        assert_eq!(turn.damage_dealt, 18);
    }

    #[test]
    fn test_giant_slayer_rounds_up() {
        let build = CharacterBuild::new(
            StatBonuses { str_: 4, ..Default::default() },
            EffectFlags { giant_slayer: true, ..Default::default() },
        );
        let mut game = rush(build, vec![target("Wall", 10, 100, 4, vec![])], vec![15, 7], vec![]);
        assert_eq!(game.player_attack().unwrap().damage_dealt, 10);
    }

    #[test]
    fn test_defend_lasts_one_boss_action() {
        // 18 misses AC 19 while defending, then hits AC 15
        let mut game = rush(
            CharacterBuild::default(),
            vec![target("Wall", 10, 100, 4, vec![])],
            vec![18, 1, 18, 4],
            vec![0.99, 0.99],
        );

        game.player_defend().unwrap();
        assert_eq!(game.player().effective_ac(), 19);
        let turn = game.boss_turn().unwrap();
        assert!(!turn.hit);
        assert_eq!(game.player().effective_ac(), 15);
        assert!(!game.player().is_defending);

        game.player_attack().unwrap();
        let turn = game.boss_turn().unwrap();
        assert!(turn.hit);
        assert_eq!(game.player().combatant.hp, 18);
    }

    #[test]
    fn test_defend_halves_critical_hit() {
        let mut game = rush(
            CharacterBuild::default(),
            vec![target("Wall", 10, 100, 4, vec![])],
            vec![20, 3],
            vec![0.99],
        );
        game.player_defend().unwrap();
        let turn = game.boss_turn().unwrap();
        assert!(turn.critical);
        assert_eq!(turn.damage_dealt, 3);
        assert_eq!(game.player().combatant.hp, 19);
    }

    #[test]
    fn test_last_boss_defeat_is_victory() {
        let mut game = rush(CharacterBuild::default(), vec![target("Pushover", 5, 5, 4, vec![])], vec![15, 10], vec![]);

        let turn = game.player_attack().unwrap();
        assert_eq!(turn.new_state, CombatState::Victory);
        assert!(turn.events.contains(&CombatEvent::Victory));
        assert_eq!(game.boss().combatant.hp, 0);

        let end = game.encounter_end().unwrap();
        assert_eq!(end.outcome, Outcome::Victory);
        assert_eq!(end.total_xp, 10 * SCORE_PER_DAMAGE + BOSS_BASE_XP);
        assert_eq!(end.enemies_defeated, 1);

        assert!(matches!(
            game.player_attack(),
            Err(SiteRpgError::IllegalAction(IllegalAction::EncounterOver))
        ));
        assert!(game.boss_turn().is_err());
    }

    #[test]
    fn test_boss_defeat_spawns_next() {
        let roster = vec![
            target("First", 5, 5, 4, vec![]),
            target("Second", 5, 5, 4, vec![]),
        ];
        let mut game = rush(CharacterBuild::default(), roster, vec![15, 10, 15, 10], vec![]);

        let turn = game.player_attack().unwrap();
        assert_eq!(turn.new_state, CombatState::PlayerTurn);
        assert!(turn.events.contains(&CombatEvent::BossSpawned {
            index: 1,
            name: "Second".to_string()
        }));
        assert_eq!(game.boss().name(), "Second");
        assert_eq!(game.boss().combatant.hp, 5);
        assert!(game.can_act());
        assert!(game.is_legal(PlayerAction::Attack));

        game.player_attack().unwrap();
        assert_eq!(game.state(), CombatState::Victory);
        assert_eq!(game.score(), 20 + 50 + 20 + 75);
        assert_eq!(game.bosses_defeated(), 2);
    }

    #[test]
    fn test_exactly_zero_hp_is_defeat() {
        let mut game = rush(
            CharacterBuild::default(),
            vec![target("Crusher", 10, 100, 22, vec![])],
            vec![1, 19, 22],
            vec![0.99],
        );
        game.player_attack().unwrap();
        let turn = game.boss_turn().unwrap();
        assert_eq!(turn.damage_dealt, 22);
        assert_eq!(turn.new_state, CombatState::Defeat);
        assert!(turn.events.contains(&CombatEvent::PlayerDefeated));
        assert_eq!(game.player().combatant.hp, 0);

        let log_len = game.log().len();
        assert!(game.player_attack().is_err());
        assert!(game.player_defend().is_err());
        assert_eq!(game.log().len(), log_len);
        assert_eq!(game.summary().outcome, Outcome::Defeat);
    }

    #[test]
    fn test_stun_forces_pass() {
        let stunner = target("Stunner", 10, 100, 4, vec![BossAbility::new("Lag Spike", AbilityKind::Stun { duration: 2 })]);
        let mut game = rush(CharacterBuild::default(), vec![stunner], vec![1, 1, 1], vec![0.1, 0.99]);

        game.player_attack().unwrap();
        let turn = game.boss_turn().unwrap();
        assert_eq!(turn.action, TurnAction::BossAbility { name: "Lag Spike".to_string() });
        assert!(game.is_stunned());
        assert!(!game.can_act());
        assert!(matches!(
            game.player_attack(),
            Err(SiteRpgError::IllegalAction(IllegalAction::Stunned))
        ));
        assert!(game.player_defend().is_err());

        let pass = game.pass_turn().unwrap();
        assert_eq!(pass.action, TurnAction::Pass);
        let turn = game.boss_turn().unwrap();
        assert!(turn.events.contains(&CombatEvent::EffectExpired {
            target: Side::Player,
            name: "Lag Spike".to_string()
        }));
        assert!(game.can_act());
        assert!(matches!(
            game.pass_turn(),
            Err(SiteRpgError::IllegalAction(IllegalAction::PlayerCanAct))
        ));
    }

    #[test]
    fn test_defend_lock_blocks_only_defend() {
        let locker = target(
            "Locker",
            10,
            100,
            4,
            vec![BossAbility::new(
                "Ransomware",
                AbilityKind::LockAction { action: LockedAction::Defend, duration: 2 },
            )],
        );
        let mut game = rush(CharacterBuild::default(), vec![locker], vec![1, 1], vec![0.1]);
        game.player_attack().unwrap();
        game.boss_turn().unwrap();

        assert!(game.defend_locked());
        assert!(game.can_act());
        assert!(!game.is_legal(PlayerAction::Defend));
        assert!(game.is_legal(PlayerAction::Attack));
        assert!(!game.is_legal(PlayerAction::Pass));
    }

    #[test]
    fn test_phase_turns_hit_into_miss() {
        let wraith = target(
            "Wraith",
            10,
            100,
            4,
            vec![BossAbility::new("Phase Shift", AbilityKind::Phase { miss_chance: 50, duration: 2 })],
        );
        let mut game = rush(CharacterBuild::default(), vec![wraith], vec![1, 1, 19], vec![0.1, 0.3]);
        game.player_attack().unwrap();
        game.boss_turn().unwrap();
        assert_eq!(game.boss().combatant.effects.phase_miss_chance(), Some(50));

        let turn = game.player_attack().unwrap();
        assert!(!turn.hit);
        assert!(turn.events.contains(&CombatEvent::Phased));
        assert_eq!(game.boss().combatant.hp, 100);
    }

    #[test]
    fn test_dot_ticks_before_expiring() {
        let dragon = target(
            "Dragon",
            10,
            100,
            4,
            vec![BossAbility::new("Virus Injection", AbilityKind::Dot { damage: 3, duration: 2 })],
        );
        let mut game = rush(CharacterBuild::default(), vec![dragon], vec![1, 1, 1, 1], vec![0.1, 0.99]);

        game.player_attack().unwrap();
        let first = game.boss_turn().unwrap();
        assert_eq!(first.dot_damage, 3);
        assert_eq!(game.player().combatant.hp, 19);

        game.player_attack().unwrap();
        let second = game.boss_turn().unwrap();
        assert_eq!(second.dot_damage, 3);
        assert_eq!(game.player().combatant.hp, 16);
        assert!(game.player().combatant.effects.is_empty());
    }

    #[test]
    fn test_illegal_actions_leave_state_untouched() {
        let mut game = rush(CharacterBuild::default(), vec![target("Wall", 10, 100, 4, vec![])], vec![1], vec![]);
        assert!(matches!(
            game.boss_turn(),
            Err(SiteRpgError::IllegalAction(IllegalAction::NotBossTurn))
        ));

        game.player_attack().unwrap();
        let log_len = game.log().len();
        let remaining = game.roller.remaining();
        assert!(matches!(
            game.player_attack(),
            Err(SiteRpgError::IllegalAction(IllegalAction::NotPlayerTurn))
        ));
        assert!(game.pass_turn().is_err());
        assert_eq!(game.log().len(), log_len);
        assert_eq!(game.roller.remaining(), remaining);
        assert_eq!(game.state(), CombatState::BossTurn);
    }

    #[test]
    fn test_boss_heal_is_capped() {
        let snail = target("Snail", 10, 40, 3, vec![BossAbility::new("Buffer Overflow", AbilityKind::Heal { amount: 10 })]);
        let mut game = rush(CharacterBuild::default(), vec![snail], vec![15, 4, 1], vec![0.1]);
        game.player_attack().unwrap();
        assert_eq!(game.boss().combatant.hp, 36);
        let turn = game.boss_turn().unwrap();
        assert!(turn.events.contains(&CombatEvent::BossHealed { amount: 4 }));
        assert_eq!(game.boss().combatant.hp, 40);
    }

    #[test]
    fn test_unknown_ability_falls_back_to_attack() {
        let odd = target("Odd", 10, 100, 4, vec![BossAbility::new("Glitch", AbilityKind::Unknown)]);
        let mut game = rush(CharacterBuild::default(), vec![odd], vec![1, 1, 19, 3], vec![0.1]);
        game.player_attack().unwrap();
        let turn = game.boss_turn().unwrap();
        assert!(turn.hit);
        assert_eq!(game.player().combatant.hp, 19);
    }

    #[test]
    fn test_empty_roster_rejected() {
        let result = BossRush::new(
            CharacterBuild::default(),
            Vec::new(),
            EncounterRules::default(),
            ScriptedRoller::rolls(Vec::<u32>::new()),
        );
        assert!(matches!(result, Err(SiteRpgError::EmptyRoster)));
    }

    #[test]
    fn test_log_is_bounded() {
        let rules = EncounterRules { log_capacity: 3, ..Default::default() };
        let mut game = BossRush::new(
            CharacterBuild::default(),
            vec![target("Wall", 10, 100, 4, vec![])],
            rules,
            ScriptedRoller::rolls(Vec::<u32>::new()),
        )
        .unwrap();
        for _ in 0..5 {
            if game.is_over() {
                break;
            }
            game.player_attack().unwrap();
            if game.is_over() {
                break;
            }
            game.boss_turn().unwrap();
        }
        assert!(game.log().len() <= 3);
    }

    #[test]
    fn test_summary_in_progress_is_abandoned() {
        let game = BossRush::with_seed(CharacterBuild::default(), Some(3)).unwrap();
        assert!(game.encounter_end().is_none());
        assert_eq!(game.summary().outcome, Outcome::Abandoned);
        assert_eq!(game.boss_count(), 5);
    }
}
