//! Hack & Slash: survive five waves of enemies walking in from the right

use std::collections::VecDeque;

use super::{ArcadeEvent, ArcadeState, FrameInput, ARENA_HEIGHT, ARENA_WIDTH};
use crate::config::{ArcadeDifficulty, CharacterBuild};
use crate::dice::{GameRng, Roller};
use crate::error::{IllegalAction, Result};
use crate::outcome::EncounterEnd;
use crate::stats::{half_bonus, percent_ceil, percent_floor, round_half_up, xp_multiplier, Stat};

pub const TOTAL_WAVES: u32 = 5;
/// Frames between spawns at normal difficulty
pub const SPAWN_INTERVAL: u32 = 50;
/// Pause between waves
pub const WAVE_TRANSITION_FRAMES: u32 = 90;
pub const INVULNERABLE_FRAMES: u32 = 60;
pub const ATTACK_ANIMATION_FRAMES: u32 = 15;
pub const ATTACK_REACH: f64 = 45.0;
pub const PLAYER_WIDTH: f64 = 24.0;
pub const KNOCKBACK_FRAMES: u32 = 5;

const PLAYER_START_X: f64 = 60.0;
const EDGE_MARGIN: f64 = 20.0;
const ATTACK_HEIGHT: f64 = 35.0;
const KNOCKBACK_SPEED: f64 = 5.0;
const DRIFT_SPEED: f64 = 0.5;

const WAVE_POOL: [EnemyKind; 5] = [
    EnemyKind::SpamBot,
    EnemyKind::SpamBot,
    EnemyKind::SpamBot,
    EnemyKind::Phantom404,
    EnemyKind::Goblin,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    SpamBot,
    Phantom404,
    Goblin,
    /// Final-wave boss
    Dragon,
}

/// Base numbers for an enemy kind before difficulty scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyProfile {
    pub hp: i32,
    pub xp: i32,
    pub speed: f64,
    pub size: f64,
    pub boss: bool,
}

impl EnemyKind {
    pub fn profile(&self) -> EnemyProfile {
        match self {
            EnemyKind::SpamBot => EnemyProfile { hp: 1, xp: 5, speed: 1.5, size: 24.0, boss: false },
            EnemyKind::Phantom404 => EnemyProfile { hp: 2, xp: 10, speed: 2.0, size: 28.0, boss: false },
            EnemyKind::Goblin => EnemyProfile { hp: 1, xp: 8, speed: 3.0, size: 22.0, boss: false },
            EnemyKind::Dragon => EnemyProfile { hp: 10, xp: 100, speed: 0.8, size: 48.0, boss: true },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::SpamBot => "spam_bot",
            EnemyKind::Phantom404 => "phantom_404",
            EnemyKind::Goblin => "goblin",
            EnemyKind::Dragon => "dragon",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub hp: i32,
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub size: f64,
    pub knockback: u32,
}

/// Player numbers derived once from the build
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FighterStats {
    pub max_health: i32,
    pub speed: f64,
    pub attack_cooldown: u32,
    pub damage: i32,
}

impl FighterStats {
    pub fn derive(build: &CharacterBuild, difficulty: &ArcadeDifficulty) -> Self {
        let bonuses = &build.bonuses;
        let effects = &build.effects;

        let max_health =
            (difficulty.player_health + effects.health_flags() + half_bonus(bonuses.sta)).max(1);

        let swift = if effects.swift_movement { 1.0 } else { 0.0 };
        let speed = (4.0 + swift + bonuses.agi as f64 * 0.2).max(2.0);

        let mut cooldown = 20 - bonuses.int;
        if effects.script_mastery {
            cooldown = percent_floor(cooldown, 85);
        }

        let mut damage = (1 + bonuses.half(Stat::Strength)).max(1);
        if effects.power_strike {
            damage = percent_ceil(damage, 115);
        }

        Self {
            max_health,
            speed,
            attack_cooldown: cooldown.max(10) as u32,
            damage,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fighter {
    pub x: f64,
    pub y: f64,
    /// 1 facing right, -1 facing left
    pub facing: i8,
    pub health: i32,
    pub attack_cooldown: u32,
    /// Frames into the current swing, if swinging
    pub attack_frame: Option<u32>,
    pub invulnerable: u32,
}

/// Frame-stepped Hack & Slash session
#[derive(Debug, Clone)]
pub struct HackSlash<R: Roller = GameRng> {
    build: CharacterBuild,
    difficulty: ArcadeDifficulty,
    stats: FighterStats,
    player: Fighter,
    enemies: Vec<Enemy>,
    to_spawn: VecDeque<EnemyKind>,
    spawn_timer: u32,
    spawn_interval: u32,
    wave: u32,
    transition_timer: u32,
    score: i32,
    kills: u32,
    frame: u64,
    state: ArcadeState,
    roller: R,
}

impl HackSlash<GameRng> {
    pub fn with_seed(build: CharacterBuild, seed: Option<u64>) -> Self {
        Self::new(build, GameRng::from_seed_opt(seed))
    }
}

impl<R: Roller> HackSlash<R> {
    pub fn new(build: CharacterBuild, roller: R) -> Self {
        let difficulty = build.difficulty.arcade();
        let stats = FighterStats::derive(&build, &difficulty);
        let spawn_interval = round_half_up(SPAWN_INTERVAL as f64 * difficulty.spawn_rate_mult).max(1) as u32;

        let mut game = Self {
            build,
            difficulty,
            stats,
            player: Fighter {
                x: PLAYER_START_X,
                y: ARENA_HEIGHT / 2.0,
                facing: 1,
                health: stats.max_health,
                attack_cooldown: 0,
                attack_frame: None,
                invulnerable: 0,
            },
            enemies: Vec::new(),
            to_spawn: VecDeque::new(),
            spawn_timer: 0,
            spawn_interval,
            wave: 1,
            transition_timer: 0,
            score: 0,
            kills: 0,
            frame: 0,
            state: ArcadeState::Running,
            roller,
        };
        game.setup_wave();
        tracing::info!(
            health = stats.max_health,
            damage = stats.damage,
            cooldown = stats.attack_cooldown,
            "hack and slash started"
        );
        game
    }

    pub fn stats(&self) -> &FighterStats {
        &self.stats
    }

    pub fn player(&self) -> &Fighter {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn pending_spawns(&self) -> usize {
        self.to_spawn.len()
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn state(&self) -> ArcadeState {
        self.state
    }

    pub fn is_in_transition(&self) -> bool {
        self.transition_timer > 0
    }

    /// Place an enemy directly, bypassing the spawn queue
    pub fn spawn_enemy_at(&mut self, kind: EnemyKind, x: f64, y: f64) {
        let profile = kind.profile();
        self.enemies.push(Enemy {
            kind,
            hp: round_half_up(profile.hp as f64 * self.difficulty.enemy_hp_mult).max(1),
            x,
            y,
            speed: profile.speed * self.difficulty.enemy_speed_mult,
            size: profile.size,
            knockback: 0,
        });
    }

    /// Quit mid-game
    pub fn abandon(&mut self) -> EncounterEnd {
        if !self.state.is_over() {
            self.state = ArcadeState::Abandoned;
        }
        self.summary()
    }

    pub fn summary(&self) -> EncounterEnd {
        EncounterEnd {
            outcome: self.state.outcome(),
            total_xp: self.score,
            enemies_defeated: self.kills,
        }
    }

    /// Advance one frame
    pub fn step(&mut self, input: FrameInput) -> Result<Vec<ArcadeEvent>> {
        if self.state.is_over() {
            return Err(IllegalAction::EncounterOver.into());
        }
        self.frame += 1;
        let mut events = Vec::new();

        if self.transition_timer > 0 {
            self.transition_timer -= 1;
            if self.transition_timer == 0 {
                self.setup_wave();
                events.push(ArcadeEvent::WaveStarted {
                    wave: self.wave,
                    enemies: self.to_spawn.len(),
                });
            }
            return Ok(events);
        }

        if input.attack && self.player.attack_cooldown == 0 {
            self.attack(&mut events);
        }
        self.spawn_enemies(&mut events);
        self.update(input, &mut events);

        if !self.state.is_over() && self.enemies.is_empty() && self.to_spawn.is_empty() {
            self.complete_wave(&mut events);
        }
        Ok(events)
    }

    fn setup_wave(&mut self) {
        let count = 3 + 2 * self.wave as usize;
        let pool = (self.wave as usize + 1).min(WAVE_POOL.len());
        self.to_spawn.clear();
        for _ in 0..count {
            let pick = self.roller.pick(pool);
            self.to_spawn.push_back(WAVE_POOL[pick]);
        }
        if self.wave == TOTAL_WAVES {
            self.to_spawn.push_back(EnemyKind::Dragon);
        }
        self.spawn_timer = 0;
        tracing::debug!(wave = self.wave, enemies = self.to_spawn.len(), "wave set up");
    }

    fn spawn_enemies(&mut self, events: &mut Vec<ArcadeEvent>) {
        if self.to_spawn.is_empty() {
            return;
        }
        self.spawn_timer += 1;
        if self.spawn_timer < self.spawn_interval {
            return;
        }
        self.spawn_timer = 0;
        if let Some(kind) = self.to_spawn.pop_front() {
            let size = kind.profile().size;
            let y = self.roller.unit() * (ARENA_HEIGHT - size * 2.0) + size;
            self.spawn_enemy_at(kind, ARENA_WIDTH + size, y);
            events.push(ArcadeEvent::EnemySpawned { kind: kind.as_str() });
        }
    }

    fn update(&mut self, input: FrameInput, events: &mut Vec<ArcadeEvent>) {
        let speed = self.stats.speed;
        let mut dx = 0.0;
        let mut dy = 0.0;
        if input.up {
            dy = -speed;
        }
        if input.down {
            dy = speed;
        }
        if input.left {
            dx = -speed;
            self.player.facing = -1;
        }
        if input.right {
            dx = speed;
            self.player.facing = 1;
        }
        self.player.x = (self.player.x + dx).clamp(EDGE_MARGIN, ARENA_WIDTH * 0.6);
        self.player.y = (self.player.y + dy).clamp(EDGE_MARGIN, ARENA_HEIGHT - EDGE_MARGIN);

        self.player.attack_cooldown = self.player.attack_cooldown.saturating_sub(1);
        self.player.invulnerable = self.player.invulnerable.saturating_sub(1);
        if let Some(frame) = self.player.attack_frame {
            self.player.attack_frame = (frame + 1 < ATTACK_ANIMATION_FRAMES).then_some(frame + 1);
        }

        let mut i = self.enemies.len();
        while i > 0 {
            i -= 1;
            let enemy = &mut self.enemies[i];
            if enemy.knockback > 0 {
                enemy.x += KNOCKBACK_SPEED;
                enemy.knockback -= 1;
                continue;
            }
            enemy.x -= enemy.speed;
            let toward = self.player.y - enemy.y;
            if toward != 0.0 {
                enemy.y += toward.signum() * DRIFT_SPEED;
            }

            let touching = {
                let dist = (enemy.x - self.player.x).hypot(enemy.y - self.player.y);
                dist < (enemy.size + PLAYER_WIDTH) / 2.0
            };
            let escaped = enemy.x < -enemy.size;
            let kind = enemy.kind;

            if self.player.invulnerable == 0 && touching {
                self.player_hit(events);
                if self.state.is_over() {
                    return;
                }
            }
            if escaped {
                self.enemies.remove(i);
                events.push(ArcadeEvent::EnemyEscaped { kind: kind.as_str() });
            }
        }
    }

    fn attack(&mut self, events: &mut Vec<ArcadeEvent>) {
        self.player.attack_frame = Some(0);
        self.player.attack_cooldown = self.stats.attack_cooldown;

        let attack_x = if self.player.facing == 1 {
            self.player.x
        } else {
            self.player.x - ATTACK_REACH
        };
        let xp_mult = xp_multiplier(self.build.bonuses.wis, &self.build.effects);

        let mut i = self.enemies.len();
        while i > 0 {
            i -= 1;
            let enemy = &mut self.enemies[i];
            let in_reach = enemy.x > attack_x
                && enemy.x < attack_x + ATTACK_REACH + PLAYER_WIDTH
                && (enemy.y - self.player.y).abs() < ATTACK_HEIGHT;
            if !in_reach {
                continue;
            }

            let profile = enemy.kind.profile();
            let mut damage = self.stats.damage;
            if self.build.effects.giant_slayer && profile.boss {
                damage = percent_ceil(damage, 110);
            }
            enemy.hp -= damage;
            enemy.knockback = KNOCKBACK_FRAMES;
            let kind = enemy.kind;
            events.push(ArcadeEvent::EnemyHit { kind: kind.as_str(), damage });

            if enemy.hp <= 0 {
                let xp = round_half_up(profile.xp as f64 * xp_mult);
                self.score += xp;
                self.kills += 1;
                self.enemies.remove(i);
                events.push(ArcadeEvent::EnemyKilled { kind: kind.as_str(), xp });
                tracing::debug!(kind = kind.as_str(), xp, score = self.score, "enemy killed");
            }
        }
    }

    fn player_hit(&mut self, events: &mut Vec<ArcadeEvent>) {
        self.player.health -= 1;
        self.player.invulnerable = INVULNERABLE_FRAMES;
        events.push(ArcadeEvent::PlayerHit {
            health: self.player.health,
        });
        if self.player.health <= 0 {
            self.player.health = 0;
            self.state = ArcadeState::Defeat;
            events.push(ArcadeEvent::GameOver {
                outcome: self.state.outcome(),
            });
            tracing::info!(wave = self.wave, score = self.score, "hack and slash lost");
        }
    }

    fn complete_wave(&mut self, events: &mut Vec<ArcadeEvent>) {
        let bonus = 10 * self.wave as i32;
        self.score += bonus;
        events.push(ArcadeEvent::WaveCleared { wave: self.wave, bonus });

        if self.wave >= TOTAL_WAVES {
            self.state = ArcadeState::Victory;
            events.push(ArcadeEvent::GameOver {
                outcome: self.state.outcome(),
            });
            tracing::info!(score = self.score, kills = self.kills, "hack and slash won");
        } else {
            self.wave += 1;
            self.transition_timer = WAVE_TRANSITION_FRAMES;
        }
    }
}
