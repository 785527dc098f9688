//! Runner: jump obstacles, grab collectibles, go as far as possible

use super::{ArcadeEvent, ArcadeState, FrameInput, ARENA_HEIGHT, ARENA_WIDTH};
use crate::config::CharacterBuild;
use crate::dice::{GameRng, Roller};
use crate::error::{IllegalAction, Result};
use crate::outcome::EncounterEnd;
use crate::stats::{round_half_up, xp_multiplier};

pub const GRAVITY: f64 = 0.8;
pub const GROUND_Y: f64 = ARENA_HEIGHT - 80.0;
pub const PLAYER_X: f64 = 80.0;
pub const START_SPEED: f64 = 3.0;
pub const MAX_SPEED: f64 = 6.0;
/// Frames after take-off during which a double jump is allowed
pub const DOUBLE_JUMP_WINDOW: u32 = 30;
pub const DODGE_CHANCE: f64 = 0.10;

const OBSTACLE_WIDTH: f64 = 30.0;
const OBSTACLE_CADENCE: f64 = 120.0;
const OBSTACLE_RAMP_CAP: f64 = 50.0;
const PLAYER_HALF_WIDTH: f64 = 15.0;
const PICKUP_REACH_X: f64 = 30.0;
const PICKUP_REACH_Y: f64 = 40.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Collectible {
    pub x: f64,
    pub y: f64,
    pub points: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Jumper {
    pub y: f64,
    pub velocity_y: f64,
    pub airborne: bool,
    pub can_double_jump: bool,
    /// Frames since the first jump left the ground
    pub air_frames: u32,
}

/// Frame-stepped Runner session
#[derive(Debug, Clone)]
pub struct Runner<R: Roller = GameRng> {
    build: CharacterBuild,
    player: Jumper,
    jump_velocity: f64,
    double_jump_velocity: f64,
    double_jump_window: u32,
    shield_charges: u32,
    obstacles: Vec<Obstacle>,
    collectibles: Vec<Collectible>,
    distance: f64,
    speed: f64,
    obstacle_timer: u32,
    collectible_timer: u32,
    collectible_cadence: u32,
    collected_points: i32,
    obstacles_passed: u32,
    frame: u64,
    state: ArcadeState,
    roller: R,
}

/// Charges that absorb an obstacle hit
pub fn shield_charges(build: &CharacterBuild) -> u32 {
    let base = (build.bonuses.sta >= 0) as u32;
    base + build.effects.health_flags() as u32
}

impl Runner<GameRng> {
    pub fn with_seed(build: CharacterBuild, seed: Option<u64>) -> Self {
        Self::new(build, GameRng::from_seed_opt(seed))
    }
}

impl<R: Roller> Runner<R> {
    pub fn new(build: CharacterBuild, roller: R) -> Self {
        let agi = build.bonuses.agi as f64;
        let double_jump_window = if build.effects.quick_reflexes {
            DOUBLE_JUMP_WINDOW * 6 / 5
        } else {
            DOUBLE_JUMP_WINDOW
        };
        let shields = shield_charges(&build);
        let collectible_cadence = (100 - build.bonuses.int * 4).max(60) as u32;

        tracing::info!(shields, double_jump_window, collectible_cadence, "runner started");
        Self {
            jump_velocity: -15.0 - agi * 0.25,
            double_jump_velocity: -12.0 - agi * 0.2,
            double_jump_window,
            shield_charges: shields,
            collectible_cadence,
            build,
            player: Jumper {
                y: GROUND_Y,
                velocity_y: 0.0,
                airborne: false,
                can_double_jump: true,
                air_frames: 0,
            },
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            distance: 0.0,
            speed: START_SPEED,
            obstacle_timer: 0,
            collectible_timer: 0,
            collected_points: 0,
            obstacles_passed: 0,
            frame: 0,
            state: ArcadeState::Running,
            roller,
        }
    }

    pub fn player(&self) -> &Jumper {
        &self.player
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn shield_charges(&self) -> u32 {
        self.shield_charges
    }

    pub fn obstacles_passed(&self) -> u32 {
        self.obstacles_passed
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn state(&self) -> ArcadeState {
        self.state
    }

    /// Whole meters run plus collected points
    pub fn score(&self) -> i32 {
        self.distance.floor() as i32 + self.collected_points
    }

    pub fn place_obstacle(&mut self, x: f64, height: f64) {
        self.obstacles.push(Obstacle {
            x,
            y: GROUND_Y - height + 40.0,
            width: OBSTACLE_WIDTH,
            height,
        });
    }

    pub fn place_collectible(&mut self, x: f64, y: f64, points: i32) {
        self.collectibles.push(Collectible { x, y, points });
    }

    pub fn abandon(&mut self) -> EncounterEnd {
        if !self.state.is_over() {
            self.state = ArcadeState::Abandoned;
        }
        self.summary()
    }

    pub fn summary(&self) -> EncounterEnd {
        EncounterEnd {
            outcome: self.state.outcome(),
            total_xp: self.score(),
            enemies_defeated: self.obstacles_passed,
        }
    }

    /// Jump from the ground, or double jump while the window is open
    ///
    /// Returns whether the jump happened.
    pub fn jump(&mut self) -> bool {
        let player = &mut self.player;
        if !player.airborne {
            player.velocity_y = self.jump_velocity;
            player.airborne = true;
            player.can_double_jump = true;
            player.air_frames = 0;
            true
        } else if player.can_double_jump && player.air_frames <= self.double_jump_window {
            player.velocity_y = self.double_jump_velocity;
            player.can_double_jump = false;
            true
        } else {
            false
        }
    }

    /// Advance one frame; only `input.jump` is read
    pub fn step(&mut self, input: FrameInput) -> Result<Vec<ArcadeEvent>> {
        if self.state.is_over() {
            return Err(IllegalAction::EncounterOver.into());
        }
        self.frame += 1;
        let mut events = Vec::new();

        if input.jump {
            self.jump();
        }
        self.apply_gravity();

        self.distance += self.speed * 0.1;
        self.speed = (START_SPEED + self.distance * 0.005).min(MAX_SPEED);

        self.spawn_obstacle();
        self.spawn_collectible();
        self.move_obstacles();
        self.move_collectibles(&mut events);
        self.check_collisions(&mut events);
        Ok(events)
    }

    fn apply_gravity(&mut self) {
        let player = &mut self.player;
        player.velocity_y += GRAVITY;
        player.y += player.velocity_y;
        if player.airborne {
            player.air_frames += 1;
        }
        if player.y >= GROUND_Y {
            player.y = GROUND_Y;
            player.velocity_y = 0.0;
            player.airborne = false;
        }
    }

    fn spawn_obstacle(&mut self) {
        self.obstacle_timer += 1;
        let cadence = OBSTACLE_CADENCE - (self.distance * 0.05).min(OBSTACLE_RAMP_CAP);
        if (self.obstacle_timer as f64) <= cadence {
            return;
        }
        self.obstacle_timer = 0;
        let height = 25.0 + self.roller.unit() * 25.0;
        self.place_obstacle(ARENA_WIDTH, height);
    }

    fn spawn_collectible(&mut self) {
        self.collectible_timer += 1;
        if self.collectible_timer <= self.collectible_cadence {
            return;
        }
        self.collectible_timer = 0;
        let base = 9 + self.roller.roll(20) as i32;
        let points = round_half_up(base as f64 * xp_multiplier(self.build.bonuses.wis, &self.build.effects));
        let y = GROUND_Y - 60.0 - self.roller.unit() * 80.0;
        self.place_collectible(ARENA_WIDTH, y, points);
    }

    fn move_obstacles(&mut self) {
        let speed = self.speed;
        let before = self.obstacles.len();
        self.obstacles.retain_mut(|o| {
            o.x -= speed;
            o.x >= -50.0
        });
        self.obstacles_passed += (before - self.obstacles.len()) as u32;
    }

    fn move_collectibles(&mut self, events: &mut Vec<ArcadeEvent>) {
        let speed = self.speed;
        let player_y = self.player.y;
        let mut gained = 0;
        self.collectibles.retain_mut(|c| {
            c.x -= speed;
            if (c.x - PLAYER_X).abs() < PICKUP_REACH_X && (c.y - (player_y - 20.0)).abs() < PICKUP_REACH_Y {
                gained += c.points;
                events.push(ArcadeEvent::Collected { points: c.points });
                return false;
            }
            c.x >= -30.0
        });
        self.collected_points += gained;
    }

    fn check_collisions(&mut self, events: &mut Vec<ArcadeEvent>) {
        let player_y = self.player.y;
        let mut i = 0;
        while i < self.obstacles.len() {
            let o = &self.obstacles[i];
            let touching =
                PLAYER_X + PLAYER_HALF_WIDTH > o.x && PLAYER_X - PLAYER_HALF_WIDTH < o.x + o.width && player_y > o.y - 20.0;
            if !touching {
                i += 1;
                continue;
            }

            if self.build.effects.cache_spirit && self.roller.chance(DODGE_CHANCE) {
                self.obstacles.remove(i);
                events.push(ArcadeEvent::Dodged);
                continue;
            }
            if self.shield_charges > 0 {
                self.shield_charges -= 1;
                self.obstacles.remove(i);
                events.push(ArcadeEvent::ShieldAbsorbed {
                    remaining: self.shield_charges,
                });
                tracing::debug!(remaining = self.shield_charges, "shield absorbed obstacle");
                return;
            }

            self.state = ArcadeState::Defeat;
            events.push(ArcadeEvent::PlayerHit { health: 0 });
            events.push(ArcadeEvent::GameOver {
                outcome: self.state.outcome(),
            });
            tracing::info!(distance = self.distance, score = self.score(), "runner crashed");
            return;
        }
    }
}
