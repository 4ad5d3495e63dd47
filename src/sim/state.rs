//! World state and core simulation types
//!
//! Everything one run mutates lives in [`World`]; the engine owns exactly one.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, obstacle_hitbox};
use super::events::GameEvent;
use super::spawner::Spawner;
use crate::config::EngineConfig;
use crate::consts::*;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunPhase {
    /// Nothing moving, waiting for the first start
    #[default]
    Idle,
    /// Ticks are advancing the world
    Running,
    /// Ticks suspended, state frozen
    Paused,
    /// Player hit an obstacle; terminal until restarted
    Ended,
}

/// The runner. Only moves vertically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner; x never changes
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity per tick (negative is up)
    pub vel_y: f32,
    pub airborne: bool,
    /// Resting y of the player's top edge
    pub ground_y: f32,
    /// Jump button still down since the jump started
    pub jump_held: bool,
    /// How long the current jump has been held (ms)
    pub hold_ms: f32,
}

impl Player {
    pub fn new(ground_y: f32) -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, ground_y),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            vel_y: 0.0,
            airborne: false,
            ground_y,
            jump_held: false,
            hold_ms: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Start a jump. Returns false (and changes nothing) while airborne.
    pub fn jump(&mut self, jump_velocity: f32) -> bool {
        if self.airborne {
            return false;
        }
        self.vel_y = jump_velocity;
        self.airborne = true;
        self.jump_held = true;
        self.hold_ms = 0.0;
        true
    }

    pub fn release_jump(&mut self) {
        self.jump_held = false;
    }

    /// One physics step. Gravity is a fixed per-tick increment; `dt_ms`
    /// only feeds the hold timer.
    pub fn step(&mut self, config: &EngineConfig, dt_ms: f32) {
        let holding =
            self.jump_held && self.vel_y < 0.0 && self.hold_ms < config.max_jump_hold_ms;
        let gravity = if holding {
            config.gravity * config.jump_hold_gravity_scale
        } else {
            config.gravity
        };
        if self.jump_held {
            self.hold_ms += dt_ms;
        }

        self.vel_y += gravity;
        self.pos.y += self.vel_y;

        if self.pos.y >= self.ground_y {
            self.land();
        }
    }

    fn land(&mut self) {
        self.pos.y = self.ground_y;
        self.vel_y = 0.0;
        self.airborne = false;
        self.jump_held = false;
        self.hold_ms = 0.0;
    }

    /// Move the ground (surface resized). A grounded player stays on it.
    pub fn set_ground(&mut self, ground_y: f32) {
        self.ground_y = ground_y;
        if !self.airborne || self.pos.y >= ground_y {
            self.land();
        }
    }
}

/// Obstacle size classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleSize {
    Small,
    Medium,
    Large,
}

impl ObstacleSize {
    /// Drawn width and height
    pub fn dimensions(self) -> Vec2 {
        match self {
            ObstacleSize::Small => Vec2::new(30.0, 40.0),
            ObstacleSize::Medium => Vec2::new(40.0, 60.0),
            ObstacleSize::Large => Vec2::new(55.0, 80.0),
        }
    }

    /// Map a roll in 0..100 onto the 55/30/15 class weights
    pub fn from_roll(roll: u32) -> Self {
        match roll {
            0..55 => ObstacleSize::Small,
            55..85 => ObstacleSize::Medium,
            _ => ObstacleSize::Large,
        }
    }
}

/// Something to jump over; touching its hitbox ends the run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub class: ObstacleSize,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn hitbox(&self) -> Rect {
        obstacle_hitbox(&self.rect())
    }

    /// Trailing edge has passed the left boundary
    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.size.x <= 0.0
    }
}

/// A pickup worth `COIN_POINTS`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub collected: bool,
}

impl Coin {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.size.x <= 0.0
    }
}

/// What spawned a visual effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    CoinSparkle,
    Crash,
}

/// A cosmetic spark (never affects gameplay)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub pos: Vec2,
    /// Units per 16ms frame
    pub vel: Vec2,
    /// 1.0 at spawn, removed at 0
    pub life: f32,
    pub size: f32,
}

/// Maximum live effects
pub const MAX_EFFECTS: usize = 128;
/// Lifetime of one spark (ms)
pub const EFFECT_LIFETIME_MS: f32 = 400.0;

/// Read-only view of a run, polled by presentation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub is_playing: bool,
    pub is_paused: bool,
    pub is_game_over: bool,
    pub score: u64,
    pub coins: u32,
    pub distance: f32,
    pub speed: f32,
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct World {
    pub config: EngineConfig,
    rng: Pcg32,
    pub phase: RunPhase,
    /// Surface dimensions
    pub width: f32,
    pub height: f32,
    pub player: Player,
    /// Live obstacles, insertion order
    pub obstacles: Vec<Obstacle>,
    /// Live coins, insertion order
    pub coins: Vec<Coin>,
    pub effects: Vec<Effect>,
    pub score: u64,
    pub coins_collected: u32,
    pub distance: f32,
    pub speed: f32,
    /// Run time since start, excluding pauses (ms)
    pub elapsed_ms: f32,
    pub time_ticks: u64,
    pub spawner: Spawner,
    /// Events raised by the current tick, drained by the engine
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl World {
    pub fn new(config: EngineConfig, width: f32, height: f32) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let ground_y = Self::ground_for_height(height);
        let speed = config.initial_speed;

        Self {
            config,
            rng: Pcg32::seed_from_u64(seed),
            phase: RunPhase::Idle,
            width,
            height,
            player: Player::new(ground_y),
            obstacles: Vec::new(),
            coins: Vec::new(),
            effects: Vec::new(),
            score: 0,
            coins_collected: 0,
            distance: 0.0,
            speed,
            elapsed_ms: 0.0,
            time_ticks: 0,
            spawner: Spawner::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Resting top edge of the player for a surface of this height
    pub fn ground_for_height(height: f32) -> f32 {
        height - GROUND_HEIGHT - PLAYER_HEIGHT
    }

    /// y of the line obstacles stand on
    pub fn floor_y(&self) -> f32 {
        self.player.ground_y + PLAYER_HEIGHT
    }

    /// y of a freshly spawned coin's top edge
    pub fn coin_y(&self) -> f32 {
        self.player.ground_y - COIN_ELEVATION
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Wipe the run back to its opening state and enter `Running`
    pub fn reset_for_run(&mut self) {
        let ground_y = self.player.ground_y;
        self.player = Player::new(ground_y);
        self.obstacles.clear();
        self.coins.clear();
        self.effects.clear();
        self.events.clear();
        self.score = 0;
        self.coins_collected = 0;
        self.distance = 0.0;
        self.speed = self.config.initial_speed;
        self.elapsed_ms = 0.0;
        self.time_ticks = 0;
        self.spawner = Spawner::default();
        self.phase = RunPhase::Running;
    }

    /// Adopt new surface dimensions and re-seat everything on the new ground
    pub fn set_bounds(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.player.set_ground(Self::ground_for_height(height));

        let floor = self.floor_y();
        for obstacle in &mut self.obstacles {
            obstacle.pos.y = floor - obstacle.size.y;
        }
        let coin_y = self.coin_y();
        for coin in &mut self.coins {
            coin.pos.y = coin_y;
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            is_playing: matches!(self.phase, RunPhase::Running | RunPhase::Paused),
            is_paused: self.phase == RunPhase::Paused,
            is_game_over: self.phase == RunPhase::Ended,
            score: self.score,
            coins: self.coins_collected,
            distance: self.distance,
            speed: self.speed,
        }
    }

    /// Score derived from distance and coins
    pub fn compute_score(&self) -> u64 {
        (self.distance / DISTANCE_PER_POINT).floor() as u64
            + self.coins_collected as u64 * COIN_POINTS
    }

    /// Burst of sparks around `center`
    pub fn spawn_effect_burst(&mut self, kind: EffectKind, center: Vec2, count: usize) {
        for _ in 0..count {
            if self.effects.len() >= MAX_EFFECTS {
                // Drop the oldest to make room
                self.effects.remove(0);
            }
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = self.rng.random_range(1.0f32..4.0);
            let size = self.rng.random_range(2.0f32..5.0);
            self.effects.push(Effect {
                kind,
                pos: center,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: 1.0,
                size,
            });
        }
    }

    /// Age and move effects; removes the dead ones
    pub fn advance_effects(&mut self, dt_ms: f32) {
        let frames = dt_ms / FRAME_MS;
        for effect in &mut self.effects {
            effect.pos += effect.vel * frames;
            effect.vel *= 0.92;
            effect.life -= dt_ms / EFFECT_LIFETIME_MS;
        }
        self.effects.retain(|e| e.life > 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> EngineConfig {
        EngineConfig {
            seed: Some(7),
            ..Default::default()
        }
    }

    #[test]
    fn test_jump_integrates_linearly() {
        let config = EngineConfig::default();
        let mut player = Player::new(280.0);
        assert!(player.jump(config.jump_velocity));
        for _ in 0..10 {
            player.step(&config, FRAME_MS);
        }
        assert!((player.vel_y - (-9.0)).abs() < 1e-4);
        assert!(player.airborne);
        assert!(player.pos.y < 280.0);
    }

    #[test]
    fn test_no_double_jump() {
        let config = EngineConfig::default();
        let mut player = Player::new(280.0);
        assert!(player.jump(config.jump_velocity));
        player.step(&config, FRAME_MS);
        let vel = player.vel_y;
        assert!(!player.jump(config.jump_velocity));
        assert_eq!(player.vel_y, vel);
    }

    #[test]
    fn test_lands_and_clamps() {
        let config = EngineConfig::default();
        let mut player = Player::new(280.0);
        player.jump(config.jump_velocity);
        for _ in 0..200 {
            player.step(&config, FRAME_MS);
            assert!(player.pos.y <= player.ground_y);
        }
        assert!(!player.airborne);
        assert_eq!(player.vel_y, 0.0);
        assert_eq!(player.pos.y, 280.0);
    }

    #[test]
    fn test_held_jump_reduces_gravity() {
        let config = EngineConfig {
            jump_hold_gravity_scale: 0.5,
            max_jump_hold_ms: 1000.0,
            ..Default::default()
        };
        let mut held = Player::new(280.0);
        let mut tapped = Player::new(280.0);
        held.jump(config.jump_velocity);
        tapped.jump(config.jump_velocity);
        tapped.release_jump();
        for _ in 0..5 {
            held.step(&config, FRAME_MS);
            tapped.step(&config, FRAME_MS);
        }
        assert!((held.vel_y - (-15.0 + 5.0 * 0.3)).abs() < 1e-4);
        assert!((tapped.vel_y - (-15.0 + 5.0 * 0.6)).abs() < 1e-4);
    }

    #[test]
    fn test_hold_capped_by_duration() {
        let config = EngineConfig {
            jump_hold_gravity_scale: 0.5,
            max_jump_hold_ms: 32.0,
            ..Default::default()
        };
        let mut player = Player::new(280.0);
        player.jump(config.jump_velocity);
        for _ in 0..4 {
            player.step(&config, FRAME_MS);
        }
        // Two reduced steps, then full gravity
        assert!((player.vel_y - (-15.0 + 2.0 * 0.3 + 2.0 * 0.6)).abs() < 1e-4);
    }

    #[test]
    fn test_size_class_weights() {
        assert_eq!(ObstacleSize::from_roll(0), ObstacleSize::Small);
        assert_eq!(ObstacleSize::from_roll(54), ObstacleSize::Small);
        assert_eq!(ObstacleSize::from_roll(55), ObstacleSize::Medium);
        assert_eq!(ObstacleSize::from_roll(84), ObstacleSize::Medium);
        assert_eq!(ObstacleSize::from_roll(85), ObstacleSize::Large);
        assert_eq!(ObstacleSize::from_roll(99), ObstacleSize::Large);
    }

    #[test]
    fn test_reset_clears_run() {
        let mut world = World::new(seeded(), 800.0, 400.0);
        world.distance = 1234.0;
        world.coins_collected = 3;
        world.speed = 11.0;
        world.spawn_effect_burst(EffectKind::Crash, Vec2::ZERO, 5);
        world.reset_for_run();
        assert_eq!(world.phase, RunPhase::Running);
        assert_eq!(world.distance, 0.0);
        assert_eq!(world.coins_collected, 0);
        assert_eq!(world.speed, world.config.initial_speed);
        assert!(world.effects.is_empty());
    }

    #[test]
    fn test_resize_reseats_entities() {
        let mut world = World::new(seeded(), 800.0, 400.0);
        let id = world.next_entity_id();
        world.obstacles.push(Obstacle {
            id,
            class: ObstacleSize::Large,
            pos: Vec2::new(500.0, world.floor_y() - 80.0),
            size: ObstacleSize::Large.dimensions(),
        });
        world.set_bounds(1000.0, 600.0);
        assert_eq!(world.player.pos.y, 600.0 - GROUND_HEIGHT - PLAYER_HEIGHT);
        assert_eq!(world.obstacles[0].rect().bottom(), world.floor_y());
    }

    #[test]
    fn test_effects_expire() {
        let mut world = World::new(seeded(), 800.0, 400.0);
        world.spawn_effect_burst(EffectKind::CoinSparkle, Vec2::new(10.0, 10.0), 8);
        assert_eq!(world.effects.len(), 8);
        world.advance_effects(EFFECT_LIFETIME_MS / 2.0);
        assert_eq!(world.effects.len(), 8);
        world.advance_effects(EFFECT_LIFETIME_MS);
        assert!(world.effects.is_empty());
    }
}
