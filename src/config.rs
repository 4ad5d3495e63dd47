//! Engine configuration
//!
//! Tunable numbers supplied at construction. Field names follow the
//! camelCase option object the browser side passes in, so a partial JSON
//! object like `{"initialSpeed": 8}` is a valid config.

use serde::{Deserialize, Serialize};

use crate::sim::EngineError;

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// World speed at run start (units per 16ms frame)
    pub initial_speed: f32,
    /// Speed added every tick while running
    pub speed_increment: f32,
    /// Base obstacle interval in ticks; the opening obstacle gap is this
    /// many ticks of travel at `initial_speed`
    pub obstacle_spawn_rate: u32,
    /// Ticks between coin spawns
    pub coin_spawn_rate: u32,
    /// Downward acceleration added to vertical velocity every tick
    pub gravity: f32,
    /// Vertical velocity assigned on jump (negative is up)
    pub jump_velocity: f32,

    // === Hold-to-jump ===
    /// Gravity multiplier while the jump is held (1.0 = holding does nothing)
    pub jump_hold_gravity_scale: f32,
    /// Maximum time a held jump keeps reduced gravity (ms)
    pub max_jump_hold_ms: f32,

    /// RNG seed (None = seeded from the OS)
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_speed: 6.0,
            speed_increment: 0.002,
            obstacle_spawn_rate: 100,
            coin_spawn_rate: 60,
            gravity: 0.6,
            jump_velocity: -15.0,

            jump_hold_gravity_scale: 1.0,
            max_jump_hold_ms: 200.0,

            seed: None,
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON option object
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Distance between obstacles at the start of a run
    pub fn base_obstacle_gap(&self) -> f32 {
        self.obstacle_spawn_rate as f32 * self.initial_speed
    }

    /// Replace values the simulation cannot run with by their defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.initial_speed.is_finite() && self.initial_speed > 0.0) {
            log::warn!("initialSpeed {} rejected, using default", self.initial_speed);
            self.initial_speed = defaults.initial_speed;
        }
        if !(self.speed_increment.is_finite() && self.speed_increment >= 0.0) {
            log::warn!("speedIncrement {} rejected, using default", self.speed_increment);
            self.speed_increment = defaults.speed_increment;
        }
        if self.obstacle_spawn_rate == 0 {
            log::warn!("obstacleSpawnRate 0 rejected, using default");
            self.obstacle_spawn_rate = defaults.obstacle_spawn_rate;
        }
        if self.coin_spawn_rate == 0 {
            log::warn!("coinSpawnRate 0 rejected, using default");
            self.coin_spawn_rate = defaults.coin_spawn_rate;
        }
        if !(self.gravity.is_finite() && self.gravity > 0.0) {
            log::warn!("gravity {} rejected, using default", self.gravity);
            self.gravity = defaults.gravity;
        }
        if !(self.jump_velocity.is_finite() && self.jump_velocity < 0.0) {
            log::warn!("jumpVelocity {} rejected, using default", self.jump_velocity);
            self.jump_velocity = defaults.jump_velocity;
        }
        if !(self.jump_hold_gravity_scale.is_finite() && self.jump_hold_gravity_scale > 0.0) {
            self.jump_hold_gravity_scale = defaults.jump_hold_gravity_scale;
        }
        if !(self.max_jump_hold_ms.is_finite() && self.max_jump_hold_ms >= 0.0) {
            self.max_jump_hold_ms = defaults.max_jump_hold_ms;
        }

        self
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "coin_dash_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded engine config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default engine config");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
