//! Coin Dash - A 2D endless-runner
//!
//! Core modules:
//! - `sim`: Simulation core (player physics, spawning, collisions, scoring)
//! - `config`: Tunable engine parameters
//! - `platform`: Drawing surfaces (browser canvas / headless)
//! - `highscores`: Local best-score board

pub mod config;
pub mod highscores;
pub mod platform;
pub mod sim;

pub use config::EngineConfig;
pub use highscores::HighScores;
pub use sim::{Engine, EngineError, EventSink, GameSnapshot};

/// Game configuration constants
pub mod consts {
    /// Baseline frame duration the speed units are expressed against (ms)
    pub const FRAME_MS: f32 = 16.0;
    /// Largest frame delta fed to the simulation (ms), avoids huge jumps after stalls
    pub const MAX_FRAME_DELTA_MS: f32 = 250.0;
    /// Cosmetic effect window after the run ends (ms)
    pub const END_EFFECT_WINDOW_MS: f32 = 250.0;
    /// How often presentation polls the engine snapshot (ms)
    pub const HUD_POLL_MS: i32 = 100;

    /// Player defaults - fixed horizontal position, only y moves
    pub const PLAYER_X: f32 = 100.0;
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    /// Height of the ground strip at the bottom of the surface
    pub const GROUND_HEIGHT: f32 = 80.0;

    /// Coin defaults
    pub const COIN_SIZE: f32 = 24.0;
    /// Distance of a coin's top edge above the player's resting top edge
    pub const COIN_ELEVATION: f32 = 90.0;
    /// Points per collected coin
    pub const COIN_POINTS: u64 = 10;
    /// Distance units per point
    pub const DISTANCE_PER_POINT: f32 = 10.0;

    /// No obstacles before this much run time has elapsed (ms)
    pub const OBSTACLE_GRACE_MS: f32 = 2000.0;
    /// ...nor before this much distance has been covered
    pub const OBSTACLE_GRACE_DISTANCE: f32 = 400.0;
    /// Hard floor for the distance between two obstacles
    pub const MIN_OBSTACLE_GAP: f32 = 220.0;

    /// Past this distance speed grows faster
    pub const LATE_ACCEL_DISTANCE: f32 = 5000.0;
    pub const LATE_ACCEL_FACTOR: f32 = 1.5;
}
