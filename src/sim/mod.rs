//! Simulation module
//!
//! All gameplay logic lives here:
//! - One tick per display frame, driven by [`Engine::frame`]
//! - Seeded RNG only
//! - Insertion-ordered entity lists
//! - No rendering or platform dependencies beyond surface dimensions

pub mod clock;
pub mod collision;
pub mod engine;
pub mod error;
pub mod events;
pub mod spawner;
pub mod state;
pub mod tick;

pub use clock::FrameClock;
pub use collision::{Rect, obstacle_hitbox};
pub use engine::Engine;
pub use error::EngineError;
pub use events::{EventSink, GameEvent};
pub use spawner::{Spawner, gap_multiplier, grace_cleared, spawn_entities, target_gap};
pub use state::{
    Coin, Effect, EffectKind, GameSnapshot, MAX_EFFECTS, Obstacle, ObstacleSize, Player,
    RunPhase, World,
};
pub use tick::tick;
