//! Procedural spawning of coins and obstacles
//!
//! Coins arrive on a fixed tick cadence. Obstacles are held back for a safe
//! opening (time AND distance), then placed by distance travelled since the
//! previous one. Spacing by distance keeps obstacle density on screen the
//! same as the world speeds up; the target gap itself narrows in phases as
//! the run goes on, down to a hard floor.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Coin, Obstacle, ObstacleSize, World};
use crate::consts::*;

/// Gap multiplier phases: (phase end in ms, multiplier reached at that end).
/// The multiplier starts at 1.0 and is linear inside each phase.
const GAP_PHASES: [(f32, f32); 3] = [
    // Wide
    (20_000.0, 0.8),
    // Medium
    (45_000.0, 0.6),
    // Narrow
    (90_000.0, 0.45),
];

/// Spawn timers for one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spawner {
    /// Ticks since the last coin
    pub coin_ticks: u32,
    /// Run distance at which the last obstacle appeared
    pub last_obstacle_distance: Option<f32>,
}

/// Multiplier on the base obstacle gap after `elapsed_ms` of running
pub fn gap_multiplier(elapsed_ms: f32) -> f32 {
    let mut phase_start = 0.0;
    let mut from = 1.0;
    for &(phase_end, to) in &GAP_PHASES {
        if elapsed_ms < phase_end {
            let t = ((elapsed_ms - phase_start) / (phase_end - phase_start)).clamp(0.0, 1.0);
            return from + (to - from) * t;
        }
        phase_start = phase_end;
        from = to;
    }
    from
}

/// Distance to travel between two obstacles. Never increases with time.
pub fn target_gap(base_gap: f32, elapsed_ms: f32) -> f32 {
    (base_gap * gap_multiplier(elapsed_ms)).max(MIN_OBSTACLE_GAP)
}

/// True once the opening safe period is over
pub fn grace_cleared(elapsed_ms: f32, distance: f32) -> bool {
    elapsed_ms >= OBSTACLE_GRACE_MS && distance >= OBSTACLE_GRACE_DISTANCE
}

/// Run both spawn cadences for this tick
pub fn spawn_entities(world: &mut World) {
    world.spawner.coin_ticks += 1;
    if world.spawner.coin_ticks >= world.config.coin_spawn_rate {
        world.spawner.coin_ticks = 0;
        spawn_coin(world);
    }

    if !grace_cleared(world.elapsed_ms, world.distance) {
        return;
    }

    let due = match world.spawner.last_obstacle_distance {
        None => true,
        Some(last) => {
            let gap = target_gap(world.config.base_obstacle_gap(), world.elapsed_ms);
            world.distance - last >= gap
        }
    };
    if due {
        world.spawner.last_obstacle_distance = Some(world.distance);
        spawn_obstacle(world);
    }
}

fn spawn_coin(world: &mut World) {
    let id = world.next_entity_id();
    let coin = Coin {
        id,
        pos: Vec2::new(world.width, world.coin_y()),
        size: Vec2::splat(COIN_SIZE),
        collected: false,
    };
    log::debug!("Spawned coin {} at x={}", id, coin.pos.x);
    world.coins.push(coin);
}

fn spawn_obstacle(world: &mut World) {
    let roll = world.rng().random_range(0..100u32);
    let class = ObstacleSize::from_roll(roll);
    let size = class.dimensions();
    let id = world.next_entity_id();
    let obstacle = Obstacle {
        id,
        class,
        pos: Vec2::new(world.width, world.floor_y() - size.y),
        size,
    };
    log::debug!(
        "Spawned {:?} obstacle {} at distance {:.0}",
        class,
        id,
        world.distance
    );
    world.obstacles.push(obstacle);
}
