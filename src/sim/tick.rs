//! Per-frame simulation tick
//!
//! Order within one tick: player physics, spawning, world advance/prune,
//! collisions, then distance/speed/score bookkeeping.

use super::events::GameEvent;
use super::spawner::spawn_entities;
use super::state::{EffectKind, RunPhase, World};
use crate::consts::*;

/// Sparks emitted when a coin is picked up
const COIN_SPARKS: usize = 8;
/// Sparks emitted when the player crashes
const CRASH_SPARKS: usize = 24;

/// Advance the world by one frame of `dt_ms` milliseconds.
///
/// Does nothing unless the run is `Running`.
pub fn tick(world: &mut World, dt_ms: f32) {
    if world.phase != RunPhase::Running {
        return;
    }
    let dt_ms = dt_ms.max(0.0);

    world.time_ticks += 1;
    world.elapsed_ms += dt_ms;

    world.player.step(&world.config, dt_ms);

    spawn_entities(world);

    advance_entities(world);

    resolve_collisions(world);

    // Score is frozen from the moment the run ends
    if world.phase == RunPhase::Running {
        world.distance += world.speed * (dt_ms / FRAME_MS);

        let increment = if world.distance >= LATE_ACCEL_DISTANCE {
            world.config.speed_increment * LATE_ACCEL_FACTOR
        } else {
            world.config.speed_increment
        };
        world.speed += increment;

        world.score = world.compute_score();
    }

    world.advance_effects(dt_ms);
}

/// Scroll obstacles and uncollected coins left, then drop what is gone
fn advance_entities(world: &mut World) {
    let speed = world.speed;

    for obstacle in &mut world.obstacles {
        obstacle.pos.x -= speed;
    }
    for coin in world.coins.iter_mut().filter(|c| !c.collected) {
        coin.pos.x -= speed;
    }

    world.obstacles.retain(|o| !o.is_off_screen());
    world.coins.retain(|c| !c.collected && !c.is_off_screen());
}

fn resolve_collisions(world: &mut World) {
    let player = world.player.rect();

    // First blocking hit wins; nothing else is checked this tick
    let hit = world
        .obstacles
        .iter()
        .find(|o| player.intersects(&o.hitbox()))
        .map(|o| o.id);
    if let Some(id) = hit {
        log::info!(
            "Hit obstacle {} at distance {:.0}, final score {}",
            id,
            world.distance,
            world.score
        );
        world.phase = RunPhase::Ended;
        world.player.release_jump();
        world.events.push(GameEvent::GameOver);
        world.spawn_effect_burst(EffectKind::Crash, player.center(), CRASH_SPARKS);
        return;
    }

    let mut picked = Vec::new();
    for coin in world.coins.iter_mut().filter(|c| !c.collected) {
        if player.intersects(&coin.rect()) {
            coin.collected = true;
            picked.push((coin.id, coin.rect().center()));
        }
    }

    for (id, center) in picked {
        world.coins_collected += 1;
        log::debug!("Collected coin {} ({} total)", id, world.coins_collected);
        world.events.push(GameEvent::CoinCollected {
            x: center.x,
            y: center.y,
        });
        world.spawn_effect_burst(EffectKind::CoinSparkle, center, COIN_SPARKS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::sim::state::{Coin, Obstacle, ObstacleSize};
    use glam::Vec2;

    fn running_world() -> World {
        let config = EngineConfig {
            seed: Some(12345),
            ..Default::default()
        };
        let mut world = World::new(config, 800.0, 400.0);
        world.reset_for_run();
        world
    }

    /// A world that does not scroll, so entity placement stays put
    fn frozen_world() -> World {
        let mut world = running_world();
        world.speed = 0.0;
        world.config.speed_increment = 0.0;
        world
    }

    fn push_coin(world: &mut World, pos: Vec2) -> u32 {
        let id = world.next_entity_id();
        world.coins.push(Coin {
            id,
            pos,
            size: Vec2::splat(COIN_SIZE),
            collected: false,
        });
        id
    }

    fn push_obstacle(world: &mut World, x: f32, class: ObstacleSize) -> u32 {
        let id = world.next_entity_id();
        let size = class.dimensions();
        let y = world.floor_y() - size.y;
        world.obstacles.push(Obstacle {
            id,
            class,
            pos: Vec2::new(x, y),
            size,
        });
        id
    }

    #[test]
    fn test_tick_ignored_unless_running() {
        for phase in [RunPhase::Idle, RunPhase::Paused, RunPhase::Ended] {
            let mut world = running_world();
            world.phase = phase;
            tick(&mut world, FRAME_MS);
            assert_eq!(world.time_ticks, 0);
            assert_eq!(world.distance, 0.0);
        }
    }

    #[test]
    fn test_distance_scales_with_delta() {
        let mut world = running_world();
        let speed = world.speed;
        tick(&mut world, 32.0);
        assert!((world.distance - speed * 2.0).abs() < 1e-4);
        assert!(world.speed > speed);
    }

    #[test]
    fn test_score_formula() {
        let mut world = running_world();
        for _ in 0..100 {
            tick(&mut world, FRAME_MS);
        }
        world.coins_collected = 2;
        tick(&mut world, FRAME_MS);
        let expected = (world.distance / 10.0).floor() as u64 + 20;
        assert_eq!(world.score, expected);
    }

    #[test]
    fn test_coin_collected_once_then_pruned() {
        let mut world = frozen_world();
        let center = world.player.rect().center();
        push_coin(&mut world, center - Vec2::splat(COIN_SIZE / 2.0));

        tick(&mut world, FRAME_MS);
        assert_eq!(world.coins_collected, 1);
        assert!(world.coins[0].collected);
        assert_eq!(
            world.events,
            vec![GameEvent::CoinCollected {
                x: center.x,
                y: center.y
            }]
        );

        tick(&mut world, FRAME_MS);
        assert_eq!(world.coins_collected, 1);
        assert!(world.coins.is_empty());
    }

    #[test]
    fn test_simultaneous_coins_all_register() {
        let mut world = frozen_world();
        let p = world.player.pos;
        push_coin(&mut world, p);
        push_coin(&mut world, p + Vec2::new(10.0, 10.0));
        tick(&mut world, FRAME_MS);
        assert_eq!(world.coins_collected, 2);
        assert_eq!(world.score, 20);
    }

    #[test]
    fn test_obstacle_hit_ends_run() {
        let mut world = frozen_world();
        push_obstacle(&mut world, PLAYER_X, ObstacleSize::Small);
        // A coin overlapping the player in the same tick is not collected
        let p = world.player.pos;
        push_coin(&mut world, p);

        tick(&mut world, FRAME_MS);
        assert_eq!(world.phase, RunPhase::Ended);
        assert_eq!(world.coins_collected, 0);
        assert_eq!(world.events, vec![GameEvent::GameOver]);
        assert!(!world.effects.is_empty());

        // Frozen afterwards
        let distance = world.distance;
        tick(&mut world, FRAME_MS);
        assert_eq!(world.distance, distance);
    }

    #[test]
    fn test_visual_touch_is_forgiven() {
        let mut world = frozen_world();
        // Obstacle's drawn left edge 2 units inside the player's right edge;
        // the hitbox starts 4 units in
        let x = PLAYER_X + PLAYER_WIDTH - 2.0;
        push_obstacle(&mut world, x, ObstacleSize::Medium);
        assert!(world.player.rect().intersects(&world.obstacles[0].rect()));

        tick(&mut world, FRAME_MS);
        assert_eq!(world.phase, RunPhase::Running);
    }

    #[test]
    fn test_offscreen_entities_pruned() {
        let mut world = running_world();
        let speed = world.speed;
        let size = ObstacleSize::Large.dimensions();
        push_obstacle(&mut world, -size.x + speed * 0.5, ObstacleSize::Large);
        push_obstacle(&mut world, 500.0, ObstacleSize::Small);
        push_coin(&mut world, Vec2::new(-COIN_SIZE + speed * 0.5, 10.0));

        tick(&mut world, FRAME_MS);
        assert_eq!(world.obstacles.len(), 1);
        assert!((world.obstacles[0].pos.x - (500.0 - speed)).abs() < 1e-4);
        assert!(world.coins.is_empty());
    }

    #[test]
    fn test_late_acceleration() {
        let mut world = running_world();
        world.distance = LATE_ACCEL_DISTANCE;
        let speed = world.speed;
        tick(&mut world, FRAME_MS);
        let expected = speed + world.config.speed_increment * LATE_ACCEL_FACTOR;
        assert!((world.speed - expected).abs() < 1e-6);
    }
}
