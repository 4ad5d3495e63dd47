//! Run lifecycle and frame driving
//!
//! `Idle -> Running <-> Paused`, `Running -> Ended` on a crash, and back to
//! `Running` on the next `start`. Every control method is a silent no-op
//! when called in a state where it does not apply.

use super::clock::FrameClock;
use super::error::EngineError;
use super::events::{EventSink, dispatch};
use super::state::{GameSnapshot, RunPhase, World};
use super::tick::tick;
use crate::config::EngineConfig;
use crate::consts::END_EFFECT_WINDOW_MS;
use crate::platform::DrawSurface;

/// One game session
pub struct Engine {
    world: World,
    surface: Box<dyn DrawSurface>,
    sink: Option<Box<dyn EventSink>>,
    clock: FrameClock,
    /// Frame loop should keep being scheduled
    loop_active: bool,
    /// Cosmetic time left after a crash before the loop stops (ms)
    end_window_ms: f32,
    destroyed: bool,
}

impl Engine {
    /// Build an engine bound to `surface`.
    ///
    /// Fails when the surface cannot provide a 2D context.
    pub fn new(
        surface: Box<dyn DrawSurface>,
        config: EngineConfig,
        sink: Option<Box<dyn EventSink>>,
    ) -> Result<Self, EngineError> {
        let (width, height) = surface
            .context_size()
            .ok_or(EngineError::NoDrawingContext)?;
        let world = World::new(config.sanitized(), width, height);
        log::info!("Engine created for {}x{} surface", width, height);

        Ok(Self {
            world,
            surface,
            sink,
            clock: FrameClock::new(),
            loop_active: false,
            end_window_ms: 0.0,
            destroyed: false,
        })
    }

    /// Begin a fresh run. Ignored while a run is in progress (even paused).
    pub fn start(&mut self) {
        if self.destroyed {
            return;
        }
        if matches!(self.world.phase, RunPhase::Running | RunPhase::Paused) {
            return;
        }

        self.world.reset_for_run();
        self.clock.rearm();
        self.end_window_ms = 0.0;
        self.loop_active = true;
        log::info!("Run started");
    }

    /// Pause a running game or resume a paused one
    pub fn toggle_pause(&mut self) {
        if self.destroyed {
            return;
        }
        match self.world.phase {
            RunPhase::Running => {
                self.world.phase = RunPhase::Paused;
                self.loop_active = false;
                log::info!("Paused");
            }
            RunPhase::Paused => {
                self.world.phase = RunPhase::Running;
                // Time spent paused must not reach the next delta
                self.clock.rearm();
                self.loop_active = true;
                log::info!("Resumed");
            }
            RunPhase::Idle | RunPhase::Ended => {}
        }
    }

    /// Jump if running and on the ground
    pub fn jump(&mut self) {
        if self.destroyed || self.world.phase != RunPhase::Running {
            return;
        }
        let velocity = self.world.config.jump_velocity;
        if self.world.player.jump(velocity) {
            log::debug!("Jump at distance {:.0}", self.world.distance);
        }
    }

    /// End a held jump
    pub fn release_jump(&mut self) {
        if self.destroyed {
            return;
        }
        self.world.player.release_jump();
    }

    /// Re-read the surface size after the host resized it
    pub fn handle_resize(&mut self) {
        if self.destroyed {
            return;
        }
        match self.surface.context_size() {
            Some((width, height)) => {
                self.world.set_bounds(width, height);
                log::debug!("Resized to {}x{}", width, height);
            }
            None => log::warn!("Resize ignored: surface has no 2D context"),
        }
    }

    /// Stop for good. Safe to call repeatedly and from any state.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.loop_active = false;
        if matches!(self.world.phase, RunPhase::Running | RunPhase::Paused) {
            self.world.phase = RunPhase::Idle;
        }
        log::info!("Engine destroyed");
    }

    /// Copy of the current run state
    pub fn get_state(&self) -> GameSnapshot {
        self.world.snapshot()
    }

    /// Live entities, for presentation
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn phase(&self) -> RunPhase {
        self.world.phase
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Whether the host should schedule another animation frame
    pub fn wants_frame(&self) -> bool {
        self.loop_active
    }

    /// Animation-frame callback. `now_ms` is the frame timestamp.
    ///
    /// Returns whether another frame should be requested.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if !self.loop_active {
            return false;
        }
        let dt_ms = self.clock.delta(now_ms);

        match self.world.phase {
            RunPhase::Running => self.step(dt_ms),
            RunPhase::Ended => {
                self.world.advance_effects(dt_ms);
                self.end_window_ms -= dt_ms;
                if self.end_window_ms <= 0.0 {
                    self.loop_active = false;
                    log::debug!("Frame loop stopped after run end");
                }
            }
            RunPhase::Idle | RunPhase::Paused => self.loop_active = false,
        }

        self.loop_active
    }

    /// Advance one tick of `dt_ms` and deliver the tick's events
    pub fn step(&mut self, dt_ms: f32) {
        if self.destroyed || self.world.phase != RunPhase::Running {
            return;
        }

        tick(&mut self.world, dt_ms);

        if self.world.phase == RunPhase::Ended {
            self.end_window_ms = END_EFFECT_WINDOW_MS;
        }
        self.flush_events();
    }

    /// Hand queued events to the sink, after the tick has completed
    fn flush_events(&mut self) {
        let events = std::mem::take(&mut self.world.events);
        if let Some(sink) = self.sink.as_deref_mut() {
            for event in events {
                dispatch(sink, event);
            }
        }
    }
}
