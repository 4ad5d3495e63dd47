//! Notifications from the simulation to presentation

use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::{Deserialize, Serialize};

/// Something that happened during a tick and that collaborators may react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A coin was picked up; position is the coin's centre
    CoinCollected { x: f32, y: f32 },
    /// The player hit an obstacle
    GameOver,
}

/// Optional receiver for game events.
///
/// Both methods default to doing nothing, so an implementor only overrides
/// what it cares about.
pub trait EventSink {
    fn on_coin_collected(&mut self, _x: f32, _y: f32) {}

    fn on_game_over(&mut self) {}
}

/// Deliver one event to the sink. A panicking sink is logged and swallowed.
pub(crate) fn dispatch(sink: &mut dyn EventSink, event: GameEvent) {
    let result = catch_unwind(AssertUnwindSafe(|| match event {
        GameEvent::CoinCollected { x, y } => sink.on_coin_collected(x, y),
        GameEvent::GameOver => sink.on_game_over(),
    }));

    if result.is_err() {
        log::error!("Event sink panicked while handling {:?}", event);
    }
}
