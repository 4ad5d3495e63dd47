//! Coin Dash entry point
//!
//! Browser builds wire the engine to a canvas, the keyboard and the
//! animation-frame loop. Native builds play one headless run with a simple
//! auto-jumping pilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use coin_dash::consts::HUD_POLL_MS;
    use coin_dash::platform::CanvasSurface;
    use coin_dash::sim::{Engine, EventSink};
    use coin_dash::{EngineConfig, HighScores};

    /// Browser-side owner of the engine
    struct Game {
        engine: Engine,
        /// A requestAnimationFrame callback is pending
        loop_running: bool,
        high_scores: HighScores,
        /// Final snapshot of the current run already went to the board
        recorded: bool,
    }

    /// Logs notifications; visual feedback is drawn by the page
    struct ConsoleSink;

    impl EventSink for ConsoleSink {
        fn on_coin_collected(&mut self, x: f32, y: f32) {
            log::debug!("Coin collected at ({:.0}, {:.0})", x, y);
        }

        fn on_game_over(&mut self) {
            log::info!("Game over");
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Coin Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let sizer = CanvasSurface::new(canvas.clone());
        sizer.fit_to_client();

        let engine = match Engine::new(
            Box::new(CanvasSurface::new(canvas)),
            EngineConfig::load(),
            Some(Box::new(ConsoleSink)),
        ) {
            Ok(engine) => engine,
            Err(e) => {
                log::error!("Cannot start: {}", e);
                return;
            }
        };

        let game = Rc::new(RefCell::new(Game {
            engine,
            loop_running: false,
            high_scores: HighScores::load(),
            recorded: false,
        }));

        setup_keyboard(game.clone());
        setup_resize(game.clone(), sizer);
        setup_hud_poll(game);

        log::info!("Coin Dash ready - press Enter to run");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                {
                    let mut g = game.borrow_mut();
                    match event.key().as_str() {
                        " " | "ArrowUp" => {
                            event.prevent_default();
                            g.engine.jump();
                        }
                        "Enter" => g.engine.start(),
                        "Escape" | "p" | "P" => g.engine.toggle_pause(),
                        _ => {}
                    }
                }
                ensure_loop(&game);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if matches!(event.key().as_str(), " " | "ArrowUp") {
                    game.borrow_mut().engine.release_jump();
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>, sizer: CanvasSurface) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            sizer.fit_to_client();
            game.borrow_mut().engine.handle_resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Poll the snapshot for the HUD; record the run once it ends
    fn setup_hud_poll(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let mut g = game.borrow_mut();
            let state = g.engine.get_state();

            let document = web_sys::window().unwrap().document().unwrap();
            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&state.score.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-coins .hud-value").ok().flatten() {
                el.set_text_content(Some(&state.coins.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-distance .hud-value").ok().flatten() {
                el.set_text_content(Some(&format!("{:.0}", state.distance)));
            }
            if let Some(el) = document.get_element_by_id("pause-overlay") {
                let class = if state.is_paused { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }

            if state.is_playing {
                g.recorded = false;
            } else if state.is_game_over && !g.recorded {
                g.recorded = true;
                if let Some(rank) = g.high_scores.record(&state, js_sys::Date::now()) {
                    log::info!("New high score #{}: {}", rank, state.score);
                    g.high_scores.save();
                }
                if let Some(el) = document.get_element_by_id("game-over") {
                    let _ = el.set_attribute("class", "");
                }
            }
        });
        let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            HUD_POLL_MS,
        );
        closure.forget();
    }

    /// Kick off the frame loop if the engine wants frames and none is pending
    fn ensure_loop(game: &Rc<RefCell<Game>>) {
        let schedule = {
            let mut g = game.borrow_mut();
            if g.engine.wants_frame() && !g.loop_running {
                g.loop_running = true;
                true
            } else {
                false
            }
        };
        if schedule {
            request_animation_frame(game.clone());
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_going = {
            let mut g = game.borrow_mut();
            let keep_going = g.engine.frame(time);
            if !keep_going {
                g.loop_running = false;
            }
            keep_going
        };

        if keep_going {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);
    log::info!("Coin Dash (native) headless run, seed {}", seed);

    match headless_run(seed) {
        Ok(state) => println!(
            "Run over: score {} ({} coins, distance {:.0}, top speed {:.2})",
            state.score, state.coins, state.distance, state.speed
        ),
        Err(e) => {
            log::error!("Headless run failed: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

/// Frames after which the headless run gives up (about five minutes)
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u32 = 5 * 60 * 60;

#[cfg(not(target_arch = "wasm32"))]
fn headless_run(seed: u64) -> Result<coin_dash::GameSnapshot, coin_dash::EngineError> {
    use coin_dash::platform::HeadlessSurface;
    use coin_dash::{Engine, EngineConfig};

    let config = EngineConfig {
        seed: Some(seed),
        ..EngineConfig::load()
    };
    let mut engine = Engine::new(Box::new(HeadlessSurface::default()), config, None)?;
    engine.start();

    let mut now = 0.0;
    for _ in 0..MAX_FRAMES {
        if !engine.frame(now) {
            break;
        }
        autopilot(&mut engine);
        now += coin_dash::consts::FRAME_MS as f64;
    }
    engine.destroy();

    Ok(engine.get_state())
}

/// Jump when the nearest obstacle ahead is about to reach the player
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(engine: &mut coin_dash::Engine) {
    use coin_dash::consts::{PLAYER_WIDTH, PLAYER_X};

    let world = engine.world();
    let lead = world.speed * 6.0;
    let threat = world
        .obstacles
        .iter()
        .map(|o| o.pos.x - (PLAYER_X + PLAYER_WIDTH))
        .filter(|gap| *gap >= 0.0)
        .any(|gap| gap < lead);

    if threat {
        engine.jump();
        engine.release_jump();
    }
}
