//! Vase Arcade entry point
//!
//! Handles platform-specific initialization and starts the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, TouchEvent};

    use glam::DVec2;
    use vase_arcade::audio::WebAudio;
    use vase_arcade::input::Key;
    use vase_arcade::platform::VisibilityHooks;
    use vase_arcade::platform::web::{
        CanvasSurface, HtmlImageLoader, WebGame, WebScheduler, create_canvas, dispatch, on_hidden,
    };
    use vase_arcade::{Atlas, EventBus, Game, GameEvent, Settings};

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Vase Arcade starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let settings = Settings::load();
        let (canvas, ctx) = match create_canvas(&document, settings.width, settings.height) {
            Ok(pair) => pair,
            Err(e) => {
                log::error!("Failed to create canvas: {:?}", e);
                return;
            }
        };

        let mut events = EventBus::new();
        events.on(GameEvent::InitComplete, |e| log::info!("{}", e));
        events.on(GameEvent::LoadingComplete, |e| log::info!("{}", e));
        events.on(GameEvent::Paused, |e| log::info!("{}", e));
        events.on(GameEvent::Unpaused, |e| log::info!("{}", e));

        let game: Rc<RefCell<WebGame>> = Rc::new_cyclic(|weak| {
            RefCell::new(Game::new(
                settings,
                CanvasSurface::new(ctx),
                WebAudio::new(),
                WebScheduler::new(weak.clone()),
                events,
            ))
        });

        setup_keyboard(game.clone());
        setup_touch(&canvas, game.clone());
        setup_auto_pause(game.clone());

        // Load the tileset without holding the game borrow across the await
        let path = game.borrow().tileset_path().to_string();
        let mut atlas = Atlas::new();
        let loaded = atlas.load_image(&HtmlImageLoader, &path).await;
        let result = loaded.map(|_| atlas);
        dispatch(&game, |g| g.finish_loading(result));

        log::info!("Vase Arcade running!");
    }

    fn setup_keyboard(game: Rc<RefCell<WebGame>>) {
        let window = web_sys::window().unwrap();

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_dom_key(&event.key()) else {
                    return;
                };
                if key.is_arrow() {
                    event.prevent_default();
                } else if event.repeat() {
                    // Holding `p` would otherwise flicker pause
                    return;
                }
                dispatch(&game, |g| g.key_down(key));
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_dom_key(&event.key()) {
                    dispatch(&game, |g| {
                        g.key_up(key);
                        Ok(())
                    });
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn touch_point(event: &TouchEvent) -> Option<DVec2> {
        let touch = event.changed_touches().get(0)?;
        Some(DVec2::new(touch.screen_x() as f64, touch.screen_y() as f64))
    }

    fn setup_touch(canvas: &web_sys::HtmlCanvasElement, game: Rc<RefCell<WebGame>>) {
        // Touch start (double tap pauses)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(point) = touch_point(&event) {
                    dispatch(&game, |g| g.touch_start(point));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move (steer)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(point) = touch_point(&event) {
                    dispatch(&game, |g| {
                        g.touch_move(point);
                        Ok(())
                    });
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                dispatch(&game, |g| {
                    g.touch_end();
                    Ok(())
                });
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<WebGame>>) {
        let on_visible = game.clone();
        let hooks = VisibilityHooks::new(
            move || {
                log::info!("Auto-paused (page hidden)");
                dispatch(&game, |g| g.emit(GameEvent::Pause));
            },
            Some(Box::new(move || {
                dispatch(&on_visible, |g| g.emit(GameEvent::Unpause));
            })),
        );
        on_hidden(Rc::new(RefCell::new(hooks)));
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Vase Arcade (native) starting...");
    log::info!("Native mode has no canvas - run with `trunk serve` for the web version");

    if let Err(e) = headless_session() {
        log::error!("Headless session failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive a few seconds of play against the headless backend
#[cfg(not(target_arch = "wasm32"))]
fn headless_session() -> Result<(), vase_arcade::GameError> {
    use vase_arcade::input::Key;
    use vase_arcade::platform::headless::{
        ManualScheduler, MemoryImageLoader, RecordingSurface, SilentAudio, step,
    };
    use vase_arcade::{Atlas, EventBus, Game, GameEvent, Settings};

    let mut events = EventBus::new();
    for event in GameEvent::ALL {
        events.on(event, |e| log::info!("event: {}", e));
    }

    let settings = Settings::load();
    let loader = MemoryImageLoader::new().with_image(&settings.tileset_image, 32, 32);
    let mut game = Game::new(
        settings,
        RecordingSurface::new(),
        SilentAudio::new(),
        ManualScheduler::new(0.0),
        events,
    );

    let path = game.tileset_path().to_string();
    let mut atlas = Atlas::new();
    let result = pollster::block_on(atlas.load_image(&loader, &path)).map(|_| atlas);
    game.finish_loading(result)?;

    let frame_ms = 1000.0 / game.settings().fps as f64;
    game.key_down(Key::Right)?;
    for _ in 0..60 {
        step(&mut game, frame_ms)?;
    }
    game.key_up(Key::Right);
    game.key_down(Key::P)?;
    for _ in 0..10 {
        step(&mut game, frame_ms)?;
    }

    log::info!(
        "vase at ({:.0}, {:.0}) after {} passes, state {:?}",
        game.vase().pos.x,
        game.vase().pos.y,
        game.surface().passes(),
        game.run_state()
    );
    Ok(())
}
