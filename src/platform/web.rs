//! Browser backend (WASM only)
//!
//! 2D canvas surface, `HtmlImageElement` loader, a scheduler built on
//! `requestAnimationFrame`/`setTimeout`, and DOM visibility wiring.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use glam::Vec2;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

use super::{
    AssetFuture, ImageBounds, ImageLoader, Scheduler, Surface, TimerHandle, TimerKind,
    VisibilityChange, VisibilityHooks,
};
use crate::atlas::TileRect;
use crate::audio::WebAudio;
use crate::error::{AssetError, GameError};
use crate::game::Game;

/// Game wired to the browser backend
pub type WebGame = Game<CanvasSurface, WebAudio, WebScheduler>;

/// Run `f` against the game, logging any error it returns.
///
/// Callbacks that find the game already borrowed are dropped.
pub fn dispatch<F>(game: &Rc<RefCell<WebGame>>, f: F)
where
    F: FnOnce(&mut WebGame) -> Result<(), GameError>,
{
    let Ok(mut g) = game.try_borrow_mut() else {
        log::warn!("Game busy, dropping callback");
        return;
    };
    if let Err(e) = f(&mut *g) {
        log::error!("{}", e);
    }
}

fn dispatch_weak<F>(game: &Weak<RefCell<WebGame>>, f: F)
where
    F: FnOnce(&mut WebGame) -> Result<(), GameError>,
{
    if let Some(game) = game.upgrade() {
        dispatch(&game, f);
    }
}

// === Drawing ===

impl ImageBounds for HtmlImageElement {
    fn dimensions(&self) -> (u32, u32) {
        (self.natural_width(), self.natural_height())
    }
}

/// Canvas 2D context as a drawing surface
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl Surface for CanvasSurface {
    type Image = HtmlImageElement;

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.clear_rect(x, y, w, h);
    }

    fn blit(&mut self, image: &HtmlImageElement, src: &TileRect, dest: Vec2) {
        let (w, h) = (src.w as f64, src.h as f64);
        let drawn = self
            .ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image,
                src.x as f64,
                src.y as f64,
                w,
                h,
                dest.x as f64,
                dest.y as f64,
                w,
                h,
            );
        if let Err(e) = drawn {
            log::warn!("drawImage failed: {:?}", e);
        }
    }
}

/// Loads images through `<img>` onload/onerror
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlImageLoader;

impl ImageLoader for HtmlImageLoader {
    type Image = HtmlImageElement;

    fn load(&self, path: &str) -> AssetFuture<HtmlImageElement> {
        let path = path.to_string();
        Box::pin(async move {
            let fail = |e: JsValue| {
                log::debug!("image {} failed: {:?}", path, e);
                AssetError::Image { path: path.clone() }
            };
            let img = HtmlImageElement::new().map_err(fail)?;
            let loaded = js_sys::Promise::new(&mut |resolve, reject| {
                img.set_onload(Some(&resolve));
                img.set_onerror(Some(&reject));
            });
            img.set_src(&path);

            let result = JsFuture::from(loaded).await;
            img.set_onload(None);
            img.set_onerror(None);
            result.map_err(fail)?;
            Ok(img)
        })
    }
}

/// Create a `width` x `height` canvas and attach it to `#app` (or `<body>`)
pub fn create_canvas(
    document: &Document,
    width: u32,
    height: u32,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(width);
    canvas.set_height(height);

    match document.get_element_by_id("app") {
        Some(app) => app.append_child(&canvas)?,
        None => document
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&canvas)?,
    };

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    Ok((canvas, ctx))
}

// === Scheduling ===

/// `requestAnimationFrame`/`setTimeout` scheduler.
///
/// Holds a weak back-reference so callbacks can reach the game that owns it.
pub struct WebScheduler {
    game: Weak<RefCell<WebGame>>,
}

impl WebScheduler {
    pub fn new(game: Weak<RefCell<WebGame>>) -> Self {
        Self { game }
    }
}

impl Scheduler for WebScheduler {
    fn now(&self) -> f64 {
        js_sys::Date::now()
    }

    fn request_frame(&mut self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let game = self.game.clone();
        let callback = Closure::once_into_js(move |_time: f64| {
            dispatch_weak(&game, |g| g.on_frame());
        });
        if let Err(e) = window.request_animation_frame(callback.unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {:?}", e);
        }
    }

    fn set_timeout(&mut self, delay_ms: f64, kind: TimerKind) -> TimerHandle {
        // Filled in once the browser hands back the id
        let id = Rc::new(Cell::new(0u32));
        let Some(window) = web_sys::window() else {
            return TimerHandle(0);
        };

        let game = self.game.clone();
        let fired = id.clone();
        let callback = Closure::once_into_js(move || {
            dispatch_weak(&game, |g| {
                g.on_timer(TimerHandle(fired.get()), kind);
                Ok(())
            });
        });
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay_ms as i32,
        ) {
            Ok(raw) => id.set(raw as u32),
            Err(e) => log::error!("setTimeout failed: {:?}", e),
        }
        TimerHandle(id.get())
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(handle.0 as i32);
        }
    }
}

// === Visibility ===

/// Route window blur/focus and document visibility changes into `hooks`
pub fn on_hidden(hooks: Rc<RefCell<VisibilityHooks>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    // Visibility change (tab switch, minimize)
    {
        let hooks = hooks.clone();
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let change = if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                VisibilityChange::DocumentHidden
            } else {
                VisibilityChange::DocumentVisible
            };
            hooks.borrow_mut().notify(change);
        });
        let _ = document.add_event_listener_with_callback(
            "visibilitychange",
            closure.as_ref().unchecked_ref(),
        );
        closure.forget();
    }

    // Window blur (click outside) and focus
    for (name, change) in [
        ("blur", VisibilityChange::Blur),
        ("focus", VisibilityChange::Focus),
    ] {
        let hooks = hooks.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            hooks.borrow_mut().notify(change);
        });
        let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
