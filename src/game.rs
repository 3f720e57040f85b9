//! Game loop and pause state machine
//!
//! Owns the session, the single vase sprite, the atlas and the audio gate.
//! Frames are driven by the platform calling [`Game::on_frame`]; `tick`
//! re-arms the next frame only while running, which is what halts the loop
//! on pause.

use std::fmt;

use glam::{DVec2, Vec2};

use crate::atlas::{Atlas, TileRect};
use crate::audio::{ToneBackend, ToneEngine};
use crate::consts::{VASE_KEY, VASE_SIZE};
use crate::error::{AssetError, GameError};
use crate::events::{EventBus, GameEvent};
use crate::input::{Directions, InputCommand, InputTracker, Key};
use crate::platform::{Scheduler, Surface, TimerHandle, TimerKind};
use crate::settings::Settings;
use crate::sim::{RunState, Session, Sprite, motion};

/// Game instance holding all state
pub struct Game<S: Surface, A: ToneBackend, C: Scheduler> {
    settings: Settings,
    surface: S,
    sound: ToneEngine<A>,
    scheduler: C,
    input: InputTracker,
    atlas: Atlas<S::Image>,
    vase: Sprite,
    session: Session,
    events: EventBus,
    /// An animation frame is pending
    frame_armed: bool,
}

impl<S: Surface, A: ToneBackend, C: Scheduler> fmt::Debug for Game<S, A, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("settings", &self.settings)
            .field("session", &self.session)
            .field("vase", &self.vase)
            .field("tiles", &self.atlas.len())
            .field("frame_armed", &self.frame_armed)
            .finish_non_exhaustive()
    }
}

impl<S: Surface, A: ToneBackend, C: Scheduler> Game<S, A, C> {
    /// Build the game and announce `init:complete` to `events`.
    ///
    /// Nothing is drawn until the tileset arrives via [`Game::finish_loading`].
    pub fn new(settings: Settings, surface: S, audio: A, scheduler: C, events: EventBus) -> Self {
        let mut sound = ToneEngine::new(audio);
        sound.set_master_volume(settings.master_volume);
        sound.set_muted(settings.muted);

        let vase = Sprite::centered(
            VASE_KEY,
            settings.width as f32,
            settings.height as f32,
            VASE_SIZE as f32,
        );

        let mut game = Self {
            session: Session::new(settings.fps),
            settings,
            surface,
            sound,
            scheduler,
            input: InputTracker::new(),
            atlas: Atlas::new(),
            vase,
            events,
            frame_armed: false,
        };
        log::info!(
            "Game initialized ({}x{} @ {} fps)",
            game.settings.width,
            game.settings.height,
            game.session.fps
        );
        game.events.emit(GameEvent::InitComplete);
        game
    }

    // === Events ===

    /// Register a lifecycle listener
    pub fn on<F>(&mut self, event: GameEvent, handler: F)
    where
        F: FnMut(GameEvent) + 'static,
    {
        self.events.on(event, handler);
    }

    /// Dispatch an event: built-in reaction first, then listeners
    pub fn emit(&mut self, event: GameEvent) -> Result<(), GameError> {
        log::debug!("event: {}", event);
        match event {
            GameEvent::TogglePause => self.toggle_pause()?,
            GameEvent::Pause => self.pause(),
            GameEvent::Unpause => self.unpause()?,
            GameEvent::LoadingComplete => self.tick()?,
            GameEvent::InitComplete | GameEvent::Paused | GameEvent::Unpaused => {}
        }
        self.events.emit(event);
        Ok(())
    }

    /// Emit by wire name, e.g. `"pause"`
    pub fn emit_named(&mut self, name: &str) -> Result<(), GameError> {
        let event = name.parse::<GameEvent>()?;
        self.emit(event)
    }

    // === Loading ===

    pub fn tileset_path(&self) -> &str {
        &self.settings.tileset_image
    }

    /// Adopt a loaded atlas, register tiles and start the loop.
    ///
    /// A failed load is logged and leaves the game idle and undrawn.
    pub fn finish_loading(
        &mut self,
        result: Result<Atlas<S::Image>, AssetError>,
    ) -> Result<(), GameError> {
        match result {
            Ok(atlas) => {
                self.atlas = atlas;
                self.load_tiles()?;
                self.session.images_loaded = true;
                log::info!("Tileset loaded: {}", self.settings.tileset_image);
                self.emit(GameEvent::LoadingComplete)
            }
            Err(err) => {
                log::error!("Error loading image {}: {}", self.settings.tileset_image, err);
                Ok(())
            }
        }
    }

    fn load_tiles(&mut self) -> Result<(), GameError> {
        self.atlas
            .add(VASE_KEY, TileRect::new(0, 0, VASE_SIZE, VASE_SIZE))?;
        Ok(())
    }

    // === State machine ===

    /// Flip pause, beep, announce the new state and draw one frame
    pub fn toggle_pause(&mut self) -> Result<(), GameError> {
        self.sound
            .play_note(self.settings.pause_tone_hz, &mut self.scheduler);
        self.session.paused = !self.session.paused;

        let event = if self.session.paused {
            GameEvent::Paused
        } else {
            GameEvent::Unpaused
        };
        log::debug!("toggle -> {:?}", self.session.run_state());
        self.events.emit(event);

        // One pass regardless of the new state
        self.session.time = self.scheduler.now();
        self.update()?;
        if !self.session.paused {
            self.arm_frame();
        }
        Ok(())
    }

    /// Force pause without notifying
    pub fn pause(&mut self) {
        self.session.paused = true;
    }

    /// Force resume without notifying and restart the tick cycle
    pub fn unpause(&mut self) -> Result<(), GameError> {
        self.session.paused = false;
        self.tick()
    }

    pub fn run_state(&self) -> RunState {
        self.session.run_state()
    }

    // === Loop ===

    /// Animation-frame callback
    pub fn on_frame(&mut self) -> Result<(), GameError> {
        self.frame_armed = false;
        self.tick()
    }

    /// Update at most once per frame interval, then re-arm while running.
    ///
    /// A failed update returns before re-arming, which stops the loop.
    pub fn tick(&mut self) -> Result<(), GameError> {
        if self.session.paused {
            return Ok(());
        }

        let now = self.scheduler.now();
        let elapsed = now - self.session.time;
        let interval = self.session.frame_interval();

        if elapsed > interval {
            self.session.time = now - elapsed % interval;
            self.update()?;
        }
        self.arm_frame();
        Ok(())
    }

    fn arm_frame(&mut self) {
        if !self.frame_armed {
            self.frame_armed = true;
            self.scheduler.request_frame();
        }
    }

    /// Clear, move the vase from the held directions, draw it
    pub fn update(&mut self) -> Result<(), GameError> {
        let (w, h) = (self.settings.width, self.settings.height);
        self.surface.clear_rect(0.0, 0.0, w as f64, h as f64);

        motion::advance(
            &mut self.vase,
            self.input.directions(),
            self.settings.speed,
            Vec2::new(w as f32, h as f32),
        );
        blit_tile(&mut self.surface, &self.atlas, &self.vase.key, self.vase.pos)
    }

    /// Draw the tile named `key` at `pos`; an unknown key is an error
    pub fn draw_image(&mut self, key: &str, pos: Vec2) -> Result<(), GameError> {
        blit_tile(&mut self.surface, &self.atlas, key, pos)
    }

    // === Input ===

    pub fn key_down(&mut self, key: Key) -> Result<(), GameError> {
        match self.input.key_down(key) {
            InputCommand::TogglePause => self.toggle_pause(),
            InputCommand::None => Ok(()),
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.input.key_up(key);
    }

    /// Touch began at `point` (screen coordinates); a double tap toggles pause
    pub fn touch_start(&mut self, point: DVec2) -> Result<(), GameError> {
        match self.input.touch_start(point, &mut self.scheduler) {
            InputCommand::TogglePause => self.toggle_pause(),
            InputCommand::None => Ok(()),
        }
    }

    pub fn touch_move(&mut self, point: DVec2) {
        self.input.touch_move(point);
    }

    pub fn touch_end(&mut self) {
        self.input.touch_end();
    }

    pub fn directions(&self) -> Directions {
        self.input.directions()
    }

    /// Timer callback from the scheduler
    pub fn on_timer(&mut self, handle: TimerHandle, kind: TimerKind) {
        match kind {
            TimerKind::NoteEnd => {
                self.sound.end_note(handle);
            }
            TimerKind::DoubleTapExpiry => self.input.expire_tap(handle),
        }
    }

    // === Accessors ===

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn vase(&self) -> &Sprite {
        &self.vase
    }

    pub fn atlas(&self) -> &Atlas<S::Image> {
        &self.atlas
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn sound(&self) -> &ToneEngine<A> {
        &self.sound
    }

    pub fn sound_mut(&mut self) -> &mut ToneEngine<A> {
        &mut self.sound
    }

    pub fn scheduler(&self) -> &C {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut C {
        &mut self.scheduler
    }
}

fn blit_tile<S: Surface>(
    surface: &mut S,
    atlas: &Atlas<S::Image>,
    key: &str,
    pos: Vec2,
) -> Result<(), GameError> {
    let tile = atlas
        .tile(key)
        .ok_or_else(|| GameError::TileNotFound(key.to_string()))?;
    let image = atlas.image().ok_or(GameError::ImageNotLoaded)?;
    surface.blit(image, tile, pos);
    Ok(())
}
