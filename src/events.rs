//! Lifecycle events and the observer registry
//!
//! Handlers are plain closures keyed by event, invoked synchronously in
//! registration order.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownEvent;

/// Named lifecycle notifications (no payload)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEvent {
    /// Game constructed
    InitComplete,
    /// Tileset loaded and tiles registered
    LoadingComplete,
    /// Toggled into the paused state
    Paused,
    /// Toggled back into the running state
    Unpaused,
    /// Request: flip the pause state
    TogglePause,
    /// Request: force pause (silent)
    Pause,
    /// Request: force resume (silent)
    Unpause,
}

impl GameEvent {
    pub const ALL: [GameEvent; 7] = [
        GameEvent::InitComplete,
        GameEvent::LoadingComplete,
        GameEvent::Paused,
        GameEvent::Unpaused,
        GameEvent::TogglePause,
        GameEvent::Pause,
        GameEvent::Unpause,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameEvent::InitComplete => "init:complete",
            GameEvent::LoadingComplete => "loading:complete",
            GameEvent::Paused => "paused",
            GameEvent::Unpaused => "unpaused",
            GameEvent::TogglePause => "togglePause",
            GameEvent::Pause => "pause",
            GameEvent::Unpause => "unpause",
        }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameEvent {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameEvent::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| UnknownEvent(s.to_string()))
    }
}

/// Event handler
pub type Listener = Box<dyn FnMut(GameEvent)>;

/// Publish/subscribe registry
#[derive(Default)]
pub struct EventBus {
    listeners: HashMap<GameEvent, Vec<Listener>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .listeners
            .iter()
            .map(|(e, l)| (e.as_str(), l.len()))
            .collect();
        f.debug_struct("EventBus").field("listeners", &counts).finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `event`
    pub fn on<F>(&mut self, event: GameEvent, handler: F)
    where
        F: FnMut(GameEvent) + 'static,
    {
        self.listeners
            .entry(event)
            .or_default()
            .push(Box::new(handler));
    }

    /// Invoke every handler registered for `event`, returns how many ran
    pub fn emit(&mut self, event: GameEvent) -> usize {
        let Some(handlers) = self.listeners.get_mut(&event) else {
            return 0;
        };
        for handler in handlers.iter_mut() {
            handler(event);
        }
        handlers.len()
    }

    pub fn listener_count(&self, event: GameEvent) -> usize {
        self.listeners.get(&event).map_or(0, Vec::len)
    }
}
