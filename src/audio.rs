//! Audio system
//!
//! A single always-running sine oscillator behind a gain gate. `play_note`
//! opens the gate; it closes only once every queued note has expired, so
//! rapid notes keep the tone sounding instead of retriggering it.

use std::collections::VecDeque;

use crate::consts::{NOTE_DURATION_MS, SAMPLE_VOLUME};
use crate::platform::{AssetFuture, Scheduler, TimerHandle, TimerKind};

/// Tone generator + sample player
pub trait ToneBackend {
    type Sample;

    fn set_frequency(&mut self, hz: f32);

    fn set_gain(&mut self, gain: f32);

    /// Fire-and-forget playback through its own gain node
    fn play_sample(&mut self, sample: &Self::Sample, volume: f32);

    /// Fetch and decode a sample by path
    fn fetch_sample(&self, path: &str) -> AssetFuture<Self::Sample>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveNote {
    frequency: f32,
    timer: TimerHandle,
}

/// Note gate over a [`ToneBackend`]
#[derive(Debug)]
pub struct ToneEngine<B> {
    backend: B,
    active_notes: VecDeque<ActiveNote>,
    master_volume: f32,
    muted: bool,
}

impl<B: ToneBackend> ToneEngine<B> {
    /// Wrap `backend`, starting silent
    pub fn new(mut backend: B) -> Self {
        backend.set_gain(0.0);
        Self {
            backend,
            active_notes: VecDeque::new(),
            master_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.backend.set_gain(0.0);
        } else if !self.active_notes.is_empty() {
            self.backend.set_gain(self.master_volume);
        }
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Sound `frequency` for [`NOTE_DURATION_MS`]
    pub fn play_note<S: Scheduler>(&mut self, frequency: f32, scheduler: &mut S) {
        self.backend.set_frequency(frequency);
        self.backend.set_gain(self.effective_volume());
        let timer = scheduler.set_timeout(NOTE_DURATION_MS, TimerKind::NoteEnd);
        self.active_notes.push_back(ActiveNote { frequency, timer });
    }

    /// Retire the note owning `timer`; silences the gate when none remain
    pub fn end_note(&mut self, timer: TimerHandle) -> Option<f32> {
        let pos = self.active_notes.iter().position(|n| n.timer == timer)?;
        let note = self.active_notes.remove(pos)?;
        if self.active_notes.is_empty() {
            self.backend.set_gain(0.0);
        }
        Some(note.frequency)
    }

    /// Number of notes still holding the gate open
    pub fn active_notes(&self) -> usize {
        self.active_notes.len()
    }

    pub fn fetch_sample(&self, path: &str) -> AssetFuture<B::Sample> {
        self.backend.fetch_sample(path)
    }

    pub fn play_sample(&mut self, sample: &B::Sample) {
        let vol = self.effective_volume() * SAMPLE_VOLUME;
        if vol <= 0.0 {
            return;
        }
        self.backend.play_sample(sample, vol);
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use js_sys::ArrayBuffer;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{AudioBuffer, AudioContext, GainNode, OscillatorNode, OscillatorType, Response};

    use super::ToneBackend;
    use crate::error::AssetError;
    use crate::platform::AssetFuture;

    /// Web Audio backend: one oscillator into one gain node
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        nodes: Option<(OscillatorNode, GainNode)>,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            let nodes = ctx.as_ref().and_then(Self::create_tone);
            Self { ctx, nodes }
        }

        fn create_tone(ctx: &AudioContext) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let amp = ctx.create_gain().ok()?;

            osc.set_type(OscillatorType::Sine);
            amp.gain().set_value(0.0);
            osc.connect_with_audio_node(&amp).ok()?;
            amp.connect_with_audio_node(&ctx.destination()).ok()?;
            osc.start().ok()?;

            Some((osc, amp))
        }

        /// Resume audio context (required after user gesture)
        fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }
    }

    impl ToneBackend for WebAudio {
        type Sample = AudioBuffer;

        fn set_frequency(&mut self, hz: f32) {
            self.resume();
            if let Some((osc, _)) = &self.nodes {
                osc.frequency().set_value(hz);
            }
        }

        fn set_gain(&mut self, gain: f32) {
            if let Some((_, amp)) = &self.nodes {
                amp.gain().set_value(gain);
            }
        }

        fn play_sample(&mut self, sample: &AudioBuffer, volume: f32) {
            let Some(ctx) = &self.ctx else { return };
            self.resume();

            let played = (|| -> Result<(), JsValue> {
                let source = ctx.create_buffer_source()?;
                source.set_buffer(Some(sample));
                let amp = ctx.create_gain()?;
                source.connect_with_audio_node(&amp)?;
                amp.connect_with_audio_node(&ctx.destination())?;
                amp.gain().set_value(volume);
                source.start()?;
                Ok(())
            })();
            if let Err(e) = played {
                log::warn!("Sample playback failed: {:?}", e);
            }
        }

        fn fetch_sample(&self, path: &str) -> AssetFuture<AudioBuffer> {
            let ctx = self.ctx.clone();
            let path = path.to_string();
            Box::pin(async move {
                let fail = |reason: String| AssetError::Sample {
                    path: path.clone(),
                    reason,
                };
                let ctx = ctx.ok_or_else(|| fail("audio disabled".to_string()))?;
                let window = web_sys::window().ok_or_else(|| fail("no window".to_string()))?;

                let url: String = js_sys::encode_uri_component(&path).into();
                let response: Response = JsFuture::from(window.fetch_with_str(&url))
                    .await
                    .and_then(|r| r.dyn_into())
                    .map_err(|e| fail(format!("{:?}", e)))?;
                let bytes: ArrayBuffer = JsFuture::from(
                    response.array_buffer().map_err(|e| fail(format!("{:?}", e)))?,
                )
                .await
                .and_then(|b| b.dyn_into())
                .map_err(|e| fail(format!("{:?}", e)))?;
                let decoded = ctx
                    .decode_audio_data(&bytes)
                    .map_err(|e| fail(format!("{:?}", e)))?;
                JsFuture::from(decoded)
                    .await
                    .and_then(|b| b.dyn_into::<AudioBuffer>())
                    .map_err(|e| fail(format!("{:?}", e)))
            })
        }
    }
}
