//! Sound cues
//!
//! Every cue is a single oscillator with a frequency sweep and a gain
//! envelope, so no audio files are needed. The recipes are plain data; the
//! Web Audio backend only schedules them.

use crate::settings::Settings;
use crate::sim::SoundCue;

/// Anything that can play the simulation's sound cues
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// Silent sink for headless runs
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, cue: SoundCue) {
        log::trace!("(silent) {cue:?}");
    }
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// How a parameter moves to its next value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ramp {
    Linear,
    Exponential,
}

/// Parameter target reached `at` seconds after the cue starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub at: f64,
    pub value: f32,
    pub ramp: Ramp,
}

const fn key(at: f64, value: f32, ramp: Ramp) -> Keyframe {
    Keyframe { at, value, ramp }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recipe {
    pub waveform: Waveform,
    pub start_freq: f32,
    pub freq: &'static [Keyframe],
    /// Peak gain before volume scaling
    pub start_gain: f32,
    pub gain: &'static [Keyframe],
    /// Seconds until the oscillator stops
    pub duration: f64,
}

const SHOOT: Recipe = Recipe {
    waveform: Waveform::Square,
    start_freq: 440.0,
    freq: &[key(0.1, 110.0, Ramp::Exponential)],
    start_gain: 0.1,
    gain: &[key(0.1, 0.01, Ramp::Exponential)],
    duration: 0.1,
};

const EXPLOSION: Recipe = Recipe {
    waveform: Waveform::Sawtooth,
    start_freq: 100.0,
    freq: &[key(0.3, 10.0, Ramp::Exponential)],
    start_gain: 0.2,
    gain: &[key(0.3, 0.01, Ramp::Exponential)],
    duration: 0.3,
};

const HIT: Recipe = Recipe {
    waveform: Waveform::Triangle,
    start_freq: 200.0,
    freq: &[key(0.1, 50.0, Ramp::Exponential)],
    start_gain: 0.1,
    gain: &[key(0.1, 0.01, Ramp::Exponential)],
    duration: 0.1,
};

/// Rising two-step sweep with a linear fade
const LEVEL_UP: Recipe = Recipe {
    waveform: Waveform::Sine,
    start_freq: 400.0,
    freq: &[key(0.2, 800.0, Ramp::Linear), key(0.4, 1200.0, Ramp::Linear)],
    start_gain: 0.3,
    gain: &[key(0.6, 0.0, Ramp::Linear)],
    duration: 0.6,
};

pub fn recipe(cue: SoundCue) -> Recipe {
    match cue {
        SoundCue::Shoot => SHOOT,
        SoundCue::Explosion => EXPLOSION,
        SoundCue::Hit => HIT,
        SoundCue::LevelUp => LEVEL_UP,
    }
}

/// Volume and mute state shared by every backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mixer {
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Mixer {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Mixer {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    /// Multiplier applied to every recipe gain
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, AudioParam, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, Keyframe, Mixer, Ramp, Recipe, Waveform, recipe};
    use crate::sim::SoundCue;

    /// Web Audio backend
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        pub mixer: Mixer,
    }

    impl AudioManager {
        pub fn new(mixer: Mixer) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, mixer }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.mixer.muted = muted;
        }

        fn create_osc(
            ctx: &AudioContext,
            waveform: Waveform,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(match waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
                Waveform::Triangle => OscillatorType::Triangle,
            });
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn schedule(param: &AudioParam, t: f64, start: f32, keys: &[Keyframe], scale: f32) {
            param.set_value_at_time(start * scale, t).ok();
            for k in keys {
                let value = k.value * scale;
                match k.ramp {
                    Ramp::Linear => param.linear_ramp_to_value_at_time(value, t + k.at).ok(),
                    Ramp::Exponential => param
                        .exponential_ramp_to_value_at_time(value, t + k.at)
                        .ok(),
                };
            }
        }

        fn play_recipe(ctx: &AudioContext, recipe: &Recipe, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, recipe.waveform) else {
                return;
            };
            let t = ctx.current_time();

            Self::schedule(&osc.frequency(), t, recipe.start_freq, recipe.freq, 1.0);
            Self::schedule(&gain.gain(), t, recipe.start_gain, recipe.gain, vol);

            osc.start().ok();
            osc.stop_with_when(t + recipe.duration).ok();
        }
    }

    impl AudioSink for AudioManager {
        fn play(&mut self, cue: SoundCue) {
            let vol = self.mixer.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Browsers suspend the context until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            Self::play_recipe(ctx, &recipe(cue), vol);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SoundCue; 4] = [
        SoundCue::Shoot,
        SoundCue::Hit,
        SoundCue::Explosion,
        SoundCue::LevelUp,
    ];

    #[test]
    fn test_recipes_end_by_duration() {
        for cue in ALL {
            let r = recipe(cue);
            assert!(r.freq.iter().all(|k| k.at <= r.duration), "{cue:?}");
            assert!(r.gain.iter().all(|k| k.at <= r.duration), "{cue:?}");
        }
    }

    #[test]
    fn test_exponential_targets_are_positive() {
        // Web Audio rejects exponential ramps to zero
        for cue in ALL {
            let r = recipe(cue);
            for k in r.freq.iter().chain(r.gain) {
                if k.ramp == Ramp::Exponential {
                    assert!(k.value > 0.0, "{cue:?}");
                }
            }
        }
    }

    #[test]
    fn test_levelup_sweep() {
        let r = recipe(SoundCue::LevelUp);
        assert_eq!(r.waveform, Waveform::Sine);
        let freqs: Vec<f32> = r.freq.iter().map(|k| k.value).collect();
        assert_eq!(freqs, vec![800.0, 1200.0]);
        assert_eq!(r.gain.last().map(|k| k.value), Some(0.0));
    }

    #[test]
    fn test_mixer_volume() {
        let mut mixer = Mixer {
            master_volume: 0.5,
            sfx_volume: 0.5,
            muted: false,
        };
        assert_eq!(mixer.effective_volume(), 0.25);
        mixer.muted = true;
        assert_eq!(mixer.effective_volume(), 0.0);
    }

    #[test]
    fn test_mixer_clamps_settings() {
        let settings = Settings {
            master_volume: 3.0,
            ..Settings::default()
        };
        assert_eq!(Mixer::from_settings(&settings).master_volume, 1.0);
    }
}
