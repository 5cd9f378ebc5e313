// Audio output: the synthesizer sink and its lazily started handle
//
// Platforms only allow audio to start from a user gesture, so the output
// stays empty until `AudioOutput::start` is called. Until then every target
// update is silently dropped.

mod synth;

pub use synth::ToneSynth;

use log::info;

/// Sample rate used by the built-in synthesizer
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Audio errors
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Audio device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(u32),
}

/// Targets for the engine tone, each approached with its own time constant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneTargets {
    /// Oscillator frequency in Hz
    pub frequency: f32,
    /// Time constant for the frequency approach (seconds)
    pub frequency_time_constant: f32,
    /// Linear output gain
    pub gain: f32,
    /// Time constant for the gain approach (seconds)
    pub gain_time_constant: f32,
}

/// A device that accepts smoothed frequency and gain targets
pub trait AudioSink {
    /// Start or unpause output
    fn resume(&mut self) -> Result<(), AudioError>;

    /// Approach `hz` exponentially with the given time constant
    fn set_frequency_target(&mut self, hz: f32, time_constant: f32);

    /// Approach `gain` exponentially with the given time constant
    fn set_gain_target(&mut self, gain: f32, time_constant: f32);

    /// Let `dt` seconds of device time pass
    fn advance(&mut self, _dt: f32) {}

    /// Whether samples actually reach a speaker
    fn is_audible(&self) -> bool {
        true
    }
}

/// Lazily started audio output
#[derive(Default)]
pub struct AudioOutput {
    sink: Option<Box<dyn AudioSink>>,
}

impl AudioOutput {
    /// Create an output with no device yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a device has been started
    pub fn is_started(&self) -> bool {
        self.sink.is_some()
    }

    /// Whether a started device reaches a speaker
    pub fn is_audible(&self) -> bool {
        self.sink.as_ref().is_some_and(|sink| sink.is_audible())
    }

    /// Open the device on first call, then resume it.
    ///
    /// Later calls reuse the existing device and only resume it.
    pub fn start<F>(&mut self, open: F) -> Result<(), AudioError>
    where
        F: FnOnce() -> Result<Box<dyn AudioSink>, AudioError>,
    {
        if self.sink.is_none() {
            self.sink = Some(open()?);
            info!("Audio output opened");
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.resume()?;
        }
        Ok(())
    }

    /// Forward targets to the device; no-op before `start`
    pub fn apply(&mut self, targets: &ToneTargets) {
        if let Some(sink) = self.sink.as_mut() {
            sink.set_frequency_target(targets.frequency, targets.frequency_time_constant);
            sink.set_gain_target(targets.gain, targets.gain_time_constant);
        }
    }

    /// Advance device time; no-op before `start`
    pub fn advance(&mut self, dt: f32) {
        if let Some(sink) = self.sink.as_mut() {
            sink.advance(dt);
        }
    }
}
