// Sawtooth engine tone with exponential parameter approach

use super::{AudioError, AudioSink};

/// Gain the oscillator starts at, so opening the device does not click
const INITIAL_GAIN: f32 = 0.001;

/// Frequency the oscillator starts at (Hz)
const INITIAL_FREQUENCY: f32 = 95.0;

/// A parameter that glides toward its target sample by sample
#[derive(Debug, Clone, Copy)]
struct SmoothedParam {
    value: f32,
    target: f32,
    time_constant: f32,
}

impl SmoothedParam {
    fn new(value: f32) -> Self {
        Self {
            value,
            target: value,
            time_constant: 0.0,
        }
    }

    fn set_target(&mut self, target: f32, time_constant: f32) {
        self.target = target;
        self.time_constant = time_constant.max(0.0);
    }

    /// One sample of the approach: value += (target - value) * (1 - e^(-1 / (tau * rate)))
    fn tick(&mut self, sample_rate: f32) -> f32 {
        if self.time_constant <= 0.0 {
            self.value = self.target;
        } else {
            let k = 1.0 - (-1.0 / (self.time_constant * sample_rate)).exp();
            self.value += (self.target - self.value) * k;
        }
        self.value
    }

    /// Jump `dt` seconds along the approach in one step
    fn skip(&mut self, dt: f32) {
        if self.time_constant <= 0.0 {
            self.value = self.target;
        } else {
            self.value = self.target + (self.value - self.target) * (-dt / self.time_constant).exp();
        }
    }
}

/// Software sawtooth oscillator feeding a gain stage.
///
/// An output backend pulls samples with `render`. With no backend attached the
/// synth only tracks its parameters as time passes and reports itself as not
/// audible.
#[derive(Debug)]
pub struct ToneSynth {
    sample_rate: u32,
    phase: f32,
    frequency: SmoothedParam,
    gain: SmoothedParam,
    running: bool,
}

impl ToneSynth {
    /// Create a stopped synthesizer
    pub fn new(sample_rate: u32) -> Result<Self, AudioError> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate(sample_rate));
        }
        Ok(Self {
            sample_rate,
            phase: 0.0,
            frequency: SmoothedParam::new(INITIAL_FREQUENCY),
            gain: SmoothedParam::new(INITIAL_GAIN),
            running: false,
        })
    }

    /// Current (smoothed) frequency in Hz
    #[allow(dead_code)]
    pub fn frequency(&self) -> f32 {
        self.frequency.value
    }

    /// Current (smoothed) gain
    #[allow(dead_code)]
    pub fn gain(&self) -> f32 {
        self.gain.value
    }

    /// Fill `out` with samples; silence while stopped
    #[allow(dead_code)]
    pub fn render(&mut self, out: &mut [f32]) {
        if !self.running {
            out.fill(0.0);
            return;
        }

        let rate = self.sample_rate as f32;
        for sample in out.iter_mut() {
            let frequency = self.frequency.tick(rate);
            let gain = self.gain.tick(rate);

            *sample = (2.0 * self.phase - 1.0) * gain;

            self.phase += frequency / rate;
            self.phase -= self.phase.floor();
        }
    }

}

impl AudioSink for ToneSynth {
    fn resume(&mut self) -> Result<(), AudioError> {
        self.running = true;
        Ok(())
    }

    fn set_frequency_target(&mut self, hz: f32, time_constant: f32) {
        self.frequency.set_target(hz.max(0.0), time_constant);
    }

    fn set_gain_target(&mut self, gain: f32, time_constant: f32) {
        self.gain.set_target(gain.max(0.0), time_constant);
    }

    fn advance(&mut self, dt: f32) {
        if !self.running {
            return;
        }
        let dt = dt.max(0.0);
        self.phase += self.frequency.value * dt;
        self.phase -= self.phase.floor();
        self.frequency.skip(dt);
        self.gain.skip(dt);
    }

    fn is_audible(&self) -> bool {
        false
    }
}
