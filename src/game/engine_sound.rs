// Maps the car's state onto engine tone targets

use crate::engine::audio::ToneTargets;
use crate::game::vehicle::VehicleState;

/// Linear mapping from speed fraction and boost intensity to tone targets
#[derive(Debug, Clone, PartialEq)]
pub struct AudioTuning {
    /// Speed treated as "full speed"
    pub reference_speed: f32,
    /// Idle pitch (Hz)
    pub base_frequency: f32,
    /// Extra pitch at full speed (Hz)
    pub frequency_speed_gain: f32,
    /// Extra pitch at full boost (Hz)
    pub frequency_boost_gain: f32,
    /// Pitch glide time constant (seconds)
    pub frequency_time_constant: f32,
    /// Idle gain
    pub base_gain: f32,
    /// Extra gain at full speed
    pub gain_speed_gain: f32,
    /// Extra gain at full boost
    pub gain_boost_gain: f32,
    /// Gain glide time constant (seconds)
    pub gain_time_constant: f32,
}

pub const CLASSIC_AUDIO: AudioTuning = AudioTuning {
    reference_speed: 380.0,
    base_frequency: 95.0,
    frequency_speed_gain: 420.0,
    frequency_boost_gain: 120.0,
    frequency_time_constant: 0.04,
    base_gain: 0.02,
    gain_speed_gain: 0.09,
    gain_boost_gain: 0.0,
    gain_time_constant: 0.08,
};

pub const BOOST_AUDIO: AudioTuning = AudioTuning {
    gain_boost_gain: 0.03,
    ..CLASSIC_AUDIO
};

/// Hard ceiling on the engine gain
const MAX_GAIN: f32 = 0.2;

impl AudioTuning {
    pub fn classic() -> Self {
        CLASSIC_AUDIO
    }

    pub fn boost() -> Self {
        BOOST_AUDIO
    }
}

impl Default for AudioTuning {
    fn default() -> Self {
        BOOST_AUDIO
    }
}

/// Tone targets for the current car state
pub fn tone_targets(tuning: &AudioTuning, state: &VehicleState) -> ToneTargets {
    let ratio = if tuning.reference_speed > 0.0 {
        state.speed / tuning.reference_speed
    } else {
        0.0
    };
    let boost = state.boost_intensity;

    ToneTargets {
        frequency: tuning.base_frequency
            + ratio * tuning.frequency_speed_gain
            + boost * tuning.frequency_boost_gain,
        frequency_time_constant: tuning.frequency_time_constant,
        gain: (tuning.base_gain + ratio * tuning.gain_speed_gain + boost * tuning.gain_boost_gain)
            .clamp(0.0, MAX_GAIN),
        gain_time_constant: tuning.gain_time_constant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn state(speed: f32, boost: f32) -> VehicleState {
        VehicleState {
            speed,
            boost_intensity: boost,
            ..Default::default()
        }
    }

    #[test]
    fn test_idle_tone() {
        let targets = tone_targets(&AudioTuning::classic(), &state(0.0, 0.0));
        assert_relative_eq!(targets.frequency, 95.0);
        assert_relative_eq!(targets.gain, 0.02);
        assert_eq!(targets.frequency_time_constant, 0.04);
        assert_eq!(targets.gain_time_constant, 0.08);
    }

    #[test]
    fn test_full_speed_and_boost() {
        let targets = tone_targets(&AudioTuning::classic(), &state(380.0, 1.0));
        assert_relative_eq!(targets.frequency, 95.0 + 420.0 + 120.0);
        assert_relative_eq!(targets.gain, 0.11);
    }

    #[test]
    fn test_half_speed_is_linear() {
        let targets = tone_targets(&AudioTuning::classic(), &state(190.0, 0.0));
        assert_relative_eq!(targets.frequency, 95.0 + 210.0);
        assert_relative_eq!(targets.gain, 0.065);
    }

    #[test]
    fn test_boost_build_louder_under_boost() {
        let classic = tone_targets(&AudioTuning::classic(), &state(300.0, 1.0));
        let boost = tone_targets(&AudioTuning::boost(), &state(300.0, 1.0));
        assert!(boost.gain > classic.gain);
        assert_eq!(boost.frequency, classic.frequency);
    }

    #[test]
    fn test_gain_never_exceeds_ceiling() {
        // Boosted top speed is above the reference speed
        let targets = tone_targets(&AudioTuning::boost(), &state(520.0, 1.0));
        assert!(targets.gain <= 0.2);
    }
}
