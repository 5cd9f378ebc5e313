// Game configuration: picks one of the two builds and gathers its tuning

use crate::engine::game_loop::DEFAULT_FRAME_CAP;
use crate::engine::input::{InputConfig, TouchLayout};
use crate::game::camera_follow::CameraTuning;
use crate::game::engine_sound::AudioTuning;
use crate::game::vehicle::VehicleTuning;
use std::fmt;
use std::str::FromStr;

/// Environment variable selecting the build variant
pub const VARIANT_ENV_VAR: &str = "CITY_DRIVE_VARIANT";

/// Render area aspect ratio; taller windows are letterboxed
pub const WIDE_ASPECT: f32 = 2.05;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown variant '{0}', expected 'classic' or 'boost'")]
    UnknownVariant(String),
}

/// The two builds of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// Boost is earned by flooring it near top speed; no boost control
    Classic,
    /// Boost is a held key or on-screen button
    #[default]
    Boost,
}

impl FromStr for Variant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(Variant::Classic),
            "boost" => Ok(Variant::Boost),
            other => Err(ConfigError::UnknownVariant(other.to_string())),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Classic => write!(f, "classic"),
            Variant::Boost => write!(f, "boost"),
        }
    }
}

/// Everything the session needs to know before the first frame
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub variant: Variant,
    pub vehicle: VehicleTuning,
    pub camera: CameraTuning,
    pub audio: AudioTuning,
    pub bindings: InputConfig,
    pub touch: TouchLayout,
    /// Largest time step per frame (seconds)
    pub frame_cap: f32,
    /// Render area aspect ratio
    pub wide_aspect: f32,
}

impl GameConfig {
    /// Full configuration for a variant
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Classic => Self {
                variant,
                vehicle: VehicleTuning::classic(),
                camera: CameraTuning::classic(),
                audio: AudioTuning::classic(),
                bindings: InputConfig::standard(false),
                touch: TouchLayout::classic(),
                frame_cap: DEFAULT_FRAME_CAP,
                wide_aspect: WIDE_ASPECT,
            },
            Variant::Boost => Self {
                variant,
                vehicle: VehicleTuning::boost(),
                camera: CameraTuning::boost(),
                audio: AudioTuning::boost(),
                bindings: InputConfig::standard(true),
                touch: TouchLayout::with_boost_button(),
                frame_cap: DEFAULT_FRAME_CAP,
                wide_aspect: WIDE_ASPECT,
            },
        }
    }

    /// Configuration for an optional variant name; `None` picks the default
    pub fn from_variant_name(name: Option<&str>) -> Result<Self, ConfigError> {
        let variant = match name {
            Some(name) if !name.trim().is_empty() => name.parse()?,
            _ => Variant::default(),
        };
        Ok(Self::for_variant(variant))
    }

    /// Configuration selected by `CITY_DRIVE_VARIANT`
    pub fn from_env() -> Result<Self, ConfigError> {
        let name = std::env::var(VARIANT_ENV_VAR).ok();
        Self::from_variant_name(name.as_deref())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::for_variant(Variant::default())
    }
}
