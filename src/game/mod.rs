// Game layer: the driving demo built on top of the engine
//
// - `vehicle`: car kinematics and tuning presets
// - `camera_follow`: chase and cockpit cameras
// - `engine_sound`: speed and boost to engine tone
// - `city`: the static scene and car model
// - `config`: variant selection
// - `session`: per-frame orchestration

pub mod camera_follow;
pub mod city;
pub mod config;
pub mod engine_sound;
pub mod session;
pub mod vehicle;

pub use city::City;
pub use config::GameConfig;
pub use session::GameSession;
