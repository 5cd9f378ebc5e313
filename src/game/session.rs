// Game session: wires controls, car, camera and engine sound into one frame update

use crate::engine::audio::{AudioError, AudioOutput, AudioSink, ToneSynth, DEFAULT_SAMPLE_RATE};
use crate::engine::game_loop::FrameUpdate;
use crate::engine::input::{Command, ControlAggregator};
use crate::engine::renderer::Instance;
use crate::game::camera_follow::{CameraFollow, CameraMode, CameraPose};
use crate::game::city::CarPart;
use crate::game::config::GameConfig;
use crate::game::engine_sound::tone_targets;
use crate::game::vehicle::{Vehicle, VehicleState};
use log::{info, warn};

/// Everything the renderer and HUD need from one update
#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub camera: CameraPose,
    /// One instance per car part, already placed in the world
    pub car: Vec<Instance>,
    /// Speed shown to the player
    pub display_speed: u32,
    pub boost_intensity: f32,
}

/// One running drive
pub struct GameSession {
    config: GameConfig,
    controls: ControlAggregator,
    vehicle: Vehicle,
    camera: CameraFollow,
    audio: AudioOutput,
    car_model: Vec<CarPart>,
    frame: FrameOutput,
}

impl GameSession {
    /// Start a session with the car parked at the origin
    pub fn new(config: GameConfig, car_model: Vec<CarPart>) -> Self {
        let controls = ControlAggregator::new(config.bindings.clone(), config.touch.clone());
        let vehicle = Vehicle::new(config.vehicle.clone());
        let camera = CameraFollow::new(config.camera.clone(), vehicle.state(), CameraMode::default());

        let frame = FrameOutput {
            camera: camera.pose(),
            car: place_car(&car_model, vehicle.state()),
            display_speed: vehicle.display_speed(),
            boost_intensity: vehicle.state().boost_intensity,
        };

        info!("Session started ({} build)", config.variant);

        Self {
            config,
            controls,
            vehicle,
            camera,
            audio: AudioOutput::new(),
            car_model,
            frame,
        }
    }

    /// Input events are fed here between frames
    pub fn controls_mut(&mut self) -> &mut ControlAggregator {
        &mut self.controls
    }

    #[allow(dead_code)]
    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    #[allow(dead_code)]
    pub fn camera_mode(&self) -> CameraMode {
        self.camera.mode()
    }

    #[allow(dead_code)]
    pub fn audio_started(&self) -> bool {
        self.audio.is_started()
    }

    /// Output of the last update
    pub fn frame(&self) -> &FrameOutput {
        &self.frame
    }

    /// Advance the simulation by `dt` seconds
    pub fn update(&mut self, dt: f32) -> &FrameOutput {
        self.vehicle.step(dt, self.controls.control());
        let state = self.vehicle.state();

        let camera = self.camera.update(dt, state);

        self.audio.apply(&tone_targets(&self.config.audio, state));
        self.audio.advance(dt);

        self.frame = FrameOutput {
            camera,
            car: place_car(&self.car_model, state),
            display_speed: self.vehicle.display_speed(),
            boost_intensity: state.boost_intensity,
        };
        &self.frame
    }

    /// Run a one-shot command from input
    pub fn handle_command(&mut self, command: Command) {
        match command {
            Command::ToggleCamera => {
                self.toggle_camera();
            }
            Command::StartAudio => self.start_audio(),
        }
    }

    /// Switch between chase and cockpit cameras
    pub fn toggle_camera(&mut self) -> CameraMode {
        self.camera.toggle_mode()
    }

    /// Open the engine sound on first call, resume it afterwards
    pub fn start_audio(&mut self) {
        self.start_audio_with(|| {
            let synth = ToneSynth::new(DEFAULT_SAMPLE_RATE)?;
            Ok(Box::new(synth) as Box<dyn AudioSink>)
        });
    }

    /// Like `start_audio`, with a caller-supplied device
    pub fn start_audio_with<F>(&mut self, open: F)
    where
        F: FnOnce() -> Result<Box<dyn AudioSink>, AudioError>,
    {
        // Audio is optional; the drive goes on silently
        if let Err(e) = self.audio.start(open) {
            warn!("Failed to start audio: {}", e);
            return;
        }
        if !self.audio.is_audible() {
            warn!("No audio output device attached; engine tone is tracked but silent");
        }
    }

    /// Window title doubling as the HUD
    pub fn hud_title(&self) -> String {
        let sound = if self.audio.is_audible() {
            "on"
        } else if self.audio.is_started() {
            "no output device"
        } else {
            "off (M)"
        };
        let mut title = format!(
            "City Drive | {} km/h | {} (C) | sound {}",
            self.frame.display_speed,
            self.camera.mode().label(),
            sound
        );
        if self.frame.boost_intensity > 0.5 {
            title.push_str(" | BOOST");
        }
        title
    }
}

impl FrameUpdate for GameSession {
    fn update(&mut self, dt: f32) {
        GameSession::update(self, dt);
    }
}

/// World transforms for every car part
fn place_car(parts: &[CarPart], state: &VehicleState) -> Vec<Instance> {
    let position = state.position_3d(0.0);
    parts
        .iter()
        .map(|part| Instance::new(part.transform(position, state.heading), part.color))
        .collect()
}
