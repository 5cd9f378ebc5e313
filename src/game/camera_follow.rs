// Camera follow controller: derives the camera pose from the car each frame

use crate::core::math::{damp, smoothing_factor};
use crate::engine::renderer::CameraView;
use crate::game::vehicle::VehicleState;
use glam::Vec3;
use log::info;

/// Which camera the player is looking through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    /// Chase camera behind and above the car
    #[default]
    ThirdPerson,
    /// Driver's eye view
    FirstPerson,
}

impl CameraMode {
    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            Self::ThirdPerson => Self::FirstPerson,
            Self::FirstPerson => Self::ThirdPerson,
        }
    }

    /// Short label for the HUD
    pub fn label(self) -> &'static str {
        match self {
            Self::ThirdPerson => "3rd person",
            Self::FirstPerson => "1st person",
        }
    }
}

/// Camera placement for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_target: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub mode: CameraMode,
}

impl From<CameraPose> for CameraView {
    fn from(pose: CameraPose) -> Self {
        CameraView {
            eye: pose.position,
            target: pose.look_target,
            fov_y_degrees: pose.fov,
        }
    }
}

/// Tunable numbers for both camera modes
#[derive(Debug, Clone, PartialEq)]
pub struct CameraTuning {
    /// Speed treated as "full speed" for scaling distances
    pub reference_speed: f32,

    // Field of view
    pub base_fov: f32,
    pub fov_speed_gain: f32,
    pub fov_boost_gain: f32,
    pub fov_rate: f32,

    // Third person
    pub chase_distance: f32,
    pub chase_speed_distance: f32,
    pub chase_boost_distance: f32,
    pub chase_height: f32,
    pub chase_speed_height: f32,
    pub chase_up_offset: f32,
    pub chase_lead: f32,
    pub chase_speed_lead: f32,
    pub chase_boost_lead: f32,
    pub chase_look_height: f32,
    pub chase_rate: f32,

    // First person
    pub cockpit_forward: f32,
    pub cockpit_height: f32,
    pub cockpit_look_distance: f32,
    pub cockpit_boost_look_distance: f32,
    pub cockpit_look_height: f32,
    pub cockpit_rate: f32,
}

/// Camera numbers for the classic build
pub const CLASSIC_CAMERA: CameraTuning = CameraTuning {
    reference_speed: 380.0,

    base_fov: 58.0,
    fov_speed_gain: 4.0,
    fov_boost_gain: 8.0,
    fov_rate: 4.0,

    chase_distance: 58.0,
    chase_speed_distance: 26.0,
    chase_boost_distance: 22.0,
    chase_height: 24.0,
    chase_speed_height: 11.0,
    chase_up_offset: 20.0,
    chase_lead: 28.0,
    chase_speed_lead: 12.0,
    chase_boost_lead: 16.0,
    chase_look_height: 7.0,
    chase_rate: 6.0,

    cockpit_forward: 7.2,
    cockpit_height: 10.5,
    cockpit_look_distance: 120.0,
    cockpit_boost_look_distance: 40.0,
    cockpit_look_height: 9.0,
    cockpit_rate: 10.0,
};

/// Camera numbers for the boost build: a touch snappier in both modes
pub const BOOST_CAMERA: CameraTuning = CameraTuning {
    fov_boost_gain: 12.0,
    chase_rate: 7.0,
    cockpit_rate: 11.0,
    ..CLASSIC_CAMERA
};

impl CameraTuning {
    pub fn classic() -> Self {
        CLASSIC_CAMERA
    }

    pub fn boost() -> Self {
        BOOST_CAMERA
    }

    /// Interpolation rate for a mode (1/s)
    pub fn rate(&self, mode: CameraMode) -> f32 {
        match mode {
            CameraMode::ThirdPerson => self.chase_rate,
            CameraMode::FirstPerson => self.cockpit_rate,
        }
    }
}

impl Default for CameraTuning {
    fn default() -> Self {
        BOOST_CAMERA
    }
}

/// Where the camera wants to be and what it looks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTarget {
    pub position: Vec3,
    pub look_target: Vec3,
    pub fov: f32,
}

/// Compute the ideal camera placement for a car state, before smoothing
pub fn camera_target(tuning: &CameraTuning, state: &VehicleState, mode: CameraMode) -> CameraTarget {
    let forward = state.forward();
    let speed_fraction = if tuning.reference_speed > 0.0 {
        state.speed / tuning.reference_speed
    } else {
        0.0
    };
    let boost = state.boost_intensity;

    let fov = tuning.base_fov + speed_fraction * tuning.fov_speed_gain + boost * tuning.fov_boost_gain;

    match mode {
        CameraMode::ThirdPerson => {
            let back = tuning.chase_distance
                + speed_fraction * tuning.chase_speed_distance
                + boost * tuning.chase_boost_distance;
            let height = tuning.chase_height
                + speed_fraction * tuning.chase_speed_height
                + tuning.chase_up_offset;
            let lead = tuning.chase_lead
                + speed_fraction * tuning.chase_speed_lead
                + boost * tuning.chase_boost_lead;

            CameraTarget {
                position: state.position_3d(height) - forward * back,
                look_target: state.position_3d(tuning.chase_look_height) + forward * lead,
                fov,
            }
        }
        CameraMode::FirstPerson => {
            let look = tuning.cockpit_look_distance + boost * tuning.cockpit_boost_look_distance;

            CameraTarget {
                position: state.position_3d(tuning.cockpit_height) + forward * tuning.cockpit_forward,
                look_target: state.position_3d(tuning.cockpit_look_height) + forward * look,
                fov,
            }
        }
    }
}

/// Smoothed chase/cockpit camera
#[derive(Debug, Clone)]
pub struct CameraFollow {
    tuning: CameraTuning,
    mode: CameraMode,
    /// Smoothed camera position carried across frames
    position: Vec3,
    /// Smoothed field of view carried across frames
    fov: f32,
    look_target: Vec3,
}

impl CameraFollow {
    /// Place the camera at its ideal spot for the starting car state
    pub fn new(tuning: CameraTuning, state: &VehicleState, mode: CameraMode) -> Self {
        let target = camera_target(&tuning, state, mode);
        Self {
            tuning,
            mode,
            position: target.position,
            fov: target.fov,
            look_target: target.look_target,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Switch modes immediately; the position then glides at the new mode's rate
    pub fn set_mode(&mut self, mode: CameraMode) {
        if self.mode != mode {
            info!("Camera mode: {}", mode.label());
            self.mode = mode;
        }
    }

    pub fn toggle_mode(&mut self) -> CameraMode {
        self.set_mode(self.mode.toggled());
        self.mode
    }

    /// The pose produced by the last update
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            look_target: self.look_target,
            fov: self.fov,
            mode: self.mode,
        }
    }

    /// Move the camera toward its target for this frame's car state
    pub fn update(&mut self, dt: f32, state: &VehicleState) -> CameraPose {
        let dt = dt.max(0.0);
        let target = camera_target(&self.tuning, state, self.mode);

        let t = smoothing_factor(dt, self.tuning.rate(self.mode));
        self.position = self.position.lerp(target.position, t);
        self.look_target = target.look_target;
        self.fov = damp(self.fov, target.fov, self.tuning.fov_rate, dt);

        self.pose()
    }
}
