// Vehicle kinematic state

use glam::{Vec2, Vec3};

/// Kinematic state of the car, owned by `Vehicle` for the whole session
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VehicleState {
    /// Ground position (x, z)
    pub position: Vec2,
    /// Heading in radians; 0 faces +z. Unbounded, wraps through trig.
    pub heading: f32,
    /// Forward speed (units/second), never negative
    pub speed: f32,
    /// Low-pass filtered steering in [-1, 1]
    pub smoothed_steer: f32,
    /// Boost intensity in [0, 1]
    pub boost_intensity: f32,
}

impl VehicleState {
    /// Unit vector along the heading on the ground plane
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.heading.sin(), 0.0, self.heading.cos())
    }

    /// Ground position lifted to 3D at height `y`
    pub fn position_3d(&self, y: f32) -> Vec3 {
        Vec3::new(self.position.x, y, self.position.y)
    }
}
