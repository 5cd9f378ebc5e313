// Scene-wide lighting and the uniform block shared by every draw

use super::Camera;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Hemisphere light, one directional sun and linear distance fog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub sky_color: Vec3,
    pub ground_color: Vec3,
    pub hemisphere_intensity: f32,
    pub sun_color: Vec3,
    pub sun_intensity: f32,
    /// Unit vector toward the sun
    pub sun_direction: Vec3,
    pub fog_color: Vec3,
    pub fog_near: f32,
    pub fog_far: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            sky_color: Vec3::ONE,
            ground_color: Vec3::splat(0.5),
            hemisphere_intensity: 1.0,
            sun_color: Vec3::ONE,
            sun_intensity: 1.0,
            sun_direction: Vec3::Y,
            fog_color: Vec3::ONE,
            fog_near: 200.0,
            fog_far: 2600.0,
        }
    }
}

/// Scene uniform for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    pub sun_dir: [f32; 4],
    pub sun_color: [f32; 4],
    pub sky_color: [f32; 4],
    pub ground_color: [f32; 4],
    pub fog_color: [f32; 4],
    pub fog_range: [f32; 4],
}

impl SceneUniform {
    pub fn new(camera: &Camera, lighting: &Lighting) -> Self {
        // Keep the fog ramp non-degenerate for the shader division
        let fog_far = lighting.fog_far.max(lighting.fog_near + 1.0);

        Self {
            view_proj: camera.view_proj_matrix().to_cols_array_2d(),
            eye: camera.view().eye.extend(1.0).to_array(),
            sun_dir: lighting
                .sun_direction
                .normalize_or_zero()
                .extend(lighting.sun_intensity)
                .to_array(),
            sun_color: lighting.sun_color.extend(1.0).to_array(),
            sky_color: lighting
                .sky_color
                .extend(lighting.hemisphere_intensity)
                .to_array(),
            ground_color: lighting.ground_color.extend(1.0).to_array(),
            fog_color: lighting.fog_color.extend(1.0).to_array(),
            fog_range: [lighting.fog_near, fog_far, 0.0, 0.0],
        }
    }
}
