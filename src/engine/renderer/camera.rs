// Perspective camera and letterboxed viewport

use glam::{Mat4, Vec3};

const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 5000.0;

/// Where the camera is and what it looks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub eye: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
}

impl Default for CameraView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 10.0, -30.0),
            target: Vec3::ZERO,
            fov_y_degrees: 58.0,
        }
    }
}

/// 3D perspective camera
#[derive(Debug, Clone)]
pub struct Camera {
    view: CameraView,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Camera {
    /// Create a new camera for a render area aspect ratio
    pub fn new(view: CameraView, aspect: f32) -> Self {
        Self {
            view,
            aspect,
            near: NEAR_PLANE,
            far: FAR_PLANE,
        }
    }

    /// Move the camera
    pub fn set_view(&mut self, view: CameraView) {
        self.view = view;
    }

    /// Change the projection aspect ratio
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn view(&self) -> &CameraView {
        &self.view
    }

    #[allow(dead_code)]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.view.eye, self.view.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.view.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    /// Get the view-projection matrix
    pub fn view_proj_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Pixel rectangle the scene is drawn into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Full-width band of at most `width / aspect` pixels, centred vertically.
    /// Wider windows keep their full height.
    pub fn letterbox(width: u32, height: u32, aspect: f32) -> Self {
        let render_height = (height as f32).min(width as f32 / aspect).floor() as u32;
        let render_height = render_height.clamp(1, height.max(1));
        let y = (height.saturating_sub(render_height)) / 2;

        Self {
            x: 0,
            y,
            width,
            height: render_height,
        }
    }

    /// Aspect ratio of the band, fed to the projection
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}
