// Rendering system using wgpu

mod camera;
mod mesh;
mod scene;
mod vertex;

pub use camera::{Camera, CameraView, Viewport};
pub use mesh::{MeshRenderer, StaticScene};
pub use scene::{Lighting, SceneUniform};
pub use vertex::{Instance, Vertex};

use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;
use winit::window::Window;

/// Colour of the bars outside the letterboxed render area
const LETTERBOX_COLOR: wgpu::Color = wgpu::Color::BLACK;

/// What to do when the surface cannot hand out a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceAction {
    /// Reconfigure the surface and try again next frame
    Reconfigure,
    /// Drop this frame and carry on
    SkipFrame,
    /// Give up rendering
    Fatal,
}

fn classify_surface_error(error: &wgpu::SurfaceError) -> SurfaceAction {
    match error {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceAction::Reconfigure,
        wgpu::SurfaceError::OutOfMemory => SurfaceAction::Fatal,
        _ => SurfaceAction::SkipFrame,
    }
}

/// Main renderer responsible for initializing wgpu and coordinating rendering
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    depth_view: wgpu::TextureView,
    mesh_renderer: MeshRenderer,
    camera: Camera,
    /// Aspect ratio of the letterboxed render area
    wide_aspect: f32,
}

impl Renderer {
    /// Create a new renderer for the given window and upload the static scene
    pub async fn new(
        window: Arc<Window>,
        scene: &StaticScene,
        lighting: Lighting,
        dynamic_capacity: usize,
        wide_aspect: f32,
    ) -> Result<Self> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface
        let surface = instance.create_surface(window.clone())?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        info!("Using GPU: {}", adapter.get_info().name);

        // Request device and queue
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("Surface reports no supported formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        let depth_view = mesh::create_depth_view(&device, config.width, config.height);

        let mesh_renderer =
            MeshRenderer::new(&device, &queue, &config, scene, lighting, dynamic_capacity)?;

        let viewport = Viewport::letterbox(config.width, config.height, wide_aspect);
        let camera = Camera::new(CameraView::default(), viewport.aspect());

        info!(
            "Renderer initialized with {}x{} resolution",
            size.width, size.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            depth_view,
            mesh_renderer,
            camera,
            wide_aspect,
        })
    }

    /// Resize the renderer
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view =
                mesh::create_depth_view(&self.device, new_size.width, new_size.height);
            self.camera.set_aspect(self.viewport().aspect());
            info!("Renderer resized to {}x{}", new_size.width, new_size.height);
        }
    }

    /// Letterboxed render area for the current surface size
    pub fn viewport(&self) -> Viewport {
        Viewport::letterbox(self.config.width, self.config.height, self.wide_aspect)
    }

    /// Render a frame from `view`, with `dynamic` boxes drawn alongside the static scene
    pub fn render(&mut self, view: CameraView, dynamic: &[Instance]) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(e) => {
                return match classify_surface_error(&e) {
                    SurfaceAction::Reconfigure => {
                        self.surface.configure(&self.device, &self.config);
                        Ok(())
                    }
                    SurfaceAction::SkipFrame => {
                        warn!("Skipping frame: {}", e);
                        Ok(())
                    }
                    SurfaceAction::Fatal => Err(e.into()),
                };
            }
        };
        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let viewport = self.viewport();
        self.camera.set_view(view);
        self.camera.set_aspect(viewport.aspect());
        self.mesh_renderer
            .prepare(&self.queue, &self.camera, dynamic);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(LETTERBOX_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_viewport(
                viewport.x as f32,
                viewport.y as f32,
                viewport.width as f32,
                viewport.height as f32,
                0.0,
                1.0,
            );
            render_pass.set_scissor_rect(viewport.x, viewport.y, viewport.width, viewport.height);

            self.mesh_renderer.render(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Current surface size
    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.size
    }
}
