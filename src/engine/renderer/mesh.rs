// Instanced mesh rendering: a fog backdrop, two primitive meshes, many instances

use super::{Camera, Instance, Lighting, SceneUniform, Vertex};
use anyhow::Result;
use glam::Vec3;
use std::f32::consts::TAU;
use wgpu::util::DeviceExt;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Number of sides on the cone mesh
const CONE_SEGMENTS: u16 = 8;

/// One oversized triangle covers the whole viewport
const BACKDROP_VERTEX_COUNT: u32 = 3;

/// CPU-side mesh geometry
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    /// Unit cube centred on the origin, flat shaded
    pub fn cube() -> Self {
        // (normal, u, v) with u x v == normal so faces wind counter-clockwise
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        let mut mesh = Self::default();
        for (normal, u, v) in faces {
            let base = mesh.vertices.len() as u16;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let position = (normal + u * su + v * sv) * 0.5;
                mesh.vertices.push(Vertex::new(position, normal));
            }
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }

    /// Cone of unit height and base diameter centred on the origin, apex up
    pub fn cone(segments: u16) -> Self {
        let segments = segments.max(3);
        let apex = Vec3::new(0.0, 0.5, 0.0);
        let rim = |i: u16| {
            let angle = TAU * i as f32 / segments as f32;
            Vec3::new(0.5 * angle.cos(), -0.5, 0.5 * angle.sin())
        };

        let mut mesh = Self::default();
        for i in 0..segments {
            let (a, b) = (rim(i), rim(i + 1));
            let mid = TAU * (i as f32 + 0.5) / segments as f32;
            // Slope normal for radius 0.5 over height 1
            let side = Vec3::new(mid.cos(), 0.5, mid.sin()).normalize();

            let base = mesh.vertices.len() as u16;
            mesh.vertices.push(Vertex::new(apex, side));
            mesh.vertices.push(Vertex::new(b, side));
            mesh.vertices.push(Vertex::new(a, side));
            mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);

            let center = Vec3::new(0.0, -0.5, 0.0);
            let base = mesh.vertices.len() as u16;
            mesh.vertices.push(Vertex::new(center, Vec3::NEG_Y));
            mesh.vertices.push(Vertex::new(a, Vec3::NEG_Y));
            mesh.vertices.push(Vertex::new(b, Vec3::NEG_Y));
            mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
        }
        mesh
    }
}

/// Mesh uploaded to the GPU
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn new(device: &wgpu::Device, label: &str, data: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }
}

/// Instance buffer plus the number of live instances in it
struct InstanceBatch {
    buffer: wgpu::Buffer,
    count: u32,
    capacity: usize,
}

impl InstanceBatch {
    fn new(device: &wgpu::Device, label: &str, instances: &[Instance], capacity: usize) -> Self {
        let capacity = capacity.max(instances.len()).max(1);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * std::mem::size_of::<Instance>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            count: 0,
            capacity,
        }
    }

    /// Replace the instances; extra entries beyond capacity are dropped
    fn write(&mut self, queue: &wgpu::Queue, instances: &[Instance]) {
        let len = instances.len().min(self.capacity);
        if len < instances.len() {
            log::warn!(
                "Instance batch overflow: {} instances, capacity {}",
                instances.len(),
                self.capacity
            );
        }
        if len > 0 {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&instances[..len]));
        }
        self.count = len as u32;
    }
}

/// Static scenery drawn every frame
#[derive(Debug, Clone, Default)]
pub struct StaticScene {
    pub boxes: Vec<Instance>,
    pub cones: Vec<Instance>,
}

/// Renders the static scene and a small set of per-frame boxes
pub struct MeshRenderer {
    render_pipeline: wgpu::RenderPipeline,
    /// Fog-coloured fill behind the scene, limited to the viewport band
    backdrop_pipeline: wgpu::RenderPipeline,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    cube: GpuMesh,
    cone: GpuMesh,
    static_boxes: InstanceBatch,
    static_cones: InstanceBatch,
    dynamic_boxes: InstanceBatch,
    lighting: Lighting,
}

impl MeshRenderer {
    /// Create a new mesh renderer and upload the static scene
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        config: &wgpu::SurfaceConfiguration,
        scene: &StaticScene,
        lighting: Lighting,
        dynamic_capacity: usize,
    ) -> Result<Self> {
        // Create shader module
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        // Create scene bind group layout
        let scene_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Scene Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        // Create pipeline layout
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&scene_bind_group_layout],
            push_constant_ranges: &[],
        });

        // Create render pipeline
        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[Vertex::desc(), Instance::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        // Fullscreen triangle with no vertex buffers; never touches depth
        let backdrop_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Backdrop Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_backdrop",
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_backdrop",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        // Create scene uniform buffer
        let scene_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::cast_slice(&[SceneUniform::new(
                &Camera::new(Default::default(), 1.0),
                &lighting,
            )]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let cube = GpuMesh::new(device, "Cube", &MeshData::cube());
        let cone = GpuMesh::new(device, "Cone", &MeshData::cone(CONE_SEGMENTS));

        let mut static_boxes =
            InstanceBatch::new(device, "Static Box Instances", &scene.boxes, 0);
        static_boxes.write(queue, &scene.boxes);
        let mut static_cones =
            InstanceBatch::new(device, "Static Cone Instances", &scene.cones, 0);
        static_cones.write(queue, &scene.cones);
        let dynamic_boxes =
            InstanceBatch::new(device, "Dynamic Box Instances", &[], dynamic_capacity);

        log::info!(
            "Mesh renderer ready: {} boxes, {} cones",
            scene.boxes.len(),
            scene.cones.len()
        );

        Ok(Self {
            render_pipeline,
            backdrop_pipeline,
            scene_buffer,
            scene_bind_group,
            cube,
            cone,
            static_boxes,
            static_cones,
            dynamic_boxes,
            lighting,
        })
    }

    /// Upload this frame's camera and moving boxes
    pub fn prepare(&mut self, queue: &wgpu::Queue, camera: &Camera, dynamic: &[Instance]) {
        let uniform = SceneUniform::new(camera, &self.lighting);
        queue.write_buffer(&self.scene_buffer, 0, bytemuck::cast_slice(&[uniform]));
        self.dynamic_boxes.write(queue, dynamic);
    }

    /// Record draw calls into a render pass
    pub fn render<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_bind_group(0, &self.scene_bind_group, &[]);

        render_pass.set_pipeline(&self.backdrop_pipeline);
        render_pass.draw(0..BACKDROP_VERTEX_COUNT, 0..1);

        render_pass.set_pipeline(&self.render_pipeline);

        Self::draw(render_pass, &self.cube, &self.static_boxes);
        Self::draw(render_pass, &self.cube, &self.dynamic_boxes);
        Self::draw(render_pass, &self.cone, &self.static_cones);
    }

    fn draw<'a>(render_pass: &mut wgpu::RenderPass<'a>, mesh: &'a GpuMesh, batch: &'a InstanceBatch) {
        if batch.count == 0 {
            return;
        }
        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, batch.buffer.slice(..));
        render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..mesh.index_count, 0, 0..batch.count);
    }
}

/// Depth attachment matching the surface size
pub fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
