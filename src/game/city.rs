// Procedural miniature city: ground, roads, lane markers, trees and buildings
//
// The layout is deterministic, built once at startup and handed to the
// renderer as plain data.

use crate::engine::renderer::{Instance, Lighting, StaticScene};
use glam::{Mat4, Quat, Vec3};

/// Side length of the square world
pub const WORLD_SIZE: f32 = 2400.0;

/// Road slabs as (center x, center z, width along x, depth along z)
const ROADS: [(f32, f32, f32, f32); 8] = [
    (0.0, -560.0, 1900.0, 140.0),
    (0.0, -150.0, 1700.0, 130.0),
    (0.0, 280.0, 2000.0, 150.0),
    (-740.0, 0.0, 130.0, 1900.0),
    (-230.0, 0.0, 140.0, 2000.0),
    (300.0, 0.0, 130.0, 1880.0),
    (760.0, 0.0, 140.0, 1950.0),
    (520.0, 640.0, 760.0, 120.0),
];

const TREE_COUNT: usize = 180;
const BUILDING_COUNT: usize = 65;
const BUILDING_PALETTE: [u32; 4] = [0xfbc8df, 0xf6e0ab, 0xc8d9ff, 0xffe0ef];

const GROUND_COLOR: u32 = 0xcaf0df;
const ROAD_COLOR: u32 = 0x8b9bb6;
const LANE_COLOR: u32 = 0xd9e2f0;
const CAR_BODY_COLOR: u32 = 0xff5f8d;
const CAR_COCKPIT_COLOR: u32 = 0xffd2e3;

/// Primitive mesh an object is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Unit cube centred on the origin
    Box,
    /// Octagonal cone, unit height and diameter, centred on the origin, apex up
    Cone,
}

/// One static piece of scenery
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneObject {
    pub shape: Shape,
    /// Centre of the object
    pub position: Vec3,
    /// Extent along each axis
    pub size: Vec3,
    /// Linear RGB
    pub color: Vec3,
}

impl SceneObject {
    fn cuboid(position: Vec3, size: Vec3, color: Vec3) -> Self {
        Self {
            shape: Shape::Box,
            position,
            size,
            color,
        }
    }

    /// Model matrix scaling the unit mesh into place
    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.size, Quat::IDENTITY, self.position)
    }
}

/// A box of the car model, relative to the car's ground position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarPart {
    pub offset: Vec3,
    pub size: Vec3,
    pub color: Vec3,
}

impl CarPart {
    /// World transform of this part for a car at `position` (ground) facing `heading`
    pub fn transform(&self, position: Vec3, heading: f32) -> Mat4 {
        Mat4::from_translation(position)
            * Mat4::from_rotation_y(heading)
            * Mat4::from_scale_rotation_translation(self.size, Quat::IDENTITY, self.offset)
    }
}

/// Lighting and fog shared by the whole scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atmosphere {
    pub sky_color: Vec3,
    pub ground_color: Vec3,
    pub hemisphere_intensity: f32,
    pub sun_color: Vec3,
    pub sun_intensity: f32,
    /// Direction pointing toward the sun
    pub sun_direction: Vec3,
    pub fog_color: Vec3,
    pub fog_near: f32,
    pub fog_far: f32,
}

impl Default for Atmosphere {
    fn default() -> Self {
        Self {
            sky_color: srgb(0xfff2fa),
            ground_color: srgb(0xa4d7c3),
            hemisphere_intensity: 1.15,
            sun_color: srgb(0xfffaf2),
            sun_intensity: 0.9,
            sun_direction: Vec3::new(220.0, 360.0, 120.0).normalize(),
            fog_color: srgb(0xd5ebff),
            fog_near: 200.0,
            fog_far: 2600.0,
        }
    }
}

/// The full static scene
#[derive(Debug, Clone)]
pub struct City {
    pub objects: Vec<SceneObject>,
    pub car: Vec<CarPart>,
    pub atmosphere: Atmosphere,
}

impl City {
    /// Lay out the whole city
    pub fn generate() -> Self {
        let mut objects = Vec::new();
        objects.push(ground());
        objects.extend(roads());
        objects.extend(trees());
        objects.extend(buildings());

        log::info!("City generated with {} objects", objects.len());

        Self {
            objects,
            car: car_model(),
            atmosphere: Atmosphere::default(),
        }
    }

    /// Objects drawn with a given mesh
    pub fn objects_of(&self, shape: Shape) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter().filter(move |o| o.shape == shape)
    }

    /// Instance data for the renderer, grouped by mesh
    pub fn static_scene(&self) -> StaticScene {
        let instances = |shape: Shape| -> Vec<Instance> {
            self.objects_of(shape)
                .map(|o| Instance::new(o.transform(), o.color))
                .collect()
        };
        StaticScene {
            boxes: instances(Shape::Box),
            cones: instances(Shape::Cone),
        }
    }
}

impl From<Atmosphere> for Lighting {
    fn from(atmosphere: Atmosphere) -> Self {
        Lighting {
            sky_color: atmosphere.sky_color,
            ground_color: atmosphere.ground_color,
            hemisphere_intensity: atmosphere.hemisphere_intensity,
            sun_color: atmosphere.sun_color,
            sun_intensity: atmosphere.sun_intensity,
            sun_direction: atmosphere.sun_direction,
            fog_color: atmosphere.fog_color,
            fog_near: atmosphere.fog_near,
            fog_far: atmosphere.fog_far,
        }
    }
}

/// Thin slab whose top face sits at y = 0
fn ground() -> SceneObject {
    SceneObject::cuboid(
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::new(WORLD_SIZE, 1.0, WORLD_SIZE),
        srgb(GROUND_COLOR),
    )
}

/// Road slabs plus dashed lane markers along their long axis
fn roads() -> Vec<SceneObject> {
    let road_color = srgb(ROAD_COLOR);
    let lane_color = srgb(LANE_COLOR);
    let mut objects = Vec::new();

    for (x, z, w, d) in ROADS {
        objects.push(SceneObject::cuboid(
            Vec3::new(x, 1.9, z),
            Vec3::new(w, 4.0, d),
            road_color,
        ));

        let along_x = w > d;
        let length = w.max(d);
        let dashes = (length / 85.0).floor() as usize;
        for i in 0..dashes {
            let step = 50.0 + i as f32 * 80.0;
            let (position, size) = if along_x {
                (Vec3::new(x - w / 2.0 + step, 4.8, z), Vec3::new(35.0, 1.0, 6.0))
            } else {
                (Vec3::new(x, 4.8, z - d / 2.0 + step), Vec3::new(6.0, 1.0, 35.0))
            };
            objects.push(SceneObject::cuboid(position, size, lane_color));
        }
    }

    objects
}

fn trees() -> Vec<SceneObject> {
    let half = WORLD_SIZE / 2.0;
    (0..TREE_COUNT)
        .map(|i| {
            let radius = 12.0 + (i % 4) as f32 * 2.0;
            let height = 30.0 + (i % 3) as f32 * 6.0;
            let hue = 120.0 + (i % 6) as f32 * 8.0;
            SceneObject {
                shape: Shape::Cone,
                position: Vec3::new(
                    ((i * 147) % WORLD_SIZE as usize) as f32 - half,
                    16.0,
                    ((i * 307) % WORLD_SIZE as usize) as f32 - half,
                ),
                size: Vec3::new(radius * 2.0, height, radius * 2.0),
                color: hsl(hue, 0.7, 0.75),
            }
        })
        .collect()
}

fn buildings() -> Vec<SceneObject> {
    let half = WORLD_SIZE / 2.0;
    let span = WORLD_SIZE as usize - 220;
    (0..BUILDING_COUNT)
        .map(|i| {
            let w = 35.0 + (i % 5) as f32 * 10.0;
            let h = 45.0 + (i % 4) as f32 * 22.0;
            let d = 35.0 + (i % 3) as f32 * 12.0;
            SceneObject::cuboid(
                Vec3::new(
                    ((i * 223) % span) as f32 - half + 110.0,
                    h / 2.0,
                    ((i * 419) % span) as f32 - half + 110.0,
                ),
                Vec3::new(w, h, d),
                srgb(BUILDING_PALETTE[i % BUILDING_PALETTE.len()]),
            )
        })
        .collect()
}

/// Body and cockpit boxes
pub fn car_model() -> Vec<CarPart> {
    vec![
        CarPart {
            offset: Vec3::new(0.0, 5.0, 0.0),
            size: Vec3::new(16.0, 6.0, 30.0),
            color: srgb(CAR_BODY_COLOR),
        },
        CarPart {
            offset: Vec3::new(0.0, 9.0, -2.0),
            size: Vec3::new(11.0, 4.5, 11.0),
            color: srgb(CAR_COCKPIT_COLOR),
        },
    ]
}

/// sRGB hex colour to linear RGB
pub fn srgb(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

/// HSL (hue in degrees, saturation and lightness in 0..1) to linear RGB
pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Vec3 {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    Vec3::new(
        srgb_to_linear(r + m),
        srgb_to_linear(g + m),
        srgb_to_linear(b + m),
    )
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
