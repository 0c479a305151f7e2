use std::f32::consts::PI;
use ze_core::maths::Matrix4f32;

pub const FIELD_OF_VIEW: f32 = PI / 4.0;

/// Matrices computed once from the screen size and depth planes
pub struct Transforms {
    aspect_ratio: f32,
    projection: Matrix4f32,
    world: Matrix4f32,
    ortho: Matrix4f32,
}

impl Transforms {
    pub fn new(width: u32, height: u32, screen_near: f32, screen_depth: f32) -> Self {
        let aspect_ratio = width as f32 / height as f32;
        Self {
            aspect_ratio,
            projection: Matrix4f32::perspective_fov_lh(
                FIELD_OF_VIEW,
                aspect_ratio,
                screen_near,
                screen_depth,
            ),
            world: Matrix4f32::identity(),
            ortho: Matrix4f32::orthographic_lh(
                width as f32,
                height as f32,
                screen_near,
                screen_depth,
            ),
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn projection_matrix(&self) -> Matrix4f32 {
        self.projection
    }

    pub fn world_matrix(&self) -> Matrix4f32 {
        self.world
    }

    pub fn ortho_matrix(&self) -> Matrix4f32 {
        self.ortho
    }
}
