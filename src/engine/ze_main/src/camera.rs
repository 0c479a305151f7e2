use ze_core::maths::{Matrix4f32, Vec3f32};

pub struct Camera {
    position: Vec3f32,

    /// Pitch, yaw and roll in degrees
    rotation: Vec3f32,
    view_matrix: Matrix4f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec3f32::default(),
            rotation: Vec3f32::default(),
            view_matrix: Matrix4f32::identity(),
        }
    }

    pub fn set_position(&mut self, position: Vec3f32) {
        self.position = position;
    }

    pub fn set_rotation(&mut self, rotation: Vec3f32) {
        self.rotation = rotation;
    }

    /// Rebuild the view matrix from the current position and rotation
    pub fn render(&mut self) {
        let rotation = Matrix4f32::rotation_yaw_pitch_roll(
            self.rotation.y.to_radians(),
            self.rotation.x.to_radians(),
            self.rotation.z.to_radians(),
        );

        let up = rotation.transform_coord(Vec3f32::new(0.0, 1.0, 0.0));
        let forward = rotation.transform_coord(Vec3f32::new(0.0, 0.0, 1.0));

        self.view_matrix = Matrix4f32::look_at_lh(self.position, self.position + forward, up);
    }

    pub fn view_matrix(&self) -> Matrix4f32 {
        self.view_matrix
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
