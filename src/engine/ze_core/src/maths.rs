use std::ops::{Add, Index, IndexMut, Mul, Sub};

/// A two-dimensional vector that can either represent a direction or a point in space
#[derive(PartialOrd, PartialEq, Debug, Default, Copy, Clone)]
pub struct Vec2<T: Default> {
    pub x: T,
    pub y: T,
}

impl<T: Default> Vec2<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

#[derive(PartialOrd, PartialEq, Debug, Default, Copy, Clone)]
pub struct Vec3<T: Default> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T: Default> Vec3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }
}

impl Vec3<f32> {
    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Return a unit vector with the same direction, or a zero vector if the length is zero
    pub fn normalize(&self) -> Self {
        let length = self.length();
        if length == 0.0 {
            return Self::default();
        }

        Self::new(self.x / length, self.y / length, self.z / length)
    }
}

impl Add for Vec3<f32> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3<f32> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

#[derive(PartialOrd, PartialEq, Debug, Default, Copy, Clone)]
pub struct Vec4<T: Default> {
    pub x: T,
    pub y: T,
    pub z: T,
    pub w: T,
}

impl<T: Default> Vec4<T> {
    pub fn new(x: T, y: T, z: T, w: T) -> Self {
        Self { x, y, z, w }
    }
}

#[derive(Ord, PartialOrd, Eq, PartialEq, Debug, Default, Copy, Clone)]
pub struct Rect<T: Default> {
    pub x: T,
    pub y: T,
    pub width: T,
    pub height: T,
}

impl<T: Default> Rect<T> {
    pub fn new(x: T, y: T, width: T, height: T) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Square row-major matrix. Vectors are treated as rows, so transforms compose
/// left to right (`world * view * projection`).
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Matrix<T: Default + Copy, const N: usize> {
    data: [[T; N]; N],
}

impl<T: Default + Copy, const N: usize> Matrix<T, N> {
    pub fn new(data: [[T; N]; N]) -> Self {
        Self { data }
    }

    pub fn transpose(&self) -> Self {
        let mut result = Self::default();
        for row in 0..N {
            for col in 0..N {
                result.data[col][row] = self.data[row][col];
            }
        }
        result
    }

    pub fn as_slice(&self) -> &[[T; N]; N] {
        &self.data
    }
}

impl<T: Default + Copy, const N: usize> Default for Matrix<T, N> {
    fn default() -> Self {
        Self {
            data: [[T::default(); N]; N],
        }
    }
}

impl<T: Default + Copy, const N: usize> From<[[T; N]; N]> for Matrix<T, N> {
    fn from(data: [[T; N]; N]) -> Self {
        Self::new(data)
    }
}

impl<T: Default + Copy, const N: usize> Index<usize> for Matrix<T, N> {
    type Output = [T; N];

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<T: Default + Copy, const N: usize> IndexMut<usize> for Matrix<T, N> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl<const N: usize> Mul for Matrix<f32, N> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        let mut result = Self::default();
        for row in 0..N {
            for col in 0..N {
                let mut sum = 0.0;
                for i in 0..N {
                    sum += self.data[row][i] * rhs.data[i][col];
                }
                result.data[row][col] = sum;
            }
        }
        result
    }
}

impl<const N: usize> Matrix<f32, N> {
    pub fn identity() -> Self {
        let mut result = Self::default();
        for i in 0..N {
            result.data[i][i] = 1.0;
        }
        result
    }
}

// Left-handed builders, matching the Direct3D conventions
impl Matrix<f32, 4> {
    /// Perspective projection from a vertical field of view in radians
    pub fn perspective_fov_lh(fov_y: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let y_scale = 1.0 / (fov_y / 2.0).tan();
        let x_scale = y_scale / aspect_ratio;
        let depth = far / (far - near);

        Self::new([
            [x_scale, 0.0, 0.0, 0.0],
            [0.0, y_scale, 0.0, 0.0],
            [0.0, 0.0, depth, 1.0],
            [0.0, 0.0, -near * depth, 0.0],
        ])
    }

    pub fn orthographic_lh(width: f32, height: f32, near: f32, far: f32) -> Self {
        Self::new([
            [2.0 / width, 0.0, 0.0, 0.0],
            [0.0, 2.0 / height, 0.0, 0.0],
            [0.0, 0.0, 1.0 / (far - near), 0.0],
            [0.0, 0.0, near / (near - far), 1.0],
        ])
    }

    pub fn look_at_lh(eye: Vec3f32, target: Vec3f32, up: Vec3f32) -> Self {
        let z_axis = (target - eye).normalize();
        let x_axis = up.cross(&z_axis).normalize();
        let y_axis = z_axis.cross(&x_axis);

        Self::new([
            [x_axis.x, y_axis.x, z_axis.x, 0.0],
            [x_axis.y, y_axis.y, z_axis.y, 0.0],
            [x_axis.z, y_axis.z, z_axis.z, 0.0],
            [-x_axis.dot(&eye), -y_axis.dot(&eye), -z_axis.dot(&eye), 1.0],
        ])
    }

    pub fn rotation_x(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, cos, sin, 0.0],
            [0.0, -sin, cos, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_y(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new([
            [cos, 0.0, -sin, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [sin, 0.0, cos, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_z(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new([
            [cos, sin, 0.0, 0.0],
            [-sin, cos, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Roll is applied first, then pitch, then yaw. Angles are in radians
    pub fn rotation_yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self::rotation_z(roll) * Self::rotation_x(pitch) * Self::rotation_y(yaw)
    }

    /// Transform a point (w = 1) and project the result back into w = 1
    pub fn transform_coord(&self, point: Vec3f32) -> Vec3f32 {
        let m = &self.data;
        let x = point.x * m[0][0] + point.y * m[1][0] + point.z * m[2][0] + m[3][0];
        let y = point.x * m[0][1] + point.y * m[1][1] + point.z * m[2][1] + m[3][1];
        let z = point.x * m[0][2] + point.y * m[1][2] + point.z * m[2][2] + m[3][2];
        let w = point.x * m[0][3] + point.y * m[1][3] + point.z * m[2][3] + m[3][3];
        if w == 0.0 {
            return Vec3f32::new(x, y, z);
        }

        Vec3f32::new(x / w, y / w, z / w)
    }
}

pub type Vec2u32 = Vec2<u32>;
pub type Vec2i32 = Vec2<i32>;
pub type Vec2f32 = Vec2<f32>;

pub type Vec3u32 = Vec3<u32>;
pub type Vec3i32 = Vec3<i32>;
pub type Vec3f32 = Vec3<f32>;
pub type Vec4f32 = Vec4<f32>;

pub type RectF32 = Rect<f32>;
pub type RectI32 = Rect<i32>;

pub type Matrix4f32 = Matrix<f32, 4>;

#[cfg(test)]
mod tests {
    use crate::maths::{Matrix4f32, Vec3f32};
    use std::f32::consts::PI;

    fn assert_near(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "{} != {}", a, b);
    }

    #[test]
    fn identity_mul() {
        let m = Matrix4f32::from([
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ]);
        assert_eq!(Matrix4f32::identity() * m, m);
        assert_eq!(m * Matrix4f32::identity(), m);
    }

    #[test]
    fn mul() {
        let a = Matrix4f32::from([
            [1.0, 2.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let b = Matrix4f32::from([
            [1.0, 0.0, 0.0, 0.0],
            [3.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 2.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        assert_eq!(
            a * b,
            Matrix4f32::from([
                [7.0, 2.0, 0.0, 0.0],
                [3.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 2.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ])
        );
    }

    #[test]
    fn transpose() {
        let m = Matrix4f32::from([
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ]);
        let t = m.transpose();
        assert_eq!(t[0], [1.0, 5.0, 9.0, 13.0]);
        assert_eq!(t[3], [4.0, 8.0, 12.0, 16.0]);
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn perspective_maps_near_and_far() {
        let projection = Matrix4f32::perspective_fov_lh(PI / 4.0, 800.0 / 600.0, 0.1, 1000.0);
        assert_near(projection[1][1] / projection[0][0], 800.0 / 600.0);
        assert_near(projection[1][1], 1.0 / (PI / 8.0).tan());

        let near = projection.transform_coord(Vec3f32::new(0.0, 0.0, 0.1));
        let far = projection.transform_coord(Vec3f32::new(0.0, 0.0, 1000.0));
        assert_near(near.z, 0.0);
        assert_near(far.z, 1.0);
    }

    #[test]
    fn orthographic() {
        let ortho = Matrix4f32::orthographic_lh(800.0, 600.0, 0.1, 1000.0);
        let corner = ortho.transform_coord(Vec3f32::new(400.0, -300.0, 0.1));
        assert_near(corner.x, 1.0);
        assert_near(corner.y, -1.0);
        assert_near(corner.z, 0.0);
    }

    #[test]
    fn look_at_forward_is_translation() {
        let view = Matrix4f32::look_at_lh(
            Vec3f32::new(0.0, 0.0, -10.0),
            Vec3f32::new(0.0, 0.0, 1.0),
            Vec3f32::new(0.0, 1.0, 0.0),
        );
        let mut expected = Matrix4f32::identity();
        expected[3][2] = 10.0;
        assert_eq!(view, expected);
    }

    #[test]
    fn yaw_rotates_forward_to_right() {
        let rotation = Matrix4f32::rotation_yaw_pitch_roll(PI / 2.0, 0.0, 0.0);
        let forward = rotation.transform_coord(Vec3f32::new(0.0, 0.0, 1.0));
        assert_near(forward.x, 1.0);
        assert_near(forward.y, 0.0);
        assert_near(forward.z, 0.0);
    }

    #[test]
    fn zero_rotation_is_identity() {
        assert_eq!(
            Matrix4f32::rotation_yaw_pitch_roll(0.0, 0.0, 0.0),
            Matrix4f32::identity()
        );
    }

    #[test]
    fn cross_and_normalize() {
        let x = Vec3f32::new(1.0, 0.0, 0.0);
        let y = Vec3f32::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Vec3f32::new(0.0, 0.0, 1.0));
        assert_eq!(Vec3f32::new(0.0, 3.0, 0.0).normalize(), y);
        assert_eq!(Vec3f32::default().normalize(), Vec3f32::default());
    }
}
