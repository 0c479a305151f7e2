#[derive(Copy, Clone, Default, PartialEq, Debug)]
pub struct Color4<T> {
    pub r: T,
    pub g: T,
    pub b: T,
    pub a: T,
}

impl<T> Color4<T> {
    pub fn new(r: T, g: T, b: T, a: T) -> Self {
        Self { r, g, b, a }
    }
}

pub type Color4f32 = Color4<f32>;

impl Color4f32 {
    pub const BLACK: Color4f32 = Color4f32 {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
}

impl<T> From<Color4<T>> for [T; 4] {
    fn from(color: Color4<T>) -> Self {
        [color.r, color.g, color.b, color.a]
    }
}
