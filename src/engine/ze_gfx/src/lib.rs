pub mod backend;
pub mod display_mode;
pub mod frame_buffer;
pub mod null;
pub mod pipeline_state;
pub mod render_context;
pub mod transforms;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[non_exhaustive]
pub enum PixelFormat {
    Unknown,
    R8G8B8A8Unorm,
    D24UnormS8Uint,
    R32G32B32Float,
    R32G32B32A32Float,
    R32Uint,
}

impl PixelFormat {
    pub fn size_in_bytes(&self) -> u32 {
        match self {
            PixelFormat::Unknown => 0,
            PixelFormat::R8G8B8A8Unorm
            | PixelFormat::D24UnormS8Uint
            | PixelFormat::R32Uint => 4,
            PixelFormat::R32G32B32Float => 12,
            PixelFormat::R32G32B32A32Float => 16,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct SampleDesc {
    pub count: u32,
    pub quality: u32,
}

impl Default for SampleDesc {
    fn default() -> Self {
        Self {
            count: 1,
            quality: 0,
        }
    }
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum ShaderStageFlagBits {
    Vertex = 1 << 0,
    Fragment = 1 << 1,
}
