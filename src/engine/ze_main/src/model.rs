use std::mem::size_of;
use ze_gfx::backend::*;

#[repr(C)]
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// Two triangles covering the [-1, 1] square on the z = 0 plane
pub const VERTICES: [Vertex; 6] = [
    Vertex {
        position: [-1.0, -1.0, 0.0],
        color: RED,
    },
    Vertex {
        position: [-1.0, 1.0, 0.0],
        color: RED,
    },
    Vertex {
        position: [1.0, -1.0, 0.0],
        color: RED,
    },
    Vertex {
        position: [-1.0, 1.0, 0.0],
        color: RED,
    },
    Vertex {
        position: [1.0, 1.0, 0.0],
        color: RED,
    },
    Vertex {
        position: [1.0, -1.0, 0.0],
        color: RED,
    },
];

pub const INDICES: [u32; 6] = [0, 1, 2, 3, 4, 5];

pub fn as_bytes<T: Copy>(data: &[T]) -> &[u8] {
    unsafe { std::slice::from_raw_parts(data.as_ptr() as *const u8, std::mem::size_of_val(data)) }
}

/// Vertex and index buffers of the quad
pub struct Model {
    index_buffer: Buffer,
    vertex_buffer: Buffer,
}

impl Model {
    pub fn new(device: &dyn Device) -> Result<Self, DeviceError> {
        let vertex_buffer = device.create_buffer(
            &BufferDesc {
                size_bytes: (size_of::<Vertex>() * VERTICES.len()) as u32,
                usage: ResourceUsage::Default,
                bind_flags: BindFlags::from_flag(BindFlagBits::VertexBuffer),
                cpu_access_flags: CpuAccessFlags::empty(),
            },
            Some(as_bytes(&VERTICES)),
        )?;

        let index_buffer = device.create_buffer(
            &BufferDesc {
                size_bytes: (size_of::<u32>() * INDICES.len()) as u32,
                usage: ResourceUsage::Default,
                bind_flags: BindFlags::from_flag(BindFlagBits::IndexBuffer),
                cpu_access_flags: CpuAccessFlags::empty(),
            },
            Some(as_bytes(&INDICES)),
        )?;

        Ok(Self {
            index_buffer,
            vertex_buffer,
        })
    }

    /// Bind the buffers to the input assembler
    pub fn render(&self, context: &dyn DeviceContext) {
        context.set_vertex_buffers(
            0,
            &[VertexBufferBinding {
                buffer: &self.vertex_buffer,
                stride: size_of::<Vertex>() as u32,
                offset: 0,
            }],
        );
        context.set_index_buffer(&self.index_buffer, IndexBufferFormat::Uint32, 0);
        context.set_primitive_topology(PrimitiveTopology::TriangleList);
    }

    pub fn index_count(&self) -> u32 {
        INDICES.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Model, Vertex};
    use std::mem::size_of;
    use ze_gfx::backend::*;
    use ze_gfx::null::{NullBackend, NullCall, NullFailure, NullObject};
    use ze_gfx::render_context::FEATURE_LEVEL;
    use ze_gfx::PixelFormat;

    fn swapchain_desc() -> SwapChainDesc {
        SwapChainDesc {
            width: 800,
            height: 600,
            format: PixelFormat::R8G8B8A8Unorm,
            refresh_rate: RefreshRate::UNSPECIFIED,
            sample_desc: Default::default(),
            buffer_count: 1,
            windowed: true,
            window_handle: raw_window_handle::RawWindowHandle::Win32(
                raw_window_handle::Win32Handle::empty(),
            ),
        }
    }

    #[test]
    fn vertex_layout() {
        assert_eq!(size_of::<Vertex>(), 28);
    }

    #[test]
    fn buffers_are_created_with_their_data() {
        let backend = NullBackend::new();
        let created = backend
            .create_device_and_swapchain(FEATURE_LEVEL, &swapchain_desc())
            .unwrap();
        backend.clear_calls();

        let model = Model::new(created.device.as_ref()).unwrap();
        assert_eq!(model.index_count(), 6);
        assert_eq!(
            backend.calls(),
            vec![
                NullCall::CreateBuffer(BufferDesc {
                    size_bytes: 168,
                    usage: ResourceUsage::Default,
                    bind_flags: BindFlags::from_flag(BindFlagBits::VertexBuffer),
                    cpu_access_flags: CpuAccessFlags::empty(),
                }),
                NullCall::CreateBuffer(BufferDesc {
                    size_bytes: 24,
                    usage: ResourceUsage::Default,
                    bind_flags: BindFlags::from_flag(BindFlagBits::IndexBuffer),
                    cpu_access_flags: CpuAccessFlags::empty(),
                }),
            ]
        );

        backend.clear_calls();
        model.render(created.context.as_ref());
        assert_eq!(
            backend.calls(),
            vec![
                NullCall::SetVertexBuffers {
                    start_slot: 0,
                    strides: vec![28],
                    offsets: vec![0],
                },
                NullCall::SetIndexBuffer {
                    format: IndexBufferFormat::Uint32,
                    offset: 0,
                },
                NullCall::SetPrimitiveTopology(PrimitiveTopology::TriangleList),
            ]
        );

        backend.clear_calls();
        drop(model);
        assert_eq!(
            backend.releases(),
            vec![NullObject::Buffer, NullObject::Buffer]
        );
    }

    #[test]
    fn failed_buffer_creation() {
        let backend = NullBackend::new();
        let created = backend
            .create_device_and_swapchain(FEATURE_LEVEL, &swapchain_desc())
            .unwrap();
        backend.set_failure(Some(NullFailure::Buffer));
        assert_eq!(
            Model::new(created.device.as_ref()).err(),
            Some(DeviceError::Unknown)
        );
    }
}
