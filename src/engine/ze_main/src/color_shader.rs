use crate::model::as_bytes;
use std::fmt::{Display, Formatter};
use std::mem::size_of;
use ze_core::maths::Matrix4f32;
use ze_core::ze_error;
use ze_gfx::backend::*;
use ze_gfx::{PixelFormat, ShaderStageFlagBits};
use ze_shader_compiler::{ShaderCompiler, ShaderCompilerError, ShaderCompilerInput};

const VERTEX_SHADER_NAME: &str = "color.vs";
const VERTEX_SHADER_ENTRY_POINT: &str = "ColorVertexShader";
const VERTEX_SHADER_SOURCE: &str = include_str!("../shaders/color.vs");

const PIXEL_SHADER_NAME: &str = "color.ps";
const PIXEL_SHADER_ENTRY_POINT: &str = "ColorPixelShader";
const PIXEL_SHADER_SOURCE: &str = include_str!("../shaders/color.ps");

pub const INPUT_ELEMENTS: [InputElementDesc; 2] = [
    InputElementDesc {
        semantic_name: "POSITION",
        semantic_index: 0,
        format: PixelFormat::R32G32B32Float,
        input_slot: 0,
        aligned_byte_offset: 0,
    },
    InputElementDesc {
        semantic_name: "COLOR",
        semantic_index: 0,
        format: PixelFormat::R32G32B32A32Float,
        input_slot: 0,
        aligned_byte_offset: 12,
    },
];

/// Layout of the `MatrixBuffer` constant buffer, matrices are stored transposed
#[repr(C)]
#[derive(Copy, Clone)]
pub struct MatrixBuffer {
    pub world: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl MatrixBuffer {
    pub fn new(world: Matrix4f32, view: Matrix4f32, projection: Matrix4f32) -> Self {
        Self {
            world: *world.transpose().as_slice(),
            view: *view.transpose().as_slice(),
            projection: *projection.transpose().as_slice(),
        }
    }
}

#[derive(Debug)]
pub enum ColorShaderError {
    Compilation(ShaderCompilerError),
    Device(DeviceError),
}

impl Display for ColorShaderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorShaderError::Compilation(error) => write!(f, "{}", error),
            ColorShaderError::Device(error) => {
                write!(f, "failed to create a color shader object: {}", error)
            }
        }
    }
}

impl std::error::Error for ColorShaderError {}

impl From<DeviceError> for ColorShaderError {
    fn from(error: DeviceError) -> Self {
        ColorShaderError::Device(error)
    }
}

fn compile(
    compiler: &dyn ShaderCompiler,
    name: &str,
    stage: ShaderStageFlagBits,
    source: &str,
    entry_point: &str,
) -> Result<Vec<u8>, ColorShaderError> {
    match compiler.compile_shader(ShaderCompilerInput {
        name,
        stage,
        code: source.as_bytes(),
        entry_point,
    }) {
        Ok(output) => Ok(output.bytecode),
        Err(error) => {
            ze_error!("Failed to compile {}", error.name);
            for message in &error.messages {
                ze_error!("{}", message);
            }
            Err(ColorShaderError::Compilation(error))
        }
    }
}

/// Vertex and pixel shader drawing vertices with their own color
pub struct ColorShader {
    matrix_buffer: Buffer,
    input_layout: InputLayout,
    pixel_shader: ShaderModule,
    vertex_shader: ShaderModule,
}

impl ColorShader {
    pub fn new(
        device: &dyn Device,
        compiler: &dyn ShaderCompiler,
    ) -> Result<Self, ColorShaderError> {
        let vertex_bytecode = compile(
            compiler,
            VERTEX_SHADER_NAME,
            ShaderStageFlagBits::Vertex,
            VERTEX_SHADER_SOURCE,
            VERTEX_SHADER_ENTRY_POINT,
        )?;
        let pixel_bytecode = compile(
            compiler,
            PIXEL_SHADER_NAME,
            ShaderStageFlagBits::Fragment,
            PIXEL_SHADER_SOURCE,
            PIXEL_SHADER_ENTRY_POINT,
        )?;

        let vertex_shader =
            device.create_shader_module(ShaderStageFlagBits::Vertex, &vertex_bytecode)?;
        let pixel_shader =
            device.create_shader_module(ShaderStageFlagBits::Fragment, &pixel_bytecode)?;
        let input_layout = device.create_input_layout(&INPUT_ELEMENTS, &vertex_bytecode)?;

        let matrix_buffer = device.create_buffer(
            &BufferDesc {
                size_bytes: size_of::<MatrixBuffer>() as u32,
                usage: ResourceUsage::Dynamic,
                bind_flags: BindFlags::from_flag(BindFlagBits::ConstantBuffer),
                cpu_access_flags: CpuAccessFlags::from_flag(CpuAccessFlagBits::Write),
            },
            None,
        )?;

        Ok(Self {
            matrix_buffer,
            input_layout,
            pixel_shader,
            vertex_shader,
        })
    }

    /// Upload the matrices and draw `index_count` indices of the bound geometry
    pub fn render(
        &self,
        context: &dyn DeviceContext,
        index_count: u32,
        world: Matrix4f32,
        view: Matrix4f32,
        projection: Matrix4f32,
    ) -> Result<(), DeviceError> {
        let matrices = MatrixBuffer::new(world, view, projection);
        context.update_buffer(&self.matrix_buffer, as_bytes(&[matrices]))?;
        context.set_vertex_constant_buffers(0, &[&self.matrix_buffer]);

        context.set_input_layout(&self.input_layout);
        context.set_shader(&self.vertex_shader);
        context.set_shader(&self.pixel_shader);

        context.draw_indexed(index_count, 0, 0);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::color_shader::{ColorShader, ColorShaderError, MatrixBuffer, INPUT_ELEMENTS};
    use std::cell::RefCell;
    use std::mem::size_of;
    use ze_core::maths::Matrix4f32;
    use ze_gfx::backend::*;
    use ze_gfx::null::{NullBackend, NullCall, NullObject};
    use ze_gfx::render_context::FEATURE_LEVEL;
    use ze_gfx::{PixelFormat, ShaderStageFlagBits};
    use ze_shader_compiler::{
        ShaderCompiler, ShaderCompilerError, ShaderCompilerInput, ShaderCompilerOutput,
    };

    /// Returns the source as bytecode, or fails every compilation when `error` is set
    #[derive(Default)]
    pub(crate) struct FakeCompiler {
        pub error: Option<String>,
        pub compiled: RefCell<Vec<(String, ShaderStageFlagBits, String)>>,
    }

    impl ShaderCompiler for FakeCompiler {
        fn compile_shader(
            &self,
            input: ShaderCompilerInput,
        ) -> Result<ShaderCompilerOutput, ShaderCompilerError> {
            self.compiled.borrow_mut().push((
                input.name.to_string(),
                input.stage,
                input.entry_point.to_string(),
            ));
            match &self.error {
                Some(log) => Err(ShaderCompilerError::new(input.name, log)),
                None => Ok(ShaderCompilerOutput::new(input.code.to_vec())),
            }
        }
    }

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
    fn matrix_buffer_layout() {
        assert_eq!(size_of::<MatrixBuffer>(), 192);

        let mut world = Matrix4f32::identity();
        world[3][0] = 5.0;
        let buffer = MatrixBuffer::new(world, Matrix4f32::identity(), Matrix4f32::identity());
        // Translation moves from the last row to the last column
        assert_eq!(buffer.world[0][3], 5.0);
        assert_eq!(buffer.world[3][0], 0.0);
    }

    #[test]
    fn creation() {
        let backend = NullBackend::new();
        let created = backend
            .create_device_and_swapchain(FEATURE_LEVEL, &swapchain_desc())
            .unwrap();
        backend.clear_calls();

        let compiler = FakeCompiler::default();
        let shader = ColorShader::new(created.device.as_ref(), &compiler).unwrap();
        assert_eq!(
            *compiler.compiled.borrow(),
            vec![
                (
                    "color.vs".to_string(),
                    ShaderStageFlagBits::Vertex,
                    "ColorVertexShader".to_string()
                ),
                (
                    "color.ps".to_string(),
                    ShaderStageFlagBits::Fragment,
                    "ColorPixelShader".to_string()
                ),
            ]
        );
        assert_eq!(
            backend.calls(),
            vec![
                NullCall::CreateShaderModule(ShaderStageFlagBits::Vertex),
                NullCall::CreateShaderModule(ShaderStageFlagBits::Fragment),
                NullCall::CreateInputLayout(INPUT_ELEMENTS.to_vec()),
                NullCall::CreateBuffer(BufferDesc {
                    size_bytes: 192,
                    usage: ResourceUsage::Dynamic,
                    bind_flags: BindFlags::from_flag(BindFlagBits::ConstantBuffer),
                    cpu_access_flags: CpuAccessFlags::from_flag(CpuAccessFlagBits::Write),
                }),
            ]
        );

        backend.clear_calls();
        drop(shader);
        assert_eq!(
            backend.releases(),
            vec![
                NullObject::Buffer,
                NullObject::InputLayout,
                NullObject::ShaderModule,
                NullObject::ShaderModule,
            ]
        );
    }

    #[test]
    fn compilation_error() {
        let backend = NullBackend::new();
        let created = backend
            .create_device_and_swapchain(FEATURE_LEVEL, &swapchain_desc())
            .unwrap();
        backend.clear_calls();

        let compiler = FakeCompiler {
            error: Some("color.vs(1,1): error X3000: syntax error".to_string()),
            ..Default::default()
        };
        match ColorShader::new(created.device.as_ref(), &compiler) {
            Err(ColorShaderError::Compilation(error)) => {
                assert_eq!(error.name, "color.vs");
                assert_eq!(error.messages.len(), 1);
            }
            _ => panic!("compilation should have failed"),
        }

        // Nothing is created once the vertex shader fails
        assert_eq!(compiler.compiled.borrow().len(), 1);
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn render() {
        let backend = NullBackend::new();
        let created = backend
            .create_device_and_swapchain(FEATURE_LEVEL, &swapchain_desc())
            .unwrap();
        let shader = ColorShader::new(created.device.as_ref(), &FakeCompiler::default()).unwrap();
        backend.clear_calls();

        let identity = Matrix4f32::identity();
        shader
            .render(created.context.as_ref(), 6, identity, identity, identity)
            .unwrap();

        let calls = backend.calls();
        match &calls[0] {
            NullCall::UpdateBuffer(data) => assert_eq!(data.len(), 192),
            call => panic!("unexpected call {:?}", call),
        }
        assert_eq!(
            calls[1..].to_vec(),
            vec![
                NullCall::SetVertexConstantBuffers {
                    start_slot: 0,
                    count: 1,
                },
                NullCall::SetInputLayout,
                NullCall::SetShader(ShaderStageFlagBits::Vertex),
                NullCall::SetShader(ShaderStageFlagBits::Fragment),
                NullCall::DrawIndexed {
                    index_count: 6,
                    first_index: 0,
                    base_vertex: 0,
                },
            ]
        );
    }
}
