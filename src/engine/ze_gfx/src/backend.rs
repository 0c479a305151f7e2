use crate::{PixelFormat, SampleDesc, ShaderStageFlagBits};
use enumflags2::{bitflags, BitFlags};
use raw_window_handle::RawWindowHandle;
use std::any::Any;
use std::fmt::{Display, Formatter};
use ze_core::color::Color4f32;
use ze_core::maths::Vec2f32;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum BackendError {
    Unsupported,
    AdapterNotFound,
    OutputNotFound,
    Unknown,
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::Unsupported => write!(f, "unsupported by the backend"),
            BackendError::AdapterNotFound => write!(f, "no adapter at this index"),
            BackendError::OutputNotFound => write!(f, "no output at this index"),
            BackendError::Unknown => write!(f, "unknown backend error"),
        }
    }
}

impl std::error::Error for BackendError {}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum DeviceError {
    Unknown,
    OutOfMemory,
    InvalidParameters,
    Unsupported,
}

impl Display for DeviceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceError::Unknown => write!(f, "unknown device error"),
            DeviceError::OutOfMemory => write!(f, "out of memory"),
            DeviceError::InvalidParameters => write!(f, "invalid parameters"),
            DeviceError::Unsupported => write!(f, "unsupported by the device"),
        }
    }
}

impl std::error::Error for DeviceError {}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum FeatureLevel {
    Level10_0,
    Level10_1,
    Level11_0,
}

/// Everything created by a single device creation call
pub struct DeviceAndSwapChain {
    pub device: Box<dyn Device>,
    pub context: Box<dyn DeviceContext>,
    pub swapchain: SwapChain,
}

/// Entry point of a graphics API. Adapters and outputs are transient query objects,
/// they are released as soon as they are dropped.
pub trait Backend {
    fn name(&self) -> &str;
    fn adapter(&self, index: u32) -> Result<Box<dyn Adapter>, BackendError>;
    fn create_device_and_swapchain(
        &self,
        feature_level: FeatureLevel,
        desc: &SwapChainDesc,
    ) -> Result<DeviceAndSwapChain, DeviceError>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct AdapterDesc {
    /// UTF-16 description, NUL padded
    pub description: Vec<u16>,
    pub dedicated_video_memory: u64,
}

pub trait Adapter {
    fn desc(&self) -> Result<AdapterDesc, BackendError>;
    fn output(&self, index: u32) -> Result<Box<dyn Output>, BackendError>;
}

pub trait Output {
    fn display_mode_count(&self, format: PixelFormat) -> Result<u32, BackendError>;

    /// Fill a list of at most `count` modes, `count` being usually obtained from `display_mode_count`
    fn display_modes(
        &self,
        format: PixelFormat,
        count: u32,
    ) -> Result<Vec<DisplayMode>, BackendError>;
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct RefreshRate {
    pub numerator: u32,
    pub denominator: u32,
}

impl RefreshRate {
    /// Let the driver pick the refresh rate
    pub const UNSPECIFIED: RefreshRate = RefreshRate {
        numerator: 0,
        denominator: 1,
    };

    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct DisplayMode {
    pub width: u32,
    pub height: u32,
    pub refresh_rate: RefreshRate,
}

pub trait Device {
    fn create_buffer(
        &self,
        desc: &BufferDesc,
        initial_data: Option<&[u8]>,
    ) -> Result<Buffer, DeviceError>;
    fn create_texture(&self, desc: &TextureDesc) -> Result<Texture, DeviceError>;
    fn create_render_target_view(
        &self,
        desc: &RenderTargetViewDesc,
    ) -> Result<RenderTargetView, DeviceError>;
    fn create_depth_stencil_view(
        &self,
        desc: &DepthStencilViewDesc,
    ) -> Result<DepthStencilView, DeviceError>;
    fn create_depth_stencil_state(
        &self,
        desc: &DepthStencilStateDesc,
    ) -> Result<DepthStencilState, DeviceError>;
    fn create_rasterizer_state(
        &self,
        desc: &RasterizerStateDesc,
    ) -> Result<RasterizerState, DeviceError>;
    fn create_shader_module(
        &self,
        stage: ShaderStageFlagBits,
        bytecode: &[u8],
    ) -> Result<ShaderModule, DeviceError>;
    fn create_input_layout(
        &self,
        elements: &[InputElementDesc],
        vertex_shader_bytecode: &[u8],
    ) -> Result<InputLayout, DeviceError>;

    // Swapchain functions
    fn get_swapchain_backbuffer(&self, swapchain: &SwapChain) -> Result<Texture, DeviceError>;

    /// Present the back buffer. A sync interval of 0 presents immediately,
    /// 1 waits for the next vertical blank
    fn present(&self, swapchain: &SwapChain, sync_interval: u32) -> Result<(), DeviceError>;
    fn set_fullscreen_state(&self, swapchain: &SwapChain, fullscreen: bool)
        -> Result<(), DeviceError>;
}

/// Immediate context, commands are executed in submission order
pub trait DeviceContext {
    // Output merger
    fn set_render_targets(
        &self,
        render_target_views: &[&RenderTargetView],
        depth_stencil_view: Option<&DepthStencilView>,
    );
    fn set_depth_stencil_state(&self, state: &DepthStencilState, stencil_ref: u32);
    fn clear_render_target_view(&self, view: &RenderTargetView, color: Color4f32);
    fn clear_depth_stencil_view(
        &self,
        view: &DepthStencilView,
        flags: ClearFlags,
        depth: f32,
        stencil: u8,
    );

    // Rasterizer
    fn set_rasterizer_state(&self, state: &RasterizerState);
    fn set_viewports(&self, viewports: &[Viewport]);

    // Input assembler
    fn set_vertex_buffers(&self, start_slot: u32, bindings: &[VertexBufferBinding]);
    fn set_index_buffer(&self, buffer: &Buffer, format: IndexBufferFormat, offset: u32);
    fn set_primitive_topology(&self, topology: PrimitiveTopology);
    fn set_input_layout(&self, layout: &InputLayout);

    // Shaders
    fn set_shader(&self, shader: &ShaderModule);
    fn set_vertex_constant_buffers(&self, start_slot: u32, buffers: &[&Buffer]);

    /// Replace the whole content of a CPU writable buffer
    fn update_buffer(&self, buffer: &Buffer, data: &[u8]) -> Result<(), DeviceError>;

    fn draw_indexed(&self, index_count: u32, first_index: u32, base_vertex: i32);
}

// Resources
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ResourceUsage {
    Default,
    Immutable,
    Dynamic,
    Staging,
}

#[bitflags]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u32)]
pub enum BindFlagBits {
    VertexBuffer = 1 << 0,
    IndexBuffer = 1 << 1,
    ConstantBuffer = 1 << 2,
    ShaderResource = 1 << 3,
    RenderTarget = 1 << 4,
    DepthStencil = 1 << 5,
}
pub type BindFlags = BitFlags<BindFlagBits>;

#[bitflags]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u32)]
pub enum CpuAccessFlagBits {
    Write = 1 << 0,
    Read = 1 << 1,
}
pub type CpuAccessFlags = BitFlags<CpuAccessFlagBits>;

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct BufferDesc {
    pub size_bytes: u32,
    pub usage: ResourceUsage,
    pub bind_flags: BindFlags,
    pub cpu_access_flags: CpuAccessFlags,
}

pub struct Buffer {
    pub desc: BufferDesc,
    pub backend_data: Box<dyn Any>,
}

impl Buffer {
    pub fn new(desc: BufferDesc, backend_data: Box<dyn Any>) -> Self {
        Self { desc, backend_data }
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub mip_levels: u32,
    pub array_size: u32,
    pub format: PixelFormat,
    pub sample_desc: SampleDesc,
    pub usage: ResourceUsage,
    pub bind_flags: BindFlags,
    pub cpu_access_flags: CpuAccessFlags,
}

pub struct Texture {
    pub desc: TextureDesc,
    pub backend_data: Box<dyn Any>,
}

impl Texture {
    pub fn new(desc: TextureDesc, backend_data: Box<dyn Any>) -> Self {
        Self { desc, backend_data }
    }
}

// Render target view

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Texture2DRTV {
    pub mip_level: u32,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RenderTargetViewType {
    Texture2D(Texture2DRTV),
}

pub struct RenderTargetViewDesc<'a> {
    pub resource: &'a Texture,
    pub format: PixelFormat,
    pub ty: RenderTargetViewType,
}

pub struct RenderTargetView {
    pub format: PixelFormat,
    pub ty: RenderTargetViewType,
    pub backend_data: Box<dyn Any>,
}

impl RenderTargetView {
    pub fn new(format: PixelFormat, ty: RenderTargetViewType, backend_data: Box<dyn Any>) -> Self {
        Self {
            format,
            ty,
            backend_data,
        }
    }
}

// Depth stencil view

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Texture2DDSV {
    pub mip_level: u32,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DepthStencilViewType {
    Texture2D(Texture2DDSV),
}

pub struct DepthStencilViewDesc<'a> {
    pub resource: &'a Texture,
    pub format: PixelFormat,
    pub ty: DepthStencilViewType,
}

pub struct DepthStencilView {
    pub format: PixelFormat,
    pub ty: DepthStencilViewType,
    pub backend_data: Box<dyn Any>,
}

impl DepthStencilView {
    pub fn new(format: PixelFormat, ty: DepthStencilViewType, backend_data: Box<dyn Any>) -> Self {
        Self {
            format,
            ty,
            backend_data,
        }
    }
}

#[bitflags]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u32)]
pub enum ClearFlagBits {
    Depth = 1 << 0,
    Stencil = 1 << 1,
}
pub type ClearFlags = BitFlags<ClearFlagBits>;

// Pipeline states

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CompareOp {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum StencilOp {
    Keep,
    Zero,
    Replace,
    IncrementSaturate,
    DecrementSaturate,
    Invert,
    Increment,
    Decrement,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct StencilOpDesc {
    pub fail_op: StencilOp,
    pub depth_fail_op: StencilOp,
    pub pass_op: StencilOp,
    pub compare_op: CompareOp,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum DepthWriteMask {
    Zero,
    All,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct DepthStencilStateDesc {
    pub depth_enable: bool,
    pub depth_write_mask: DepthWriteMask,
    pub depth_compare_op: CompareOp,
    pub stencil_enable: bool,
    pub stencil_read_mask: u8,
    pub stencil_write_mask: u8,
    pub front_face: StencilOpDesc,
    pub back_face: StencilOpDesc,
}

pub struct DepthStencilState {
    pub desc: DepthStencilStateDesc,
    pub backend_data: Box<dyn Any>,
}

impl DepthStencilState {
    pub fn new(desc: DepthStencilStateDesc, backend_data: Box<dyn Any>) -> Self {
        Self { desc, backend_data }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum FillMode {
    Wireframe,
    Solid,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CullMode {
    None,
    Front,
    Back,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct RasterizerStateDesc {
    pub fill_mode: FillMode,
    pub cull_mode: CullMode,
    pub front_counter_clockwise: bool,
    pub depth_bias: i32,
    pub depth_bias_clamp: f32,
    pub slope_scaled_depth_bias: f32,
    pub depth_clip_enable: bool,
    pub scissor_enable: bool,
    pub multisample_enable: bool,
    pub antialiased_line_enable: bool,
}

pub struct RasterizerState {
    pub desc: RasterizerStateDesc,
    pub backend_data: Box<dyn Any>,
}

impl RasterizerState {
    pub fn new(desc: RasterizerStateDesc, backend_data: Box<dyn Any>) -> Self {
        Self { desc, backend_data }
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Viewport {
    pub position: Vec2f32,
    pub size: Vec2f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

// Input assembly

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum PrimitiveTopology {
    PointList,
    LineList,
    TriangleList,
    TriangleStrip,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum IndexBufferFormat {
    Uint16,
    Uint32,
}

/// One per-vertex attribute of an input layout
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct InputElementDesc {
    pub semantic_name: &'static str,
    pub semantic_index: u32,
    pub format: PixelFormat,
    pub input_slot: u32,
    pub aligned_byte_offset: u32,
}

pub struct InputLayout {
    pub backend_data: Box<dyn Any>,
}

impl InputLayout {
    pub fn new(backend_data: Box<dyn Any>) -> Self {
        Self { backend_data }
    }
}

pub struct VertexBufferBinding<'a> {
    pub buffer: &'a Buffer,
    pub stride: u32,
    pub offset: u32,
}

pub struct ShaderModule {
    pub stage: ShaderStageFlagBits,
    pub backend_data: Box<dyn Any>,
}

impl ShaderModule {
    pub fn new(stage: ShaderStageFlagBits, backend_data: Box<dyn Any>) -> Self {
        Self {
            stage,
            backend_data,
        }
    }
}

// Swapchain

#[derive(Copy, Clone, Debug)]
pub struct SwapChainDesc {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub refresh_rate: RefreshRate,
    pub sample_desc: SampleDesc,
    pub buffer_count: u32,
    pub windowed: bool,
    pub window_handle: RawWindowHandle,
}

pub struct SwapChain {
    pub desc: SwapChainDesc,
    pub backend_data: Box<dyn Any>,
}

impl SwapChain {
    pub fn new(desc: SwapChainDesc, backend_data: Box<dyn Any>) -> Self {
        Self { desc, backend_data }
    }
}
