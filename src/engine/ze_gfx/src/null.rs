//! Headless backend that creates no GPU object.
//! Every call and every release is appended to a shared log, and any step can be
//! made to fail, which lets the render code be checked without a graphics adapter.

use crate::backend::*;
use crate::{PixelFormat, SampleDesc, ShaderStageFlagBits};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use ze_core::color::Color4f32;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum NullObject {
    Adapter,
    Output,
    Device,
    DeviceContext,
    SwapChain,
    Texture,
    RenderTargetView,
    DepthStencilView,
    DepthStencilState,
    RasterizerState,
    Buffer,
    ShaderModule,
    InputLayout,
}

#[derive(Clone, PartialEq, Debug)]
pub enum NullCall {
    EnumAdapter(u32),
    EnumOutput(u32),
    GetDisplayModeCount(PixelFormat),
    GetDisplayModeList {
        format: PixelFormat,
        count: u32,
    },
    GetAdapterDesc,
    CreateDeviceAndSwapChain {
        feature_level: FeatureLevel,
        width: u32,
        height: u32,
        format: PixelFormat,
        refresh_rate: RefreshRate,
        buffer_count: u32,
        windowed: bool,
    },

    // Device
    CreateBuffer(BufferDesc),
    CreateTexture(TextureDesc),
    CreateRenderTargetView(PixelFormat),
    CreateDepthStencilView(PixelFormat),
    CreateDepthStencilState(DepthStencilStateDesc),
    CreateRasterizerState(RasterizerStateDesc),
    CreateShaderModule(ShaderStageFlagBits),
    CreateInputLayout(Vec<InputElementDesc>),
    GetSwapChainBackbuffer,
    Present {
        sync_interval: u32,
    },
    SetFullscreenState(bool),

    // Device context
    SetRenderTargets {
        render_target_count: usize,
        depth_stencil: bool,
    },
    SetDepthStencilState {
        stencil_ref: u32,
    },
    ClearRenderTargetView(Color4f32),
    ClearDepthStencilView {
        flags: ClearFlags,
        depth: f32,
        stencil: u8,
    },
    SetRasterizerState,
    SetViewports(Vec<Viewport>),
    SetVertexBuffers {
        start_slot: u32,
        strides: Vec<u32>,
        offsets: Vec<u32>,
    },
    SetIndexBuffer {
        format: IndexBufferFormat,
        offset: u32,
    },
    SetPrimitiveTopology(PrimitiveTopology),
    SetInputLayout,
    SetShader(ShaderStageFlagBits),
    SetVertexConstantBuffers {
        start_slot: u32,
        count: usize,
    },
    UpdateBuffer(Vec<u8>),
    DrawIndexed {
        index_count: u32,
        first_index: u32,
        base_vertex: i32,
    },

    Release(NullObject),
}

/// Step that returns an error instead of succeeding
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum NullFailure {
    Adapter,
    Output,
    DisplayModeCount,
    DisplayModeList,
    AdapterDesc,
    DeviceAndSwapChain,
    Backbuffer,
    RenderTargetView,
    Texture,
    DepthStencilView,
    DepthStencilState,
    RasterizerState,
    Buffer,
    ShaderModule,
    InputLayout,
    UpdateBuffer,
    Present,
    SetFullscreenState,
}

struct NullState {
    calls: RefCell<Vec<NullCall>>,
    live_objects: Cell<usize>,
    failure: Cell<Option<NullFailure>>,
    display_modes: RefCell<Vec<DisplayMode>>,
    description: RefCell<Vec<u16>>,
    dedicated_video_memory: Cell<u64>,
}

impl NullState {
    fn record(&self, call: NullCall) {
        self.calls.borrow_mut().push(call);
    }

    fn fails(&self, failure: NullFailure) -> bool {
        self.failure.get() == Some(failure)
    }
}

/// Stands for one created object, logs its release when dropped
struct NullHandle {
    object: NullObject,
    state: Rc<NullState>,
}

impl NullHandle {
    fn new(object: NullObject, state: &Rc<NullState>) -> Self {
        state.live_objects.set(state.live_objects.get() + 1);
        Self {
            object,
            state: state.clone(),
        }
    }

    fn boxed(object: NullObject, state: &Rc<NullState>) -> Box<NullHandle> {
        Box::new(Self::new(object, state))
    }
}

impl Drop for NullHandle {
    fn drop(&mut self) {
        self.state.live_objects.set(self.state.live_objects.get() - 1);
        self.state.record(NullCall::Release(self.object));
    }
}

pub fn encode_description(description: &str) -> Vec<u16> {
    let mut wide: Vec<u16> = description.encode_utf16().collect();
    wide.resize(wide.len().max(128), 0);
    wide
}

pub struct NullBackend {
    state: Rc<NullState>,
}

impl NullBackend {
    pub fn new() -> Self {
        let refresh_rate = RefreshRate::new(60, 1);
        Self {
            state: Rc::new(NullState {
                calls: RefCell::new(Vec::new()),
                live_objects: Cell::new(0),
                failure: Cell::new(None),
                display_modes: RefCell::new(
                    [(640, 480), (800, 600), (1280, 720), (1920, 1080)]
                        .iter()
                        .map(|(width, height)| DisplayMode {
                            width: *width,
                            height: *height,
                            refresh_rate,
                        })
                        .collect(),
                ),
                description: RefCell::new(encode_description("Null Adapter")),
                dedicated_video_memory: Cell::new(512 * 1024 * 1024),
            }),
        }
    }

    pub fn set_display_modes(&self, modes: &[DisplayMode]) {
        *self.state.display_modes.borrow_mut() = modes.to_vec();
    }

    pub fn set_description(&self, description: Vec<u16>) {
        *self.state.description.borrow_mut() = description;
    }

    pub fn set_dedicated_video_memory(&self, bytes: u64) {
        self.state.dedicated_video_memory.set(bytes);
    }

    pub fn set_failure(&self, failure: Option<NullFailure>) {
        self.state.failure.set(failure);
    }

    pub fn calls(&self) -> Vec<NullCall> {
        self.state.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.state.calls.borrow_mut().clear();
    }

    pub fn releases(&self) -> Vec<NullObject> {
        self.state
            .calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                NullCall::Release(object) => Some(*object),
                _ => None,
            })
            .collect()
    }

    /// Number of created objects not released yet
    pub fn live_objects(&self) -> usize {
        self.state.live_objects.get()
    }
}

impl Default for NullBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for NullBackend {
    fn name(&self) -> &str {
        "Null"
    }

    fn adapter(&self, index: u32) -> Result<Box<dyn Adapter>, BackendError> {
        self.state.record(NullCall::EnumAdapter(index));
        if index != 0 || self.state.fails(NullFailure::Adapter) {
            return Err(BackendError::AdapterNotFound);
        }

        Ok(Box::new(NullAdapter {
            _handle: NullHandle::new(NullObject::Adapter, &self.state),
            state: self.state.clone(),
        }))
    }

    fn create_device_and_swapchain(
        &self,
        feature_level: FeatureLevel,
        desc: &SwapChainDesc,
    ) -> Result<DeviceAndSwapChain, DeviceError> {
        self.state.record(NullCall::CreateDeviceAndSwapChain {
            feature_level,
            width: desc.width,
            height: desc.height,
            format: desc.format,
            refresh_rate: desc.refresh_rate,
            buffer_count: desc.buffer_count,
            windowed: desc.windowed,
        });
        if self.state.fails(NullFailure::DeviceAndSwapChain) {
            return Err(DeviceError::Unsupported);
        }

        Ok(DeviceAndSwapChain {
            device: Box::new(NullDevice {
                _handle: NullHandle::new(NullObject::Device, &self.state),
                state: self.state.clone(),
            }),
            context: Box::new(NullDeviceContext {
                _handle: NullHandle::new(NullObject::DeviceContext, &self.state),
                state: self.state.clone(),
            }),
            swapchain: SwapChain::new(*desc, NullHandle::boxed(NullObject::SwapChain, &self.state)),
        })
    }
}

struct NullAdapter {
    _handle: NullHandle,
    state: Rc<NullState>,
}

impl Adapter for NullAdapter {
    fn desc(&self) -> Result<AdapterDesc, BackendError> {
        self.state.record(NullCall::GetAdapterDesc);
        if self.state.fails(NullFailure::AdapterDesc) {
            return Err(BackendError::Unknown);
        }

        Ok(AdapterDesc {
            description: self.state.description.borrow().clone(),
            dedicated_video_memory: self.state.dedicated_video_memory.get(),
        })
    }

    fn output(&self, index: u32) -> Result<Box<dyn Output>, BackendError> {
        self.state.record(NullCall::EnumOutput(index));
        if index != 0 || self.state.fails(NullFailure::Output) {
            return Err(BackendError::OutputNotFound);
        }

        Ok(Box::new(NullOutput {
            _handle: NullHandle::new(NullObject::Output, &self.state),
            state: self.state.clone(),
        }))
    }
}

struct NullOutput {
    _handle: NullHandle,
    state: Rc<NullState>,
}

impl Output for NullOutput {
    fn display_mode_count(&self, format: PixelFormat) -> Result<u32, BackendError> {
        self.state.record(NullCall::GetDisplayModeCount(format));
        if self.state.fails(NullFailure::DisplayModeCount) {
            return Err(BackendError::Unknown);
        }

        Ok(self.state.display_modes.borrow().len() as u32)
    }

    fn display_modes(
        &self,
        format: PixelFormat,
        count: u32,
    ) -> Result<Vec<DisplayMode>, BackendError> {
        self.state
            .record(NullCall::GetDisplayModeList { format, count });
        if self.state.fails(NullFailure::DisplayModeList) {
            return Err(BackendError::Unknown);
        }

        Ok(self
            .state
            .display_modes
            .borrow()
            .iter()
            .take(count as usize)
            .copied()
            .collect())
    }
}

struct NullDevice {
    _handle: NullHandle,
    state: Rc<NullState>,
}

impl NullDevice {
    fn create(
        &self,
        call: NullCall,
        failure: NullFailure,
        object: NullObject,
    ) -> Result<Box<NullHandle>, DeviceError> {
        self.state.record(call);
        if self.state.fails(failure) {
            return Err(DeviceError::Unknown);
        }

        Ok(NullHandle::boxed(object, &self.state))
    }
}

impl Device for NullDevice {
    fn create_buffer(
        &self,
        desc: &BufferDesc,
        initial_data: Option<&[u8]>,
    ) -> Result<Buffer, DeviceError> {
        if let Some(data) = initial_data {
            if data.len() > desc.size_bytes as usize {
                return Err(DeviceError::InvalidParameters);
            }
        }

        let handle = self.create(
            NullCall::CreateBuffer(*desc),
            NullFailure::Buffer,
            NullObject::Buffer,
        )?;
        Ok(Buffer::new(*desc, handle))
    }

    fn create_texture(&self, desc: &TextureDesc) -> Result<Texture, DeviceError> {
        let handle = self.create(
            NullCall::CreateTexture(*desc),
            NullFailure::Texture,
            NullObject::Texture,
        )?;
        Ok(Texture::new(*desc, handle))
    }

    fn create_render_target_view(
        &self,
        desc: &RenderTargetViewDesc,
    ) -> Result<RenderTargetView, DeviceError> {
        let handle = self.create(
            NullCall::CreateRenderTargetView(desc.format),
            NullFailure::RenderTargetView,
            NullObject::RenderTargetView,
        )?;
        Ok(RenderTargetView::new(desc.format, desc.ty, handle))
    }

    fn create_depth_stencil_view(
        &self,
        desc: &DepthStencilViewDesc,
    ) -> Result<DepthStencilView, DeviceError> {
        let handle = self.create(
            NullCall::CreateDepthStencilView(desc.format),
            NullFailure::DepthStencilView,
            NullObject::DepthStencilView,
        )?;
        Ok(DepthStencilView::new(desc.format, desc.ty, handle))
    }

    fn create_depth_stencil_state(
        &self,
        desc: &DepthStencilStateDesc,
    ) -> Result<DepthStencilState, DeviceError> {
        let handle = self.create(
            NullCall::CreateDepthStencilState(*desc),
            NullFailure::DepthStencilState,
            NullObject::DepthStencilState,
        )?;
        Ok(DepthStencilState::new(*desc, handle))
    }

    fn create_rasterizer_state(
        &self,
        desc: &RasterizerStateDesc,
    ) -> Result<RasterizerState, DeviceError> {
        let handle = self.create(
            NullCall::CreateRasterizerState(*desc),
            NullFailure::RasterizerState,
            NullObject::RasterizerState,
        )?;
        Ok(RasterizerState::new(*desc, handle))
    }

    fn create_shader_module(
        &self,
        stage: ShaderStageFlagBits,
        _: &[u8],
    ) -> Result<ShaderModule, DeviceError> {
        let handle = self.create(
            NullCall::CreateShaderModule(stage),
            NullFailure::ShaderModule,
            NullObject::ShaderModule,
        )?;
        Ok(ShaderModule::new(stage, handle))
    }

    fn create_input_layout(
        &self,
        elements: &[InputElementDesc],
        _: &[u8],
    ) -> Result<InputLayout, DeviceError> {
        let handle = self.create(
            NullCall::CreateInputLayout(elements.to_vec()),
            NullFailure::InputLayout,
            NullObject::InputLayout,
        )?;
        Ok(InputLayout::new(handle))
    }

    fn get_swapchain_backbuffer(&self, swapchain: &SwapChain) -> Result<Texture, DeviceError> {
        let handle = self.create(
            NullCall::GetSwapChainBackbuffer,
            NullFailure::Backbuffer,
            NullObject::Texture,
        )?;
        Ok(Texture::new(
            TextureDesc {
                width: swapchain.desc.width,
                height: swapchain.desc.height,
                mip_levels: 1,
                array_size: 1,
                format: swapchain.desc.format,
                sample_desc: SampleDesc::default(),
                usage: ResourceUsage::Default,
                bind_flags: BindFlags::from_flag(BindFlagBits::RenderTarget),
                cpu_access_flags: CpuAccessFlags::empty(),
            },
            handle,
        ))
    }

    fn present(&self, _: &SwapChain, sync_interval: u32) -> Result<(), DeviceError> {
        self.state.record(NullCall::Present { sync_interval });
        if self.state.fails(NullFailure::Present) {
            return Err(DeviceError::Unknown);
        }

        Ok(())
    }

    fn set_fullscreen_state(&self, _: &SwapChain, fullscreen: bool) -> Result<(), DeviceError> {
        self.state.record(NullCall::SetFullscreenState(fullscreen));
        if self.state.fails(NullFailure::SetFullscreenState) {
            return Err(DeviceError::Unknown);
        }

        Ok(())
    }
}

struct NullDeviceContext {
    _handle: NullHandle,
    state: Rc<NullState>,
}

impl DeviceContext for NullDeviceContext {
    fn set_render_targets(
        &self,
        render_target_views: &[&RenderTargetView],
        depth_stencil_view: Option<&DepthStencilView>,
    ) {
        self.state.record(NullCall::SetRenderTargets {
            render_target_count: render_target_views.len(),
            depth_stencil: depth_stencil_view.is_some(),
        });
    }

    fn set_depth_stencil_state(&self, _: &DepthStencilState, stencil_ref: u32) {
        self.state
            .record(NullCall::SetDepthStencilState { stencil_ref });
    }

    fn clear_render_target_view(&self, _: &RenderTargetView, color: Color4f32) {
        self.state.record(NullCall::ClearRenderTargetView(color));
    }

    fn clear_depth_stencil_view(
        &self,
        _: &DepthStencilView,
        flags: ClearFlags,
        depth: f32,
        stencil: u8,
    ) {
        self.state.record(NullCall::ClearDepthStencilView {
            flags,
            depth,
            stencil,
        });
    }

    fn set_rasterizer_state(&self, _: &RasterizerState) {
        self.state.record(NullCall::SetRasterizerState);
    }

    fn set_viewports(&self, viewports: &[Viewport]) {
        self.state.record(NullCall::SetViewports(viewports.to_vec()));
    }

    fn set_vertex_buffers(&self, start_slot: u32, bindings: &[VertexBufferBinding]) {
        self.state.record(NullCall::SetVertexBuffers {
            start_slot,
            strides: bindings.iter().map(|binding| binding.stride).collect(),
            offsets: bindings.iter().map(|binding| binding.offset).collect(),
        });
    }

    fn set_index_buffer(&self, _: &Buffer, format: IndexBufferFormat, offset: u32) {
        self.state
            .record(NullCall::SetIndexBuffer { format, offset });
    }

    fn set_primitive_topology(&self, topology: PrimitiveTopology) {
        self.state.record(NullCall::SetPrimitiveTopology(topology));
    }

    fn set_input_layout(&self, _: &InputLayout) {
        self.state.record(NullCall::SetInputLayout);
    }

    fn set_shader(&self, shader: &ShaderModule) {
        self.state.record(NullCall::SetShader(shader.stage));
    }

    fn set_vertex_constant_buffers(&self, start_slot: u32, buffers: &[&Buffer]) {
        self.state.record(NullCall::SetVertexConstantBuffers {
            start_slot,
            count: buffers.len(),
        });
    }

    fn update_buffer(&self, buffer: &Buffer, data: &[u8]) -> Result<(), DeviceError> {
        self.state.record(NullCall::UpdateBuffer(data.to_vec()));
        if self.state.fails(NullFailure::UpdateBuffer) {
            return Err(DeviceError::Unknown);
        }
        if data.len() > buffer.desc.size_bytes as usize {
            return Err(DeviceError::InvalidParameters);
        }

        Ok(())
    }

    fn draw_indexed(&self, index_count: u32, first_index: u32, base_vertex: i32) {
        self.state.record(NullCall::DrawIndexed {
            index_count,
            first_index,
            base_vertex,
        });
    }
}
