use crate::backend::{
    Backend, BackendError, ClearFlagBits, ClearFlags, Device, DeviceContext, DeviceError,
    FeatureLevel, RefreshRate, SwapChain, SwapChainDesc,
};
use crate::display_mode::{find_refresh_rate, narrow_adapter_description};
use crate::frame_buffer::FrameBuffers;
use crate::pipeline_state::PipelineState;
use crate::transforms::Transforms;
use crate::{PixelFormat, SampleDesc};
use raw_window_handle::RawWindowHandle;
use std::fmt::{Display, Formatter};
use ze_core::color::Color4f32;
use ze_core::maths::Matrix4f32;
use ze_core::{ze_info, ze_warn};

pub const BACKBUFFER_FORMAT: PixelFormat = PixelFormat::R8G8B8A8Unorm;
pub const FEATURE_LEVEL: FeatureLevel = FeatureLevel::Level11_0;

#[derive(Copy, Clone, Debug)]
pub struct RenderContextDesc {
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub window_handle: RawWindowHandle,
    pub fullscreen: bool,
    pub screen_depth: f32,
    pub screen_near: f32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoCardInfo {
    pub memory_mb: u64,
    pub description: String,
}

/// Initialization step that failed
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InitError {
    Adapter(BackendError),
    Output(BackendError),
    DisplayModeCount(BackendError),
    DisplayModeList(BackendError),
    AdapterDesc(BackendError),
    AdapterDescription,
    DeviceAndSwapChain(DeviceError),
    Backbuffer(DeviceError),
    RenderTargetView(DeviceError),
    DepthStencilBuffer(DeviceError),
    DepthStencilView(DeviceError),
    DepthStencilState(DeviceError),
    RasterizerState(DeviceError),
}

impl Display for InitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InitError::Adapter(e) => write!(f, "failed to get the primary adapter: {}", e),
            InitError::Output(e) => write!(f, "failed to get the primary output: {}", e),
            InitError::DisplayModeCount(e) => {
                write!(f, "failed to query the display mode count: {}", e)
            }
            InitError::DisplayModeList(e) => {
                write!(f, "failed to query the display mode list: {}", e)
            }
            InitError::AdapterDesc(e) => write!(f, "failed to get the adapter desc: {}", e),
            InitError::AdapterDescription => {
                write!(f, "adapter description does not fit in its buffer")
            }
            InitError::DeviceAndSwapChain(e) => {
                write!(f, "failed to create the device and swapchain: {}", e)
            }
            InitError::Backbuffer(e) => write!(f, "failed to get the back buffer: {}", e),
            InitError::RenderTargetView(e) => {
                write!(f, "failed to create the render target view: {}", e)
            }
            InitError::DepthStencilBuffer(e) => {
                write!(f, "failed to create the depth stencil buffer: {}", e)
            }
            InitError::DepthStencilView(e) => {
                write!(f, "failed to create the depth stencil view: {}", e)
            }
            InitError::DepthStencilState(e) => {
                write!(f, "failed to create the depth stencil state: {}", e)
            }
            InitError::RasterizerState(e) => {
                write!(f, "failed to create the rasterizer state: {}", e)
            }
        }
    }
}

impl std::error::Error for InitError {}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameError {
    FrameAlreadyBegun,
    FrameNotBegun,
    Present(DeviceError),
}

impl Display for FrameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameError::FrameAlreadyBegun => write!(f, "begin_scene called twice"),
            FrameError::FrameNotBegun => write!(f, "end_scene called without begin_scene"),
            FrameError::Present(e) => write!(f, "present failed: {}", e),
        }
    }
}

impl std::error::Error for FrameError {}

/// Device, immediate context and swapchain.
/// The swapchain is switched back to windowed mode before anything is released,
/// a fullscreen swapchain cannot be released.
struct DeviceResources {
    context: Box<dyn DeviceContext>,
    device: Box<dyn Device>,
    swapchain: SwapChain,
}

impl Drop for DeviceResources {
    fn drop(&mut self) {
        if let Err(error) = self.device.set_fullscreen_state(&self.swapchain, false) {
            ze_warn!("Failed to leave fullscreen before release: {}", error);
        }
    }
}

/// Owns every GPU object needed to clear and present the window.
/// Fields are dropped in reverse creation order.
pub struct RenderContext {
    pipeline_state: PipelineState,
    frame_buffers: FrameBuffers,
    resources: DeviceResources,
    transforms: Transforms,
    video_card_info: VideoCardInfo,
    vsync: bool,
    frame_in_progress: bool,
}

impl RenderContext {
    pub fn new(backend: &dyn Backend, desc: &RenderContextDesc) -> Result<Self, InitError> {
        // Adapter and output are only needed to pick the display mode
        let (refresh_rate, video_card_info) = {
            let adapter = backend.adapter(0).map_err(InitError::Adapter)?;
            let output = adapter.output(0).map_err(InitError::Output)?;

            let mode_count = output
                .display_mode_count(BACKBUFFER_FORMAT)
                .map_err(InitError::DisplayModeCount)?;
            let modes = output
                .display_modes(BACKBUFFER_FORMAT, mode_count)
                .map_err(InitError::DisplayModeList)?;

            let refresh_rate = match find_refresh_rate(&modes, desc.width, desc.height) {
                Some(refresh_rate) => refresh_rate,
                None => {
                    ze_warn!(
                        "No display mode matches {}x{}, letting the driver pick the refresh rate",
                        desc.width,
                        desc.height
                    );
                    RefreshRate::UNSPECIFIED
                }
            };

            let adapter_desc = adapter.desc().map_err(InitError::AdapterDesc)?;
            let description = narrow_adapter_description(&adapter_desc.description)
                .ok_or(InitError::AdapterDescription)?;

            (
                refresh_rate,
                VideoCardInfo {
                    memory_mb: adapter_desc.dedicated_video_memory / 1024 / 1024,
                    description,
                },
            )
        };

        ze_info!(
            "Using {} ({} MB) with {}",
            video_card_info.description,
            video_card_info.memory_mb,
            backend.name()
        );

        let swapchain_desc = SwapChainDesc {
            width: desc.width,
            height: desc.height,
            format: BACKBUFFER_FORMAT,
            refresh_rate: if desc.vsync {
                refresh_rate
            } else {
                RefreshRate::UNSPECIFIED
            },
            sample_desc: SampleDesc::default(),
            buffer_count: 1,
            windowed: !desc.fullscreen,
            window_handle: desc.window_handle,
        };

        let created = backend
            .create_device_and_swapchain(FEATURE_LEVEL, &swapchain_desc)
            .map_err(InitError::DeviceAndSwapChain)?;
        let resources = DeviceResources {
            context: created.context,
            device: created.device,
            swapchain: created.swapchain,
        };

        ze_info!(
            "Created {}x{} swapchain ({}/{} Hz, {})",
            desc.width,
            desc.height,
            swapchain_desc.refresh_rate.numerator,
            swapchain_desc.refresh_rate.denominator,
            if desc.fullscreen {
                "fullscreen"
            } else {
                "windowed"
            }
        );

        let frame_buffers = FrameBuffers::new(
            resources.device.as_ref(),
            &resources.swapchain,
            desc.width,
            desc.height,
        )?;

        let pipeline_state = PipelineState::new(
            resources.device.as_ref(),
            resources.context.as_ref(),
            &frame_buffers,
            desc.width,
            desc.height,
        )?;

        Ok(Self {
            pipeline_state,
            frame_buffers,
            resources,
            transforms: Transforms::new(desc.width, desc.height, desc.screen_near, desc.screen_depth),
            video_card_info,
            vsync: desc.vsync,
            frame_in_progress: false,
        })
    }

    /// Clear the back buffer to `color` and the depth buffer to 1.0
    pub fn begin_scene(&mut self, color: Color4f32) -> Result<(), FrameError> {
        if self.frame_in_progress {
            return Err(FrameError::FrameAlreadyBegun);
        }

        let context = self.resources.context.as_ref();
        context.clear_render_target_view(self.frame_buffers.render_target_view(), color);
        context.clear_depth_stencil_view(
            self.frame_buffers.depth_stencil_view(),
            ClearFlags::from_flag(ClearFlagBits::Depth),
            1.0,
            0,
        );

        self.frame_in_progress = true;
        Ok(())
    }

    /// Present the back buffer, waiting for the vertical blank when vsync is enabled
    pub fn end_scene(&mut self) -> Result<(), FrameError> {
        if !self.frame_in_progress {
            return Err(FrameError::FrameNotBegun);
        }
        self.frame_in_progress = false;

        self.resources
            .device
            .present(&self.resources.swapchain, self.present_interval())
            .map_err(FrameError::Present)
    }

    /// Close the current frame without presenting it
    pub fn abort_scene(&mut self) {
        self.frame_in_progress = false;
    }

    pub fn present_interval(&self) -> u32 {
        if self.vsync {
            1
        } else {
            0
        }
    }

    pub fn device(&self) -> &dyn Device {
        self.resources.device.as_ref()
    }

    pub fn device_context(&self) -> &dyn DeviceContext {
        self.resources.context.as_ref()
    }

    pub fn swapchain(&self) -> &SwapChain {
        &self.resources.swapchain
    }

    pub fn frame_buffers(&self) -> &FrameBuffers {
        &self.frame_buffers
    }

    pub fn pipeline_state(&self) -> &PipelineState {
        &self.pipeline_state
    }

    pub fn transforms(&self) -> &Transforms {
        &self.transforms
    }

    pub fn projection_matrix(&self) -> Matrix4f32 {
        self.transforms.projection_matrix()
    }

    pub fn world_matrix(&self) -> Matrix4f32 {
        self.transforms.world_matrix()
    }

    pub fn ortho_matrix(&self) -> Matrix4f32 {
        self.transforms.ortho_matrix()
    }

    pub fn video_card_info(&self) -> &VideoCardInfo {
        &self.video_card_info
    }
}
