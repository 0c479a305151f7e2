use crate::backend::{
    BindFlagBits, BindFlags, CpuAccessFlags, DepthStencilView, DepthStencilViewDesc,
    DepthStencilViewType, Device, RenderTargetView, RenderTargetViewDesc, RenderTargetViewType,
    ResourceUsage, SwapChain, Texture, Texture2DDSV, Texture2DRTV, TextureDesc,
};
use crate::render_context::InitError;
use crate::{PixelFormat, SampleDesc};

pub const DEPTH_STENCIL_FORMAT: PixelFormat = PixelFormat::D24UnormS8Uint;

pub fn depth_stencil_buffer_desc(width: u32, height: u32) -> TextureDesc {
    TextureDesc {
        width,
        height,
        mip_levels: 1,
        array_size: 1,
        format: DEPTH_STENCIL_FORMAT,
        sample_desc: SampleDesc::default(),
        usage: ResourceUsage::Default,
        bind_flags: BindFlags::from_flag(BindFlagBits::DepthStencil),
        cpu_access_flags: CpuAccessFlags::empty(),
    }
}

/// Back buffer view and depth buffer of the swapchain.
/// Fields are dropped in reverse creation order.
pub struct FrameBuffers {
    depth_stencil_view: DepthStencilView,
    depth_stencil_buffer: Texture,
    render_target_view: RenderTargetView,
}

impl FrameBuffers {
    /// The depth buffer must match the swapchain size, a mismatch is not detected here
    pub fn new(
        device: &dyn Device,
        swapchain: &SwapChain,
        width: u32,
        height: u32,
    ) -> Result<Self, InitError> {
        let render_target_view = {
            let backbuffer = device
                .get_swapchain_backbuffer(swapchain)
                .map_err(InitError::Backbuffer)?;

            device
                .create_render_target_view(&RenderTargetViewDesc {
                    resource: &backbuffer,
                    format: swapchain.desc.format,
                    ty: RenderTargetViewType::Texture2D(Texture2DRTV { mip_level: 0 }),
                })
                .map_err(InitError::RenderTargetView)?
        };

        let depth_stencil_buffer = device
            .create_texture(&depth_stencil_buffer_desc(width, height))
            .map_err(InitError::DepthStencilBuffer)?;

        let depth_stencil_view = device
            .create_depth_stencil_view(&DepthStencilViewDesc {
                resource: &depth_stencil_buffer,
                format: DEPTH_STENCIL_FORMAT,
                ty: DepthStencilViewType::Texture2D(Texture2DDSV { mip_level: 0 }),
            })
            .map_err(InitError::DepthStencilView)?;

        Ok(Self {
            depth_stencil_view,
            depth_stencil_buffer,
            render_target_view,
        })
    }

    pub fn render_target_view(&self) -> &RenderTargetView {
        &self.render_target_view
    }

    pub fn depth_stencil_view(&self) -> &DepthStencilView {
        &self.depth_stencil_view
    }

    pub fn depth_stencil_buffer(&self) -> &Texture {
        &self.depth_stencil_buffer
    }
}
