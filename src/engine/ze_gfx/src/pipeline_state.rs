use crate::backend::{
    CompareOp, CullMode, DepthStencilState, DepthStencilStateDesc, DepthWriteMask, Device,
    DeviceContext, FillMode, RasterizerState, RasterizerStateDesc, StencilOp, StencilOpDesc,
    Viewport,
};
use crate::frame_buffer::FrameBuffers;
use crate::render_context::InitError;
use ze_core::maths::Vec2f32;

pub const STENCIL_REFERENCE: u32 = 1;

pub fn depth_stencil_state_desc() -> DepthStencilStateDesc {
    DepthStencilStateDesc {
        depth_enable: true,
        depth_write_mask: DepthWriteMask::All,
        depth_compare_op: CompareOp::Less,
        stencil_enable: true,
        stencil_read_mask: 0xFF,
        stencil_write_mask: 0xFF,
        front_face: StencilOpDesc {
            fail_op: StencilOp::Keep,
            depth_fail_op: StencilOp::Increment,
            pass_op: StencilOp::Keep,
            compare_op: CompareOp::Always,
        },
        back_face: StencilOpDesc {
            fail_op: StencilOp::Keep,
            depth_fail_op: StencilOp::Decrement,
            pass_op: StencilOp::Keep,
            compare_op: CompareOp::Always,
        },
    }
}

/// Solid fill, clockwise front faces, back faces culled
pub fn rasterizer_state_desc() -> RasterizerStateDesc {
    RasterizerStateDesc {
        fill_mode: FillMode::Solid,
        cull_mode: CullMode::Back,
        front_counter_clockwise: false,
        depth_bias: 0,
        depth_bias_clamp: 0.0,
        slope_scaled_depth_bias: 0.0,
        depth_clip_enable: true,
        scissor_enable: false,
        multisample_enable: false,
        antialiased_line_enable: false,
    }
}

pub fn full_screen_viewport(width: u32, height: u32) -> Viewport {
    Viewport {
        position: Vec2f32::new(0.0, 0.0),
        size: Vec2f32::new(width as f32, height as f32),
        min_depth: 0.0,
        max_depth: 1.0,
    }
}

/// Fixed function state bound once for the whole run
pub struct PipelineState {
    rasterizer_state: RasterizerState,
    depth_stencil_state: DepthStencilState,
}

impl PipelineState {
    pub fn new(
        device: &dyn Device,
        context: &dyn DeviceContext,
        frame_buffers: &FrameBuffers,
        width: u32,
        height: u32,
    ) -> Result<Self, InitError> {
        context.set_render_targets(
            &[frame_buffers.render_target_view()],
            Some(frame_buffers.depth_stencil_view()),
        );

        let depth_stencil_state = device
            .create_depth_stencil_state(&depth_stencil_state_desc())
            .map_err(InitError::DepthStencilState)?;
        context.set_depth_stencil_state(&depth_stencil_state, STENCIL_REFERENCE);

        let rasterizer_state = device
            .create_rasterizer_state(&rasterizer_state_desc())
            .map_err(InitError::RasterizerState)?;
        context.set_rasterizer_state(&rasterizer_state);

        context.set_viewports(&[full_screen_viewport(width, height)]);

        Ok(Self {
            rasterizer_state,
            depth_stencil_state,
        })
    }

    pub fn depth_stencil_state(&self) -> &DepthStencilState {
        &self.depth_stencil_state
    }

    pub fn rasterizer_state(&self) -> &RasterizerState {
        &self.rasterizer_state
    }
}
