use crate::utils::*;
use std::any::Any;
use std::ffi::CString;
use windows::core::PCSTR;
use windows::Win32::Foundation::BOOL;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::*;
use ze_core::color::Color4f32;
use ze_core::ze_error;
use ze_gfx::backend::*;
use ze_gfx::ShaderStageFlagBits;

enum D3D11Shader {
    Vertex(ID3D11VertexShader),
    Pixel(ID3D11PixelShader),
}

fn get_backend_data<T: 'static>(data: &dyn Any) -> Result<&T, DeviceError> {
    data.downcast_ref::<T>().ok_or(DeviceError::InvalidParameters)
}

/// Resources handed to the context must come from this backend, others are skipped
fn get_bound_backend_data<'a, T: 'static>(data: &'a dyn Any, what: &str) -> Option<&'a T> {
    let object = data.downcast_ref::<T>();
    if object.is_none() {
        ze_error!("Tried to bind a {} that was not created by the D3D11 backend", what);
    }
    object
}

pub struct D3D11Device {
    device: ID3D11Device,
}

impl D3D11Device {
    pub fn new(device: ID3D11Device) -> Self {
        Self { device }
    }
}

impl Device for D3D11Device {
    fn create_buffer(
        &self,
        desc: &BufferDesc,
        initial_data: Option<&[u8]>,
    ) -> Result<Buffer, DeviceError> {
        let d3d_desc = D3D11_BUFFER_DESC {
            ByteWidth: desc.size_bytes,
            Usage: get_d3d_usage_from_ze_resource_usage(desc.usage),
            BindFlags: get_d3d_bind_flags_from_ze_bind_flags(desc.bind_flags),
            CPUAccessFlags: get_d3d_cpu_access_flags_from_ze_cpu_access_flags(
                desc.cpu_access_flags,
            ),
            MiscFlags: 0,
            StructureByteStride: 0,
        };

        let initial_data = match initial_data {
            Some(data) if data.len() > desc.size_bytes as usize => {
                return Err(DeviceError::InvalidParameters)
            }
            Some(data) => Some(D3D11_SUBRESOURCE_DATA {
                pSysMem: data.as_ptr() as *const _,
                SysMemPitch: 0,
                SysMemSlicePitch: 0,
            }),
            None => None,
        };

        let mut buffer: Option<ID3D11Buffer> = None;
        let result = unsafe {
            self.device.CreateBuffer(
                &d3d_desc,
                initial_data.as_ref().map(|data| data as *const _),
                Some(&mut buffer),
            )
        };

        Ok(Buffer::new(*desc, Box::new(get_created_object(result, buffer)?)))
    }

    fn create_texture(&self, desc: &TextureDesc) -> Result<Texture, DeviceError> {
        let d3d_desc = D3D11_TEXTURE2D_DESC {
            Width: desc.width,
            Height: desc.height,
            MipLevels: desc.mip_levels,
            ArraySize: desc.array_size,
            Format: get_dxgi_format_from_ze_format(desc.format),
            SampleDesc: get_dxgi_sample_desc_from_ze_sample_desc(desc.sample_desc),
            Usage: get_d3d_usage_from_ze_resource_usage(desc.usage),
            BindFlags: get_d3d_bind_flags_from_ze_bind_flags(desc.bind_flags),
            CPUAccessFlags: get_d3d_cpu_access_flags_from_ze_cpu_access_flags(
                desc.cpu_access_flags,
            ),
            MiscFlags: 0,
        };

        let mut texture: Option<ID3D11Texture2D> = None;
        let result = unsafe {
            self.device.CreateTexture2D(&d3d_desc, None, Some(&mut texture))
        };

        Ok(Texture::new(*desc, Box::new(get_created_object(result, texture)?)))
    }

    fn create_render_target_view(
        &self,
        desc: &RenderTargetViewDesc,
    ) -> Result<RenderTargetView, DeviceError> {
        let resource = get_backend_data::<ID3D11Texture2D>(desc.resource.backend_data.as_ref())?;

        let d3d_desc = match &desc.ty {
            RenderTargetViewType::Texture2D(info) => D3D11_RENDER_TARGET_VIEW_DESC {
                Format: get_dxgi_format_from_ze_format(desc.format),
                ViewDimension: D3D11_RTV_DIMENSION_TEXTURE2D,
                Anonymous: D3D11_RENDER_TARGET_VIEW_DESC_0 {
                    Texture2D: D3D11_TEX2D_RTV {
                        MipSlice: info.mip_level,
                    },
                },
            },
        };

        let mut view: Option<ID3D11RenderTargetView> = None;
        let result = unsafe {
            self.device.CreateRenderTargetView(resource, Some(&d3d_desc), Some(&mut view))
        };

        Ok(RenderTargetView::new(
            desc.format,
            desc.ty,
            Box::new(get_created_object(result, view)?),
        ))
    }

    fn create_depth_stencil_view(
        &self,
        desc: &DepthStencilViewDesc,
    ) -> Result<DepthStencilView, DeviceError> {
        let resource = get_backend_data::<ID3D11Texture2D>(desc.resource.backend_data.as_ref())?;

        let d3d_desc = match &desc.ty {
            DepthStencilViewType::Texture2D(info) => D3D11_DEPTH_STENCIL_VIEW_DESC {
                Format: get_dxgi_format_from_ze_format(desc.format),
                ViewDimension: D3D11_DSV_DIMENSION_TEXTURE2D,
                Flags: 0,
                Anonymous: D3D11_DEPTH_STENCIL_VIEW_DESC_0 {
                    Texture2D: D3D11_TEX2D_DSV {
                        MipSlice: info.mip_level,
                    },
                },
            },
        };

        let mut view: Option<ID3D11DepthStencilView> = None;
        let result = unsafe {
            self.device.CreateDepthStencilView(resource, Some(&d3d_desc), Some(&mut view))
        };

        Ok(DepthStencilView::new(
            desc.format,
            desc.ty,
            Box::new(get_created_object(result, view)?),
        ))
    }

    fn create_depth_stencil_state(
        &self,
        desc: &DepthStencilStateDesc,
    ) -> Result<DepthStencilState, DeviceError> {
        let d3d_desc = D3D11_DEPTH_STENCIL_DESC {
            DepthEnable: BOOL::from(desc.depth_enable),
            DepthWriteMask: get_d3d_depth_write_mask_from_ze_depth_write_mask(
                desc.depth_write_mask,
            ),
            DepthFunc: get_d3d_compare_func_from_ze_compare_op(desc.depth_compare_op),
            StencilEnable: BOOL::from(desc.stencil_enable),
            StencilReadMask: desc.stencil_read_mask,
            StencilWriteMask: desc.stencil_write_mask,
            FrontFace: get_d3d_depth_stencilop_desc_from_ze_stencil_op_desc(&desc.front_face),
            BackFace: get_d3d_depth_stencilop_desc_from_ze_stencil_op_desc(&desc.back_face),
        };

        let mut state: Option<ID3D11DepthStencilState> = None;
        let result = unsafe {
            self.device.CreateDepthStencilState(&d3d_desc, Some(&mut state))
        };

        Ok(DepthStencilState::new(
            *desc,
            Box::new(get_created_object(result, state)?),
        ))
    }

    fn create_rasterizer_state(
        &self,
        desc: &RasterizerStateDesc,
    ) -> Result<RasterizerState, DeviceError> {
        let d3d_desc = D3D11_RASTERIZER_DESC {
            FillMode: get_d3d_fill_mode_from_ze_fill_mode(desc.fill_mode),
            CullMode: get_d3d_cull_mode_from_ze_cull_mode(desc.cull_mode),
            FrontCounterClockwise: BOOL::from(desc.front_counter_clockwise),
            DepthBias: desc.depth_bias,
            DepthBiasClamp: desc.depth_bias_clamp,
            SlopeScaledDepthBias: desc.slope_scaled_depth_bias,
            DepthClipEnable: BOOL::from(desc.depth_clip_enable),
            ScissorEnable: BOOL::from(desc.scissor_enable),
            MultisampleEnable: BOOL::from(desc.multisample_enable),
            AntialiasedLineEnable: BOOL::from(desc.antialiased_line_enable),
        };

        let mut state: Option<ID3D11RasterizerState> = None;
        let result = unsafe {
            self.device.CreateRasterizerState(&d3d_desc, Some(&mut state))
        };

        Ok(RasterizerState::new(
            *desc,
            Box::new(get_created_object(result, state)?),
        ))
    }

    fn create_shader_module(
        &self,
        stage: ShaderStageFlagBits,
        bytecode: &[u8],
    ) -> Result<ShaderModule, DeviceError> {
        let shader = match stage {
            ShaderStageFlagBits::Vertex => {
                let mut shader: Option<ID3D11VertexShader> = None;
                let result = unsafe {
                    self.device.CreateVertexShader(bytecode, None, Some(&mut shader))
                };
                D3D11Shader::Vertex(get_created_object(result, shader)?)
            }
            ShaderStageFlagBits::Fragment => {
                let mut shader: Option<ID3D11PixelShader> = None;
                let result = unsafe {
                    self.device.CreatePixelShader(bytecode, None, Some(&mut shader))
                };
                D3D11Shader::Pixel(get_created_object(result, shader)?)
            }
        };

        Ok(ShaderModule::new(stage, Box::new(shader)))
    }

    fn create_input_layout(
        &self,
        elements: &[InputElementDesc],
        vertex_shader_bytecode: &[u8],
    ) -> Result<InputLayout, DeviceError> {
        // Semantic names must outlive the creation call
        let semantic_names = elements
            .iter()
            .map(|element| CString::new(element.semantic_name))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| DeviceError::InvalidParameters)?;

        let d3d_elements: Vec<D3D11_INPUT_ELEMENT_DESC> = elements
            .iter()
            .zip(semantic_names.iter())
            .map(|(element, name)| D3D11_INPUT_ELEMENT_DESC {
                SemanticName: PCSTR(name.as_ptr() as *const u8),
                SemanticIndex: element.semantic_index,
                Format: get_dxgi_format_from_ze_format(element.format),
                InputSlot: element.input_slot,
                AlignedByteOffset: element.aligned_byte_offset,
                InputSlotClass: D3D11_INPUT_PER_VERTEX_DATA,
                InstanceDataStepRate: 0,
            })
            .collect();

        let mut layout: Option<ID3D11InputLayout> = None;
        let result = unsafe {
            self.device.CreateInputLayout(
                &d3d_elements,
                vertex_shader_bytecode,
                Some(&mut layout),
            )
        };

        Ok(InputLayout::new(Box::new(get_created_object(result, layout)?)))
    }

    fn get_swapchain_backbuffer(&self, swapchain: &SwapChain) -> Result<Texture, DeviceError> {
        let d3d_swapchain = get_backend_data::<IDXGISwapChain>(swapchain.backend_data.as_ref())?;
        let texture = unsafe { d3d_swapchain.GetBuffer::<ID3D11Texture2D>(0) }
            .map_err(convert_d3d_error_to_ze_device_error)?;

        Ok(Texture::new(
            TextureDesc {
                width: swapchain.desc.width,
                height: swapchain.desc.height,
                mip_levels: 1,
                array_size: 1,
                format: swapchain.desc.format,
                sample_desc: swapchain.desc.sample_desc,
                usage: ResourceUsage::Default,
                bind_flags: BindFlags::from_flag(BindFlagBits::RenderTarget),
                cpu_access_flags: CpuAccessFlags::empty(),
            },
            Box::new(texture),
        ))
    }

    fn present(&self, swapchain: &SwapChain, sync_interval: u32) -> Result<(), DeviceError> {
        let d3d_swapchain = get_backend_data::<IDXGISwapChain>(swapchain.backend_data.as_ref())?;
        unsafe { d3d_swapchain.Present(sync_interval, 0) }
            .ok()
            .map_err(convert_d3d_error_to_ze_device_error)
    }

    fn set_fullscreen_state(
        &self,
        swapchain: &SwapChain,
        fullscreen: bool,
    ) -> Result<(), DeviceError> {
        let d3d_swapchain = get_backend_data::<IDXGISwapChain>(swapchain.backend_data.as_ref())?;
        unsafe { d3d_swapchain.SetFullscreenState(BOOL::from(fullscreen), None) }
            .map_err(convert_d3d_error_to_ze_device_error)
    }
}

pub struct D3D11DeviceContext {
    context: ID3D11DeviceContext,
}

impl D3D11DeviceContext {
    pub fn new(context: ID3D11DeviceContext) -> Self {
        Self { context }
    }
}

impl DeviceContext for D3D11DeviceContext {
    fn set_render_targets(
        &self,
        render_target_views: &[&RenderTargetView],
        depth_stencil_view: Option<&DepthStencilView>,
    ) {
        let views: Vec<Option<ID3D11RenderTargetView>> = render_target_views
            .iter()
            .map(|view| {
                get_bound_backend_data::<ID3D11RenderTargetView>(
                    view.backend_data.as_ref(),
                    "render target view",
                )
                .cloned()
            })
            .collect();

        let depth_stencil_view = depth_stencil_view.and_then(|view| {
            get_bound_backend_data::<ID3D11DepthStencilView>(
                view.backend_data.as_ref(),
                "depth stencil view",
            )
        });

        unsafe {
            match depth_stencil_view {
                Some(depth_stencil_view) => self
                    .context
                    .OMSetRenderTargets(Some(&views), depth_stencil_view),
                None => self.context.OMSetRenderTargets(Some(&views), None),
            }
        }
    }

    fn set_depth_stencil_state(&self, state: &DepthStencilState, stencil_ref: u32) {
        if let Some(state) = get_bound_backend_data::<ID3D11DepthStencilState>(
            state.backend_data.as_ref(),
            "depth stencil state",
        ) {
            unsafe { self.context.OMSetDepthStencilState(state, stencil_ref) }
        }
    }

    fn clear_render_target_view(&self, view: &RenderTargetView, color: Color4f32) {
        if let Some(view) = get_bound_backend_data::<ID3D11RenderTargetView>(
            view.backend_data.as_ref(),
            "render target view",
        ) {
            let color: [f32; 4] = color.into();
            unsafe { self.context.ClearRenderTargetView(view, &color) }
        }
    }

    fn clear_depth_stencil_view(
        &self,
        view: &DepthStencilView,
        flags: ClearFlags,
        depth: f32,
        stencil: u8,
    ) {
        if let Some(view) = get_bound_backend_data::<ID3D11DepthStencilView>(
            view.backend_data.as_ref(),
            "depth stencil view",
        ) {
            unsafe {
                self.context.ClearDepthStencilView(
                    view,
                    get_d3d_clear_flags_from_ze_clear_flags(flags),
                    depth,
                    stencil,
                )
            }
        }
    }

    fn set_rasterizer_state(&self, state: &RasterizerState) {
        if let Some(state) = get_bound_backend_data::<ID3D11RasterizerState>(
            state.backend_data.as_ref(),
            "rasterizer state",
        ) {
            unsafe { self.context.RSSetState(state) }
        }
    }

    fn set_viewports(&self, viewports: &[Viewport]) {
        let viewports: Vec<D3D11_VIEWPORT> = viewports
            .iter()
            .map(get_d3d_viewport_from_ze_viewport)
            .collect();
        unsafe { self.context.RSSetViewports(Some(&viewports)) }
    }

    fn set_vertex_buffers(&self, start_slot: u32, bindings: &[VertexBufferBinding]) {
        let mut buffers: Vec<Option<ID3D11Buffer>> = Vec::with_capacity(bindings.len());
        let mut strides = Vec::with_capacity(bindings.len());
        let mut offsets = Vec::with_capacity(bindings.len());
        for binding in bindings {
            buffers.push(
                get_bound_backend_data::<ID3D11Buffer>(
                    binding.buffer.backend_data.as_ref(),
                    "vertex buffer",
                )
                .cloned(),
            );
            strides.push(binding.stride);
            offsets.push(binding.offset);
        }

        unsafe {
            self.context.IASetVertexBuffers(
                start_slot,
                bindings.len() as u32,
                Some(buffers.as_ptr()),
                Some(strides.as_ptr()),
                Some(offsets.as_ptr()),
            )
        }
    }

    fn set_index_buffer(&self, buffer: &Buffer, format: IndexBufferFormat, offset: u32) {
        if let Some(buffer) =
            get_bound_backend_data::<ID3D11Buffer>(buffer.backend_data.as_ref(), "index buffer")
        {
            unsafe {
                self.context.IASetIndexBuffer(
                    buffer,
                    get_dxgi_format_from_ze_index_buffer_format(format),
                    offset,
                )
            }
        }
    }

    fn set_primitive_topology(&self, topology: PrimitiveTopology) {
        unsafe {
            self.context.IASetPrimitiveTopology(
                get_d3d_primitive_topology_from_ze_primitive_topology(topology),
            )
        }
    }

    fn set_input_layout(&self, layout: &InputLayout) {
        if let Some(layout) = get_bound_backend_data::<ID3D11InputLayout>(
            layout.backend_data.as_ref(),
            "input layout",
        ) {
            unsafe { self.context.IASetInputLayout(layout) }
        }
    }

    fn set_shader(&self, shader: &ShaderModule) {
        match get_bound_backend_data::<D3D11Shader>(shader.backend_data.as_ref(), "shader") {
            Some(D3D11Shader::Vertex(shader)) => unsafe { self.context.VSSetShader(shader, None) },
            Some(D3D11Shader::Pixel(shader)) => unsafe { self.context.PSSetShader(shader, None) },
            None => {}
        }
    }

    fn set_vertex_constant_buffers(&self, start_slot: u32, buffers: &[&Buffer]) {
        let buffers: Vec<Option<ID3D11Buffer>> = buffers
            .iter()
            .map(|buffer| {
                get_bound_backend_data::<ID3D11Buffer>(
                    buffer.backend_data.as_ref(),
                    "constant buffer",
                )
                .cloned()
            })
            .collect();
        unsafe {
            self.context.VSSetConstantBuffers(start_slot, Some(&buffers))
        }
    }

    fn update_buffer(&self, buffer: &Buffer, data: &[u8]) -> Result<(), DeviceError> {
        if data.len() > buffer.desc.size_bytes as usize {
            return Err(DeviceError::InvalidParameters);
        }

        let d3d_buffer = get_backend_data::<ID3D11Buffer>(buffer.backend_data.as_ref())?;
        let mut mapped = D3D11_MAPPED_SUBRESOURCE::default();
        unsafe {
            self.context.Map(d3d_buffer, 0, D3D11_MAP_WRITE_DISCARD, 0, Some(&mut mapped))
                .map_err(convert_d3d_error_to_ze_device_error)?;
            std::ptr::copy_nonoverlapping(data.as_ptr(), mapped.pData as *mut u8, data.len());
            self.context.Unmap(d3d_buffer, 0);
        }

        Ok(())
    }

    fn draw_indexed(&self, index_count: u32, first_index: u32, base_vertex: i32) {
        unsafe {
            self.context.DrawIndexed(index_count, first_index, base_vertex)
        }
    }
}
